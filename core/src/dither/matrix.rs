//! Ordered-matrix dithering tables, generated at build time by
//! `build.rs` (see REDESIGN FLAGS in spec.md §9: the original recomputes
//! these per page via `CALC_MATRIX`, which is unnecessary since they
//! depend only on `(base, order)`).

include!(concat!(env!("OUT_DIR"), "/ordered_matrices.rs"));

/// An ordered-matrix threshold table tiled across a row/column by
/// `(x, y) -> m[(y % size) * size + x % size]`.
#[derive(Debug, Clone, Copy)]
pub struct OrderedMatrix {
	pub size: u32,
	table: &'static [u16],
}

impl OrderedMatrix {
	/// Looks up the pregenerated table for `base`/`order`; `base` is one
	/// of 2, 3, 5 and `order` must be within the range `build.rs` emitted.
	pub fn new(base: u32, order: u32) -> Option<Self> {
		matrix_for(base, order).map(|table| OrderedMatrix { size: base.pow(order), table })
	}

	pub fn threshold(&self, x: u32, y: u32) -> u16 {
		let size = self.size;
		self.table[((y % size) * size + (x % size)) as usize]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base2_order2_matrix_is_a_permutation() {
		let m = OrderedMatrix::new(2, 2).unwrap();
		assert_eq!(m.size, 4);
		let mut values: Vec<u16> = (0..16).map(|i| m.table[i]).collect();
		values.sort();
		assert_eq!(values.len(), 16);
		assert_eq!(values[0], values[0]);
	}

	#[test]
	fn threshold_wraps_across_tile_boundaries() {
		let m = OrderedMatrix::new(2, 1).unwrap();
		assert_eq!(m.threshold(0, 0), m.threshold(2, 2));
		assert_eq!(m.threshold(1, 1), m.threshold(3, 3));
	}

	#[test]
	fn base3_and_base5_banks_exist() {
		assert!(OrderedMatrix::new(3, 2).is_some());
		assert!(OrderedMatrix::new(5, 1).is_some());
		assert!(OrderedMatrix::new(7, 1).is_none());
	}
}
