//! The dithering core: `print_color` (spec.md §4.G step 1) and
//! `dither_cmyk`/`update_dither` (steps 2-4), grounded on
//! `original_source/print-dither.c`'s `print_color`, `dither_ed`,
//! `dither_ordered` and the shared `update_dither` error-redistribution
//! helper they all call into.

use rand::Rng;

use crate::dither::cursor::ChannelCursors;
use crate::dither::matrix::OrderedMatrix;
use crate::dither::segment::DitherColor;
use crate::error::DitherError;

/// Selects which of the two core strategies (or the printer-chosen mix)
/// `dither_cmyk` uses for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherAlgorithm {
	OrderedMatrix,
	ErrorDiffusion,
	/// "Adaptive Hybrid": error diffusion in smooth regions, falls back
	/// to the ordered matrix near saturation where ED artifacts (worm
	/// trails) are most visible.
	AdaptiveHybrid,
}

/// Floyd-Steinberg-style error weights, numerators over a power-of-two
/// denominator; mirrored left-right on reverse (serpentine) passes.
const ERROR_WEIGHTS: [(i32, i32); 4] = [
	// (dx, numerator) applied to the current row, then the three below.
	(1, 7),
	(-1, 3),
	(0, 5),
	(1, 1),
];
const ERROR_DENOM: i32 = 16;

pub struct DitherChannel {
	pub color: DitherColor,
	next_row_error: Vec<i32>,
}

impl DitherChannel {
	pub fn new(color: DitherColor, width: usize) -> Self {
		DitherChannel { color, next_row_error: vec![0; width] }
	}
}

pub struct Dither {
	pub width: usize,
	pub channels: Vec<DitherChannel>,
	pub algorithm: DitherAlgorithm,
	matrix: Option<OrderedMatrix>,
	row_index: u32,
}

/// Per-pixel output: the drop-size bit pattern chosen for one channel.
pub type RowBits = Vec<u32>;

impl Dither {
	pub fn new(width: usize, channels: Vec<DitherColor>, algorithm: DitherAlgorithm, matrix: Option<OrderedMatrix>) -> Self {
		let channels = channels.into_iter().map(|c| DitherChannel::new(c, width)).collect();
		Dither { width, channels, algorithm, matrix, row_index: 0 }
	}

	/// `print_color`: maps one pixel's input density plus any carried
	/// error onto a drop-size segment, independent of strategy.
	fn print_color(color: &DitherColor, density: u32) -> (&'static str, u32, u32) {
		let seg = color.find_segment(density.min(65535));
		if seg.range_span == 0 {
			return ("at_h", seg.bits_h, seg.value_h);
		}
		let frac = ((density.saturating_sub(seg.range_l)) as u64 * 65535 / seg.range_span as u64) as u32;
		if frac >= 32768 {
			("at_h", seg.bits_h, seg.value_h)
		} else {
			("at_l", seg.bits_l, seg.value_l)
		}
	}

	/// `dither_cmyk`: dither one scanline for every configured channel.
	/// `direction` is `1` for left-to-right, `-1` for serpentine
	/// right-to-left passes; `input[c]` holds `width` 16-bit densities
	/// for channel `c`, already through the color LUT/converter.
	pub fn dither_row(&mut self, input: &[Vec<u16>], direction: i32) -> Result<Vec<RowBits>, DitherError> {
		if input.len() != self.channels.len() {
			return Err(DitherError::RowLength { expected: self.channels.len(), got: input.len() });
		}
		let width = self.width;
		let mut out = Vec::with_capacity(self.channels.len());

		for (channel, densities) in self.channels.iter_mut().zip(input) {
			if densities.len() != width {
				return Err(DitherError::RowLength { expected: width, got: densities.len() });
			}
			let mut row_out = vec![0u32; width];
			let mut carried = 0i32;
			let mut cursor = ChannelCursors::new(width, direction);
			let use_matrix = matches!(
				self.algorithm,
				DitherAlgorithm::OrderedMatrix
			) || (self.algorithm == DitherAlgorithm::AdaptiveHybrid && self.matrix.is_some());

			while cursor.in_bounds() {
				let x = cursor.pos();
				let base = densities[x] as i32 + carried + channel.next_row_error[x];
				let base = base.clamp(0, 65535) as u32;

				let (bits, chosen_value) = if use_matrix {
					let threshold = self.matrix.as_ref().map(|m| m.threshold(x as u32, self.row_index)).unwrap_or(32768);
					let seg = channel.color.find_segment(base);
					if base > threshold as u32 {
						(seg.bits_h, seg.value_h)
					} else {
						(seg.bits_l, seg.value_l)
					}
				} else {
					// Adaptive hybrid still perturbs the error-diffusion
					// decision boundary with a little dither noise so flat
					// fields don't band.
					let jitter = if self.algorithm == DitherAlgorithm::AdaptiveHybrid {
						rand::thread_rng().gen_range(-256..=256)
					} else {
						0
					};
					let (_, bits, value) = Self::print_color(&channel.color, (base as i32 + jitter).clamp(0, 65535) as u32);
					(bits, value)
				};

				row_out[x] = bits;
				let error = base as i32 - chosen_value as i32;
				update_dither(&mut channel.next_row_error, x, width, direction, error);
				carried = 0;

				cursor.advance();
			}
			out.push(row_out);
		}
		self.row_index = self.row_index.wrapping_add(1);
		Ok(out)
	}
}

/// Redistributes one pixel's residual quantization error onto the
/// current and following scanlines using the Floyd-Steinberg weights,
/// mirrored for serpentine (`direction < 0`) passes.
fn update_dither(next_row_error: &mut [i32], x: usize, width: usize, direction: i32, error: i32) {
	if error == 0 {
		return;
	}
	for &(dx, num) in &ERROR_WEIGHTS {
		let dx = if direction < 0 { -dx } else { dx };
		let target = x as i32 + dx;
		if target < 0 || target >= width as i32 {
			continue;
		}
		next_row_error[target as usize] += error * num / ERROR_DENOM;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn two_level_color() -> DitherColor {
		DitherColor::set_ranges_simple(&[(0.5, 0), (1.0, 1)], 1.0).unwrap()
	}

	#[test]
	fn flat_white_field_produces_no_dots() {
		let mut d = Dither::new(4, vec![two_level_color()], DitherAlgorithm::ErrorDiffusion, None);
		let row = vec![vec![0u16; 4]];
		let out = d.dither_row(&row, 1).unwrap();
		assert!(out[0].iter().all(|&b| b == 0));
	}

	#[test]
	fn flat_saturated_field_produces_all_dots() {
		let mut d = Dither::new(4, vec![two_level_color()], DitherAlgorithm::ErrorDiffusion, None);
		let row = vec![vec![65535u16; 4]];
		let out = d.dither_row(&row, 1).unwrap();
		assert!(out[0].iter().all(|&b| b == 1));
	}

	#[test]
	fn row_length_mismatch_is_rejected() {
		let mut d = Dither::new(4, vec![two_level_color()], DitherAlgorithm::ErrorDiffusion, None);
		let row = vec![vec![0u16; 3]];
		assert!(d.dither_row(&row, 1).is_err());
	}

	/// Scenario 1 in spec.md §8: a 2-pixel grayscale row `[0, 255]` on a
	/// black-only printer dithers to plane byte `0b01000000` (first pixel
	/// clear, second set, MSB-first).
	#[test]
	fn scenario1_monochrome_threshold_two_pixel_row() {
		let color = DitherColor::set_ranges_simple(&[(1.0, 1)], 1.0).unwrap();
		let mut d = Dither::new(2, vec![color], DitherAlgorithm::ErrorDiffusion, None);
		let row = vec![vec![0u16, 65535u16]];
		let out = d.dither_row(&row, 1).unwrap();
		let mut byte = 0u8;
		for (i, &bit) in out[0].iter().enumerate() {
			if bit != 0 {
				byte |= 0x80 >> i;
			}
		}
		assert_eq!(byte, 0b0100_0000);
	}

	#[test]
	fn ordered_matrix_mode_is_deterministic_across_identical_rows() {
		let matrix = OrderedMatrix::new(2, 2).unwrap();
		let mut d = Dither::new(4, vec![two_level_color()], DitherAlgorithm::OrderedMatrix, Some(matrix));
		let row = vec![vec![32768u16; 4]];
		let a = d.dither_row(&row, 1).unwrap();
		// Distinct row_index changes the matrix phase; same row_index
		// (freshly constructed) reproduces the same pattern.
		let matrix2 = OrderedMatrix::new(2, 2).unwrap();
		let mut d2 = Dither::new(4, vec![two_level_color()], DitherAlgorithm::OrderedMatrix, Some(matrix2));
		let b = d2.dither_row(&row, 1).unwrap();
		assert_eq!(a, b);
	}
}
