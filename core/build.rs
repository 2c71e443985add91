//! Generates ordered-dither threshold matrices at build time.
//!
//! `original_source/print-dither.c`'s `CALC_MATRIX` macro and friends
//! build these bases-2/3/5 iterated matrices once at page-init time and
//! cache them for the life of the process. REDESIGN FLAGS (spec.md §9)
//! calls that out as unnecessary recomputation: the matrices depend only
//! on `(base, order)`, both compile-time constants here, so they are
//! generated once into `OUT_DIR/ordered_matrices.rs` and `include!`d as
//! `&'static [u16]` tables by `dither::matrix`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// `(base, max_order)` pairs mirroring the original's base-2/3/5 banks.
const BANKS: &[(u32, u32)] = &[(2, 4), (3, 3), (5, 2)];

fn main() {
	let out_dir = env::var("OUT_DIR").unwrap();
	let dest = Path::new(&out_dir).join("ordered_matrices.rs");

	let mut src = String::new();
	let mut index_entries = Vec::new();

	for &(base, max_order) in BANKS {
		for order in 1..=max_order {
			let matrix = build_matrix(base, order);
			let ident = format!("MATRIX_{base}_{order}");
			writeln!(src, "pub static {ident}: [u16; {}] = {:?};", matrix.len(), matrix).unwrap();
			index_entries.push((base, order, ident));
		}
	}

	writeln!(src, "pub fn matrix_for(base: u32, order: u32) -> Option<&'static [u16]> {{").unwrap();
	writeln!(src, "\tmatch (base, order) {{").unwrap();
	for (base, order, ident) in &index_entries {
		writeln!(src, "\t\t({base}, {order}) => Some(&{ident}),").unwrap();
	}
	writeln!(src, "\t\t_ => None,").unwrap();
	writeln!(src, "\t}}").unwrap();
	writeln!(src, "}}").unwrap();

	fs::write(&dest, src).expect("failed to write generated ordered_matrices.rs");
	println!("cargo:rerun-if-changed=build.rs");
}

/// Generalized Bayer-matrix construction: digits of `x`/`y` in base
/// `base` are interleaved and then digit-reversed in base `base^2`,
/// which disperses the thresholds the same way the classic recursive
/// 2x2 block substitution does for `base == 2`.
fn build_matrix(base: u32, order: u32) -> Vec<u16> {
	let size = base.pow(order);
	let mut m = vec![0u32; (size * size) as usize];
	for y in 0..size {
		for x in 0..size {
			let mut xx = x;
			let mut yy = y;
			let mut place = 1u32;
			let mut interleaved = 0u32;
			for _ in 0..order {
				let dx = xx % base;
				let dy = yy % base;
				xx /= base;
				yy /= base;
				interleaved += (dy * base + dx) * place;
				place *= base * base;
			}
			let reversed = digit_reverse(interleaved, base * base, order);
			m[(y * size + x) as usize] = reversed;
		}
	}
	// Normalize into 0..size*size-1 so the matrix is a permutation usable
	// directly as a threshold table against a 16-bit pixel value.
	let max = m.iter().copied().max().unwrap_or(0).max(1);
	m.into_iter().map(|v| (v as u64 * 65535 / max as u64) as u16).collect()
}

fn digit_reverse(mut x: u32, radix: u32, digits: u32) -> u32 {
	let mut r = 0;
	for _ in 0..digits {
		r = r * radix + x % radix;
		x /= radix;
	}
	r
}
