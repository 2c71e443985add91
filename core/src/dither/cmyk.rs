//! `dither_cmyk`: the K-vs-CMY substitution pipeline (spec.md §4.G,
//! whole-row algorithm). Grounded on `original_source/print-dither.c`'s
//! `dither_cmyk` and the `print_color`/`update_dither` helpers it calls
//! for every pixel; kept as its own type rather than folded into
//! [`crate::dither::Dither`] because the K/CMY substitution, darkness
//! cross-terms and light-ink routing have no equivalent in the generic
//! single-channel path that [`crate::dither::Dither::dither_row`]
//! serves (used directly by single-ink printers such as the thermal
//! family).

use rand::Rng;

use crate::dither::cursor::ChannelCursors;
use crate::dither::matrix::OrderedMatrix;
use crate::dither::segment::DitherColor;
use crate::error::DitherError;

/// Selects which ink-darkness/randomizer slot a setter addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
	Cyan = 0,
	Magenta = 1,
	Yellow = 2,
	Black = 3,
	LightCyan = 4,
	LightMagenta = 5,
}

const NINK: usize = 6;

/// The six dither strategies `dither_cmyk` can select between, distinct
/// from [`crate::dither::DitherAlgorithm`] (the simpler single-strategy
/// set used by the generic single-channel [`crate::dither::Dither`]
/// path serving mono/thermal printers). Grounded on
/// `original_source/print-dither.h`'s `dither_algo_t` table, which lists
/// exactly these six for multi-ink printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmykAlgorithm {
	Floyd,
	HybridFloyd,
	Ordered,
	OrderedPerturbed,
	AdaptiveHybrid,
	AdaptiveRandom,
}

/// Per-page tunables spec.md §3 lists under "Dither context": density,
/// K transition thresholds, per-ink randomizer/darkness, and the
/// error-diffusion spread breadth.
#[derive(Debug, Clone, Copy)]
struct CmykConfig {
	/// Overall ink density, scaled to 65536 (spec.md: "density(scaled
	/// to 65536)").
	density: u32,
	/// Black-specific density scale, applied only to the K channel
	/// (`set_black_density`).
	black_density: u32,
	/// K-vs-CMY transition thresholds, scaled to 65536.
	k_lower: u32,
	k_upper: u32,
	/// Sharpens or softens the probabilistic K/CMY transition band
	/// (`set_transition`); 1.0 reproduces the unmodified band width.
	transition: f64,
	/// Contribution of a placed K dot subtracted back out of C/M/Y, in
	/// 64ths (`set_black_level`).
	k_level: [u32; 3],
	/// Per-ink darkness cross-term, in 64ths (`set_ink_darkness`).
	ink_darkness: [u32; NINK],
	/// Per-ink randomizer, 0..65536 (`set_randomizer`).
	randomizer: [u32; NINK],
	/// Error-diffusion spread breadth, 12..19 (`set_ink_spread`).
	spread: u32,
}

impl Default for CmykConfig {
	fn default() -> Self {
		CmykConfig {
			density: 65536,
			black_density: 65536,
			k_lower: 0,
			k_upper: 65536,
			transition: 1.0,
			k_level: [0; 3],
			ink_darkness: [0; NINK],
			randomizer: [65536; NINK],
			spread: 13,
		}
	}
}

/// One bit-plane pass of output: a per-pixel drop-size code for every
/// configured ink.
#[derive(Debug, Clone)]
pub struct CmykPlanes {
	pub cyan: Vec<u32>,
	pub magenta: Vec<u32>,
	pub yellow: Vec<u32>,
	pub black: Vec<u32>,
	pub light_cyan: Option<Vec<u32>>,
	pub light_magenta: Option<Vec<u32>>,
}

/// The K/CMY-substituting multi-ink dither engine (spec.md §4.G
/// `dither_cmyk`). `init` takes the page geometry; ink ranges are then
/// installed with `set_ranges_*` on each channel before the first
/// `dither_cmyk` call.
pub struct CmykDither {
	width: usize,
	cyan: DitherColor,
	magenta: DitherColor,
	yellow: DitherColor,
	black: DitherColor,
	light_cyan: Option<DitherColor>,
	light_magenta: Option<DitherColor>,
	algorithm: CmykAlgorithm,
	matrix0: Option<OrderedMatrix>,
	matrix3: Option<OrderedMatrix>,
	config: CmykConfig,
	row_index: u32,
	/// One error-carry row per ink slot; `errs[y&1]` is "current",
	/// `errs[(y+1)&1]` is "next" (spec.md §3/§8 error-ring invariant).
	errs: [[Vec<i32>; NINK]; 2],
}

/// Adaptive-hybrid/adaptive-random demotion threshold below which a
/// pixel may fall back to the ordered matrix (spec.md §4.G step 2).
const ADAPTIVE_LIMIT: u32 = 32768;
const ADAPTIVE_DIVISOR: u32 = 4;
/// Randomizer taper-off point for ORDERED/ORDERED_PERTURBED (step 5).
const D_CUTOFF: u32 = 16384;

impl CmykDither {
	/// `init(src_width, dst_width, x_aspect, y_aspect, vars)`: only
	/// `dst_width` (the output row length the dither engine itself
	/// operates on) matters here, the resampling implied by
	/// `src_width`/aspect ratios happens upstream in the image/color
	/// stages before a row ever reaches the dither engine.
	pub fn init(
		dst_width: usize,
		cyan: DitherColor,
		magenta: DitherColor,
		yellow: DitherColor,
		black: DitherColor,
		algorithm: CmykAlgorithm,
		matrix0: Option<OrderedMatrix>,
		matrix3: Option<OrderedMatrix>,
	) -> Self {
		CmykDither {
			width: dst_width,
			cyan,
			magenta,
			yellow,
			black,
			light_cyan: None,
			light_magenta: None,
			algorithm,
			matrix0,
			matrix3,
			config: CmykConfig::default(),
			row_index: 0,
			errs: Default::default(),
		}
	}

	fn ensure_errs_sized(&mut self) {
		for half in &mut self.errs {
			for slot in half.iter_mut() {
				if slot.len() != self.width {
					*slot = vec![0i32; self.width];
				}
			}
		}
	}

	pub fn set_density(&mut self, density: f64) {
		self.config.density = (density.clamp(0.0, 1.0) * 65536.0) as u32;
	}

	pub fn set_black_density(&mut self, density: f64) {
		self.config.black_density = (density.clamp(0.0, 1.0) * 65536.0) as u32;
	}

	pub fn set_transition(&mut self, transition: f64) {
		self.config.transition = transition;
	}

	pub fn set_black_lower(&mut self, v: f64) {
		self.config.k_lower = (v.clamp(0.0, 1.0) * 65536.0) as u32;
	}

	pub fn set_black_upper(&mut self, v: f64) {
		self.config.k_upper = (v.clamp(0.0, 1.0) * 65536.0) as u32;
	}

	/// `set_black_level`: how much of a placed K dot's value is
	/// subtracted back out of the companion C/M/Y channels, in 64ths.
	pub fn set_black_level(&mut self, c: f64, m: f64, y: f64) {
		self.config.k_level = [(c * 64.0) as u32, (m * 64.0) as u32, (y * 64.0) as u32];
	}

	pub fn set_randomizer(&mut self, ink: Ink, v: f64) {
		self.config.randomizer[ink as usize] = (v.clamp(0.0, 1.0) * 65536.0) as u32;
	}

	pub fn set_ink_darkness(&mut self, ink: Ink, v: f64) {
		self.config.ink_darkness[ink as usize] = (v * 64.0) as u32;
	}

	pub fn set_ink_spread(&mut self, spread: u32) {
		self.config.spread = spread.clamp(12, 19);
	}

	/// Installs a light-ink variant plane (light cyan or light magenta);
	/// absent by default, matching spec.md's "Light ink: ... routed to
	/// a separate plane" description of an optional capability.
	pub fn set_light_ink(&mut self, ink: Ink, color: DitherColor) {
		match ink {
			Ink::LightCyan => self.light_cyan = Some(color),
			Ink::LightMagenta => self.light_magenta = Some(color),
			_ => panic!("set_light_ink only applies to LightCyan/LightMagenta"),
		}
	}

	/// Whole-row algorithm: spec.md §4.G `dither_cmyk`. `row` holds
	/// `width` LUT-corrected RGB triples; `direction` is `1` for
	/// left-to-right, `-1` for the boustrophedon return pass.
	pub fn dither_cmyk(&mut self, row: &[[u16; 3]], direction: i32) -> Result<CmykPlanes, DitherError> {
		if row.len() != self.width {
			return Err(DitherError::RowLength { expected: self.width, got: row.len() });
		}
		self.ensure_errs_sized();

		let mut planes = CmykPlanes {
			cyan: vec![0u32; self.width],
			magenta: vec![0u32; self.width],
			yellow: vec![0u32; self.width],
			black: vec![0u32; self.width],
			light_cyan: self.light_cyan.as_ref().map(|_| vec![0u32; self.width]),
			light_magenta: self.light_magenta.as_ref().map(|_| vec![0u32; self.width]),
		};

		let cur = (self.row_index & 1) as usize;
		let nxt = 1 - cur;
		let mut rng = rand::thread_rng();
		let mut cursor = ChannelCursors::new(self.width, direction);

		while cursor.in_bounds() {
			let x = cursor.pos();
			let px = row[x];
			let c0 = 65535i32 - px[0] as i32;
			let m0 = 65535i32 - px[1] as i32;
			let y0 = 65535i32 - px[2] as i32;
			let k0 = c0.min(m0).min(y0);

			// Step 3: black-strength diff = (65536 - mean abs pairwise
			// distance)^3 >> 32, on 64-bit intermediate arithmetic
			// regardless of host width (spec.md §9 Open Questions).
			let spread3 = ((c0 - m0).abs() + (c0 - y0).abs() + (m0 - y0).abs()) / 3;
			let base = (65536 - spread3).clamp(0, 65536) as u64;
			let diff = ((base * base * base) >> 32) as i64;
			let k_eff = ((k0 as i64 * diff) / 65536).clamp(0, 65535) as i32;

			let c_in = c0 + self.errs[cur][Ink::Cyan as usize][x];
			let m_in = m0 + self.errs[cur][Ink::Magenta as usize][x];
			let y_in = y0 + self.errs[cur][Ink::Yellow as usize][x];
			let k_in = k_eff + self.errs[cur][Ink::Black as usize][x];

			// Step 4: choose K vs CMY for this pixel.
			let kdarkness = k_eff.clamp(0, 65535) as u32;
			let place_k = if kdarkness <= self.config.k_lower {
				false
			} else if kdarkness >= self.config.k_upper {
				true
			} else {
				let span = (self.config.k_upper - self.config.k_lower).max(1);
				let frac = (((kdarkness - self.config.k_lower) as u64 * 65536) / span as u64) as u32;
				let sharpened = ((frac as f64) * self.config.transition).clamp(0.0, 65536.0) as u32;
				let threshold = transition_threshold(self.algorithm, &self.matrix0, x as u32, self.row_index, &mut rng);
				sharpened > threshold
			};

			let (k_bits, k_value, k_residual) = if place_k {
				let density = scale_density(k_in.clamp(0, 65535) as u32, self.config.black_density);
				let (bits, value, residual, _dark) = print_color(
					&self.black,
					density,
					k_in,
					x as u32,
					self.row_index,
					self.algorithm,
					self.config.randomizer[Ink::Black as usize],
					self.matrix0.as_ref(),
					self.matrix3.as_ref(),
					false,
					false,
					&mut rng,
				);
				(bits, value, residual)
			} else {
				(0u32, 0u32, k_in)
			};
			planes.black[x] = k_bits;
			update_dither(&mut self.errs[nxt][Ink::Black as usize], x, self.width, direction, k0 as u32, k_residual, self.config.spread, &mut rng);

			// Step 5: subtract the placed K dot's contribution back out
			// of C/M/Y, in 64ths.
			let bk = k_value as i32;
			let c = c_in - (self.config.k_level[0] as i32 * bk) / 64;
			let m = m_in - (self.config.k_level[1] as i32 * bk) / 64;
			let y = y_in - (self.config.k_level[2] as i32 * bk) / 64;

			// Step 6: UPDATE_COLOR cross term from the two companion
			// channels' *current* carried values (before this pixel's
			// own placement), mirrored here as the densities already
			// folded into c/m/y above.
			let darkness_c = self.config.ink_darkness[Ink::Cyan as usize] as i32;
			let darkness_m = self.config.ink_darkness[Ink::Magenta as usize] as i32;
			let darkness_y = self.config.ink_darkness[Ink::Yellow as usize] as i32;

			let c_density_eff = c + ((m * darkness_m + y * darkness_y) >> 7);
			let m_density_eff = m + ((c * darkness_c + y * darkness_y) >> 7);
			let y_density_eff = y + ((c * darkness_c + m * darkness_m) >> 7);

			let (c_bits, c_value, c_residual) = self.print_ink(
				Ink::Cyan,
				&self.cyan,
				self.light_cyan.as_ref(),
				c,
				c_density_eff,
				x,
				&mut rng,
				&mut planes.cyan,
				&mut planes.light_cyan,
			);
			let _ = c_value;
			update_dither(&mut self.errs[nxt][Ink::Cyan as usize], x, self.width, direction, c0.max(0) as u32, c_residual, self.config.spread, &mut rng);
			let _ = c_bits;

			let (_, _, m_residual) = self.print_ink(
				Ink::Magenta,
				&self.magenta,
				self.light_magenta.as_ref(),
				m,
				m_density_eff,
				x,
				&mut rng,
				&mut planes.magenta,
				&mut planes.light_magenta,
			);
			update_dither(&mut self.errs[nxt][Ink::Magenta as usize], x, self.width, direction, m0.max(0) as u32, m_residual, self.config.spread, &mut rng);

			let (_, _, y_residual) = self.print_ink(Ink::Yellow, &self.yellow, None, y, y_density_eff, x, &mut rng, &mut planes.yellow, &mut None);
			update_dither(&mut self.errs[nxt][Ink::Yellow as usize], x, self.width, direction, y0.max(0) as u32, y_residual, self.config.spread, &mut rng);

			cursor.advance();
		}

		// Error-ring invariant (spec.md §8): after processing row y,
		// errs[y&1] (the row just consumed) is zeroed.
		for slot in &mut self.errs[cur] {
			slot.iter_mut().for_each(|e| *e = 0);
		}
		self.row_index = self.row_index.wrapping_add(1);
		Ok(planes)
	}

	/// Prints one C/M/Y ink, routing to the light-ink plane when the
	/// chosen segment's `is_dark` flag says so and a light variant is
	/// configured (spec.md §3 `DitherSegment::is_dark_l/is_dark_h`).
	#[allow(clippy::too_many_arguments)]
	fn print_ink(
		&self,
		ink: Ink,
		dark: &DitherColor,
		light: Option<&DitherColor>,
		carried_value: i32,
		density_arg: i32,
		x: usize,
		rng: &mut impl Rng,
		dark_plane: &mut [u32],
		light_plane: &mut Option<Vec<u32>>,
	) -> (u32, u32, i32) {
		let density = scale_density(density_arg.clamp(0, 65535) as u32, self.config.density);
		let (bits, value, residual, is_dark) = print_color(
			dark,
			density,
			carried_value,
			x as u32,
			self.row_index,
			self.algorithm,
			self.config.randomizer[ink as usize],
			self.matrix0.as_ref(),
			self.matrix3.as_ref(),
			false,
			false,
			rng,
		);
		if bits != 0 && !is_dark {
			if let (Some(_lc), Some(plane)) = (light, light_plane.as_mut()) {
				plane[x] = bits;
				return (bits, value, residual);
			}
		}
		dark_plane[x] = bits;
		(bits, value, residual)
	}
}

fn scale_density(value: u32, scale: u32) -> u32 {
	((value as u64 * scale as u64) / 65536).min(65535) as u32
}

/// Resolves the probabilistic K/CMY transition-band draw: a matrix
/// lookup for the ordered family, an RNG draw for everything else
/// (spec.md §4.G step 4: "the threshold random draw uses FLOYD or
/// matrix+perturbation depending on algorithm").
fn transition_threshold(algorithm: CmykAlgorithm, matrix0: &Option<OrderedMatrix>, x: u32, y: u32, rng: &mut impl Rng) -> u32 {
	match algorithm {
		CmykAlgorithm::Ordered | CmykAlgorithm::OrderedPerturbed | CmykAlgorithm::AdaptiveHybrid => {
			matrix0.as_ref().map(|m| m.threshold(x, y) as u32).unwrap_or_else(|| rng.gen_range(0..65536))
		}
		_ => rng.gen_range(0..65536),
	}
}

/// `print_color`: spec.md §4.G's per-pixel segment-table walk, returning
/// `(bits, placed_value, residual, is_dark)`.
#[allow(clippy::too_many_arguments)]
fn print_color(
	color: &DitherColor,
	density: u32,
	adjusted_value: i32,
	x: u32,
	y: u32,
	algorithm: CmykAlgorithm,
	randomizer_setting: u32,
	matrix0: Option<&OrderedMatrix>,
	matrix3: Option<&OrderedMatrix>,
	invert_x: bool,
	invert_y: bool,
	rng: &mut impl Rng,
) -> (u32, u32, i32, bool) {
	// Step 1.
	let density = density.min(65536);
	let seg = color.find_segment(density.min(65535));

	// Step 2: adaptive demotion to ORDERED.
	let mut eff_algo = match algorithm {
		CmykAlgorithm::AdaptiveHybrid => CmykAlgorithm::HybridFloyd,
		CmykAlgorithm::AdaptiveRandom => CmykAlgorithm::Floyd,
		other => other,
	};
	if matches!(algorithm, CmykAlgorithm::AdaptiveHybrid | CmykAlgorithm::AdaptiveRandom) && density < ADAPTIVE_LIMIT {
		let demote_threshold = if density == 0 { 0 } else { ADAPTIVE_DIVISOR * 65536 };
		if (rng.gen::<u32>() & 0xfff000) > demote_threshold {
			eff_algo = CmykAlgorithm::Ordered;
		}
	}

	// Step 3.
	let rangepoint: u32 = if seg.range_span == 0 {
		32768
	} else {
		(((density.saturating_sub(seg.range_l)) as u64 * 65536) / seg.range_span as u64) as u32
	};

	// Step 4.
	let virtual_value: u32 = if seg.value_span == 0 {
		seg.value_l
	} else {
		(seg.value_l as i64 + (seg.value_span * rangepoint as i64) / 65536) as u32
	};

	// A segment whose selected drop size is "no ink" has nothing left to
	// randomize a placement decision around; short-circuit rather than
	// let an adjusted_value of exactly 0 tie-break into a spurious dot.
	if virtual_value == 0 {
		return (0, 0, adjusted_value, true);
	}

	// Step 6: coordinate twist to decorrelate shared matrices across channels.
	let (mx, my) = if invert_y { (y, x) } else { (x, y) };

	// Step 5 + 7 + 8: vmatrix.
	let vmatrix: i64 = if randomizer_setting == 0 {
		virtual_value as i64 / 2
	} else {
		let raw: u32 = match eff_algo {
			CmykAlgorithm::Floyd | CmykAlgorithm::AdaptiveRandom => {
				let r1 = rng.gen_range(0..65536u32);
				let r2 = rng.gen_range(0..65536u32);
				(r1 + r2) / 2
			}
			CmykAlgorithm::HybridFloyd | CmykAlgorithm::AdaptiveHybrid => {
				let m1 = matrix0.map(|m| m.threshold(mx, my) as u32).unwrap_or(32768);
				let m2 = matrix3.map(|m| m.threshold(mx.wrapping_add(7), my.wrapping_add(13)) as u32).unwrap_or(32768);
				m1 ^ m2
			}
			CmykAlgorithm::Ordered | CmykAlgorithm::OrderedPerturbed => {
				// Both ordered variants are purely matrix-driven, no RNG
				// draw, so a page dithers identically across runs;
				// OrderedPerturbed offsets the lookup coordinate by a
				// position-dependent (not random) amount to break up the
				// matrix's visible periodicity.
				let (tx, ty) = if eff_algo == CmykAlgorithm::OrderedPerturbed {
					(mx.wrapping_add(my / ((mx / 11) % 7 + 3)), my.wrapping_add(mx / ((my / 11) % 7 + 3)))
				} else {
					(mx, my)
				};
				matrix0.map(|m| m.threshold(tx, ty) as u32).unwrap_or(32768)
			}
		};

		// Ordered-family randomizer is always treated as full-scale for
		// the blend step (spec.md step 5: "force ORDERED paths to
		// randomizer=65536"); otherwise taper the noise amplitude
		// toward 0 as density approaches D_CUTOFF.
		let blend_randomizer = if matches!(eff_algo, CmykAlgorithm::Ordered | CmykAlgorithm::OrderedPerturbed) {
			65536
		} else if density > D_CUTOFF / 2 {
			if density >= D_CUTOFF {
				0
			} else {
				let frac = D_CUTOFF - density;
				((randomizer_setting as u64 * frac as u64) / (D_CUTOFF / 2) as u64) as u32
			}
		} else {
			randomizer_setting
		};

		let scaled = (raw as u64 * virtual_value as u64 / 65536) as i64;
		if blend_randomizer < 65536 {
			let vbase = (virtual_value as u64 * (65536 - blend_randomizer) as u64 / 131072) as i64;
			scaled * blend_randomizer as i64 / 65536 + vbase
		} else {
			scaled
		}
	};

	// Step 9.
	let vmatrix = vmatrix.clamp(0, 65536) as u32;
	let vmatrix = if invert_x { 65536 - vmatrix } else { vmatrix };

	// Step 10.
	if adjusted_value >= vmatrix as i32 {
		let dark_matrix_pick = matrix3.map(|m| m.threshold(x, y) as u32).unwrap_or(32768);
		let pick_h = rangepoint >= dark_matrix_pick;
		let (bits, value, is_dark) = if pick_h {
			(seg.bits_h, seg.value_h, seg.is_dark_h)
		} else {
			(seg.bits_l, seg.value_l, seg.is_dark_l)
		};
		(bits, value, adjusted_value - value as i32, is_dark)
	} else {
		(0, 0, adjusted_value, true)
	}
}

/// Redistributes a pixel's residual quantization error over a
/// triangular footprint whose half-width grows as the input pixel `o`
/// gets paler (spec.md §4.G step 8: "paler pixels spread more
/// broadly"), split evenly between the immediate scan-direction
/// neighbor (via `next_row_error`'s own row... actually the immediate
/// neighbor on the *same* row is folded into the next pixel's own
/// `errs[cur]` carry by the caller reading `errs[cur]` fresh every
/// pixel) and the following row, with a small random offset for
/// anti-banding.
fn update_dither(next_row_error: &mut [i32], x: usize, width: usize, direction: i32, o: u32, residual: i32, spread: u32, rng: &mut impl Rng) {
	if residual == 0 {
		return;
	}
	let half_width = (1 + ((65536 - o.min(65536)) * spread / 65536)) as i32;
	let jitter = rng.gen_range(0..3i32) - 1;
	let center = x as i32 + jitter * direction;

	let mut denom = 0i32;
	for k in -half_width..=half_width {
		denom += half_width + 1 - k.abs();
	}
	let denom = denom.max(1);

	for k in -half_width..=half_width {
		let target = center + k * direction;
		if target < 0 || target as usize >= width {
			continue;
		}
		let w = half_width + 1 - k.abs();
		next_row_error[target as usize] += residual * w / denom;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn two_level(d: f64) -> DitherColor {
		DitherColor::set_ranges_simple(&[(0.5, 1), (1.0, 2)], d).unwrap()
	}

	fn dither(algorithm: CmykAlgorithm, width: usize) -> CmykDither {
		CmykDither::init(width, two_level(1.0), two_level(1.0), two_level(1.0), two_level(1.0), algorithm, OrderedMatrix::new(2, 3), OrderedMatrix::new(2, 2))
	}

	#[test]
	fn pure_white_row_places_no_ink() {
		let mut d = dither(CmykAlgorithm::Floyd, 4);
		let row = vec![[65535u16, 65535, 65535]; 4];
		let planes = d.dither_cmyk(&row, 1).unwrap();
		assert!(planes.cyan.iter().all(|&b| b == 0));
		assert!(planes.magenta.iter().all(|&b| b == 0));
		assert!(planes.yellow.iter().all(|&b| b == 0));
		assert!(planes.black.iter().all(|&b| b == 0));
	}

	#[test]
	fn pure_black_row_places_k_and_no_residual_cmy_ink() {
		let mut d = dither(CmykAlgorithm::Floyd, 4);
		d.set_black_lower(0.0);
		d.set_black_upper(0.0);
		let row = vec![[0u16, 0, 0]; 4];
		let planes = d.dither_cmyk(&row, 1).unwrap();
		assert!(planes.black.iter().any(|&b| b != 0));
	}

	#[test]
	fn row_length_mismatch_is_rejected() {
		let mut d = dither(CmykAlgorithm::Ordered, 4);
		let row = vec![[0u16, 0, 0]; 3];
		assert!(d.dither_cmyk(&row, 1).is_err());
	}

	#[test]
	fn error_ring_is_zeroed_after_each_row() {
		let mut d = dither(CmykAlgorithm::Floyd, 4);
		let row = vec![[32768u16, 40000, 20000]; 4];
		d.dither_cmyk(&row, 1).unwrap();
		let cur = (d.row_index.wrapping_sub(1) & 1) as usize;
		assert!(d.errs[cur][Ink::Cyan as usize].iter().all(|&e| e == 0));
	}

	#[test]
	fn ordered_algorithm_is_deterministic_for_identical_rows() {
		let mut a = dither(CmykAlgorithm::Ordered, 4);
		let mut b = dither(CmykAlgorithm::Ordered, 4);
		let row = vec![[32768u16, 32768, 32768]; 4];
		let pa = a.dither_cmyk(&row, 1).unwrap();
		let pb = b.dither_cmyk(&row, 1).unwrap();
		assert_eq!(pa.black, pb.black);
	}
}
