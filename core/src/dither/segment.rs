//! Per-ink drop-size partitions (spec.md §3: `DitherSegment`/`DitherColor`).
//!
//! Grounded on `print.h`'s `simple_dither_range_t`/`dither_range_t`/
//! `full_dither_range_t` and `print-dither.c`'s `dither_set_ranges*`
//! family; collapsed here into one builder per input shape instead of
//! four near-duplicate C entry points.

use crate::error::DitherError;

/// One contiguous sub-range of the 0..65535 input axis for a single ink
/// channel.
#[derive(Debug, Clone, Copy)]
pub struct DitherSegment {
	pub range_l: u32,
	pub range_h: u32,
	/// "Virtual ink amount" of the lower/upper drop-size option.
	pub value_l: u32,
	pub value_h: u32,
	pub bits_l: u32,
	pub bits_h: u32,
	pub is_dark_l: bool,
	pub is_dark_h: bool,
	pub range_span: u32,
	pub value_span: i64,
}

impl DitherSegment {
	fn new(range_l: u32, range_h: u32, value_l: u32, value_h: u32, bits_l: u32, bits_h: u32, is_dark_l: bool, is_dark_h: bool) -> Self {
		DitherSegment {
			range_l,
			range_h,
			value_l,
			value_h,
			bits_l,
			bits_h,
			is_dark_l,
			is_dark_h,
			range_span: range_h - range_l,
			value_span: value_h as i64 - value_l as i64,
		}
	}
}

/// Per-ink-channel dither state: a sorted, total partition of
/// `[0, 65535]` plus the bit depth of the output plane.
#[derive(Debug, Clone)]
pub struct DitherColor {
	pub nlevels: usize,
	pub bit_max: u32,
	pub signif_bits: u32,
	pub ranges: Vec<DitherSegment>,
}

impl DitherColor {
	/// `dither_set_ranges_simple`: one drop size per level, light-ink
	/// variants absent. `levels` gives, for each level from lightest to
	/// darkest, `(value, bit_pattern)`; a level 0 entry (no dot) is
	/// synthesized automatically.
	pub fn set_ranges_simple(levels: &[(f64, u32)], density: f64) -> Result<Self, DitherError> {
		if levels.is_empty() {
			return Err(DitherError::EmptyRanges(0));
		}
		let n = levels.len();
		let mut ranges = Vec::with_capacity(n);
		let span = 65536.0 / n as f64;
		let max_value = (density * 65535.0) as u32;
		for (i, &(value, bits)) in levels.iter().enumerate() {
			let range_l = (i as f64 * span).round() as u32;
			let range_h = if i + 1 == n { 65535 } else { ((i + 1) as f64 * span).round() as u32 };
			let value_l = if i == 0 { 0 } else { (levels[i - 1].0 * max_value as f64) as u32 };
			let value_h = (value * max_value as f64) as u32;
			let bits_l = if i == 0 { 0 } else { levels[i - 1].1 };
			ranges.push(DitherSegment::new(range_l, range_h, value_l, value_h, bits_l, bits, false, false));
		}
		let bit_max = levels.iter().map(|&(_, b)| b).max().unwrap_or(0);
		let signif_bits = 32 - bit_max.leading_zeros().min(32);
		let color = DitherColor { nlevels: n, bit_max, signif_bits: signif_bits.max(1), ranges };
		color.validate()?;
		Ok(color)
	}

	/// `dither_set_ranges_full`: explicit light/dark drop pairs per
	/// segment, used for inks with a light-ink variant (light
	/// cyan/magenta).
	pub fn set_ranges_full(
		segments: &[(u32, u32, u32, u32, u32, u32, bool, bool)],
	) -> Result<Self, DitherError> {
		if segments.is_empty() {
			return Err(DitherError::EmptyRanges(0));
		}
		let ranges: Vec<DitherSegment> = segments
			.iter()
			.map(|&(rl, rh, vl, vh, bl, bh, dl, dh)| DitherSegment::new(rl, rh, vl, vh, bl, bh, dl, dh))
			.collect();
		let bit_max = ranges.iter().map(|r| r.bits_h.max(r.bits_l)).max().unwrap_or(0);
		let signif_bits = (32 - bit_max.leading_zeros().min(32)).max(1);
		let color = DitherColor { nlevels: ranges.len(), bit_max, signif_bits, ranges };
		color.validate()?;
		Ok(color)
	}

	/// `dither_set_ranges_complete`: same explicit-segment shape as
	/// [`Self::set_ranges_full`] but accepting segments that were
	/// precomputed wholesale (e.g. loaded from a printer's static ink
	/// table) rather than built one level at a time. Gutenprint exposes
	/// both entry points for the same underlying `dither_range_t`
	/// layout; kept distinct here for callers that want the
	/// "full table, already sorted" contract documented separately from
	/// the incremental one.
	pub fn set_ranges_complete(
		segments: &[(u32, u32, u32, u32, u32, u32, bool, bool)],
	) -> Result<Self, DitherError> {
		Self::set_ranges_full(segments)
	}

	/// Checks the partition invariant from spec.md §8: sorted, gap- and
	/// overlap-free, covering the whole `[0,65535]` input range.
	pub fn validate(&self) -> Result<(), DitherError> {
		if self.ranges.is_empty() {
			return Err(DitherError::EmptyRanges(0));
		}
		if self.ranges[0].range_l != 0 {
			return Err(DitherError::BadRanges { channel: 0, index: 0 });
		}
		for (i, w) in self.ranges.windows(2).enumerate() {
			if w[0].range_h != w[1].range_l || w[0].range_l >= w[0].range_h {
				return Err(DitherError::BadRanges { channel: 0, index: i });
			}
		}
		if self.ranges.last().unwrap().range_h != 65535 {
			return Err(DitherError::BadRanges { channel: 0, index: self.ranges.len() - 1 });
		}
		Ok(())
	}

	/// Walk the segment table top-down to find the segment whose
	/// `range_l < density <= range_h` (spec.md §4.G step 1); the first
	/// segment also accepts `density == 0`.
	pub fn find_segment(&self, density: u32) -> &DitherSegment {
		for (i, seg) in self.ranges.iter().enumerate().rev() {
			if density > seg.range_l || i == 0 {
				return seg;
			}
		}
		unreachable!("ranges always cover 0..=65535")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn simple_ranges_partition_the_whole_axis() {
		let color = DitherColor::set_ranges_simple(&[(0.3, 1), (0.6, 2), (1.0, 3)], 1.0).unwrap();
		assert!(color.validate().is_ok());
		assert_eq!(color.ranges.first().unwrap().range_l, 0);
		assert_eq!(color.ranges.last().unwrap().range_h, 65535);
	}

	#[test]
	fn find_segment_picks_correct_bucket() {
		let color = DitherColor::set_ranges_simple(&[(0.5, 1), (1.0, 2)], 1.0).unwrap();
		let lo = color.find_segment(0);
		assert_eq!(lo.bits_h, 1);
		let hi = color.find_segment(65000);
		assert_eq!(hi.bits_h, 2);
	}
}
