//! Top-level page orchestration (spec.md §4: A-I wired together) and
//! `verify_printer_params` (§7's full-listing diagnostic).
//!
//! Grounded on `ppa6::Printer::print`'s shape — open device, push bytes
//! per chunk, done — generalized into the full color -> dither ->
//! weave -> driver ROW_LOOP the original `print()` entry point runs.

use crate::color::{self, lut::Lut, RemapCurves, ZeroMask};
use crate::config::Config;
use crate::dither::{CmykAlgorithm, CmykDither, Dither, DitherAlgorithm, DitherColor};
use crate::drivers::escp2::Escp2Driver;
use crate::drivers::thermal::{ThermalDriver, THERMAL_WIDTH_DOTS};
use crate::drivers::Driver;
use crate::error::{PrintError, Result};
use crate::image::{ImageSource, RowStatus};
use crate::registry::Printer;
use crate::sink::OutputSink;
use crate::vars::Vars;
use crate::weave::{Softweave, WeaveParams};

/// Which dither strategy a page's pipeline runs: the K/CMY-substituting
/// multi-ink engine for color printers, or the generic single-channel
/// engine for mono/thermal printers that have no K-vs-CMY choice to
/// make.
enum PageDither {
	Cmyk(CmykDither),
	Mono(Dither),
}

/// Per-page pipeline state: the LUT and dither/weave rings live only as
/// long as the page does, replacing the original's explicit
/// alloc/free bracket around `stp_vars_t`'s `driver_data`.
struct PageCtx {
	lut: Lut,
	dither: PageDither,
	weave: Softweave,
}

/// `verify_printer_params`: validates `vars` against `printer` and logs
/// every violation through [`Config::errfunc`] before the caller decides
/// whether to proceed (spec.md §7: parameter errors are reported in
/// full, not one at a time).
pub fn verify_printer_params(printer: &Printer, vars: &Vars) -> bool {
	match Vars::default_min_max_validate(printer, vars) {
		Ok(()) => true,
		Err(errors) => {
			let config = Config::global();
			for e in &errors {
				config.errfunc(&format!("{e}"));
			}
			false
		}
	}
}

fn build_channels(n: usize) -> Vec<DitherColor> {
	(0..n)
		.map(|_| DitherColor::set_ranges_simple(&[(0.5, 1), (1.0, 2)], 1.0).expect("static range table is valid"))
		.collect()
}

/// Packs a dithered row's per-pixel bit codes into MSB-first bytes. Any
/// nonzero code counts as "dot on" for a single-bit plane; higher bit
/// depths would need one call per plane bit, which none of the seeded
/// printer families in [`crate::registry`] currently require.
fn bits_to_bytes(bits: &[u32]) -> Vec<u8> {
	let mut out = vec![0u8; bits.len().div_ceil(8)];
	for (i, &b) in bits.iter().enumerate() {
		if b != 0 {
			out[i / 8] |= 0x80 >> (i % 8);
		}
	}
	out
}

fn run_pipeline(
	vars: &Vars,
	image: &mut dyn ImageSource,
	sink: &mut dyn OutputSink,
	driver: &mut dyn Driver,
	mut ctx: PageCtx,
) -> Result<()> {
	let width = image.width();
	let height = image.height();
	let bpp = image.bpp() as usize;

	driver.init(sink)?;
	driver.start_page(sink, width as u32, height as u32)?;

	let curves = RemapCurves { hue: None, lum: None, sat: None };
	let mut buf = vec![0u8; width as usize * bpp];

	for row in 0..height {
		if image.get_row(&mut buf, buf.len(), row) == RowStatus::Abort {
			return Err(PrintError::ImageAborted(row));
		}

		let (rgb, _mask): (Vec<[u16; 3]>, ZeroMask) = color::rgb_to_rgb(vars, &buf, bpp, width as usize, None, &ctx.lut, &curves);
		let direction = if row % 2 == 0 { 1 } else { -1 };

		let row_bits: Vec<Vec<u32>> = match &mut ctx.dither {
			PageDither::Cmyk(dither) => {
				let planes = dither.dither_cmyk(&rgb, direction)?;
				let mut out = vec![planes.cyan, planes.magenta, planes.yellow, planes.black];
				if let Some(lc) = planes.light_cyan {
					out.push(lc);
				}
				if let Some(lm) = planes.light_magenta {
					out.push(lm);
				}
				out
			}
			PageDither::Mono(dither) => {
				let densities: Vec<Vec<u16>> = (0..dither.channels.len())
					.map(|_| rgb.iter().map(|px| 65535 - px[0].min(px[1]).min(px[2])).collect())
					.collect();
				dither.dither_row(&densities, direction)?
			}
		};

		for (channel, bits) in row_bits.iter().enumerate() {
			let packed = bits_to_bytes(bits);
			if let Some(slot) = ctx.weave.write_row(row, channel, packed)? {
				driver.write_pass(sink, &slot)?;
			}
		}
	}

	for slot in ctx.weave.flush_all() {
		driver.write_pass(sink, &slot)?;
	}

	driver.eject_page(sink)?;
	driver.deinit(sink)?;
	Ok(())
}

/// `PrinterVtable::print` for the generic ESC/P2 inkjet family.
pub fn print_escp2(printer: &'static Printer, vars: &Vars, image: &mut dyn ImageSource, sink: &mut dyn OutputSink) -> Result<()> {
	if !verify_printer_params(printer, vars) {
		return Err(PrintError::InvalidParameters(
			Vars::default_min_max_validate(printer, vars).err().unwrap_or_default(),
		));
	}

	let lut = Lut::compute(256, vars);
	let [cyan, magenta, yellow, black] = build_channels(4).try_into().expect("build_channels(4) returns 4 channels");
	let matrix0 = crate::dither::OrderedMatrix::new(2, 3);
	let matrix3 = crate::dither::OrderedMatrix::new(2, 2);
	let dither = CmykDither::init(image.width() as usize, cyan, magenta, yellow, black, CmykAlgorithm::AdaptiveHybrid, matrix0, matrix3);
	// 4-nozzle head at 2-row pitch: two interleaved passes cover every row,
	// matching the softweave geometry generic ESC/P2 inkjets actually use.
	let weave_params = WeaveParams { jets: 4, separation: 2, oversample: 1 };
	let weave = Softweave::with_last_row(weave_params, 4, image.height() as i32 - 1);

	let mut driver = Escp2Driver::new(180, 180, 1);
	run_pipeline(vars, image, sink, &mut driver, PageCtx { lut, dither: PageDither::Cmyk(dither), weave })
}

/// `PrinterVtable::print` for the generic 384px thermal printer family.
pub fn print_thermal(printer: &'static Printer, vars: &Vars, image: &mut dyn ImageSource, sink: &mut dyn OutputSink) -> Result<()> {
	if !verify_printer_params(printer, vars) {
		return Err(PrintError::InvalidParameters(
			Vars::default_min_max_validate(printer, vars).err().unwrap_or_default(),
		));
	}
	if image.width() as u32 != THERMAL_WIDTH_DOTS {
		return Err(PrintError::Driver(crate::error::DriverError::Unsupported));
	}

	let lut = Lut::compute(256, vars);
	let channels = build_channels(1);
	let dither = Dither::new(image.width() as usize, channels, DitherAlgorithm::OrderedMatrix, crate::dither::OrderedMatrix::new(2, 3));
	// Single-nozzle thermal head: every row is its own pass, no interleave.
	let weave = Softweave::with_last_row(WeaveParams { jets: 1, separation: 1, oversample: 1 }, 1, image.height() as i32 - 1);

	let mut driver = ThermalDriver::new(0x60);
	run_pipeline(vars, image, sink, &mut driver, PageCtx { lut, dither: PageDither::Mono(dither), weave })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::image::MemoryImage;
	use crate::registry;

	#[test]
	fn escp2_prints_a_small_page_end_to_end() {
		let printer = registry::printer_by_driver("escp2-generic").unwrap();
		let mut vars = Vars::default_vars();
		vars.set_str("media_size", "A4");
		vars.set_str("resolution", "180x180");
		let mut image = MemoryImage::new(4, 4, 3, vec![128u8; 4 * 4 * 3]);
		let mut sink: Vec<u8> = Vec::new();
		registry::print(printer, &vars, &mut image, &mut sink).expect("page prints");
		assert!(!sink.is_empty());
	}

	#[test]
	fn thermal_rejects_wrong_width_image() {
		let printer = registry::printer_by_driver("thermal-384").unwrap();
		let vars = Vars::default_vars();
		let mut image = MemoryImage::new(10, 4, 3, vec![0u8; 10 * 4 * 3]);
		let mut sink: Vec<u8> = Vec::new();
		assert!(registry::print(printer, &vars, &mut image, &mut sink).is_err());
	}

	#[test]
	fn invalid_parameters_are_reported_in_full() {
		let printer = registry::printer_by_driver("escp2-generic").unwrap();
		let mut vars = Vars::default_vars();
		vars.set_float("contrast", 99.0);
		vars.set_str("media_type", "NoSuchMedia");
		let mut image = MemoryImage::new(2, 2, 3, vec![0u8; 2 * 2 * 3]);
		let mut sink: Vec<u8> = Vec::new();
		match registry::print(printer, &vars, &mut image, &mut sink) {
			Err(PrintError::InvalidParameters(errors)) => assert!(errors.len() >= 2),
			other => panic!("expected InvalidParameters, got {other:?}"),
		}
	}
}
