//! Printer model table (spec.md §3/§4.B), seeded with two demonstration
//! families so the registry and `verify()`/`print()` paths are exercised
//! end to end without needing real vendor capability tables (out of
//! scope per spec.md §1): a generic ESC/P2 raster inkjet, and a generic
//! 1-bit thermal printer grounded on `ppa6`'s fixed 384px/8-dot-per-byte
//! head.

use crate::error::Result;
use crate::image::ImageSource;
use crate::print;
use crate::sink::OutputSink;
use crate::vars::Vars;

/// Function-pointer table standing in for the original's per-driver
/// `family_t` of callbacks (`print-escp2.c`'s `canon_escp2_printfuncs`
/// and siblings), one instance per printer model in [`TABLE`].
pub struct PrinterVtable {
	pub parameters: fn(&Printer, &Vars, &str) -> Vec<(String, String)>,
	pub media_size: fn(&Printer, &Vars) -> (i32, i32),
	pub imageable_area: fn(&Printer, &Vars) -> (i32, i32, i32, i32),
	pub limit: fn(&Printer) -> (i32, i32),
	pub default_parameters: fn(&Printer) -> Vars,
	pub describe_resolution: fn(&Printer, &str) -> Option<(u32, u32)>,
	pub verify: fn(&Printer, &Vars) -> bool,
	pub print: fn(&'static Printer, &Vars, &mut dyn ImageSource, &mut dyn OutputSink) -> Result<()>,
}

pub struct Printer {
	pub driver_id: &'static str,
	pub long_name: &'static str,
	pub manufacturer: &'static str,
	pub model: i32,
	pub max_width_dots: u32,
	pub resolutions: &'static [(&'static str, u32, u32)],
	pub media_types: &'static [&'static str],
	pub media_sources: &'static [&'static str],
	pub ink_types: &'static [&'static str],
	pub vtable: PrinterVtable,
}

fn escp2_parameters(printer: &Printer, _vars: &Vars, name: &str) -> Vec<(String, String)> {
	match name {
		"Resolution" => printer.resolutions.iter().map(|&(id, ..)| (id.to_string(), id.to_string())).collect(),
		"MediaType" => printer.media_types.iter().map(|&m| (m.to_string(), m.to_string())).collect(),
		"InputSlot" => printer.media_sources.iter().map(|&m| (m.to_string(), m.to_string())).collect(),
		"InkType" => printer.ink_types.iter().map(|&m| (m.to_string(), m.to_string())).collect(),
		"PageSize" => crate::registry::papersizes().iter().map(|p| (p.name.to_string(), p.display_text.to_string())).collect(),
		_ => Vec::new(),
	}
}

fn escp2_media_size(_printer: &Printer, vars: &Vars) -> (i32, i32) {
	match crate::registry::papersize_by_name(&vars.get_str("media_size")) {
		Some(p) => (p.width as i32, p.height as i32),
		None => (612, 792),
	}
}

fn escp2_imageable_area(printer: &Printer, vars: &Vars) -> (i32, i32, i32, i32) {
	let (w, h) = (printer.vtable.media_size)(printer, vars);
	(18, 18, w - 18, h - 18)
}

fn escp2_limit(printer: &Printer) -> (i32, i32) {
	(printer.max_width_dots as i32, 0)
}

fn escp2_default_parameters(_printer: &Printer) -> Vars {
	Vars::default_vars()
}

fn escp2_describe_resolution(printer: &Printer, name: &str) -> Option<(u32, u32)> {
	printer.resolutions.iter().find(|&&(id, ..)| id == name).map(|&(_, x, y)| (x, y))
}

fn escp2_verify(printer: &Printer, vars: &Vars) -> bool {
	Vars::default_min_max_validate(printer, vars).is_ok()
}

fn thermal_parameters(printer: &Printer, _vars: &Vars, name: &str) -> Vec<(String, String)> {
	match name {
		"Resolution" => printer.resolutions.iter().map(|&(id, ..)| (id.to_string(), id.to_string())).collect(),
		"PageSize" => vec![("Roll".to_string(), "Continuous roll".to_string())],
		_ => Vec::new(),
	}
}

fn thermal_media_size(printer: &Printer, _vars: &Vars) -> (i32, i32) {
	(printer.max_width_dots as i32, 0)
}

fn thermal_imageable_area(printer: &Printer, vars: &Vars) -> (i32, i32, i32, i32) {
	let (w, _h) = (printer.vtable.media_size)(printer, vars);
	(0, 0, w, 0)
}

fn thermal_limit(printer: &Printer) -> (i32, i32) {
	(printer.max_width_dots as i32, 0)
}

fn thermal_default_parameters(_printer: &Printer) -> Vars {
	let mut vars = Vars::default_vars();
	vars.set_str("media_size", "Roll");
	vars
}

fn thermal_describe_resolution(printer: &Printer, name: &str) -> Option<(u32, u32)> {
	printer.resolutions.iter().find(|&&(id, ..)| id == name).map(|&(_, x, y)| (x, y))
}

fn thermal_verify(printer: &Printer, vars: &Vars) -> bool {
	Vars::default_min_max_validate(printer, vars).is_ok()
}

pub(super) static TABLE: &[Printer] = &[
	Printer {
		driver_id: "escp2-generic",
		long_name: "Generic ESC/P2 Inkjet",
		manufacturer: "Generic",
		model: 1,
		max_width_dots: 1440 * 8,
		resolutions: &[("180x180", 180, 180), ("360x360", 360, 360), ("720x720", 720, 720)],
		media_types: &["Plain", "Glossy", "Matte"],
		media_sources: &["Auto", "Tray1", "Manual"],
		ink_types: &["CMYK", "CMYK+LcLm"],
		vtable: PrinterVtable {
			parameters: escp2_parameters,
			media_size: escp2_media_size,
			imageable_area: escp2_imageable_area,
			limit: escp2_limit,
			default_parameters: escp2_default_parameters,
			describe_resolution: escp2_describe_resolution,
			verify: escp2_verify,
			print: print::print_escp2,
		},
	},
	Printer {
		driver_id: "thermal-384",
		long_name: "Generic 384px Thermal Printer",
		manufacturer: "Generic",
		model: 2,
		max_width_dots: crate::drivers::thermal::THERMAL_WIDTH_DOTS,
		resolutions: &[("203x203", 203, 203)],
		media_types: &["Thermal"],
		media_sources: &["Roll"],
		ink_types: &["K"],
		vtable: PrinterVtable {
			parameters: thermal_parameters,
			media_size: thermal_media_size,
			imageable_area: thermal_imageable_area,
			limit: thermal_limit,
			default_parameters: thermal_default_parameters,
			describe_resolution: thermal_describe_resolution,
			verify: thermal_verify,
			print: print::print_thermal,
		},
	},
];

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escp2_resolution_lookup() {
		let printer = &TABLE[0];
		let list = (printer.vtable.parameters)(printer, &Vars::default_vars(), "Resolution");
		assert!(list.iter().any(|(id, _)| id == "360x360"));
		assert_eq!((printer.vtable.describe_resolution)(printer, "360x360"), Some((360, 360)));
	}

	#[test]
	fn thermal_limit_matches_head_width() {
		let printer = &TABLE[1];
		assert_eq!((printer.vtable.limit)(printer).0, 384);
	}
}
