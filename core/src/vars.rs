//! The typed settings bag consumed by every stage of the pipeline.
//!
//! The original C implementation (`print.h`'s `vars_t`) hand-wrote a
//! family of accessors per field (`DEF_STRING_FUNCS`, `DEF_FUNCS`,
//! `DEF_SIMPLE_ACCESSOR`). Here that collapses into one tagged [`Setting`]
//! value type plus a small `setting_accessors!` macro that expands into
//! typed getters/setters, the way `ppa6::Error` collapses a family of USB
//! failure modes into one enum.

use std::collections::HashMap;

use crate::error::VarsError;
use crate::registry::Printer;

/// One value held by a [`Vars`] bag. The four cases cover every field
/// spec.md's Data Model lists: strings (free-form or enumerated against
/// a printer's option list), integers (points, flags), floats (gamma,
/// density, ...), and closed enums (orientation, output type, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
	Int(i32),
	Float(f64),
	Str(String),
	Enum(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
	Gray,
	Color,
	Monochrome,
	RawCmyk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
	Auto,
	Portrait,
	Landscape,
	Upsidedown,
	Seascape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
	LineArt,
	SolidTone,
	Continuous,
	Monochrome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
	Rgb,
	Cmy,
}

/// The configuration bag threaded through the whole pipeline. Copy-on-pass,
/// exclusively owned by the caller per spec.md §5: `print()` takes a
/// snapshot at entry and never mutates the caller's copy.
#[derive(Debug, Clone)]
pub struct Vars {
	fields: HashMap<&'static str, Setting>,
}

impl Vars {
	pub fn empty() -> Self {
		Vars { fields: HashMap::new() }
	}

	/// Manufacturer-neutral factory defaults (spec.md §3: `default`).
	pub fn default_vars() -> Self {
		let mut v = Vars::empty();
		v.fields.insert("output_to", Setting::Str(String::new()));
		v.fields.insert("driver", Setting::Str(String::new()));
		v.fields.insert("ppd_file", Setting::Str(String::new()));
		v.fields.insert("resolution", Setting::Str(String::new()));
		v.fields.insert("media_size", Setting::Str(String::new()));
		v.fields.insert("media_type", Setting::Str(String::new()));
		v.fields.insert("media_source", Setting::Str(String::new()));
		v.fields.insert("ink_type", Setting::Str(String::new()));
		v.fields.insert("dither_algorithm", Setting::Str("Adaptive Hybrid".into()));
		v.fields.insert("output_type", Setting::Enum("COLOR"));
		v.fields.insert("orientation", Setting::Enum("AUTO"));
		v.fields.insert("left", Setting::Int(0));
		v.fields.insert("top", Setting::Int(0));
		v.fields.insert("page_width", Setting::Int(612));
		v.fields.insert("page_height", Setting::Int(792));
		v.fields.insert("brightness", Setting::Float(1.0));
		v.fields.insert("scaling", Setting::Float(100.0));
		v.fields.insert("gamma", Setting::Float(1.0));
		v.fields.insert("contrast", Setting::Float(1.0));
		v.fields.insert("cyan", Setting::Float(1.0));
		v.fields.insert("magenta", Setting::Float(1.0));
		v.fields.insert("yellow", Setting::Float(1.0));
		v.fields.insert("saturation", Setting::Float(1.0));
		v.fields.insert("density", Setting::Float(1.0));
		v.fields.insert("app_gamma", Setting::Float(1.7));
		v.fields.insert("image_type", Setting::Enum("CONTINUOUS"));
		v.fields.insert("input_color_model", Setting::Enum("RGB"));
		v.fields.insert("output_color_model", Setting::Enum("RGB"));
		v
	}

	/// Lower bound for every numeric field (spec.md §3: `minimum`).
	pub fn minimum_vars() -> Self {
		let mut v = Vars::default_vars();
		for f in [
			"brightness", "contrast", "cyan", "magenta", "yellow", "saturation",
		] {
			v.fields.insert(f, Setting::Float(0.0));
		}
		v.fields.insert("gamma", Setting::Float(0.1));
		v.fields.insert("density", Setting::Float(0.0));
		v.fields.insert("scaling", Setting::Float(1.0));
		v.fields.insert("app_gamma", Setting::Float(0.1));
		v.fields.insert("left", Setting::Int(0));
		v.fields.insert("top", Setting::Int(0));
		v
	}

	/// Upper bound for every numeric field (spec.md §3: `maximum`).
	pub fn maximum_vars() -> Self {
		let mut v = Vars::default_vars();
		for f in [
			"brightness", "contrast", "cyan", "magenta", "yellow",
		] {
			v.fields.insert(f, Setting::Float(2.0));
		}
		v.fields.insert("saturation", Setting::Float(9.0));
		v.fields.insert("gamma", Setting::Float(4.0));
		v.fields.insert("density", Setting::Float(2.0));
		v.fields.insert("scaling", Setting::Float(100.0));
		v.fields.insert("app_gamma", Setting::Float(4.0));
		v.fields.insert("left", Setting::Int(i32::MAX));
		v.fields.insert("top", Setting::Int(i32::MAX));
		v
	}

	pub fn get_raw(&self, field: &str) -> Option<&Setting> {
		self.fields.get(field)
	}

	pub fn set_raw(&mut self, field: &'static str, value: Setting) {
		self.fields.insert(field, value);
	}

	pub fn get_float(&self, field: &str) -> f64 {
		match self.fields.get(field) {
			Some(Setting::Float(v)) => *v,
			Some(Setting::Int(v)) => *v as f64,
			other => panic!("Vars field `{field}` is not numeric: {other:?}"),
		}
	}

	pub fn set_float(&mut self, field: &'static str, value: f64) {
		self.fields.insert(field, Setting::Float(value));
	}

	pub fn get_int(&self, field: &str) -> i32 {
		match self.fields.get(field) {
			Some(Setting::Int(v)) => *v,
			other => panic!("Vars field `{field}` is not an integer: {other:?}"),
		}
	}

	pub fn set_int(&mut self, field: &'static str, value: i32) {
		self.fields.insert(field, Setting::Int(value));
	}

	pub fn get_str(&self, field: &str) -> &str {
		match self.fields.get(field) {
			Some(Setting::Str(v)) => v.as_str(),
			other => panic!("Vars field `{field}` is not a string: {other:?}"),
		}
	}

	pub fn set_str(&mut self, field: &'static str, value: impl Into<String>) {
		self.fields.insert(field, Setting::Str(value.into()));
	}

	pub fn output_type(&self) -> OutputType {
		match self.fields.get("output_type") {
			Some(Setting::Enum("GRAY")) => OutputType::Gray,
			Some(Setting::Enum("COLOR")) => OutputType::Color,
			Some(Setting::Enum("MONOCHROME")) => OutputType::Monochrome,
			Some(Setting::Enum("RAW_CMYK")) => OutputType::RawCmyk,
			other => panic!("invalid output_type: {other:?}"),
		}
	}

	pub fn set_output_type(&mut self, t: OutputType) {
		let s = match t {
			OutputType::Gray => "GRAY",
			OutputType::Color => "COLOR",
			OutputType::Monochrome => "MONOCHROME",
			OutputType::RawCmyk => "RAW_CMYK",
		};
		self.fields.insert("output_type", Setting::Enum(s));
	}

	pub fn image_type(&self) -> ImageType {
		match self.fields.get("image_type") {
			Some(Setting::Enum("LINE_ART")) => ImageType::LineArt,
			Some(Setting::Enum("SOLID_TONE")) => ImageType::SolidTone,
			Some(Setting::Enum("CONTINUOUS")) => ImageType::Continuous,
			Some(Setting::Enum("MONOCHROME")) => ImageType::Monochrome,
			other => panic!("invalid image_type: {other:?}"),
		}
	}

	pub fn set_image_type(&mut self, t: ImageType) {
		let s = match t {
			ImageType::LineArt => "LINE_ART",
			ImageType::SolidTone => "SOLID_TONE",
			ImageType::Continuous => "CONTINUOUS",
			ImageType::Monochrome => "MONOCHROME",
		};
		self.fields.insert("image_type", Setting::Enum(s));
	}

	pub fn input_color_model(&self) -> ColorModel {
		color_model_of(self.fields.get("input_color_model"))
	}

	pub fn output_color_model(&self) -> ColorModel {
		color_model_of(self.fields.get("output_color_model"))
	}

	pub fn set_input_color_model(&mut self, m: ColorModel) {
		self.fields.insert("input_color_model", Setting::Enum(color_model_name(m)));
	}

	pub fn set_output_color_model(&mut self, m: ColorModel) {
		self.fields.insert("output_color_model", Setting::Enum(color_model_name(m)));
	}

	pub fn orientation(&self) -> Orientation {
		match self.fields.get("orientation") {
			Some(Setting::Enum("AUTO")) => Orientation::Auto,
			Some(Setting::Enum("PORTRAIT")) => Orientation::Portrait,
			Some(Setting::Enum("LANDSCAPE")) => Orientation::Landscape,
			Some(Setting::Enum("UPSIDEDOWN")) => Orientation::Upsidedown,
			Some(Setting::Enum("SEASCAPE")) => Orientation::Seascape,
			other => panic!("invalid orientation: {other:?}"),
		}
	}

	/// Validate every numeric field against `min`/`max` and every
	/// string field against the printer's enumerated option lists,
	/// collecting *all* violations rather than stopping at the first
	/// (spec.md §7: "every invalid field is listed").
	pub fn validate(&self, printer: &Printer, min: &Vars, max: &Vars) -> Result<(), Vec<VarsError>> {
		let mut errors = Vec::new();
		for field in [
			"brightness", "scaling", "gamma", "contrast", "cyan", "magenta",
			"yellow", "saturation", "density", "app_gamma",
		] {
			let value = self.get_float(field);
			let lo = min.get_float(field);
			let hi = max.get_float(field);
			if value < lo || value > hi {
				errors.push(VarsError::OutOfRange {
					field: field.to_string(),
					value,
					min: lo,
					max: hi,
				});
			}
		}

		let checks: &[(&str, &str)] = &[
			("media_size", "PageSize"),
			("resolution", "Resolution"),
			("ink_type", "InkType"),
			("media_type", "MediaType"),
			("media_source", "InputSlot"),
		];
		for (field, param_name) in checks {
			let value = self.get_str(field);
			if value.is_empty() {
				continue;
			}
			let options = (printer.vtable.parameters)(printer, self, param_name);
			if !options.iter().any(|(name, _)| name == value) {
				errors.push(VarsError::NotEnumerated {
					field: field.to_string(),
					value: value.to_string(),
					kind: param_name,
				});
			}
		}

		if errors.is_empty() {
			Ok(())
		} else {
			Err(errors)
		}
	}

	/// `verify_printer_params`: validates `vars` against this printer
	/// using the factory `minimum`/`maximum` brackets, for callers (the
	/// printer vtable's `verify` entry) that don't carry their own
	/// bracket already in scope.
	pub fn default_min_max_validate(printer: &Printer, vars: &Vars) -> Result<(), Vec<VarsError>> {
		vars.validate(printer, &Vars::minimum_vars(), &Vars::maximum_vars())
	}
}

fn color_model_of(setting: Option<&Setting>) -> ColorModel {
	match setting {
		Some(Setting::Enum("RGB")) => ColorModel::Rgb,
		Some(Setting::Enum("CMY")) => ColorModel::Cmy,
		other => panic!("invalid color model: {other:?}"),
	}
}

fn color_model_name(m: ColorModel) -> &'static str {
	match m {
		ColorModel::Rgb => "RGB",
		ColorModel::Cmy => "CMY",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_vars_round_trip_float() {
		let mut v = Vars::default_vars();
		v.set_float("density", 0.8);
		assert_eq!(v.get_float("density"), 0.8);
	}

	#[test]
	fn minimum_maximum_bracket_default() {
		let def = Vars::default_vars();
		let min = Vars::minimum_vars();
		let max = Vars::maximum_vars();
		for f in ["brightness", "contrast", "gamma", "density"] {
			assert!(min.get_float(f) <= def.get_float(f));
			assert!(def.get_float(f) <= max.get_float(f));
		}
	}

	#[test]
	fn output_type_round_trips() {
		let mut v = Vars::default_vars();
		v.set_output_type(OutputType::Monochrome);
		assert_eq!(v.output_type(), OutputType::Monochrome);
	}
}
