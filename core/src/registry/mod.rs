//! Process-wide, immutable-after-init registries: printer models and
//! page sizes. Spec.md §3: "Printers are registered at process start
//! into a global ordered list"; here that list is a `const` table behind
//! a `OnceLock`-built index, so there is no runtime registration step
//! and no mutable global state to guard (the REDESIGN FLAGS item on
//! global mutable state applies directly to this module).

mod papersize;
mod printer;

pub use papersize::{Papersize, PapersizeUnit};
pub use printer::{Printer, PrinterVtable};

use crate::image::ImageSource;
use crate::sink::OutputSink;
use crate::vars::Vars;
use std::sync::OnceLock;

/// Returns every registered papersize.
pub fn papersizes() -> &'static [Papersize] {
	papersize::TABLE
}

pub fn papersize_by_name(name: &str) -> Option<&'static Papersize> {
	papersizes().iter().find(|p| p.name == name)
}

pub fn papersize_by_size(width: i32, height: i32) -> Option<&'static Papersize> {
	papersizes()
		.iter()
		.find(|p| p.width as i32 == width && p.height as i32 == height)
}

static PRINTER_INDEX: OnceLock<Vec<&'static Printer>> = OnceLock::new();

fn printer_index() -> &'static [&'static Printer] {
	PRINTER_INDEX.get_or_init(|| printer::TABLE.iter().collect())
}

pub fn printer_count() -> usize {
	printer_index().len()
}

pub fn printer_by_index(i: usize) -> Option<&'static Printer> {
	printer_index().get(i).copied()
}

pub fn printer_by_driver(driver_id: &str) -> Option<&'static Printer> {
	printer_index().iter().copied().find(|p| p.driver_id == driver_id)
}

pub fn printer_by_long_name(long_name: &str) -> Option<&'static Printer> {
	printer_index()
		.iter()
		.copied()
		.find(|p| p.long_name == long_name)
}

/// Enumerate legal values of a named parameter (`"PageSize"`,
/// `"MediaType"`, `"InputSlot"`, `"Resolution"`, `"InkType"`), per
/// spec.md §6.
pub fn parameters(printer: &Printer, vars: &Vars, name: &str) -> Vec<(String, String)> {
	(printer.vtable.parameters)(printer, vars, name)
}

/// `print(printer, vars, image) -> status`, spec.md §6's free-function
/// library surface, dispatched through the printer's vtable.
pub fn print(
	printer: &'static Printer,
	vars: &Vars,
	image: &mut dyn ImageSource,
	sink: &mut dyn OutputSink,
) -> crate::error::Result<()> {
	(printer.vtable.print)(printer, vars, image, sink)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn registry_is_populated_and_stable() {
		assert!(printer_count() > 0);
		let first = printer_by_index(0).unwrap();
		assert_eq!(printer_by_driver(first.driver_id).unwrap().long_name, first.long_name);
	}

	#[test]
	fn papersize_lookup_roundtrips() {
		let a4 = papersize_by_name("A4").expect("A4 seeded");
		assert_eq!(papersize_by_size(a4.width as i32, a4.height as i32).unwrap().name, "A4");
	}
}
