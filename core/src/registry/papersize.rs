//! Static page-size table (spec.md §3: `Papersize`). Schema only; the
//! seed data below is a minimal demonstration set (ISO A4/A3 and US
//! Letter/Legal plus a roll-feed entry), since printer-specific paper
//! tables are out of scope per spec.md §1.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PapersizeUnit {
	English,
	Metric,
}

#[derive(Debug, Clone, Copy)]
pub struct Papersize {
	pub name: &'static str,
	pub display_text: &'static str,
	/// Dimensions in points (1/72"); zero denotes a roll-feed variable axis.
	pub width: u32,
	pub height: u32,
	pub top: u32,
	pub left: u32,
	pub bottom: u32,
	pub right: u32,
	pub unit: PapersizeUnit,
}

pub(super) static TABLE: &[Papersize] = &[
	Papersize {
		name: "Letter",
		display_text: "US Letter",
		width: 612,
		height: 792,
		top: 18,
		left: 18,
		bottom: 18,
		right: 18,
		unit: PapersizeUnit::English,
	},
	Papersize {
		name: "Legal",
		display_text: "US Legal",
		width: 612,
		height: 1008,
		top: 18,
		left: 18,
		bottom: 18,
		right: 18,
		unit: PapersizeUnit::English,
	},
	Papersize {
		name: "A4",
		display_text: "A4",
		width: 595,
		height: 842,
		top: 14,
		left: 14,
		bottom: 14,
		right: 14,
		unit: PapersizeUnit::Metric,
	},
	Papersize {
		name: "A3",
		display_text: "A3",
		width: 842,
		height: 1191,
		top: 14,
		left: 14,
		bottom: 14,
		right: 14,
		unit: PapersizeUnit::Metric,
	},
	Papersize {
		name: "Roll",
		display_text: "Roll Feed (variable length)",
		width: 384,
		height: 0,
		top: 0,
		left: 0,
		bottom: 0,
		right: 0,
		unit: PapersizeUnit::English,
	},
];

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roll_feed_has_variable_height() {
		let roll = TABLE.iter().find(|p| p.name == "Roll").unwrap();
		assert_eq!(roll.height, 0);
	}
}
