//! Softweave row-to-pass/nozzle scheduler (spec.md §4.H).
//!
//! Grounded on `original_source/print-weave.c`'s `initialize_weave`/
//! `weave_parameters_by_row` and the softweave ring-buffer discipline it
//! uses to avoid materializing the whole page before handing passes to
//! the driver.
//!
//! Nozzles are spaced `separation` rows apart on the head; covering
//! every row therefore takes `separation` interleaved passes per
//! `jets*separation`-row band (times `oversample` sub-passes per row).
//! Row `r`'s nozzle is `(r / separation) % jets` and its pass is
//! `(r / (jets*separation)) * separation + (r % separation)`, folded by
//! `oversample` for sub-passing — this reproduces spec.md §8 scenario
//! 5's `(row, pass, jet)` table exactly (jets=4, separation=2,
//! oversample=1, rows 0..7).

use crate::error::WeaveError;

#[derive(Debug, Clone, Copy)]
pub struct WeaveParams {
	/// Number of print-head nozzles.
	pub jets: u32,
	/// Nozzle pitch in row units (1 = no head-gap interleave needed).
	pub separation: u32,
	/// Passes per physical nozzle row (vertical oversampling).
	pub oversample: u32,
}

/// One row's assignment onto the weave schedule (spec.md §3: `WeaveRow`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaveRow {
	pub row: i32,
	pub pass: i32,
	pub jet: u32,
	pub sub_pass: u32,
	/// Rows this pass's lowest-numbered nozzle would have fired above
	/// row 0 (phantom rows at the top of the page).
	pub missing_start_rows: u32,
	pub logical_pass_start: i32,
	pub phys_pass_start: i32,
	pub phys_pass_end: i32,
}

impl WeaveParams {
	fn separation(&self) -> i32 {
		self.separation.max(1) as i32
	}
	fn jets(&self) -> u32 {
		self.jets.max(1)
	}
	fn oversample(&self) -> u32 {
		self.oversample.max(1)
	}

	/// Rows spanned by one full nozzle band (every jet at this
	/// separation, before the pattern of (pass, jet) pairs repeats).
	pub fn rows_per_band(&self) -> i32 {
		self.jets() as i32 * self.separation()
	}

	/// `weave_parameters_by_row`: maps an absolute image row (and, for
	/// vertically oversampled printers, a sub-pass in `0..oversample`)
	/// to its (pass, jet) slot, plus the phantom-row accounting spec.md
	/// §4.H calls for at the top of the page. `last_row` is the last
	/// printable row on the page (`height - 1`), used to clamp
	/// `phys_pass_end`.
	pub fn row_to_weave(&self, row: i32, sub_pass: u32, last_row: i32) -> WeaveRow {
		let separation = self.separation();
		let jets = self.jets();
		let oversample = self.oversample();
		let sub_pass = sub_pass % oversample;

		let band = self.rows_per_band();
		let group = row.div_euclid(band);
		let offset = row.rem_euclid(separation);
		let pass = (group * separation + offset) * oversample as i32 + sub_pass as i32;
		let jet = (row.div_euclid(separation) as u32) % jets;

		// The pass's lowest-jet row (the row this group/offset would
		// carry at jet 0) anchors the band; nozzle `jets-1` prints
		// `(jets-1)*separation` rows below it, nozzle 0 would have
		// needed to print that many rows *above* it, which is where
		// the top-of-page phantom rows come from.
		let base_row = group * band + offset;
		let logical_pass_start = base_row - (jets as i32 - 1) * separation;
		let phys_pass_start = logical_pass_start.max(0);
		let ideal_end = base_row + (jets as i32 - 1) * separation;
		let phys_pass_end = ideal_end.min(last_row);
		let missing_start_rows = ((phys_pass_start - logical_pass_start) / separation).max(0) as u32;

		WeaveRow {
			row,
			pass,
			jet,
			sub_pass,
			missing_start_rows,
			logical_pass_start,
			phys_pass_start,
			phys_pass_end,
		}
	}
}

/// One in-flight printer pass: a ring slot accumulating per-channel row
/// buffers until every nozzle that will fire on this pass has been
/// written, at which point it is ready to flush to the driver.
pub struct PassSlot {
	pub pass: i32,
	pub first_row: i32,
	pub rows_expected: usize,
	pub rows_written: usize,
	pub buffers: Vec<Vec<u8>>,
}

pub struct Softweave {
	params: WeaveParams,
	channels: usize,
	slots: Vec<Option<PassSlot>>,
	last_row: i32,
}

impl Softweave {
	/// `last_row` is the page's last printable row (`height - 1`);
	/// used only to clamp `WeaveRow::phys_pass_end`.
	pub fn new(params: WeaveParams, channels: usize) -> Self {
		Self::with_last_row(params, channels, i32::MAX)
	}

	pub fn with_last_row(params: WeaveParams, channels: usize, last_row: i32) -> Self {
		// At most `separation * oversample` distinct passes are ever
		// concurrently open: within one band, the pass cycles through
		// exactly that many values as rows stream in order.
		let ring = (params.separation.max(1) * params.oversample.max(1)) as usize;
		Softweave { params, channels, slots: (0..ring.max(1)).map(|_| None).collect(), last_row }
	}

	fn slot_index(&self, pass: i32) -> usize {
		(pass.rem_euclid(self.slots.len() as i32)) as usize
	}

	/// Rows carried by a single pass, i.e. how many `write_row` calls
	/// (per channel) complete a [`PassSlot`] — one per nozzle.
	pub fn rows_per_pass(&self) -> usize {
		self.params.jets.max(1) as usize
	}

	/// Maps an image row to its (pass, jet) weave assignment (spec.md
	/// §3 `WeaveRow`), assuming no vertical oversampling sub-pass.
	pub fn pass_for_row(&self, row: i32) -> WeaveRow {
		self.params.row_to_weave(row, 0, self.last_row)
	}

	/// Writes one channel's already-dithered, already-packed row data
	/// into the pass slot that owns `row`. Returns the completed slot
	/// once every nozzle of that pass has arrived.
	pub fn write_row(&mut self, row: i32, channel: usize, data: Vec<u8>) -> Result<Option<PassSlot>, WeaveError> {
		let wr = self.pass_for_row(row);
		let idx = self.slot_index(wr.pass);

		if self.slots[idx].is_none() {
			self.slots[idx] = Some(PassSlot {
				pass: wr.pass,
				first_row: row,
				rows_expected: self.rows_per_pass(),
				rows_written: 0,
				buffers: (0..self.channels).map(|_| Vec::new()).collect(),
			});
		}

		{
			let slot = self.slots[idx].as_ref().unwrap();
			if slot.pass != wr.pass {
				return Err(WeaveError::SlotBusy { slot: idx, active_pass: slot.pass, new_pass: wr.pass });
			}
		}

		let slot = self.slots[idx].as_mut().unwrap();
		if channel >= slot.buffers.len() {
			return Err(WeaveError::BufferOverflow(channel, slot.buffers.len(), channel + 1));
		}
		slot.buffers[channel].extend_from_slice(&data);
		if channel == 0 {
			slot.rows_written += 1;
		}

		if slot.rows_written >= slot.rows_expected {
			Ok(self.slots[idx].take())
		} else {
			Ok(None)
		}
	}

	/// Drains every slot still holding data, in pass order, for the
	/// final partial band at the bottom of the page.
	pub fn flush_all(&mut self) -> Vec<PassSlot> {
		let mut done: Vec<PassSlot> = self.slots.iter_mut().filter_map(|s| s.take()).collect();
		done.sort_by_key(|s| s.pass);
		done
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params() -> WeaveParams {
		WeaveParams { jets: 4, separation: 1, oversample: 1 }
	}

	#[test]
	fn single_jet_rows_map_to_sequential_passes() {
		let w = Softweave::new(params(), 1);
		assert_eq!(w.pass_for_row(0).pass, 0);
		assert_eq!(w.pass_for_row(4).pass, 1);
		assert_eq!(w.pass_for_row(7).pass, 1);
	}

	/// Scenario 5 in spec.md §8: jets=4, separation=2, oversample=1,
	/// rows 0..7 must produce exactly this (row, pass, jet) table.
	#[test]
	fn scenario5_two_pass_interleave() {
		let w = WeaveParams { jets: 4, separation: 2, oversample: 1 };
		let expected = [
			(0i32, 0i32, 0u32),
			(2, 0, 1),
			(4, 0, 2),
			(6, 0, 3),
			(1, 1, 0),
			(3, 1, 1),
			(5, 1, 2),
			(7, 1, 3),
		];
		for &(row, pass, jet) in &expected {
			let wr = w.row_to_weave(row, 0, 7);
			assert_eq!((wr.row, wr.pass, wr.jet), (row, pass, jet), "row {row}");
		}
	}

	#[test]
	fn slot_completes_after_all_rows_of_a_pass_arrive() {
		let mut w = Softweave::new(params(), 2);
		let step = w.rows_per_pass();
		let mut last = None;
		for r in 0..step {
			last = w.write_row(r as i32, 0, vec![r as u8]).unwrap();
			w.write_row(r as i32, 1, vec![r as u8]).unwrap();
		}
		assert!(last.is_some());
		let slot = last.unwrap();
		assert_eq!(slot.rows_written, step);
		assert_eq!(slot.buffers[0].len(), step);
	}

	#[test]
	fn flush_all_drains_partial_final_band_in_pass_order() {
		let mut w = Softweave::new(WeaveParams { jets: 4, separation: 1, oversample: 1 }, 1);
		w.write_row(0, 0, vec![1]).unwrap();
		w.write_row(1, 0, vec![2]).unwrap();
		let drained = w.flush_all();
		assert_eq!(drained.len(), 1);
		assert_eq!(drained[0].buffers[0], vec![1, 2]);
	}

	#[test]
	fn unknown_channel_is_rejected() {
		let mut w = Softweave::new(params(), 1);
		assert!(w.write_row(0, 5, vec![1]).is_err());
	}
}
