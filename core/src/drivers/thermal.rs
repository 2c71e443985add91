//! Fixed-width 1-bit thermal printer emitter, grounded directly on
//! `ppa6::Printer`'s USB protocol: 384-dot-wide head (8 dots/byte),
//! chunked image transfer, and a `push(n)` paper-feed command after the
//! last row.

use crate::drivers::Driver;
use crate::error::DriverError;
use crate::sink::OutputSink;
use crate::weave::PassSlot;

pub const THERMAL_WIDTH_DOTS: u32 = 384;
pub const THERMAL_WIDTH_BYTES: usize = (THERMAL_WIDTH_DOTS / 8) as usize;
/// Maximum rows sent per USB bulk transfer (`Printer::print_image_chunked`).
const CHUNK_ROWS: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Idle,
	Initialized,
	InPage,
}

pub struct ThermalDriver {
	state: State,
	chunk: Vec<u8>,
	feed_dots: u8,
}

impl ThermalDriver {
	pub fn new(feed_dots: u8) -> Self {
		ThermalDriver { state: State::Idle, chunk: Vec::new(), feed_dots }
	}

	fn flush_chunk(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		if self.chunk.is_empty() {
			return Ok(());
		}
		sink.write(&[0x1d, 0x76, 0x30, 0x00])?;
		let rows = (self.chunk.len() / THERMAL_WIDTH_BYTES) as u16;
		sink.write(&(THERMAL_WIDTH_BYTES as u16).to_le_bytes())?;
		sink.write(&rows.to_le_bytes())?;
		sink.write(&self.chunk)?;
		self.chunk.clear();
		Ok(())
	}
}

impl Driver for ThermalDriver {
	fn init(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(&[0x1b, 0x40])?;
		self.state = State::Initialized;
		Ok(())
	}

	fn start_page(&mut self, _sink: &mut dyn OutputSink, width_dots: u32, _height_dots: u32) -> Result<(), DriverError> {
		if self.state != State::Initialized {
			return Err(DriverError::Unsupported);
		}
		if width_dots != THERMAL_WIDTH_DOTS {
			return Err(DriverError::Unsupported);
		}
		self.chunk.clear();
		self.state = State::InPage;
		Ok(())
	}

	/// A "pass" is a single monochrome row for this head; bands are
	/// flushed every [`CHUNK_ROWS`] rows to match the original's chunked
	/// bulk transfer size.
	fn write_pass(&mut self, sink: &mut dyn OutputSink, pass: &PassSlot) -> Result<(), DriverError> {
		if self.state != State::InPage {
			return Err(DriverError::Unsupported);
		}
		let row = pass.buffers.first().ok_or(DriverError::Unsupported)?;
		self.chunk.extend_from_slice(row);
		if self.chunk.len() / THERMAL_WIDTH_BYTES >= CHUNK_ROWS {
			self.flush_chunk(sink)?;
		}
		Ok(())
	}

	fn eject_page(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		self.flush_chunk(sink)?;
		sink.write(&[0x1b, 0x4a, self.feed_dots])?;
		self.state = State::Initialized;
		Ok(())
	}

	fn deinit(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(&[0x1b, 0x40])?;
		self.state = State::Idle;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row() -> PassSlot {
		PassSlot { pass: 0, first_row: 0, rows_expected: 1, rows_written: 1, buffers: vec![vec![0u8; THERMAL_WIDTH_BYTES]] }
	}

	#[test]
	fn rejects_non_384_dot_pages() {
		let mut driver = ThermalDriver::new(0x60);
		let mut sink: Vec<u8> = Vec::new();
		driver.init(&mut sink).unwrap();
		assert!(driver.start_page(&mut sink, 640, 100).is_err());
	}

	#[test]
	fn short_page_flushes_remaining_chunk_on_eject() {
		let mut driver = ThermalDriver::new(0x60);
		let mut sink: Vec<u8> = Vec::new();
		driver.init(&mut sink).unwrap();
		driver.start_page(&mut sink, THERMAL_WIDTH_DOTS, 10).unwrap();
		for _ in 0..5 {
			driver.write_pass(&mut sink, &row()).unwrap();
		}
		driver.eject_page(&mut sink).unwrap();
		// feed command present even though fewer than CHUNK_ROWS rows were written.
		assert!(sink.windows(3).any(|w| w == [0x1b, 0x4a, 0x60]));
	}
}
