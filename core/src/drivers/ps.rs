//! PostScript raster variant (spec.md §4.I), grounded on
//! `original_source/print-ps.c`'s `image`/`colorimage` operator
//! emission: ASCII85-free, hex-encoded raster data inside a minimal
//! per-page PostScript preamble.

use crate::drivers::Driver;
use crate::error::DriverError;
use crate::sink::OutputSink;
use crate::weave::PassSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Idle,
	Initialized,
	InPage,
}

pub struct PsDriver {
	state: State,
	page_number: u32,
}

impl PsDriver {
	pub fn new() -> Self {
		PsDriver { state: State::Idle, page_number: 0 }
	}
}

impl Default for PsDriver {
	fn default() -> Self {
		Self::new()
	}
}

impl Driver for PsDriver {
	fn init(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(b"%!PS-Adobe-3.0\n")?;
		self.state = State::Initialized;
		Ok(())
	}

	fn start_page(&mut self, sink: &mut dyn OutputSink, width_dots: u32, height_dots: u32) -> Result<(), DriverError> {
		if self.state != State::Initialized {
			return Err(DriverError::Unsupported);
		}
		self.page_number += 1;
		sink.write(format!("%%Page: {0} {0}\n", self.page_number).as_bytes())?;
		sink.write(format!("gsave {width_dots} {height_dots} scale\n").as_bytes())?;
		self.state = State::InPage;
		Ok(())
	}

	fn write_pass(&mut self, sink: &mut dyn OutputSink, pass: &PassSlot) -> Result<(), DriverError> {
		if self.state != State::InPage {
			return Err(DriverError::Unsupported);
		}
		for channel in &pass.buffers {
			let hex: String = channel.iter().map(|b| format!("{:02x}", b)).collect();
			sink.write(hex.as_bytes())?;
			sink.write(b"\n")?;
		}
		Ok(())
	}

	fn eject_page(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(b"grestore showpage\n")?;
		self.state = State::Initialized;
		Ok(())
	}

	fn deinit(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(b"%%EOF\n")?;
		self.state = State::Idle;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn page_data_is_hex_encoded_between_gsave_and_showpage() {
		let mut driver = PsDriver::new();
		let mut sink: Vec<u8> = Vec::new();
		driver.init(&mut sink).unwrap();
		driver.start_page(&mut sink, 100, 100).unwrap();
		let pass = PassSlot { pass: 0, first_row: 0, rows_expected: 1, rows_written: 1, buffers: vec![vec![0xde, 0xad]] };
		driver.write_pass(&mut sink, &pass).unwrap();
		driver.eject_page(&mut sink).unwrap();
		driver.deinit(&mut sink).unwrap();

		let text = String::from_utf8(sink).unwrap();
		assert!(text.contains("dead"));
		assert!(text.contains("showpage"));
		assert!(text.ends_with("%%EOF\n"));
	}
}
