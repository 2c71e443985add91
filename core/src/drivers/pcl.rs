//! PCL raster variant (spec.md §4.I): shares the ESC/P2 state machine
//! shape but a much smaller, uncompressed wire format, grounded on
//! `original_source/print-pcl.c`'s simpler non-microweave raster path.

use crate::drivers::Driver;
use crate::error::DriverError;
use crate::sink::OutputSink;
use crate::weave::PassSlot;

/// `ESC E`: printer reset.
const RESET: &[u8] = &[0x1b, 0x45];
/// `ESC * r 1 A`: start raster graphics.
const RASTER_START: &[u8] = &[0x1b, 0x2a, 0x72, 0x31, 0x41];
/// `ESC * r B`: end raster graphics.
const RASTER_END: &[u8] = &[0x1b, 0x2a, 0x72, 0x42];
const FORM_FEED: &[u8] = &[0x0c];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Idle,
	Initialized,
	Raster,
}

pub struct PclDriver {
	state: State,
}

impl PclDriver {
	pub fn new() -> Self {
		PclDriver { state: State::Idle }
	}
}

impl Default for PclDriver {
	fn default() -> Self {
		Self::new()
	}
}

impl Driver for PclDriver {
	fn init(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(RESET)?;
		self.state = State::Initialized;
		Ok(())
	}

	fn start_page(&mut self, sink: &mut dyn OutputSink, _width_dots: u32, _height_dots: u32) -> Result<(), DriverError> {
		if self.state != State::Initialized {
			return Err(DriverError::Unsupported);
		}
		sink.write(RASTER_START)?;
		self.state = State::Raster;
		Ok(())
	}

	fn write_pass(&mut self, sink: &mut dyn OutputSink, pass: &PassSlot) -> Result<(), DriverError> {
		if self.state != State::Raster {
			return Err(DriverError::Unsupported);
		}
		for channel in &pass.buffers {
			// `ESC * b <n> W`: transfer <n> bytes of raster data, uncompressed.
			sink.write(format!("\x1b*b{}W", channel.len()).as_bytes())?;
			sink.write(channel)?;
		}
		Ok(())
	}

	fn eject_page(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(RASTER_END)?;
		sink.write(FORM_FEED)?;
		self.state = State::Initialized;
		Ok(())
	}

	fn deinit(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(RESET)?;
		self.state = State::Idle;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn raster_commands_bracket_row_data() {
		let mut driver = PclDriver::new();
		let mut sink: Vec<u8> = Vec::new();
		driver.init(&mut sink).unwrap();
		driver.start_page(&mut sink, 600, 800).unwrap();
		let pass = PassSlot { pass: 0, first_row: 0, rows_expected: 1, rows_written: 1, buffers: vec![vec![1, 2, 3]] };
		driver.write_pass(&mut sink, &pass).unwrap();
		driver.eject_page(&mut sink).unwrap();
		driver.deinit(&mut sink).unwrap();
		assert!(sink.windows(RASTER_START.len()).any(|w| w == RASTER_START));
		assert!(sink.windows(3).any(|w| w == [1, 2, 3]));
	}
}
