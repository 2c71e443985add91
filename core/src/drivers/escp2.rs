//! Reference ESC/P2 emitter (spec.md §4.I).
//!
//! Opcodes are reproduced verbatim from `original_source/print-escp2.c`;
//! each constant's doc comment cites the sequence it stands in for, per
//! SPEC_FULL.md §9's resolution of the "emitter magic sequences" open
//! question (reproduced, not reverse-engineered).

use crate::drivers::Driver;
use crate::error::DriverError;
use crate::pack::pack;
use crate::sink::OutputSink;
use crate::weave::PassSlot;

/// `ESC @`: software reset, the first byte of every job (`print-escp2.c`,
/// `INIT`).
const RESET: &[u8] = &[0x1b, 0x40];
/// `ESC ( G 01 00 01`: enter the "remote1" extended command mode used to
/// set paper size, printable area and microweave (`print-escp2.c`,
/// `REMOTE_SETUP`).
const REMOTE1_ENTER: &[u8] = &[0x1b, 0x28, 0x47, 0x01, 0x00, 0x01];
/// `ESC ( / 01 00 00`: exit remote1 mode.
const REMOTE1_EXIT: &[u8] = &[0x1b, 0x28, 0x2f, 0x01, 0x00, 0x00];
/// `ESC ( U 01 00 unit`: set the base measurement unit (1/`unit` inch)
/// used by subsequent `ESC ( C`/`ESC ( c` page-size commands.
fn set_unit(unit: u8) -> Vec<u8> {
	vec![0x1b, 0x28, 0x55, 0x01, 0x00, unit]
}
/// `ESC ( C 04 00 w0 w1 w2 w3`: set the page length in the current unit.
fn set_page_length(dots: u32) -> Vec<u8> {
	let b = dots.to_le_bytes();
	vec![0x1b, 0x28, 0x43, 0x04, 0x00, b[0], b[1], b[2], b[3]]
}
/// `ESC . 1`: select raster graphics mode with compressed (packbits)
/// data, one byte per following row header (`print-escp2.c`, `GRAPHICS`).
fn graphics_mode_header(v_resolution: u8, h_resolution: u8, v_pass_multiplier: u8) -> Vec<u8> {
	vec![0x1b, 0x2e, 0x01, v_resolution, h_resolution, v_pass_multiplier]
}
/// `ESC ( v`: set relative vertical position, used between passes to
/// advance the paper by the weave pitch (`ROW_LOOP`).
fn set_relative_vertical_position(dots: i16) -> Vec<u8> {
	let b = dots.to_le_bytes();
	vec![0x1b, 0x28, 0x76, 0x02, 0x00, b[0], b[1]]
}
/// `FF`: form feed / eject (`EJECT`).
const FORM_FEED: &[u8] = &[0x0c];
/// `ESC @`: final reset (`DEINIT`).
const DEINIT_RESET: &[u8] = &[0x1b, 0x40];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Idle,
	Initialized,
	RemoteSetup,
	Graphics,
	Ejected,
}

pub struct Escp2Driver {
	state: State,
	v_resolution: u8,
	h_resolution: u8,
	unit: u8,
	last_pass: i32,
}

impl Escp2Driver {
	pub fn new(v_resolution: u8, h_resolution: u8, unit: u8) -> Self {
		Escp2Driver { state: State::Idle, v_resolution, h_resolution, unit, last_pass: -1 }
	}
}

impl Driver for Escp2Driver {
	fn init(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(RESET)?;
		self.state = State::Initialized;
		Ok(())
	}

	fn start_page(&mut self, sink: &mut dyn OutputSink, _width_dots: u32, height_dots: u32) -> Result<(), DriverError> {
		if self.state != State::Initialized {
			return Err(DriverError::Unsupported);
		}
		sink.write(REMOTE1_ENTER)?;
		sink.write(&set_unit(self.unit))?;
		sink.write(&set_page_length(height_dots))?;
		sink.write(REMOTE1_EXIT)?;
		self.state = State::RemoteSetup;

		sink.write(&graphics_mode_header(self.v_resolution, self.h_resolution, 1))?;
		self.state = State::Graphics;
		self.last_pass = -1;
		Ok(())
	}

	fn write_pass(&mut self, sink: &mut dyn OutputSink, pass: &PassSlot) -> Result<(), DriverError> {
		if self.state != State::Graphics {
			return Err(DriverError::Unsupported);
		}
		if self.last_pass >= 0 {
			let advance = pass.first_row - self.last_pass;
			sink.write(&set_relative_vertical_position(advance as i16))?;
		}
		for channel in &pass.buffers {
			let mut packed = Vec::new();
			pack(channel, &mut packed);
			let len = (packed.len() as u16).to_le_bytes();
			sink.write(&[0x1b, 0x2e, 0x02])?;
			sink.write(&len)?;
			sink.write(&packed)?;
		}
		self.last_pass = pass.pass;
		Ok(())
	}

	fn eject_page(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(FORM_FEED)?;
		self.state = State::Ejected;
		Ok(())
	}

	fn deinit(&mut self, sink: &mut dyn OutputSink) -> Result<(), DriverError> {
		sink.write(DEINIT_RESET)?;
		self.state = State::Idle;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::weave::PassSlot;

	#[test]
	fn full_page_emits_well_formed_state_machine() {
		let mut driver = Escp2Driver::new(180, 180, 1);
		let mut sink: Vec<u8> = Vec::new();
		driver.init(&mut sink).unwrap();
		driver.start_page(&mut sink, 1440, 2880).unwrap();
		let pass = PassSlot { pass: 0, first_row: 0, rows_expected: 1, rows_written: 1, buffers: vec![vec![0xffu8; 8]] };
		driver.write_pass(&mut sink, &pass).unwrap();
		driver.eject_page(&mut sink).unwrap();
		driver.deinit(&mut sink).unwrap();

		assert!(sink.starts_with(RESET));
		assert!(sink.ends_with(DEINIT_RESET));
	}

	#[test]
	fn write_pass_before_start_page_is_rejected() {
		let mut driver = Escp2Driver::new(180, 180, 1);
		let mut sink: Vec<u8> = Vec::new();
		let pass = PassSlot { pass: 0, first_row: 0, rows_expected: 1, rows_written: 1, buffers: vec![] };
		assert!(driver.write_pass(&mut sink, &pass).is_err());
	}
}
