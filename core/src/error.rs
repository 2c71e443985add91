use thiserror::Error;

/// Errors raised while building or validating a [`crate::vars::Vars`] instance.
#[derive(Debug, Error)]
pub enum VarsError {
	#[error("unknown setting `{0}`")]
	UnknownSetting(String),

	#[error("setting `{0}` is not a {1}")]
	WrongType(String, &'static str),

	#[error("`{field}` = {value} is out of range [{min}, {max}]")]
	OutOfRange {
		field: String,
		value: f64,
		min: f64,
		max: f64,
	},

	#[error("`{field}` = `{value}` is not one of this printer's {kind}")]
	NotEnumerated {
		field: String,
		value: String,
		kind: &'static str,
	},
}

/// Errors raised by the dither engine.
#[derive(Debug, Error)]
pub enum DitherError {
	#[error("dither channel {0} has no ranges configured")]
	EmptyRanges(usize),

	#[error("dither ranges for channel {channel} are not sorted/contiguous at index {index}")]
	BadRanges { channel: usize, index: usize },

	#[error("row length mismatch: expected {expected}, got {got}")]
	RowLength { expected: usize, got: usize },
}

/// Errors raised by the weave scheduler.
#[derive(Debug, Error)]
pub enum WeaveError {
	#[error("pass slot {slot} is still active for pass {active_pass}, cannot reassign to pass {new_pass} without a flush")]
	SlotBusy {
		slot: usize,
		active_pass: i32,
		new_pass: i32,
	},

	#[error("channel {0} line buffer overflow: capacity {1}, wrote {2}")]
	BufferOverflow(usize, usize, usize),
}

/// Errors raised by a driver emitter (ESC/P2, PCL, PostScript).
#[derive(Debug, Error)]
pub enum DriverError {
	#[error("output sink failed")]
	Sink(#[from] std::io::Error),

	#[error("printer does not support this parameter combination")]
	Unsupported,
}

/// Errors that can abort an in-progress page.
#[derive(Debug, Error)]
pub enum PrintError {
	#[error("parameter validation failed: {0:?}")]
	InvalidParameters(Vec<VarsError>),

	#[error("image source aborted at row {0}")]
	ImageAborted(i32),

	#[error(transparent)]
	Dither(#[from] DitherError),

	#[error(transparent)]
	Weave(#[from] WeaveError),

	#[error(transparent)]
	Driver(#[from] DriverError),
}

pub type Result<T, E = PrintError> = core::result::Result<T, E>;
