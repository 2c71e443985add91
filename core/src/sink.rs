//! Output byte-stream consumer (spec.md §6: "Output sink").
//!
//! Spec.md describes the sink as a single callback `(ctx, buf, len)`.
//! In Rust that's naturally a trait object: every driver emitter holds
//! a `&mut dyn OutputSink` and never knows whether bytes land in a file,
//! a pipe, or an in-memory buffer.

/// Bytes are written in strict emission order; the sink owns framing
/// and transport. A write failure aborts the current page (spec.md §7).
pub trait OutputSink {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<()>;

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}

impl OutputSink for Vec<u8> {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
		self.extend_from_slice(buf);
		Ok(())
	}
}

impl<W: std::io::Write> OutputSink for std::io::BufWriter<W> {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
		std::io::Write::write_all(self, buf)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		std::io::Write::flush(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vec_sink_accumulates_in_order() {
		let mut sink: Vec<u8> = Vec::new();
		sink.write(b"ab").unwrap();
		sink.write(b"cd").unwrap();
		assert_eq!(sink, b"abcd");
	}
}
