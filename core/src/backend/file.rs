//! File/pipe output sink, grounded on `ppa6::file::FileBackend`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::sink::OutputSink;

pub struct FileSink {
	file: File,
}

impl FileSink {
	pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
		Ok(FileSink { file: File::create(path)? })
	}

	pub fn from_file(file: File) -> Self {
		FileSink { file }
	}
}

impl OutputSink for FileSink {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
		self.file.write_all(buf)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		self.file.flush()
	}
}
