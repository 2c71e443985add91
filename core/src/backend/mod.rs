//! Concrete [`crate::sink::OutputSink`] implementations.
//!
//! Generalized from `ppa6`'s fixed USB/file backends (`ppa6::usb::UsbBackend`,
//! `ppa6::file::FileBackend`), which spoke only to the PeriPage A6. Here the
//! same two transports serve any printer the registry describes.

#[cfg(feature = "usb")]
pub mod usb;

#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "file")]
pub use file::FileSink;
#[cfg(feature = "usb")]
pub use usb::UsbSink;
