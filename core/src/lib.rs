//! Color transform, dithering and weave/band raster pipeline for
//! consumer inkjet and thermal printers.
//!
//! The crate is organized the way the pipeline actually runs: an
//! [`image`] source is read row-by-row, converted through [`color`],
//! quantized by [`dither`], scheduled onto passes by [`weave`], and
//! handed to a [`drivers`] emitter that speaks the target printer's wire
//! protocol. [`registry`] and [`vars`] hold the printer/papersize tables
//! and the per-job settings bag that the other modules read from.
//! [`print::print_escp2`]/[`print::print_thermal`] (reached through
//! [`registry::print`]) wire all of it together for one page.

pub mod backend;
pub mod color;
pub mod config;
pub mod dither;
pub mod drivers;
pub mod error;
pub mod image;
pub mod pack;
pub mod print;
pub mod registry;
pub mod sink;
pub mod vars;
pub mod weave;

pub use error::{PrintError, Result};
pub use image::ImageSource;
pub use registry::{print, Printer};
pub use sink::OutputSink;
pub use vars::Vars;
