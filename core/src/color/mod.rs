//! Color LUT engine (spec.md §4.E) and color-space converter (§4.F).

pub mod convert;
pub mod lut;

pub use convert::{rgb_to_rgb, RemapCurves, ZeroMask};
pub use lut::Lut;
