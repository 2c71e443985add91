//! Multi-ink, multi-level dither engine (spec.md §4.G).

pub mod cmyk;
pub mod cursor;
pub mod engine;
pub mod matrix;
pub mod segment;

pub use cmyk::{CmykAlgorithm, CmykDither, CmykPlanes, Ink};
pub use engine::{Dither, DitherAlgorithm, RowBits};
pub use matrix::OrderedMatrix;
pub use segment::{DitherColor, DitherSegment};
