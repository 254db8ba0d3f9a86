#![deny(missing_docs)]
//! Image processing library for the pinpoint detection pipeline.

/// image cropping module.
pub mod crop;

/// drawing primitives module.
pub mod draw;
