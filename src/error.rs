//! Error types for the conversion pipeline.

use thiserror::Error;

/// Raster construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("raster buffer length {actual} does not match {width}x{height}x4 = {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Precondition violations at the pipeline boundary.
///
/// Recoverable conditions (unknown dither method names, empty palette in
/// the preview-matching path) never surface here - they are handled
/// locally with a fallback or a sentinel. These variants are reserved for
/// states the pipeline cannot meaningfully run from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("no source raster: dimensions {width}x{height}")]
    EmptySource { width: u32, height: u32 },

    #[error("palette is empty")]
    EmptyPalette,

    #[error("invalid target dimensions: {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}
