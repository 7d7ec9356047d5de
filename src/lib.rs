//! palettize: image-to-palette conversion for pixel-art placement.
//!
//! Takes an arbitrary RGBA raster and an identifier-tagged palette and
//! produces a reduced-palette raster: resampling, optional pre-filters,
//! perceptual color matching with dithering, optional post-filters. The
//! host supplies decoded pixels and reads decoded pixels back - no codec,
//! no I/O, no threads.
//!
//! # Quick Start
//!
//! ```
//! use palettize::{Palette, PaletteEntry, PipelineConfig, Processor, Raster};
//!
//! let mut source = Raster::new(2, 2);
//! source.fill([200, 30, 30, 255]);
//!
//! let palette = Palette::new(vec![
//!     PaletteEntry::new(0, [0, 0, 0]),
//!     PaletteEntry::new(1, [255, 0, 0]),
//! ]);
//!
//! let mut processor = Processor::new();
//! let output = processor
//!     .process(&source, &palette, &PipelineConfig::default())
//!     .unwrap();
//!
//! assert_eq!(output.raster.width(), 2);
//! assert_eq!(output.valid_pixels, 4);
//! assert_eq!(output.raster.rgb(0, 0), [255, 0, 0]);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA raster
//!     |
//!     v
//! Resample            nearest / bilinear / box / median / dominant
//!     |
//!     v
//! Pre-filters         blur, Kuwahara, sharpen, color correction, posterize
//!     |
//!     v
//! Dither + match      6 diffusion kernels, Bayer 2/4/8, random;
//!     |               rgb / hsv / oklab / lab matching policies
//!     v
//! Post-filters        mode, region merge, erode, outline, edge overlay
//!     |
//!     v
//! RGBA raster (palette colors only, alpha 0 or 255) + painted count
//! ```
//!
//! Stages run strictly in that order, synchronously, on one mutable
//! raster. The [`Processor`] owns bounded memoization caches that persist
//! across invocations; reset them when loading a new source image.
//!
//! # Color matching
//!
//! Four policies with different speed/quality tradeoffs (see
//! [`palette::MatchSpace`]):
//!
//! - `rgb`: legacy red-mean weighted distance, pure integer math with
//!   stable tie-breaking
//! - `hsv`: circular hue + saturation/value distance
//! - `oklab`: Euclidean distance in a perceptually uniform space
//! - `lab` (default): squared LAB distance with an optional chroma
//!   penalty that keeps vivid targets from desaturating toward muted
//!   palette entries

pub mod color;
pub mod dither;
pub mod error;
pub mod filter;
pub mod palette;
pub mod pipeline;
pub mod raster;
pub mod resample;


pub use dither::{DitherMethod, QuantizedImage, TransparencyPolicy};
pub use error::{PipelineError, RasterError};
pub use filter::{ColorAdjust, EdgeAlgorithm};
pub use palette::{MatchPolicy, MatchSpace, Matched, Matcher, Palette, PaletteEntry};
pub use pipeline::{
    DitherConfig, EdgeOverlayConfig, PipelineConfig, PipelineOutput, PostFilterConfig,
    PreFilterConfig, Processor, SharpenConfig,
};
pub use raster::Raster;
pub use resample::{resample, ResampleMethod};
