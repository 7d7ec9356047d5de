//! Palette quantization with error-diffusion and ordered dithering.
//!
//! [`dither`] is the entry point: it builds the eligibility mask from the
//! transparency policy, then runs either a diffusion kernel or an ordered
//! threshold matrix over the raster, matching each eligible pixel through
//! the [`Matcher`](crate::palette::Matcher).

mod diffusion;
mod kernel;
mod mask;
mod ordered;

pub use diffusion::diffuse_dither;
pub use kernel::{
    Kernel, ATKINSON, BURKES, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE, SIERRA, STUCKI,
};
pub use mask::{classify_pixels, Disposition, TransparencyPolicy};
pub use ordered::{ordered_dither, OrderedMatrix, BAYER2, BAYER4, BAYER8};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::palette::{MatchPolicy, Matcher, Palette};
use crate::raster::Raster;

/// Dithering method selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DitherMethod {
    /// Floyd-Steinberg error diffusion (default).
    #[default]
    Floyd,
    /// Atkinson error diffusion (75% propagation).
    Atkinson,
    /// Jarvis-Judice-Ninke error diffusion.
    Jarvis,
    /// Stucki error diffusion.
    Stucki,
    /// Burkes error diffusion.
    Burkes,
    /// Sierra (full) error diffusion.
    Sierra,
    /// Ordered dithering, 2x2 Bayer matrix.
    Bayer2,
    /// Ordered dithering, 4x4 Bayer matrix.
    Bayer4,
    /// Ordered dithering, 8x8 Bayer matrix.
    Bayer8,
    /// Ordered dithering with a fresh uniform draw per pixel.
    Random,
}

/// How a [`DitherMethod`] quantizes: diffusion kernel or threshold matrix.
enum DitherMode {
    Diffusion(&'static Kernel),
    Ordered(OrderedMatrix),
}

impl DitherMethod {
    fn mode(&self) -> DitherMode {
        match self {
            Self::Floyd => DitherMode::Diffusion(&FLOYD_STEINBERG),
            Self::Atkinson => DitherMode::Diffusion(&ATKINSON),
            Self::Jarvis => DitherMode::Diffusion(&JARVIS_JUDICE_NINKE),
            Self::Stucki => DitherMode::Diffusion(&STUCKI),
            Self::Burkes => DitherMode::Diffusion(&BURKES),
            Self::Sierra => DitherMode::Diffusion(&SIERRA),
            Self::Bayer2 => DitherMode::Ordered(OrderedMatrix::Bayer2),
            Self::Bayer4 => DitherMode::Ordered(OrderedMatrix::Bayer4),
            Self::Bayer8 => DitherMode::Ordered(OrderedMatrix::Bayer8),
            Self::Random => DitherMode::Ordered(OrderedMatrix::Random),
        }
    }

    /// Parse a host-supplied method name. Unknown names fall back to
    /// Floyd-Steinberg with a logged warning - never an error, since the
    /// caller path must keep rendering.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "floyd" => Self::Floyd,
            "atkinson" => Self::Atkinson,
            "jarvis" => Self::Jarvis,
            "stucki" => Self::Stucki,
            "burkes" => Self::Burkes,
            "sierra" => Self::Sierra,
            "bayer2" => Self::Bayer2,
            "bayer4" => Self::Bayer4,
            "bayer8" => Self::Bayer8,
            "random" => Self::Random,
            other => {
                warn!(method = other, "unknown dither method, falling back to floyd");
                Self::Floyd
            }
        }
    }

    /// The diffusion kernel for this method, or `None` for ordered modes.
    pub fn kernel(&self) -> Option<&'static Kernel> {
        match self.mode() {
            DitherMode::Diffusion(kernel) => Some(kernel),
            DitherMode::Ordered(_) => None,
        }
    }

    /// The threshold matrix for this method, or `None` for diffusion modes.
    pub fn ordered_matrix(&self) -> Option<OrderedMatrix> {
        match self.mode() {
            DitherMode::Diffusion(_) => None,
            DitherMode::Ordered(matrix) => Some(matrix),
        }
    }
}

/// A quantized raster plus the count of pixels actually painted.
///
/// `valid_pixels` is what the host shows as progress; it counts quantized
/// and force-transparent pixels, never skipped ones, and is never matched
/// against the raster dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedImage {
    pub raster: Raster,
    pub valid_pixels: usize,
}

/// Quantize `src` to `palette` under the given method and policies.
#[allow(clippy::too_many_arguments)]
pub fn dither(
    src: &Raster,
    palette: &Palette,
    matcher: &mut Matcher,
    match_policy: &MatchPolicy,
    transparency: &TransparencyPolicy,
    method: DitherMethod,
    strength: f32,
) -> QuantizedImage {
    let mask = classify_pixels(src, transparency);
    match method.mode() {
        DitherMode::Diffusion(kernel) => {
            diffuse_dither(src, palette, matcher, match_policy, &mask, kernel)
        }
        DitherMode::Ordered(matrix) => {
            ordered_dither(src, palette, matcher, match_policy, &mask, matrix, strength)
        }
    }
}
