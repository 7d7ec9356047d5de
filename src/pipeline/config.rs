//! Host-facing pipeline configuration.
//!
//! Everything is serde-serializable with lowercase enum names and
//! per-field defaults, so a host can ship partial JSON and get sensible
//! behavior for whatever it leaves out.

use serde::{Deserialize, Serialize};

use crate::dither::{DitherMethod, TransparencyPolicy};
use crate::filter::{ColorAdjust, EdgeAlgorithm};
use crate::palette::MatchPolicy;
use crate::resample::ResampleMethod;

/// Dithering method and strength.
///
/// `strength` only affects the ordered methods (bayer2/4/8, random);
/// diffusion kernels always propagate their published weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherConfig {
    pub method: DitherMethod,
    pub strength: f32,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            method: DitherMethod::Floyd,
            strength: 1.0,
        }
    }
}

/// Unsharp-mask parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenConfig {
    pub amount: f32,
    pub threshold: u8,
}

impl Default for SharpenConfig {
    fn default() -> Self {
        Self {
            amount: 0.5,
            threshold: 4,
        }
    }
}

/// Filters applied to the resampled raster before quantization, in field
/// order. Zero radii/levels disable a stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreFilterConfig {
    /// Box blur radius; 0 disables.
    pub blur_radius: u32,
    /// Run the blur as three box passes (Gaussian approximation).
    pub gaussian: bool,
    /// Kuwahara quadrant radius; 0 disables.
    pub kuwahara_radius: u32,
    /// Unsharp-mask sharpen; absent disables.
    pub sharpen: Option<SharpenConfig>,
    /// Color correction; identity values disable.
    pub adjust: ColorAdjust,
    /// Posterize level count; below 2 disables.
    pub posterize_levels: u8,
}

/// Edge overlay drawn on the quantized output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeOverlayConfig {
    pub algorithm: EdgeAlgorithm,
    /// Gradient magnitude threshold.
    pub threshold: u8,
    /// Dilation iterations for overlay thickness (clamped to 6).
    pub thickness: u32,
    /// Thin edges with non-maximum suppression before thresholding.
    pub thinning: bool,
}

impl Default for EdgeOverlayConfig {
    fn default() -> Self {
        Self {
            algorithm: EdgeAlgorithm::Sobel,
            threshold: 48,
            thickness: 1,
            thinning: false,
        }
    }
}

/// Filters applied to the quantized raster, in field order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFilterConfig {
    /// Mode (majority) filter radius; 0 disables.
    pub mode_radius: u32,
    /// Merge connected components smaller than this; below 2 disables.
    pub simplify_min_size: u32,
    /// Binary erosion iterations; 0 disables.
    pub erode_iterations: u32,
    /// Black outline thickness around opaque content; 0 disables.
    pub outline_thickness: u32,
    /// Edge overlay; absent disables.
    pub edge_overlay: Option<EdgeOverlayConfig>,
}

/// Full pipeline configuration: resample, pre-filters, matching, dither,
/// transparency policy, post-filters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Destination width; 0 keeps the source width (with `height` 0).
    pub width: u32,
    /// Destination height; 0 keeps the source height (with `width` 0).
    pub height: u32,
    pub resample: ResampleMethod,
    pub pre: PreFilterConfig,
    pub matching: MatchPolicy,
    pub dither: DitherConfig,
    pub transparency: TransparencyPolicy,
    pub post: PostFilterConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::MatchSpace;

    #[test]
    fn test_json_round_trip_preserves_every_field() {
        let config = PipelineConfig {
            width: 64,
            height: 48,
            resample: ResampleMethod::Dominant,
            pre: PreFilterConfig {
                blur_radius: 2,
                gaussian: true,
                kuwahara_radius: 3,
                sharpen: Some(SharpenConfig {
                    amount: 1.5,
                    threshold: 8,
                }),
                adjust: ColorAdjust {
                    brightness: -10.0,
                    contrast: 1.2,
                    saturation: 0.8,
                    hue: 15.0,
                    gamma: 2.2,
                },
                posterize_levels: 5,
            },
            matching: MatchPolicy {
                space: MatchSpace::Oklab,
                chroma_penalty: false,
                chroma_penalty_weight: 0.3,
                white_threshold: 240,
            },
            dither: DitherConfig {
                method: DitherMethod::Bayer8,
                strength: 0.7,
            },
            transparency: TransparencyPolicy {
                paint_transparent_pixels: true,
                paint_white_pixels: false,
                transparency_threshold: 60,
                white_threshold: 245,
            },
            post: PostFilterConfig {
                mode_radius: 1,
                simplify_min_size: 4,
                erode_iterations: 1,
                outline_thickness: 2,
                edge_overlay: Some(EdgeOverlayConfig {
                    algorithm: EdgeAlgorithm::Prewitt,
                    threshold: 64,
                    thickness: 3,
                    thinning: true,
                }),
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"dither": {"method": "atkinson"}}"#).unwrap();
        assert_eq!(config.dither.method, DitherMethod::Atkinson);
        assert_eq!(config.dither.strength, 1.0);
        assert_eq!(config.resample, ResampleMethod::Nearest);
        assert_eq!(config.matching.space, MatchSpace::Lab);
        assert_eq!(config.width, 0);
    }

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&ResampleMethod::Median).unwrap();
        assert_eq!(json, "\"median\"");
        let json = serde_json::to_string(&EdgeAlgorithm::Laplacian).unwrap();
        assert_eq!(json, "\"laplacian\"");
        let space: MatchSpace = serde_json::from_str("\"rgb\"").unwrap();
        assert_eq!(space, MatchSpace::Rgb);
    }
}
