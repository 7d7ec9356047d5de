//! Per-pixel quantization eligibility.
//!
//! The transparency/white policy decides, before any dithering starts,
//! what happens to each pixel: quantize it, force it transparent, or skip
//! it entirely. Error diffusion consults the mask so quantization error
//! never leaks into pixels that will not be painted.

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// Transparency and white-pixel handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyPolicy {
    /// Paint sub-threshold-alpha pixels as fully transparent output
    /// (counted as painted) instead of skipping them.
    pub paint_transparent_pixels: bool,
    /// Quantize white pixels like any other color. When false, white
    /// pixels are skipped so the host leaves them unpainted.
    pub paint_white_pixels: bool,
    /// Alpha below this counts as transparent.
    pub transparency_threshold: u8,
    /// All RGB channels at or above this counts as white.
    pub white_threshold: u8,
}

impl Default for TransparencyPolicy {
    fn default() -> Self {
        Self {
            paint_transparent_pixels: false,
            paint_white_pixels: true,
            transparency_threshold: 128,
            white_threshold: 250,
        }
    }
}

/// What the pipeline does with one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Participates in matching/diffusion; written as an opaque palette
    /// color and counted as painted.
    Quantize,
    /// Written as fully transparent black, counted as painted, matcher
    /// never invoked.
    ForceTransparent,
    /// Written as fully transparent black, not counted; diffusion error
    /// aimed here is dropped.
    Skip,
}

/// Classify every pixel of `src` under `policy`, row-major.
pub fn classify_pixels(src: &Raster, policy: &TransparencyPolicy) -> Vec<Disposition> {
    let mut mask = Vec::with_capacity(src.pixel_count());
    for y in 0..src.height() {
        for x in 0..src.width() {
            let [r, g, b, a] = src.pixel(x, y);
            let disposition = if a < policy.transparency_threshold {
                if policy.paint_transparent_pixels {
                    Disposition::ForceTransparent
                } else {
                    Disposition::Skip
                }
            } else if !policy.paint_white_pixels
                && r >= policy.white_threshold
                && g >= policy.white_threshold
                && b >= policy.white_threshold
            {
                Disposition::Skip
            } else {
                Disposition::Quantize
            };
            mask.push(disposition);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_skips_transparent() {
        let mut r = Raster::new(2, 1);
        r.set_pixel(0, 0, [10, 10, 10, 255]);
        r.set_pixel(1, 0, [10, 10, 10, 0]);
        let mask = classify_pixels(&r, &TransparencyPolicy::default());
        assert_eq!(mask, vec![Disposition::Quantize, Disposition::Skip]);
    }

    #[test]
    fn test_paint_transparent_forces() {
        let mut r = Raster::new(1, 1);
        r.set_pixel(0, 0, [10, 10, 10, 50]);
        let policy = TransparencyPolicy {
            paint_transparent_pixels: true,
            ..TransparencyPolicy::default()
        };
        let mask = classify_pixels(&r, &policy);
        assert_eq!(mask, vec![Disposition::ForceTransparent]);
    }

    #[test]
    fn test_white_skip() {
        let mut r = Raster::new(2, 1);
        r.set_pixel(0, 0, [255, 255, 255, 255]);
        r.set_pixel(1, 0, [250, 251, 250, 255]);
        let policy = TransparencyPolicy {
            paint_white_pixels: false,
            ..TransparencyPolicy::default()
        };
        let mask = classify_pixels(&r, &policy);
        assert_eq!(mask, vec![Disposition::Skip, Disposition::Skip]);

        // With the default policy, white pixels quantize normally.
        let mask = classify_pixels(&r, &TransparencyPolicy::default());
        assert_eq!(mask, vec![Disposition::Quantize, Disposition::Quantize]);
    }
}
