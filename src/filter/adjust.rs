//! Per-pixel color correction and posterization.

use serde::{Deserialize, Serialize};

use crate::color::{clamp_byte, hsl_from_rgb, hsl_to_rgb};
use crate::raster::Raster;

/// Color correction parameters, applied per pixel in a fixed order:
/// brightness, contrast, saturation/hue, gamma.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorAdjust {
    /// Additive brightness in -100..=100, scaled by 2.55 to channel units.
    pub brightness: f32,
    /// Linear contrast factor around the 128 midpoint (1.0 = unchanged).
    pub contrast: f32,
    /// Saturation multiplier in HSL (1.0 = unchanged).
    pub saturation: f32,
    /// Hue rotation in degrees (0 = unchanged).
    pub hue: f32,
    /// Gamma exponent applied as `v^(1/gamma)` on the normalized channel
    /// (1.0 = unchanged, > 1 brightens midtones).
    pub gamma: f32,
}

impl Default for ColorAdjust {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            hue: 0.0,
            gamma: 1.0,
        }
    }
}

impl ColorAdjust {
    /// True when every parameter is at its no-op value.
    pub fn is_identity(&self) -> bool {
        self.brightness == 0.0
            && self.contrast == 1.0
            && self.saturation == 1.0
            && self.hue == 0.0
            && self.gamma == 1.0
    }
}

/// Apply color correction; alpha is preserved.
pub fn adjust_colors(src: &Raster, adjust: &ColorAdjust) -> Raster {
    if adjust.is_identity() || src.is_empty() {
        return src.clone();
    }
    let brightness = adjust.brightness * 2.55;
    let mut dst = src.clone();

    for y in 0..src.height() {
        for x in 0..src.width() {
            let [r, g, b, a] = src.pixel(x, y);
            let mut rgb = [
                clamp_byte((r as f32 + brightness - 128.0) * adjust.contrast + 128.0),
                clamp_byte((g as f32 + brightness - 128.0) * adjust.contrast + 128.0),
                clamp_byte((b as f32 + brightness - 128.0) * adjust.contrast + 128.0),
            ];

            if adjust.saturation != 1.0 || adjust.hue != 0.0 {
                let [mut h, mut s, l] = hsl_from_rgb(rgb);
                h = (h + adjust.hue).rem_euclid(360.0);
                s = (s * adjust.saturation).clamp(0.0, 1.0);
                rgb = hsl_to_rgb([h, s, l]);
            }

            if adjust.gamma != 1.0 && adjust.gamma > 0.0 {
                let exponent = 1.0 / adjust.gamma;
                for c in rgb.iter_mut() {
                    *c = clamp_byte(255.0 * (*c as f32 / 255.0).powf(exponent));
                }
            }

            dst.set_pixel(x, y, [rgb[0], rgb[1], rgb[2], a]);
        }
    }
    dst
}

/// Reduce each channel to `levels` evenly spaced steps via floor-division.
pub fn posterize(src: &Raster, levels: u8) -> Raster {
    if levels < 2 || src.is_empty() {
        return src.clone();
    }
    let step = 256 / levels as u16;
    let top = (levels - 1) as u16;
    let mut dst = src.clone();
    for px in dst.data_mut().chunks_exact_mut(4) {
        for c in 0..3 {
            let bucket = (px[c] as u16 / step).min(top);
            px[c] = (bucket * 255 / top) as u8;
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_pixel(rgb: [u8; 3]) -> Raster {
        let mut r = Raster::new(1, 1);
        r.set_pixel(0, 0, [rgb[0], rgb[1], rgb[2], 255]);
        r
    }

    #[test]
    fn test_identity_is_noop() {
        let src = one_pixel([120, 90, 45]);
        assert_eq!(adjust_colors(&src, &ColorAdjust::default()), src);
    }

    #[test]
    fn test_brightness_scaling() {
        let src = one_pixel([100, 100, 100]);
        let out = adjust_colors(
            &src,
            &ColorAdjust {
                brightness: 10.0,
                ..ColorAdjust::default()
            },
        );
        // +10 brightness = +25.5 channel units, rounded.
        assert_eq!(out.rgb(0, 0), [126, 126, 126]);
    }

    #[test]
    fn test_contrast_pivots_at_midpoint() {
        let src = one_pixel([128, 28, 228]);
        let out = adjust_colors(
            &src,
            &ColorAdjust {
                contrast: 2.0,
                ..ColorAdjust::default()
            },
        );
        assert_eq!(out.rgb(0, 0)[0], 128, "midpoint must not move");
        assert_eq!(out.rgb(0, 0)[1], 0, "dark clamps down");
        assert_eq!(out.rgb(0, 0)[2], 255, "bright clamps up");
    }

    #[test]
    fn test_saturation_zero_desaturates() {
        let src = one_pixel([200, 40, 40]);
        let out = adjust_colors(
            &src,
            &ColorAdjust {
                saturation: 0.0,
                ..ColorAdjust::default()
            },
        );
        let [r, g, b] = out.rgb(0, 0);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_hue_rotation_wraps() {
        let src = one_pixel([255, 0, 0]);
        // 120 degrees from red lands on green.
        let out = adjust_colors(
            &src,
            &ColorAdjust {
                hue: 120.0,
                ..ColorAdjust::default()
            },
        );
        let [r, g, b] = out.rgb(0, 0);
        assert!(g > 200 && r < 50 && b < 50, "got {:?}", [r, g, b]);
    }

    #[test]
    fn test_gamma_brightens_midtones() {
        let src = one_pixel([64, 64, 64]);
        let out = adjust_colors(
            &src,
            &ColorAdjust {
                gamma: 2.2,
                ..ColorAdjust::default()
            },
        );
        assert!(out.rgb(0, 0)[0] > 64);
        // Endpoints are fixed points of the power law.
        assert_eq!(
            adjust_colors(
                &one_pixel([0, 0, 0]),
                &ColorAdjust {
                    gamma: 2.2,
                    ..ColorAdjust::default()
                }
            )
            .rgb(0, 0),
            [0, 0, 0]
        );
    }

    #[test]
    fn test_posterize_two_levels() {
        let mut src = Raster::new(4, 1);
        for (x, v) in [(0u32, 0u8), (1, 100), (2, 150), (3, 255)] {
            src.set_pixel(x, 0, [v, v, v, 255]);
        }
        let out = posterize(&src, 2);
        assert_eq!(out.rgb(0, 0), [0, 0, 0]);
        assert_eq!(out.rgb(1, 0), [0, 0, 0]);
        assert_eq!(out.rgb(2, 0), [255, 255, 255]);
        assert_eq!(out.rgb(3, 0), [255, 255, 255]);
    }

    #[test]
    fn test_posterize_keeps_alpha_and_level_count() {
        let mut src = Raster::new(256, 1);
        for x in 0..256u32 {
            src.set_pixel(x, 0, [x as u8, x as u8, x as u8, 77]);
        }
        let out = posterize(&src, 4);
        let mut seen = std::collections::HashSet::new();
        for x in 0..256u32 {
            seen.insert(out.rgb(x, 0)[0]);
            assert_eq!(out.alpha(x, 0), 77);
        }
        assert_eq!(seen.len(), 4);
    }
}
