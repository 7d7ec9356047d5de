//! Error diffusion over an eligibility mask.

use crate::color::clamp_byte;
use crate::dither::kernel::Kernel;
use crate::dither::mask::Disposition;
use crate::dither::QuantizedImage;
use crate::palette::{MatchPolicy, Matcher, Palette};
use crate::raster::Raster;

/// Quantize `src` against `palette` with the given diffusion kernel.
///
/// Strict raster order (row-major): each pixel reads its accumulated
/// error, matches, and pushes weighted error fractions to forward/below
/// neighbors. Error aimed at an ineligible or out-of-bounds neighbor is
/// dropped, not redistributed - a deliberate simplification (see
/// DESIGN.md).
pub fn diffuse_dither(
    src: &Raster,
    palette: &Palette,
    matcher: &mut Matcher,
    policy: &MatchPolicy,
    mask: &[Disposition],
    kernel: &Kernel,
) -> QuantizedImage {
    let width = src.width();
    let height = src.height();
    let w = width as usize;

    let mut out = Raster::new(width, height);
    let mut valid_pixels = 0usize;

    // Accumulation buffer: the pixel's running RGB including diffused
    // error, seeded from the source.
    let mut accum: Vec<[f32; 3]> = Vec::with_capacity(src.pixel_count());
    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = src.rgb(x, y);
            accum.push([r as f32, g as f32, b as f32]);
        }
    }

    let divisor = kernel.divisor as f32;

    for y in 0..height {
        for x in 0..width {
            let i = y as usize * w + x as usize;
            match mask[i] {
                Disposition::ForceTransparent => {
                    out.set_pixel(x, y, [0, 0, 0, 0]);
                    valid_pixels += 1;
                }
                Disposition::Skip => {
                    out.set_pixel(x, y, [0, 0, 0, 0]);
                }
                Disposition::Quantize => {
                    let accumulated = accum[i];
                    let target = [
                        clamp_byte(accumulated[0]),
                        clamp_byte(accumulated[1]),
                        clamp_byte(accumulated[2]),
                    ];
                    let matched = matcher.resolve_color(target, palette, policy, false);
                    let chosen = matched.rgb;
                    out.set_pixel(x, y, [chosen[0], chosen[1], chosen[2], 255]);
                    valid_pixels += 1;

                    let error = [
                        accumulated[0] - chosen[0] as f32,
                        accumulated[1] - chosen[1] as f32,
                        accumulated[2] - chosen[2] as f32,
                    ];

                    for &(dx, dy, weight) in kernel.entries {
                        let nx = x as i64 + dx as i64;
                        let ny = y as i64 + dy as i64;
                        if nx < 0 || nx >= width as i64 || ny >= height as i64 {
                            continue;
                        }
                        let ni = ny as usize * w + nx as usize;
                        if mask[ni] != Disposition::Quantize {
                            continue;
                        }
                        let fraction = weight as f32 / divisor;
                        accum[ni][0] += error[0] * fraction;
                        accum[ni][1] += error[1] * fraction;
                        accum[ni][2] += error[2] * fraction;
                    }
                }
            }
        }
    }

    QuantizedImage {
        raster: out,
        valid_pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::kernel::FLOYD_STEINBERG;
    use crate::dither::mask::{classify_pixels, TransparencyPolicy};
    use crate::palette::PaletteEntry;

    fn bw_palette() -> Palette {
        Palette::new(vec![
            PaletteEntry::new(0, [0, 0, 0]),
            PaletteEntry::new(1, [255, 255, 255]),
        ])
    }

    fn flat_grey(w: u32, h: u32, v: u8) -> Raster {
        let mut r = Raster::new(w, h);
        r.fill([v, v, v, 255]);
        r
    }

    #[test]
    fn test_floyd_conserves_mean_luminance() {
        // Flat 50% grey against black/white: diffusion must keep the
        // average output close to the input average (error is conserved,
        // minus what falls off the right/bottom edges).
        let src = flat_grey(32, 32, 128);
        let palette = bw_palette();
        let mut matcher = Matcher::new();
        let mask = classify_pixels(&src, &TransparencyPolicy::default());

        let result = diffuse_dither(
            &src,
            &palette,
            &mut matcher,
            &MatchPolicy::default(),
            &mask,
            &FLOYD_STEINBERG,
        );

        let mean: f64 = result
            .raster
            .data()
            .chunks_exact(4)
            .map(|p| p[0] as f64)
            .sum::<f64>()
            / (32.0 * 32.0);
        assert!(
            (mean - 128.0).abs() < 10.0,
            "mean luminance {mean} drifted from 128"
        );
        assert_eq!(result.valid_pixels, 32 * 32);
    }

    #[test]
    fn test_output_alpha_is_binary_and_colors_in_palette() {
        let src = flat_grey(8, 8, 77);
        let palette = bw_palette();
        let mut matcher = Matcher::new();
        let mask = classify_pixels(&src, &TransparencyPolicy::default());
        let result = diffuse_dither(
            &src,
            &palette,
            &mut matcher,
            &MatchPolicy::default(),
            &mask,
            &FLOYD_STEINBERG,
        );
        for px in result.raster.data().chunks_exact(4) {
            assert_eq!(px[3], 255);
            assert!(px[0] == 0 || px[0] == 255);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_error_not_diffused_into_skipped_pixels() {
        // Right half transparent (skipped). The skipped pixels must come
        // out fully transparent, untouched by diffusion.
        let mut src = flat_grey(4, 1, 128);
        src.set_pixel(2, 0, [128, 128, 128, 0]);
        src.set_pixel(3, 0, [128, 128, 128, 0]);
        let palette = bw_palette();
        let mut matcher = Matcher::new();
        let mask = classify_pixels(&src, &TransparencyPolicy::default());
        let result = diffuse_dither(
            &src,
            &palette,
            &mut matcher,
            &MatchPolicy::default(),
            &mask,
            &FLOYD_STEINBERG,
        );
        assert_eq!(result.raster.pixel(2, 0), [0, 0, 0, 0]);
        assert_eq!(result.raster.pixel(3, 0), [0, 0, 0, 0]);
        assert_eq!(result.valid_pixels, 2);
    }

    #[test]
    fn test_forced_transparent_counts_as_valid() {
        let mut src = flat_grey(2, 1, 128);
        src.set_pixel(1, 0, [0, 0, 0, 10]);
        let palette = bw_palette();
        let mut matcher = Matcher::new();
        let policy = TransparencyPolicy {
            paint_transparent_pixels: true,
            ..TransparencyPolicy::default()
        };
        let mask = classify_pixels(&src, &policy);
        let result = diffuse_dither(
            &src,
            &palette,
            &mut matcher,
            &MatchPolicy::default(),
            &mask,
            &FLOYD_STEINBERG,
        );
        assert_eq!(result.raster.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(result.valid_pixels, 2);
    }
}
