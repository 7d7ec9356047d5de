//! Separable box blur, Gaussian approximation, and unsharp-mask sharpen.

use crate::color::clamp_byte;
use crate::raster::Raster;

/// Separable box blur: one horizontal and one vertical sliding-window
/// pass, each dividing by the window width `2r + 1`. Edges are clamped
/// (replicated), so the divisor never changes.
pub fn box_blur(src: &Raster, radius: u32) -> Raster {
    if radius == 0 || src.is_empty() {
        return src.clone();
    }
    let tmp = blur_pass(src, radius, true);
    blur_pass(&tmp, radius, false)
}

/// Gaussian blur approximated by three successive box blurs.
pub fn gaussian_blur(src: &Raster, radius: u32) -> Raster {
    if radius == 0 || src.is_empty() {
        return src.clone();
    }
    let mut out = box_blur(src, radius);
    out = box_blur(&out, radius);
    box_blur(&out, radius)
}

fn blur_pass(src: &Raster, radius: u32, horizontal: bool) -> Raster {
    let w = src.width();
    let h = src.height();
    let mut dst = Raster::new(w, h);
    let window = 2 * radius as u64 + 1;
    let r = radius as i64;

    let (outer, inner) = if horizontal { (h, w) } else { (w, h) };
    let pixel_at = |line: u32, pos: u32| -> [u8; 4] {
        if horizontal {
            src.pixel(pos, line)
        } else {
            src.pixel(line, pos)
        }
    };

    for line in 0..outer {
        let clamp_pos = |p: i64| p.clamp(0, inner as i64 - 1) as u32;
        // Seed the window for position 0.
        let mut sums = [0u64; 4];
        for d in -r..=r {
            let p = pixel_at(line, clamp_pos(d));
            for c in 0..4 {
                sums[c] += p[c] as u64;
            }
        }
        for pos in 0..inner {
            let mut out = [0u8; 4];
            for c in 0..4 {
                out[c] = ((sums[c] + window / 2) / window) as u8;
            }
            if horizontal {
                dst.set_pixel(pos, line, out);
            } else {
                dst.set_pixel(line, pos, out);
            }
            // Slide: drop the trailing clamped sample, add the leading one.
            let leaving = pixel_at(line, clamp_pos(pos as i64 - r));
            let entering = pixel_at(line, clamp_pos(pos as i64 + r + 1));
            for c in 0..4 {
                sums[c] = sums[c] - leaving[c] as u64 + entering[c] as u64;
            }
        }
    }
    dst
}

/// Unsharp-mask sharpen: add `amount * (original - blurred)` per channel,
/// but only where the difference magnitude reaches `threshold` (keeps
/// flat regions and film grain untouched).
pub fn sharpen(src: &Raster, amount: f32, threshold: u8) -> Raster {
    if src.is_empty() || amount == 0.0 {
        return src.clone();
    }
    let blurred = box_blur(src, 1);
    let mut dst = src.clone();
    for y in 0..src.height() {
        for x in 0..src.width() {
            let orig = src.pixel(x, y);
            let blur = blurred.pixel(x, y);
            let mut out = orig;
            for c in 0..3 {
                let diff = orig[c] as f32 - blur[c] as f32;
                if diff.abs() >= threshold as f32 {
                    out[c] = clamp_byte(orig[c] as f32 + amount * diff);
                }
            }
            dst.set_pixel(x, y, out);
        }
    }
    dst
}
