//! Raster resampling.
//!
//! Maps a source raster to a destination size under one of five policies.
//! The block-based methods (box, median, dominant) only make sense for
//! integer downscale factors; for non-integer factors they silently fall
//! back to nearest, which is also the default for pixel-art downscales
//! (hard edges, no invented colors).

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// Tolerance for deciding whether the scale factor is an integer.
const INTEGER_FACTOR_EPS: f64 = 1e-6;

/// Resampling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMethod {
    /// Pixel-aligned sampling, no interpolation. Hard edges.
    #[default]
    Nearest,
    /// Smooth interpolation of the four surrounding source pixels.
    Bilinear,
    /// Per-block average of all four channels (integer factors only).
    Box,
    /// Per-channel 16-bin histogram median over each block (integer
    /// factors only).
    Median,
    /// Most frequent quantized color per block (integer factors only).
    /// Preserves hard edges and flat regions better than averaging.
    Dominant,
}

/// Resample `src` to `dst_w` x `dst_h`.
///
/// Block methods fall back to [`ResampleMethod::Nearest`] when
/// `src_w / dst_w` is not an integer (within 1e-6); the integer factor
/// F = round(src_w / dst_w), clamped to at least 1, drives the block size.
/// Blocks extending past the source bounds are clamped, never read out of
/// range.
pub fn resample(src: &Raster, dst_w: u32, dst_h: u32, method: ResampleMethod) -> Raster {
    if src.is_empty() || dst_w == 0 || dst_h == 0 {
        return Raster::new(dst_w, dst_h);
    }

    let ratio = src.width() as f64 / dst_w as f64;
    let integer_factor = (ratio - ratio.round()).abs() < INTEGER_FACTOR_EPS;
    let factor = (ratio.round() as u32).max(1);

    let effective = match method {
        ResampleMethod::Nearest | ResampleMethod::Bilinear => method,
        _ if !integer_factor => ResampleMethod::Nearest,
        _ => method,
    };

    match effective {
        ResampleMethod::Nearest => nearest(src, dst_w, dst_h),
        ResampleMethod::Bilinear => bilinear(src, dst_w, dst_h),
        ResampleMethod::Box => block_average(src, dst_w, dst_h, factor),
        ResampleMethod::Median => block_median(src, dst_w, dst_h, factor),
        ResampleMethod::Dominant => block_dominant(src, dst_w, dst_h, factor),
    }
}

fn nearest(src: &Raster, dst_w: u32, dst_h: u32) -> Raster {
    let mut dst = Raster::new(dst_w, dst_h);
    for y in 0..dst_h {
        let sy = (y as u64 * src.height() as u64 / dst_h as u64).min(src.height() as u64 - 1);
        for x in 0..dst_w {
            let sx = (x as u64 * src.width() as u64 / dst_w as u64).min(src.width() as u64 - 1);
            dst.set_pixel(x, y, src.pixel(sx as u32, sy as u32));
        }
    }
    dst
}

fn bilinear(src: &Raster, dst_w: u32, dst_h: u32) -> Raster {
    let mut dst = Raster::new(dst_w, dst_h);
    let sx_scale = src.width() as f32 / dst_w as f32;
    let sy_scale = src.height() as f32 / dst_h as f32;
    let max_x = src.width() - 1;
    let max_y = src.height() - 1;

    for y in 0..dst_h {
        let gy = ((y as f32 + 0.5) * sy_scale - 0.5).max(0.0);
        let y0 = (gy as u32).min(max_y);
        let y1 = (y0 + 1).min(max_y);
        let fy = gy - y0 as f32;

        for x in 0..dst_w {
            let gx = ((x as f32 + 0.5) * sx_scale - 0.5).max(0.0);
            let x0 = (gx as u32).min(max_x);
            let x1 = (x0 + 1).min(max_x);
            let fx = gx - x0 as f32;

            let p00 = src.pixel(x0, y0);
            let p10 = src.pixel(x1, y0);
            let p01 = src.pixel(x0, y1);
            let p11 = src.pixel(x1, y1);

            let mut out = [0u8; 4];
            for c in 0..4 {
                let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
                let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
                out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
            }
            dst.set_pixel(x, y, out);
        }
    }
    dst
}

/// Iterate the clamped source block for destination pixel (x, y).
#[inline]
fn block_bounds(src: &Raster, x: u32, y: u32, factor: u32) -> (u32, u32, u32, u32) {
    let x0 = x * factor;
    let y0 = y * factor;
    let x1 = (x0 + factor).min(src.width());
    let y1 = (y0 + factor).min(src.height());
    (x0, y0, x1, y1)
}

fn block_average(src: &Raster, dst_w: u32, dst_h: u32, factor: u32) -> Raster {
    let mut dst = Raster::new(dst_w, dst_h);
    for y in 0..dst_h {
        for x in 0..dst_w {
            let (x0, y0, x1, y1) = block_bounds(src, x, y, factor);
            let mut sums = [0u64; 4];
            let mut count = 0u64;
            for sy in y0..y1 {
                for sx in x0..x1 {
                    let p = src.pixel(sx, sy);
                    for c in 0..4 {
                        sums[c] += p[c] as u64;
                    }
                    count += 1;
                }
            }
            if count == 0 {
                continue;
            }
            let mut out = [0u8; 4];
            for c in 0..4 {
                out[c] = ((sums[c] + count / 2) / count) as u8;
            }
            dst.set_pixel(x, y, out);
        }
    }
    dst
}

fn block_median(src: &Raster, dst_w: u32, dst_h: u32, factor: u32) -> Raster {
    let mut dst = Raster::new(dst_w, dst_h);
    for y in 0..dst_h {
        for x in 0..dst_w {
            let (x0, y0, x1, y1) = block_bounds(src, x, y, factor);
            // 16 bins per channel: bin = value >> 4, decode bin * 17.
            let mut bins = [[0u32; 16]; 4];
            let mut count = 0u32;
            for sy in y0..y1 {
                for sx in x0..x1 {
                    let p = src.pixel(sx, sy);
                    for c in 0..4 {
                        bins[c][(p[c] >> 4) as usize] += 1;
                    }
                    count += 1;
                }
            }
            if count == 0 {
                continue;
            }
            let half = count / 2;
            let mut out = [0u8; 4];
            for c in 0..4 {
                let mut cumulative = 0u32;
                for (bin, &n) in bins[c].iter().enumerate() {
                    cumulative += n;
                    if cumulative > half {
                        out[c] = (bin * 17) as u8;
                        break;
                    }
                }
            }
            dst.set_pixel(x, y, out);
        }
    }
    dst
}

fn block_dominant(src: &Raster, dst_w: u32, dst_h: u32, factor: u32) -> Raster {
    let mut dst = Raster::new(dst_w, dst_h);
    // 4-bit-per-channel RGB cube; reset only the buckets we touched.
    let mut counts = vec![0u32; 4096];
    let mut touched: Vec<u16> = Vec::with_capacity(factor as usize * factor as usize);

    for y in 0..dst_h {
        for x in 0..dst_w {
            let (x0, y0, x1, y1) = block_bounds(src, x, y, factor);
            let mut best_key = 0u16;
            let mut best_count = 0u32;
            for sy in y0..y1 {
                for sx in x0..x1 {
                    let [r, g, b] = src.rgb(sx, sy);
                    let key =
                        ((r as u16 >> 4) << 8) | ((g as u16 >> 4) << 4) | (b as u16 >> 4);
                    if counts[key as usize] == 0 {
                        touched.push(key);
                    }
                    counts[key as usize] += 1;
                    // Strictly-greater keeps the first bucket to reach a
                    // given count, i.e. first-seen wins ties.
                    if counts[key as usize] > best_count {
                        best_count = counts[key as usize];
                        best_key = key;
                    }
                }
            }
            for &key in &touched {
                counts[key as usize] = 0;
            }
            touched.clear();

            if best_count == 0 {
                continue;
            }
            let r = (((best_key >> 8) & 15) * 17) as u8;
            let g = (((best_key >> 4) & 15) * 17) as u8;
            let b = ((best_key & 15) * 17) as u8;
            dst.set_pixel(x, y, [r, g, b, 255]);
        }
    }
    dst
}
