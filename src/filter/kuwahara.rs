//! Kuwahara edge-preserving quantile filter.
//!
//! For each opaque pixel, four overlapping quadrant regions of radius r
//! are evaluated and the one with minimum luminance variance supplies the
//! output mean - smoothing flat areas while leaving edges crisp. Region
//! statistics come from six summed-area tables (R, G, B, count, luma,
//! luma squared) built over opaque pixels only; transparent pixels pass
//! through unmodified.

use crate::color::{clamp_byte, luma};
use crate::filter::is_opaque;
use crate::raster::Raster;

struct IntegralTables {
    w: usize,
    r: Vec<f64>,
    g: Vec<f64>,
    b: Vec<f64>,
    count: Vec<f64>,
    lum: Vec<f64>,
    lum2: Vec<f64>,
}

impl IntegralTables {
    /// Build (w+1) x (h+1) running-sum grids over opaque pixels.
    fn build(src: &Raster) -> Self {
        let w = src.width() as usize;
        let h = src.height() as usize;
        let stride = w + 1;
        let len = stride * (h + 1);
        let mut t = Self {
            w: stride,
            r: vec![0.0; len],
            g: vec![0.0; len],
            b: vec![0.0; len],
            count: vec![0.0; len],
            lum: vec![0.0; len],
            lum2: vec![0.0; len],
        };
        for y in 0..h {
            for x in 0..w {
                let [pr, pg, pb, pa] = src.pixel(x as u32, y as u32);
                let (vr, vg, vb, vc, vl, vl2) = if is_opaque(pa) {
                    let l = luma([pr, pg, pb]) as f64;
                    (pr as f64, pg as f64, pb as f64, 1.0, l, l * l)
                } else {
                    (0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
                };
                let i = (y + 1) * stride + (x + 1);
                let up = y * stride + (x + 1);
                let left = (y + 1) * stride + x;
                let diag = y * stride + x;
                t.r[i] = vr + t.r[up] + t.r[left] - t.r[diag];
                t.g[i] = vg + t.g[up] + t.g[left] - t.g[diag];
                t.b[i] = vb + t.b[up] + t.b[left] - t.b[diag];
                t.count[i] = vc + t.count[up] + t.count[left] - t.count[diag];
                t.lum[i] = vl + t.lum[up] + t.lum[left] - t.lum[diag];
                t.lum2[i] = vl2 + t.lum2[up] + t.lum2[left] - t.lum2[diag];
            }
        }
        t
    }

    /// Sum over the inclusive rectangle [x0, x1] x [y0, y1].
    #[inline]
    fn query(&self, table: &[f64], x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        table[(y1 + 1) * self.w + (x1 + 1)] - table[y0 * self.w + (x1 + 1)]
            - table[(y1 + 1) * self.w + x0]
            + table[y0 * self.w + x0]
    }
}

/// Apply the Kuwahara filter with quadrant radius `radius`.
pub fn kuwahara(src: &Raster, radius: u32) -> Raster {
    if radius == 0 || src.is_empty() {
        return src.clone();
    }
    let w = src.width() as usize;
    let h = src.height() as usize;
    let r = radius as i64;
    let tables = IntegralTables::build(src);
    let mut dst = src.clone();

    for y in 0..h {
        for x in 0..w {
            let alpha = src.alpha(x as u32, y as u32);
            if !is_opaque(alpha) {
                continue;
            }
            // Four overlapping quadrants, each anchored at the pixel.
            let quads = [
                (x as i64 - r, y as i64 - r, x as i64, y as i64),
                (x as i64, y as i64 - r, x as i64 + r, y as i64),
                (x as i64 - r, y as i64, x as i64, y as i64 + r),
                (x as i64, y as i64, x as i64 + r, y as i64 + r),
            ];

            let mut best_var = f64::MAX;
            let mut best_rgb = src.rgb(x as u32, y as u32);
            for (qx0, qy0, qx1, qy1) in quads {
                let x0 = qx0.clamp(0, w as i64 - 1) as usize;
                let y0 = qy0.clamp(0, h as i64 - 1) as usize;
                let x1 = qx1.clamp(0, w as i64 - 1) as usize;
                let y1 = qy1.clamp(0, h as i64 - 1) as usize;
                let n = tables.query(&tables.count, x0, y0, x1, y1);
                if n <= 0.0 {
                    continue;
                }
                let mean_l = tables.query(&tables.lum, x0, y0, x1, y1) / n;
                let variance = tables.query(&tables.lum2, x0, y0, x1, y1) / n - mean_l * mean_l;
                if variance < best_var {
                    best_var = variance;
                    best_rgb = [
                        clamp_byte((tables.query(&tables.r, x0, y0, x1, y1) / n) as f32),
                        clamp_byte((tables.query(&tables.g, x0, y0, x1, y1) / n) as f32),
                        clamp_byte((tables.query(&tables.b, x0, y0, x1, y1) / n) as f32),
                    ];
                }
            }
            dst.set_pixel(x as u32, y as u32, [best_rgb[0], best_rgb[1], best_rgb[2], alpha]);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_identity() {
        let mut src = Raster::new(6, 6);
        src.fill([80, 90, 100, 255]);
        assert_eq!(kuwahara(&src, 2), src);
    }

    #[test]
    fn test_preserves_step_edge() {
        // Vertical step edge: the minimum-variance quadrant lies entirely
        // on the pixel's own side, so the edge stays sharp.
        let mut src = Raster::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let v = if x < 4 { 20 } else { 220 };
                src.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        let out = kuwahara(&src, 2);
        for y in 0..8 {
            assert_eq!(out.rgb(3, y), [20, 20, 20], "dark side bled at y={y}");
            assert_eq!(out.rgb(4, y), [220, 220, 220], "bright side bled at y={y}");
        }
    }

    #[test]
    fn test_transparent_passes_through() {
        let mut src = Raster::new(4, 4);
        src.fill([50, 50, 50, 255]);
        src.set_pixel(1, 1, [200, 10, 10, 0]);
        let out = kuwahara(&src, 1);
        assert_eq!(out.pixel(1, 1), [200, 10, 10, 0]);
    }

    #[test]
    fn test_smooths_speckle_noise() {
        // Single bright speckle inside a flat region is averaged away by a
        // quadrant that excludes it.
        let mut src = Raster::new(7, 7);
        src.fill([100, 100, 100, 255]);
        src.set_pixel(3, 3, [250, 250, 250, 255]);
        let out = kuwahara(&src, 2);
        // Every quadrant of the speckle contains the speckle itself, so
        // its output is the quadrant mean, well below the original value.
        assert!(out.rgb(3, 3)[0] < 150);
        // Far-away pixels are untouched.
        assert_eq!(out.rgb(0, 0), [100, 100, 100]);
    }
}
