//! Edge detection and edge overlays.
//!
//! Grayscale (Rec. 601 luma) convolution with one of four kernels, an
//! optional non-maximum suppression pass, thresholding to a binary mask,
//! and iterative mask dilation for overlay thickness.

use serde::{Deserialize, Serialize};

use crate::color::luma;
use crate::raster::Raster;

/// Overlay thickness is clamped to this many dilation iterations.
const MAX_OVERLAY_DILATION: u32 = 6;

/// Edge detection convolution kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeAlgorithm {
    #[default]
    Sobel,
    Prewitt,
    Roberts,
    Laplacian,
}

/// Gradient magnitude plus a coarse direction flag per pixel.
///
/// `horizontal[i]` is true when the gradient is x-dominant (a vertical
/// edge). Laplacian has no direction; the flag is false everywhere.
pub struct EdgeMap {
    pub magnitude: Vec<f32>,
    pub horizontal: Vec<bool>,
    pub width: u32,
    pub height: u32,
}

/// Compute the gradient field of `src` with the given kernel.
pub fn gradient(src: &Raster, algorithm: EdgeAlgorithm) -> EdgeMap {
    let w = src.width() as i64;
    let h = src.height() as i64;
    let n = src.pixel_count();
    let mut gray = Vec::with_capacity(n);
    for y in 0..src.height() {
        for x in 0..src.width() {
            gray.push(luma(src.rgb(x, y)));
        }
    }
    let at = |x: i64, y: i64| -> f32 {
        let cx = x.clamp(0, w - 1);
        let cy = y.clamp(0, h - 1);
        gray[(cy * w + cx) as usize]
    };

    let mut magnitude = vec![0.0f32; n];
    let mut horizontal = vec![false; n];

    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) as usize;
            match algorithm {
                EdgeAlgorithm::Sobel | EdgeAlgorithm::Prewitt => {
                    let side = if algorithm == EdgeAlgorithm::Sobel {
                        2.0
                    } else {
                        1.0
                    };
                    let gx = (at(x + 1, y - 1) - at(x - 1, y - 1))
                        + side * (at(x + 1, y) - at(x - 1, y))
                        + (at(x + 1, y + 1) - at(x - 1, y + 1));
                    let gy = (at(x - 1, y + 1) - at(x - 1, y - 1))
                        + side * (at(x, y + 1) - at(x, y - 1))
                        + (at(x + 1, y + 1) - at(x + 1, y - 1));
                    magnitude[i] = (gx * gx + gy * gy).sqrt();
                    horizontal[i] = gx.abs() >= gy.abs();
                }
                EdgeAlgorithm::Roberts => {
                    let gx = at(x, y) - at(x + 1, y + 1);
                    let gy = at(x + 1, y) - at(x, y + 1);
                    magnitude[i] = (gx * gx + gy * gy).sqrt();
                    horizontal[i] = gx.abs() >= gy.abs();
                }
                EdgeAlgorithm::Laplacian => {
                    let v = at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1)
                        - 4.0 * at(x, y);
                    magnitude[i] = v.abs();
                }
            }
        }
    }

    EdgeMap {
        magnitude,
        horizontal,
        width: src.width(),
        height: src.height(),
    }
}

/// Suppress non-maxima along each pixel's dominant gradient axis.
///
/// A pixel survives only if its magnitude is at least that of both
/// neighbors along the gradient direction - thinning thick gradient
/// ridges to single-pixel edges.
pub fn non_maximum_suppression(map: &EdgeMap) -> Vec<f32> {
    let w = map.width as i64;
    let h = map.height as i64;
    let mut out = vec![0.0f32; map.magnitude.len()];
    let mag = |x: i64, y: i64| -> f32 {
        if x < 0 || x >= w || y < 0 || y >= h {
            0.0
        } else {
            map.magnitude[(y * w + x) as usize]
        }
    };
    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) as usize;
            let m = map.magnitude[i];
            let (a, b) = if map.horizontal[i] {
                (mag(x - 1, y), mag(x + 1, y))
            } else {
                (mag(x, y - 1), mag(x, y + 1))
            };
            if m >= a && m >= b {
                out[i] = m;
            }
        }
    }
    out
}

/// Detect edges: gradient, optional thinning, then threshold to a mask.
pub fn detect_edges(
    src: &Raster,
    algorithm: EdgeAlgorithm,
    thinning: bool,
    threshold: u8,
) -> Vec<bool> {
    let map = gradient(src, algorithm);
    let magnitude = if thinning && algorithm != EdgeAlgorithm::Laplacian {
        non_maximum_suppression(&map)
    } else {
        map.magnitude
    };
    let t = threshold as f32;
    magnitude.iter().map(|&m| m >= t).collect()
}

/// One 4-neighbor binary dilation step, repeated `iterations` times.
pub fn dilate_mask(mask: &[bool], width: u32, height: u32, iterations: u32) -> Vec<bool> {
    let w = width as i64;
    let h = height as i64;
    let mut current = mask.to_vec();
    for _ in 0..iterations {
        let mut next = current.clone();
        for y in 0..h {
            for x in 0..w {
                if current[(y * w + x) as usize] {
                    continue;
                }
                let grown = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                    .into_iter()
                    .any(|(nx, ny)| {
                        nx >= 0 && nx < w && ny >= 0 && ny < h && current[(ny * w + nx) as usize]
                    });
                if grown {
                    next[(y * w + x) as usize] = true;
                }
            }
        }
        current = next;
    }
    current
}

/// Paint detected edges black onto a copy of `src`.
///
/// `thickness` extra dilation iterations are clamped to 6 - overlay
/// thickness is a visual aid, not a morphology tool.
pub fn edge_overlay(
    src: &Raster,
    algorithm: EdgeAlgorithm,
    threshold: u8,
    thickness: u32,
    thinning: bool,
) -> Raster {
    if src.is_empty() {
        return src.clone();
    }
    let mut mask = detect_edges(src, algorithm, thinning, threshold);
    let iterations = thickness.min(MAX_OVERLAY_DILATION);
    if iterations > 0 {
        mask = dilate_mask(&mask, src.width(), src.height(), iterations);
    }
    let mut dst = src.clone();
    let w = src.width() as usize;
    for (i, &edge) in mask.iter().enumerate() {
        if edge {
            dst.set_pixel((i % w) as u32, (i / w) as u32, [0, 0, 0, 255]);
        }
    }
    dst
}
