//! Ordered (threshold-matrix) dithering.
//!
//! No diffusion state: each pixel's RGB is perturbed by a matrix-derived
//! offset and matched directly, so quantization outcomes never depend on
//! neighboring pixels. `Random` replaces the matrix with a fresh uniform
//! draw per pixel.

use rand::Rng;

use crate::color::clamp_byte;
use crate::dither::mask::Disposition;
use crate::dither::QuantizedImage;
use crate::palette::{MatchPolicy, Matcher, Palette};
use crate::raster::Raster;

/// Maximum perturbation amplitude at strength 1.0, in channel units.
const PERTURB_RANGE: f32 = 64.0;

pub const BAYER2: [[u8; 2]; 2] = [[0, 2], [3, 1]];

pub const BAYER4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Threshold source for ordered dithering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedMatrix {
    Bayer2,
    Bayer4,
    Bayer8,
    Random,
}

impl OrderedMatrix {
    /// Threshold in [0, 1) for the pixel at (x, y).
    #[inline]
    fn threshold(self, x: u32, y: u32, rng: &mut impl Rng) -> f32 {
        match self {
            OrderedMatrix::Bayer2 => {
                BAYER2[y as usize % 2][x as usize % 2] as f32 / 4.0
            }
            OrderedMatrix::Bayer4 => {
                BAYER4[y as usize % 4][x as usize % 4] as f32 / 16.0
            }
            OrderedMatrix::Bayer8 => {
                BAYER8[y as usize % 8][x as usize % 8] as f32 / 64.0
            }
            OrderedMatrix::Random => rng.gen::<f32>(),
        }
    }
}

/// Quantize `src` against `palette` with ordered dithering.
///
/// Each eligible pixel's channels are shifted by
/// `(threshold - 0.5) * 64 * strength` before matching; strength 0
/// degenerates to plain quantization.
pub fn ordered_dither(
    src: &Raster,
    palette: &Palette,
    matcher: &mut Matcher,
    policy: &MatchPolicy,
    mask: &[Disposition],
    matrix: OrderedMatrix,
    strength: f32,
) -> QuantizedImage {
    let width = src.width();
    let height = src.height();
    let w = width as usize;

    let mut out = Raster::new(width, height);
    let mut valid_pixels = 0usize;
    let mut rng = rand::thread_rng();

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
                    let [r, g, b] = src.rgb(x, y);
                    let offset = if strength > 0.0 {
                        (matrix.threshold(x, y, &mut rng) - 0.5) * PERTURB_RANGE * strength
                    } else {
                        0.0
                    };
                    let target = [
                        clamp_byte(r as f32 + offset),
                        clamp_byte(g as f32 + offset),
                        clamp_byte(b as f32 + offset),
                    ];
                    let matched = matcher.resolve_color(target, palette, policy, false);
                    let chosen = matched.rgb;
                    out.set_pixel(x, y, [chosen[0], chosen[1], chosen[2], 255]);
                    valid_pixels += 1;
                }
            }
        }
    }

    QuantizedImage {
        raster: out,
        valid_pixels,
    }
}
