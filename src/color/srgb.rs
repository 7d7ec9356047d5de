//! sRGB gamma curve and shared channel helpers.
//!
//! LAB, XYZ, LUV and Oklab all start from the same linearization of the
//! 8-bit sRGB channels (IEC 61966-2-1: linear segment below 0.04045,
//! 2.4 power above). HSV/HSL/YUV operate directly on the gamma-encoded
//! values and never call into this module.

/// Decode one gamma-encoded sRGB channel (0.0..=1.0) to linear light.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode one linear-light channel (0.0..=1.0) back to gamma sRGB.
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Linearize an 8-bit RGB triple into 0.0..=1.0 linear light.
#[inline]
pub fn linearize(rgb: [u8; 3]) -> [f32; 3] {
    [
        srgb_to_linear(rgb[0] as f32 / 255.0),
        srgb_to_linear(rgb[1] as f32 / 255.0),
        srgb_to_linear(rgb[2] as f32 / 255.0),
    ]
}

/// Encode a linear-light triple back to 8-bit sRGB, clamping overshoot.
#[inline]
pub fn delinearize(rgb: [f32; 3]) -> [u8; 3] {
    [
        to_byte(linear_to_srgb(rgb[0].clamp(0.0, 1.0))),
        to_byte(linear_to_srgb(rgb[1].clamp(0.0, 1.0))),
        to_byte(linear_to_srgb(rgb[2].clamp(0.0, 1.0))),
    ]
}

/// Scale a 0.0..=1.0 channel to a rounded, clamped byte.
#[inline]
pub fn to_byte(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Clamp an arbitrary float to the 0..=255 byte range, rounding.
#[inline]
pub fn clamp_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Rec. 601 luma of a gamma-encoded RGB triple, in 0.0..=255.0.
///
/// Used by edge detection and the Kuwahara variance tables.
#[inline]
pub fn luma(rgb: [u8; 3]) -> f32 {
    0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32
}
