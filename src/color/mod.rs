//! Color space conversions.
//!
//! Eight spaces with forward and inverse transforms, all stateless and
//! referentially transparent (callers cache as needed, see
//! [`crate::palette::Matcher`]):
//!
//! - [`lab`]: XYZ, LAB, LCH, LUV (D65, shared sRGB linearization)
//! - [`oklab`]: Oklab
//! - [`hsv`]: HSV, HSL (gamma-encoded domain)
//! - [`yuv`]: YUV BT.601 (gamma-encoded domain)
//!
//! Every inverse clamps to valid bytes; round trips reproduce the input
//! within +/-1 per channel.

pub mod hsv;
pub mod lab;
pub mod oklab;
pub mod srgb;
pub mod yuv;

pub use hsv::{hsl_from_rgb, hsl_to_rgb, hsv_from_rgb, hsv_to_rgb, hue_distance};
pub use lab::{
    lab_chroma, lab_from_rgb, lab_to_rgb, lch_from_rgb, lch_to_rgb, luv_from_rgb, luv_to_rgb,
    xyz_from_rgb, xyz_to_rgb,
};
pub use oklab::{oklab_from_rgb, oklab_to_rgb};
pub use srgb::{clamp_byte, luma};
pub use yuv::{yuv_from_rgb, yuv_to_rgb};
