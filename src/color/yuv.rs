//! YUV (BT.601, full range).
//!
//! Operates on gamma-encoded RGB like HSV/HSL. Y is in [0, 255]; U and V
//! are signed chroma offsets around zero.

use super::srgb::clamp_byte;

/// RGB (0..=255 per channel) to [Y, U, V].
pub fn yuv_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;
    [
        0.299 * r + 0.587 * g + 0.114 * b,
        -0.14713 * r - 0.28886 * g + 0.436 * b,
        0.615 * r - 0.51499 * g - 0.10001 * b,
    ]
}

/// [Y, U, V] back to RGB bytes.
pub fn yuv_to_rgb(yuv: [f32; 3]) -> [u8; 3] {
    let [y, u, v] = yuv;
    [
        clamp_byte(y + 1.13983 * v),
        clamp_byte(y - 0.39465 * u - 0.58060 * v),
        clamp_byte(y + 2.03211 * u),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grey_has_no_chroma() {
        for v in [0u8, 85, 170, 255] {
            let [y, u, vv] = yuv_from_rgb([v, v, v]);
            assert!((y - v as f32).abs() < 0.01);
            assert!(u.abs() < 0.01);
            assert!(vv.abs() < 0.01);
        }
    }

    #[test]
    fn test_round_trip_sampled_grid() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let rgb = [r as u8, g as u8, b as u8];
                    let back = yuv_to_rgb(yuv_from_rgb(rgb));
                    for c in 0..3 {
                        assert!(
                            (rgb[c] as i32 - back[c] as i32).abs() <= 1,
                            "yuv round trip {rgb:?} -> {back:?}"
                        );
                    }
                }
            }
        }
    }
}
