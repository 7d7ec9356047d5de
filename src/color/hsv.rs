//! HSV and HSL cylindrical color spaces.
//!
//! Both operate directly on the gamma-encoded RGB values (no
//! linearization). Hue is in degrees, normalized to [0, 360); saturation,
//! value and lightness are in [0, 1].

use super::srgb::to_byte;

#[inline]
fn hue_from_deltas(max: f32, d: f32, r: f32, g: f32, b: f32) -> f32 {
    if d == 0.0 {
        return 0.0;
    }
    let mut h = if max == r {
        60.0 * (((g - b) / d) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }
    if h >= 360.0 {
        h -= 360.0;
    }
    h
}

/// RGB (0..=255 per channel) to [hue, saturation, value].
pub fn hsv_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let s = if max == 0.0 { 0.0 } else { d / max };
    [hue_from_deltas(max, d, r, g, b), s, max]
}

/// [hue, saturation, value] back to RGB bytes.
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [u8; 3] {
    let [h, s, v] = hsv;
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    sector_to_rgb(h, c, x, m)
}

/// RGB (0..=255 per channel) to [hue, saturation, lightness].
pub fn hsl_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let l = (max + min) / 2.0;
    let s = if d == 0.0 {
        0.0
    } else {
        d / (1.0 - (2.0 * l - 1.0).abs())
    };
    [hue_from_deltas(max, d, r, g, b), s, l]
}

/// [hue, saturation, lightness] back to RGB bytes.
pub fn hsl_to_rgb(hsl: [f32; 3]) -> [u8; 3] {
    let [h, s, l] = hsl;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    sector_to_rgb(h, c, x, m)
}

#[inline]
fn sector_to_rgb(h: f32, c: f32, x: f32, m: f32) -> [u8; 3] {
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [to_byte(r + m), to_byte(g + m), to_byte(b + m)]
}

/// Circular hue distance normalized to [0, 1] (180 degrees apart = 1.0).
#[inline]
pub fn hue_distance(h1: f32, h2: f32) -> f32 {
    let d = (h1 - h2).abs() % 360.0;
    d.min(360.0 - d) / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(hsv_from_rgb([255, 0, 0]), [0.0, 1.0, 1.0]);
        assert_eq!(hsv_from_rgb([0, 255, 0]), [120.0, 1.0, 1.0]);
        assert_eq!(hsv_from_rgb([0, 0, 255]), [240.0, 1.0, 1.0]);

        let [h, s, l] = hsl_from_rgb([255, 0, 0]);
        assert_eq!((h, s, l), (0.0, 1.0, 0.5));
    }

    #[test]
    fn test_achromatic() {
        let [h, s, v] = hsv_from_rgb([128, 128, 128]);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 128.0 / 255.0).abs() < 1e-6);

        let [_, s, _] = hsl_from_rgb([77, 77, 77]);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_hue_distance_wraps() {
        assert!((hue_distance(10.0, 350.0) - 20.0 / 180.0).abs() < 1e-6);
        assert!((hue_distance(0.0, 180.0) - 1.0).abs() < 1e-6);
        assert_eq!(hue_distance(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_round_trips_sampled_grid() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let rgb = [r as u8, g as u8, b as u8];
                    let hsv_back = hsv_to_rgb(hsv_from_rgb(rgb));
                    let hsl_back = hsl_to_rgb(hsl_from_rgb(rgb));
                    for c in 0..3 {
                        assert!(
                            (rgb[c] as i32 - hsv_back[c] as i32).abs() <= 1,
                            "hsv round trip {rgb:?} -> {hsv_back:?}"
                        );
                        assert!(
                            (rgb[c] as i32 - hsl_back[c] as i32).abs() <= 1,
                            "hsl round trip {rgb:?} -> {hsl_back:?}"
                        );
                    }
                }
            }
        }
    }
}
