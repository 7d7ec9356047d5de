//! CIE color spaces: XYZ, LAB, LCH and LUV, all D65-referenced.
//!
//! XYZ is the hub: LAB and LUV derive from it with their own
//! nonlinearities, LCH is the cylindrical form of LAB. All four share the
//! sRGB linearization in [`super::srgb`]. XYZ and the white point use the
//! conventional x100 scale so LAB/LUV lightness lands in [0, 100].

use super::srgb::{delinearize, linearize};

// D65 reference white, x100 scale.
const XN: f32 = 95.047;
const YN: f32 = 100.0;
const ZN: f32 = 108.883;

// CIE juncture constants: 216/24389 and 24389/27.
const EPSILON: f32 = 0.008_856_452;
const KAPPA: f32 = 903.296_3;

// D65 reference u'v' chromaticity for LUV.
const UN_PRIME: f32 = 0.197_839_8;
const VN_PRIME: f32 = 0.468_336_3;

/// RGB (0..=255 per channel) to XYZ (x100 scale).
pub fn xyz_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let [r, g, b] = linearize(rgb);
    [
        (0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b) * 100.0,
        (0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b) * 100.0,
        (0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b) * 100.0,
    ]
}

/// XYZ (x100 scale) back to RGB bytes, clamping out-of-gamut values.
pub fn xyz_to_rgb(xyz: [f32; 3]) -> [u8; 3] {
    let x = xyz[0] / 100.0;
    let y = xyz[1] / 100.0;
    let z = xyz[2] / 100.0;
    delinearize([
        3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z,
        -0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z,
        0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z,
    ])
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_f_inv(f: f32) -> f32 {
    let f3 = f * f * f;
    if f3 > EPSILON {
        f3
    } else {
        (116.0 * f - 16.0) / KAPPA
    }
}

/// RGB to CIE LAB. L in [0, 100], a/b roughly [-128, 127].
pub fn lab_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let [x, y, z] = xyz_from_rgb(rgb);
    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// CIE LAB back to RGB bytes.
pub fn lab_to_rgb(lab: [f32; 3]) -> [u8; 3] {
    let [l, a, b] = lab;
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let yr = if l > KAPPA * EPSILON {
        fy * fy * fy
    } else {
        l / KAPPA
    };
    xyz_to_rgb([lab_f_inv(fx) * XN, yr * YN, lab_f_inv(fz) * ZN])
}

/// Chroma magnitude of a LAB color: sqrt(a^2 + b^2).
#[inline]
pub fn lab_chroma(lab: [f32; 3]) -> f32 {
    (lab[1] * lab[1] + lab[2] * lab[2]).sqrt()
}

/// RGB to LCH (cylindrical LAB). Hue in [0, 360), degrees.
pub fn lch_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let [l, a, b] = lab_from_rgb(rgb);
    let c = (a * a + b * b).sqrt();
    let mut h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    if h >= 360.0 {
        h -= 360.0;
    }
    [l, c, h]
}

/// LCH back to RGB bytes.
pub fn lch_to_rgb(lch: [f32; 3]) -> [u8; 3] {
    let [l, c, h] = lch;
    let hr = h.to_radians();
    lab_to_rgb([l, c * hr.cos(), c * hr.sin()])
}

/// RGB to CIE LUV. L in [0, 100].
pub fn luv_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let [x, y, z] = xyz_from_rgb(rgb);
    let denom = x + 15.0 * y + 3.0 * z;
    // Pure black has no defined chromaticity; fall back to the white
    // point so u and v come out zero.
    let (u_prime, v_prime) = if denom > 0.0 {
        (4.0 * x / denom, 9.0 * y / denom)
    } else {
        (UN_PRIME, VN_PRIME)
    };
    let yr = y / YN;
    let l = if yr > EPSILON {
        116.0 * yr.cbrt() - 16.0
    } else {
        KAPPA * yr
    };
    [
        l,
        13.0 * l * (u_prime - UN_PRIME),
        13.0 * l * (v_prime - VN_PRIME),
    ]
}

/// CIE LUV back to RGB bytes.
pub fn luv_to_rgb(luv: [f32; 3]) -> [u8; 3] {
    let [l, u, v] = luv;
    if l <= 0.0 {
        return xyz_to_rgb([0.0, 0.0, 0.0]);
    }
    let u_prime = u / (13.0 * l) + UN_PRIME;
    let v_prime = v / (13.0 * l) + VN_PRIME;
    let y = if l > 8.0 {
        let fy = (l + 16.0) / 116.0;
        YN * fy * fy * fy
    } else {
        YN * l / KAPPA
    };
    if v_prime <= 0.0 {
        return xyz_to_rgb([0.0, y, 0.0]);
    }
    let x = y * 9.0 * u_prime / (4.0 * v_prime);
    let z = y * (12.0 - 3.0 * u_prime - 20.0 * v_prime) / (4.0 * v_prime);
    xyz_to_rgb([x, y, z])
}
