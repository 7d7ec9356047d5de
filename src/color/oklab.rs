//! Oklab perceptual color space.
//!
//! Oklab (Björn Ottosson, 2020) is perceptually uniform: Euclidean
//! distance correlates with perceived color difference, which is what the
//! `oklab` matching policy relies on. Uses the updated 2021-01-25
//! matrices. L is in [0, 1] for in-gamut colors.
//!
//! <https://bottosson.github.io/posts/oklab/>

use super::srgb::{delinearize, linearize};

/// RGB (0..=255 per channel) to Oklab [L, a, b].
pub fn oklab_from_rgb(rgb: [u8; 3]) -> [f32; 3] {
    let [r, g, b] = linearize(rgb);

    let l = 0.412_221_47 * r + 0.536_332_54 * g + 0.051_445_993 * b;
    let m = 0.211_903_5 * r + 0.680_699_5 * g + 0.107_396_96 * b;
    let s = 0.088_302_46 * r + 0.281_718_84 * g + 0.629_978_7 * b;

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    [
        0.210_454_26 * l_ + 0.793_617_8 * m_ - 0.004_072_047 * s_,
        1.977_998_5 * l_ - 2.428_592_2 * m_ + 0.450_593_7 * s_,
        0.025_904_037 * l_ + 0.782_771_77 * m_ - 0.808_675_77 * s_,
    ]
}

/// Oklab [L, a, b] back to RGB bytes, clamping out-of-gamut values.
pub fn oklab_to_rgb(lab: [f32; 3]) -> [u8; 3] {
    let l_ = lab[0] + 0.396_337_78 * lab[1] + 0.215_803_76 * lab[2];
    let m_ = lab[0] - 0.105_561_346 * lab[1] - 0.063_854_17 * lab[2];
    let s_ = lab[0] - 0.089_484_18 * lab[1] - 1.291_485_5 * lab[2];

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    delinearize([
        4.076_741_7 * l - 3.307_711_6 * m + 0.230_969_94 * s,
        -1.268_438 * l + 2.609_757_4 * m - 0.341_319_38 * s,
        -0.004_196_086_3 * l - 0.703_418_6 * m + 1.707_614_7 * s,
    ])
}
