//! Mode (majority) filter.
//!
//! Replaces each opaque pixel with the most frequent RGB triple in its
//! window - a stronger flattener than blurring for pixel art since it
//! never invents colors. Transparent pixels neither vote nor change.

use std::collections::HashMap;

use crate::filter::is_opaque;
use crate::raster::{pack_rgb, unpack_rgb, Raster};

/// Majority vote over a `(2r+1) x (2r+1)` window. Ties favor the first
/// color visited in scan order.
pub fn mode_filter(src: &Raster, radius: u32) -> Raster {
    if radius == 0 || src.is_empty() {
        return src.clone();
    }
    let w = src.width() as i64;
    let h = src.height() as i64;
    let r = radius as i64;
    let mut dst = src.clone();
    let mut votes: HashMap<u32, u32> = HashMap::new();

    for y in 0..h {
        for x in 0..w {
            let alpha = src.alpha(x as u32, y as u32);
            if !is_opaque(alpha) {
                continue;
            }
            votes.clear();
            let mut best_key = pack_rgb(src.rgb(x as u32, y as u32));
            let mut best_count = 0u32;
            for ny in (y - r).max(0)..=(y + r).min(h - 1) {
                for nx in (x - r).max(0)..=(x + r).min(w - 1) {
                    if !is_opaque(src.alpha(nx as u32, ny as u32)) {
                        continue;
                    }
                    let key = pack_rgb(src.rgb(nx as u32, ny as u32));
                    let count = votes.entry(key).or_insert(0);
                    *count += 1;
                    // Strictly-greater keeps the first color to reach a
                    // given count: scan-order tie-breaking.
                    if *count > best_count {
                        best_count = *count;
                        best_key = key;
                    }
                }
            }
            let [wr, wg, wb] = unpack_rgb(best_key);
            dst.set_pixel(x as u32, y as u32, [wr, wg, wb, alpha]);
        }
    }
    dst
}
