//! Small-region merging.
//!
//! Flood-fills connected components of identical opaque color
//! (4-connectivity) and repaints any component smaller than a threshold
//! to its most frequent differing border color. Cleans up stray dither
//! speckles before the host paints pixel by pixel.

use std::collections::HashMap;

use crate::filter::is_opaque;
use crate::raster::{pack_rgb, unpack_rgb, Raster};

/// Merge connected components smaller than `min_size` pixels into their
/// dominant border color. Running twice with the same threshold is
/// idempotent: surviving components only ever grow.
pub fn merge_small_regions(raster: &mut Raster, min_size: usize) {
    if min_size < 2 || raster.is_empty() {
        return;
    }
    let w = raster.width() as i64;
    let h = raster.height() as i64;
    let mut visited = vec![false; raster.pixel_count()];
    let mut component: Vec<(i64, i64)> = Vec::new();
    let mut stack: Vec<(i64, i64)> = Vec::new();
    let mut border_votes: HashMap<u32, u32> = HashMap::new();

    for sy in 0..h {
        for sx in 0..w {
            let start = (sy * w + sx) as usize;
            if visited[start] || !is_opaque(raster.alpha(sx as u32, sy as u32)) {
                continue;
            }
            let region_rgb = raster.rgb(sx as u32, sy as u32);
            let region_key = pack_rgb(region_rgb);

            // Flood fill the exact-color component.
            component.clear();
            stack.clear();
            visited[start] = true;
            stack.push((sx, sy));
            while let Some((x, y)) = stack.pop() {
                component.push((x, y));
                for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                    if nx < 0 || nx >= w || ny < 0 || ny >= h {
                        continue;
                    }
                    let ni = (ny * w + nx) as usize;
                    if visited[ni]
                        || !is_opaque(raster.alpha(nx as u32, ny as u32))
                        || pack_rgb(raster.rgb(nx as u32, ny as u32)) != region_key
                    {
                        continue;
                    }
                    visited[ni] = true;
                    stack.push((nx, ny));
                }
            }

            if component.len() >= min_size {
                continue;
            }

            // Vote over differing opaque border neighbors; the first
            // color to reach the winning count keeps it on ties.
            border_votes.clear();
            let mut best_key = None;
            let mut best_count = 0u32;
            for &(x, y) in &component {
                for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                    if nx < 0 || nx >= w || ny < 0 || ny >= h {
                        continue;
                    }
                    if !is_opaque(raster.alpha(nx as u32, ny as u32)) {
                        continue;
                    }
                    let key = pack_rgb(raster.rgb(nx as u32, ny as u32));
                    if key == region_key {
                        continue;
                    }
                    let count = border_votes.entry(key).or_insert(0);
                    *count += 1;
                    if *count > best_count {
                        best_count = *count;
                        best_key = Some(key);
                    }
                }
            }

            // An isolated component (no opaque differing neighbor) stays.
            if let Some(key) = best_key {
                let [r, g, b] = unpack_rgb(key);
                for &(x, y) in &component {
                    let a = raster.alpha(x as u32, y as u32);
                    raster.set_pixel(x as u32, y as u32, [r, g, b, a]);
                }
            }
        }
    }
}
