//! Binary morphology on the alpha channel: erosion and outline.

use crate::raster::Raster;

/// Iterative boundary erosion: a pixel becomes transparent when any of
/// its 8 neighbors (or the raster border) is already transparent.
pub fn erode(src: &Raster, iterations: u32) -> Raster {
    let w = src.width() as i64;
    let h = src.height() as i64;
    let mut current = src.clone();
    for _ in 0..iterations {
        let snapshot = current.clone();
        let transparent_at = |x: i64, y: i64| -> bool {
            if x < 0 || x >= w || y < 0 || y >= h {
                return true;
            }
            snapshot.alpha(x as u32, y as u32) == 0
        };
        for y in 0..h {
            for x in 0..w {
                if snapshot.alpha(x as u32, y as u32) == 0 {
                    continue;
                }
                let mut shrink = false;
                'neighbors: for dy in -1..=1 {
                    for dx in -1..=1 {
                        if (dx, dy) == (0, 0) {
                            continue;
                        }
                        if transparent_at(x + dx, y + dy) {
                            shrink = true;
                            break 'neighbors;
                        }
                    }
                }
                if shrink {
                    current.set_pixel(x as u32, y as u32, [0, 0, 0, 0]);
                }
            }
        }
    }
    current
}

/// Draw a black outline around opaque content: dilate the opacity mask
/// `thickness` times (4-neighbor), then paint the band that is in the
/// dilated mask but not the original.
pub fn outline(src: &Raster, thickness: u32) -> Raster {
    if thickness == 0 || src.is_empty() {
        return src.clone();
    }
    let w = src.width();
    let h = src.height();
    let mut mask: Vec<bool> = Vec::with_capacity(src.pixel_count());
    for y in 0..h {
        for x in 0..w {
            mask.push(src.alpha(x, y) != 0);
        }
    }
    let dilated = super::edge::dilate_mask(&mask, w, h, thickness);

    let mut dst = src.clone();
    for (i, (&was, &now)) in mask.iter().zip(dilated.iter()).enumerate() {
        if now && !was {
            dst.set_pixel(i as u32 % w, i as u32 / w, [0, 0, 0, 255]);
        }
    }
    dst
}
