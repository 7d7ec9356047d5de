//! Nearest-palette-color search with memoization.
//!
//! [`Matcher`] owns the per-processor caches: packed-RGB keys map to
//! derived color-space triples and to finished match results. Caches are
//! bounded by a hard cap and cleared wholesale on overflow - a deliberate
//! simplicity/perf tradeoff over LRU (see DESIGN.md).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::{hsv_from_rgb, hue_distance, lab_chroma, lab_from_rgb, oklab_from_rgb};
use crate::palette::Palette;
use crate::raster::pack_rgb;

/// Hard cap per cache; on overflow the whole cache is dropped.
const CACHE_CAP: usize = 16_384;

/// Target chroma above which the LAB chroma penalty engages.
const CHROMA_PENALTY_FLOOR: f32 = 20.0;

/// Which distance metric the matcher scores candidates with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchSpace {
    /// Legacy red-mean weighted RGB distance. Integer math with `>>8`
    /// shifts, preserved bit-exactly for host compatibility.
    Rgb,
    /// Circular hue distance combined quadratically with saturation and
    /// value differences.
    Hsv,
    /// Euclidean distance in Oklab.
    Oklab,
    /// Squared Euclidean distance in LAB, with an optional chroma penalty.
    #[default]
    Lab,
}

/// Immutable matching configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub space: MatchSpace,
    /// Penalize candidates less chromatic than a vivid target. Only
    /// meaningful for [`MatchSpace::Lab`].
    pub chroma_penalty: bool,
    pub chroma_penalty_weight: f32,
    /// Channel floor above which a pixel counts as white for the
    /// white-swatch override in [`Matcher::resolve_color`].
    pub white_threshold: u8,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            space: MatchSpace::Lab,
            chroma_penalty: true,
            chroma_penalty_weight: 0.15,
            white_threshold: 250,
        }
    }
}

/// Hashable fingerprint of a [`MatchPolicy`] for the match cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PolicyKey {
    space: MatchSpace,
    chroma_penalty: bool,
    weight_bits: u32,
    white_threshold: u8,
}

impl From<&MatchPolicy> for PolicyKey {
    fn from(p: &MatchPolicy) -> Self {
        Self {
            space: p.space,
            chroma_penalty: p.chroma_penalty,
            weight_bits: p.chroma_penalty_weight.to_bits(),
            white_threshold: p.white_threshold,
        }
    }
}

/// A match result.
///
/// `id` is `None` only for the empty-palette sentinel (the preview path
/// must stay non-fatal) and for exact-match misses; `rgb` then echoes the
/// target color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matched {
    pub id: Option<i32>,
    pub rgb: [u8; 3],
}

impl Matched {
    #[inline]
    fn sentinel(target: [u8; 3]) -> Self {
        Self {
            id: None,
            rgb: target,
        }
    }
}

/// Nearest-color search with bounded memoization.
#[derive(Debug, Default)]
pub struct Matcher {
    match_cache: HashMap<(u32, PolicyKey), Matched>,
    lab_cache: HashMap<u32, [f32; 3]>,
    oklab_cache: HashMap<u32, [f32; 3]>,
    hsv_cache: HashMap<u32, [f32; 3]>,
}

fn bounded_insert<K: std::hash::Hash + Eq, V>(map: &mut HashMap<K, V>, key: K, value: V) {
    if map.len() >= CACHE_CAP {
        map.clear();
    }
    map.insert(key, value);
}

fn cached_triple(
    cache: &mut HashMap<u32, [f32; 3]>,
    rgb: [u8; 3],
    convert: fn([u8; 3]) -> [f32; 3],
) -> [f32; 3] {
    let key = pack_rgb(rgb);
    if let Some(&t) = cache.get(&key) {
        return t;
    }
    let t = convert(rgb);
    bounded_insert(cache, key, t);
    t
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all memoized conversions and match results. Called when a new
    /// source image is loaded.
    pub fn reset(&mut self) {
        self.match_cache.clear();
        self.lab_cache.clear();
        self.oklab_cache.clear();
        self.hsv_cache.clear();
    }

    /// Total number of memoized entries across all caches.
    pub fn cache_size(&self) -> usize {
        self.match_cache.len() + self.lab_cache.len() + self.oklab_cache.len()
            + self.hsv_cache.len()
    }

    /// Find the palette entry closest to `target` under `policy`.
    ///
    /// An empty palette returns the sentinel (`id: None`, color echoed) -
    /// never an error. The first entry with the strictly lowest score
    /// wins; an exact zero-distance hit short-circuits the scan.
    pub fn find_closest(
        &mut self,
        target: [u8; 3],
        palette: &Palette,
        policy: &MatchPolicy,
    ) -> Matched {
        if palette.is_empty() {
            return Matched::sentinel(target);
        }

        let cache_key = (pack_rgb(target), PolicyKey::from(policy));
        if let Some(&hit) = self.match_cache.get(&cache_key) {
            return hit;
        }

        let result = match policy.space {
            MatchSpace::Rgb => self.scan_rgb(target, palette),
            MatchSpace::Hsv => self.scan_hsv(target, palette),
            MatchSpace::Oklab => self.scan_oklab(target, palette),
            MatchSpace::Lab => self.scan_lab(target, palette, policy),
        };

        bounded_insert(&mut self.match_cache, cache_key, result);
        result
    }

    /// Like [`find_closest`](Self::find_closest), with two host-facing
    /// extensions: an exact-match mode (identical-RGB scan, sentinel on
    /// miss) and a white-pixel override that keeps near-white targets on a
    /// dedicated white swatch instead of whatever the distance metric
    /// happens to prefer.
    pub fn resolve_color(
        &mut self,
        target: [u8; 3],
        palette: &Palette,
        policy: &MatchPolicy,
        exact_match: bool,
    ) -> Matched {
        if exact_match {
            for e in palette.iter() {
                if e.rgb == target {
                    return Matched {
                        id: Some(e.id),
                        rgb: e.rgb,
                    };
                }
            }
            return Matched::sentinel(target);
        }

        let t = policy.white_threshold;
        if target.iter().all(|&c| c >= t) {
            // Prefer an exact white hit, then the first sufficiently
            // white candidate.
            if let Some(e) = palette.iter().find(|e| e.rgb == target) {
                return Matched {
                    id: Some(e.id),
                    rgb: e.rgb,
                };
            }
            if let Some(e) = palette.iter().find(|e| e.rgb.iter().all(|&c| c >= t)) {
                return Matched {
                    id: Some(e.id),
                    rgb: e.rgb,
                };
            }
        }

        self.find_closest(target, palette, policy)
    }

    fn scan_rgb(&mut self, target: [u8; 3], palette: &Palette) -> Matched {
        let mut best = i64::MAX;
        let mut best_entry = palette.entries()[0];
        for &e in palette.iter() {
            let d = redmean_distance(target, e.rgb);
            if d < best {
                best = d;
                best_entry = e;
                if d == 0 {
                    break;
                }
            }
        }
        Matched {
            id: Some(best_entry.id),
            rgb: best_entry.rgb,
        }
    }

    fn scan_hsv(&mut self, target: [u8; 3], palette: &Palette) -> Matched {
        let t = cached_triple(&mut self.hsv_cache, target, hsv_from_rgb);
        let mut best = f32::MAX;
        let mut best_entry = palette.entries()[0];
        for &e in palette.iter() {
            let c = cached_triple(&mut self.hsv_cache, e.rgb, hsv_from_rgb);
            let dh = hue_distance(t[0], c[0]);
            let ds = t[1] - c[1];
            let dv = t[2] - c[2];
            let d = dh * dh + ds * ds + dv * dv;
            if d < best {
                best = d;
                best_entry = e;
                if d == 0.0 {
                    break;
                }
            }
        }
        Matched {
            id: Some(best_entry.id),
            rgb: best_entry.rgb,
        }
    }

    fn scan_oklab(&mut self, target: [u8; 3], palette: &Palette) -> Matched {
        let t = cached_triple(&mut self.oklab_cache, target, oklab_from_rgb);
        let mut best = f32::MAX;
        let mut best_entry = palette.entries()[0];
        for &e in palette.iter() {
            let c = cached_triple(&mut self.oklab_cache, e.rgb, oklab_from_rgb);
            let dl = t[0] - c[0];
            let da = t[1] - c[1];
            let db = t[2] - c[2];
            let d = (dl * dl + da * da + db * db).sqrt();
            if d < best {
                best = d;
                best_entry = e;
                if d == 0.0 {
                    break;
                }
            }
        }
        Matched {
            id: Some(best_entry.id),
            rgb: best_entry.rgb,
        }
    }

    fn scan_lab(&mut self, target: [u8; 3], palette: &Palette, policy: &MatchPolicy) -> Matched {
        let t = cached_triple(&mut self.lab_cache, target, lab_from_rgb);
        let target_chroma = lab_chroma(t);
        let penalize = policy.chroma_penalty && target_chroma > CHROMA_PENALTY_FLOOR;

        let mut best = f32::MAX;
        let mut best_entry = palette.entries()[0];
        for &e in palette.iter() {
            let c = cached_triple(&mut self.lab_cache, e.rgb, lab_from_rgb);
            let dl = t[0] - c[0];
            let da = t[1] - c[1];
            let db = t[2] - c[2];
            let mut d = dl * dl + da * da + db * db;
            if penalize {
                let candidate_chroma = lab_chroma(c);
                if candidate_chroma < target_chroma {
                    let gap = target_chroma - candidate_chroma;
                    d += gap * gap * policy.chroma_penalty_weight;
                }
            }
            if d < best {
                best = d;
                best_entry = e;
                if d == 0.0 {
                    break;
                }
            }
        }
        Matched {
            id: Some(best_entry.id),
            rgb: best_entry.rgb,
        }
    }
}

/// Red-mean weighted RGB distance, the classic low-cost perceptual
/// approximation. The `>>8` shifts (divide by 256, not 255) are a
/// performance-era shortcut preserved bit-exactly: changing them would
/// silently change which palette entries win ties.
#[inline]
fn redmean_distance(a: [u8; 3], b: [u8; 3]) -> i64 {
    let rmean = (a[0] as i64 + b[0] as i64) / 2;
    let dr = a[0] as i64 - b[0] as i64;
    let dg = a[1] as i64 - b[1] as i64;
    let db = a[2] as i64 - b[2] as i64;
    (((512 + rmean) * dr * dr) >> 8) + 4 * dg * dg + (((767 - rmean) * db * db) >> 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteEntry;

    fn rgbw_palette() -> Palette {
        Palette::new(vec![
            PaletteEntry::new(0, [0, 0, 0]),
            PaletteEntry::new(1, [255, 255, 255]),
            PaletteEntry::new(2, [255, 0, 0]),
            PaletteEntry::new(3, [0, 255, 0]),
            PaletteEntry::new(4, [0, 0, 255]),
        ])
    }

    #[test]
    fn test_exact_target_wins_in_every_space() {
        let palette = rgbw_palette();
        for space in [
            MatchSpace::Rgb,
            MatchSpace::Hsv,
            MatchSpace::Oklab,
            MatchSpace::Lab,
        ] {
            let policy = MatchPolicy {
                space,
                ..MatchPolicy::default()
            };
            let mut matcher = Matcher::new();
            for e in palette.iter() {
                let m = matcher.find_closest(e.rgb, &palette, &policy);
                assert_eq!(m.rgb, e.rgb, "space {space:?} missed exact {:?}", e.rgb);
            }
        }
    }

    #[test]
    fn test_empty_palette_sentinel() {
        let mut matcher = Matcher::new();
        let empty = Palette::default();
        let m = matcher.find_closest([12, 34, 56], &empty, &MatchPolicy::default());
        assert_eq!(m.id, None);
        assert_eq!(m.rgb, [12, 34, 56]);

        let m = matcher.resolve_color([255, 255, 255], &empty, &MatchPolicy::default(), false);
        assert_eq!(m.id, None);
    }

    #[test]
    fn test_redmean_is_symmetric_and_zero_on_equal() {
        assert_eq!(redmean_distance([10, 20, 30], [10, 20, 30]), 0);
        let a = [200, 10, 50];
        let b = [20, 100, 220];
        assert_eq!(redmean_distance(a, b), redmean_distance(b, a));
        assert!(redmean_distance(a, b) > 0);
    }

    #[test]
    fn test_first_entry_wins_ties() {
        // Two identical colors under different ids: the first must win.
        let palette = Palette::new(vec![
            PaletteEntry::new(10, [100, 100, 100]),
            PaletteEntry::new(20, [100, 100, 100]),
        ]);
        let mut matcher = Matcher::new();
        for space in [
            MatchSpace::Rgb,
            MatchSpace::Hsv,
            MatchSpace::Oklab,
            MatchSpace::Lab,
        ] {
            let policy = MatchPolicy {
                space,
                ..MatchPolicy::default()
            };
            let m = matcher.find_closest([90, 90, 90], &palette, &policy);
            assert_eq!(m.id, Some(10), "space {space:?} broke the tie wrong");
        }
    }

    #[test]
    fn test_chroma_penalty_steers_vivid_targets() {
        // Muted grey is the plain-LAB winner for this reddish target; the
        // penalty makes the (far-hue but vivid) blue win instead.
        let palette = Palette::new(vec![
            PaletteEntry::new(1, [120, 120, 120]),
            PaletteEntry::new(2, [0, 60, 255]),
        ]);
        let target = [180, 60, 60];

        let mut matcher = Matcher::new();
        let plain = MatchPolicy {
            chroma_penalty: false,
            ..MatchPolicy::default()
        };
        assert_eq!(matcher.find_closest(target, &palette, &plain).id, Some(1));

        let penalized = MatchPolicy {
            chroma_penalty: true,
            chroma_penalty_weight: 10.0,
            ..MatchPolicy::default()
        };
        assert_eq!(
            matcher.find_closest(target, &palette, &penalized).id,
            Some(2)
        );
    }

    #[test]
    fn test_resolve_exact_mode() {
        let palette = rgbw_palette();
        let mut matcher = Matcher::new();
        let policy = MatchPolicy::default();

        let m = matcher.resolve_color([255, 0, 0], &palette, &policy, true);
        assert_eq!(m.id, Some(2));

        // Near-miss returns the sentinel in exact mode.
        let m = matcher.resolve_color([254, 0, 0], &palette, &policy, true);
        assert_eq!(m.id, None);
        assert_eq!(m.rgb, [254, 0, 0]);
    }

    #[test]
    fn test_resolve_white_override() {
        // Exact white entry plus near-white distractors; a white target
        // must land on the dedicated white swatch.
        let palette = Palette::new(vec![
            PaletteEntry::new(1, [252, 252, 250]),
            PaletteEntry::new(5, [255, 255, 255]),
            PaletteEntry::new(9, [250, 251, 252]),
        ]);
        let mut matcher = Matcher::new();
        let policy = MatchPolicy::default();

        let m = matcher.resolve_color([255, 255, 255], &palette, &policy, false);
        assert_eq!(m.id, Some(5));

        // A near-white (non-exact) target prefers the first white-enough
        // candidate over a distance search.
        let m = matcher.resolve_color([253, 253, 253], &palette, &policy, false);
        assert_eq!(m.id, Some(1));
    }

    #[test]
    fn test_cache_bounded_and_consistent() {
        let palette = Palette::new(vec![PaletteEntry::new(0, [0, 0, 0])]);
        let policy = MatchPolicy::default();
        let mut matcher = Matcher::new();

        // More distinct colors than the cap; cache must stay bounded and
        // results must stay correct after the wholesale clear.
        for r in (0..=255u16).step_by(9) {
            for g in (0..=255u16).step_by(9) {
                for b in (0..=255u16).step_by(9) {
                    let m = matcher.find_closest([r as u8, g as u8, b as u8], &palette, &policy);
                    assert_eq!(m.id, Some(0));
                }
            }
        }
        assert!(matcher.cache_size() <= 4 * CACHE_CAP);

        matcher.reset();
        assert_eq!(matcher.cache_size(), 0);
    }
}
