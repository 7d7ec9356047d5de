//! Error diffusion kernel tables.
//!
//! Each kernel lists `(dx, dy, weight)` neighbor entries plus the common
//! divisor; a neighbor receives `error * weight / divisor`. All kernels
//! propagate 100% of the error except Atkinson, which intentionally drops
//! 2/8 to reduce bleeding on small palettes.

/// An error diffusion kernel.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries. `dy` is always >= 0 (current row or
    /// below); negative `dx` reaches back-left on a following row.
    pub entries: &'static [(i32, i32, u8)],
    /// Common divisor for all weights.
    pub divisor: u8,
}

/// Floyd-Steinberg: 4 neighbors, /16.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
};

/// Atkinson: 6 neighbors, /8 (75% propagation).
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)],
    divisor: 8,
};

/// Jarvis-Judice-Ninke: 12 neighbors over 3 rows, /48.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
};

/// Stucki: 12 neighbors over 3 rows, /42. Sharper center weights than JJN.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1
/// ```
pub const STUCKI: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    divisor: 42,
};

/// Burkes: 7 neighbors over 2 rows, /32. Two-row simplification of Stucki.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
/// ```
pub const BURKES: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ],
    divisor: 32,
};

/// Sierra (full): 10 neighbors over 3 rows, /32.
///
/// ```text
///            X   5   3
///    2   4   5   4   2
///        2   3   2
/// ```
pub const SIERRA: Kernel = Kernel {
    entries: &[
        (1, 0, 5),
        (2, 0, 3),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 5),
        (1, 1, 4),
        (2, 1, 2),
        (-1, 2, 2),
        (0, 2, 3),
        (1, 2, 2),
    ],
    divisor: 32,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_sums() {
        let sum = |k: &Kernel| k.entries.iter().map(|&(_, _, w)| w as u32).sum::<u32>();
        // Full propagation for all kernels except Atkinson (6/8).
        assert_eq!(sum(&FLOYD_STEINBERG), 16);
        assert_eq!(sum(&JARVIS_JUDICE_NINKE), 48);
        assert_eq!(sum(&STUCKI), 42);
        assert_eq!(sum(&BURKES), 32);
        assert_eq!(sum(&SIERRA), 32);
        assert_eq!(sum(&ATKINSON), 6);
        assert_eq!(ATKINSON.divisor, 8);
    }

    #[test]
    fn test_entries_never_reach_backwards() {
        // dy >= 0 always; dy == 0 entries must have dx > 0, or the
        // raster-order scan would revisit written pixels.
        for k in [
            &FLOYD_STEINBERG,
            &ATKINSON,
            &JARVIS_JUDICE_NINKE,
            &STUCKI,
            &BURKES,
            &SIERRA,
        ] {
            for &(dx, dy, _) in k.entries {
                assert!(dy >= 0);
                if dy == 0 {
                    assert!(dx > 0);
                }
            }
        }
    }
}
