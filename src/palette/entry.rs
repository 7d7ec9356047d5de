//! Palette entries and the ordered palette container.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after
    /// stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Parse a hex color string: `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`,
/// case-insensitive, whitespace trimmed.
pub fn parse_hex(s: &str) -> Result<[u8; 3], ParseColorError> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    match s.len() {
        3 => {
            // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
            let r = u8::from_str_radix(&s[0..1], 16)? * 17;
            let g = u8::from_str_radix(&s[1..2], 16)? * 17;
            let b = u8::from_str_radix(&s[2..3], 16)? * 17;
            Ok([r, g, b])
        }
        6 => {
            let r = u8::from_str_radix(&s[0..2], 16)?;
            let g = u8::from_str_radix(&s[2..4], 16)?;
            let b = u8::from_str_radix(&s[4..6], 16)?;
            Ok([r, g, b])
        }
        _ => Err(ParseColorError::InvalidLength),
    }
}

/// One allowed output color: a host-protocol identifier plus its RGB value.
///
/// The id is stable across a session and is what the host sends on the
/// wire; the pipeline itself only reads the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub id: i32,
    pub rgb: [u8; 3],
}

impl PaletteEntry {
    #[inline]
    pub fn new(id: i32, rgb: [u8; 3]) -> Self {
        Self { id, rgb }
    }
}

/// An ordered, identifier-tagged set of allowed output colors.
///
/// Duplicate colors are permitted (some hosts expose the same RGB under
/// several ids); entry order matters for tie-breaking in the matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Build a palette from (id, hex string) pairs.
    pub fn from_hex(colors: &[(i32, &str)]) -> Result<Self, ParseColorError> {
        let entries = colors
            .iter()
            .map(|&(id, hex)| Ok(PaletteEntry::new(id, parse_hex(hex)?)))
            .collect::<Result<Vec<_>, ParseColorError>>()?;
        Ok(Self { entries })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6digit() {
        assert_eq!(parse_hex("#FFFFFF").unwrap(), [255, 255, 255]);
        assert_eq!(parse_hex("000000").unwrap(), [0, 0, 0]);
        assert_eq!(parse_hex("  #c83232  ").unwrap(), [200, 50, 50]);
    }

    #[test]
    fn test_parse_hex_shorthand() {
        assert_eq!(parse_hex("#F00").unwrap(), [255, 0, 0]);
        assert_eq!(parse_hex("#abc").unwrap(), [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_parse_hex_errors() {
        assert!(matches!(
            parse_hex("#GGG"),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!(matches!(
            parse_hex("#FFFF"),
            Err(ParseColorError::InvalidLength)
        ));
        assert!(matches!(parse_hex(""), Err(ParseColorError::InvalidLength)));
    }

    #[test]
    fn test_from_hex_keeps_order_and_ids() {
        let palette =
            Palette::from_hex(&[(3, "#000000"), (7, "#FFFFFF"), (12, "#FF0000")]).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.entries()[0], PaletteEntry::new(3, [0, 0, 0]));
        assert_eq!(palette.entries()[2], PaletteEntry::new(12, [255, 0, 0]));
    }

    #[test]
    fn test_duplicate_colors_permitted() {
        let palette = Palette::new(vec![
            PaletteEntry::new(1, [10, 10, 10]),
            PaletteEntry::new(2, [10, 10, 10]),
        ]);
        assert_eq!(palette.len(), 2);
    }
}
