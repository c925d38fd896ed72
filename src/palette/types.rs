use std::fmt;

use image::Rgb;
use serde::{Deserialize, Serialize};

/// Indexed PNG output caps a palette at 256 entries
pub const MAX_PALETTE_COLORS: usize = 256;

/// A single RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color from exactly six hex digits, after any leading `#` characters
    pub fn from_hex(token: &str) -> Option<Self> {
        let digits = token.trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |offset: usize| u8::from_str_radix(&digits[offset..offset + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format the color as `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Squared euclidean distance in RGB space
    pub fn distance_squared(&self, other: &Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from(value: [u8; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Rgb<u8>> for Color {
    fn from(value: Rgb<u8>) -> Self {
        Self::from(value.0)
    }
}

impl From<Color> for Rgb<u8> {
    fn from(value: Color) -> Self {
        Rgb(value.to_array())
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An ordered list of at most [`MAX_PALETTE_COLORS`] colors
///
/// Entry order is significant: it is the index order of the indexed PNG, and
/// nearest-color ties resolve to the lowest index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Create a palette from a list of colors
    ///
    /// Returns `None` if there are more than [`MAX_PALETTE_COLORS`] colors.
    pub fn new(colors: Vec<Color>) -> Option<Self> {
        if colors.len() > MAX_PALETTE_COLORS {
            return None;
        }
        Some(Self { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Color> {
        self.colors.get(index as usize).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    /// Index of the entry closest to `color`, or `None` for an empty palette
    pub fn nearest(&self, color: Color) -> Option<u8> {
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(index, entry)| (entry.distance_squared(&color), *index))
            .map(|(index, _)| index as u8)
    }

    /// Flatten to `r, g, b, r, g, b, ...` as stored in a PNG `PLTE` chunk
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_accepts_both_forms() {
        assert_eq!(Color::from_hex("#FFFFFF"), Some(Color::new(255, 255, 255)));
        assert_eq!(Color::from_hex("000000"), Some(Color::new(0, 0, 0)));
        assert_eq!(Color::from_hex("fff2e5"), Some(Color::new(255, 242, 229)));
        assert_eq!(Color::from_hex("##FFFFFF"), Some(Color::new(255, 255, 255)));
    }

    #[test]
    fn test_from_hex_rejects_bad_tokens() {
        assert_eq!(Color::from_hex("FFF"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::from_hex("FFFFFFAA"), None);
        assert_eq!(Color::from_hex("+12345"), None);
        assert_eq!(Color::from_hex(""), None);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Color::new(255, 242, 229).to_hex(), "#fff2e5");
        assert_eq!(Color::new(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_nearest_prefers_lowest_index_on_tie() {
        let palette = Palette::new(vec![
            Color::new(0, 0, 0),
            Color::new(100, 100, 100),
            Color::new(100, 100, 100),
        ])
        .unwrap();

        assert_eq!(palette.nearest(Color::new(90, 90, 90)), Some(1));
        assert_eq!(palette.nearest(Color::new(10, 0, 0)), Some(0));

        // Equidistant from black and the grey at index 1
        let tie = Palette::new(vec![Color::new(0, 0, 0), Color::new(20, 0, 0)]).unwrap();
        assert_eq!(tie.nearest(Color::new(10, 0, 0)), Some(0));
    }

    #[test]
    fn test_nearest_on_empty_palette() {
        assert_eq!(Palette::default().nearest(Color::new(1, 2, 3)), None);
    }

    #[test]
    fn test_palette_size_limit() {
        assert!(Palette::new(vec![Color::new(0, 0, 0); MAX_PALETTE_COLORS]).is_some());
        assert!(Palette::new(vec![Color::new(0, 0, 0); MAX_PALETTE_COLORS + 1]).is_none());
    }

    #[test]
    fn test_rgb_bytes_layout() {
        let palette = Palette::new(vec![Color::new(1, 2, 3), Color::new(4, 5, 6)]).unwrap();
        assert_eq!(palette.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }
}
