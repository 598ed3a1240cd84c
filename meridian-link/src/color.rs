//! Colors of graphics.

use serde::{Deserialize, Serialize};

/// Color representation.
///
/// In Link properties colors are written as ARGB hex strings: `AARRGGBB`, optionally prefixed with `#` or `0x`. A
/// 6 digit `RRGGBB` string is an opaque color.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_hex(&value).ok_or_else(|| format!("invalid color string: {value}"))
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_hex()
    }
}

impl Color {
    /// Transparent color: `00000000`
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Black color: `FF000000`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// White color: `FFFFFFFF`
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Red color: `FFFF0000`
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    /// Green color: `FF00FF00`
    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    /// Blue color: `FF0000FF`
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Constructs color from a packed `0xAARRGGBB` integer, as used by raster pixels and color tables.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs the color into a `0xAARRGGBB` integer.
    pub const fn to_argb(&self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Converts the color into u8 array (RGBA).
    pub fn to_u8_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts the color into the string form used in properties: `AARRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("{:08X}", self.to_argb())
    }

    /// Parses a color from the hex string. Accepts `AARRGGBB` and `RRGGBB` with an optional `#` or `0x` prefix.
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        let digits = hex_string.trim();
        let digits = digits
            .strip_prefix('#')
            .or_else(|| digits.strip_prefix("0x"))
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            8 => Some(Self::from_argb(value)),
            6 => Some(Self::from_argb(0xFF00_0000 | value)),
            _ => None,
        }
    }

    /// Returns a new color instance, copied from the base one but with the given alpha channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Returns true if the color is fully transparent (`a == 0`).
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Red component of the color in RGBA space.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component of the color in RGBA space.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component of the color in RGBA space.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// Opacity component of the color.
    pub fn a(&self) -> u8 {
        self.a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_serialization() {
        let hex = "AAFF1000";
        let color = Color::try_from_hex(hex).unwrap();
        assert_eq!(color, Color::rgba(0xFF, 0x10, 0x00, 0xAA));
        assert_eq!(&color.to_hex(), hex);
        assert_eq!(Color::from_argb(color.to_argb()), color);
    }

    #[test]
    fn prefixes_and_short_form() {
        assert_eq!(Color::try_from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::try_from_hex("0xFF0000FF"), Some(Color::BLUE));
        assert_eq!(Color::try_from_hex("00000000"), Some(Color::TRANSPARENT));
    }

    #[test]
    fn invalid_strings() {
        assert_eq!(Color::try_from_hex(""), None);
        assert_eq!(Color::try_from_hex("red"), None);
        assert_eq!(Color::try_from_hex("FF00000"), None);
        assert_eq!(Color::try_from_hex("+FF0000"), None);
    }
}
