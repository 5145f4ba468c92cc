//! Colors and style hints.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb`, `rrggbb` or `#rgb`.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::hex),
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).ok().map(Self::hex)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Rgb::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{text}'")))
    }
}

/// Grid palette.
pub mod palette {
    use super::Rgb;

    pub const DEFAULT_BG: Rgb = Rgb::hex(0xffffff);
    pub const HOVER_BG: Rgb = Rgb::hex(0xfafafa);
    pub const SELECTED_BG: Rgb = Rgb::hex(0xfef3c7);
    pub const SELECTED_FG: Rgb = Rgb::hex(0x1f2937);
}

/// Open-ended style record returned by row and cell style callbacks.
///
/// Only `background` and `foreground` take part in layering; anything else
/// is carried through to the painter untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Rgb>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl StyleHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self
    }

    pub fn foreground(mut self, color: Rgb) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#fef3c7"), Some(Rgb::new(0xfe, 0xf3, 0xc7)));
        assert_eq!(Rgb::parse("f00"), Some(Rgb::new(0xff, 0, 0)));
        assert_eq!(Rgb::parse("#12"), None);
        assert_eq!(Rgb::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_display_roundtrips_parse() {
        let color = Rgb::hex(0x40e0d0);
        assert_eq!(color.to_string(), "#40e0d0");
    }
}
