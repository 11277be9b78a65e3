#![forbid(unsafe_code)]

//! Packed RGBA colors and color-string parsing.

use std::fmt;

/// A color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0xFFFF_FF00) | a as u32)
    }

    /// Build a color from normalized float channels, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn from_floats(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn channel(v: f64) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::rgba(channel(r), channel(g), channel(b), channel(a))
    }

    /// Normalized `[r, g, b, a]` channels.
    #[must_use]
    pub fn to_floats(self) -> [f64; 4] {
        [
            f64::from(self.r()) / 255.0,
            f64::from(self.g()) / 255.0,
            f64::from(self.b()) / 255.0,
            f64::from(self.a()) / 255.0,
        ]
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, or a basic color name.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError(trimmed.to_owned()));
        }
        named_color(&trimmed.to_ascii_lowercase()).ok_or_else(|| ColorParseError(trimmed.to_owned()))
    }
}

impl fmt::Display for PackedRgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// A color string that is neither valid hex nor a known name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color: {}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

fn parse_hex(hex: &str) -> Option<PackedRgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
            Some(PackedRgba::rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(PackedRgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(PackedRgba::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<PackedRgba> {
    let color = match name {
        "black" => PackedRgba::BLACK,
        "white" => PackedRgba::WHITE,
        "red" => PackedRgba::RED,
        "green" | "lime" => PackedRgba::GREEN,
        "blue" => PackedRgba::BLUE,
        "yellow" => PackedRgba::rgb(255, 255, 0),
        "cyan" => PackedRgba::rgb(0, 255, 255),
        "magenta" => PackedRgba::rgb(255, 0, 255),
        "gray" | "grey" => PackedRgba::rgb(128, 128, 128),
        "transparent" => PackedRgba::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_through_packing() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
    }

    #[test]
    fn parse_short_and_long_hex() {
        assert_eq!(PackedRgba::parse("#f00"), Ok(PackedRgba::RED));
        assert_eq!(PackedRgba::parse("#00ff00"), Ok(PackedRgba::GREEN));
        assert_eq!(
            PackedRgba::parse("#0000ff80"),
            Ok(PackedRgba::rgba(0, 0, 255, 0x80))
        );
    }

    #[test]
    fn parse_names_case_insensitively() {
        assert_eq!(PackedRgba::parse("Red"), Ok(PackedRgba::RED));
        assert_eq!(PackedRgba::parse(" grey "), Ok(PackedRgba::rgb(128, 128, 128)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(PackedRgba::parse("#12").is_err());
        assert!(PackedRgba::parse("#zzzzzz").is_err());
        assert!(PackedRgba::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn floats_are_clamped() {
        assert_eq!(PackedRgba::from_floats(2.0, -1.0, 0.0, 1.0), PackedRgba::RED);
        assert_eq!(PackedRgba::WHITE.to_floats(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = PackedRgba::RED.with_alpha(10);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (255, 0, 0, 10));
    }
}
