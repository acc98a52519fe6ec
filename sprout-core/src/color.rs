use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, de};

use crate::error::{Result, SproutError};

/// Straight (non-premultiplied) sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        let invalid = |reason| SproutError::InvalidColor {
            value: s.to_owned(),
            reason,
        };

        if digits.len() != 6 && digits.len() != 8 {
            return Err(invalid("expected 6 or 8 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex digit"));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid("non-hex digit"))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 255 },
        })
    }

    /// Returns the same color with alpha scaled by `opacity` in [0,1].
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl FromStr for Color {
    type Err = SproutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_and_eight_digit_hex() {
        assert_eq!(Color::from_hex("#4CAF50").unwrap(), Color::rgb(0x4c, 0xaf, 0x50));
        assert_eq!(
            Color::from_hex("8bc34a80").unwrap(),
            Color {
                r: 0x8b,
                g: 0xc3,
                b: 0x4a,
                a: 0x80
            }
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(
            Color::from_hex("#12345"),
            Err(SproutError::InvalidColor { .. })
        ));
        assert!(matches!(
            Color::from_hex("#GG0000"),
            Err(SproutError::InvalidColor { .. })
        ));
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn rejects_signed_channels() {
        assert!(matches!(
            Color::from_hex("#+f+f+f"),
            Err(SproutError::InvalidColor { .. })
        ));
        assert!(Color::from_hex("+f+f+f+f").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let c = Color::from_hex("#CDDC39").unwrap();
        assert_eq!(c.to_string(), "#CDDC39");
        assert_eq!(c.with_opacity(0.5).to_string(), "#CDDC3980");
    }

    #[test]
    fn with_opacity_clamps() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(c.with_opacity(2.0).a, 255);
        assert_eq!(c.with_opacity(-1.0).a, 0);
    }
}
