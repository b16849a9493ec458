use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// An opaque RGB color used for chart palettes and spreadsheet color scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the color as `0xRRGGBB`, the form spreadsheet writers expect.
    pub fn to_rgb_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Parse a hex color string.
    ///
    /// Accepts `#RGB`, `#RRGGBB` and the spreadsheet-style `AARRGGBB`
    /// (with or without a leading `#`). The alpha byte of the eight digit
    /// form is ignored.
    pub fn parse_hex(s: &str) -> Result<Color, String> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return Err(format!("Invalid hex color: {}", s));
        }

        let channel = |digits: &str, name: &str| {
            u8::from_str_radix(digits, 16)
                .map_err(|e| format!("Invalid {} component in '{}': {}", name, s, e))
        };

        match hex.len() {
            3 => {
                // #RGB format - expand each digit
                let r = channel(&hex[0..1].repeat(2), "red")?;
                let g = channel(&hex[1..2].repeat(2), "green")?;
                let b = channel(&hex[2..3].repeat(2), "blue")?;
                Ok(Color { r, g, b })
            }
            6 => Ok(Color {
                r: channel(&hex[0..2], "red")?,
                g: channel(&hex[2..4], "green")?,
                b: channel(&hex[4..6], "blue")?,
            }),
            8 => Ok(Color {
                r: channel(&hex[2..4], "red")?,
                g: channel(&hex[4..6], "green")?,
                b: channel(&hex[6..8], "blue")?,
            }),
            n => Err(format!(
                "Invalid hex color length: expected 3, 6 or 8 digits, got {}",
                n
            )),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(Color::parse_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
        assert_eq!(Color::parse_hex("#AA0000").unwrap(), Color::rgb(0xAA, 0, 0));
        assert_eq!(Color::parse_hex("FF00AA00").unwrap(), Color::rgb(0, 0xAA, 0));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Color::parse_hex("#12345").is_err());
        assert!(Color::parse_hex("#GG0000").is_err());
    }

    #[test]
    fn packs_and_displays() {
        let yellow = Color::parse_hex("FFFFFF00").unwrap();
        assert_eq!(yellow.to_rgb_u32(), 0xFFFF00);
        assert_eq!(yellow.to_string(), "#FFFF00");
    }
}
