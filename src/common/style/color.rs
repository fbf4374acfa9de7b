use std::fmt;
use std::str::FromStr;

/// RGB color representation.
///
/// Decks carry colors as six hex digits (`"1F4E79"`, optionally with a
/// leading `#`); DrawingML stores the same digits in `a:srgbClr/@val`.
///
/// # Examples
///
/// ```rust
/// use powerbb::common::RGBColor;
///
/// let blue = RGBColor::from_hex("#1f4e79").unwrap();
/// assert_eq!(blue.to_hex(), "1F4E79");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RGBColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RGBColor {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB` or `#RRGGBB` (case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Upper-case hex without `#`, the form written to `a:srgbClr`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for RGBColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("'{}' is not a RRGGBB hex color", s))
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(RGBColor::from_hex("FF0000"), Some(RGBColor::new(255, 0, 0)));
        assert_eq!(RGBColor::from_hex("#00ff7f"), Some(RGBColor::new(0, 255, 127)));
        assert_eq!(RGBColor::from_hex("FFF"), None);
        assert_eq!(RGBColor::from_hex("GG0000"), None);
        assert_eq!(RGBColor::from_hex("ééé"), None);
    }

    #[test]
    fn test_normalized_hex() {
        let c: RGBColor = "#abcdef".parse().unwrap();
        assert_eq!(c.to_hex(), "ABCDEF");
        assert_eq!(c.to_string(), "#ABCDEF");
    }
}
