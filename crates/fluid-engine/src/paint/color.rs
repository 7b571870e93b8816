use std::fmt;

/// Linear straight-alpha RGBA color.
///
/// Render targets are sRGB, so shaders write linear values and the hardware
/// encodes on store. Colors authored as hex literals are sRGB-encoded and
/// must go through [`Color::from_srgb_u8`] or [`Color::from_hex`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Error returned by [`Color::from_hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color literal: {:?}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a linear color from sRGB-encoded bytes.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: a as f32 / 255.0,
        }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| err())
        };

        match hex.len() {
            3 => Ok(Self::from_srgb_u8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            6 => Ok(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-4 }

    #[test]
    fn hex_white_and_black() {
        assert_eq!(Color::from_hex("#ffffff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("000").unwrap(), Color::BLACK);
    }

    #[test]
    fn hex_short_form_expands_nibbles() {
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::from_hex("#ffffff").unwrap());
    }

    #[test]
    fn hex_is_converted_to_linear() {
        // sRGB 0x33 (0.2) is ~0.0331 in linear space.
        let c = Color::from_hex("#333333").unwrap();
        assert!(close(c.r, 0.0331), "got {}", c.r);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn hex_with_alpha() {
        let c = Color::from_hex("#ff000080").unwrap();
        assert!(close(c.a, 128.0 / 255.0));
        assert_eq!(c.r, 1.0);
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Color::from_hex("#ggg").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#éé").is_err());
    }
}
