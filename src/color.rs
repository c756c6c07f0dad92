//! RGBA colors and CSS hex parsing.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (case-insensitive).
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let byte = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
        let nibble = |index: usize| {
            u8::from_str_radix(&hex[index..index + 1], 16)
                .ok()
                .map(|n| n * 17)
        };

        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Composite `self` over `dst` (source-over, straight alpha).
    pub fn over(self, dst: Color) -> Color {
        let sa = self.opacity();
        let da = dst.opacity();
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Color::TRANSPARENT;
        }

        let channel = |s: u8, d: u8| {
            let value = (f64::from(s) * sa + f64::from(d) * da * (1.0 - sa)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };

        Color::new(
            channel(self.r, dst.r),
            channel(self.g, dst.g),
            channel(self.b, dst.b),
            (out_a * 255.0).round() as u8,
        )
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba([color.r, color.g, color.b, color.a])
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Color::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_color() {
        assert_eq!(Color::from_hex("#7A6FF0"), Some(Color::rgb(0x7A, 0x6F, 0xF0)));
        assert_eq!(Color::from_hex("#7a6ff0"), Some(Color::rgb(0x7A, 0x6F, 0xF0)));
    }

    #[test]
    fn test_parse_short_and_alpha_forms() {
        assert_eq!(Color::from_hex("#f00"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::from_hex("#11223380"),
            Some(Color::new(0x11, 0x22, 0x33, 0x80))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Color::from_hex("7A6FF0"), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[test]
    fn test_parse_rejects_signs() {
        assert_eq!(Color::from_hex("#+1+2+3"), None);
        assert_eq!(Color::from_hex("#+f+f+f+f"), None);
        assert_eq!(Color::from_hex("#-12"), None);
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(Color::rgb(0x7A, 0x6F, 0xF0).to_hex(), "#7a6ff0");
        assert_eq!(Color::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_over() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.over(Color::TRANSPARENT), red);
        assert_eq!(Color::TRANSPARENT.over(red), red);

        let half_blue = Color::new(0, 0, 255, 128);
        let mixed = half_blue.over(Color::rgb(255, 255, 255));
        assert_eq!(mixed.a, 255);
        assert_eq!(mixed.b, 255);
        assert!(mixed.r > 120 && mixed.r < 135);
    }
}
