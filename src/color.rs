use std::ops::Mul;

use image::Rgb;

/// Packed 24-bit rgb color, stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        return Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32);
    }

    /// Anything above the low 24 bits is dropped.
    pub const fn from_raw(raw: u32) -> Color {
        return Color(raw & 0xFF_FFFF);
    }

    pub const fn raw(self) -> u32 {
        return self.0;
    }

    pub const fn r(self) -> u8 {
        return (self.0 >> 16) as u8;
    }

    pub const fn g(self) -> u8 {
        return (self.0 >> 8) as u8;
    }

    pub const fn b(self) -> u8 {
        return self.0 as u8;
    }
}

/// Scales every channel by an intensity, meant to be in [0, 1].
/// Channels are truncated toward zero and saturate at 0 and 255 instead of wrapping.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, intensity: f64) -> Color {
        // Float to int `as` casts saturate, NaN becomes 0.
        return Color::new(
            (self.r() as f64 * intensity) as u8,
            (self.g() as f64 * intensity) as u8,
            (self.b() as f64 * intensity) as u8,
        );
    }
}

impl From<Rgb<u8>> for Color {
    fn from(pixel: Rgb<u8>) -> Color {
        let [r, g, b] = pixel.0;
        return Color::new(r, g, b);
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Rgb<u8> {
        return Rgb([color.r(), color.g(), color.b()]);
    }
}
