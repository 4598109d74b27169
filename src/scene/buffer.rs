//! Pixel storage: color buffer, z-buffer, and export of finished frames.
//!
//! Both buffers are addressed with (0, 0) at the top left, row-major. Which corner the viewer
//! should treat as (0, 0) is an [`Origin`] and only matters when a frame is exported.

use std::str::FromStr;

use image::{Rgb, RgbImage};
use serde::Deserialize;

use crate::color::Color;

/// Corner of the image that holds pixel (0, 0) once exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Origin {
    /// Where the pixel at `index` of a top-left addressed buffer lands under this origin.
    /// Every mapping is its own inverse.
    pub fn remap(self, index: usize, width: usize, height: usize) -> usize {
        let (x, y) = (index % width, index / width);
        let (x, y) = match self {
            Origin::TopLeft => (x, y),
            Origin::TopRight => (width - x - 1, y),
            Origin::BottomLeft => (x, height - y - 1),
            Origin::BottomRight => (width - x - 1, height - y - 1),
        };
        return x + y * width;
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            "top-left" => Ok(Origin::TopLeft),
            "top-right" => Ok(Origin::TopRight),
            "bottom-left" => Ok(Origin::BottomLeft),
            "bottom-right" => Ok(Origin::BottomRight),
            _ => Err(format!(
                "unknown origin '{}', expected top-left, top-right, bottom-left or bottom-right",
                s
            )),
        };
    }
}

/// Exported frame: packed `0xRRGGBB` values, row-major, with the origin already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub origin: Origin,
    pub pixels: Vec<u32>,
}

impl Image {
    /// Pixel at row-major position (x, y) of the exported data.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        return Color::from_raw(self.pixels[(x + y * self.width) as usize]);
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        return RgbImage::from_fn(self.width, self.height, |x, y| Rgb::from(self.pixel(x, y)));
    }
}

/// Color buffer.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, color: Color) -> Self {
        return Self { width, height, pixels: vec![color; width * height] };
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn get(&self, index: usize) -> Color {
        return self.pixels[index];
    }

    pub fn set(&mut self, index: usize, color: Color) {
        self.pixels[index] = color;
    }

    /// Sets a pixel if it lies inside the buffer, ignores it otherwise.
    pub fn set_checked(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.set(x as usize + y as usize * self.width, color);
        }
    }

    /// Draws a line between two pixels via Bresenham's algorithm as presented in
    /// https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm
    /// The segment is clipped to the buffer first, so only visible pixels are walked.
    pub fn draw_line(&mut self, start: (i64, i64), end: (i64, i64), color: Color) {
        let ((mut x_0, mut y_0), (x_1, y_1)) = match self.clip(start, end) {
            Some(segment) => segment,
            None => return,
        };
        let dx = (x_1 - x_0).abs();
        let sx = if x_0 < x_1 { 1 } else { -1 };
        let dy = -(y_1 - y_0).abs();
        let sy = if y_0 < y_1 { 1 } else { -1 };
        let mut error = dx + dy;

        loop {
            self.set_checked(x_0, y_0, color);
            if x_0 == x_1 && y_0 == y_1 {
                break;
            }
            let e2 = 2 * error;
            if e2 >= dy {
                error += dy;
                x_0 += sx;
            }
            if e2 <= dx {
                error += dx;
                y_0 += sy;
            }
        }
    }

    /// Part of the segment that lies inside the buffer (Liang-Barsky), `None` if it misses the
    /// buffer entirely.
    fn clip(&self, start: (i64, i64), end: (i64, i64)) -> Option<((i64, i64), (i64, i64))> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (right, bottom) = (self.width as i64 - 1, self.height as i64 - 1);
        let (x_0, y_0) = (start.0 as f64, start.1 as f64);
        let (dx, dy) = (end.0 as f64 - x_0, end.1 as f64 - y_0);

        let (mut t_enter, mut t_leave) = (0.0f64, 1.0f64);
        for (p, q) in [(-dx, x_0), (dx, right as f64 - x_0), (-dy, y_0), (dy, bottom as f64 - y_0)] {
            if p == 0.0 {
                // Parallel to this edge and outside of it.
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t_enter = t_enter.max(q / p);
            } else {
                t_leave = t_leave.min(q / p);
            }
        }
        if t_enter > t_leave {
            return None;
        }
        // Far away endpoints lose precision in f64, the clamp keeps the result on the buffer.
        let at = |t: f64| {
            (
                ((x_0 + t * dx).round() as i64).clamp(0, right),
                ((y_0 + t * dy).round() as i64).clamp(0, bottom),
            )
        };
        return Some((at(t_enter), at(t_leave)));
    }

    /// Copies the buffer out as packed values, moving pixels to honour `origin`.
    pub fn export(&self, origin: Origin) -> Vec<u32> {
        let mut exported = vec![0; self.pixels.len()];
        for (index, color) in self.pixels.iter().enumerate() {
            exported[origin.remap(index, self.width, self.height)] = color.raw();
        }
        return exported;
    }
}

/// Z-buffer. Larger values are closer to the viewer.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    values: Vec<f64>,
}

impl DepthBuffer {
    /// Value of a pixel nothing was drawn to yet.
    pub const FAR: f64 = f64::MIN;

    pub fn new(size: usize) -> Self {
        return Self { values: vec![Self::FAR; size] };
    }

    pub fn reset(&mut self) {
        self.values.fill(Self::FAR);
    }

    pub fn get(&self, index: usize) -> f64 {
        return self.values[index];
    }

    pub fn set(&mut self, index: usize, depth: f64) {
        self.values[index] = depth;
    }

    /// Gray levels for visualisation: the nearest written depth is white, the farthest is
    /// black, pixels nothing was drawn to stay black.
    pub fn to_gray(&self) -> Vec<Color> {
        let written = self.values.iter().copied().filter(|&z| z > Self::FAR);
        let (z_min, z_max) = written.fold((f64::MAX, f64::MIN), |(lo, hi), z| (lo.min(z), hi.max(z)));
        let scale = z_max - z_min;
        return self
            .values
            .iter()
            .map(|&z| {
                if z <= Self::FAR {
                    return Color::BLACK;
                }
                let level = if scale > 0.0 { (z - z_min) / scale * 255.0 } else { 255.0 };
                let level = level as u8;
                Color::new(level, level, level)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Origin; 4] = [Origin::TopLeft, Origin::TopRight, Origin::BottomLeft, Origin::BottomRight];

    /// 3x2 buffer with pixel index i colored i.
    fn numbered() -> FrameBuffer {
        let mut buffer = FrameBuffer::new(3, 2, Color::BLACK);
        for i in 0..6 {
            buffer.set(i, Color::from_raw(i as u32));
        }
        buffer
    }

    #[test]
    fn export_mirrors_per_origin() {
        let buffer = numbered();
        assert_eq!(buffer.export(Origin::TopLeft), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(buffer.export(Origin::TopRight), vec![2, 1, 0, 5, 4, 3]);
        assert_eq!(buffer.export(Origin::BottomLeft), vec![3, 4, 5, 0, 1, 2]);
        assert_eq!(buffer.export(Origin::BottomRight), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn origin_parses_kebab_case() {
        assert_eq!("bottom-left".parse::<Origin>(), Ok(Origin::BottomLeft));
        assert!("middle".parse::<Origin>().is_err());
    }

    #[test]
    fn draws_lines_in_every_octant() {
        let mut buffer = FrameBuffer::new(5, 5, Color::BLACK);
        buffer.draw_line((0, 0), (4, 4), Color::WHITE);
        buffer.draw_line((4, 0), (0, 0), Color::RED);
        for i in 1..5 {
            assert_eq!(buffer.get(i + i * 5), Color::WHITE);
        }
        for x in 0..5 {
            assert_eq!(buffer.get(x), Color::RED);
        }
    }

    #[test]
    fn lines_leaving_the_buffer_are_clipped() {
        let mut buffer = FrameBuffer::new(3, 3, Color::BLACK);
        buffer.draw_line((-5, 1), (10, 1), Color::GREEN);
        for x in 0..3 {
            assert_eq!(buffer.get(x + 3), Color::GREEN);
        }
        assert_eq!(buffer.get(0), Color::BLACK);
    }

    #[test]
    fn lines_outside_the_buffer_draw_nothing() {
        let mut buffer = FrameBuffer::new(3, 3, Color::BLACK);
        buffer.draw_line((5, -1), (5, 10), Color::RED);
        buffer.draw_line((-4, -4), (-1, 2), Color::RED);
        assert!((0..9).all(|i| buffer.get(i) == Color::BLACK));
    }

    #[test]
    fn distant_endpoints_are_clipped_before_walking() {
        let mut buffer = FrameBuffer::new(4, 4, Color::BLACK);
        buffer.draw_line((-(1 << 40), 1), (1 << 40, 1), Color::BLUE);
        buffer.draw_line((0, 0), (i64::MAX, i64::MAX), Color::GREEN);
        for x in 0..4 {
            assert_eq!(buffer.get(x + 4), Color::BLUE);
        }
        for i in [0, 10, 15] {
            assert_eq!(buffer.get(i), Color::GREEN);
        }

        // Saturated endpoints only have to stay on the buffer.
        let mut buffer = FrameBuffer::new(4, 4, Color::BLACK);
        buffer.draw_line((i64::MIN, 2), (i64::MAX, 2), Color::RED);
        assert!((0..16).filter(|i| i / 4 != 2).all(|i| buffer.get(i) == Color::BLACK));
        assert!((8..12).any(|i| buffer.get(i) == Color::RED));
    }

    #[test]
    fn depth_gray_spans_written_range() {
        let mut depth = DepthBuffer::new(3);
        depth.set(0, 10.0);
        depth.set(1, 20.0);
        let gray = depth.to_gray();
        assert_eq!(gray, vec![Color::BLACK, Color::WHITE, Color::BLACK]);
    }

    proptest! {
        #[test]
        fn every_remap_is_an_involution(width in 1usize..20, height in 1usize..20, seed in any::<usize>()) {
            let index = seed % (width * height);
            for origin in ALL {
                let once = origin.remap(index, width, height);
                prop_assert!(once < width * height);
                prop_assert_eq!(origin.remap(once, width, height), index);
            }
        }
    }
}
