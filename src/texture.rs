//! Texture lookup.

use image::RgbImage;
use nalgebra::Vector3;

use crate::color::Color;

/// 2d grid of colors addressed by integer pixel coordinates, (0, 0) being the top left texel.
pub trait Sampler {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn color_at(&self, x: u32, y: u32) -> Color;

    /// Looks up the texel for a texture coordinate in [0, 1] x [0, 1].
    ///
    /// Texture coordinates grow upwards while image rows grow downwards, so v is flipped:
    /// (0, 0) is the bottom left texel and (1, 1) the top right one. Coordinates that land
    /// outside the image are clamped to its edge. Only x and y of `uv` are used.
    fn sample(&self, uv: Vector3<f64>) -> Color {
        let (width, height) = (self.width() as i64, self.height() as i64);
        if width == 0 || height == 0 {
            return Color::BLACK;
        }
        let x = (uv.x * width as f64) as i64;
        let y = height - (uv.y * height as f64) as i64;
        return self.color_at(x.clamp(0, width - 1) as u32, y.clamp(0, height - 1) as u32);
    }
}

impl Sampler for RgbImage {
    fn width(&self) -> u32 {
        return self.dimensions().0;
    }

    fn height(&self) -> u32 {
        return self.dimensions().1;
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        return Color::from(*self.get_pixel(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use nalgebra::vector;

    /// 2x2 image: red, green on the top row, blue, white on the bottom row.
    fn corners() -> RgbImage {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));
        image.put_pixel(0, 1, Rgb([0, 0, 255]));
        image.put_pixel(1, 1, Rgb([255, 255, 255]));
        image
    }

    #[test]
    fn origin_samples_bottom_left() {
        assert_eq!(corners().sample(vector![0.0, 0.0, 0.0]), Color::BLUE);
    }

    #[test]
    fn far_corner_samples_top_right() {
        assert_eq!(corners().sample(vector![1.0, 1.0, 0.0]), Color::GREEN);
    }

    #[test]
    fn rows_are_counted_from_the_bottom() {
        // One column, four rows, row index encoded in the red channel.
        let mut image = RgbImage::new(1, 4);
        for y in 0..4 {
            image.put_pixel(0, y, Rgb([y as u8, 0, 0]));
        }
        assert_eq!(image.sample(vector![0.0, 0.1, 0.0]).r(), 3);
        assert_eq!(image.sample(vector![0.0, 0.3, 0.0]).r(), 3);
        assert_eq!(image.sample(vector![0.0, 0.6, 0.0]).r(), 2);
        assert_eq!(image.sample(vector![0.0, 0.8, 0.0]).r(), 1);
        assert_eq!(image.sample(vector![0.0, 1.0, 0.0]).r(), 0);
    }

    #[test]
    fn out_of_range_coordinates_clamp() {
        let image = corners();
        assert_eq!(image.sample(vector![-3.0, 7.0, 0.0]), Color::RED);
        assert_eq!(image.sample(vector![5.0, -2.0, 0.0]), Color::WHITE);
    }

    #[test]
    fn empty_texture_is_black() {
        assert_eq!(RgbImage::new(0, 0).sample(vector![0.5, 0.5, 0.0]), Color::BLACK);
    }
}
