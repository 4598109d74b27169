//! The rasterizer.
//!
//! A [`Scene`] owns the frame: color buffer, z-buffer and the configured transforms. Triangles
//! are submitted one at a time together with a [`Shader`]; the scene walks the bounding box of
//! the projected triangle, keeps the pixels whose barycentric coordinates are all non-negative,
//! depth-tests them and asks the shader for their color.

pub mod buffer;
pub mod shader;
pub mod transform;

use std::cmp::{max, min};

use log::{debug, trace};
use nalgebra as na;
use na::{vector, Vector2, Vector3, Vector4};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::math::{to_hom_point, Matrix, Triangle};
use buffer::{DepthBuffer, FrameBuffer, Image, Origin};
use shader::Shader;
use transform::Transforms;

/// Below this the doubled screen area of a triangle counts as zero.
pub const DEGENERATE_TOLERANCE: f64 = 1e-2;

/// Barycentric coordinates of `point` relative to the x, y of the triangle vertices.
///
/// Degenerate triangles report `(-1, 1, 1)`, which is outside of everything.
pub fn barycentric(triangle: &Triangle<Vector4<f64>>, point: Vector2<f64>) -> Vector3<f64> {
    let (a, b, c) = (&triangle.a, &triangle.b, &triangle.c);
    let raw_cross = vector![c.x - a.x, b.x - a.x, a.x - point.x]
        .cross(&vector![c.y - a.y, b.y - a.y, a.y - point.y]);
    if raw_cross.z.abs() < DEGENERATE_TOLERANCE {
        return vector![-1.0, 1.0, 1.0];
    }
    return vector![
        1.0 - (raw_cross.x + raw_cross.y) / raw_cross.z,
        raw_cross.y / raw_cross.z,
        raw_cross.x / raw_cross.z
    ];
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoundingBox {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

/// Pixel bounding box of the triangle, clamped to the frame.
fn bounding_box(triangle: &Triangle<Vector4<f64>>, width: usize, height: usize) -> BoundingBox {
    let (right, bottom) = (width as i64 - 1, height as i64 - 1);
    let mut bbox = BoundingBox { min_x: right, min_y: bottom, max_x: 0, max_y: 0 };
    for point in triangle.vertices() {
        let (x, y) = (point.x as i64, point.y as i64);
        bbox.min_x = max(0, min(bbox.min_x, x));
        bbox.min_y = max(0, min(bbox.min_y, y));
        bbox.max_x = min(right, max(bbox.max_x, x));
        bbox.max_y = min(bottom, max(bbox.max_y, y));
    }
    return bbox;
}

pub struct Scene {
    width: usize,
    height: usize,
    depth: f64,
    background: Color,
    origin: Origin,
    frame: FrameBuffer,
    z_buffer: DepthBuffer,
    view: Option<Matrix>,
    projection: Option<Matrix>,
    viewport: Option<Matrix>,
}

impl Scene {
    /// Empty frame of `width` x `height` pixels filled with `background`. Depth values are
    /// clamped to [0, depth], so `depth` must be finite and not negative.
    pub fn new(width: u32, height: u32, depth: f64, background: Color, origin: Origin) -> Result<Scene> {
        if !depth.is_finite() || depth < 0.0 {
            return Err(Error::InvalidDepth(depth));
        }
        let (width, height) = (width as usize, height as usize);
        return Ok(Scene {
            width,
            height,
            depth,
            background,
            origin,
            frame: FrameBuffer::new(width, height, background),
            z_buffer: DepthBuffer::new(width * height),
            view: None,
            projection: None,
            viewport: None,
        });
    }

    pub fn width(&self) -> u32 {
        return self.width as u32;
    }

    pub fn height(&self) -> u32 {
        return self.height as u32;
    }

    pub fn depth(&self) -> f64 {
        return self.depth;
    }

    pub fn origin(&self) -> Origin {
        return self.origin;
    }

    /// Sets all three transforms at once.
    pub fn configure(&mut self, view: Matrix, projection: Matrix, viewport: Matrix) -> &mut Self {
        return self.set_view(view).set_projection(projection).set_viewport(viewport);
    }

    pub fn set_view(&mut self, view: Matrix) -> &mut Self {
        debug!("View set to {:?}", view);
        self.view = Some(view);
        return self;
    }

    pub fn set_projection(&mut self, projection: Matrix) -> &mut Self {
        debug!("Projection set to {:?}", projection);
        self.projection = Some(projection);
        return self;
    }

    pub fn set_viewport(&mut self, viewport: Matrix) -> &mut Self {
        debug!("Viewport set to {:?}", viewport);
        self.viewport = Some(viewport);
        return self;
    }

    /// Camera at `eye` looking at `target`, see [`transform::look_at`].
    pub fn look_at(&mut self, eye: Vector3<f64>, target: Vector3<f64>, up: Vector3<f64>) -> Result<&mut Self> {
        return Ok(self.set_view(transform::look_at(eye, target, up)?));
    }

    pub fn projection(&mut self, coefficient: f64) -> &mut Self {
        return self.set_projection(transform::projection(coefficient));
    }

    /// Viewport over the given pixel rectangle and the whole depth range of the scene.
    pub fn viewport(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let depth = self.depth;
        return self.set_viewport(transform::viewport(x, y, width, height, depth));
    }

    /// The configured matrices, or which one is still missing.
    pub fn transforms(&self) -> Result<Transforms<'_>> {
        return Ok(Transforms {
            viewport: self.viewport.as_ref().ok_or(Error::Unconfigured("viewport"))?,
            projection: self.projection.as_ref().ok_or(Error::Unconfigured("projection"))?,
            view: self.view.as_ref().ok_or(Error::Unconfigured("view"))?,
        });
    }

    /// Rasterizes an object space triangle. Returns the number of pixels that were written.
    ///
    /// A pixel is written when it is inside the triangle, its depth is strictly greater than
    /// what the z-buffer holds and the shader does not discard it. Ties keep the pixel that
    /// was drawn first.
    pub fn render_triangle<S: Shader + ?Sized>(&mut self, triangle: &Triangle<Vector3<f64>>, shader: &mut S) -> Result<usize> {
        let screen = {
            let transforms = self.transforms()?;
            shader.vertex(&triangle.map(|p| to_hom_point(*p)), &transforms)?
        };
        if self.width == 0 || self.height == 0 {
            return Ok(0);
        }

        let bbox = bounding_box(&screen, self.width, self.height);
        let depths = screen.map(|p| p.z);
        let mut written = 0;
        for y in bbox.min_y..=bbox.max_y {
            for x in bbox.min_x..=bbox.max_x {
                // Sampling at the pixel center.
                let bar_coord = barycentric(&screen, vector![x as f64 + 0.5, y as f64 + 0.5]);
                if bar_coord.x < 0.0 || bar_coord.y < 0.0 || bar_coord.z < 0.0 {
                    continue;
                }
                // Screen z is already divided by w, which makes it affine in screen space, so
                // plain barycentric interpolation gives the perspective correct depth.
                let z_value = depths.interpolate(&bar_coord).clamp(0.0, self.depth);
                let index = x as usize + y as usize * self.width;
                if z_value <= self.z_buffer.get(index) {
                    continue;
                }
                if let Some(color) = shader.fragment(bar_coord) {
                    self.z_buffer.set(index, z_value);
                    self.frame.set(index, color);
                    written += 1;
                }
            }
        }
        trace!("Triangle {:?} wrote {} pixels", screen, written);
        return Ok(written);
    }

    /// Projects the triangle and draws its outline, ignoring and leaving the z-buffer alone.
    pub fn render_wireframe(&mut self, triangle: &Triangle<Vector3<f64>>, color: Color) -> Result<()> {
        let screen = {
            let transforms = self.transforms()?;
            triangle.try_map(|p| transforms.project(to_hom_point(*p)))?
        };
        let corners = screen.map(|p| (p.x as i64, p.y as i64));
        self.draw_line(corners.a, corners.b, color);
        self.draw_line(corners.b, corners.c, color);
        self.draw_line(corners.c, corners.a, color);
        return Ok(());
    }

    /// Line between two pixels, no depth test.
    pub fn draw_line(&mut self, start: (i64, i64), end: (i64, i64), color: Color) {
        self.frame.draw_line(start, end, color);
    }

    /// Resets every pixel to the background and the z-buffer to far. Transforms are kept.
    pub fn clear(&mut self) {
        self.frame.fill(self.background);
        self.z_buffer.reset();
    }

    /// Color at (x, y), top left origin.
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        return self.frame.get(x as usize + y as usize * self.width);
    }

    /// Depth at (x, y), top left origin; [`DepthBuffer::FAR`] if nothing was drawn there.
    pub fn depth_at(&self, x: u32, y: u32) -> f64 {
        return self.z_buffer.get(x as usize + y as usize * self.width);
    }

    /// The finished frame with the scene origin applied.
    pub fn extract_image(&self) -> Image {
        return Image {
            width: self.width as u32,
            height: self.height as u32,
            origin: self.origin,
            pixels: self.frame.export(self.origin),
        };
    }

    /// The z-buffer as a gray image, nearest surfaces white.
    pub fn extract_depth_image(&self) -> Image {
        let mut gray = FrameBuffer::new(self.width, self.height, Color::BLACK);
        for (index, color) in self.z_buffer.to_gray().into_iter().enumerate() {
            gray.set(index, color);
        }
        return Image {
            width: self.width as u32,
            height: self.height as u32,
            origin: self.origin,
            pixels: gray.export(self.origin),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flat(points: [(f64, f64); 3]) -> Triangle<Vector4<f64>> {
        let [a, b, c] = points.map(|(x, y)| vector![x, y, 0.0, 1.0]);
        Triangle::new(a, b, c)
    }

    #[test]
    fn barycentric_of_vertices_selects_that_vertex() {
        let t = flat([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert_eq!(barycentric(&t, vector![0.0, 0.0]), vector![1.0, 0.0, 0.0]);
        assert_eq!(barycentric(&t, vector![10.0, 0.0]), vector![0.0, 1.0, 0.0]);
        assert_eq!(barycentric(&t, vector![0.0, 10.0]), vector![0.0, 0.0, 1.0]);
    }

    #[test]
    fn scene_rejects_unusable_depth_range() {
        for depth in [-1.0, f64::NAN, f64::INFINITY] {
            let scene = Scene::new(4, 4, depth, Color::BLACK, Origin::TopLeft);
            assert!(matches!(scene, Err(Error::InvalidDepth(_))), "depth {}", depth);
        }
        let scene = Scene::new(4, 4, 0.0, Color::BLACK, Origin::BottomRight).unwrap();
        assert_eq!(scene.depth(), 0.0);
        assert_eq!(scene.origin(), Origin::BottomRight);
    }

    #[test]
    fn barycentric_of_degenerate_triangle_is_outside() {
        let t = flat([(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        assert_eq!(barycentric(&t, vector![5.0, 5.0]), vector![-1.0, 1.0, 1.0]);
    }

    #[test]
    fn bounding_box_is_clamped_to_frame() {
        let t = flat([(-5.0, 3.5), (12.0, -2.0), (4.2, 30.0)]);
        let bbox = bounding_box(&t, 10, 20);
        assert_eq!(bbox, BoundingBox { min_x: 0, min_y: 0, max_x: 9, max_y: 19 });
    }

    #[test]
    fn bounding_box_ignores_vertex_order() {
        let points = [(1.0, 2.0), (7.0, 3.0), (4.0, 9.0)];
        let expected = bounding_box(&flat(points), 10, 10);
        let reordered = bounding_box(&flat([points[2], points[0], points[1]]), 10, 10);
        assert_eq!(expected, reordered);
        assert_eq!(expected, BoundingBox { min_x: 1, min_y: 2, max_x: 7, max_y: 9 });
    }

    proptest! {
        #[test]
        fn barycentric_inside_points_sum_to_one(
            ax in -100.0f64..100.0, ay in -100.0f64..100.0,
            bx in -100.0f64..100.0, by in -100.0f64..100.0,
            cx in -100.0f64..100.0, cy in -100.0f64..100.0,
            u in 0.05f64..0.9, v in 0.05f64..0.9,
        ) {
            prop_assume!(u + v < 0.95);
            let t = flat([(ax, ay), (bx, by), (cx, cy)]);
            let doubled_area = ((cx - ax) * (by - ay) - (bx - ax) * (cy - ay)).abs();
            prop_assume!(doubled_area > 1.0);
            let w = 1.0 - u - v;
            let p = vector![u * ax + v * bx + w * cx, u * ay + v * by + w * cy];
            let bar = barycentric(&t, p);
            prop_assert!(bar.x > 0.0 && bar.y > 0.0 && bar.z > 0.0);
            prop_assert!((bar.x + bar.y + bar.z - 1.0).abs() < 1e-9);
        }

        #[test]
        fn barycentric_outside_points_have_a_negative_weight(
            ax in -100.0f64..100.0, ay in -100.0f64..100.0,
            bx in -100.0f64..100.0, by in -100.0f64..100.0,
            cx in -100.0f64..100.0, cy in -100.0f64..100.0,
            u in 0.05f64..0.9, v in 0.05f64..0.9,
        ) {
            let t = flat([(ax, ay), (bx, by), (cx, cy)]);
            let doubled_area = ((cx - ax) * (by - ay) - (bx - ax) * (cy - ay)).abs();
            prop_assume!(doubled_area > 1.0);
            // Weights (u, v, w) with w < 0.
            let w = -0.1 - u - v;
            let (u, v) = (u + 0.55, v + 0.55);
            let p = vector![u * ax + v * bx + w * cx, u * ay + v * by + w * cy];
            let bar = barycentric(&t, p);
            prop_assert!(bar.x < 0.0 || bar.y < 0.0 || bar.z < 0.0);
        }
    }
}
