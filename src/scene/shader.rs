//! Programmable part of the pipeline.
//!
//! A shader is driven once per triangle: [`Shader::vertex`] moves the triangle to screen space
//! and stashes whatever per-vertex values the lighting model needs, then [`Shader::fragment`]
//! is asked for a color at every covered pixel that passed the depth test. The varyings only
//! live from one `vertex` call to the next, nothing carries over between triangles.

use nalgebra::{Vector3, Vector4};

use super::transform::Transforms;
use crate::color::Color;
use crate::error::Result;
use crate::math::{normalise, Triangle};
use crate::texture::Sampler;

pub trait Shader {
    /// Transforms object space homogeneous positions to screen space. x, y, z of the output are
    /// already divided by w.
    fn vertex(&mut self, positions: &Triangle<Vector4<f64>>, transforms: &Transforms) -> Result<Triangle<Vector4<f64>>>;

    /// Color of the pixel with the given barycentric coordinates, `None` to discard it.
    fn fragment(&self, barycentric: Vector3<f64>) -> Option<Color>;
}

/// Plain vertex stage shared by all the shaders below.
fn project_triangle(positions: &Triangle<Vector4<f64>>, transforms: &Transforms) -> Result<Triangle<Vector4<f64>>> {
    let m = transforms.combined()?;
    return positions.try_map(|p| m.transform(*p)?.to_vector4());
}

/// Diffuse intensity of the face from its geometric normal, `None` for zero area faces.
/// Counter-clockwise faces have their normal pointing towards the viewer.
fn face_intensity(positions: &Triangle<Vector4<f64>>, light_direction: Vector3<f64>) -> Option<f64> {
    let p = positions.map(|v| v.xyz());
    let normal = normalise((p.b - p.a).cross(&(p.c - p.a))).ok()?;
    return Some(normal.dot(&light_direction));
}

/// Diffuse intensity at every vertex, `None` if any normal has zero length.
fn vertex_intensities(normals: &Triangle<Vector3<f64>>, light_direction: Vector3<f64>) -> Option<Triangle<f64>> {
    return normals
        .try_map(|n| Ok(normalise(*n)?.dot(&light_direction)))
        .ok();
}

/// Same color everywhere, no lighting.
#[derive(Debug, Clone, Copy)]
pub struct SolidShader {
    pub color: Color,
}

impl SolidShader {
    pub fn new(color: Color) -> Self {
        return Self { color };
    }
}

impl Shader for SolidShader {
    fn vertex(&mut self, positions: &Triangle<Vector4<f64>>, transforms: &Transforms) -> Result<Triangle<Vector4<f64>>> {
        return project_triangle(positions, transforms);
    }

    fn fragment(&self, _barycentric: Vector3<f64>) -> Option<Color> {
        return Some(self.color);
    }
}

/// One intensity for the whole face, computed from the face normal. Needs no vertex normals,
/// so it is the fallback for geometry that has none.
#[derive(Debug, Clone)]
pub struct FlatShader {
    pub light_direction: Vector3<f64>,
    pub color: Color,
    intensity: Option<f64>,
}

impl FlatShader {
    pub fn new(light_direction: Vector3<f64>, color: Color) -> Self {
        return Self { light_direction, color, intensity: None };
    }
}

impl Shader for FlatShader {
    fn vertex(&mut self, positions: &Triangle<Vector4<f64>>, transforms: &Transforms) -> Result<Triangle<Vector4<f64>>> {
        self.intensity = face_intensity(positions, self.light_direction);
        return project_triangle(positions, transforms);
    }

    fn fragment(&self, _barycentric: Vector3<f64>) -> Option<Color> {
        let intensity = self.intensity?;
        return Some(self.color * intensity.clamp(0.0, 1.0));
    }
}

/// Intensity computed at each vertex from its normal and interpolated across the face.
#[derive(Debug, Clone)]
pub struct GouraudShader {
    pub light_direction: Vector3<f64>,
    pub color: Color,
    /// Normals of the triangle about to be drawn. Without them every pixel is discarded.
    pub normals: Option<Triangle<Vector3<f64>>>,
    intensities: Option<Triangle<f64>>,
}

impl GouraudShader {
    pub fn new(light_direction: Vector3<f64>, color: Color, normals: Option<Triangle<Vector3<f64>>>) -> Self {
        return Self { light_direction, color, normals, intensities: None };
    }
}

impl Shader for GouraudShader {
    fn vertex(&mut self, positions: &Triangle<Vector4<f64>>, transforms: &Transforms) -> Result<Triangle<Vector4<f64>>> {
        self.intensities = self
            .normals
            .as_ref()
            .and_then(|normals| vertex_intensities(normals, self.light_direction));
        return project_triangle(positions, transforms);
    }

    fn fragment(&self, barycentric: Vector3<f64>) -> Option<Color> {
        let intensity = self.intensities.as_ref()?.interpolate(&barycentric);
        return Some(self.color * intensity.clamp(0.0, 1.0));
    }
}

/// Texture lookup at interpolated texture coordinates, lit per vertex when normals are
/// available and per face otherwise.
pub struct TexturedShader<'a, S: Sampler + ?Sized> {
    pub light_direction: Vector3<f64>,
    pub texture: &'a S,
    pub uvs: Triangle<Vector3<f64>>,
    pub normals: Option<Triangle<Vector3<f64>>>,
    intensities: Option<Triangle<f64>>,
}

impl<'a, S: Sampler + ?Sized> TexturedShader<'a, S> {
    pub fn new(
        light_direction: Vector3<f64>,
        texture: &'a S,
        uvs: Triangle<Vector3<f64>>,
        normals: Option<Triangle<Vector3<f64>>>,
    ) -> Self {
        return Self { light_direction, texture, uvs, normals, intensities: None };
    }
}

impl<'a, S: Sampler + ?Sized> Shader for TexturedShader<'a, S> {
    fn vertex(&mut self, positions: &Triangle<Vector4<f64>>, transforms: &Transforms) -> Result<Triangle<Vector4<f64>>> {
        self.intensities = match &self.normals {
            Some(normals) => vertex_intensities(normals, self.light_direction),
            None => face_intensity(positions, self.light_direction).map(|i| Triangle::new(i, i, i)),
        };
        return project_triangle(positions, transforms);
    }

    fn fragment(&self, barycentric: Vector3<f64>) -> Option<Color> {
        let intensity = self.intensities.as_ref()?.interpolate(&barycentric);
        let uv = self.uvs.interpolate(&barycentric);
        return Some(self.texture.sample(uv) * intensity.clamp(0.0, 1.0));
    }
}
