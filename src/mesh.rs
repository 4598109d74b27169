//! Triangle soup built from Wavefront OBJ files.
//!
//! Parsing itself is done by `obj-rs`; this module only resolves the indexed data into
//! self-contained [`Face`]s the pipeline can draw one at a time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use nalgebra::{vector, Vector3};
use obj::raw::object::Polygon;
use obj::raw::{parse_obj, RawObj};
use obj::{LoadErrorKind, ObjError};

use crate::error::{Error, Result};
use crate::math::Triangle;

/// One triangle with everything a shader may ask for.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub positions: Triangle<Vector3<f64>>,
    pub normals: Option<Triangle<Vector3<f64>>>,
    /// Texture coordinates, third component is usually 0.
    pub uvs: Option<Triangle<Vector3<f64>>>,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
        let path = path.as_ref();
        let mesh = Self::parse(BufReader::new(File::open(path)?))?;
        debug!("Loaded {} faces from {}", mesh.faces.len(), path.display());
        return Ok(mesh);
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Mesh> {
        let raw = parse_obj(reader).map_err(|err| match err {
            ObjError::Load(load) if *load.kind() == LoadErrorKind::IndexOutOfRange => Error::Mesh(load.to_string()),
            other => Error::from(other),
        })?;
        let mut faces = Vec::with_capacity(raw.polygons.len());
        for polygon in &raw.polygons {
            let corners = corners(polygon);
            if corners.len() < 3 {
                return Err(Error::Mesh(format!("polygon with {} vertices", corners.len())));
            }
            // Fan triangulation keeps the winding of the source polygon.
            for i in 1..corners.len() - 1 {
                faces.push(resolve_face(&raw, [corners[0], corners[i], corners[i + 1]]));
            }
        }
        return Ok(Mesh { faces });
    }
}

/// Position, texture and normal index of a polygon corner.
type Corner = (usize, Option<usize>, Option<usize>);

fn corners(polygon: &Polygon) -> Vec<Corner> {
    return match polygon {
        Polygon::P(v) => v.iter().map(|&p| (p, None, None)).collect(),
        Polygon::PT(v) => v.iter().map(|&(p, t)| (p, Some(t), None)).collect(),
        Polygon::PN(v) => v.iter().map(|&(p, n)| (p, None, Some(n))).collect(),
        Polygon::PTN(v) => v.iter().map(|&(p, t, n)| (p, Some(t), Some(n))).collect(),
    };
}

/// Indices come out of `parse_obj` already resolved against the data defined before them.
fn resolve_face(raw: &RawObj, corners: [Corner; 3]) -> Face {
    let position = |i: usize| {
        let (x, y, z, _) = raw.positions[i];
        vector![x as f64, y as f64, z as f64]
    };
    let tex_coord = |i: usize| {
        let (u, v, w) = raw.tex_coords[i];
        vector![u as f64, v as f64, w as f64]
    };
    let normal = |i: usize| {
        let (x, y, z) = raw.normals[i];
        vector![x as f64, y as f64, z as f64]
    };

    let [a, b, c] = corners;
    let positions = Triangle::new(position(a.0), position(b.0), position(c.0));
    // Attributes only count when every corner has them.
    let uvs = match (a.1, b.1, c.1) {
        (Some(ta), Some(tb), Some(tc)) => Some(Triangle::new(tex_coord(ta), tex_coord(tb), tex_coord(tc))),
        _ => None,
    };
    let normals = match (a.2, b.2, c.2) {
        (Some(na), Some(nb), Some(nc)) => Some(Triangle::new(normal(na), normal(nb), normal(nc))),
        _ => None,
    };
    return Face { positions, normals, uvs };
}
