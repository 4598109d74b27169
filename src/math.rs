//! Linear algebra used by the pipeline.
//!
//! Vectors are plain nalgebra `Vector3<f64>` / `Vector4<f64>`. Matrices are dynamically sized, so a
//! shape mismatch is reported as an [`Error`] instead of being ruled out at compile time: the
//! transform chain is assembled at run time from whatever the caller configured.

use std::ops::{Add, Index, IndexMut, Mul};

use nalgebra as na;
use na::{vector, DMatrix, Vector3, Vector4};

use crate::error::{Error, Result};

/// Dense rows x columns matrix of f64.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    values: DMatrix<f64>,
}

impl Matrix {
    /// Zero-filled matrix of the given shape.
    pub fn new(rows: usize, columns: usize) -> Self {
        return Self { values: DMatrix::zeros(rows, columns) };
    }

    /// Square identity matrix.
    pub fn identity(dimension: usize) -> Self {
        return Self { values: DMatrix::identity(dimension, dimension) };
    }

    /// 4x1 column holding a homogeneous vector.
    pub fn from_vector4(v: Vector4<f64>) -> Self {
        let mut result = Self::new(4, 1);
        for i in 0..4 {
            result[(i, 0)] = v[i];
        }
        return result;
    }

    /// 4x1 column holding a position, w = 1.
    pub fn from_point(v: Vector3<f64>) -> Self {
        return Self::from_vector4(to_hom_point(v));
    }

    pub fn rows(&self) -> usize {
        return self.values.nrows();
    }

    pub fn columns(&self) -> usize {
        return self.values.ncols();
    }

    /// `self * rhs`, rejecting operands whose inner dimensions differ.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.columns() != rhs.rows() {
            return Err(Error::DimensionMismatch {
                lhs_rows: self.rows(),
                lhs_columns: self.columns(),
                rhs_rows: rhs.rows(),
                rhs_columns: rhs.columns(),
            });
        }
        return Ok(Self { values: &self.values * &rhs.values });
    }

    /// Applies the matrix to a homogeneous column vector. The result is still homogeneous.
    pub fn transform(&self, v: Vector4<f64>) -> Result<Matrix> {
        return self.multiply(&Matrix::from_vector4(v));
    }

    /// Perspective divide of a 4x1 column: x, y and z are divided by w, w itself is kept.
    pub fn to_vector4(&self) -> Result<Vector4<f64>> {
        let w = self.homogeneous_w()?;
        return Ok(vector![self[(0, 0)] / w, self[(1, 0)] / w, self[(2, 0)] / w, w]);
    }

    /// Perspective divide of a 4x1 column down to a 3d point.
    pub fn to_vector3(&self) -> Result<Vector3<f64>> {
        return Ok(self.to_vector4()?.xyz());
    }

    fn homogeneous_w(&self) -> Result<f64> {
        if self.rows() != 4 || self.columns() != 1 {
            return Err(Error::ShapeMismatch {
                expected_rows: 4,
                expected_columns: 1,
                rows: self.rows(),
                columns: self.columns(),
            });
        }
        let w = self[(3, 0)];
        if w == 0.0 {
            return Err(Error::ZeroW);
        }
        return Ok(w);
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        return &self.values[index];
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        return &mut self.values[index];
    }
}

/// `v / |v|`. A zero vector has no direction, so it is an error rather than a NaN.
pub fn normalise(v: Vector3<f64>) -> Result<Vector3<f64>> {
    return v.try_normalize(0.0).ok_or(Error::ZeroLength);
}

/// Transformation of a point to homogenous coordinates.
pub fn to_hom_point(v: Vector3<f64>) -> Vector4<f64> {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Transformation of a direction to homogenous coordinates.
pub fn to_hom_vector(v: Vector3<f64>) -> Vector4<f64> {
    return vector![v.x, v.y, v.z, 0.0];
}

/// Three vertices of the same kind: positions, per-vertex values, texture coordinates.
/// The order is the winding the geometry was emitted with and is never changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle<T> {
    pub a: T,
    pub b: T,
    pub c: T,
}

impl<T> Triangle<T> {
    pub fn new(a: T, b: T, c: T) -> Self {
        return Self { a, b, c };
    }

    pub fn vertices(&self) -> [&T; 3] {
        return [&self.a, &self.b, &self.c];
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Triangle<U> {
        return Triangle { a: f(&self.a), b: f(&self.b), c: f(&self.c) };
    }

    /// Like [`Triangle::map`], stopping at the first vertex that fails.
    pub fn try_map<U, F: FnMut(&T) -> Result<U>>(&self, mut f: F) -> Result<Triangle<U>> {
        return Ok(Triangle { a: f(&self.a)?, b: f(&self.b)?, c: f(&self.c)? });
    }
}

impl<T> Triangle<T>
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
{
    /// Weighted combination of the vertices, weights given as barycentric coordinates.
    pub fn interpolate(&self, barycentric: &Vector3<f64>) -> T {
        return self.a * barycentric.x + self.b * barycentric.y + self.c * barycentric.z;
    }
}
