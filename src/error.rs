//! Error type shared by the whole pipeline.

use thiserror::Error;

/// Everything that can go wrong while building transforms, loading geometry or rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// A triangle was submitted before the named transform was set.
    #[error("{0} transform must be configured before rendering")]
    Unconfigured(&'static str),

    #[error("cannot multiply a {lhs_rows}x{lhs_columns} matrix by a {rhs_rows}x{rhs_columns} matrix")]
    DimensionMismatch {
        lhs_rows: usize,
        lhs_columns: usize,
        rhs_rows: usize,
        rhs_columns: usize,
    },

    /// A matrix had the wrong shape for a conversion, e.g. a perspective divide on something
    /// other than a 4x1 column.
    #[error("expected a {expected_rows}x{expected_columns} matrix, got {rows}x{columns}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_columns: usize,
        rows: usize,
        columns: usize,
    },

    /// The z-buffer range has to be a finite, non-negative number.
    #[error("invalid depth range {0}, expected a finite value >= 0")]
    InvalidDepth(f64),

    #[error("cannot normalise a zero-length vector")]
    ZeroLength,

    /// Perspective divide hit a homogeneous coordinate with w == 0.
    #[error("homogeneous coordinate has w == 0")]
    ZeroW,

    #[error("malformed mesh: {0}")]
    Mesh(String),

    #[error(transparent)]
    Obj(#[from] obj::ObjError),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
