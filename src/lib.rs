//! tiny_gl: a small software rendering pipeline.
//!
//! Triangles given in object space go through `viewport * projection * view`, get rasterized
//! with barycentric coordinates against a z-buffer and are colored by a user supplied
//! [`Shader`]. No GPU is involved; the result is a plain array of packed rgb values.
//!
//! ```no_run
//! use nalgebra::vector;
//! use tiny_gl::{Color, GouraudShader, Mesh, Origin, Scene};
//!
//! let mesh = Mesh::load("model.obj")?;
//! let eye = vector![1.0, 1.0, 3.0];
//! let target = vector![0.0, 0.0, 0.0];
//!
//! let mut scene = Scene::new(800, 800, 255.0, Color::BLACK, Origin::BottomLeft)?;
//! scene
//!     .look_at(eye, target, vector![0.0, 1.0, 0.0])?
//!     .projection(tiny_gl::transform::perspective_coefficient(eye, target)?)
//!     .viewport(100.0, 100.0, 600.0, 600.0);
//! for face in &mesh.faces {
//!     let mut shader = GouraudShader::new(vector![0.0, 0.0, 1.0], Color::WHITE, face.normals);
//!     scene.render_triangle(&face.positions, &mut shader)?;
//! }
//! let image = scene.extract_image();
//! # Ok::<(), tiny_gl::Error>(())
//! ```

pub mod color;
pub mod error;
pub mod math;
pub mod mesh;
pub mod scene;
pub mod texture;

pub use color::Color;
pub use error::{Error, Result};
pub use math::{Matrix, Triangle};
pub use mesh::{Face, Mesh};
pub use scene::buffer::{Image, Origin};
pub use scene::shader::{FlatShader, GouraudShader, Shader, SolidShader, TexturedShader};
pub use scene::transform::{self, Transforms};
pub use scene::Scene;
pub use texture::Sampler;
