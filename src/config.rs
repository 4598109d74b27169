//! Command line and scene file configuration.
//!
//! Camera, light and frame settings come from three layers: built-in defaults, an optional TOML
//! scene file, and command line flags, later layers winning.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tiny_gl::Origin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShaderKind {
    /// One intensity per face from its geometric normal.
    Flat,
    /// Vertex normal lighting, falls back to flat for faces without normals.
    Gouraud,
    /// Diffuse texture with vertex normal lighting.
    Textured,
    /// Triangle outlines only.
    Wireframe,
}

/// Render a Wavefront OBJ model to a PNG image in software.
#[derive(Debug, Parser)]
#[command(name = "tiny_gl", version)]
pub struct Params {
    /// Wavefront OBJ model to render.
    pub model: PathBuf,

    /// Diffuse texture, required by the textured shader.
    #[arg(short, long)]
    pub texture: Option<PathBuf>,

    /// Where to write the rendered image.
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Also write a gray visualisation of the z-buffer here.
    #[arg(long)]
    pub depth_output: Option<PathBuf>,

    /// TOML file with camera, light and frame settings.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    pub width: u32,

    #[arg(long, default_value_t = 800)]
    pub height: u32,

    #[arg(short, long, value_enum, default_value_t = ShaderKind::Gouraud)]
    pub shader: ShaderKind,

    /// Corner holding pixel (0, 0) in the output: top-left, top-right, bottom-left, bottom-right.
    #[arg(long)]
    pub origin: Option<Origin>,

    /// Camera position, as x,y,z.
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    pub eye: Option<[f64; 3]>,

    /// Point the camera looks at, as x,y,z.
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    pub target: Option<[f64; 3]>,

    /// Camera up direction, as x,y,z.
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    pub up: Option<[f64; 3]>,

    /// Direction towards the light, as x,y,z.
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    pub light: Option<[f64; 3]>,
}

/// Settings that describe the scene rather than the invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub eye: [f64; 3],
    pub target: [f64; 3],
    pub up: [f64; 3],
    pub light: [f64; 3],
    /// Upper bound of the z-buffer range.
    pub depth: f64,
    /// Background as 0xRRGGBB.
    pub background: u32,
    pub origin: Origin,
}

impl Default for SceneConfig {
    fn default() -> Self {
        return Self {
            eye: [1.0, 1.0, 3.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            light: [0.0, 0.0, 1.0],
            depth: 255.0,
            background: 0x000000,
            origin: Origin::BottomLeft,
        };
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<SceneConfig, Box<dyn Error>> {
        let source = fs::read_to_string(path)?;
        return Ok(toml::from_str(&source)?);
    }
}

impl Params {
    /// Scene settings after applying the scene file and then the command line on top of the
    /// defaults.
    pub fn resolve_scene(&self) -> Result<SceneConfig, Box<dyn Error>> {
        let base = match &self.scene {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        return Ok(self.apply(base));
    }

    fn apply(&self, base: SceneConfig) -> SceneConfig {
        return SceneConfig {
            eye: self.eye.unwrap_or(base.eye),
            target: self.target.unwrap_or(base.target),
            up: self.up.unwrap_or(base.up),
            light: self.light.unwrap_or(base.light),
            origin: self.origin.unwrap_or(base.origin),
            ..base
        };
    }
}

/// Parses "x,y,z".
fn parse_vector(s: &str) -> Result<[f64; 3], String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("'{}': {}", part, e)))
        .collect::<Result<Vec<_>, _>>()?;
    return <[f64; 3]>::try_from(parts)
        .map_err(|parts| format!("expected 3 comma separated numbers, got {}", parts.len()));
}
