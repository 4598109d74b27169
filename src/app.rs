use std::time;

use image::RgbImage;
use log::{info, warn};
use nalgebra::Vector3;
use tiny_gl::transform::perspective_coefficient;
use tiny_gl::{math, Color, Face, FlatShader, GouraudShader, Mesh, Scene, TexturedShader};

use crate::config::{Params, SceneConfig, ShaderKind};

/// Everything a single face needs to be drawn.
struct Context<'a> {
    kind: ShaderKind,
    light_direction: Vector3<f64>,
    texture: Option<&'a RgbImage>,
}

/// Draws one face with the requested shader. Faces lacking the attributes the shader needs
/// are drawn with the closest shader that can handle them.
fn draw_face(scene: &mut Scene, face: &Face, context: &Context) -> tiny_gl::Result<usize> {
    let light = context.light_direction;
    return match (context.kind, context.texture, face.uvs) {
        (ShaderKind::Wireframe, _, _) => {
            scene.render_wireframe(&face.positions, Color::WHITE)?;
            Ok(0)
        }
        (ShaderKind::Textured, Some(texture), Some(uvs)) => {
            let mut shader = TexturedShader::new(light, texture, uvs, face.normals);
            scene.render_triangle(&face.positions, &mut shader)
        }
        (ShaderKind::Flat, _, _) => scene.render_triangle(&face.positions, &mut FlatShader::new(light, Color::WHITE)),
        (_, _, _) => match face.normals {
            Some(normals) => {
                let mut shader = GouraudShader::new(light, Color::WHITE, Some(normals));
                scene.render_triangle(&face.positions, &mut shader)
            }
            None => scene.render_triangle(&face.positions, &mut FlatShader::new(light, Color::WHITE)),
        },
    };
}

fn build_scene(params: &Params, config: &SceneConfig) -> tiny_gl::Result<Scene> {
    let eye = Vector3::from(config.eye);
    let target = Vector3::from(config.target);
    let (width, height) = (params.width as f64, params.height as f64);

    let mut scene = Scene::new(
        params.width,
        params.height,
        config.depth,
        Color::from_raw(config.background),
        config.origin,
    )?;
    scene
        .look_at(eye, target, Vector3::from(config.up))?
        .projection(perspective_coefficient(eye, target)?)
        .viewport(width / 8.0, height / 8.0, width * 3.0 / 4.0, height * 3.0 / 4.0);
    return Ok(scene);
}

/// Renders the model once and writes the requested images.
pub fn run(params: Params) -> Result<(), Box<dyn std::error::Error>> {
    let config = params.resolve_scene()?;
    let mesh = Mesh::load(&params.model)?;
    info!("Loaded {} faces from {}", mesh.faces.len(), params.model.display());

    let texture = match &params.texture {
        Some(path) => Some(image::open(path)?.to_rgb8()),
        None => None,
    };
    if params.shader == ShaderKind::Textured {
        if texture.is_none() {
            warn!("Textured shader requested without a texture, falling back to gouraud");
        } else if mesh.faces.iter().any(|face| face.uvs.is_none()) {
            warn!("Some faces have no texture coordinates, those are drawn untextured");
        }
    }
    if params.shader == ShaderKind::Gouraud && mesh.faces.iter().any(|face| face.normals.is_none()) {
        warn!("Some faces have no vertex normals, those are drawn flat");
    }

    let context = Context {
        kind: params.shader,
        light_direction: math::normalise(Vector3::from(config.light))?,
        texture: texture.as_ref(),
    };
    let mut scene = build_scene(&params, &config)?;

    let time_begin = time::Instant::now();
    let mut written = 0;
    for face in &mesh.faces {
        written += draw_face(&mut scene, face, &context)?;
    }
    info!(
        "Rendered {} faces, {} pixels written in {:.3}s",
        mesh.faces.len(),
        written,
        time::Instant::now().duration_since(time_begin).as_secs_f32()
    );

    scene.extract_image().to_rgb_image().save(&params.output)?;
    info!("Image written to {}", params.output.display());
    if let Some(path) = &params.depth_output {
        scene.extract_depth_image().to_rgb_image().save(path)?;
        info!("Depth image written to {}", path.display());
    }

    return Ok(());
}
