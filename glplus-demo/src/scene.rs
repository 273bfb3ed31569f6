//! The textured mesh and the program that draws it.

use cgmath::Matrix4;
use glplus::{ImageFlags, Program, Texture2D};
use glplus_mesh::{load_obj, load_obj_str, MeshData, StaticMesh};
use std::error::Error;
use std::path::Path;
use std::rc::Rc;

const VS: &str = include_str!("mesh-vs.glsl");
const FS: &str = include_str!("mesh-fs.glsl");

const CUBE_OBJ: &str = include_str!("../assets/cube.obj");

const CHECKER_SIZE: u32 = 256;
const CHECKER_CELLS: u32 = 8;

pub struct Scene {
  program: Program,
  meshes: Vec<StaticMesh>,
}

impl Scene {
  /// Load `mesh`, or the built-in cube.
  ///
  /// `texture` overrides the material textures. Shapes left without a texture get a
  /// checkerboard.
  pub fn new(mesh: Option<&Path>, texture: Option<&Path>) -> Result<Self, Box<dyn Error>> {
    let program = Program::from_sources(VS, FS)?;

    let data = match mesh {
      Some(path) => load_obj(path)?,
      None => load_obj_str(CUBE_OBJ, ".")?,
    };

    let override_texture = match texture {
      Some(path) => Some(Rc::new(Texture2D::from_image(path, ImageFlags::INVERT_Y)?)),
      None => None,
    };

    let mut checker = None;
    let mut meshes = Vec::with_capacity(data.len());

    for shape in &data {
      let mut mesh = StaticMesh::from_data(shape)?;

      if let Some(ref texture) = override_texture {
        mesh.set_diffuse_texture(texture.clone());
      } else if mesh.diffuse_texture().is_none() {
        if checker.is_none() {
          checker = Some(Rc::new(checkerboard_texture()?));
        }

        if let Some(ref texture) = checker {
          mesh.set_diffuse_texture(texture.clone());
        }
      }

      meshes.push(mesh);
    }

    log::info!(
      "scene ready: {} shape(s), {} indices",
      meshes.len(),
      data.iter().map(MeshData::vertex_count).sum::<usize>()
    );

    Ok(Scene { program, meshes })
  }

  pub fn render(
    &self,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    model: Matrix4<f32>,
  ) -> Result<(), Box<dyn Error>> {
    self.program.upload::<[[f32; 4]; 4]>("projection", projection.into())?;
    self.program.upload::<[[f32; 4]; 4]>("view", view.into())?;
    self.program.upload::<[[f32; 4]; 4]>("model", model.into())?;

    for mesh in &self.meshes {
      mesh.render(&self.program)?;
    }

    Ok(())
  }
}

fn checkerboard_texture() -> Result<Texture2D, Box<dyn Error>> {
  let mut texture = Texture2D::new()?;
  texture.upload_rgba8(
    CHECKER_SIZE,
    CHECKER_SIZE,
    &checkerboard(CHECKER_SIZE, CHECKER_CELLS),
  )?;

  Ok(texture)
}

/// RGBA8 checkerboard of `size`×`size` texels with `cells` cells per side.
pub fn checkerboard(size: u32, cells: u32) -> Vec<u8> {
  let cell = (size / cells.max(1)).max(1);
  let mut texels = Vec::with_capacity(size as usize * size as usize * 4);

  for y in 0..size {
    for x in 0..size {
      let light = (x / cell + y / cell) % 2 == 0;
      let rgba = if light {
        [0xe0, 0xe0, 0xe0, 0xff]
      } else {
        [0x30, 0x50, 0x90, 0xff]
      };

      texels.extend_from_slice(&rgba);
    }
  }

  texels
}

#[cfg(test)]
mod tests {
  use super::*;

  fn texel(texels: &[u8], size: u32, x: u32, y: u32) -> &[u8] {
    let i = (y * size + x) as usize * 4;
    &texels[i..i + 4]
  }

  #[test]
  fn checkerboard_alternates() {
    let texels = checkerboard(8, 2);

    assert_eq!(texels.len(), 8 * 8 * 4);
    assert_eq!(texel(&texels, 8, 0, 0), texel(&texels, 8, 3, 3));
    assert_ne!(texel(&texels, 8, 0, 0), texel(&texels, 8, 4, 0));
    assert_ne!(texel(&texels, 8, 0, 0), texel(&texels, 8, 0, 4));
    assert_eq!(texel(&texels, 8, 0, 0), texel(&texels, 8, 4, 4));
  }

  #[test]
  fn checkerboard_is_opaque() {
    let texels = checkerboard(16, 4);
    assert!(texels.chunks(4).all(|t| t[3] == 0xff));
  }

  #[test]
  fn builtin_cube_parses() {
    let meshes = load_obj_str(CUBE_OBJ, ".").unwrap();

    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].vertex_count(), 36);
    assert_eq!(meshes[0].positions.len(), 24 * 3);
    assert_eq!(meshes[0].texcoords.len(), 24 * 2);
  }
}
