//! CPU side of meshes.

use crate::MeshError;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Triangulated, single-indexed shape, ready to be uploaded.
///
/// Attribute arrays are flat: 3 floats per position and normal, 2 per texture coordinate. Empty
/// arrays mean the attribute is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
  pub name: String,
  pub positions: Vec<f32>,
  pub normals: Vec<f32>,
  pub texcoords: Vec<f32>,
  pub indices: Vec<u32>,
  /// Diffuse texture of the shape’s material, resolved against the OBJ directory.
  pub diffuse_texture: Option<PathBuf>,
}

impl MeshData {
  /// Copy a parsed shape, checking it can be drawn as indexed triangles.
  pub fn from_model(
    model: &tobj::Model,
    material: Option<&tobj::Material>,
    base_dir: impl AsRef<Path>,
  ) -> Result<Self, MeshError> {
    let mesh = &model.mesh;

    if mesh.indices.len() % 3 != 0 {
      return Err(MeshError::NotTriangulated {
        name: model.name.clone(),
        index_count: mesh.indices.len(),
      });
    }

    let vertex_count = mesh.positions.len() / 3;
    if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
      return Err(MeshError::IndexOutOfRange {
        name: model.name.clone(),
        index,
        vertex_count,
      });
    }

    let diffuse_texture = material
      .filter(|m| !m.diffuse_texture.is_empty())
      .map(|m| base_dir.as_ref().join(&m.diffuse_texture));

    Ok(MeshData {
      name: model.name.clone(),
      positions: mesh.positions.clone(),
      normals: mesh.normals.clone(),
      texcoords: mesh.texcoords.clone(),
      indices: mesh.indices.clone(),
      diffuse_texture,
    })
  }

  /// Number of indices to draw.
  pub fn vertex_count(&self) -> usize {
    self.indices.len()
  }
}

/// Load every shape of an OBJ file.
///
/// Material libraries are looked up next to the file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Vec<MeshData>, MeshError> {
  let path = path.as_ref();
  let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

  log::info!("loading mesh {}", path.display());

  let file = File::open(path)?;
  load_obj_buf(&mut BufReader::new(file), base_dir)
}

/// Load every shape of OBJ source text.
///
/// Material libraries and textures are looked up in `base_dir`.
pub fn load_obj_str(obj: &str, base_dir: impl AsRef<Path>) -> Result<Vec<MeshData>, MeshError> {
  load_obj_buf(&mut Cursor::new(obj), base_dir.as_ref())
}

fn load_obj_buf(reader: &mut impl BufRead, base_dir: &Path) -> Result<Vec<MeshData>, MeshError> {
  let (models, materials) = tobj::load_obj_buf(
    reader,
    &tobj::LoadOptions {
      triangulate: true,
      single_index: true,
      ..Default::default()
    },
    |mtl| tobj::load_mtl(base_dir.join(mtl)),
  )?;

  let materials = materials.unwrap_or_else(|e| {
    log::warn!("ignoring materials: {}", e);
    Vec::new()
  });

  models
    .iter()
    .map(|model| {
      let material = model.mesh.material_id.and_then(|id| materials.get(id));
      let data = MeshData::from_model(model, material, base_dir)?;

      log::debug!(
        "shape {}: {} vertices, {} indices",
        data.name,
        data.positions.len() / 3,
        data.indices.len()
      );

      Ok(data)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const QUAD: &str = "
o quad
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

  fn model(indices: Vec<u32>) -> tobj::Model {
    let mesh = tobj::Mesh {
      positions: vec![0., 0., 0., 1., 0., 0., 0., 1., 0., 1., 1., 0.],
      indices,
      ..Default::default()
    };

    tobj::Model::new(mesh, "shape".to_owned())
  }

  #[test]
  fn quad_is_triangulated() {
    let meshes = load_obj_str(QUAD, "").unwrap();
    assert_eq!(meshes.len(), 1);

    let quad = &meshes[0];
    assert_eq!(quad.name, "quad");
    assert_eq!(quad.vertex_count(), 6);
    assert_eq!(quad.positions.len(), 4 * 3);
    assert_eq!(quad.normals.len(), 4 * 3);
    assert_eq!(quad.texcoords.len(), 4 * 2);
    assert_eq!(quad.diffuse_texture, None);
  }

  #[test]
  fn missing_material_library_is_ignored() {
    let obj = format!("mtllib nowhere.mtl\nusemtl stone\n{}", QUAD);
    let meshes = load_obj_str(&obj, std::env::temp_dir()).unwrap();

    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].diffuse_texture, None);
  }

  #[test]
  fn missing_file() {
    let err = load_obj("/definitely/not/here.obj").unwrap_err();

    match err {
      MeshError::Io(ref e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
      _ => panic!("unexpected error: {}", err),
    }
    assert!(err.to_string().starts_with("cannot open OBJ: "));
  }

  #[test]
  fn reject_non_triangles() {
    let err = MeshData::from_model(&model(vec![0, 1, 2, 3]), None, "").unwrap_err();

    match err {
      MeshError::NotTriangulated { name, index_count } => {
        assert_eq!(name, "shape");
        assert_eq!(index_count, 4);
      }
      e => panic!("unexpected error: {}", e),
    }
  }

  #[test]
  fn reject_dangling_index() {
    let err = MeshData::from_model(&model(vec![0, 1, 4]), None, "").unwrap_err();

    assert!(matches!(
      err,
      MeshError::IndexOutOfRange {
        index: 4,
        vertex_count: 4,
        ..
      }
    ));
  }

  #[test]
  fn texture_path_is_relative_to_obj() {
    let material = tobj::Material {
      diffuse_texture: "crate.png".to_owned(),
      ..Default::default()
    };
    let data = MeshData::from_model(&model(vec![0, 1, 2, 1, 3, 2]), Some(&material), "assets").unwrap();

    assert_eq!(
      data.diffuse_texture,
      Some(Path::new("assets").join("crate.png"))
    );
  }

  #[test]
  fn material_without_texture() {
    let material = tobj::Material::default();
    let data = MeshData::from_model(&model(vec![0, 1, 2]), Some(&material), "assets").unwrap();

    assert_eq!(data.diffuse_texture, None);
    assert!(data.normals.is_empty());
  }
}
