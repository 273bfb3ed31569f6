//! GPU side of meshes.

use crate::data::MeshData;
use crate::MeshError;
use glplus::gl::types::GLsizei;
use glplus::{
  draw_elements, Buffer, BufferTarget, BufferUsage, ImageFlags, IndexType, Primitive, Program,
  ScopedTextureBind, Texture2D, VertexArray, VertexAttribute,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Attribute names a program must use to receive the mesh data.
const POSITION_ATTRIBUTE: &str = "position";
const NORMAL_ATTRIBUTE: &str = "normal";
const TEXCOORD_ATTRIBUTE: &str = "texcoord0";
const DIFFUSE_TEXTURE_UNIFORM: &str = "diffuse_texture";

/// A mesh uploaded once and drawn many times.
#[derive(Debug, Default)]
pub struct StaticMesh {
  indices: Option<Rc<Buffer>>,
  positions: Option<Rc<Buffer>>,
  normals: Option<Rc<Buffer>>,
  texcoords: Option<Rc<Buffer>>,
  diffuse_texture: Option<Rc<Texture2D>>,
  vertex_count: usize,
  // attribute locations depend on the program, so the vertex array is rebuilt when it changes;
  // keyed by Program::id as handles can be recycled
  vertex_array: RefCell<Option<(u64, VertexArray)>>,
}

impl StaticMesh {
  /// Create an empty mesh.
  pub fn new() -> Self {
    StaticMesh::default()
  }

  /// Create a mesh and upload `data` into it.
  pub fn from_data(data: &MeshData) -> Result<Self, MeshError> {
    let mut mesh = StaticMesh::new();
    mesh.upload(data)?;
    Ok(mesh)
  }

  /// Upload `data`, replacing the current content.
  ///
  /// Every buffer and the texture are created before anything is replaced: on error the mesh is
  /// left as it was.
  pub fn upload(&mut self, data: &MeshData) -> Result<(), MeshError> {
    let indices = Buffer::from_slice(
      BufferTarget::ElementArray,
      &data.indices,
      BufferUsage::StaticDraw,
    )?;
    let positions = array_buffer(&data.positions)?;
    let normals = array_buffer(&data.normals)?;
    let texcoords = array_buffer(&data.texcoords)?;

    let diffuse_texture = match data.diffuse_texture {
      Some(ref path) => Some(Rc::new(Texture2D::from_image(path, ImageFlags::INVERT_Y)?)),
      None => None,
    };

    log::debug!(
      "uploaded mesh {} ({} indices)",
      data.name,
      data.vertex_count()
    );

    self.indices = Some(Rc::new(indices));
    self.positions = positions;
    self.normals = normals;
    self.texcoords = texcoords;
    self.diffuse_texture = diffuse_texture;
    self.vertex_count = data.vertex_count();
    self.vertex_array.replace(None);

    Ok(())
  }

  /// Replace the diffuse texture.
  pub fn set_diffuse_texture(&mut self, texture: Rc<Texture2D>) {
    self.diffuse_texture = Some(texture);
  }

  /// Current diffuse texture, if any.
  pub fn diffuse_texture(&self) -> Option<&Rc<Texture2D>> {
    self.diffuse_texture.as_ref()
  }

  /// Number of indices drawn by [`StaticMesh::render`].
  pub fn vertex_count(&self) -> usize {
    self.vertex_count
  }

  /// Draw the mesh as indexed triangles with `program`.
  ///
  /// Attributes the program doesn’t use are skipped. The diffuse texture, if any, is bound to
  /// unit 0 for the duration of the draw.
  pub fn render(&self, program: &Program) -> Result<(), MeshError> {
    let indices = self.indices.as_ref().ok_or(MeshError::NotUploaded)?;

    let mut cache = self.vertex_array.borrow_mut();

    if !matches!(*cache, Some((id, _)) if id == program.id()) {
      log::trace!("building vertex array for program {}", program.handle());
      *cache = Some((program.id(), self.build_vertex_array(program, indices)?));
    }

    let vertex_array = match *cache {
      Some((_, ref vertex_array)) => vertex_array,
      None => return Err(MeshError::NotUploaded),
    };

    let _texture_bind = match self.diffuse_texture {
      Some(ref texture) => {
        if let Some(location) = program.try_uniform_location(DIFFUSE_TEXTURE_UNIFORM)? {
          program.upload_at(location, 0i32)?;
        }

        Some(ScopedTextureBind::new(texture, 0)?)
      }
      None => None,
    };

    draw_elements(
      program,
      vertex_array,
      Primitive::Triangles,
      0,
      self.vertex_count as GLsizei,
    )?;

    Ok(())
  }

  fn build_vertex_array(
    &self,
    program: &Program,
    indices: &Rc<Buffer>,
  ) -> Result<VertexArray, MeshError> {
    let mut vertex_array = VertexArray::new()?;
    vertex_array.set_index_buffer(indices, IndexType::UnsignedInt)?;

    let attributes = [
      (POSITION_ATTRIBUTE, &self.positions, 3),
      (NORMAL_ATTRIBUTE, &self.normals, 3),
      (TEXCOORD_ATTRIBUTE, &self.texcoords, 2),
    ];

    for (name, buffer, components) in attributes {
      if let Some(buffer) = buffer {
        if let Some(index) = program.try_attribute_location(name)? {
          vertex_array.set_attribute(VertexAttribute::floats(index, components), buffer)?;
        }
      }
    }

    Ok(vertex_array)
  }
}

fn array_buffer(data: &[f32]) -> Result<Option<Rc<Buffer>>, MeshError> {
  if data.is_empty() {
    return Ok(None);
  }

  let buffer = Buffer::from_slice(BufferTarget::Array, data, BufferUsage::StaticDraw)?;
  Ok(Some(Rc::new(buffer)))
}
