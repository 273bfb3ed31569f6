//! Wavefront OBJ meshes for [glplus](https://crates.io/crates/glplus).
//!
//! Meshes are parsed with [tobj](https://crates.io/crates/tobj) into [`MeshData`], a validated CPU
//! copy of a single shape, and then uploaded to the GPU as a [`StaticMesh`].

mod data;
mod static_mesh;

pub use data::{load_obj, load_obj_str, MeshData};
pub use static_mesh::StaticMesh;

use glplus::{GlError, ProgramError, TextureError, VertexArrayError};
use std::{error, fmt, io};

/// Errors that can occur while loading or rendering a mesh.
#[non_exhaustive]
#[derive(Debug)]
pub enum MeshError {
  /// The OBJ file could not be opened.
  Io(io::Error),
  /// The OBJ file could not be parsed.
  Load(tobj::LoadError),
  /// The number of indices is not a multiple of 3.
  NotTriangulated { name: String, index_count: usize },
  /// An index points past the last vertex.
  IndexOutOfRange {
    name: String,
    index: u32,
    vertex_count: usize,
  },
  /// The mesh was rendered before anything was uploaded.
  NotUploaded,
  /// The driver reported an error.
  Gl(GlError),
  /// The diffuse texture could not be loaded.
  Texture(TextureError),
  /// The program could not be queried.
  Program(ProgramError),
  /// The vertex array could not be set up.
  VertexArray(VertexArrayError),
}

impl fmt::Display for MeshError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      MeshError::Io(ref e) => write!(f, "cannot open OBJ: {}", e),
      MeshError::Load(ref e) => write!(f, "cannot load OBJ: {}", e),
      MeshError::NotTriangulated {
        ref name,
        index_count,
      } => write!(
        f,
        "mesh {} is not made of triangles ({} indices)",
        name, index_count
      ),
      MeshError::IndexOutOfRange {
        ref name,
        index,
        vertex_count,
      } => write!(
        f,
        "mesh {} references vertex {} but only has {}",
        name, index, vertex_count
      ),
      MeshError::NotUploaded => f.write_str("mesh not uploaded"),
      MeshError::Gl(ref e) => write!(f, "mesh error: {}", e),
      MeshError::Texture(ref e) => write!(f, "{}", e),
      MeshError::Program(ref e) => write!(f, "{}", e),
      MeshError::VertexArray(ref e) => write!(f, "{}", e),
    }
  }
}

impl error::Error for MeshError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      MeshError::Io(e) => Some(e),
      MeshError::Load(e) => Some(e),
      MeshError::Gl(e) => Some(e),
      MeshError::Texture(e) => Some(e),
      MeshError::Program(e) => Some(e),
      MeshError::VertexArray(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for MeshError {
  fn from(e: io::Error) -> Self {
    MeshError::Io(e)
  }
}

impl From<tobj::LoadError> for MeshError {
  fn from(e: tobj::LoadError) -> Self {
    MeshError::Load(e)
  }
}

impl From<GlError> for MeshError {
  fn from(e: GlError) -> Self {
    MeshError::Gl(e)
  }
}

impl From<TextureError> for MeshError {
  fn from(e: TextureError) -> Self {
    MeshError::Texture(e)
  }
}

impl From<ProgramError> for MeshError {
  fn from(e: ProgramError) -> Self {
    MeshError::Program(e)
  }
}

impl From<VertexArrayError> for MeshError {
  fn from(e: VertexArrayError) -> Self {
    MeshError::VertexArray(e)
  }
}
