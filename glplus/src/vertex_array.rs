//! Vertex array objects.

use crate::buffer::{Buffer, BufferTarget, ScopedBufferBind};
use crate::error::{check_gl_errors, log_drop_error, GlError};
use crate::state::get_ctx_bound_vertex_array;
use gl::types::*;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::{error, fmt};

/// Errors that can occur while building a [`VertexArray`].
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum VertexArrayError {
  /// The driver reported an error.
  Gl(GlError),
  /// The buffer was created for a target that cannot be used here.
  WrongBufferTarget {
    expected: BufferTarget,
    found: BufferTarget,
  },
  /// Indexed rendering was requested but no index buffer is set.
  NoIndexBuffer,
}

impl fmt::Display for VertexArrayError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      VertexArrayError::Gl(ref e) => write!(f, "vertex array error: {}", e),
      VertexArrayError::WrongBufferTarget { expected, found } => write!(
        f,
        "only {} buffers can be used here (got a {} buffer)",
        expected, found
      ),
      VertexArrayError::NoIndexBuffer => f.write_str("vertex array has no index buffer"),
    }
  }
}

impl error::Error for VertexArrayError {}

impl From<GlError> for VertexArrayError {
  fn from(e: GlError) -> Self {
    VertexArrayError::Gl(e)
  }
}

/// Scalar type of a vertex attribute component.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttributeType {
  Byte,
  UnsignedByte,
  Short,
  UnsignedShort,
  Int,
  UnsignedInt,
  Float,
}

impl AttributeType {
  pub(crate) fn to_glenum(self) -> GLenum {
    match self {
      AttributeType::Byte => gl::BYTE,
      AttributeType::UnsignedByte => gl::UNSIGNED_BYTE,
      AttributeType::Short => gl::SHORT,
      AttributeType::UnsignedShort => gl::UNSIGNED_SHORT,
      AttributeType::Int => gl::INT,
      AttributeType::UnsignedInt => gl::UNSIGNED_INT,
      AttributeType::Float => gl::FLOAT,
    }
  }
}

/// Type of the indices stored in an index buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndexType {
  UnsignedByte,
  UnsignedShort,
  UnsignedInt,
}

impl IndexType {
  /// Size of a single index, in bytes.
  pub fn size(self) -> usize {
    match self {
      IndexType::UnsignedByte => 1,
      IndexType::UnsignedShort => 2,
      IndexType::UnsignedInt => 4,
    }
  }

  pub(crate) fn to_glenum(self) -> GLenum {
    match self {
      IndexType::UnsignedByte => gl::UNSIGNED_BYTE,
      IndexType::UnsignedShort => gl::UNSIGNED_SHORT,
      IndexType::UnsignedInt => gl::UNSIGNED_INT,
    }
  }
}

/// Layout of a single vertex attribute inside an array buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VertexAttribute {
  /// Attribute index, as returned by [`Program::attribute_location`].
  ///
  /// [`Program::attribute_location`]: crate::Program::attribute_location
  pub index: GLuint,
  /// Number of components (1 to 4).
  pub components: GLint,
  /// Scalar type of each component.
  pub ty: AttributeType,
  /// Whether integer data is normalized to `[0; 1]` / `[-1; 1]`.
  pub normalized: bool,
  /// Bytes between two consecutive vertices; `0` means tightly packed.
  pub stride: GLsizei,
  /// Byte offset of the first component in the buffer.
  pub offset: usize,
}

impl VertexAttribute {
  /// Tightly packed float attribute starting at the beginning of the buffer.
  pub fn floats(index: GLuint, components: GLint) -> Self {
    VertexAttribute {
      index,
      components,
      ty: AttributeType::Float,
      normalized: false,
      stride: 0,
      offset: 0,
    }
  }
}

/// Vertex array object.
///
/// Buffers referenced by the vertex array are kept alive as long as it is.
#[derive(Debug)]
pub struct VertexArray {
  handle: GLuint,
  vertex_buffers: HashMap<GLuint, Rc<Buffer>>,
  index_buffer: Option<(Rc<Buffer>, IndexType)>,
}

impl VertexArray {
  /// Create a new vertex array with no attribute enabled.
  pub fn new() -> Result<Self, GlError> {
    let mut handle: GLuint = 0;

    unsafe { gl::GenVertexArrays(1, &mut handle) };
    check_gl_errors()?;

    if handle == 0 {
      return Err(GlError::NullHandle("glGenVertexArrays"));
    }

    log::debug!("created vertex array {}", handle);

    Ok(VertexArray {
      handle,
      vertex_buffers: HashMap::new(),
      index_buffer: None,
    })
  }

  /// Enable a vertex attribute and source it from `buffer`.
  ///
  /// Only [`BufferTarget::Array`] buffers are accepted.
  pub fn set_attribute(
    &mut self,
    attribute: VertexAttribute,
    buffer: &Rc<Buffer>,
  ) -> Result<(), VertexArrayError> {
    if buffer.target() != BufferTarget::Array {
      return Err(VertexArrayError::WrongBufferTarget {
        expected: BufferTarget::Array,
        found: buffer.target(),
      });
    }

    {
      let _vao_bind = ScopedVertexArrayBind::new(self)?;

      unsafe { gl::EnableVertexAttribArray(attribute.index) };
      check_gl_errors()?;

      // the attribute captures whatever is bound to GL_ARRAY_BUFFER at this point
      let _buffer_bind = ScopedBufferBind::new(buffer)?;

      unsafe {
        gl::VertexAttribPointer(
          attribute.index,
          attribute.components,
          attribute.ty.to_glenum(),
          if attribute.normalized { gl::TRUE } else { gl::FALSE },
          attribute.stride,
          attribute.offset as *const _,
        );
      }
      check_gl_errors()?;
    }

    self.vertex_buffers.insert(attribute.index, buffer.clone());

    Ok(())
  }

  /// Set the buffer indexed draws fetch their indices from.
  ///
  /// Only [`BufferTarget::ElementArray`] buffers are accepted.
  pub fn set_index_buffer(
    &mut self,
    buffer: &Rc<Buffer>,
    index_type: IndexType,
  ) -> Result<(), VertexArrayError> {
    if buffer.target() != BufferTarget::ElementArray {
      return Err(VertexArrayError::WrongBufferTarget {
        expected: BufferTarget::ElementArray,
        found: buffer.target(),
      });
    }

    {
      let _vao_bind = ScopedVertexArrayBind::new(self)?;

      // the element array binding is part of the vertex array state, so it must stay bound after
      // the vertex array is unbound; no scoped guard here
      unsafe { gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, buffer.handle()) };
      check_gl_errors()?;
    }

    self.index_buffer = Some((buffer.clone(), index_type));

    Ok(())
  }

  /// Type of the indices of the index buffer.
  pub fn index_type(&self) -> Result<IndexType, VertexArrayError> {
    self
      .index_buffer
      .as_ref()
      .map(|&(_, ty)| ty)
      .ok_or(VertexArrayError::NoIndexBuffer)
  }

  /// Native handle.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    log::trace!("deleting vertex array {}", self.handle);

    unsafe { gl::DeleteVertexArrays(1, &self.handle) };
    log_drop_error("glDeleteVertexArrays", check_gl_errors());
  }
}

/// Bind a vertex array until the guard is dropped.
///
/// The vertex array bound before the guard was created is restored on drop.
#[derive(Debug)]
pub struct ScopedVertexArrayBind<'a> {
  previous: GLuint,
  _bound: PhantomData<&'a VertexArray>,
}

impl<'a> ScopedVertexArrayBind<'a> {
  /// Bind `vertex_array`.
  pub fn new(vertex_array: &'a VertexArray) -> Result<Self, GlError> {
    let previous = get_ctx_bound_vertex_array()?;

    unsafe { gl::BindVertexArray(vertex_array.handle) };
    check_gl_errors()?;

    Ok(ScopedVertexArrayBind {
      previous,
      _bound: PhantomData,
    })
  }
}

impl Drop for ScopedVertexArrayBind<'_> {
  fn drop(&mut self) {
    unsafe { gl::BindVertexArray(self.previous) };
    log_drop_error("restoring vertex array binding", check_gl_errors());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_sizes() {
    assert_eq!(IndexType::UnsignedByte.size(), 1);
    assert_eq!(IndexType::UnsignedShort.size(), 2);
    assert_eq!(IndexType::UnsignedInt.size(), 4);
  }

  #[test]
  fn index_enums() {
    assert_eq!(IndexType::UnsignedShort.to_glenum(), gl::UNSIGNED_SHORT);
    assert_eq!(IndexType::UnsignedInt.to_glenum(), gl::UNSIGNED_INT);
  }

  #[test]
  fn float_attribute_is_tightly_packed() {
    let attr = VertexAttribute::floats(2, 3);

    assert_eq!(attr.index, 2);
    assert_eq!(attr.components, 3);
    assert_eq!(attr.ty, AttributeType::Float);
    assert_eq!(attr.ty.to_glenum(), gl::FLOAT);
    assert!(!attr.normalized);
    assert_eq!(attr.stride, 0);
    assert_eq!(attr.offset, 0);
  }

  #[test]
  fn wrong_target_message() {
    let err = VertexArrayError::WrongBufferTarget {
      expected: BufferTarget::Array,
      found: BufferTarget::ElementArray,
    };

    assert_eq!(
      err.to_string(),
      "only GL_ARRAY_BUFFER buffers can be used here (got a GL_ELEMENT_ARRAY_BUFFER buffer)"
    );
  }
}
