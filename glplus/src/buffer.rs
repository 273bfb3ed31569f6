//! OpenGL buffers.

use crate::error::{check_gl_errors, log_drop_error, GlError};
use crate::state::get_ctx_bound_buffer;
use gl::types::*;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

/// Binding point of a buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BufferTarget {
  /// Vertex attribute data (`GL_ARRAY_BUFFER`).
  Array,
  /// Vertex indices (`GL_ELEMENT_ARRAY_BUFFER`).
  ElementArray,
  /// Uniform block storage (`GL_UNIFORM_BUFFER`).
  Uniform,
}

impl BufferTarget {
  pub(crate) fn to_glenum(self) -> GLenum {
    match self {
      BufferTarget::Array => gl::ARRAY_BUFFER,
      BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
      BufferTarget::Uniform => gl::UNIFORM_BUFFER,
    }
  }

  /// Query enum giving the buffer currently bound to this target.
  pub(crate) fn binding_query(self) -> GLenum {
    match self {
      BufferTarget::Array => gl::ARRAY_BUFFER_BINDING,
      BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER_BINDING,
      BufferTarget::Uniform => gl::UNIFORM_BUFFER_BINDING,
    }
  }
}

impl fmt::Display for BufferTarget {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      BufferTarget::Array => f.write_str("GL_ARRAY_BUFFER"),
      BufferTarget::ElementArray => f.write_str("GL_ELEMENT_ARRAY_BUFFER"),
      BufferTarget::Uniform => f.write_str("GL_UNIFORM_BUFFER"),
    }
  }
}

/// Usage hint given to the driver when uploading data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BufferUsage {
  StaticDraw,
  StaticRead,
  StaticCopy,
  DynamicDraw,
  DynamicRead,
  DynamicCopy,
  StreamDraw,
  StreamRead,
  StreamCopy,
}

impl BufferUsage {
  pub(crate) fn to_glenum(self) -> GLenum {
    match self {
      BufferUsage::StaticDraw => gl::STATIC_DRAW,
      BufferUsage::StaticRead => gl::STATIC_READ,
      BufferUsage::StaticCopy => gl::STATIC_COPY,
      BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
      BufferUsage::DynamicRead => gl::DYNAMIC_READ,
      BufferUsage::DynamicCopy => gl::DYNAMIC_COPY,
      BufferUsage::StreamDraw => gl::STREAM_DRAW,
      BufferUsage::StreamRead => gl::STREAM_READ,
      BufferUsage::StreamCopy => gl::STREAM_COPY,
    }
  }
}

/// OpenGL buffer.
///
/// A buffer is created for a single [`BufferTarget`] and is always bound to that target.
#[derive(Debug)]
pub struct Buffer {
  handle: GLuint,
  target: BufferTarget,
  size_bytes: usize,
}

impl Buffer {
  /// Create a new, empty buffer.
  pub fn new(target: BufferTarget) -> Result<Self, GlError> {
    let mut handle: GLuint = 0;

    unsafe { gl::GenBuffers(1, &mut handle) };
    check_gl_errors()?;

    if handle == 0 {
      return Err(GlError::NullHandle("glGenBuffers"));
    }

    log::debug!("created {} buffer {}", target, handle);

    Ok(Buffer {
      handle,
      target,
      size_bytes: 0,
    })
  }

  /// Create a buffer and fill it in one go.
  pub fn from_slice<T>(target: BufferTarget, data: &[T], usage: BufferUsage) -> Result<Self, GlError>
  where
    T: Copy,
  {
    let mut buffer = Buffer::new(target)?;
    buffer.upload(data, usage)?;
    Ok(buffer)
  }

  /// Replace the whole content of the buffer.
  ///
  /// The buffer storage is reallocated to fit `data`.
  pub fn upload<T>(&mut self, data: &[T], usage: BufferUsage) -> Result<(), GlError>
  where
    T: Copy,
  {
    let bytes = mem::size_of::<T>() * data.len();

    {
      let _bind = ScopedBufferBind::new(self)?;

      unsafe {
        gl::BufferData(
          self.target.to_glenum(),
          bytes as GLsizeiptr,
          data.as_ptr() as *const _,
          usage.to_glenum(),
        );
      }
      check_gl_errors()?;
    }

    self.size_bytes = bytes;
    log::trace!("uploaded {} bytes to buffer {}", bytes, self.handle);

    Ok(())
  }

  /// Target this buffer is bound to.
  pub fn target(&self) -> BufferTarget {
    self.target
  }

  /// Size of the last upload, in bytes.
  pub fn size_bytes(&self) -> usize {
    self.size_bytes
  }

  /// Native handle.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for Buffer {
  fn drop(&mut self) {
    log::trace!("deleting buffer {}", self.handle);

    unsafe { gl::DeleteBuffers(1, &self.handle) };
    log_drop_error("glDeleteBuffers", check_gl_errors());
  }
}

/// Bind a buffer to its target until the guard is dropped.
///
/// The buffer bound to the same target before the guard was created is restored on drop.
#[derive(Debug)]
pub struct ScopedBufferBind<'a> {
  target: BufferTarget,
  previous: GLuint,
  _bound: PhantomData<&'a Buffer>,
}

impl<'a> ScopedBufferBind<'a> {
  /// Bind `buffer`.
  pub fn new(buffer: &'a Buffer) -> Result<Self, GlError> {
    let target = buffer.target;
    let previous = get_ctx_bound_buffer(target.binding_query())?;

    unsafe { gl::BindBuffer(target.to_glenum(), buffer.handle) };
    check_gl_errors()?;

    Ok(ScopedBufferBind {
      target,
      previous,
      _bound: PhantomData,
    })
  }
}

impl Drop for ScopedBufferBind<'_> {
  fn drop(&mut self) {
    unsafe { gl::BindBuffer(self.target.to_glenum(), self.previous) };
    log_drop_error("restoring buffer binding", check_gl_errors());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn target_and_binding_queries_match() {
    let pairs = [
      (BufferTarget::Array, gl::ARRAY_BUFFER, gl::ARRAY_BUFFER_BINDING),
      (
        BufferTarget::ElementArray,
        gl::ELEMENT_ARRAY_BUFFER,
        gl::ELEMENT_ARRAY_BUFFER_BINDING,
      ),
      (BufferTarget::Uniform, gl::UNIFORM_BUFFER, gl::UNIFORM_BUFFER_BINDING),
    ];

    for (target, glenum, query) in pairs.iter().copied() {
      assert_eq!(target.to_glenum(), glenum);
      assert_eq!(target.binding_query(), query);
    }
  }

  #[test]
  fn usage_hints() {
    assert_eq!(BufferUsage::StaticDraw.to_glenum(), gl::STATIC_DRAW);
    assert_eq!(BufferUsage::DynamicCopy.to_glenum(), gl::DYNAMIC_COPY);
    assert_eq!(BufferUsage::StreamRead.to_glenum(), gl::STREAM_READ);
  }

  #[test]
  fn target_display() {
    assert_eq!(BufferTarget::ElementArray.to_string(), "GL_ELEMENT_ARRAY_BUFFER");
  }
}
