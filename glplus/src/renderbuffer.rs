//! Render buffers.

use crate::error::{check_gl_errors, log_drop_error, GlError};
use crate::state::get_ctx_bound_renderbuffer;
use crate::texture::InternalFormat;
use gl::types::*;
use std::marker::PhantomData;

/// Render buffer, typically used as a depth or stencil framebuffer attachment.
#[derive(Debug)]
pub struct RenderBuffer {
  handle: GLuint,
  size: Option<[u32; 2]>,
}

impl RenderBuffer {
  /// Create a new render buffer with no storage.
  pub fn new() -> Result<Self, GlError> {
    let mut handle: GLuint = 0;

    unsafe { gl::GenRenderbuffers(1, &mut handle) };
    check_gl_errors()?;

    if handle == 0 {
      return Err(GlError::NullHandle("glGenRenderbuffers"));
    }

    log::debug!("created render buffer {}", handle);

    Ok(RenderBuffer { handle, size: None })
  }

  /// Allocate the storage of the render buffer.
  pub fn create_storage(
    &mut self,
    format: InternalFormat,
    width: u32,
    height: u32,
  ) -> Result<(), GlError> {
    {
      let _bind = ScopedRenderBufferBind::new(self)?;

      unsafe {
        gl::RenderbufferStorage(
          gl::RENDERBUFFER,
          format.internal_glenum(),
          width as GLsizei,
          height as GLsizei,
        );
      }
      check_gl_errors()?;
    }

    self.size = Some([width, height]);

    Ok(())
  }

  /// Size of the storage, if allocated.
  pub fn size(&self) -> Option<[u32; 2]> {
    self.size
  }

  /// Native handle.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for RenderBuffer {
  fn drop(&mut self) {
    log::trace!("deleting render buffer {}", self.handle);

    unsafe { gl::DeleteRenderbuffers(1, &self.handle) };
    log_drop_error("glDeleteRenderbuffers", check_gl_errors());
  }
}

/// Bind a render buffer until the guard is dropped.
#[derive(Debug)]
pub struct ScopedRenderBufferBind<'a> {
  previous: GLuint,
  _bound: PhantomData<&'a RenderBuffer>,
}

impl<'a> ScopedRenderBufferBind<'a> {
  /// Bind `render_buffer`.
  pub fn new(render_buffer: &'a RenderBuffer) -> Result<Self, GlError> {
    let previous = get_ctx_bound_renderbuffer()?;

    unsafe { gl::BindRenderbuffer(gl::RENDERBUFFER, render_buffer.handle) };
    check_gl_errors()?;

    Ok(ScopedRenderBufferBind {
      previous,
      _bound: PhantomData,
    })
  }
}

impl Drop for ScopedRenderBufferBind<'_> {
  fn drop(&mut self) {
    unsafe { gl::BindRenderbuffer(gl::RENDERBUFFER, self.previous) };
    log_drop_error("restoring render buffer binding", check_gl_errors());
  }
}
