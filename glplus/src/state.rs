//! Binding state queries.
//!
//! Scoped guards read the current binding out of the context before rebinding, so that they can
//! put it back when dropped. Nothing is cached on our side.

use crate::error::{check_gl_errors, GlError};
use gl::types::*;

unsafe fn get_ctx_integer(pname: GLenum) -> Result<GLint, GlError> {
  let mut data: GLint = 0;
  gl::GetIntegerv(pname, &mut data);
  check_gl_errors()?;
  Ok(data)
}

unsafe fn get_ctx_handle(pname: GLenum) -> Result<GLuint, GlError> {
  get_ctx_integer(pname).map(|handle| handle as GLuint)
}

pub(crate) fn get_ctx_current_program() -> Result<GLuint, GlError> {
  unsafe { get_ctx_handle(gl::CURRENT_PROGRAM) }
}

/// Query the buffer bound to a target through its `*_BINDING` query enum.
pub(crate) fn get_ctx_bound_buffer(binding_query: GLenum) -> Result<GLuint, GlError> {
  unsafe { get_ctx_handle(binding_query) }
}

pub(crate) fn get_ctx_bound_vertex_array() -> Result<GLuint, GlError> {
  unsafe { get_ctx_handle(gl::VERTEX_ARRAY_BINDING) }
}

/// Currently active texture unit, as a `GL_TEXTUREi` enum.
pub(crate) fn get_ctx_active_texture() -> Result<GLenum, GlError> {
  unsafe { get_ctx_handle(gl::ACTIVE_TEXTURE) }
}

pub(crate) fn get_ctx_bound_texture_2d() -> Result<GLuint, GlError> {
  unsafe { get_ctx_handle(gl::TEXTURE_BINDING_2D) }
}

pub(crate) fn get_ctx_bound_renderbuffer() -> Result<GLuint, GlError> {
  unsafe { get_ctx_handle(gl::RENDERBUFFER_BINDING) }
}

pub(crate) fn get_ctx_bound_framebuffer() -> Result<GLuint, GlError> {
  unsafe { get_ctx_handle(gl::FRAMEBUFFER_BINDING) }
}
