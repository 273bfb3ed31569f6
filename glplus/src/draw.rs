//! Draw calls and a handful of global render state helpers.

use crate::error::{check_gl_errors, GlError};
use crate::program::{Program, ScopedProgramBind};
use crate::vertex_array::{ScopedVertexArrayBind, VertexArray, VertexArrayError};
use gl::types::*;
use std::ops::BitOr;

/// Primitive assembly mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Primitive {
  Points,
  Lines,
  LineStrip,
  LineLoop,
  Triangles,
  TriangleStrip,
  TriangleFan,
}

impl Primitive {
  pub(crate) fn to_glenum(self) -> GLenum {
    match self {
      Primitive::Points => gl::POINTS,
      Primitive::Lines => gl::LINES,
      Primitive::LineStrip => gl::LINE_STRIP,
      Primitive::LineLoop => gl::LINE_LOOP,
      Primitive::Triangles => gl::TRIANGLES,
      Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
      Primitive::TriangleFan => gl::TRIANGLE_FAN,
    }
  }
}

/// Draw `count` vertices starting at `first`.
///
/// `program` and `vertex_array` are bound for the duration of the call only.
pub fn draw_arrays(
  program: &Program,
  vertex_array: &VertexArray,
  mode: Primitive,
  first: GLint,
  count: GLsizei,
) -> Result<(), GlError> {
  let _program_bind = ScopedProgramBind::new(program)?;
  let _vao_bind = ScopedVertexArrayBind::new(vertex_array)?;

  unsafe { gl::DrawArrays(mode.to_glenum(), first, count) };
  check_gl_errors()
}

/// Draw `count` indexed vertices starting at index `first`.
///
/// The index type is the one of the vertex array’s index buffer.
pub fn draw_elements(
  program: &Program,
  vertex_array: &VertexArray,
  mode: Primitive,
  first: usize,
  count: GLsizei,
) -> Result<(), VertexArrayError> {
  let index_type = vertex_array.index_type()?;
  let offset = index_offset(index_type.size(), first);

  let _program_bind = ScopedProgramBind::new(program)?;
  let _vao_bind = ScopedVertexArrayBind::new(vertex_array)?;

  unsafe {
    gl::DrawElements(
      mode.to_glenum(),
      count,
      index_type.to_glenum(),
      offset as *const _,
    )
  };
  check_gl_errors()?;

  Ok(())
}

/// Byte offset of index `first` in an index buffer.
fn index_offset(index_size: usize, first: usize) -> usize {
  index_size * first
}

/// Buffers to clear.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ClearMask(GLbitfield);

impl ClearMask {
  pub const COLOR: ClearMask = ClearMask(gl::COLOR_BUFFER_BIT);
  pub const DEPTH: ClearMask = ClearMask(gl::DEPTH_BUFFER_BIT);
  pub const STENCIL: ClearMask = ClearMask(gl::STENCIL_BUFFER_BIT);
}

impl BitOr for ClearMask {
  type Output = ClearMask;

  fn bitor(self, rhs: ClearMask) -> ClearMask {
    ClearMask(self.0 | rhs.0)
  }
}

/// Clear the buffers of the currently bound framebuffer.
pub fn clear(mask: ClearMask) -> Result<(), GlError> {
  unsafe { gl::Clear(mask.0) };
  check_gl_errors()
}

/// Set the color used by [`clear`].
pub fn set_clear_color(rgba: [f32; 4]) -> Result<(), GlError> {
  unsafe { gl::ClearColor(rgba[0], rgba[1], rgba[2], rgba[3]) };
  check_gl_errors()
}

/// Set the viewport, in pixels.
pub fn set_viewport(x: i32, y: i32, width: u32, height: u32) -> Result<(), GlError> {
  unsafe { gl::Viewport(x, y, width as GLsizei, height as GLsizei) };
  check_gl_errors()
}

/// Enable or disable depth testing (`GL_LESS`).
pub fn set_depth_test(enabled: bool) -> Result<(), GlError> {
  unsafe {
    if enabled {
      gl::Enable(gl::DEPTH_TEST);
      gl::DepthFunc(gl::LESS);
    } else {
      gl::Disable(gl::DEPTH_TEST);
    }
  }
  check_gl_errors()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn primitive_enums() {
    assert_eq!(Primitive::Triangles.to_glenum(), gl::TRIANGLES);
    assert_eq!(Primitive::TriangleFan.to_glenum(), gl::TRIANGLE_FAN);
    assert_eq!(Primitive::LineLoop.to_glenum(), gl::LINE_LOOP);
  }

  #[test]
  fn element_offsets_are_in_bytes() {
    assert_eq!(index_offset(4, 0), 0);
    assert_eq!(index_offset(4, 6), 24);
    assert_eq!(index_offset(2, 3), 6);
  }

  #[test]
  fn clear_masks_combine() {
    let mask = ClearMask::COLOR | ClearMask::DEPTH;
    assert_eq!(mask.0, gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
  }
}
