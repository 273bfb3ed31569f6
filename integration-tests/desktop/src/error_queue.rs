//! The first pending driver error is reported and the rest of the queue is thrown away.

use crate::{hidden_window, FixtureResult};
use glplus::gl;
use glplus::{check_gl_errors, GlError};

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("error-queue-drained")?;

  check_gl_errors()?;

  unsafe {
    gl::Enable(0xFFFF);
    gl::BindBuffer(0xFFFF, 0);
    gl::Viewport(0, 0, -1, -1);
  }

  let first = check_gl_errors();
  ensure!(
    first == Err(GlError::InvalidEnum),
    "expected GL_INVALID_ENUM first, got {:?}",
    first
  );

  let next = check_gl_errors();
  ensure!(next == Ok(()), "queue not drained, got {:?}", next);

  Ok(())
}
