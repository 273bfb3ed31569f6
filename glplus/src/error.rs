//! OpenGL driver errors.

use gl::types::*;
use std::{error, fmt};

/// An error reported by the OpenGL driver.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GlError {
  /// `GL_INVALID_ENUM`.
  InvalidEnum,
  /// `GL_INVALID_VALUE`.
  InvalidValue,
  /// `GL_INVALID_OPERATION`.
  InvalidOperation,
  /// `GL_STACK_OVERFLOW`.
  StackOverflow,
  /// `GL_STACK_UNDERFLOW`.
  StackUnderflow,
  /// `GL_OUT_OF_MEMORY`.
  OutOfMemory,
  /// `GL_INVALID_FRAMEBUFFER_OPERATION`.
  InvalidFramebufferOperation,
  /// An error code this crate doesn’t know about.
  Unknown(GLenum),
  /// An object creation function returned the null handle.
  ///
  /// The payload is the name of the OpenGL function that failed.
  NullHandle(&'static str),
}

impl GlError {
  /// Map an OpenGL error code to a [`GlError`].
  ///
  /// Returns [`None`] for `GL_NO_ERROR`.
  pub fn from_code(code: GLenum) -> Option<Self> {
    match code {
      gl::NO_ERROR => None,
      gl::INVALID_ENUM => Some(GlError::InvalidEnum),
      gl::INVALID_VALUE => Some(GlError::InvalidValue),
      gl::INVALID_OPERATION => Some(GlError::InvalidOperation),
      gl::STACK_OVERFLOW => Some(GlError::StackOverflow),
      gl::STACK_UNDERFLOW => Some(GlError::StackUnderflow),
      gl::OUT_OF_MEMORY => Some(GlError::OutOfMemory),
      gl::INVALID_FRAMEBUFFER_OPERATION => Some(GlError::InvalidFramebufferOperation),
      _ => Some(GlError::Unknown(code)),
    }
  }
}

impl fmt::Display for GlError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlError::InvalidEnum => f.write_str("GL_INVALID_ENUM"),
      GlError::InvalidValue => f.write_str("GL_INVALID_VALUE"),
      GlError::InvalidOperation => f.write_str("GL_INVALID_OPERATION"),
      GlError::StackOverflow => f.write_str("GL_STACK_OVERFLOW"),
      GlError::StackUnderflow => f.write_str("GL_STACK_UNDERFLOW"),
      GlError::OutOfMemory => f.write_str("GL_OUT_OF_MEMORY"),
      GlError::InvalidFramebufferOperation => f.write_str("GL_INVALID_FRAMEBUFFER_OPERATION"),
      GlError::Unknown(code) => write!(f, "Unknown GL error (0x{:04X})", code),
      GlError::NullHandle(func) => write!(f, "{} returned a null handle", func),
    }
  }
}

impl error::Error for GlError {}

/// Check the driver error queue.
///
/// The first pending error is returned; every other pending error is drained so that the next
/// check starts from a clean queue.
pub fn check_gl_errors() -> Result<(), GlError> {
  let first = unsafe { gl::GetError() };

  loop {
    let next = unsafe { gl::GetError() };

    if next == gl::NO_ERROR {
      break;
    }

    log::trace!("discarding queued GL error 0x{:04X}", next);
  }

  match GlError::from_code(first) {
    Some(err) => Err(err),
    None => Ok(()),
  }
}

/// Log an error that cannot be propagated, typically from a [`Drop`] implementation.
pub(crate) fn log_drop_error(what: &str, result: Result<(), GlError>) {
  if let Err(err) = result {
    log::error!("{}: {}", what, err);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_error_is_not_an_error() {
    assert_eq!(GlError::from_code(gl::NO_ERROR), None);
  }

  #[test]
  fn known_codes() {
    assert_eq!(
      GlError::from_code(gl::INVALID_ENUM),
      Some(GlError::InvalidEnum)
    );
    assert_eq!(
      GlError::from_code(gl::INVALID_OPERATION),
      Some(GlError::InvalidOperation)
    );
    assert_eq!(
      GlError::from_code(gl::OUT_OF_MEMORY),
      Some(GlError::OutOfMemory)
    );
  }

  #[test]
  fn unknown_code_is_kept() {
    assert_eq!(GlError::from_code(0x1234), Some(GlError::Unknown(0x1234)));
    assert_eq!(
      GlError::Unknown(0x1234).to_string(),
      "Unknown GL error (0x1234)"
    );
  }

  #[test]
  fn display_uses_enumerant_names() {
    assert_eq!(GlError::InvalidValue.to_string(), "GL_INVALID_VALUE");
    assert_eq!(GlError::StackUnderflow.to_string(), "GL_STACK_UNDERFLOW");
    assert_eq!(
      GlError::NullHandle("glGenBuffers").to_string(),
      "glGenBuffers returned a null handle"
    );
  }
}
