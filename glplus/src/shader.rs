//! Shader stages.

use crate::error::{check_gl_errors, log_drop_error, GlError};
use gl::types::*;
use std::ffi::{CString, NulError};
use std::ptr::{null, null_mut};
use std::{error, fmt};

/// Type of a shader stage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ShaderType {
  /// Vertex shader.
  Vertex,
  /// Fragment shader.
  Fragment,
}

impl ShaderType {
  pub(crate) fn to_glenum(self) -> GLenum {
    match self {
      ShaderType::Vertex => gl::VERTEX_SHADER,
      ShaderType::Fragment => gl::FRAGMENT_SHADER,
    }
  }
}

impl fmt::Display for ShaderType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ShaderType::Vertex => f.write_str("vertex shader"),
      ShaderType::Fragment => f.write_str("fragment shader"),
    }
  }
}

/// Errors that can occur while creating or compiling a shader.
#[non_exhaustive]
#[derive(Debug)]
pub enum ShaderError {
  /// The driver reported an error.
  Gl(GlError),
  /// The source contains an interior nul byte.
  InvalidSource(NulError),
  /// Compilation failed; the payload is the compiler info log.
  CompileFailed(String),
}

impl fmt::Display for ShaderError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ShaderError::Gl(ref e) => write!(f, "shader error: {}", e),
      ShaderError::InvalidSource(ref e) => write!(f, "invalid shader source: {}", e),
      ShaderError::CompileFailed(ref log) => write!(f, "shader compilation failed: {}", log),
    }
  }
}

impl error::Error for ShaderError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ShaderError::Gl(e) => Some(e),
      ShaderError::InvalidSource(e) => Some(e),
      ShaderError::CompileFailed(_) => None,
    }
  }
}

impl From<GlError> for ShaderError {
  fn from(e: GlError) -> Self {
    ShaderError::Gl(e)
  }
}

/// A shader stage.
#[derive(Debug)]
pub struct Shader {
  handle: GLuint,
  ty: ShaderType,
}

impl Shader {
  /// Create a new, empty shader of the given type.
  pub fn new(ty: ShaderType) -> Result<Self, ShaderError> {
    let handle = unsafe { gl::CreateShader(ty.to_glenum()) };
    check_gl_errors()?;

    if handle == 0 {
      return Err(GlError::NullHandle("glCreateShader").into());
    }

    log::debug!("created {} {}", ty, handle);

    Ok(Shader { handle, ty })
  }

  /// Create and compile a shader in one go.
  pub fn from_source(ty: ShaderType, source: &str) -> Result<Self, ShaderError> {
    let mut shader = Shader::new(ty)?;
    shader.compile(source)?;
    Ok(shader)
  }

  /// Upload the source of the shader and compile it.
  ///
  /// On failure, the compiler info log is returned in [`ShaderError::CompileFailed`].
  pub fn compile(&mut self, source: &str) -> Result<(), ShaderError> {
    let source = CString::new(source).map_err(ShaderError::InvalidSource)?;

    unsafe {
      gl::ShaderSource(self.handle, 1, [source.as_ptr()].as_ptr(), null());
      check_gl_errors()?;

      gl::CompileShader(self.handle);
      check_gl_errors()?;

      let mut compiled: GLint = gl::FALSE as GLint;
      gl::GetShaderiv(self.handle, gl::COMPILE_STATUS, &mut compiled);
      check_gl_errors()?;

      if compiled == (gl::TRUE as GLint) {
        log::debug!("compiled {} {}", self.ty, self.handle);
        return Ok(());
      }

      let mut log_len: GLint = 0;
      gl::GetShaderiv(self.handle, gl::INFO_LOG_LENGTH, &mut log_len);
      check_gl_errors()?;

      let mut log: Vec<u8> = vec![0; log_len.max(1) as usize];
      gl::GetShaderInfoLog(
        self.handle,
        log.len() as GLsizei,
        null_mut(),
        log.as_mut_ptr() as *mut GLchar,
      );
      check_gl_errors()?;

      Err(ShaderError::CompileFailed(info_log_to_string(log)))
    }
  }

  /// Type of this shader.
  pub fn shader_type(&self) -> ShaderType {
    self.ty
  }

  /// Native handle.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for Shader {
  fn drop(&mut self) {
    log::trace!("deleting {} {}", self.ty, self.handle);

    unsafe { gl::DeleteShader(self.handle) };
    log_drop_error("glDeleteShader", check_gl_errors());
  }
}

/// Turn a nul-terminated info log into a string.
pub(crate) fn info_log_to_string(mut log: Vec<u8>) -> String {
  if let Some(nul) = log.iter().position(|&b| b == 0) {
    log.truncate(nul);
  }

  String::from_utf8_lossy(&log).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shader_type_enums() {
    assert_eq!(ShaderType::Vertex.to_glenum(), gl::VERTEX_SHADER);
    assert_eq!(ShaderType::Fragment.to_glenum(), gl::FRAGMENT_SHADER);
  }

  #[test]
  fn info_log_stops_at_nul() {
    let log = b"0:1(1): error: syntax error\n\0garbage".to_vec();
    assert_eq!(info_log_to_string(log), "0:1(1): error: syntax error");
  }

  #[test]
  fn empty_info_log() {
    assert_eq!(info_log_to_string(vec![0]), "");
  }

  #[test]
  fn compile_error_displays_log() {
    let err = ShaderError::CompileFailed("bad token".to_owned());
    assert_eq!(err.to_string(), "shader compilation failed: bad token");
  }
}
