//! Shader programs and uniform uploads.

use crate::error::{check_gl_errors, log_drop_error, GlError};
use crate::shader::{info_log_to_string, Shader, ShaderError, ShaderType};
use crate::state::get_ctx_current_program;
use gl::types::*;
use std::ffi::{CString, NulError};
use std::marker::PhantomData;
use std::ptr::null_mut;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{error, fmt};

/// Errors that can occur while working with a [`Program`].
#[non_exhaustive]
#[derive(Debug)]
pub enum ProgramError {
  /// The driver reported an error.
  Gl(GlError),
  /// A shader stage failed to build.
  Shader(ShaderError),
  /// Linking failed; the payload is the linker info log.
  LinkFailed(String),
  /// The attribute doesn’t exist or is not used by the program.
  InactiveAttribute(String),
  /// The uniform doesn’t exist or is not used by the program.
  InactiveUniform(String),
  /// An attribute or uniform name contains an interior nul byte.
  InvalidName(NulError),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::Gl(ref e) => write!(f, "program error: {}", e),
      ProgramError::Shader(ref e) => write!(f, "{}", e),
      ProgramError::LinkFailed(ref log) => write!(f, "program link failed: {}", log),
      ProgramError::InactiveAttribute(ref name) => write!(f, "couldn't find attribute {}", name),
      ProgramError::InactiveUniform(ref name) => write!(f, "couldn't find uniform {}", name),
      ProgramError::InvalidName(ref e) => write!(f, "invalid name: {}", e),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::Gl(e) => Some(e),
      ProgramError::Shader(e) => Some(e),
      ProgramError::InvalidName(e) => Some(e),
      _ => None,
    }
  }
}

impl From<GlError> for ProgramError {
  fn from(e: GlError) -> Self {
    ProgramError::Gl(e)
  }
}

impl From<ShaderError> for ProgramError {
  fn from(e: ShaderError) -> Self {
    ProgramError::Shader(e)
  }
}

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// A linkable shader program.
///
/// Attached shaders are kept alive by the program, one per [`ShaderType`].
#[derive(Debug)]
pub struct Program {
  handle: GLuint,
  id: u64,
  vertex_shader: Option<Rc<Shader>>,
  fragment_shader: Option<Rc<Shader>>,
}

impl Program {
  /// Create a new program with no shader attached.
  pub fn new() -> Result<Self, ProgramError> {
    let handle = unsafe { gl::CreateProgram() };
    check_gl_errors()?;

    if handle == 0 {
      return Err(GlError::NullHandle("glCreateProgram").into());
    }

    log::debug!("created program {}", handle);

    Ok(Program {
      handle,
      id: NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed),
      vertex_shader: None,
      fragment_shader: None,
    })
  }

  /// Attach a shader.
  ///
  /// A shader of the same type attached earlier is detached and released.
  pub fn attach(&mut self, shader: Rc<Shader>) -> Result<(), ProgramError> {
    let slot = match shader.shader_type() {
      ShaderType::Vertex => &mut self.vertex_shader,
      ShaderType::Fragment => &mut self.fragment_shader,
    };

    if let Some(previous) = slot.take() {
      unsafe { gl::DetachShader(self.handle, previous.handle()) };
      check_gl_errors()?;
    }

    unsafe { gl::AttachShader(self.handle, shader.handle()) };
    check_gl_errors()?;

    *slot = Some(shader);

    Ok(())
  }

  /// Link the attached shaders.
  ///
  /// On failure, the linker info log is returned in [`ProgramError::LinkFailed`].
  pub fn link(&mut self) -> Result<(), ProgramError> {
    unsafe {
      gl::LinkProgram(self.handle);
      check_gl_errors()?;

      let mut linked: GLint = gl::FALSE as GLint;
      gl::GetProgramiv(self.handle, gl::LINK_STATUS, &mut linked);
      check_gl_errors()?;

      if linked == (gl::TRUE as GLint) {
        log::debug!("linked program {}", self.handle);
        return Ok(());
      }

      let mut log_len: GLint = 0;
      gl::GetProgramiv(self.handle, gl::INFO_LOG_LENGTH, &mut log_len);
      check_gl_errors()?;

      let mut log: Vec<u8> = vec![0; log_len.max(1) as usize];
      gl::GetProgramInfoLog(
        self.handle,
        log.len() as GLsizei,
        null_mut(),
        log.as_mut_ptr() as *mut GLchar,
      );
      check_gl_errors()?;

      Err(ProgramError::LinkFailed(info_log_to_string(log)))
    }
  }

  /// Build a linked program from a vertex and a fragment shader source.
  pub fn from_sources(vertex: &str, fragment: &str) -> Result<Self, ProgramError> {
    let vs = Shader::from_source(ShaderType::Vertex, vertex)?;
    let fs = Shader::from_source(ShaderType::Fragment, fragment)?;

    let mut program = Program::new()?;
    program.attach(Rc::new(vs))?;
    program.attach(Rc::new(fs))?;
    program.link()?;

    Ok(program)
  }

  /// Location of an attribute, if the program uses it.
  pub fn try_attribute_location(&self, name: &str) -> Result<Option<GLuint>, ProgramError> {
    let c_name = CString::new(name).map_err(ProgramError::InvalidName)?;
    let location = unsafe { gl::GetAttribLocation(self.handle, c_name.as_ptr()) };
    check_gl_errors()?;

    if location < 0 {
      Ok(None)
    } else {
      Ok(Some(location as GLuint))
    }
  }

  /// Location of an attribute the program must use.
  pub fn attribute_location(&self, name: &str) -> Result<GLuint, ProgramError> {
    self
      .try_attribute_location(name)?
      .ok_or_else(|| ProgramError::InactiveAttribute(name.to_owned()))
  }

  /// Location of a uniform, if the program uses it.
  pub fn try_uniform_location(&self, name: &str) -> Result<Option<GLint>, ProgramError> {
    let c_name = CString::new(name).map_err(ProgramError::InvalidName)?;
    let location = unsafe { gl::GetUniformLocation(self.handle, c_name.as_ptr()) };
    check_gl_errors()?;

    if location < 0 {
      Ok(None)
    } else {
      Ok(Some(location))
    }
  }

  /// Location of a uniform the program must use.
  pub fn uniform_location(&self, name: &str) -> Result<GLint, ProgramError> {
    self
      .try_uniform_location(name)?
      .ok_or_else(|| ProgramError::InactiveUniform(name.to_owned()))
  }

  /// Upload a value to a named uniform.
  pub fn upload<U>(&self, name: &str, value: U) -> Result<(), ProgramError>
  where
    U: Uniformable,
  {
    let location = self.uniform_location(name)?;
    self.upload_at(location, value)
  }

  /// Upload a value to a uniform location.
  ///
  /// The program is bound for the duration of the upload only.
  pub fn upload_at<U>(&self, location: GLint, value: U) -> Result<(), ProgramError>
  where
    U: Uniformable,
  {
    let _bind = ScopedProgramBind::new(self)?;

    value.update(location);
    check_gl_errors()?;

    Ok(())
  }

  /// Native handle.
  pub fn handle(&self) -> GLuint {
    self.handle
  }

  /// Identifier of this program, unique for the whole process.
  ///
  /// Drivers may hand the handle of a deleted program to the next one created; this identifier
  /// is never reused.
  pub fn id(&self) -> u64 {
    self.id
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    log::trace!("deleting program {}", self.handle);

    unsafe { gl::DeleteProgram(self.handle) };
    log_drop_error("glDeleteProgram", check_gl_errors());
  }
}

/// Types that can be uploaded to a uniform.
///
/// Matrices are column major.
pub trait Uniformable {
  /// Issue the `glUniform*` call for the currently used program.
  fn update(self, location: GLint);
}

impl Uniformable for i32 {
  fn update(self, location: GLint) {
    unsafe { gl::Uniform1i(location, self) }
  }
}

impl Uniformable for u32 {
  fn update(self, location: GLint) {
    unsafe { gl::Uniform1ui(location, self) }
  }
}

impl Uniformable for f32 {
  fn update(self, location: GLint) {
    unsafe { gl::Uniform1f(location, self) }
  }
}

impl Uniformable for [f32; 2] {
  fn update(self, location: GLint) {
    unsafe { gl::Uniform2fv(location, 1, self.as_ptr()) }
  }
}

impl Uniformable for [f32; 3] {
  fn update(self, location: GLint) {
    unsafe { gl::Uniform3fv(location, 1, self.as_ptr()) }
  }
}

impl Uniformable for [f32; 4] {
  fn update(self, location: GLint) {
    unsafe { gl::Uniform4fv(location, 1, self.as_ptr()) }
  }
}

impl Uniformable for [[f32; 4]; 4] {
  fn update(self, location: GLint) {
    unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, self.as_ptr() as *const f32) }
  }
}

/// Use a program until the guard is dropped.
///
/// The program in use before the guard was created is restored on drop.
#[derive(Debug)]
pub struct ScopedProgramBind<'a> {
  previous: GLuint,
  _bound: PhantomData<&'a Program>,
}

impl<'a> ScopedProgramBind<'a> {
  /// Use `program`.
  pub fn new(program: &'a Program) -> Result<Self, GlError> {
    let previous = get_ctx_current_program()?;

    unsafe { gl::UseProgram(program.handle) };
    check_gl_errors()?;

    Ok(ScopedProgramBind {
      previous,
      _bound: PhantomData,
    })
  }
}

impl Drop for ScopedProgramBind<'_> {
  fn drop(&mut self) {
    unsafe { gl::UseProgram(self.previous) };
    log_drop_error("restoring program", check_gl_errors());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn inactive_names_in_messages() {
    assert_eq!(
      ProgramError::InactiveAttribute("texcoord0".to_owned()).to_string(),
      "couldn't find attribute texcoord0"
    );
    assert_eq!(
      ProgramError::InactiveUniform("mvp".to_owned()).to_string(),
      "couldn't find uniform mvp"
    );
  }

  #[test]
  fn gl_errors_convert() {
    let err: ProgramError = GlError::InvalidOperation.into();
    assert!(matches!(err, ProgramError::Gl(GlError::InvalidOperation)));
  }
}
