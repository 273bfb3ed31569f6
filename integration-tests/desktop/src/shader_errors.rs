use crate::{hidden_window, FixtureResult};
use glplus::{Program, ProgramError, Shader, ShaderError, ShaderType};
use std::rc::Rc;

const VS: &str = "#version 330 core
in vec3 position;
uniform mat4 mvp;
void main() {
  gl_Position = mvp * vec4(position, 1.);
}";

const FS: &str = "#version 330 core
out vec4 frag;
void main() {
  frag = vec4(1.);
}";

const BROKEN_FS: &str = "#version 330 core
out vec4 frag;
void main() {
  frag = not_a_variable;
}";

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("shader-errors")?;

  match Shader::from_source(ShaderType::Fragment, BROKEN_FS) {
    Err(ShaderError::CompileFailed(log)) => {
      ensure!(!log.is_empty(), "empty compile log");
      log::info!("expected compile error: {}", log);
    }
    Err(e) => return Err(format!("unexpected error: {}", e).into()),
    Ok(_) => return Err("broken shader compiled".into()),
  }

  match Shader::from_source(ShaderType::Vertex, "void main() {}\0") {
    Err(ShaderError::InvalidSource(_)) => (),
    _ => return Err("interior nul accepted".into()),
  }

  // linking with a single stage fails on a core context
  let mut program = Program::new()?;
  program.attach(Rc::new(Shader::from_source(ShaderType::Vertex, VS)?))?;
  match program.link() {
    Err(ProgramError::LinkFailed(_)) => (),
    Err(e) => return Err(format!("unexpected link error: {}", e).into()),
    Ok(()) => log::warn!("driver links programs without a fragment stage"),
  }

  // attaching a second vertex shader replaces the first one
  program.attach(Rc::new(Shader::from_source(ShaderType::Vertex, VS)?))?;
  program.attach(Rc::new(Shader::from_source(ShaderType::Fragment, FS)?))?;
  program.link()?;

  ensure!(
    program.try_uniform_location("mvp")?.is_some(),
    "mvp should be active"
  );
  ensure!(
    program.try_uniform_location("unused")?.is_none(),
    "unknown uniform found"
  );
  ensure!(
    matches!(
      program.upload("unused", 1.0f32),
      Err(ProgramError::InactiveUniform(_))
    ),
    "upload to unknown uniform succeeded"
  );
  ensure!(
    matches!(
      program.attribute_location("normal"),
      Err(ProgramError::InactiveAttribute(_))
    ),
    "unknown attribute found"
  );

  program.upload::<[[f32; 4]; 4]>("mvp", [
    [1., 0., 0., 0.],
    [0., 1., 0., 0.],
    [0., 0., 1., 0.],
    [0., 0., 0., 1.],
  ])?;

  Ok(())
}
