//! Objects referenced by a vertex array, a program or a framebuffer stay alive as long as the
//! referencing object does, even once every other owner is gone.

use crate::{hidden_window, FixtureResult};
use glplus::gl;
use glplus::{
  Attachment, Buffer, BufferTarget, BufferUsage, FrameBuffer, InternalFormat, Program, Shader,
  ShaderType, Texture2D, VertexArray, VertexAttribute,
};
use std::rc::Rc;

const VS: &str = "#version 330 core
in vec2 position;
void main() {
  gl_Position = vec4(position, 0., 1.);
}";

const FS: &str = "#version 330 core
out vec4 frag;
void main() {
  frag = vec4(1.);
}";

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("shared-resources-outlive-owner")?;

  // vertex array → buffer
  let buffer = Rc::new(Buffer::from_slice(
    BufferTarget::Array,
    &[0f32; 6],
    BufferUsage::StaticDraw,
  )?);
  let buffer_handle = buffer.handle();

  let mut vertex_array = VertexArray::new()?;
  vertex_array.set_attribute(VertexAttribute::floats(0, 2), &buffer)?;
  drop(buffer);
  ensure!(
    unsafe { gl::IsBuffer(buffer_handle) } == gl::TRUE,
    "buffer deleted while in use by a vertex array"
  );

  drop(vertex_array);
  ensure!(
    unsafe { gl::IsBuffer(buffer_handle) } == gl::FALSE,
    "buffer leaked"
  );

  // program → shaders
  let vs = Rc::new(Shader::from_source(ShaderType::Vertex, VS)?);
  let fs = Rc::new(Shader::from_source(ShaderType::Fragment, FS)?);
  let vs_handle = vs.handle();

  let mut program = Program::new()?;
  program.attach(vs)?;
  program.attach(fs)?;
  program.link()?;
  ensure!(
    unsafe { gl::IsShader(vs_handle) } == gl::TRUE,
    "shader deleted while attached"
  );

  // framebuffer → texture, then a new framebuffer right after dropping the first one
  let mut color = Texture2D::new()?;
  color.create_storage(1, InternalFormat::Rgba8, 16, 16)?;
  let color = Rc::new(color);
  let texture_handle = color.handle();

  let mut framebuffer = FrameBuffer::new()?;
  framebuffer.attach_texture(Attachment::Color(0), &color)?;
  drop(color);
  ensure!(
    unsafe { gl::IsTexture(texture_handle) } == gl::TRUE,
    "texture deleted while attached"
  );

  drop(framebuffer);
  ensure!(
    unsafe { gl::IsTexture(texture_handle) } == gl::FALSE,
    "texture leaked"
  );

  let mut color = Texture2D::new()?;
  color.create_storage(1, InternalFormat::Rgba8, 16, 16)?;
  let mut framebuffer = FrameBuffer::new()?;
  framebuffer.attach_texture(Attachment::Color(0), &Rc::new(color))?;
  framebuffer.validate_status()?;

  Ok(())
}
