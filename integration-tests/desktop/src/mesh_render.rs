//! Render an OBJ quad covering the whole viewport into an offscreen framebuffer and read it back.

use crate::{hidden_window, FixtureResult};
use glplus::gl;
use glplus::gl::types::*;
use glplus::{
  clear, set_clear_color, set_viewport, Attachment, ClearMask, FrameBuffer, InternalFormat,
  Program, ScopedFrameBufferBind, Texture2D,
};
use glplus_mesh::{load_obj_str, StaticMesh};
use std::rc::Rc;

const QUAD: &str = "
o quad
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

// no normal attribute: the mesh must skip it
const VS: &str = "#version 330 core
in vec3 position;
in vec2 texcoord0;
out vec2 v_uv;
void main() {
  v_uv = texcoord0;
  gl_Position = vec4(position, 1.);
}";

const FS: &str = "#version 330 core
in vec2 v_uv;
out vec4 frag;
uniform sampler2D diffuse_texture;
void main() {
  frag = texture(diffuse_texture, v_uv);
}";

// same inputs at explicit, swapped locations
const VS_POSITION_FIRST: &str = "#version 330 core
layout (location = 0) in vec3 position;
layout (location = 1) in vec2 texcoord0;
out vec2 v_uv;
void main() {
  v_uv = texcoord0;
  gl_Position = vec4(position, 1.);
}";

const VS_TEXCOORD_FIRST: &str = "#version 330 core
layout (location = 1) in vec3 position;
layout (location = 0) in vec2 texcoord0;
out vec2 v_uv;
void main() {
  v_uv = texcoord0;
  gl_Position = vec4(position, 1.);
}";

const SIZE: u32 = 8;

fn read_pixel(x: u32, y: u32) -> [u8; 4] {
  let mut rgba = [0u8; 4];

  unsafe {
    gl::ReadPixels(
      x as GLint,
      y as GLint,
      1,
      1,
      gl::RGBA,
      gl::UNSIGNED_BYTE,
      rgba.as_mut_ptr() as *mut _,
    );
  }

  rgba
}

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("mesh-render")?;

  let program = Program::from_sources(VS, FS)?;

  let data = load_obj_str(QUAD, ".")?;
  ensure!(data.len() == 1, "expected a single shape, got {}", data.len());

  let mut mesh = StaticMesh::new();
  ensure!(
    mesh.render(&program).is_err(),
    "rendering an empty mesh succeeded"
  );

  mesh.upload(&data[0])?;

  let mut green = Texture2D::new()?;
  green.upload_rgba8(1, 1, &[0, 255, 0, 255])?;
  mesh.set_diffuse_texture(Rc::new(green));

  let mut color = Texture2D::new()?;
  color.create_storage(1, InternalFormat::Rgba8, SIZE, SIZE)?;
  let mut framebuffer = FrameBuffer::new()?;
  framebuffer.attach_texture(Attachment::Color(0), &Rc::new(color))?;
  framebuffer.validate_status()?;

  let _fb_bind = ScopedFrameBufferBind::new(&framebuffer)?;
  set_viewport(0, 0, SIZE, SIZE)?;
  set_clear_color([1., 0., 0., 1.])?;
  clear(ClearMask::COLOR)?;

  mesh.render(&program)?;
  // second draw goes through the cached vertex array
  mesh.render(&program)?;

  let center = read_pixel(SIZE / 2, SIZE / 2);
  ensure!(center == [0, 255, 0, 255], "center pixel is {:?}", center);

  let corner = read_pixel(0, 0);
  ensure!(corner == [0, 255, 0, 255], "corner pixel is {:?}", corner);

  // a program created after another one is deleted may get its handle back; the mesh must not
  // reuse the vertex array built for the deleted one
  let first = Program::from_sources(VS_POSITION_FIRST, FS)?;
  let first_id = first.id();
  mesh.render(&first)?;
  drop(first);

  let second = Program::from_sources(VS_TEXCOORD_FIRST, FS)?;
  ensure!(second.id() != first_id, "program id reused");

  clear(ClearMask::COLOR)?;
  mesh.render(&second)?;

  // with the attribute locations of the first program, the quad would only cover the upper right
  // quarter of the viewport
  let corner = read_pixel(0, 0);
  ensure!(
    corner == [0, 255, 0, 255],
    "corner pixel is {:?} after switching programs",
    corner
  );

  glplus::check_gl_errors()?;

  Ok(())
}
