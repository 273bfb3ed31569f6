//! Every scoped guard must put back whatever was bound before it, not just unbind.

use crate::{hidden_window, FixtureResult};
use glplus::gl;
use glplus::gl::types::*;
use glplus::{
  Buffer, BufferTarget, BufferUsage, FrameBuffer, Program, RenderBuffer, ScopedBufferBind,
  ScopedFrameBufferBind, ScopedProgramBind, ScopedRenderBufferBind, ScopedTextureBind,
  ScopedVertexArrayBind, Texture2D, VertexArray,
};

const VS: &str = "#version 330 core
void main() {
  gl_Position = vec4(0., 0., 0., 1.);
}";

const FS: &str = "#version 330 core
out vec4 frag;
void main() {
  frag = vec4(1.);
}";

fn get(pname: GLenum) -> GLuint {
  let mut value: GLint = 0;
  unsafe { gl::GetIntegerv(pname, &mut value) };
  value as GLuint
}

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("scoped-bind-restore")?;

  // buffers
  let outer = Buffer::from_slice(BufferTarget::Array, &[0f32; 4], BufferUsage::StaticDraw)?;
  let inner = Buffer::from_slice(BufferTarget::Array, &[1f32; 4], BufferUsage::StaticDraw)?;
  {
    let _outer_bind = ScopedBufferBind::new(&outer)?;
    {
      let _inner_bind = ScopedBufferBind::new(&inner)?;
      ensure!(get(gl::ARRAY_BUFFER_BINDING) == inner.handle(), "inner buffer not bound");
    }
    ensure!(
      get(gl::ARRAY_BUFFER_BINDING) == outer.handle(),
      "outer buffer binding not restored"
    );
  }
  ensure!(get(gl::ARRAY_BUFFER_BINDING) == 0, "buffer binding not restored to 0");

  // vertex arrays
  let outer_vao = VertexArray::new()?;
  let inner_vao = VertexArray::new()?;
  {
    let _outer_bind = ScopedVertexArrayBind::new(&outer_vao)?;
    {
      let _inner_bind = ScopedVertexArrayBind::new(&inner_vao)?;
      ensure!(get(gl::VERTEX_ARRAY_BINDING) == inner_vao.handle(), "inner VAO not bound");
    }
    ensure!(
      get(gl::VERTEX_ARRAY_BINDING) == outer_vao.handle(),
      "outer VAO binding not restored"
    );
  }

  // programs
  let outer_program = Program::from_sources(VS, FS)?;
  let inner_program = Program::from_sources(VS, FS)?;
  {
    let _outer_bind = ScopedProgramBind::new(&outer_program)?;
    {
      let _inner_bind = ScopedProgramBind::new(&inner_program)?;
      ensure!(get(gl::CURRENT_PROGRAM) == inner_program.handle(), "inner program not used");
    }
    ensure!(
      get(gl::CURRENT_PROGRAM) == outer_program.handle(),
      "outer program not restored"
    );
  }

  // textures, on a non-zero unit; the active unit must come back as well
  let outer_texture = Texture2D::new()?;
  let inner_texture = Texture2D::new()?;
  unsafe { gl::ActiveTexture(gl::TEXTURE2) };
  {
    let _outer_bind = ScopedTextureBind::new(&outer_texture, 2)?;
    {
      let _inner_bind = ScopedTextureBind::new(&inner_texture, 5)?;
      ensure!(get(gl::ACTIVE_TEXTURE) == gl::TEXTURE5, "unit 5 not active");
      ensure!(
        get(gl::TEXTURE_BINDING_2D) == inner_texture.handle(),
        "inner texture not bound"
      );
    }
    ensure!(get(gl::ACTIVE_TEXTURE) == gl::TEXTURE2, "active unit not restored");
    ensure!(
      get(gl::TEXTURE_BINDING_2D) == outer_texture.handle(),
      "outer texture binding not restored"
    );
  }
  unsafe { gl::ActiveTexture(gl::TEXTURE5) };
  ensure!(get(gl::TEXTURE_BINDING_2D) == 0, "unit 5 binding not restored");
  unsafe { gl::ActiveTexture(gl::TEXTURE0) };

  // render buffers
  let outer_rb = RenderBuffer::new()?;
  let inner_rb = RenderBuffer::new()?;
  {
    let _outer_bind = ScopedRenderBufferBind::new(&outer_rb)?;
    {
      let _inner_bind = ScopedRenderBufferBind::new(&inner_rb)?;
      ensure!(get(gl::RENDERBUFFER_BINDING) == inner_rb.handle(), "inner RB not bound");
    }
    ensure!(
      get(gl::RENDERBUFFER_BINDING) == outer_rb.handle(),
      "outer RB binding not restored"
    );
  }

  // framebuffers, including an explicit bind of the default one
  let framebuffer = FrameBuffer::new()?;
  {
    let _fb_bind = ScopedFrameBufferBind::new(&framebuffer)?;
    {
      let _default_bind = ScopedFrameBufferBind::default_framebuffer()?;
      ensure!(get(gl::FRAMEBUFFER_BINDING) == 0, "default framebuffer not bound");
    }
    ensure!(
      get(gl::FRAMEBUFFER_BINDING) == framebuffer.handle(),
      "framebuffer binding not restored"
    );
  }
  ensure!(get(gl::FRAMEBUFFER_BINDING) == 0, "framebuffer binding not restored to 0");

  Ok(())
}
