use crate::{hidden_window, FixtureResult};
use glplus::gl;
use glplus::gl::types::*;
use glplus::{
  Attachment, FrameBuffer, FramebufferError, FramebufferStatus, InternalFormat, RenderBuffer,
  ScopedFrameBufferBind, Texture2D,
};
use std::rc::Rc;

// what the driver thinks is attached to `point`
fn object_type(
  framebuffer: &FrameBuffer,
  point: GLenum,
) -> Result<GLenum, Box<dyn std::error::Error>> {
  let _bind = ScopedFrameBufferBind::new(framebuffer)?;
  let mut value: GLint = 0;

  unsafe {
    gl::GetFramebufferAttachmentParameteriv(
      gl::FRAMEBUFFER,
      point,
      gl::FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE,
      &mut value,
    );
  }
  glplus::check_gl_errors()?;

  Ok(value as GLenum)
}

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("framebuffer-completeness")?;

  let mut framebuffer = FrameBuffer::new()?;
  let status = framebuffer.status()?;
  ensure!(
    status == FramebufferStatus::MissingAttachment,
    "empty framebuffer reported as {}",
    status
  );
  ensure!(
    framebuffer.validate_status() == Err(FramebufferError::Incomplete(status)),
    "empty framebuffer validated"
  );

  let mut color = Texture2D::new()?;
  color.create_storage(1, InternalFormat::Rgba8, 32, 32)?;
  let color = Rc::new(color);

  let mut depth = RenderBuffer::new()?;
  depth.create_storage(InternalFormat::Depth24, 32, 32)?;
  let depth = Rc::new(depth);

  framebuffer.attach_texture(Attachment::Color(0), &color)?;
  framebuffer.attach_renderbuffer(Attachment::Depth, &depth)?;
  framebuffer.validate_status()?;
  ensure!(
    framebuffer.is_attached(Attachment::Color(0)),
    "color attachment not tracked"
  );

  framebuffer.detach(Attachment::Color(0))?;
  ensure!(
    !framebuffer.is_attached(Attachment::Color(0)),
    "color attachment still tracked"
  );

  // detaching twice is a no-op
  framebuffer.detach(Attachment::Color(0))?;

  framebuffer.detach(Attachment::Depth)?;
  let status = framebuffer.status()?;
  ensure!(
    status == FramebufferStatus::MissingAttachment,
    "framebuffer without attachments reported as {}",
    status
  );

  // a depth-stencil attachment fills both the depth and the stencil points
  let mut depth_stencil = RenderBuffer::new()?;
  depth_stencil.create_storage(InternalFormat::Depth24Stencil8, 32, 32)?;
  let depth_stencil = Rc::new(depth_stencil);

  framebuffer.attach_renderbuffer(Attachment::DepthStencil, &depth_stencil)?;
  ensure!(
    framebuffer.is_attached(Attachment::Depth) && framebuffer.is_attached(Attachment::Stencil),
    "depth-stencil not tracked on both points"
  );
  ensure!(
    object_type(&framebuffer, gl::STENCIL_ATTACHMENT)? == gl::RENDERBUFFER,
    "driver has nothing on the stencil point"
  );

  // replacing the depth alone leaves the stencil in place
  framebuffer.attach_renderbuffer(Attachment::Depth, &depth)?;
  ensure!(
    !framebuffer.is_attached(Attachment::DepthStencil),
    "depth-stencil still tracked after replacing the depth"
  );
  ensure!(
    framebuffer.is_attached(Attachment::Stencil),
    "stencil dropped when replacing the depth"
  );

  framebuffer.attach_renderbuffer(Attachment::DepthStencil, &depth_stencil)?;
  framebuffer.detach(Attachment::DepthStencil)?;
  ensure!(
    !framebuffer.is_attached(Attachment::Depth) && !framebuffer.is_attached(Attachment::Stencil),
    "depth or stencil still tracked after detaching depth-stencil"
  );
  ensure!(
    object_type(&framebuffer, gl::DEPTH_ATTACHMENT)? == gl::NONE
      && object_type(&framebuffer, gl::STENCIL_ATTACHMENT)? == gl::NONE,
    "driver still has a depth or stencil attachment"
  );

  Ok(())
}
