//! Framebuffers.

use crate::error::{check_gl_errors, log_drop_error, GlError};
use crate::renderbuffer::RenderBuffer;
use crate::state::get_ctx_bound_framebuffer;
use crate::texture::Texture2D;
use gl::types::*;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::{error, fmt};

/// Framebuffer attachment point.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Attachment {
  /// `GL_COLOR_ATTACHMENTi`.
  Color(u32),
  /// `GL_DEPTH_ATTACHMENT`.
  Depth,
  /// `GL_STENCIL_ATTACHMENT`.
  Stencil,
  /// `GL_DEPTH_STENCIL_ATTACHMENT`.
  DepthStencil,
}

impl Attachment {
  pub(crate) fn to_glenum(self) -> GLenum {
    match self {
      Attachment::Color(i) => gl::COLOR_ATTACHMENT0 + i,
      Attachment::Depth => gl::DEPTH_ATTACHMENT,
      Attachment::Stencil => gl::STENCIL_ATTACHMENT,
      Attachment::DepthStencil => gl::DEPTH_STENCIL_ATTACHMENT,
    }
  }
}

/// Completeness status of a framebuffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FramebufferStatus {
  Complete,
  Undefined,
  IncompleteAttachment,
  MissingAttachment,
  IncompleteDrawBuffer,
  IncompleteReadBuffer,
  Unsupported,
  IncompleteMultisample,
  IncompleteLayerTargets,
  /// A status this crate doesn’t know about.
  Unknown(GLenum),
}

impl FramebufferStatus {
  /// Map a `glCheckFramebufferStatus` result.
  pub fn from_glenum(status: GLenum) -> Self {
    match status {
      gl::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
      gl::FRAMEBUFFER_UNDEFINED => FramebufferStatus::Undefined,
      gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
      gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
      gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
      gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
      gl::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
      gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferStatus::IncompleteMultisample,
      gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => FramebufferStatus::IncompleteLayerTargets,
      _ => FramebufferStatus::Unknown(status),
    }
  }
}

impl fmt::Display for FramebufferStatus {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      FramebufferStatus::Complete => f.write_str("GL_FRAMEBUFFER_COMPLETE"),
      FramebufferStatus::Undefined => f.write_str("GL_FRAMEBUFFER_UNDEFINED"),
      FramebufferStatus::IncompleteAttachment => {
        f.write_str("GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT")
      }
      FramebufferStatus::MissingAttachment => {
        f.write_str("GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT")
      }
      FramebufferStatus::IncompleteDrawBuffer => {
        f.write_str("GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER")
      }
      FramebufferStatus::IncompleteReadBuffer => {
        f.write_str("GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER")
      }
      FramebufferStatus::Unsupported => f.write_str("GL_FRAMEBUFFER_UNSUPPORTED"),
      FramebufferStatus::IncompleteMultisample => {
        f.write_str("GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE")
      }
      FramebufferStatus::IncompleteLayerTargets => {
        f.write_str("GL_FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS")
      }
      FramebufferStatus::Unknown(status) => {
        write!(f, "Unknown FrameBuffer status (0x{:04X})", status)
      }
    }
  }
}

/// Errors that can occur while working with a [`FrameBuffer`].
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum FramebufferError {
  /// The driver reported an error.
  Gl(GlError),
  /// The framebuffer is not complete.
  Incomplete(FramebufferStatus),
}

impl fmt::Display for FramebufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      FramebufferError::Gl(ref e) => write!(f, "framebuffer error: {}", e),
      FramebufferError::Incomplete(ref status) => write!(f, "incomplete framebuffer: {}", status),
    }
  }
}

impl error::Error for FramebufferError {}

impl From<GlError> for FramebufferError {
  fn from(e: GlError) -> Self {
    FramebufferError::Gl(e)
  }
}

/// Object attached to a framebuffer, kept alive by it.
// payloads are only held, never read
#[allow(dead_code)]
#[derive(Clone, Debug)]
enum Attached {
  Texture(Rc<Texture2D>),
  RenderBuffer(Rc<RenderBuffer>),
}

/// Framebuffer object.
#[derive(Debug)]
pub struct FrameBuffer {
  handle: GLuint,
  attachments: HashMap<Attachment, Attached>,
}

impl FrameBuffer {
  /// Create a new framebuffer with no attachment.
  pub fn new() -> Result<Self, GlError> {
    let mut handle: GLuint = 0;

    unsafe { gl::GenFramebuffers(1, &mut handle) };
    check_gl_errors()?;

    if handle == 0 {
      return Err(GlError::NullHandle("glGenFramebuffers"));
    }

    log::debug!("created framebuffer {}", handle);

    Ok(FrameBuffer {
      handle,
      attachments: HashMap::new(),
    })
  }

  /// Attach level 0 of a texture.
  ///
  /// Whatever was attached to `attachment` before is replaced.
  pub fn attach_texture(
    &mut self,
    attachment: Attachment,
    texture: &Rc<Texture2D>,
  ) -> Result<(), GlError> {
    {
      let _bind = ScopedFrameBufferBind::new(self)?;

      unsafe {
        gl::FramebufferTexture2D(
          gl::FRAMEBUFFER,
          attachment.to_glenum(),
          gl::TEXTURE_2D,
          texture.handle(),
          0,
        );
      }
      check_gl_errors()?;
    }

    self.track(attachment, Some(Attached::Texture(texture.clone())));

    Ok(())
  }

  /// Attach a render buffer.
  ///
  /// Whatever was attached to `attachment` before is replaced.
  pub fn attach_renderbuffer(
    &mut self,
    attachment: Attachment,
    render_buffer: &Rc<RenderBuffer>,
  ) -> Result<(), GlError> {
    {
      let _bind = ScopedFrameBufferBind::new(self)?;

      unsafe {
        gl::FramebufferRenderbuffer(
          gl::FRAMEBUFFER,
          attachment.to_glenum(),
          gl::RENDERBUFFER,
          render_buffer.handle(),
        );
      }
      check_gl_errors()?;
    }

    self.track(attachment, Some(Attached::RenderBuffer(render_buffer.clone())));

    Ok(())
  }

  /// Detach whatever is attached to `attachment`.
  ///
  /// Detaching an empty attachment point is a no-op.
  pub fn detach(&mut self, attachment: Attachment) -> Result<(), GlError> {
    let attached = match self.attachments.get(&attachment) {
      Some(attached) => attached.clone(),
      None => return Ok(()),
    };

    {
      let _bind = ScopedFrameBufferBind::new(self)?;

      unsafe {
        match attached {
          Attached::Texture(_) => gl::FramebufferTexture2D(
            gl::FRAMEBUFFER,
            attachment.to_glenum(),
            gl::TEXTURE_2D,
            0,
            0,
          ),
          Attached::RenderBuffer(_) => gl::FramebufferRenderbuffer(
            gl::FRAMEBUFFER,
            attachment.to_glenum(),
            gl::RENDERBUFFER,
            0,
          ),
        }
      }
      check_gl_errors()?;
    }

    self.track(attachment, None);

    Ok(())
  }

  // GL_DEPTH_STENCIL_ATTACHMENT is an alias setting both the depth and stencil points
  fn track(&mut self, attachment: Attachment, attached: Option<Attached>) {
    let points = match attachment {
      Attachment::DepthStencil => vec![
        Attachment::DepthStencil,
        Attachment::Depth,
        Attachment::Stencil,
      ],
      Attachment::Depth | Attachment::Stencil => {
        self.attachments.remove(&Attachment::DepthStencil);
        vec![attachment]
      }
      Attachment::Color(_) => vec![attachment],
    };

    for point in points {
      match attached {
        Some(ref attached) => {
          self.attachments.insert(point, attached.clone());
        }
        None => {
          self.attachments.remove(&point);
        }
      }
    }
  }

  /// Whether something is attached to `attachment`.
  pub fn is_attached(&self, attachment: Attachment) -> bool {
    self.attachments.contains_key(&attachment)
  }

  /// Completeness status.
  pub fn status(&self) -> Result<FramebufferStatus, GlError> {
    let _bind = ScopedFrameBufferBind::new(self)?;

    let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };
    check_gl_errors()?;

    Ok(FramebufferStatus::from_glenum(status))
  }

  /// Fail with [`FramebufferError::Incomplete`] unless the framebuffer is complete.
  pub fn validate_status(&self) -> Result<(), FramebufferError> {
    match self.status()? {
      FramebufferStatus::Complete => Ok(()),
      status => Err(FramebufferError::Incomplete(status)),
    }
  }

  /// Native handle.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for FrameBuffer {
  fn drop(&mut self) {
    log::trace!("deleting framebuffer {}", self.handle);

    unsafe { gl::DeleteFramebuffers(1, &self.handle) };
    log_drop_error("glDeleteFramebuffers", check_gl_errors());
  }
}

/// Bind a framebuffer until the guard is dropped.
#[derive(Debug)]
pub struct ScopedFrameBufferBind<'a> {
  previous: GLuint,
  _bound: PhantomData<&'a FrameBuffer>,
}

impl<'a> ScopedFrameBufferBind<'a> {
  /// Bind `framebuffer`.
  pub fn new(framebuffer: &'a FrameBuffer) -> Result<Self, GlError> {
    Self::bind(framebuffer.handle)
  }

  /// Bind the default framebuffer (the window back buffer).
  pub fn default_framebuffer() -> Result<Self, GlError> {
    Self::bind(0)
  }

  fn bind(handle: GLuint) -> Result<Self, GlError> {
    let previous = get_ctx_bound_framebuffer()?;

    unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, handle) };
    check_gl_errors()?;

    Ok(ScopedFrameBufferBind {
      previous,
      _bound: PhantomData,
    })
  }
}

impl Drop for ScopedFrameBufferBind<'_> {
  fn drop(&mut self) {
    unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, self.previous) };
    log_drop_error("restoring framebuffer binding", check_gl_errors());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn attachment_enums() {
    assert_eq!(Attachment::Color(0).to_glenum(), gl::COLOR_ATTACHMENT0);
    assert_eq!(Attachment::Color(3).to_glenum(), gl::COLOR_ATTACHMENT3);
    assert_eq!(Attachment::Depth.to_glenum(), gl::DEPTH_ATTACHMENT);
    assert_eq!(
      Attachment::DepthStencil.to_glenum(),
      gl::DEPTH_STENCIL_ATTACHMENT
    );
  }

  #[test]
  fn status_mapping() {
    assert_eq!(
      FramebufferStatus::from_glenum(gl::FRAMEBUFFER_COMPLETE),
      FramebufferStatus::Complete
    );
    assert_eq!(
      FramebufferStatus::from_glenum(gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT),
      FramebufferStatus::MissingAttachment
    );
    assert_eq!(
      FramebufferStatus::from_glenum(0xdead),
      FramebufferStatus::Unknown(0xdead)
    );
  }

  #[test]
  fn status_names() {
    assert_eq!(
      FramebufferStatus::IncompleteAttachment.to_string(),
      "GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT"
    );
    assert_eq!(
      FramebufferError::Incomplete(FramebufferStatus::Unsupported).to_string(),
      "incomplete framebuffer: GL_FRAMEBUFFER_UNSUPPORTED"
    );
  }
}
