//! Stereo rendering: both eyes go to one offscreen framebuffer, which is then drawn to the
//! screen through the distortion shader.

use crate::distortion::{Eye, EyeDistortion};
use glplus::{
  draw_arrays, Attachment, FrameBuffer, InternalFormat, MagFilter, MinFilter, Primitive, Program,
  RenderBuffer, Sampler, ScopedTextureBind, Texture2D, VertexArray, Wrap,
};
use std::error::Error;
use std::rc::Rc;

const VS: &str = include_str!("distortion-vs.glsl");
const FS: &str = include_str!("distortion-fs.glsl");

/// Offscreen framebuffer holding the left eye in its left half and the right eye in its right
/// half.
pub struct StereoTarget {
  framebuffer: FrameBuffer,
  color: Rc<Texture2D>,
  size: [u32; 2],
}

impl StereoTarget {
  pub fn new(width: u32, height: u32) -> Result<Self, Box<dyn Error>> {
    let mut color = Texture2D::new()?;
    color.create_storage(1, InternalFormat::Rgba8, width, height)?;
    color.set_sampler(Sampler {
      wrap_s: Wrap::ClampToEdge,
      wrap_t: Wrap::ClampToEdge,
      min_filter: MinFilter::Linear,
      mag_filter: MagFilter::Linear,
    })?;
    let color = Rc::new(color);

    let mut depth = RenderBuffer::new()?;
    depth.create_storage(InternalFormat::Depth24, width, height)?;
    let depth = Rc::new(depth);

    let mut framebuffer = FrameBuffer::new()?;
    framebuffer.attach_texture(Attachment::Color(0), &color)?;
    framebuffer.attach_renderbuffer(Attachment::Depth, &depth)?;
    framebuffer.validate_status()?;

    log::info!("stereo target: {}×{}", width, height);

    Ok(StereoTarget {
      framebuffer,
      color,
      size: [width, height],
    })
  }

  pub fn framebuffer(&self) -> &FrameBuffer {
    &self.framebuffer
  }

  pub fn size(&self) -> [u32; 2] {
    self.size
  }
}

/// Draws one eye of a [`StereoTarget`] with barrel distortion.
pub struct DistortionPass {
  program: Program,
  // attributeless; core contexts refuse to draw without a vertex array bound
  quad: VertexArray,
}

impl DistortionPass {
  pub fn new() -> Result<Self, Box<dyn Error>> {
    let program = Program::from_sources(VS, FS)?;
    let quad = VertexArray::new()?;

    Ok(DistortionPass { program, quad })
  }

  /// Draw `eye` into the current viewport.
  pub fn render(
    &self,
    target: &StereoTarget,
    eye: Eye,
    params: &EyeDistortion,
  ) -> Result<(), Box<dyn Error>> {
    let [x, y, w, h] = eye.viewport();

    let _texture_bind = ScopedTextureBind::new(&target.color, 0)?;

    self.program.upload("source_texture", 0i32)?;
    self.program.upload("uv_offset", [x, y])?;
    self.program.upload("uv_scale", [w, h])?;
    self.program.upload("lens_center", params.lens_center)?;
    self.program.upload("screen_center", params.screen_center)?;
    self.program.upload("scale", params.scale)?;
    self.program.upload("scale_in", params.scale_in)?;
    self.program.upload("hmd_warp_param", params.hmd_warp_param)?;

    draw_arrays(&self.program, &self.quad, Primitive::TriangleFan, 0, 4)?;

    Ok(())
  }
}
