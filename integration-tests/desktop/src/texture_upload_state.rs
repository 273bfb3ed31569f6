//! Uploading texels leaves the pixel store alone and keeps the sampler chosen by the caller.

use crate::{hidden_window, FixtureResult};
use glplus::gl;
use glplus::gl::types::*;
use glplus::{MagFilter, MinFilter, Sampler, ScopedTextureBind, Texture2D, Wrap};

fn texture_parameter(
  texture: &Texture2D,
  pname: GLenum,
) -> Result<GLint, Box<dyn std::error::Error>> {
  let _bind = ScopedTextureBind::new(texture, 0)?;
  let mut value: GLint = 0;

  unsafe { gl::GetTexParameteriv(gl::TEXTURE_2D, pname, &mut value) };
  glplus::check_gl_errors()?;

  Ok(value)
}

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("texture-upload-state")?;

  unsafe { gl::PixelStorei(gl::UNPACK_ALIGNMENT, 8) };

  let mut fresh = Texture2D::new()?;
  fresh.upload_rgba8(3, 1, &[255; 12])?;

  let mut alignment: GLint = 0;
  unsafe { gl::GetIntegerv(gl::UNPACK_ALIGNMENT, &mut alignment) };
  ensure!(alignment == 8, "unpack alignment left at {}", alignment);

  ensure!(
    fresh.sampler() == Some(Sampler::default()),
    "default sampler not applied on first upload"
  );
  ensure!(
    texture_parameter(&fresh, gl::TEXTURE_MIN_FILTER)? == gl::LINEAR_MIPMAP_LINEAR as GLint,
    "driver min filter is not the default one"
  );

  let nearest = Sampler {
    wrap_s: Wrap::Repeat,
    wrap_t: Wrap::Repeat,
    min_filter: MinFilter::Nearest,
    mag_filter: MagFilter::Nearest,
  };

  let mut texture = Texture2D::new()?;
  texture.set_sampler(nearest)?;
  texture.upload_rgba8(2, 2, &[0; 16])?;
  texture.upload_rgba8(4, 4, &[0; 64])?;

  ensure!(
    texture.sampler() == Some(nearest),
    "sampler replaced by an upload"
  );
  ensure!(
    texture_parameter(&texture, gl::TEXTURE_MIN_FILTER)? == gl::NEAREST as GLint,
    "driver min filter overwritten"
  );
  ensure!(
    texture_parameter(&texture, gl::TEXTURE_WRAP_S)? == gl::REPEAT as GLint,
    "driver wrap mode overwritten"
  );

  unsafe { gl::PixelStorei(gl::UNPACK_ALIGNMENT, 4) };

  Ok(())
}
