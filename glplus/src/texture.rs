//! 2D textures.

use crate::error::{check_gl_errors, log_drop_error, GlError};
use crate::state::{get_ctx_active_texture, get_ctx_bound_texture_2d};
use gl::types::*;
use std::marker::PhantomData;
use std::ops::BitOr;
use std::path::Path;
use std::{error, fmt, ptr};

/// Errors that can occur while working with a [`Texture2D`].
#[non_exhaustive]
#[derive(Debug)]
pub enum TextureError {
  /// The driver reported an error.
  Gl(GlError),
  /// The image could not be read or decoded.
  Image(image::ImageError),
  /// The texture has no storage yet.
  NotLoaded,
  /// Not enough texels for the requested size.
  NotEnoughTexels { expected: usize, provided: usize },
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::Gl(ref e) => write!(f, "texture error: {}", e),
      TextureError::Image(ref e) => write!(f, "cannot load image: {}", e),
      TextureError::NotLoaded => f.write_str("texture not loaded"),
      TextureError::NotEnoughTexels { expected, provided } => write!(
        f,
        "not enough texels: {} bytes expected, {} provided",
        expected, provided
      ),
    }
  }
}

impl error::Error for TextureError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      TextureError::Gl(e) => Some(e),
      TextureError::Image(e) => Some(e),
      _ => None,
    }
  }
}

impl From<GlError> for TextureError {
  fn from(e: GlError) -> Self {
    TextureError::Gl(e)
  }
}

impl From<image::ImageError> for TextureError {
  fn from(e: image::ImageError) -> Self {
    TextureError::Image(e)
  }
}

/// Flags altering how images are loaded.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ImageFlags(u32);

impl ImageFlags {
  /// No flag.
  pub const NONE: ImageFlags = ImageFlags(0);

  /// Flip the image vertically.
  ///
  /// Image files store their first row at the top whereas OpenGL expects the first row at the
  /// bottom.
  pub const INVERT_Y: ImageFlags = ImageFlags(1);

  /// Whether all the flags of `other` are set.
  pub fn contains(self, other: ImageFlags) -> bool {
    self.0 & other.0 == other.0
  }
}

impl BitOr for ImageFlags {
  type Output = ImageFlags;

  fn bitor(self, rhs: ImageFlags) -> ImageFlags {
    ImageFlags(self.0 | rhs.0)
  }
}

/// Internal storage format of textures and render buffers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InternalFormat {
  Rgb8,
  Rgba8,
  Srgb8Alpha8,
  Rgba16F,
  Rgba32F,
  Depth24,
  Depth32F,
  Depth24Stencil8,
}

impl InternalFormat {
  /// Internal format, pixel format and pixel type triple.
  pub(crate) fn to_gl_triple(self) -> (GLenum, GLenum, GLenum) {
    match self {
      InternalFormat::Rgb8 => (gl::RGB8, gl::RGB, gl::UNSIGNED_BYTE),
      InternalFormat::Rgba8 => (gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
      InternalFormat::Srgb8Alpha8 => (gl::SRGB8_ALPHA8, gl::RGBA, gl::UNSIGNED_BYTE),
      InternalFormat::Rgba16F => (gl::RGBA16F, gl::RGBA, gl::HALF_FLOAT),
      InternalFormat::Rgba32F => (gl::RGBA32F, gl::RGBA, gl::FLOAT),
      InternalFormat::Depth24 => (gl::DEPTH_COMPONENT24, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT),
      InternalFormat::Depth32F => (gl::DEPTH_COMPONENT32F, gl::DEPTH_COMPONENT, gl::FLOAT),
      InternalFormat::Depth24Stencil8 => {
        (gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8)
      }
    }
  }

  pub(crate) fn internal_glenum(self) -> GLenum {
    self.to_gl_triple().0
  }
}

/// Texture coordinates wrapping.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
  ClampToEdge,
  Repeat,
  MirroredRepeat,
}

impl Wrap {
  fn to_glint(self) -> GLint {
    (match self {
      Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
      Wrap::Repeat => gl::REPEAT,
      Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
    }) as GLint
  }
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MinFilter {
  Nearest,
  Linear,
  NearestMipmapNearest,
  NearestMipmapLinear,
  LinearMipmapNearest,
  LinearMipmapLinear,
}

impl MinFilter {
  fn to_glint(self) -> GLint {
    (match self {
      MinFilter::Nearest => gl::NEAREST,
      MinFilter::Linear => gl::LINEAR,
      MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
      MinFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
      MinFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
      MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
    }) as GLint
  }
}

/// Magnification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MagFilter {
  Nearest,
  Linear,
}

impl MagFilter {
  fn to_glint(self) -> GLint {
    (match self {
      MagFilter::Nearest => gl::NEAREST,
      MagFilter::Linear => gl::LINEAR,
    }) as GLint
  }
}

/// Sampling parameters of a texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampler {
  pub wrap_s: Wrap,
  pub wrap_t: Wrap,
  pub min_filter: MinFilter,
  pub mag_filter: MagFilter,
}

impl Default for Sampler {
  /// Defaults:
  ///
  /// - `wrap_s` and `wrap_t` set to [`Wrap::ClampToEdge`].
  /// - `min_filter` set to [`MinFilter::LinearMipmapLinear`].
  /// - `mag_filter` set to [`MagFilter::Linear`].
  fn default() -> Self {
    Sampler {
      wrap_s: Wrap::ClampToEdge,
      wrap_t: Wrap::ClampToEdge,
      min_filter: MinFilter::LinearMipmapLinear,
      mag_filter: MagFilter::Linear,
    }
  }
}

/// Decoded RGBA8 image, ready to be uploaded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedImage {
  pub width: u32,
  pub height: u32,
  pub texels: Vec<u8>,
}

/// Read an image from disk and convert it to RGBA8.
pub fn decode_image(path: impl AsRef<Path>, flags: ImageFlags) -> Result<DecodedImage, TextureError> {
  let img = image::open(path.as_ref())?;
  let img = if flags.contains(ImageFlags::INVERT_Y) {
    img.flipv()
  } else {
    img
  };
  let rgba = img.to_rgba8();
  let (width, height) = rgba.dimensions();

  Ok(DecodedImage {
    width,
    height,
    texels: rgba.into_raw(),
  })
}

/// 2D texture.
#[derive(Debug)]
pub struct Texture2D {
  handle: GLuint,
  size: Option<[u32; 2]>,
  sampler: Option<Sampler>,
}

impl Texture2D {
  /// Create a new texture with no storage.
  pub fn new() -> Result<Self, GlError> {
    let mut handle: GLuint = 0;

    unsafe { gl::GenTextures(1, &mut handle) };
    check_gl_errors()?;

    if handle == 0 {
      return Err(GlError::NullHandle("glGenTextures"));
    }

    log::debug!("created texture {}", handle);

    Ok(Texture2D {
      handle,
      size: None,
      sampler: None,
    })
  }

  /// Create a texture from an image file.
  pub fn from_image(path: impl AsRef<Path>, flags: ImageFlags) -> Result<Self, TextureError> {
    let mut texture = Texture2D::new()?;
    texture.load_image(path, flags)?;
    Ok(texture)
  }

  /// Load an image file into the texture.
  ///
  /// The image is converted to RGBA8 and mipmaps are generated.
  pub fn load_image(&mut self, path: impl AsRef<Path>, flags: ImageFlags) -> Result<(), TextureError> {
    let path = path.as_ref();
    let image = decode_image(path, flags)?;

    log::debug!(
      "loading {} ({}×{}) into texture {}",
      path.display(),
      image.width,
      image.height,
      self.handle
    );

    self.upload_rgba8(image.width, image.height, &image.texels)
  }

  /// Upload RGBA8 texels to level 0 and generate mipmaps.
  ///
  /// [`Sampler::default`] is applied unless a sampler was set before. The unpack alignment is
  /// restored once the texels are uploaded.
  pub fn upload_rgba8(&mut self, width: u32, height: u32, texels: &[u8]) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * 4;

    if texels.len() < expected {
      return Err(TextureError::NotEnoughTexels {
        expected,
        provided: texels.len(),
      });
    }

    {
      let _bind = ScopedTextureBind::new(self, 0)?;
      let mut alignment: GLint = 0;

      unsafe {
        gl::GetIntegerv(gl::UNPACK_ALIGNMENT, &mut alignment);
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        gl::TexImage2D(
          gl::TEXTURE_2D,
          0,
          gl::RGBA8 as GLint,
          width as GLsizei,
          height as GLsizei,
          0,
          gl::RGBA,
          gl::UNSIGNED_BYTE,
          texels.as_ptr() as *const _,
        );
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, alignment);
        check_gl_errors()?;

        gl::GenerateMipmap(gl::TEXTURE_2D);
        check_gl_errors()?;
      }
    }

    self.size = Some([width, height]);

    match self.sampler {
      Some(_) => Ok(()),
      None => self.set_sampler(Sampler::default()),
    }
  }

  /// Allocate storage for `levels` mipmap levels, without initializing it.
  pub fn create_storage(
    &mut self,
    levels: u32,
    format: InternalFormat,
    width: u32,
    height: u32,
  ) -> Result<(), TextureError> {
    let (internal, pixel_format, pixel_type) = format.to_gl_triple();
    let levels = levels.max(1);

    {
      let _bind = ScopedTextureBind::new(self, 0)?;

      for level in 0..levels {
        let w = (width >> level).max(1);
        let h = (height >> level).max(1);

        unsafe {
          gl::TexImage2D(
            gl::TEXTURE_2D,
            level as GLint,
            internal as GLint,
            w as GLsizei,
            h as GLsizei,
            0,
            pixel_format,
            pixel_type,
            ptr::null(),
          );
        }
        check_gl_errors()?;
      }

      unsafe {
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_BASE_LEVEL, 0);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAX_LEVEL, levels as GLint - 1);
      }
      check_gl_errors()?;
    }

    log::debug!(
      "allocated {}×{} {:?} storage ({} levels) for texture {}",
      width,
      height,
      format,
      levels,
      self.handle
    );

    self.size = Some([width, height]);

    Ok(())
  }

  /// Set the sampling parameters.
  pub fn set_sampler(&mut self, sampler: Sampler) -> Result<(), TextureError> {
    {
      let _bind = ScopedTextureBind::new(self, 0)?;

      unsafe {
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, sampler.wrap_s.to_glint());
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, sampler.wrap_t.to_glint());
        gl::TexParameteri(
          gl::TEXTURE_2D,
          gl::TEXTURE_MIN_FILTER,
          sampler.min_filter.to_glint(),
        );
        gl::TexParameteri(
          gl::TEXTURE_2D,
          gl::TEXTURE_MAG_FILTER,
          sampler.mag_filter.to_glint(),
        );
      }
      check_gl_errors()?;
    }

    self.sampler = Some(sampler);

    Ok(())
  }

  /// Sampler last set on the texture, if any.
  pub fn sampler(&self) -> Option<Sampler> {
    self.sampler
  }

  /// Width of level 0.
  pub fn width(&self) -> Result<u32, TextureError> {
    self.size.map(|[w, _]| w).ok_or(TextureError::NotLoaded)
  }

  /// Height of level 0.
  pub fn height(&self) -> Result<u32, TextureError> {
    self.size.map(|[_, h]| h).ok_or(TextureError::NotLoaded)
  }

  /// Native handle.
  pub fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for Texture2D {
  fn drop(&mut self) {
    log::trace!("deleting texture {}", self.handle);

    unsafe { gl::DeleteTextures(1, &self.handle) };
    log_drop_error("glDeleteTextures", check_gl_errors());
  }
}

/// Bind a texture to a texture unit until the guard is dropped.
///
/// On drop, the texture previously bound to that unit is restored, then the previously active
/// texture unit.
#[derive(Debug)]
pub struct ScopedTextureBind<'a> {
  previous_unit: GLenum,
  previous_texture: GLuint,
  _bound: PhantomData<&'a Texture2D>,
}

impl<'a> ScopedTextureBind<'a> {
  /// Bind `texture` to texture unit `unit` (`0` being `GL_TEXTURE0`), which becomes the active
  /// unit.
  pub fn new(texture: &'a Texture2D, unit: u32) -> Result<Self, GlError> {
    let previous_unit = get_ctx_active_texture()?;

    unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) };
    check_gl_errors()?;

    let previous_texture = get_ctx_bound_texture_2d()?;

    unsafe { gl::BindTexture(gl::TEXTURE_2D, texture.handle) };
    check_gl_errors()?;

    Ok(ScopedTextureBind {
      previous_unit,
      previous_texture,
      _bound: PhantomData,
    })
  }
}

impl Drop for ScopedTextureBind<'_> {
  fn drop(&mut self) {
    unsafe { gl::BindTexture(gl::TEXTURE_2D, self.previous_texture) };
    log_drop_error("restoring texture binding", check_gl_errors());

    unsafe { gl::ActiveTexture(self.previous_unit) };
    log_drop_error("restoring active texture unit", check_gl_errors());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::env;

  fn write_test_image(name: &str) -> std::path::PathBuf {
    // 1×2 image: red on the top row, blue on the bottom row
    let mut img = image::RgbImage::new(1, 2);
    img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
    img.put_pixel(0, 1, image::Rgb([0, 0, 255]));

    let path = env::temp_dir().join(format!("glplus-{}-{}.png", name, std::process::id()));
    img.save(&path).unwrap();
    path
  }

  #[test]
  fn decode_keeps_rows_without_flags() {
    let path = write_test_image("no-flip");
    let decoded = decode_image(&path, ImageFlags::NONE).unwrap();

    assert_eq!((decoded.width, decoded.height), (1, 2));
    assert_eq!(decoded.texels, vec![255, 0, 0, 255, 0, 0, 255, 255]);

    std::fs::remove_file(path).unwrap();
  }

  #[test]
  fn decode_inverts_rows() {
    let path = write_test_image("flip");
    let decoded = decode_image(&path, ImageFlags::INVERT_Y).unwrap();

    assert_eq!(decoded.texels, vec![0, 0, 255, 255, 255, 0, 0, 255]);

    std::fs::remove_file(path).unwrap();
  }

  #[test]
  fn decode_missing_file() {
    let err = decode_image("/definitely/not/here.png", ImageFlags::NONE).unwrap_err();
    assert!(matches!(err, TextureError::Image(_)));
  }

  #[test]
  fn flags() {
    let flags = ImageFlags::NONE | ImageFlags::INVERT_Y;

    assert!(flags.contains(ImageFlags::INVERT_Y));
    assert!(!ImageFlags::NONE.contains(ImageFlags::INVERT_Y));
    assert_eq!(ImageFlags::default(), ImageFlags::NONE);
  }

  #[test]
  fn depth_formats() {
    assert_eq!(
      InternalFormat::Depth24Stencil8.to_gl_triple(),
      (gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8)
    );
    assert_eq!(InternalFormat::Depth32F.internal_glenum(), gl::DEPTH_COMPONENT32F);
  }

  #[test]
  fn default_sampler_uses_mipmaps() {
    let sampler = Sampler::default();

    assert_eq!(sampler.min_filter, MinFilter::LinearMipmapLinear);
    assert_eq!(sampler.wrap_s.to_glint(), gl::CLAMP_TO_EDGE as GLint);
  }
}
