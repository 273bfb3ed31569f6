//! Window options.

/// Dimension metrics.
///
///   - `Windowed { width, height }` opens in windowed mode with the wished resolution.
///   - `FullscreenDesktop` opens in fullscreen mode by using the desktop resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowDim {
  /// Windowed mode.
  Windowed {
    /// Width of the window, in screen coordinates.
    width: u32,
    /// Height of the window, in screen coordinates.
    height: u32,
  },
  /// Fullscreen mode (adapt to your screen).
  FullscreenDesktop,
}

/// OpenGL profile of the context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GlProfile {
  /// Core profile; deprecated functionality is not available.
  Core,
  /// Compatibility profile.
  Compatibility,
}

/// Different window options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to start
/// with `default()` though.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WindowOpt {
  title: String,
  dim: WindowDim,
  opengl: bool,
  gl_version: (u8, u8),
  gl_profile: GlProfile,
  resizable: bool,
  hidden: bool,
  vsync: bool,
  depth_size: u8,
  num_samples: Option<u8>,
}

impl Default for WindowOpt {
  /// Defaults:
  ///
  /// - `title` set to `"glplus"`.
  /// - `dim` set to a 640×480 window.
  /// - `opengl` set to `true`, with a 3.3 core context.
  /// - `resizable` and `hidden` set to `false`.
  /// - `vsync` set to `true`.
  /// - `depth_size` set to `24`.
  /// - `num_samples` set to `None`.
  fn default() -> Self {
    WindowOpt {
      title: "glplus".to_owned(),
      dim: WindowDim::Windowed {
        width: 640,
        height: 480,
      },
      opengl: true,
      gl_version: (3, 3),
      gl_profile: GlProfile::Core,
      resizable: false,
      hidden: false,
      vsync: true,
      depth_size: 24,
      num_samples: None,
    }
  }
}

impl WindowOpt {
  /// Set the window title.
  #[inline]
  pub fn set_title(self, title: impl Into<String>) -> Self {
    WindowOpt {
      title: title.into(),
      ..self
    }
  }

  /// Get the window title.
  #[inline]
  pub fn title(&self) -> &str {
    &self.title
  }

  /// Set the dimension of the window.
  #[inline]
  pub fn set_dim(self, dim: WindowDim) -> Self {
    WindowOpt { dim, ..self }
  }

  /// Get the dimension of the window.
  #[inline]
  pub fn dim(&self) -> WindowDim {
    self.dim
  }

  /// Whether an OpenGL context is created along with the window.
  #[inline]
  pub fn set_opengl(self, opengl: bool) -> Self {
    WindowOpt { opengl, ..self }
  }

  /// Whether an OpenGL context is created along with the window.
  #[inline]
  pub fn opengl(&self) -> bool {
    self.opengl
  }

  /// Set the requested OpenGL version and profile.
  #[inline]
  pub fn set_gl_version(self, major: u8, minor: u8, profile: GlProfile) -> Self {
    WindowOpt {
      gl_version: (major, minor),
      gl_profile: profile,
      ..self
    }
  }

  /// Requested OpenGL version, as `(major, minor)`.
  #[inline]
  pub fn gl_version(&self) -> (u8, u8) {
    self.gl_version
  }

  /// Requested OpenGL profile.
  #[inline]
  pub fn gl_profile(&self) -> GlProfile {
    self.gl_profile
  }

  /// Allow the user to resize the window.
  #[inline]
  pub fn set_resizable(self, resizable: bool) -> Self {
    WindowOpt { resizable, ..self }
  }

  /// Whether the user can resize the window.
  #[inline]
  pub fn resizable(&self) -> bool {
    self.resizable
  }

  /// Create the window hidden; mostly useful for tests.
  #[inline]
  pub fn set_hidden(self, hidden: bool) -> Self {
    WindowOpt { hidden, ..self }
  }

  /// Whether the window is created hidden.
  #[inline]
  pub fn hidden(&self) -> bool {
    self.hidden
  }

  /// Synchronize buffer swaps with the vertical refresh.
  #[inline]
  pub fn set_vsync(self, vsync: bool) -> Self {
    WindowOpt { vsync, ..self }
  }

  /// Whether buffer swaps wait for the vertical refresh.
  #[inline]
  pub fn vsync(&self) -> bool {
    self.vsync
  }

  /// Set the number of bits of the depth buffer.
  #[inline]
  pub fn set_depth_size(self, depth_size: u8) -> Self {
    WindowOpt { depth_size, ..self }
  }

  /// Number of bits of the depth buffer.
  #[inline]
  pub fn depth_size(&self) -> u8 {
    self.depth_size
  }

  /// Set the number of samples to use for multisampling.
  ///
  /// Pass `None` to disable multisampling.
  #[inline]
  pub fn set_num_samples<S>(self, samples: S) -> Self
  where
    S: Into<Option<u8>>,
  {
    WindowOpt {
      num_samples: samples.into(),
      ..self
    }
  }

  /// Get the number of samples to use in multisampling, if any.
  #[inline]
  pub fn num_samples(&self) -> Option<u8> {
    self.num_samples
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let opt = WindowOpt::default();

    assert_eq!(
      opt.dim(),
      WindowDim::Windowed {
        width: 640,
        height: 480
      }
    );
    assert!(opt.opengl());
    assert_eq!(opt.gl_version(), (3, 3));
    assert_eq!(opt.gl_profile(), GlProfile::Core);
    assert!(opt.vsync());
    assert_eq!(opt.num_samples(), None);
  }

  #[test]
  fn builder_keeps_other_fields() {
    let opt = WindowOpt::default()
      .set_title("Game")
      .set_dim(WindowDim::FullscreenDesktop)
      .set_num_samples(4)
      .set_vsync(false);

    assert_eq!(opt.title(), "Game");
    assert_eq!(opt.dim(), WindowDim::FullscreenDesktop);
    assert_eq!(opt.num_samples(), Some(4));
    assert!(!opt.vsync());
    assert_eq!(opt.depth_size(), 24);
    assert!(!opt.resizable());
  }

  #[test]
  fn disable_multisampling() {
    let opt = WindowOpt::default().set_num_samples(8).set_num_samples(None);
    assert_eq!(opt.num_samples(), None);
  }
}
