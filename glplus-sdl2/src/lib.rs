//! [SDL2](https://crates.io/crates/sdl2) windows and OpenGL contexts for
//! [glplus](https://crates.io/crates/glplus).
//!
//! ```ignore
//! use glplus_sdl2::{LibSdl, Window, WindowOpt};
//!
//! let sdl = LibSdl::init()?;
//! let window = Window::new(&sdl, &WindowOpt::default().set_title("Game"))?;
//! ```

#![deny(missing_docs)]

mod opt;

pub use opt::{GlProfile, WindowDim, WindowOpt};
pub use sdl2;

use std::os::raw::c_void;
use std::{error, fmt};

/// Error that can be risen while initializing SDL or creating a window.
#[non_exhaustive]
#[derive(Debug)]
pub enum Sdl2Error {
  /// Initialization of SDL went wrong.
  InitError(String),
  /// No available video mode.
  VideoInitError(String),
  /// The timer subsystem is not available.
  TimerInitError(String),
  /// The event pump could not be obtained.
  EventPumpError(String),
  /// Window creation failed.
  WindowCreationFailed(sdl2::video::WindowBuildError),
  /// Failed to create an OpenGL context.
  GlContextInitFailed(String),
  /// The swap interval could not be set.
  SwapIntervalFailed(String),
  /// An OpenGL operation was requested on a window created without OpenGL.
  NotAGlWindow,
}

impl fmt::Display for Sdl2Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      Sdl2Error::InitError(ref e) => write!(f, "initialization error: {}", e),
      Sdl2Error::VideoInitError(ref e) => write!(f, "failed to initialize video system: {}", e),
      Sdl2Error::TimerInitError(ref e) => write!(f, "failed to initialize timer system: {}", e),
      Sdl2Error::EventPumpError(ref e) => write!(f, "failed to get event pump: {}", e),
      Sdl2Error::WindowCreationFailed(ref e) => write!(f, "failed to create window: {}", e),
      Sdl2Error::GlContextInitFailed(ref e) => {
        write!(f, "failed to create OpenGL context: {}", e)
      }
      Sdl2Error::SwapIntervalFailed(ref e) => write!(f, "failed to set swap interval: {}", e),
      Sdl2Error::NotAGlWindow => f.write_str("OpenGL operation used on a non-OpenGL window"),
    }
  }
}

impl error::Error for Sdl2Error {}

/// OpenGL context attributes, applied to the next created context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GlAttribute {
  /// Major version of the context.
  ContextMajorVersion(u8),
  /// Minor version of the context.
  ContextMinorVersion(u8),
  /// Profile of the context.
  ContextProfile(GlProfile),
  /// Request a forward compatible context.
  ForwardCompatible,
  /// Double buffering.
  DoubleBuffer(bool),
  /// Bits of the depth buffer.
  DepthSize(u8),
  /// Bits of the stencil buffer.
  StencilSize(u8),
  /// Number of multisample buffers.
  MultisampleBuffers(u8),
  /// Number of samples per pixel.
  MultisampleSamples(u8),
}

/// The SDL library, initialized with its video and timer subsystems.
///
/// SDL is shut down when this value and every window created from it are dropped.
pub struct LibSdl {
  sdl: sdl2::Sdl,
  video: sdl2::VideoSubsystem,
  timer: sdl2::TimerSubsystem,
}

impl LibSdl {
  /// Initialize SDL.
  pub fn init() -> Result<Self, Sdl2Error> {
    let sdl = sdl2::init().map_err(Sdl2Error::InitError)?;
    let video = sdl.video().map_err(Sdl2Error::VideoInitError)?;
    let timer = sdl.timer().map_err(Sdl2Error::TimerInitError)?;

    log::info!("SDL {} initialized", sdl2::version::version());

    Ok(LibSdl { sdl, video, timer })
  }

  /// Set an OpenGL context attribute.
  ///
  /// Attributes must be set before the window is created to have any effect.
  pub fn set_gl_attribute(&self, attribute: GlAttribute) {
    let gl_attr = self.video.gl_attr();

    log::debug!("setting {:?}", attribute);

    match attribute {
      GlAttribute::ContextMajorVersion(major) => gl_attr.set_context_major_version(major),
      GlAttribute::ContextMinorVersion(minor) => gl_attr.set_context_minor_version(minor),
      GlAttribute::ContextProfile(GlProfile::Core) => {
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core)
      }
      GlAttribute::ContextProfile(GlProfile::Compatibility) => {
        gl_attr.set_context_profile(sdl2::video::GLProfile::Compatibility)
      }
      GlAttribute::ForwardCompatible => gl_attr.set_context_flags().forward_compatible().set(),
      GlAttribute::DoubleBuffer(enabled) => gl_attr.set_double_buffer(enabled),
      GlAttribute::DepthSize(bits) => gl_attr.set_depth_size(bits),
      GlAttribute::StencilSize(bits) => gl_attr.set_stencil_size(bits),
      GlAttribute::MultisampleBuffers(n) => gl_attr.set_multisample_buffers(n),
      GlAttribute::MultisampleSamples(n) => gl_attr.set_multisample_samples(n),
    }
  }

  /// Get the event pump.
  ///
  /// Only one event pump can exist at a time.
  pub fn event_pump(&self) -> Result<sdl2::EventPump, Sdl2Error> {
    self.sdl.event_pump().map_err(Sdl2Error::EventPumpError)
  }

  /// Milliseconds elapsed since SDL was initialized.
  pub fn ticks(&mut self) -> u32 {
    self.timer.ticks()
  }

  /// Sleep for `ms` milliseconds.
  pub fn delay(&mut self, ms: u32) {
    self.timer.delay(ms)
  }

  /// The entry point to most of the SDL2 API.
  pub fn sdl(&self) -> &sdl2::Sdl {
    &self.sdl
  }

  /// The video subsystem.
  pub fn video(&self) -> &sdl2::VideoSubsystem {
    &self.video
  }
}

/// An SDL2 window, with its OpenGL context if it was created with one.
pub struct Window {
  // declared first so that the context is dropped before the window it was created for
  gl_context: Option<sdl2::video::GLContext>,
  window: sdl2::video::Window,
}

impl Window {
  /// Create a window.
  ///
  /// If `opt` asks for OpenGL, the context attributes from `opt` are applied, the context is
  /// created and made current, and the OpenGL entry points are loaded.
  pub fn new(sdl: &LibSdl, opt: &WindowOpt) -> Result<Self, Sdl2Error> {
    if opt.opengl() {
      let (major, minor) = opt.gl_version();

      sdl.set_gl_attribute(GlAttribute::ContextMajorVersion(major));
      sdl.set_gl_attribute(GlAttribute::ContextMinorVersion(minor));
      sdl.set_gl_attribute(GlAttribute::ContextProfile(opt.gl_profile()));

      if opt.gl_profile() == GlProfile::Core {
        sdl.set_gl_attribute(GlAttribute::ForwardCompatible);
      }

      sdl.set_gl_attribute(GlAttribute::DoubleBuffer(true));
      sdl.set_gl_attribute(GlAttribute::DepthSize(opt.depth_size()));

      if let Some(samples) = opt.num_samples() {
        sdl.set_gl_attribute(GlAttribute::MultisampleBuffers(1));
        sdl.set_gl_attribute(GlAttribute::MultisampleSamples(samples));
      }
    }

    let (width, height) = match opt.dim() {
      WindowDim::Windowed { width, height } => (width, height),
      WindowDim::FullscreenDesktop => (0, 0),
    };

    let mut builder = sdl.video.window(opt.title(), width, height);
    builder.position_centered();

    if opt.opengl() {
      builder.opengl();
    }

    if opt.resizable() {
      builder.resizable();
    }

    if opt.hidden() {
      builder.hidden();
    }

    if opt.dim() == WindowDim::FullscreenDesktop {
      builder.fullscreen_desktop();
    }

    let window = builder.build().map_err(Sdl2Error::WindowCreationFailed)?;

    let gl_context = if opt.opengl() {
      let context = window
        .gl_create_context()
        .map_err(Sdl2Error::GlContextInitFailed)?;

      gl::load_with(|s| sdl.video.gl_get_proc_address(s) as *const c_void);

      let interval = if opt.vsync() {
        sdl2::video::SwapInterval::VSync
      } else {
        sdl2::video::SwapInterval::Immediate
      };

      if let Err(e) = sdl.video.gl_set_swap_interval(interval) {
        // not every driver lets us pick; rendering still works without it
        log::warn!("{}", Sdl2Error::SwapIntervalFailed(e));
      }

      log::info!(
        "created OpenGL {}.{} {:?} context for window \"{}\"",
        opt.gl_version().0,
        opt.gl_version().1,
        opt.gl_profile(),
        opt.title()
      );

      Some(context)
    } else {
      None
    };

    Ok(Window { gl_context, window })
  }

  /// Move the window.
  pub fn set_position(&mut self, x: i32, y: i32) {
    self.window.set_position(
      sdl2::video::WindowPos::Positioned(x),
      sdl2::video::WindowPos::Positioned(y),
    );
  }

  /// Width of the window, in screen coordinates.
  pub fn width(&self) -> u32 {
    self.window.size().0
  }

  /// Height of the window, in screen coordinates.
  pub fn height(&self) -> u32 {
    self.window.size().1
  }

  /// Size of the drawable area, in pixels.
  ///
  /// It differs from the window size on high-DPI displays.
  pub fn drawable_size(&self) -> [u32; 2] {
    let (w, h) = self.window.drawable_size();
    [w, h]
  }

  /// Swap the back and front buffers.
  pub fn gl_swap_window(&self) -> Result<(), Sdl2Error> {
    if self.gl_context.is_none() {
      return Err(Sdl2Error::NotAGlWindow);
    }

    self.window.gl_swap_window();

    Ok(())
  }

  /// Borrow the underlying SDL2 window.
  pub fn sdl_window(&self) -> &sdl2::video::Window {
    &self.window
  }

  /// Mutably borrow the underlying SDL2 window.
  pub fn sdl_window_mut(&mut self) -> &mut sdl2::video::Window {
    &mut self.window
  }
}
