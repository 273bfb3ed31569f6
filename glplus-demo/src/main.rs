//! Spinning textured cube.
//!
//! Press <V> to toggle stereo rendering with barrel distortion, <escape> to quit or close the
//! window.

mod camera;
mod distortion;
mod scene;
mod vr;

use crate::camera::{spin, Camera};
use crate::distortion::{Eye, HmdInfo};
use crate::scene::Scene;
use crate::vr::{DistortionPass, StereoTarget};
use glplus::{
  clear, set_clear_color, set_depth_test, set_viewport, ClearMask, ScopedFrameBufferBind,
};
use glplus_sdl2::sdl2::event::{Event, WindowEvent};
use glplus_sdl2::sdl2::keyboard::Keycode;
use glplus_sdl2::{LibSdl, Window, WindowDim, WindowOpt};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "glplus-demo")]
pub struct Opts {
  #[structopt(short, long, parse(from_os_str))]
  /// OBJ file to display instead of the built-in cube.
  mesh: Option<PathBuf>,

  #[structopt(short, long, parse(from_os_str))]
  /// Image to texture the mesh with.
  texture: Option<PathBuf>,

  #[structopt(long)]
  /// Start in stereo mode.
  vr: bool,

  #[structopt(long, default_value = "1280")]
  width: u32,

  #[structopt(long, default_value = "800")]
  height: u32,

  #[structopt(long, default_value = "60")]
  /// Frame rate cap.
  fps: u32,

  #[structopt(long)]
  fullscreen: bool,

  #[structopt(long)]
  no_vsync: bool,
}

impl Opts {
  fn window_opt(&self) -> WindowOpt {
    let dim = if self.fullscreen {
      WindowDim::FullscreenDesktop
    } else {
      WindowDim::Windowed {
        width: self.width,
        height: self.height,
      }
    };

    WindowOpt::default()
      .set_title("glplus demo")
      .set_dim(dim)
      .set_resizable(true)
      .set_vsync(!self.no_vsync)
  }

  /// Milliseconds to wait after each frame.
  fn frame_delay(&self) -> u32 {
    1000 / self.fps.max(1)
  }
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let opts = Opts::from_args();

  if let Err(e) = run(opts) {
    log::error!("fatal error: {}", e);
    process::exit(1);
  }
}

fn run(opts: Opts) -> Result<(), Box<dyn Error>> {
  let mut sdl = LibSdl::init()?;
  let window = Window::new(&sdl, &opts.window_opt())?;
  let mut event_pump = sdl.event_pump()?;

  let scene = Scene::new(opts.mesh.as_deref(), opts.texture.as_deref())?;
  let distortion = DistortionPass::new()?;
  let camera = Camera::default();
  let hmd = HmdInfo::default();

  let mut vr = opts.vr;
  let mut stereo_target: Option<StereoTarget> = None;
  let start = sdl.ticks();

  set_clear_color([0.1, 0.1, 0.1, 1.])?;

  'app: loop {
    for event in event_pump.poll_iter() {
      match event {
        Event::Quit { .. }
        | Event::KeyUp {
          keycode: Some(Keycode::Escape),
          ..
        } => break 'app,

        Event::KeyDown {
          keycode: Some(Keycode::V),
          repeat: false,
          ..
        } => {
          vr = !vr;
          log::info!("stereo rendering {}", if vr { "on" } else { "off" });
        }

        Event::Window {
          win_event: WindowEvent::SizeChanged(..),
          ..
        } => {
          // rebuilt at the new size the next time it’s needed
          stereo_target = None;
        }

        _ => (),
      }
    }

    let [width, height] = window.drawable_size();

    // minimized: nothing to draw into
    if width == 0 || height == 0 {
      sdl.delay(opts.frame_delay());
      continue;
    }

    let t = sdl.ticks().wrapping_sub(start) as f32 * 1e-3;
    let model = spin(t);

    if vr {
      if stereo_target.is_none() {
        if let Some([w, h]) = stereo_target_size(width, height, hmd.distortion_scale()) {
          stereo_target = Some(StereoTarget::new(w, h)?);
        }
      }

      if let Some(ref target) = stereo_target {
        render_stereo(&scene, &distortion, target, &camera, &hmd, model, width, height)?;
      }
    } else {
      set_viewport(0, 0, width, height)?;
      set_depth_test(true)?;
      clear(ClearMask::COLOR | ClearMask::DEPTH)?;

      let aspect = width as f32 / height.max(1) as f32;
      scene.render(camera.projection(aspect), camera.view(), model)?;
    }

    window.gl_swap_window()?;
    sdl.delay(opts.frame_delay());
  }

  log::info!("bye");

  Ok(())
}

/// Size of the offscreen stereo target for a `width`×`height` window, or [`None`] if the window
/// has no drawable area.
///
/// The target is rendered at the distorted size so that the centre of the lens keeps a 1:1 texel
/// ratio.
fn stereo_target_size(width: u32, height: u32, distortion_scale: f32) -> Option<[u32; 2]> {
  if width == 0 || height == 0 {
    return None;
  }

  let w = (width as f32 * distortion_scale).ceil() as u32;
  let h = (height as f32 * distortion_scale).ceil() as u32;

  Some([w, h])
}

#[allow(clippy::too_many_arguments)]
fn render_stereo(
  scene: &Scene,
  distortion: &DistortionPass,
  target: &StereoTarget,
  camera: &Camera,
  hmd: &HmdInfo,
  model: cgmath::Matrix4<f32>,
  width: u32,
  height: u32,
) -> Result<(), Box<dyn Error>> {
  {
    let _fb_bind = ScopedFrameBufferBind::new(target.framebuffer())?;
    let [target_w, target_h] = target.size();

    set_viewport(0, 0, target_w, target_h)?;
    set_depth_test(true)?;
    clear(ClearMask::COLOR | ClearMask::DEPTH)?;

    for eye in Eye::BOTH {
      let (x, y, w, h) = eye.pixel_viewport(target_w, target_h);
      set_viewport(x, y, w, h)?;
      scene.render(
        camera.eye_projection(hmd, eye),
        camera.eye_view(hmd, eye),
        model,
      )?;
    }
  }

  set_viewport(0, 0, width, height)?;
  set_depth_test(false)?;
  clear(ClearMask::COLOR)?;

  let window_aspect = width as f32 / height.max(1) as f32;

  for eye in Eye::BOTH {
    let (x, y, w, h) = eye.pixel_viewport(width, height);
    set_viewport(x, y, w, h)?;
    distortion.render(target, eye, &hmd.eye_distortion(eye, window_aspect))?;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let opts = Opts::from_iter(&["glplus-demo"]);

    assert_eq!(opts.mesh, None);
    assert!(!opts.vr);
    assert_eq!(opts.fps, 60);
    assert_eq!(opts.frame_delay(), 16);

    let window = opts.window_opt();
    assert_eq!(
      window.dim(),
      WindowDim::Windowed {
        width: 1280,
        height: 800
      }
    );
    assert!(window.vsync());
  }

  #[test]
  fn all_options() {
    let opts = Opts::from_iter(&[
      "glplus-demo",
      "--mesh",
      "suzanne.obj",
      "-t",
      "wood.png",
      "--vr",
      "--fps",
      "30",
      "--fullscreen",
      "--no-vsync",
    ]);

    assert_eq!(opts.mesh, Some(PathBuf::from("suzanne.obj")));
    assert_eq!(opts.texture, Some(PathBuf::from("wood.png")));
    assert!(opts.vr);
    assert_eq!(opts.frame_delay(), 33);

    let window = opts.window_opt();
    assert_eq!(window.dim(), WindowDim::FullscreenDesktop);
    assert!(!window.vsync());
  }

  #[test]
  fn zero_fps_does_not_divide_by_zero() {
    let opts = Opts::from_iter(&["glplus-demo", "--fps", "0"]);
    assert_eq!(opts.frame_delay(), 1000);
  }

  #[test]
  fn minimized_window_has_no_stereo_target() {
    assert_eq!(stereo_target_size(0, 0, 1.5), None);
    assert_eq!(stereo_target_size(1280, 0, 1.5), None);
    assert_eq!(stereo_target_size(0, 800, 1.5), None);
  }

  #[test]
  fn stereo_target_is_scaled_up() {
    assert_eq!(stereo_target_size(1280, 800, 1.5), Some([1920, 1200]));
    assert_eq!(stereo_target_size(3, 3, 1.5), Some([5, 5]));
  }
}
