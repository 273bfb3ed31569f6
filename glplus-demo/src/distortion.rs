//! Barrel distortion compensating the pincushion effect of HMD lenses.
//!
//! The render target is drawn per eye through a shader applying
//! `r' = r * (k0 + k1 r² + k2 r⁴ + k3 r⁶)` around the lens centre. Lengths are in metres;
//! viewports and texture coordinates are normalized to `[0; 1]` over the whole window.

/// Physical description of a head-mounted display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HmdInfo {
  /// Horizontal resolution of the whole screen, in pixels.
  pub h_resolution: u32,
  /// Vertical resolution, in pixels.
  pub v_resolution: u32,
  pub h_screen_size: f32,
  pub v_screen_size: f32,
  pub eye_to_screen_distance: f32,
  /// Distance between the centres of the two lenses.
  pub lens_separation_distance: f32,
  pub interpupillary_distance: f32,
  /// Radial distortion coefficients.
  pub distortion_k: [f32; 4],
}

impl Default for HmdInfo {
  /// Oculus Rift DK1.
  fn default() -> Self {
    HmdInfo {
      h_resolution: 1280,
      v_resolution: 800,
      h_screen_size: 0.14976,
      v_screen_size: 0.0936,
      eye_to_screen_distance: 0.041,
      lens_separation_distance: 0.0635,
      interpupillary_distance: 0.064,
      distortion_k: [1.0, 0.22, 0.24, 0.0],
    }
  }
}

/// Which half of the screen.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Eye {
  Left,
  Right,
}

impl Eye {
  pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

  /// `1` for the left eye, `-1` for the right one.
  pub fn sign(self) -> f32 {
    match self {
      Eye::Left => 1.,
      Eye::Right => -1.,
    }
  }

  /// Normalized `[x, y, w, h]` viewport of the eye.
  pub fn viewport(self) -> [f32; 4] {
    match self {
      Eye::Left => [0., 0., 0.5, 1.],
      Eye::Right => [0.5, 0., 0.5, 1.],
    }
  }

  /// Viewport of the eye in a `width`×`height` pixel surface.
  pub fn pixel_viewport(self, width: u32, height: u32) -> (i32, i32, u32, u32) {
    let half = width / 2;

    match self {
      Eye::Left => (0, 0, half, height),
      Eye::Right => (half as i32, 0, width - half, height),
    }
  }
}

/// Uniforms of the distortion shader for one eye.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeDistortion {
  pub lens_center: [f32; 2],
  pub screen_center: [f32; 2],
  pub scale: [f32; 2],
  pub scale_in: [f32; 2],
  pub hmd_warp_param: [f32; 4],
}

#[cfg(test)]
impl EyeDistortion {
  /// CPU version of `hmd_warp` in `distortion-fs.glsl`.
  pub fn warp(&self, uv: [f32; 2]) -> [f32; 2] {
    let theta = [
      (uv[0] - self.lens_center[0]) * self.scale_in[0],
      (uv[1] - self.lens_center[1]) * self.scale_in[1],
    ];
    let r_sq = theta[0] * theta[0] + theta[1] * theta[1];
    let k = self.hmd_warp_param;
    let factor = k[0] + r_sq * (k[1] + r_sq * (k[2] + r_sq * k[3]));

    [
      self.lens_center[0] + self.scale[0] * theta[0] * factor,
      self.lens_center[1] + self.scale[1] * theta[1] * factor,
    ]
  }
}

impl HmdInfo {
  /// Horizontal offset of the lens centre from the eye viewport centre, in `[-1; 1]` viewport
  /// units. Positive means towards the nose for the left eye.
  pub fn lens_center_offset(&self) -> f32 {
    1. - 2. * self.lens_separation_distance / self.h_screen_size
  }

  /// Radial distortion polynomial.
  pub fn distort(&self, r: f32) -> f32 {
    let k = self.distortion_k;
    let r_sq = r * r;

    r * (k[0] + r_sq * (k[1] + r_sq * (k[2] + r_sq * k[3])))
  }

  /// How much the rendered image must be scaled so that the distorted image still fills the
  /// viewport up to its outer edge.
  pub fn distortion_scale(&self) -> f32 {
    let fit_radius = -1. - self.lens_center_offset();
    self.distort(fit_radius) / fit_radius
  }

  /// Vertical field of view of each eye, in radians.
  pub fn vertical_fov(&self) -> f32 {
    let half_screen = self.v_screen_size * self.distortion_scale() / 2.;
    2. * (half_screen / self.eye_to_screen_distance).atan()
  }

  /// Aspect ratio of each eye.
  pub fn eye_aspect_ratio(&self) -> f32 {
    self.h_resolution as f32 / (2. * self.v_resolution as f32)
  }

  /// Shader parameters for `eye`, for a window whose aspect ratio is `window_aspect`.
  pub fn eye_distortion(&self, eye: Eye, window_aspect: f32) -> EyeDistortion {
    let [x, y, w, h] = eye.viewport();
    let center_offset = eye.sign() * self.lens_center_offset();
    let aspect = w * window_aspect / h;
    let scale_factor = 1. / self.distortion_scale();

    EyeDistortion {
      lens_center: [x + (w + center_offset * 0.5) * 0.5, y + h * 0.5],
      screen_center: [x + w * 0.5, y + h * 0.5],
      scale: [
        (w / 2.) * scale_factor,
        (h / 2.) * scale_factor * aspect,
      ],
      scale_in: [2. / w, (2. / h) / aspect],
      hmd_warp_param: self.distortion_k,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-4, "{} != {}", a, b);
  }

  #[test]
  fn dk1_lens_offset_and_scale() {
    let hmd = HmdInfo::default();

    assert_close(hmd.lens_center_offset(), 0.15198);
    assert_close(hmd.distortion_scale(), 1.71461);
    assert_close(hmd.eye_aspect_ratio(), 0.8);
  }

  #[test]
  fn vertical_fov_grows_with_distortion() {
    let hmd = HmdInfo::default();
    let undistorted = HmdInfo {
      distortion_k: [1., 0., 0., 0.],
      ..hmd
    };

    assert_close(undistorted.distortion_scale(), 1.);
    assert!(hmd.vertical_fov() > undistorted.vertical_fov());
    assert_close(
      undistorted.vertical_fov(),
      2. * (0.0936f32 / 2. / 0.041).atan(),
    );
  }

  #[test]
  fn lens_centers_point_to_the_nose() {
    let hmd = HmdInfo::default();
    let left = hmd.eye_distortion(Eye::Left, 1.6);
    let right = hmd.eye_distortion(Eye::Right, 1.6);

    assert_close(left.screen_center[0], 0.25);
    assert_close(right.screen_center[0], 0.75);
    assert!(left.lens_center[0] > left.screen_center[0]);
    assert!(right.lens_center[0] < right.screen_center[0]);
    assert_close(left.lens_center[0] - 0.25, 0.75 - right.lens_center[0]);
    assert_close(left.lens_center[1], 0.5);
  }

  #[test]
  fn lens_center_is_a_fixed_point() {
    let eye = HmdInfo::default().eye_distortion(Eye::Left, 1.6);
    let warped = eye.warp(eye.lens_center);

    assert_close(warped[0], eye.lens_center[0]);
    assert_close(warped[1], eye.lens_center[1]);
  }

  #[test]
  fn outer_edge_fits_the_viewport() {
    let hmd = HmdInfo::default();
    let eye = hmd.eye_distortion(Eye::Left, 1.6);

    // the outer edge of the left eye, on the lens axis, lands back on the outer edge
    let warped = eye.warp([0., eye.lens_center[1]]);
    assert_close(warped[0], 0.);
  }

  #[test]
  fn pixel_viewports_cover_the_surface() {
    assert_eq!(Eye::Left.pixel_viewport(801, 600), (0, 0, 400, 600));
    assert_eq!(Eye::Right.pixel_viewport(801, 600), (400, 0, 401, 600));
  }
}
