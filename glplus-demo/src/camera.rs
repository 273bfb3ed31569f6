//! Projection and view matrices, for a single view or a stereo pair.

use crate::distortion::{Eye, HmdInfo};
use cgmath::{perspective, Matrix4, Point3, Rad, Vector3};

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.;

/// Camera looking at the origin from `distance` units along +Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
  pub fovy: Rad<f32>,
  pub distance: f32,
}

impl Default for Camera {
  fn default() -> Self {
    Camera {
      fovy: Rad(std::f32::consts::FRAC_PI_3),
      distance: 4.,
    }
  }
}

impl Camera {
  pub fn projection(&self, aspect_ratio: f32) -> Matrix4<f32> {
    perspective(self.fovy, aspect_ratio, Z_NEAR, Z_FAR)
  }

  pub fn view(&self) -> Matrix4<f32> {
    Matrix4::look_at_rh(
      Point3::new(0., 0., self.distance),
      Point3::new(0., 0., 0.),
      Vector3::unit_y(),
    )
  }

  /// Projection of one eye of `hmd`.
  ///
  /// The projection centre is shifted so that it lines up with the lens centre.
  pub fn eye_projection(&self, hmd: &HmdInfo, eye: Eye) -> Matrix4<f32> {
    let offset = eye.sign() * hmd.lens_center_offset();
    let projection = perspective(Rad(hmd.vertical_fov()), hmd.eye_aspect_ratio(), Z_NEAR, Z_FAR);

    Matrix4::from_translation(Vector3::new(offset, 0., 0.)) * projection
  }

  /// View of one eye of `hmd`, half the interpupillary distance away from the centre.
  pub fn eye_view(&self, hmd: &HmdInfo, eye: Eye) -> Matrix4<f32> {
    let half_ipd = eye.sign() * hmd.interpupillary_distance * 0.5;

    Matrix4::from_translation(Vector3::new(half_ipd, 0., 0.)) * self.view()
  }
}

/// Model matrix of the cube after `t` seconds.
pub fn spin(t: f32) -> Matrix4<f32> {
  Matrix4::from_angle_y(Rad(t)) * Matrix4::from_angle_x(Rad(t * 0.5))
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{SquareMatrix, Vector4};

  fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-4, "{} != {}", a, b);
  }

  #[test]
  fn view_moves_the_world_away() {
    let origin = Camera::default().view() * Vector4::new(0., 0., 0., 1.);

    assert_close(origin.x, 0.);
    assert_close(origin.z, -4.);
  }

  #[test]
  fn eyes_are_ipd_apart() {
    let camera = Camera::default();
    let hmd = HmdInfo::default();
    let point = Vector4::new(0., 0., 0., 1.);

    let left = camera.eye_view(&hmd, Eye::Left) * point;
    let right = camera.eye_view(&hmd, Eye::Right) * point;

    assert_close(left.x - right.x, hmd.interpupillary_distance);
    assert_close(left.z, right.z);
  }

  #[test]
  fn eye_projections_are_mirrored() {
    let camera = Camera::default();
    let hmd = HmdInfo::default();
    let point = Vector4::new(0., 0., -4., 1.);

    let left = camera.eye_projection(&hmd, Eye::Left) * point;
    let right = camera.eye_projection(&hmd, Eye::Right) * point;

    assert_close(left.x / left.w, hmd.lens_center_offset());
    assert_close(right.x / right.w, -hmd.lens_center_offset());
    assert_close(left.y / left.w, right.y / right.w);
  }

  #[test]
  fn no_spin_at_start() {
    assert_eq!(spin(0.), Matrix4::identity());
  }
}
