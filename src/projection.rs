//! Perspective projection parameters.
//!
//! [`Projection`] owns FOV, aspect ratio, and the near/far distances, and
//! derives both the projection matrix and the view-space frustum used for
//! clipping, so the two can never drift apart.

use crate::clipping::Frustum;
use crate::math::mat4::Mat4;

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Width divided by height.
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
}

impl Projection {
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Horizontal field of view, derived from the vertical FOV and aspect.
    pub fn fov_x(&self) -> f32 {
        2.0 * (self.aspect_ratio * (self.fov_y / 2.0).tan()).atan()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Called on window resize.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Left-handed perspective projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }

    /// View-space frustum planes matching [`Projection::matrix`].
    pub fn frustum(&self) -> Frustum {
        Frustum::new(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}
