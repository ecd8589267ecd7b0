//! Projection and view matrices
//!
//! All projections use wgpu's 0..1 clip depth.

use glam::{Mat4, Vec3};

/// Camera circling a target at a fixed radius and height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    pub height: f32,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 10.0,
            height: 0.0,
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl OrbitCamera {
    pub const MIN_RADIUS: f32 = 2.0;
    pub const MAX_RADIUS: f32 = 50.0;

    /// Eye position after `t` radians around the Y axis
    pub fn eye(&self, t: f32) -> Vec3 {
        Vec3::new(t.sin() * self.radius, self.height, t.cos() * self.radius)
    }

    pub fn view(&self, t: f32) -> Mat4 {
        Mat4::look_at_rh(self.eye(t), self.target, self.up)
    }

    /// Move closer or further, kept within `MIN_RADIUS..=MAX_RADIUS`
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius + delta).clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
    }
}

pub fn perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y_deg.to_radians(), aspect, near, far)
}

/// Pixel coordinates with the origin at the top-left, y growing down
pub fn screen_ortho(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
}

/// Pixel coordinates with the origin at the bottom-left, y growing up
pub fn ortho_y_up(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, 0.0, height, -1.0, 1.0)
}

/// Translate, then rotate `angle_deg` around `axis`
pub fn model_matrix(position: Vec3, angle_deg: f32, axis: Vec3) -> Mat4 {
    let axis = axis.try_normalize().unwrap_or(Vec3::X);
    Mat4::from_translation(position) * Mat4::from_axis_angle(axis, angle_deg.to_radians())
}
