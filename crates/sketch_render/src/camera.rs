//! Orbit camera

use crate::renderer::Renderer;
use glam::{Mat4, Vec3};
use sketch_core::math::{clamp, deg_to_rad};

const PITCH_LIMIT_DEG: f32 = 89.0;

/// Camera circling a target at a fixed distance.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    target: Vec3,
    distance: f32,
    yaw_deg: f32,
    pitch_deg: f32,
    fov_deg: f32,
    near: f32,
    far: f32,
    active: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 400.0,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            fov_deg: 60.0,
            near: 1.0,
            far: 10_000.0,
            active: false,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.max(0.01);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Absolute orientation; pitch is clamped short of the poles.
    pub fn set_orbit(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw_deg = yaw_deg;
        self.pitch_deg = clamp(pitch_deg, -PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    pub fn orbit(&mut self, delta_yaw_deg: f32, delta_pitch_deg: f32) {
        self.set_orbit(self.yaw_deg + delta_yaw_deg, self.pitch_deg + delta_pitch_deg);
    }

    pub fn zoom(&mut self, factor: f32) {
        if factor > 0.0 {
            self.set_distance(self.distance * factor);
        }
    }

    pub fn set_fov(&mut self, fov_deg: f32) {
        self.fov_deg = clamp(fov_deg, 1.0, 179.0);
    }

    pub fn fov(&self) -> f32 {
        self.fov_deg
    }

    pub fn set_near_far(&mut self, near: f32, far: f32) {
        self.near = near.max(1e-4);
        self.far = far.max(self.near + 1e-3);
    }

    pub fn reset(&mut self) {
        *self = Self {
            active: self.active,
            ..Self::default()
        };
    }

    pub fn position(&self) -> Vec3 {
        let (yaw, pitch) = (deg_to_rad(self.yaw_deg), deg_to_rad(self.pitch_deg));
        let offset = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
        self.target + offset * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(deg_to_rad(self.fov_deg), aspect.max(1e-4), self.near, self.far)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self, renderer: &mut Renderer) {
        let projection = self.projection_matrix(renderer.viewport().aspect());
        renderer.begin_camera(self.view_matrix(), projection);
        self.active = true;
    }

    pub fn end(&mut self, renderer: &mut Renderer) {
        if !self.active {
            tracing::warn!("camera end without begin");
            return;
        }
        renderer.end_camera();
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = OrbitCamera::new();
        assert!(camera.position().distance(Vec3::new(0.0, 0.0, 400.0)) < 1e-3);
        let eye_space = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((eye_space.z + 400.0).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = OrbitCamera::new();
        camera.orbit(90.0, 120.0);
        camera.set_distance(10.0);
        let position = camera.position();
        assert!(position.y < 10.0 && position.y > 9.9);
    }

    #[test]
    fn begin_end_restores_projection() {
        let mut renderer = Renderer::default();
        let before = renderer.projection();
        let mut camera = OrbitCamera::new();
        camera.begin(&mut renderer);
        assert_ne!(renderer.projection(), before);
        camera.end(&mut renderer);
        assert_eq!(renderer.projection(), before);
        assert_eq!(renderer.fault_count(), 0);
    }
}
