//! Camera types shared by the frontends.
//!
//! These intentionally avoid platform-specific APIs; the web and native
//! renderers consume them to build view/projection matrices.

use glam::{Mat4, Vec2, Vec3};

use crate::constants::{
    CAMERA_HEIGHT, CAMERA_HEIGHT_SPAN, CAMERA_RADIUS, CAMERA_SMOOTHING, CAMERA_YAW_SPAN,
};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Smoothed orbit around the scene center, driven by normalized pointer or
/// device-tilt input. The eye exponentially approaches the desired position
/// with a fixed per-frame rate, so settle time follows the refresh rate
/// rather than wall-clock time.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub base_height: f32,
    pub eye: Vec3,
    pub smoothing: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3) -> Self {
        let eye = target + Vec3::new(0.0, CAMERA_HEIGHT, CAMERA_RADIUS);
        Self {
            target,
            radius: CAMERA_RADIUS,
            base_height: CAMERA_HEIGHT,
            eye,
            smoothing: CAMERA_SMOOTHING,
        }
    }

    /// Desired eye for a given drive signal in [-1,1]².
    pub fn desired_eye(&self, drive: Vec2) -> Vec3 {
        let yaw = drive.x * CAMERA_YAW_SPAN;
        let height = self.base_height + drive.y * CAMERA_HEIGHT_SPAN;
        self.target + Vec3::new(yaw.sin() * self.radius, height, yaw.cos() * self.radius)
    }

    /// Advance one frame toward the drive signal.
    pub fn update(&mut self, drive: Vec2) {
        let desired = self.desired_eye(drive);
        self.eye += (desired - self.eye) * self.smoothing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_converges_on_desired_eye() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 1.0, 0.0));
        let drive = Vec2::new(0.8, -0.4);
        let desired = cam.desired_eye(drive);
        for _ in 0..400 {
            cam.update(drive);
        }
        assert!((cam.eye - desired).length() < 1e-3);
    }

    #[test]
    fn orbit_keeps_radius() {
        let cam = OrbitCamera::new(Vec3::ZERO);
        for x in [-1.0_f32, -0.3, 0.0, 0.5, 1.0] {
            let eye = cam.desired_eye(Vec2::new(x, 0.0));
            let flat = Vec3::new(eye.x, 0.0, eye.z);
            assert!((flat.length() - cam.radius).abs() < 1e-4);
        }
    }
}
