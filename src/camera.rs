//! Orbit camera for the demo shell.
//!
//! The particle system itself only consumes a [`ViewFrame`] per draw; any
//! camera that can produce one works.

use glam::{Mat4, Vec3};

/// Per-frame view parameters handed to `ParticleSystem::draw`.
#[derive(Debug, Clone, Copy)]
pub struct ViewFrame {
    pub view_proj: Mat4,
    pub eye_position: Vec3,
}

/// Yaw/pitch/distance orbit around a target point.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl OrbitCamera {
    const MIN_DISTANCE: f32 = 2.0;
    const MAX_DISTANCE: f32 = 400.0;

    /// Orbit `target` from a comfortable distance.
    pub fn looking_at(target: Vec3) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.08,
            distance: 45.0,
            target,
        }
    }

    /// Rotate by a mouse drag, in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Zoom by scroll lines.
    pub fn zoom(&mut self, lines: f32) {
        self.distance =
            (self.distance - lines * 2.0).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// View parameters for one frame at the given aspect ratio.
    pub fn frame(&self, aspect: f32) -> ViewFrame {
        let view = Mat4::look_at_rh(self.position(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), aspect, 1.0, 10_000.0);
        ViewFrame {
            view_proj: proj * view,
            eye_position: self.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_to_range() {
        let mut camera = OrbitCamera::looking_at(Vec3::ZERO);
        camera.zoom(1.0e6);
        assert_eq!(camera.distance, OrbitCamera::MIN_DISTANCE);
        camera.zoom(-1.0e6);
        assert_eq!(camera.distance, OrbitCamera::MAX_DISTANCE);
    }

    #[test]
    fn pitch_clamps_shy_of_the_poles() {
        let mut camera = OrbitCamera::looking_at(Vec3::ZERO);
        camera.orbit(0.0, 1.0e6);
        assert!(camera.pitch <= 1.5);
        camera.orbit(0.0, -1.0e6);
        assert!(camera.pitch >= -1.5);
    }

    #[test]
    fn frame_is_finite() {
        let camera = OrbitCamera::looking_at(Vec3::new(0.0, 1.0, 120.0));
        let frame = camera.frame(16.0 / 9.0);
        assert!(frame.eye_position.is_finite());
        assert!(frame
            .view_proj
            .to_cols_array()
            .iter()
            .all(|v| v.is_finite()));
    }
}
