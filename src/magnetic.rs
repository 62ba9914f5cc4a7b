//! Pointer-driven magnetic point fed to the mesh shader.

use glam::{Vec2, Vec3};

use crate::camera::{client_to_ndc, Camera};
use crate::config::{self, SpringConfig};
use crate::spring::Spring3;

#[derive(Debug, Clone)]
pub struct MagneticPoint {
    spring: Spring3,
    target: Vec3,
    influence: f32,
    gain: f32,
    smoothing: f32,
}

impl Default for MagneticPoint {
    fn default() -> Self {
        Self::new(config::MAGNET_SPRING, config::INFLUENCE_GAIN, config::INFLUENCE_LERP)
    }
}

impl MagneticPoint {
    pub fn new(spring: SpringConfig, gain: f32, smoothing: f32) -> Self {
        Self {
            spring: Spring3::new(spring, Vec3::ZERO),
            target: Vec3::ZERO,
            influence: 0.0,
            gain,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Re-aims the target by casting the pointer onto the z = 0 plane.
    /// A ray that misses keeps the previous target.
    pub fn aim(&mut self, camera: &Camera, pointer: Vec2, viewport: Vec2) {
        let ndc = client_to_ndc(pointer, viewport);
        if let Some(hit) = camera.ray(ndc).hit_z_plane(0.0) {
            self.target = hit;
        }
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// One frame of spring motion and influence smoothing.
    pub fn tick(&mut self) -> (Vec3, f32) {
        let point = self.spring.step(self.target);
        let raw = (self.spring.velocity().length() * self.gain).min(1.0);
        self.influence += (raw - self.influence) * self.smoothing;
        (point, self.influence)
    }

    pub fn point(&self) -> Vec3 {
        self.spring.position()
    }

    pub fn influence(&self) -> f32 {
        self.influence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CAMERA;

    #[test]
    fn influence_rises_with_motion_then_fades() {
        let mut m = MagneticPoint::default();
        m.set_target(Vec3::new(3.0, 0.0, 0.0));
        let mut peak = 0.0f32;
        for _ in 0..20 {
            peak = peak.max(m.tick().1);
        }
        assert!(peak > 0.1);
        for _ in 0..400 {
            m.tick();
        }
        assert!(m.influence() < 0.01);
        assert!(m.point().distance(Vec3::new(3.0, 0.0, 0.0)) < 0.01);
    }

    #[test]
    fn influence_never_jumps() {
        let mut m = MagneticPoint::default();
        m.set_target(Vec3::new(100.0, 0.0, 0.0));
        let mut last = 0.0;
        for _ in 0..10 {
            let (_, inf) = m.tick();
            assert!((inf - last).abs() <= config::INFLUENCE_LERP + 1e-6);
            assert!((0.0..=1.0).contains(&inf));
            last = inf;
        }
    }

    #[test]
    fn aim_projects_pointer() {
        let mut m = MagneticPoint::default();
        let cam = Camera::new(CAMERA, 2.0);
        let vp = Vec2::new(800.0, 400.0);
        m.aim(&cam, Vec2::new(400.0, 200.0), vp);
        for _ in 0..400 {
            m.tick();
        }
        assert!(m.point().length() < 1e-3);
        m.aim(&cam, Vec2::new(800.0, 200.0), vp);
        for _ in 0..400 {
            m.tick();
        }
        assert!(m.point().x > 1.0);
    }
}
