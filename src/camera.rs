use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// A ray in world space; `direction` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Intersection with the plane `z = plane_z`, if the ray is not parallel to it.
    pub fn hit_z_plane(&self, plane_z: f32) -> Option<Vec3> {
        if self.direction.z.abs() < f32::EPSILON {
            return None;
        }
        let t = (plane_z - self.origin.z) / self.direction.z;
        (t >= 0.0).then(|| self.origin + self.direction * t)
    }
}

/// Perspective camera on the +z axis looking at the origin.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    config: CameraConfig,
    aspect: f32,
}

impl Camera {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        Self { config, aspect: sanitize_aspect(aspect) }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.config.distance)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.config.fov_y_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        )
    }

    /// Ray through a point in normalized device coordinates.
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let inv = (self.projection() * self.view()).inverse();
        let near = inv.project_point3(ndc.extend(-1.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray { origin: near, direction: (far - near).normalize_or_zero() }
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Client pixel coordinates to NDC, y up.
pub fn client_to_ndc(pos: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(pos.x / viewport.x * 2.0 - 1.0, 1.0 - pos.y / viewport.y * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CAMERA;

    #[test]
    fn centre_ray_hits_origin() {
        let cam = Camera::new(CAMERA, 16.0 / 9.0);
        let hit = cam.ray(Vec2::ZERO).hit_z_plane(0.0).unwrap();
        assert!(hit.length() < 1e-4, "{hit:?}");
    }

    #[test]
    fn right_edge_maps_right() {
        let cam = Camera::new(CAMERA, 1.0);
        let hit = cam.ray(Vec2::new(1.0, 0.0)).hit_z_plane(0.0).unwrap();
        // half-width of the frustum at distance 5 with a 75° fov
        let expected = CAMERA.distance * (CAMERA.fov_y_degrees.to_radians() / 2.0).tan();
        assert!((hit.x - expected).abs() < 1e-3, "{hit:?}");
        assert!(hit.y.abs() < 1e-4);
    }

    #[test]
    fn ndc_flips_y() {
        let vp = Vec2::new(200.0, 100.0);
        assert_eq!(client_to_ndc(Vec2::new(0.0, 0.0), vp), Vec2::new(-1.0, 1.0));
        assert_eq!(client_to_ndc(Vec2::new(200.0, 100.0), vp), Vec2::new(1.0, -1.0));
        assert_eq!(client_to_ndc(Vec2::ONE, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray { origin: Vec3::ZERO, direction: Vec3::X };
        assert_eq!(ray.hit_z_plane(0.0), None);
    }
}
