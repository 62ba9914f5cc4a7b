//! Scroll progress to mesh pose.

use std::f32::consts::{PI, TAU};

use crate::config;

/// Desired mesh pose for one frame of scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshPose {
    pub rotation_y: f32,
    pub rotation_x: f32,
    pub position_y: f32,
    pub position_z: f32,
}

/// Maps scroll progress `p` to a pose: one full turn about y, a single tilt
/// hump about x, one full vertical bob, and a linear z travel of `z_travel`.
///
/// `p` is clamped to [0, 1]; NaN maps to 0.
pub fn map_scroll(p: f32, z_travel: f32) -> MeshPose {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    // sin(TAU) is not exactly zero in f32.
    let bob = if p == 0.0 || p == 1.0 { 0.0 } else { (p * TAU).sin() * config::MESH_BOB };
    MeshPose {
        rotation_y: p * TAU,
        rotation_x: (p * PI).sin() * config::MESH_TILT,
        position_y: bob,
        position_z: p * z_travel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_turn_over_full_scroll() {
        for i in 0..=20 {
            let p = i as f32 / 20.0;
            assert_eq!(map_scroll(p, 1.0).rotation_y, p * TAU);
        }
    }

    #[test]
    fn bob_closes_over_one_period() {
        assert_eq!(map_scroll(0.0, 1.0).position_y, 0.0);
        assert_eq!(map_scroll(1.0, 1.0).position_y, 0.0);
        assert!((map_scroll(0.25, 1.0).position_y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tilt_peaks_at_half() {
        let mid = map_scroll(0.5, 1.0).rotation_x;
        assert!((mid - 0.3).abs() < 1e-6);
        assert!(map_scroll(0.0, 1.0).rotation_x.abs() < 1e-6);
        assert!(map_scroll(0.25, 1.0).rotation_x < mid);
    }

    #[test]
    fn z_travel_is_linear() {
        assert_eq!(map_scroll(0.5, 3.0).position_z, 1.5);
        assert_eq!(map_scroll(1.0, config::MESH_Z_TRAVEL).position_z, config::MESH_Z_TRAVEL);
    }

    #[test]
    fn out_of_range_progress_clamps() {
        assert_eq!(map_scroll(-1.0, 1.0), map_scroll(0.0, 1.0));
        assert_eq!(map_scroll(7.0, 1.0), map_scroll(1.0, 1.0));
        assert_eq!(map_scroll(f32::NAN, 1.0), map_scroll(0.0, 1.0));
    }
}
