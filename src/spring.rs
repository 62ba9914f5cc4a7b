//! Discrete spring followers.
//!
//! Each frame: `v += (target - x) * stiffness; v *= damping; x += v`.
//! With damping strictly below one the follower settles on a still target.

use std::ops::{Add, Mul, Sub};

use glam::{Vec2, Vec3};

use crate::config::SpringConfig;

/// Values a spring can integrate.
pub trait SpringValue: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {
    const ZERO: Self;
    fn magnitude(self) -> f32;
}

impl SpringValue for f32 {
    const ZERO: Self = 0.0;
    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl SpringValue for Vec2 {
    const ZERO: Self = Vec2::ZERO;
    fn magnitude(self) -> f32 {
        self.length()
    }
}

impl SpringValue for Vec3 {
    const ZERO: Self = Vec3::ZERO;
    fn magnitude(self) -> f32 {
        self.length()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Spring<V> {
    config: SpringConfig,
    position: V,
    velocity: V,
}

pub type Spring2 = Spring<Vec2>;
pub type Spring3 = Spring<Vec3>;

impl<V: SpringValue> Spring<V> {
    pub fn new(config: SpringConfig, position: V) -> Self {
        Self { config, position, velocity: V::ZERO }
    }

    /// One frame toward `target`; returns the new position.
    pub fn step(&mut self, target: V) -> V {
        self.velocity = self.velocity + (target - self.position) * self.config.stiffness;
        self.velocity = self.velocity * self.config.damping;
        self.position = self.position + self.velocity;
        self.position
    }

    pub fn position(&self) -> V {
        self.position
    }

    pub fn velocity(&self) -> V {
        self.velocity
    }

    /// Teleports without carrying velocity.
    pub fn snap(&mut self, position: V) {
        self.position = position;
        self.velocity = V::ZERO;
    }

    pub fn is_settled(&self, target: V, epsilon: f32) -> bool {
        (target - self.position).magnitude() < epsilon && self.velocity.magnitude() < epsilon
    }
}
