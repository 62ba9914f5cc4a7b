//! Custom cursor: an exact dot, a springy ring and a looser trailing glow.

use glam::Vec2;

use crate::config::{self, SpringConfig};
use crate::spring::Spring2;

/// Visual state toggled by pointer events rather than per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorFlags {
    pub hovering: bool,
    pub pressed: bool,
    pub visible: bool,
}

/// Positions to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFrame {
    pub dot: Vec2,
    pub ring: Vec2,
    pub trail: Vec2,
    /// Ring speed in px per frame, used for the stretch effect.
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct CursorFollower {
    pointer: Vec2,
    ring: Spring2,
    trail: Spring2,
    flags: CursorFlags,
}

impl Default for CursorFollower {
    fn default() -> Self {
        Self::new(config::CURSOR_SPRING, config::TRAIL_SPRING)
    }
}

impl CursorFollower {
    pub fn new(ring: SpringConfig, trail: SpringConfig) -> Self {
        Self {
            pointer: Vec2::ZERO,
            ring: Spring2::new(ring, Vec2::ZERO),
            trail: Spring2::new(trail, Vec2::ZERO),
            flags: CursorFlags::default(),
        }
    }

    /// Raw pointer position in client px.
    pub fn pointer_moved(&mut self, pos: Vec2) {
        if !self.flags.visible {
            // First sighting: start the followers under the pointer.
            self.ring.snap(pos);
            self.trail.snap(pos);
            self.flags.visible = true;
        }
        self.pointer = pos;
    }

    pub fn pointer_left(&mut self) {
        self.flags.visible = false;
    }

    /// Returns true when the hover state changed.
    pub fn set_hovering(&mut self, hovering: bool) -> bool {
        let changed = self.flags.hovering != hovering;
        self.flags.hovering = hovering;
        changed
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.flags.pressed = pressed;
    }

    pub fn flags(&self) -> CursorFlags {
        self.flags
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn tick(&mut self) -> CursorFrame {
        let ring = self.ring.step(self.pointer);
        let trail = self.trail.step(self.pointer);
        CursorFrame {
            dot: self.pointer,
            ring,
            trail,
            speed: self.ring.velocity().length(),
        }
    }
}
