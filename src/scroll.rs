//! Smooth scrolling and the normalized page progress derived from it.

use crate::config;

/// Fraction of total scroll distance covered at `offset`.
///
/// A pure function of its inputs; an empty page (`limit <= 0`) reads as 0.
pub fn progress(offset: f32, limit: f32) -> f32 {
    if limit <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / limit).clamp(0.0, 1.0)
}

/// Page progress in [0, 1], refreshed once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollProgress {
    value: f32,
}

impl ScrollProgress {
    pub fn update(&mut self, offset: f32, limit: f32) -> f32 {
        self.value = progress(offset, limit);
        self.value
    }

    pub fn get(&self) -> f32 {
        self.value
    }
}

/// Inertial scroll: wheel input moves a target, the rendered offset eases
/// toward it every frame.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    target: f32,
    animated: f32,
    limit: f32,
    lerp: f32,
    wheel_multiplier: f32,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(config::SCROLL_LERP, config::WHEEL_MULTIPLIER)
    }
}

impl SmoothScroll {
    pub fn new(lerp: f32, wheel_multiplier: f32) -> Self {
        Self {
            target: 0.0,
            animated: 0.0,
            limit: 0.0,
            lerp: lerp.clamp(0.0, 1.0),
            wheel_multiplier,
        }
    }

    /// Maximum scroll offset: document height minus viewport height.
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.min(self.limit);
        self.animated = self.animated.min(self.limit);
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn offset(&self) -> f32 {
        self.animated
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_scrolling(&self) -> bool {
        self.animated != self.target
    }

    pub fn on_wheel(&mut self, delta_y: f32) {
        self.target = (self.target + delta_y * self.wheel_multiplier).clamp(0.0, self.limit);
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.target = offset.clamp(0.0, self.limit);
    }

    /// Adopts a native scroll position (scrollbar drag, keyboard) while no
    /// smoothed scroll is in flight.
    pub fn sync_native(&mut self, offset: f32) {
        if self.is_scrolling() {
            return;
        }
        let y = offset.clamp(0.0, self.limit);
        self.target = y;
        self.animated = y;
    }

    /// Per-frame step. `dt` in seconds; the lerp factor is defined at 60fps.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let k = 1.0 - (1.0 - self.lerp).powf(dt.max(0.0) * 60.0);
        self.animated += (self.target - self.animated) * k;
        if (self.target - self.animated).abs() < config::SCROLL_SETTLE_PX {
            self.animated = self.target;
        }
        self.animated
    }
}
