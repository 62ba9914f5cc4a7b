use crate::config;

/// Cross-fade weight between the solid mesh (0) and the point cloud (1).
#[derive(Debug, Clone, Copy)]
pub struct ParticleMode {
    current: f32,
    target: f32,
    lerp: f32,
}

impl Default for ParticleMode {
    fn default() -> Self {
        Self::new(config::PARTICLE_LERP)
    }
}

impl ParticleMode {
    pub fn new(lerp: f32) -> Self {
        Self { current: 0.0, target: 0.0, lerp: lerp.clamp(0.0, 1.0) }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn tick(&mut self) -> f32 {
        self.current = (self.current + (self.target - self.current) * self.lerp).clamp(0.0, 1.0);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.target = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_unit_range_under_any_toggling() {
        let mut mode = ParticleMode::default();
        // deterministic pseudo-random toggle pattern
        let mut seed = 0x2545_f491_u32;
        for _ in 0..5000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if seed % 7 == 0 {
                mode.set_target((seed % 2) as f32);
            }
            let v = mode.tick();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn approaches_target_without_overshoot() {
        let mut mode = ParticleMode::default();
        mode.set_target(1.0);
        let mut last = 0.0;
        for _ in 0..300 {
            let v = mode.tick();
            assert!(v >= last && v <= 1.0);
            last = v;
        }
        assert!(last > 0.99);
    }

    #[test]
    fn out_of_range_target_clamped() {
        let mut mode = ParticleMode::new(1.0);
        mode.set_target(4.0);
        assert_eq!(mode.tick(), 1.0);
        mode.reset();
        assert_eq!(mode.current(), 0.0);
    }
}
