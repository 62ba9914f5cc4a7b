//! Easing curves used by the entry timelines and the exit scrub.

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// `t^n`
    PowerIn(i32),
    /// `1 - (1-t)^n`
    PowerOut(i32),
    /// Overshooting ease-out with the given overshoot amount.
    BackOut(f32),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    ///
    /// Input is clamped; endpoints are exact for every curve.
    pub fn apply(&self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => t,
            Easing::PowerIn(n) => t.powi(n),
            Easing::PowerOut(n) => 1.0 - (1.0 - t).powi(n),
            Easing::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
        }
    }
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 4] = [Easing::Linear, Easing::PowerIn(2), Easing::PowerOut(3), Easing::BackOut(1.7)];

    #[test]
    fn endpoints_exact() {
        for ease in CURVES {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        }
    }

    #[test]
    fn power_curves_never_reverse() {
        for ease in [Easing::Linear, Easing::PowerIn(2), Easing::PowerOut(3)] {
            let mut last = 0.0;
            for i in 0..=200 {
                let v = ease.apply(i as f32 / 200.0);
                assert!(v >= last, "{ease:?} reversed at step {i}");
                last = v;
            }
        }
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (0..100)
            .map(|i| Easing::BackOut(1.7).apply(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Easing::PowerOut(3).apply(-2.0), 0.0);
        assert_eq!(Easing::PowerOut(3).apply(4.0), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }
}
