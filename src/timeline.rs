//! Time-based sequences of overlapping tweens.

use crate::easing::Easing;
use crate::style::Style;

#[derive(Debug, Clone, Copy)]
struct Tween<T> {
    target: T,
    /// Seconds from timeline start.
    offset: f32,
    duration: f32,
    from: Style,
    to: Style,
    ease: Easing,
}

impl<T: Copy> Tween<T> {
    fn sample(&self, time: f32) -> Style {
        let t = if self.duration <= 0.0 {
            if time >= self.offset { 1.0 } else { 0.0 }
        } else {
            (time - self.offset) / self.duration
        };
        self.from.lerp(&self.to, self.ease.apply(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// At time zero, not advancing.
    Idle,
    Playing,
    Finished,
}

/// A one-shot forward sequence. `restart` replays from zero; there is no
/// reverse playback.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    tweens: Vec<Tween<T>>,
    time: f32,
    duration: f32,
    playback: Playback,
}

impl<T: Copy> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Timeline<T> {
    pub fn new() -> Self {
        Self { tweens: Vec::new(), time: 0.0, duration: 0.0, playback: Playback::Idle }
    }

    /// Adds a tween at `offset` seconds from the start.
    pub fn add(&mut self, target: T, offset: f32, duration: f32, from: Style, to: Style, ease: Easing) {
        let offset = offset.max(0.0);
        let duration = duration.max(0.0);
        self.duration = self.duration.max(offset + duration);
        self.tweens.push(Tween { target, offset, duration, from, to, ease });
    }

    /// Adds one tween per target, each `stagger` seconds after the previous.
    #[allow(clippy::too_many_arguments)]
    pub fn add_staggered(
        &mut self,
        targets: impl IntoIterator<Item = T>,
        offset: f32,
        stagger: f32,
        duration: f32,
        from: Style,
        to: Style,
        ease: Easing,
    ) {
        for (i, target) in targets.into_iter().enumerate() {
            self.add(target, offset + stagger * i as f32, duration, from, to, ease);
        }
    }

    pub fn restart(&mut self) {
        self.time = 0.0;
        self.playback = Playback::Playing;
    }

    /// Back to time zero without playing; every tween shows its `from` state.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.playback = Playback::Idle;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.playback != Playback::Playing {
            return;
        }
        self.time += dt.max(0.0);
        if self.time >= self.duration {
            self.time = self.duration;
            self.playback = Playback::Finished;
        }
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Start time of the first tween for `target`.
    pub fn start_of(&self, target: T) -> Option<f32>
    where
        T: PartialEq,
    {
        self.tweens.iter().find(|tw| tw.target == target).map(|tw| tw.offset)
    }

    /// Current style of every tween target, in insertion order.
    pub fn sample(&self) -> impl Iterator<Item = (T, Style)> + '_ {
        self.tweens.iter().map(move |tw| (tw.target, tw.sample(self.time)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> Style {
        Style { opacity: 0.0, y: 40.0, ..Style::IDENTITY }
    }

    #[test]
    fn duration_covers_last_stagger() {
        let mut tl = Timeline::new();
        tl.add_staggered(0..4u8, 0.5, 0.1, 1.0, hidden(), Style::IDENTITY, Easing::Linear);
        assert!((tl.duration() - 1.8).abs() < 1e-6);
        assert!((tl.start_of(3).unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(tl.start_of(9), None);
    }

    #[test]
    fn idle_samples_from_state() {
        let mut tl = Timeline::new();
        tl.add(0u8, 0.0, 1.0, hidden(), Style::IDENTITY, Easing::Linear);
        tl.tick(0.5);
        assert_eq!(tl.playback(), Playback::Idle);
        assert_eq!(tl.sample().next().unwrap().1, hidden());
    }

    #[test]
    fn plays_to_finish_and_restarts() {
        let mut tl = Timeline::new();
        tl.add(0u8, 0.0, 1.0, hidden(), Style::IDENTITY, Easing::Linear);
        tl.restart();
        tl.tick(0.5);
        let mid = tl.sample().next().unwrap().1;
        assert!((mid.opacity - 0.5).abs() < 1e-6);
        tl.tick(5.0);
        assert_eq!(tl.playback(), Playback::Finished);
        assert_eq!(tl.sample().next().unwrap().1, Style::IDENTITY);
        tl.restart();
        assert_eq!(tl.sample().next().unwrap().1, hidden());
    }

    #[test]
    fn overlapping_offsets_run_together() {
        let mut tl = Timeline::new();
        tl.add('a', 0.0, 1.0, hidden(), Style::IDENTITY, Easing::Linear);
        tl.add('b', 0.2, 1.0, hidden(), Style::IDENTITY, Easing::Linear);
        tl.restart();
        tl.tick(0.6);
        let styles: Vec<_> = tl.sample().collect();
        assert!(styles[0].1.opacity > 0.0 && styles[0].1.opacity < 1.0);
        assert!(styles[1].1.opacity > 0.0 && styles[1].1.opacity < styles[0].1.opacity);
    }
}
