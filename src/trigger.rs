//! Scroll-position triggers with enter/leave callbacks in both directions.

use smallvec::SmallVec;

/// Where a scroll offset sits relative to a trigger range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Before,
    Active,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Scrolling down into the range.
    Enter,
    /// Scrolling down out of the range.
    Leave,
    /// Scrolling up back into the range.
    EnterBack,
    /// Scrolling up out of the range.
    LeaveBack,
}

pub type TriggerEvents = SmallVec<[TriggerEvent; 2]>;

/// Scroll offset at which an element edge (document px) meets a line at
/// `viewport_fraction` of the viewport height.
pub fn edge_crossing(edge: f32, viewport_fraction: f32, viewport_height: f32) -> f32 {
    edge - viewport_fraction * viewport_height
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    start: f32,
    end: f32,
    zone: Option<Zone>,
}

impl ScrollTrigger {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end: end.max(start), zone: None }
    }

    /// Moves the range after a layout change. The current zone is kept so the
    /// next `update` reports whatever the move implies.
    pub fn set_range(&mut self, start: f32, end: f32) {
        self.start = start;
        self.end = end.max(start);
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn zone_of(&self, scroll: f32) -> Zone {
        if scroll < self.start {
            Zone::Before
        } else if scroll > self.end {
            Zone::After
        } else {
            Zone::Active
        }
    }

    pub fn zone(&self) -> Option<Zone> {
        self.zone
    }

    /// Clamped position of `scroll` inside the range. A zero-length range is
    /// a step at `start`.
    pub fn progress(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }

    /// Reports the transitions crossed since the last update, in scroll order.
    /// The first update behaves as if scrolling down from the page top.
    pub fn update(&mut self, scroll: f32) -> TriggerEvents {
        use TriggerEvent::*;
        use Zone::*;

        let now = self.zone_of(scroll);
        let prev = self.zone.replace(now).unwrap_or(Before);
        let mut events = TriggerEvents::new();
        match (prev, now) {
            (Before, Active) => events.push(Enter),
            (Before, After) => events.extend([Enter, Leave]),
            (Active, After) => events.push(Leave),
            (After, Active) => events.push(EnterBack),
            (After, Before) => events.extend([EnterBack, LeaveBack]),
            (Active, Before) => events.push(LeaveBack),
            _ => {}
        }
        events
    }

    /// Forgets the zone so the next update replays from the top.
    pub fn reset(&mut self) {
        self.zone = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TriggerEvent::*;

    #[test]
    fn down_then_up() {
        let mut t = ScrollTrigger::new(100.0, 200.0);
        assert!(t.update(0.0).is_empty());
        assert_eq!(t.update(150.0).as_slice(), &[Enter]);
        assert!(t.update(160.0).is_empty());
        assert_eq!(t.update(250.0).as_slice(), &[Leave]);
        assert_eq!(t.update(180.0).as_slice(), &[EnterBack]);
        assert_eq!(t.update(50.0).as_slice(), &[LeaveBack]);
    }

    #[test]
    fn jumps_report_both_edges() {
        let mut t = ScrollTrigger::new(100.0, 200.0);
        t.update(0.0);
        assert_eq!(t.update(900.0).as_slice(), &[Enter, Leave]);
        assert_eq!(t.update(0.0).as_slice(), &[EnterBack, LeaveBack]);
    }

    #[test]
    fn first_update_mid_page_enters() {
        let mut t = ScrollTrigger::new(100.0, 200.0);
        assert_eq!(t.update(120.0).as_slice(), &[Enter]);
        t.reset();
        assert_eq!(t.update(500.0).as_slice(), &[Enter, Leave]);
    }

    #[test]
    fn progress_clamps() {
        let t = ScrollTrigger::new(100.0, 300.0);
        assert_eq!(t.progress(0.0), 0.0);
        assert_eq!(t.progress(200.0), 0.5);
        assert_eq!(t.progress(1e6), 1.0);
        let step = ScrollTrigger::new(50.0, 50.0);
        assert_eq!(step.progress(49.0), 0.0);
        assert_eq!(step.progress(50.0), 1.0);
    }

    #[test]
    fn edge_line() {
        // top at 1000px crosses 80% of an 800px viewport at scroll 360
        assert_eq!(edge_crossing(1000.0, 0.8, 800.0), 360.0);
    }
}
