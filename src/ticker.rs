//! The shared per-frame clock.
//!
//! Subscribers run in insertion order, once per frame, against a context
//! passed by reference. Ids can be collected into a [`TickerGroup`] and
//! removed together.

use slotmap::{new_key_type, SlotMap};

use crate::config;

new_key_type! {
    pub struct TickId;
}

/// Timing of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Timestamp of the frame, ms.
    pub now: f64,
    /// Seconds since the previous frame, clamped.
    pub dt: f32,
    pub frame: u64,
}

pub type TickFn<C> = Box<dyn FnMut(&mut C, FrameTime)>;

pub struct Ticker<C> {
    subscribers: SlotMap<TickId, TickFn<C>>,
    order: Vec<TickId>,
    last: Option<f64>,
    frame: u64,
}

impl<C> Default for Ticker<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Ticker<C> {
    pub fn new() -> Self {
        Self { subscribers: SlotMap::with_key(), order: Vec::new(), last: None, frame: 0 }
    }

    pub fn add(&mut self, f: impl FnMut(&mut C, FrameTime) + 'static) -> TickId {
        let id = self.subscribers.insert(Box::new(f));
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: TickId) -> bool {
        self.order.retain(|o| *o != id);
        self.subscribers.remove(id).is_some()
    }

    pub fn contains(&self, id: TickId) -> bool {
        self.subscribers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Runs every subscriber once for the frame stamped `now` (ms).
    pub fn tick(&mut self, ctx: &mut C, now: f64) -> FrameTime {
        let dt = match self.last {
            Some(last) => ((now - last) / 1000.0).clamp(0.0, config::MAX_FRAME_DT) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        self.frame += 1;
        let time = FrameTime { now, dt, frame: self.frame };
        for id in &self.order {
            if let Some(f) = self.subscribers.get_mut(*id) {
                f(ctx, time);
            }
        }
        time
    }

    /// Drops every subscriber and the frame clock.
    pub fn clear(&mut self) {
        self.subscribers.clear();
        self.order.clear();
        self.last = None;
        self.frame = 0;
    }
}

/// Subscriptions created together and torn down together.
#[derive(Debug, Default)]
pub struct TickerGroup {
    ids: Vec<TickId>,
}

impl TickerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<C>(&mut self, ticker: &mut Ticker<C>, f: impl FnMut(&mut C, FrameTime) + 'static) -> TickId {
        let id = ticker.add(f);
        self.ids.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Removes every subscription of the group from `ticker`.
    pub fn revert<C>(&mut self, ticker: &mut Ticker<C>) {
        for id in self.ids.drain(..) {
            ticker.remove(id);
        }
    }
}
