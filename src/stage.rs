//! The explicit per-mount context: every piece of per-frame state, the
//! ordered ticker that advances it, and the input entry points.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::config;
use crate::cursor::{CursorFollower, CursorFrame};
use crate::magnetic::MagneticPoint;
use crate::mapper::{map_scroll, MeshPose};
use crate::particles::ParticleMode;
use crate::scroll::{ScrollProgress, SmoothScroll};
use crate::section::{Section, SectionBounds, SectionEffect, Sections};
use crate::setters::{DirectSetters, SharedTransform, Transform};
use crate::ticker::{FrameTime, TickId, Ticker, TickerGroup};

/// State read by the renderer and the DOM writers after each frame.
pub struct StageState {
    pub scroll: SmoothScroll,
    pub progress: ScrollProgress,
    pub pose: MeshPose,
    pub transform: SharedTransform,
    pub setters: DirectSetters,
    pub sections: Sections,
    pub particles: ParticleMode,
    pub cursor: CursorFollower,
    pub cursor_frame: Option<CursorFrame>,
    pub magnet: MagneticPoint,
    pub magnet_point: Vec3,
    pub influence: f32,
    pub camera: Camera,
    pub viewport: Vec2,
    /// Seconds since mount, fed to the shaders.
    pub elapsed: f32,
}

impl StageState {
    fn new(viewport: Vec2) -> Self {
        Self {
            scroll: SmoothScroll::default(),
            progress: ScrollProgress::default(),
            pose: MeshPose::default(),
            transform: Rc::new(RefCell::new(Transform::default())),
            setters: DirectSetters::new(),
            sections: Sections::new(),
            particles: ParticleMode::default(),
            cursor: CursorFollower::default(),
            cursor_frame: None,
            magnet: MagneticPoint::default(),
            magnet_point: Vec3::ZERO,
            influence: 0.0,
            camera: Camera::new(config::CAMERA, aspect(viewport)),
            viewport,
            elapsed: 0.0,
        }
    }

    fn apply_effect(&mut self, effect: SectionEffect) {
        match effect {
            SectionEffect::ParticleTarget(t) => self.particles.set_target(t),
        }
    }
}

fn aspect(viewport: Vec2) -> f32 {
    if viewport.y > 0.0 {
        viewport.x / viewport.y
    } else {
        1.0
    }
}

/// One pass, in order: smooth scroll, progress and mesh pose, sections,
/// particle fade, cursor, magnetic point.
fn register_core(ticker: &mut Ticker<StageState>, group: &mut TickerGroup) {
    group.add(ticker, |s, t| {
        s.elapsed += t.dt;
        s.scroll.advance(t.dt);
    });
    group.add(ticker, |s, _| {
        let p = s.progress.update(s.scroll.offset(), s.scroll.limit());
        s.pose = map_scroll(p, config::MESH_Z_TRAVEL);
        if !s.setters.apply(s.pose) {
            log::debug!("mesh setters not bound; frame skipped");
        }
    });
    group.add(ticker, |s, t| {
        if let Some(effect) = s.sections.update(s.scroll.offset(), t.dt) {
            s.apply_effect(effect);
        }
        s.particles.tick();
    });
    group.add(ticker, |s, _| {
        if s.cursor.flags().visible {
            s.cursor_frame = Some(s.cursor.tick());
        }
        let (point, influence) = s.magnet.tick();
        s.magnet_point = point;
        s.influence = influence;
    });
}

pub struct Stage {
    state: StageState,
    ticker: Ticker<StageState>,
    core: TickerGroup,
    attached: TickerGroup,
    mounted: bool,
}

impl Stage {
    /// Builds the stage and binds the mesh setters to its transform.
    pub fn new(viewport: Vec2) -> Self {
        let mut state = StageState::new(viewport);
        let transform = state.transform.clone();
        state.setters.initialize(&transform);

        let mut ticker = Ticker::new();
        let mut core = TickerGroup::new();
        register_core(&mut ticker, &mut core);
        log::info!("stage mounted ({}x{})", viewport.x, viewport.y);
        Self { state, ticker, core, attached: TickerGroup::new(), mounted: true }
    }

    pub fn state(&self) -> &StageState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StageState {
        &mut self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Adds a per-frame consumer that runs after the core pass; removed by
    /// [`Stage::unmount`].
    pub fn attach(&mut self, f: impl FnMut(&mut StageState, FrameTime) + 'static) -> TickId {
        self.attached.add(&mut self.ticker, f)
    }

    pub fn add_section(&mut self, section: Section) -> usize {
        self.state.sections.push(section)
    }

    pub fn layout_section(&mut self, index: usize, bounds: SectionBounds) {
        let vh = self.state.viewport.y;
        self.state.sections.layout(index, bounds, vh);
    }

    /// Viewport and document height changed.
    pub fn resize(&mut self, viewport: Vec2, document_height: f32) {
        self.state.viewport = viewport;
        self.state.camera.set_aspect(aspect(viewport));
        self.state.scroll.set_limit(document_height - viewport.y);
    }

    pub fn on_wheel(&mut self, delta_y: f32) {
        self.state.scroll.on_wheel(delta_y);
    }

    pub fn on_native_scroll(&mut self, offset: f32) {
        self.state.scroll.sync_native(offset);
    }

    pub fn on_pointer_move(&mut self, pos: Vec2) {
        let s = &mut self.state;
        s.cursor.pointer_moved(pos);
        s.magnet.aim(&s.camera, pos, s.viewport);
    }

    pub fn on_pointer_leave(&mut self) {
        self.state.cursor.pointer_left();
    }

    /// Advances one frame stamped `now` (ms). A no-op once unmounted.
    pub fn tick(&mut self, now: f64) -> Option<FrameTime> {
        if !self.mounted {
            return None;
        }
        Some(self.ticker.tick(&mut self.state, now))
    }

    /// Tears down everything created by the mount in one go: ticker
    /// subscriptions, setter bindings, sections and particle mode.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.attached.revert(&mut self.ticker);
        self.core.revert(&mut self.ticker);
        self.ticker.clear();
        self.state.setters.teardown();
        self.state.particles.reset();
        self.state.sections.clear();
        self.state.cursor_frame = None;
        self.mounted = false;
        log::info!("stage unmounted");
    }

    pub fn subscriber_count(&self) -> usize {
        self.ticker.len()
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::PartCounts;
    use std::f32::consts::TAU;

    fn stage() -> Stage {
        let mut stage = Stage::new(Vec2::new(1280.0, 800.0));
        stage.resize(Vec2::new(1280.0, 800.0), 4800.0);
        stage
    }

    #[test]
    fn mounted_stage_drives_transform() {
        let mut stage = stage();
        stage.on_native_scroll(2000.0);
        stage.tick(0.0);
        let t = *stage.state().transform.borrow();
        assert_eq!(t.rotation.y, 0.5 * TAU);
        assert!((t.position.z - 0.5 * config::MESH_Z_TRAVEL).abs() < 1e-6);
    }

    #[test]
    fn unmount_removes_every_subscriber() {
        let mut stage = stage();
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        stage.attach(move |_, _| *counter.borrow_mut() += 1);
        stage.tick(0.0);
        stage.unmount();
        assert_eq!(stage.subscriber_count(), 0);
        assert_eq!(stage.tick(16.0), None);
        assert_eq!(*hits.borrow(), 1);
        assert!(!stage.state().setters.is_initialized());
        assert_eq!(stage.state().particles.current(), 0.0);
    }

    #[test]
    fn feature_section_fades_particles_in() {
        let mut stage = stage();
        let idx = stage.add_section(Section::new("projects", PartCounts::default(), true));
        stage.layout_section(idx, SectionBounds { top: 1600.0, bottom: 2800.0 });
        stage.on_native_scroll(1400.0);
        let mut now = 0.0;
        for _ in 0..120 {
            stage.tick(now);
            now += 16.0;
        }
        assert_eq!(stage.state().particles.target(), 1.0);
        assert!(stage.state().particles.current() > 0.9);
    }

    #[test]
    fn scrolling_up_between_stacked_features_keeps_particles_on() {
        let mut stage = Stage::new(Vec2::new(1000.0, 1000.0));
        stage.resize(Vec2::new(1000.0, 1000.0), 8000.0);
        for (name, top) in [("a", 2000.0), ("b", 3000.0)] {
            let idx = stage.add_section(Section::new(name, PartCounts::default(), true));
            stage.layout_section(idx, SectionBounds { top, bottom: top + 1000.0 });
        }
        stage.on_native_scroll(3000.0);
        stage.tick(0.0);
        assert_eq!(stage.state().particles.target(), 1.0);
        stage.on_native_scroll(2000.0);
        stage.tick(16.0);
        assert_eq!(stage.state().particles.target(), 1.0);
        stage.on_native_scroll(0.0);
        stage.tick(32.0);
        assert_eq!(stage.state().particles.target(), 0.0);
    }

    #[test]
    fn cursor_idle_until_pointer_seen() {
        let mut stage = stage();
        stage.tick(0.0);
        assert!(stage.state().cursor_frame.is_none());
        stage.on_pointer_move(Vec2::new(10.0, 20.0));
        stage.tick(16.0);
        assert_eq!(stage.state().cursor_frame.map(|f| f.dot), Some(Vec2::new(10.0, 20.0)));
    }
}
