//! End-to-end behaviour of the scroll pipeline on the host.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use scrollfolio::config;
use scrollfolio::mapper::map_scroll;
use scrollfolio::scroll::progress;
use scrollfolio::section::{ExitScrub, PartCounts, Phase, Section, SectionBounds, SectionEffect};
use scrollfolio::setters::{DirectSetters, Transform};
use scrollfolio::stage::Stage;

#[test]
fn linear_scroll_turns_mesh_once() {
    let frames = 240;
    let limit = 6000.0;
    let mut last = -1.0;
    for i in 0..=frames {
        let offset = limit * i as f32 / frames as f32;
        let pose = map_scroll(progress(offset, limit), config::MESH_Z_TRAVEL);
        assert!(pose.rotation_y > last, "not increasing at frame {i}");
        last = pose.rotation_y;
    }
    assert_eq!(last, TAU);
}

#[test]
fn setters_before_initialize_leave_target_alone() {
    let target = Rc::new(RefCell::new(Transform::default()));
    let setters = DirectSetters::new();
    for i in 0..10 {
        assert!(!setters.apply(map_scroll(i as f32 / 10.0, 1.0)));
    }
    assert_eq!(*target.borrow(), Transform::default());
}

#[test]
fn feature_entry_fires_in_both_directions() {
    let mut section = Section::new("projects", PartCounts::default(), true);
    section.layout(SectionBounds { top: 2000.0, bottom: 3000.0 }, 1000.0);
    // feature span 1500 .. 2500
    let mut targets = Vec::new();
    for scroll in [0.0, 1600.0, 2600.0, 2400.0, 1000.0, 1700.0] {
        for effect in section.update(scroll, 0.016) {
            let SectionEffect::ParticleTarget(t) = effect;
            targets.push(t);
        }
    }
    assert_eq!(targets, [1.0, 0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn exit_scrub_is_monotone() {
    let scrub = ExitScrub::new(config::EXIT);
    let mut prev = scrub.sample(0.0);
    assert_eq!(prev.opacity, 1.0);
    assert_eq!(prev.blur, 0.0);
    for i in 1..=100 {
        let s = scrub.sample(i as f32 / 100.0);
        assert!(s.opacity <= prev.opacity);
        assert!(s.blur >= prev.blur);
        assert!(s.y <= prev.y);
        prev = s;
    }
    assert_eq!(prev.opacity, 0.0);
    assert_eq!(prev.blur, 8.0);
}

#[test]
fn section_walks_every_phase() {
    let mut section = Section::new("about", PartCounts { chars: 3, ..Default::default() }, false);
    section.layout(SectionBounds { top: 1000.0, bottom: 2000.0 }, 1000.0);
    let mut seen = Vec::new();
    let mut record = |p: Phase| {
        if seen.last() != Some(&p) {
            seen.push(p);
        }
    };
    section.update(0.0, 0.016);
    record(section.phase());
    // entry line at 200, exit 1400 .. 2000
    for _ in 0..10 {
        section.update(300.0, 0.016);
        record(section.phase());
    }
    section.update(300.0, 5.0);
    record(section.phase());
    section.update(1700.0, 0.016);
    record(section.phase());
    section.update(2100.0, 0.016);
    record(section.phase());
    assert_eq!(seen, [Phase::Before, Phase::Entering, Phase::InView, Phase::Exiting, Phase::Exited]);
}

#[test]
fn particle_mode_bounded_while_scrolling_through_features() {
    let mut stage = Stage::new(Vec2::new(1000.0, 1000.0));
    stage.resize(Vec2::new(1000.0, 1000.0), 10_000.0);
    for (i, top) in [1500.0, 4000.0, 6500.0].into_iter().enumerate() {
        let idx = stage.add_section(Section::new(format!("s{i}"), PartCounts::default(), true));
        stage.layout_section(idx, SectionBounds { top, bottom: top + 1200.0 });
    }
    let mut now = 0.0;
    for step in 0..600 {
        // down then back up
        let wheel = if step < 300 { 40.0 } else { -40.0 };
        stage.on_wheel(wheel);
        stage.tick(now);
        now += 16.0;
        let p = stage.state().particles.current();
        assert!((0.0..=1.0).contains(&p), "particle mode {p} at step {step}");
    }
}
