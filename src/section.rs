//! Per-section entry/exit choreography.
//!
//! Each section owns three scroll triggers:
//! - entry: top crosses 80% of the viewport, replays a time-based sequence;
//! - exit: bottom travels from 60% of the viewport to its top, scrubbing;
//! - feature (optional): top/bottom straddle the viewport centre, toggling
//!   particle mode.

use smallvec::SmallVec;

use crate::config::{self, EntryConfig, ExitConfig, StaggerConfig};
use crate::easing::lerp;
use crate::style::Style;
use crate::timeline::{Playback, Timeline};
use crate::trigger::{edge_crossing, ScrollTrigger, TriggerEvent, Zone};

/// Animated pieces of a section's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Container,
    HeadingChar(u16),
    Card(u16),
    Word(u16),
    ListItem(u16),
}

/// How many of each staggered child a section has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartCounts {
    pub chars: u16,
    pub cards: u16,
    pub words: u16,
    pub list_items: u16,
}

/// Section edges in document px.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionBounds {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Above the entry line.
    Before,
    /// Entry sequence playing.
    Entering,
    InView,
    /// Exit scrub between its ends.
    Exiting,
    /// Exit scrub complete; bottom edge at or above the viewport top.
    Exited,
}

/// Side effects a section asks the stage to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionEffect {
    ParticleTarget(f32),
}

pub type SectionEffects = SmallVec<[SectionEffect; 2]>;

/// Builds the entry sequence: container, heading characters, cards,
/// paragraph words, list items, each group at its own offset.
pub fn entry_timeline(counts: PartCounts, cfg: &EntryConfig) -> Timeline<Part> {
    let mut tl = Timeline::new();
    let container_from = Style {
        y: cfg.container_offset,
        opacity: 0.0,
        scale: cfg.container_scale,
        ..Style::IDENTITY
    };
    tl.add(
        Part::Container,
        cfg.container.offset,
        cfg.container.duration,
        container_from,
        Style::IDENTITY,
        cfg.container.ease,
    );

    let groups: [(StaggerConfig, u16, fn(u16) -> Part, Style); 4] = [
        (cfg.chars, counts.chars, Part::HeadingChar, config::CHAR_HIDDEN),
        (cfg.cards, counts.cards, Part::Card, config::CARD_HIDDEN),
        (cfg.words, counts.words, Part::Word, config::WORD_HIDDEN),
        (cfg.list_items, counts.list_items, Part::ListItem, config::LIST_ITEM_HIDDEN),
    ];
    for (group, count, part, hidden) in groups {
        tl.add_staggered(
            (0..count).map(part),
            group.offset,
            group.stagger,
            group.duration,
            hidden,
            Style::IDENTITY,
            group.ease,
        );
    }
    tl
}

/// Scroll-scrubbed exit: lift, fade, shrink and blur.
#[derive(Debug, Clone, Copy)]
pub struct ExitScrub {
    cfg: ExitConfig,
}

impl ExitScrub {
    pub fn new(cfg: ExitConfig) -> Self {
        Self { cfg }
    }

    /// Style at scrub `progress` in [0, 1]; both ends are exact.
    pub fn sample(&self, progress: f32) -> Style {
        let e = self.cfg.ease.apply(progress);
        Style {
            x: 0.0,
            y: -self.cfg.lift * e,
            opacity: 1.0 - e,
            scale: lerp(1.0, self.cfg.end_scale, e),
            rotate_x: 0.0,
            blur: self.cfg.max_blur * e,
        }
    }
}

/// Entry trigger handler: enter replays, leaving back above the start line
/// rewinds to hidden. Other transitions leave the sequence alone.
pub fn apply_entry_event(timeline: &mut Timeline<Part>, event: TriggerEvent) {
    match event {
        TriggerEvent::Enter => timeline.restart(),
        TriggerEvent::LeaveBack => timeline.reset(),
        TriggerEvent::Leave | TriggerEvent::EnterBack => {}
    }
}

/// Feature trigger handler, symmetric in both scroll directions.
pub fn feature_effect(event: TriggerEvent) -> SectionEffect {
    match event {
        TriggerEvent::Enter | TriggerEvent::EnterBack => SectionEffect::ParticleTarget(1.0),
        TriggerEvent::Leave | TriggerEvent::LeaveBack => SectionEffect::ParticleTarget(0.0),
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    entry_cfg: EntryConfig,
    exit_cfg: ExitConfig,
    entry_trigger: ScrollTrigger,
    exit_trigger: ScrollTrigger,
    feature_trigger: Option<ScrollTrigger>,
    entry: Timeline<Part>,
    exit: ExitScrub,
    exit_progress: f32,
}

impl Section {
    pub fn new(name: impl Into<String>, counts: PartCounts, feature: bool) -> Self {
        Self::with_config(name, counts, feature, config::ENTRY, config::EXIT)
    }

    pub fn with_config(
        name: impl Into<String>,
        counts: PartCounts,
        feature: bool,
        entry_cfg: EntryConfig,
        exit_cfg: ExitConfig,
    ) -> Self {
        Self {
            name: name.into(),
            entry_cfg,
            exit_cfg,
            entry_trigger: ScrollTrigger::new(0.0, 0.0),
            exit_trigger: ScrollTrigger::new(0.0, 0.0),
            feature_trigger: feature.then(|| ScrollTrigger::new(0.0, 0.0)),
            entry: entry_timeline(counts, &entry_cfg),
            exit: ExitScrub::new(exit_cfg),
            exit_progress: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_feature(&self) -> bool {
        self.feature_trigger.is_some()
    }

    /// True while the scroll sits inside this section's feature range.
    pub fn feature_active(&self) -> bool {
        self.feature_trigger.as_ref().is_some_and(|t| t.zone() == Some(Zone::Active))
    }

    /// Recomputes trigger lines from document bounds and viewport height.
    pub fn layout(&mut self, bounds: SectionBounds, viewport_height: f32) {
        let vh = viewport_height.max(0.0);
        self.entry_trigger.set_range(
            edge_crossing(bounds.top, self.entry_cfg.start_viewport, vh),
            edge_crossing(bounds.bottom, 0.0, vh),
        );
        self.exit_trigger.set_range(
            edge_crossing(bounds.bottom, self.exit_cfg.start_viewport, vh),
            edge_crossing(bounds.bottom, 0.0, vh),
        );
        if let Some(feature) = &mut self.feature_trigger {
            feature.set_range(
                edge_crossing(bounds.top, config::FEATURE_LINE, vh),
                edge_crossing(bounds.bottom, config::FEATURE_LINE, vh),
            );
        }
    }

    /// One frame: evaluate triggers at `scroll`, then advance the entry
    /// sequence by `dt` seconds.
    pub fn update(&mut self, scroll: f32, dt: f32) -> SectionEffects {
        for event in self.entry_trigger.update(scroll) {
            log::debug!("section {}: entry {:?}", self.name, event);
            apply_entry_event(&mut self.entry, event);
        }
        self.exit_progress = self.exit_trigger.progress(scroll);

        let mut effects = SectionEffects::new();
        if let Some(feature) = &mut self.feature_trigger {
            for event in feature.update(scroll) {
                log::debug!("section {}: feature {:?}", self.name, event);
                effects.push(feature_effect(event));
            }
        }

        self.entry.tick(dt);
        effects
    }

    pub fn phase(&self) -> Phase {
        match self.entry_trigger.zone() {
            None | Some(Zone::Before) => Phase::Before,
            _ if self.exit_progress >= 1.0 => Phase::Exited,
            _ if self.exit_progress > 0.0 => Phase::Exiting,
            _ if self.entry.playback() == Playback::Playing => Phase::Entering,
            _ => Phase::InView,
        }
    }

    pub fn exit_progress(&self) -> f32 {
        self.exit_progress
    }

    /// Style of the section element itself.
    pub fn exit_style(&self) -> Style {
        self.exit.sample(self.exit_progress)
    }

    /// Styles of the entry children.
    pub fn entry_styles(&self) -> impl Iterator<Item = (Part, Style)> + '_ {
        self.entry.sample()
    }

    pub fn entry_timeline(&self) -> &Timeline<Part> {
        &self.entry
    }

    /// Rewinds every trigger and the entry sequence.
    pub fn reset(&mut self) {
        self.entry_trigger.reset();
        self.exit_trigger.reset();
        if let Some(feature) = &mut self.feature_trigger {
            feature.reset();
        }
        self.entry.reset();
        self.exit_progress = 0.0;
    }
}

/// Every section on the page, updated together once per frame.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    items: Vec<Section>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: Section) -> usize {
        self.items.push(section);
        self.items.len() - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.items.iter()
    }

    pub fn layout(&mut self, index: usize, bounds: SectionBounds, viewport_height: f32) {
        if let Some(section) = self.items.get_mut(index) {
            section.layout(bounds, viewport_height);
        }
    }

    /// Updates every section. When any feature trigger fired this frame the
    /// particle target is resolved from where the scroll now sits, not from
    /// the order the sections reported their events in.
    pub fn update(&mut self, scroll: f32, dt: f32) -> Option<SectionEffect> {
        let mut fired = false;
        for section in &mut self.items {
            fired |= !section.update(scroll, dt).is_empty();
        }
        fired.then(|| {
            let active = self.items.iter().any(Section::feature_active);
            SectionEffect::ParticleTarget(if active { 1.0 } else { 0.0 })
        })
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f32 = 800.0;

    fn counts() -> PartCounts {
        PartCounts { chars: 5, cards: 2, words: 6, list_items: 3 }
    }

    fn laid_out(feature: bool) -> Section {
        let mut s = Section::new("work", counts(), feature);
        s.layout(SectionBounds { top: 1000.0, bottom: 1800.0 }, VH);
        s
    }

    #[test]
    fn groups_start_in_declared_order() {
        let tl = entry_timeline(counts(), &config::ENTRY);
        let starts = [
            tl.start_of(Part::Container).unwrap(),
            tl.start_of(Part::HeadingChar(0)).unwrap(),
            tl.start_of(Part::Card(0)).unwrap(),
            tl.start_of(Part::Word(0)).unwrap(),
            tl.start_of(Part::ListItem(0)).unwrap(),
        ];
        assert!(starts.windows(2).all(|w| w[0] < w[1]), "{starts:?}");
        assert_eq!(tl.len(), 1 + 5 + 2 + 6 + 3);
    }

    #[test]
    fn entry_plays_once_crossed() {
        let mut s = laid_out(false);
        s.update(0.0, 0.016);
        assert_eq!(s.phase(), Phase::Before);
        // entry line: 1000 - 0.8 * 800 = 360
        s.update(400.0, 0.016);
        assert_eq!(s.phase(), Phase::Entering);
        for _ in 0..200 {
            s.update(400.0, 0.016);
        }
        assert_eq!(s.phase(), Phase::InView);
        assert!(s.entry_styles().all(|(_, st)| st == Style::IDENTITY));
    }

    #[test]
    fn entry_replays_after_leaving_back() {
        let mut s = laid_out(false);
        s.update(400.0, 10.0);
        assert_eq!(s.entry_timeline().playback(), Playback::Finished);
        s.update(0.0, 0.016);
        assert_eq!(s.entry_timeline().playback(), Playback::Idle);
        s.update(400.0, 0.0);
        assert_eq!(s.entry_timeline().playback(), Playback::Playing);
        assert_eq!(s.entry_timeline().time(), 0.0);
    }

    #[test]
    fn exit_scrubs_with_position() {
        let mut s = laid_out(false);
        // exit runs from 1800 - 480 = 1320 to 1800
        s.update(1320.0, 0.016);
        assert_eq!(s.exit_progress(), 0.0);
        s.update(1560.0, 0.016);
        assert_eq!(s.phase(), Phase::Exiting);
        assert!((s.exit_progress() - 0.5).abs() < 1e-6);
        s.update(1800.0, 0.016);
        assert_eq!(s.phase(), Phase::Exited);
        let end = s.exit_style();
        assert_eq!(end.opacity, 0.0);
        assert_eq!(end.blur, config::EXIT.max_blur);
    }

    #[test]
    fn feature_section_toggles_particles_both_ways() {
        let mut s = laid_out(true);
        s.update(0.0, 0.0);
        // feature range: 600 .. 1400
        assert_eq!(s.update(700.0, 0.0).as_slice(), &[SectionEffect::ParticleTarget(1.0)]);
        assert_eq!(s.update(1500.0, 0.0).as_slice(), &[SectionEffect::ParticleTarget(0.0)]);
        assert_eq!(s.update(1300.0, 0.0).as_slice(), &[SectionEffect::ParticleTarget(1.0)]);
        assert_eq!(s.update(100.0, 0.0).as_slice(), &[SectionEffect::ParticleTarget(0.0)]);
    }

    #[test]
    fn stacked_features_resolve_to_section_in_range() {
        let mut sections = Sections::new();
        for (name, top) in [("a", 2000.0), ("b", 3000.0)] {
            let idx = sections.push(Section::new(name, counts(), true));
            sections.layout(idx, SectionBounds { top, bottom: top + 1000.0 }, 1000.0);
        }
        assert_eq!(sections.update(0.0, 0.0), None);
        // a: 1500 .. 2500, b: 2500 .. 3500
        assert_eq!(sections.update(3000.0, 0.0), Some(SectionEffect::ParticleTarget(1.0)));
        // a re-entered from below while b is left behind in the same frame
        assert_eq!(sections.update(2000.0, 0.0), Some(SectionEffect::ParticleTarget(1.0)));
        assert!(sections.get(0).unwrap().feature_active());
        assert!(!sections.get(1).unwrap().feature_active());
        assert_eq!(sections.update(500.0, 0.0), Some(SectionEffect::ParticleTarget(0.0)));
    }

    #[test]
    fn plain_section_has_no_effects() {
        let mut s = laid_out(false);
        assert!(s.update(700.0, 0.0).is_empty());
        assert!(!s.is_feature());
    }

    #[test]
    fn reset_rewinds_everything() {
        let mut s = laid_out(true);
        s.update(1600.0, 5.0);
        s.reset();
        assert_eq!(s.phase(), Phase::Before);
        assert_eq!(s.exit_progress(), 0.0);
        assert_eq!(s.entry_timeline().playback(), Playback::Idle);
    }
}
