//! Tuning constants for the stage.
//!
//! None of these are runtime inputs. They are grouped into small `Copy`
//! structs so modules take them by value and tests can hand in alternatives.

use crate::easing::Easing;
use crate::error::{Error, Result};
use crate::style::Style;

/// Distance the mesh travels along z over the full page.
pub const MESH_Z_TRAVEL: f32 = 1.5;

/// Peak tilt around x, reached at half scroll.
pub const MESH_TILT: f32 = 0.3;

/// Amplitude of the vertical bob over one full scroll.
pub const MESH_BOB: f32 = 0.5;

/// Per-frame lerp factor of the particle cross-fade.
pub const PARTICLE_LERP: f32 = 0.05;

/// Lerp factor of the smooth-scroll driver at 60fps.
pub const SCROLL_LERP: f32 = 0.1;

/// Multiplier applied to raw wheel deltas.
pub const WHEEL_MULTIPLIER: f32 = 1.0;

/// Below this distance the smooth-scroll driver snaps to its target.
pub const SCROLL_SETTLE_PX: f32 = 0.5;

/// Gain from 3D spring speed to the magnetic influence scalar.
pub const INFLUENCE_GAIN: f32 = 8.0;

/// One-pole smoothing of the influence scalar.
pub const INFLUENCE_LERP: f32 = 0.1;

/// Interactive elements the cursor grows over.
pub const INTERACTIVE_SELECTOR: &str = "a, button, [data-cursor]";

/// Device pixel ratio cap for the canvas backing store.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Frame delta clamp, in seconds, so a background tab does not jump timelines.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Coefficients of a discrete spring follower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
}

impl SpringConfig {
    /// Validated constructor. Damping at or above one never settles.
    pub fn new(stiffness: f32, damping: f32) -> Result<Self> {
        let ok = stiffness > 0.0 && stiffness <= 1.0 && (0.0..1.0).contains(&damping);
        if !ok {
            return Err(Error::InvalidSpring { stiffness, damping });
        }
        Ok(Self { stiffness, damping })
    }
}

pub const CURSOR_SPRING: SpringConfig = SpringConfig { stiffness: 0.15, damping: 0.75 };
pub const TRAIL_SPRING: SpringConfig = SpringConfig { stiffness: 0.08, damping: 0.82 };
pub const MAGNET_SPRING: SpringConfig = SpringConfig { stiffness: 0.08, damping: 0.85 };

/// Rejects any spring preset that would never settle. Checked once at mount.
pub fn validate_presets() -> Result<()> {
    for preset in [CURSOR_SPRING, TRAIL_SPRING, MAGNET_SPRING] {
        SpringConfig::new(preset.stiffness, preset.damping)?;
    }
    Ok(())
}

/// Perspective camera looking down -z at the origin.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

pub const CAMERA: CameraConfig = CameraConfig {
    fov_y_degrees: 75.0,
    distance: 5.0,
    near: 0.1,
    far: 100.0,
};

/// One staggered group inside the entry sequence.
#[derive(Debug, Clone, Copy)]
pub struct StaggerConfig {
    /// Seconds from sequence start to the first element.
    pub offset: f32,
    /// Seconds between siblings.
    pub stagger: f32,
    pub duration: f32,
    pub ease: Easing,
}

/// Entry sequence timings. Offsets overlap on purpose.
#[derive(Debug, Clone, Copy)]
pub struct EntryConfig {
    /// Fraction of viewport height the section top must cross.
    pub start_viewport: f32,
    /// Starting vertical offset of the container, px.
    pub container_offset: f32,
    pub container_scale: f32,
    pub container: StaggerConfig,
    pub chars: StaggerConfig,
    pub cards: StaggerConfig,
    pub words: StaggerConfig,
    pub list_items: StaggerConfig,
}

pub const ENTRY: EntryConfig = EntryConfig {
    start_viewport: 0.8,
    container_offset: 100.0,
    container_scale: 0.95,
    container: StaggerConfig { offset: 0.0, stagger: 0.0, duration: 1.2, ease: Easing::PowerOut(3) },
    chars: StaggerConfig { offset: 0.2, stagger: 0.03, duration: 0.8, ease: Easing::BackOut(1.7) },
    cards: StaggerConfig { offset: 0.4, stagger: 0.1, duration: 0.8, ease: Easing::PowerOut(3) },
    words: StaggerConfig { offset: 0.5, stagger: 0.02, duration: 0.6, ease: Easing::PowerOut(2) },
    list_items: StaggerConfig { offset: 0.6, stagger: 0.08, duration: 0.6, ease: Easing::PowerOut(2) },
};

/// Starting states of the staggered children; each ends at `Style::IDENTITY`.
pub const CHAR_HIDDEN: Style = Style { y: 50.0, opacity: 0.0, rotate_x: -90.0, ..Style::IDENTITY };
pub const CARD_HIDDEN: Style = Style { y: 60.0, opacity: 0.0, scale: 0.9, ..Style::IDENTITY };
pub const WORD_HIDDEN: Style = Style { y: 20.0, opacity: 0.0, ..Style::IDENTITY };
pub const LIST_ITEM_HIDDEN: Style = Style { x: -30.0, opacity: 0.0, ..Style::IDENTITY };

/// Feature sections switch particle mode while their top-to-bottom span
/// straddles this viewport line.
pub const FEATURE_LINE: f32 = 0.5;

/// Scroll-scrubbed exit.
#[derive(Debug, Clone, Copy)]
pub struct ExitConfig {
    /// Fraction of viewport height the section bottom must cross to start.
    pub start_viewport: f32,
    /// Upward travel at the end of the scrub, px.
    pub lift: f32,
    pub end_scale: f32,
    pub max_blur: f32,
    pub ease: Easing,
}

pub const EXIT: ExitConfig = ExitConfig {
    start_viewport: 0.6,
    lift: 100.0,
    end_scale: 0.95,
    max_blur: 8.0,
    ease: Easing::PowerIn(1),
};

/// Colours fed to the mesh shaders, linear RGB.
pub const MESH_COLOR_A: [f32; 3] = [0.39, 0.27, 0.92];
pub const MESH_COLOR_B: [f32; 3] = [0.07, 0.78, 0.86];
pub const CLEAR_COLOR: [f32; 4] = [0.02, 0.02, 0.04, 1.0];

/// Sphere tessellation.
pub const SPHERE_RADIUS: f32 = 1.6;
pub const SPHERE_SEGMENTS: u32 = 96;
pub const SPHERE_RINGS: u32 = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_pass_validation() {
        assert!(validate_presets().is_ok());
        for preset in [CURSOR_SPRING, TRAIL_SPRING, MAGNET_SPRING] {
            assert_eq!(SpringConfig::new(preset.stiffness, preset.damping).ok(), Some(preset));
        }
    }

    #[test]
    fn undamped_spring_rejected() {
        assert!(matches!(SpringConfig::new(0.2, 1.0), Err(Error::InvalidSpring { .. })));
        assert!(SpringConfig::new(0.0, 0.5).is_err());
    }

    #[test]
    fn trail_is_looser_than_cursor() {
        assert!(TRAIL_SPRING.stiffness < CURSOR_SPRING.stiffness);
    }

    #[test]
    fn entry_groups_start_in_order() {
        let offsets = [
            ENTRY.container.offset,
            ENTRY.chars.offset,
            ENTRY.cards.offset,
            ENTRY.words.offset,
            ENTRY.list_items.offset,
        ];
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }
}
