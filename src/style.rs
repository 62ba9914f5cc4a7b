//! Animated visual properties and their CSS rendering.

use std::fmt::Write;

use crate::easing::lerp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Horizontal offset, px.
    pub x: f32,
    /// Vertical offset, px; negative is up.
    pub y: f32,
    pub opacity: f32,
    pub scale: f32,
    /// Rotation about x, degrees.
    pub rotate_x: f32,
    /// Gaussian blur radius, px.
    pub blur: f32,
}

impl Style {
    /// Natural resting state.
    pub const IDENTITY: Style = Style { x: 0.0, y: 0.0, opacity: 1.0, scale: 1.0, rotate_x: 0.0, blur: 0.0 };

    pub fn lerp(&self, to: &Style, t: f32) -> Style {
        Style {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            opacity: lerp(self.opacity, to.opacity, t).clamp(0.0, 1.0),
            scale: lerp(self.scale, to.scale, t),
            rotate_x: lerp(self.rotate_x, to.rotate_x, t),
            blur: lerp(self.blur, to.blur, t).max(0.0),
        }
    }

    /// `transform` value; an identity style renders as `none`.
    pub fn transform_css(&self) -> String {
        if self.x == 0.0 && self.y == 0.0 && self.scale == 1.0 && self.rotate_x == 0.0 {
            return "none".to_string();
        }
        let mut css = format!("translate3d({:.2}px, {:.2}px, 0px)", self.x, self.y);
        if self.scale != 1.0 {
            let _ = write!(css, " scale({:.4})", self.scale);
        }
        if self.rotate_x != 0.0 {
            let _ = write!(css, " rotateX({:.2}deg)", self.rotate_x);
        }
        css
    }

    pub fn opacity_css(&self) -> String {
        format!("{:.4}", self.opacity)
    }

    /// `filter` value; no blur renders as `none`.
    pub fn filter_css(&self) -> String {
        if self.blur <= 0.0 {
            "none".to_string()
        } else {
            format!("blur({:.2}px)", self.blur)
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_renders_none() {
        assert_eq!(Style::IDENTITY.transform_css(), "none");
        assert_eq!(Style::IDENTITY.filter_css(), "none");
        assert_eq!(Style::IDENTITY.opacity_css(), "1.0000");
    }

    #[test]
    fn transform_composes() {
        let s = Style { y: 12.5, scale: 0.95, rotate_x: -90.0, ..Style::IDENTITY };
        assert_eq!(s.transform_css(), "translate3d(0.00px, 12.50px, 0px) scale(0.9500) rotateX(-90.00deg)");
    }

    #[test]
    fn lerp_hits_both_ends() {
        let from = Style { y: 100.0, opacity: 0.0, scale: 0.9, ..Style::IDENTITY };
        assert_eq!(from.lerp(&Style::IDENTITY, 0.0), from);
        assert_eq!(from.lerp(&Style::IDENTITY, 1.0), Style::IDENTITY);
    }

    #[test]
    fn overshoot_keeps_opacity_valid() {
        let from = Style { opacity: 0.0, ..Style::IDENTITY };
        let s = from.lerp(&Style::IDENTITY, 1.1);
        assert_eq!(s.opacity, 1.0);
        assert!(s.y == 0.0);
    }
}
