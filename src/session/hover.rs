//! Hover state and the visual treatment applied to hovered elements.
//!
//! Hover never mutates the annotation itself. The derived [`HoverStyle`] is
//! computed on demand from the base style, and transitions are caller-driven:
//! the session records start values and the renderer samples [`HoverTransition`]
//! with its own clock.

use crate::annotation::{Annotation, AnnotationStyle, Color};

/// Scale applied to a control point's drawn size while hovered.
pub const HOVER_CONTROL_POINT_SCALE: f64 = 1.5;

/// Base drawn radius of a control point, in canvas pixels.
pub const CONTROL_POINT_BASE_SIZE: f64 = 8.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered_annotation: Option<String>,
    hovered_control_point: Option<String>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the hovered annotation and reports whether it changed.
    pub fn set_hovered_annotation(&mut self, id: Option<String>) -> bool {
        if self.hovered_annotation == id {
            return false;
        }
        self.hovered_annotation = id;
        true
    }

    pub fn set_hovered_control_point(&mut self, id: Option<String>) -> bool {
        if self.hovered_control_point == id {
            return false;
        }
        self.hovered_control_point = id;
        true
    }

    pub fn hovered_annotation_id(&self) -> Option<&str> {
        self.hovered_annotation.as_deref()
    }

    pub fn hovered_control_point_id(&self) -> Option<&str> {
        self.hovered_control_point.as_deref()
    }

    pub fn is_annotation_hovered(&self, id: &str) -> bool {
        self.hovered_annotation.as_deref() == Some(id)
    }

    pub fn is_control_point_hovered(&self, id: &str) -> bool {
        self.hovered_control_point.as_deref() == Some(id)
    }

    pub fn clear(&mut self) {
        self.hovered_annotation = None;
        self.hovered_control_point = None;
    }
}

/// Style overrides the renderer applies to a hovered annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverStyle {
    pub stroke: Color,
    pub fill: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub glow_color: Color,
    pub glow_radius: f64,
}

impl HoverStyle {
    /// Derives the hover treatment from an annotation's base style: colors
    /// lightened toward white, stroke one pixel wider, opacity raised and
    /// a soft glow in the lightened stroke color.
    pub fn for_annotation(annotation: &Annotation) -> Self {
        Self::from_style(&annotation.style)
    }

    pub fn from_style(style: &AnnotationStyle) -> Self {
        let stroke = style.stroke.lightened(0.3);
        Self {
            stroke,
            fill: style.fill.map(|c| c.lightened(0.3)),
            stroke_width: style.stroke_width + 1.0,
            opacity: (style.opacity + 0.2).min(1.0),
            glow_color: stroke,
            glow_radius: 6.0,
        }
    }
}

/// Drawn radius of a control point given its hover state.
pub fn control_point_size(hovered: bool) -> f64 {
    if hovered {
        CONTROL_POINT_BASE_SIZE * HOVER_CONTROL_POINT_SCALE
    } else {
        CONTROL_POINT_BASE_SIZE
    }
}

/// Cubic ease-out, mapping progress in `[0, 1]` to an eased `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let clamped = t.clamp(0.0, 1.0);
    let inverted = 1.0 - clamped;
    1.0 - inverted * inverted * inverted
}

/// A scalar transition the renderer samples against its own clock. Used for
/// fading hover highlights in and out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverTransition {
    pub from: f64,
    pub to: f64,
    /// Duration in milliseconds.
    pub duration: f64,
}

impl HoverTransition {
    pub fn new(from: f64, to: f64, duration: f64) -> Self {
        Self { from, to, duration }
    }

    /// Eased value after `elapsed` milliseconds. Saturates at `to` once the
    /// duration has passed; a zero duration snaps immediately.
    pub fn value_at(&self, elapsed: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let progress = ease_out_cubic(elapsed / self.duration);
        self.from + (self.to - self.from) * progress
    }

    pub fn is_finished(&self, elapsed: f64) -> bool {
        self.duration <= 0.0 || elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use crate::geometry::Point;

    #[test]
    fn hover_state_reports_changes_only_when_the_target_differs() {
        let mut hover = HoverState::new();
        assert!(hover.set_hovered_annotation(Some("a1".into())));
        assert!(!hover.set_hovered_annotation(Some("a1".into())));
        assert!(hover.set_hovered_annotation(None));
        assert!(!hover.set_hovered_annotation(None));
    }

    #[test]
    fn clearing_hover_resets_both_slots() {
        let mut hover = HoverState::new();
        hover.set_hovered_annotation(Some("a1".into()));
        hover.set_hovered_control_point(Some("a1-nw".into()));
        hover.clear();
        assert!(hover.hovered_annotation_id().is_none());
        assert!(hover.hovered_control_point_id().is_none());
    }

    #[test]
    fn hover_style_lightens_and_widens_the_base_style() {
        let annotation = Annotation::new(
            "a1",
            AnnotationKind::Rectangle,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        );
        let base = annotation.style;
        let hover = HoverStyle::for_annotation(&annotation);

        assert_eq!(hover.stroke, base.stroke.lightened(0.3));
        assert_eq!(hover.stroke_width, base.stroke_width + 1.0);
        assert!(hover.opacity <= 1.0);
        assert!(hover.opacity >= base.opacity);
        assert_eq!(hover.glow_color, hover.stroke);
    }

    #[test]
    fn opacity_boost_saturates_at_one() {
        let style = AnnotationStyle {
            opacity: 0.95,
            ..AnnotationStyle::default()
        };
        assert_eq!(HoverStyle::from_style(&style).opacity, 1.0);
    }

    #[test]
    fn hovered_control_points_draw_larger() {
        assert_eq!(control_point_size(false), 8.0);
        assert_eq!(control_point_size(true), 12.0);
    }

    #[test]
    fn ease_out_cubic_hits_the_endpoints_and_front_loads_progress() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn transition_saturates_at_the_target_value() {
        let transition = HoverTransition::new(0.0, 1.0, 200.0);
        assert_eq!(transition.value_at(0.0), 0.0);
        assert!(transition.value_at(100.0) > 0.5);
        assert_eq!(transition.value_at(200.0), 1.0);
        assert_eq!(transition.value_at(500.0), 1.0);
        assert!(transition.is_finished(200.0));
        assert!(!transition.is_finished(150.0));

        let instant = HoverTransition::new(0.0, 1.0, 0.0);
        assert_eq!(instant.value_at(0.0), 1.0);
    }
}
