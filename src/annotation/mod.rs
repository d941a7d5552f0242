//! Annotation data model: the vector shapes and labels a viewer overlays on
//! a rendered image, plus the collection the session mutates.

pub mod control;
pub mod transform;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

pub use control::{generate_control_points, ControlPoint, ControlPointKind, ControlRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Text,
    Arrow,
    Freehand,
    Rectangle,
    Circle,
    Polygon,
    Leader,
    Clinical,
    Measurement,
}

impl AnnotationKind {
    /// Point cardinality the kind requires, where fixed. Polygon, freehand
    /// and the remaining kinds accept any count.
    pub const fn required_points(self) -> Option<usize> {
        match self {
            Self::Rectangle | Self::Circle | Self::Arrow => Some(2),
            Self::Text => Some(1),
            Self::Freehand
            | Self::Polygon
            | Self::Leader
            | Self::Clinical
            | Self::Measurement => None,
        }
    }

    /// Closed shapes get a closing segment when decomposed into an outline.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Polygon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Blend toward white by `amount` in 0..=1.
    pub fn lightened(self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let lift = |channel: u8| {
            let channel = f64::from(channel);
            (channel + (255.0 - channel) * amount).floor().min(255.0) as u8
        };
        Self::new(lift(self.r), lift(self.g), lift(self.b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    pub stroke: Color,
    #[serde(default)]
    pub fill: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            stroke: Color::new(255, 215, 0),
            fill: None,
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// A user-drawn vector shape or label. Geometry mutations never edit an
/// annotation in place; `transform` produces a new value with a refreshed
/// `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub kind: AnnotationKind,
    pub points: Vec<Point>,
    #[serde(default)]
    pub text: Option<String>,
    pub style: AnnotationStyle,
    pub normalized: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Annotation {
    pub fn new(id: impl Into<String>, kind: AnnotationKind, points: Vec<Point>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            kind,
            points,
            text: None,
            style: AnnotationStyle::default(),
            normalized: true,
            created_at: now,
            updated_at: now,
            metadata: None,
        }
    }

    pub fn with_text(
        id: impl Into<String>,
        kind: AnnotationKind,
        points: Vec<Point>,
        text: impl Into<String>,
    ) -> Self {
        let mut annotation = Self::new(id, kind, points);
        annotation.text = Some(text.into());
        annotation
    }

    /// Whether `points` matches the cardinality the kind requires.
    pub fn has_valid_cardinality(&self) -> bool {
        match self.kind.required_points() {
            Some(required) => self.points.len() == required,
            None => true,
        }
    }

    /// Annotation points mapped into canvas space: passed through
    /// `image_to_canvas` when normalized, used as-is otherwise.
    pub fn canvas_points(&self, image_to_canvas: impl Fn(Point) -> Point) -> Vec<Point> {
        if self.normalized {
            self.points.iter().copied().map(image_to_canvas).collect()
        } else {
            self.points.clone()
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The live annotation set for one viewed image. Order is insertion order,
/// which is also draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationCollection {
    annotations: Vec<Annotation>,
}

impl AnnotationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the annotation with the same id, or appends when absent.
    pub fn upsert(&mut self, annotation: Annotation) {
        match self
            .annotations
            .iter_mut()
            .find(|existing| existing.id == annotation.id)
        {
            Some(existing) => *existing = annotation,
            None => self.annotations.push(annotation),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        Some(self.annotations.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
