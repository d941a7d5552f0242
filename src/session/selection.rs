//! Selection state and outline proximity tests.
//!
//! Annotation and measurement selection are two independent single slots,
//! not a set: selecting a new id silently replaces the prior one. Selection
//! never mutates geometry.

use crate::annotation::{Annotation, AnnotationCollection, AnnotationKind};
use crate::geometry::{distance_to_segment, BoundingBox, Point, Rect};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_annotation: Option<String>,
    selected_measurement: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_annotation(&mut self, id: impl Into<String>) {
        self.selected_annotation = Some(id.into());
    }

    pub fn clear_annotation(&mut self) {
        self.selected_annotation = None;
    }

    pub fn select_measurement(&mut self, id: impl Into<String>) {
        self.selected_measurement = Some(id.into());
    }

    pub fn clear_measurement(&mut self) {
        self.selected_measurement = None;
    }

    pub fn selected_annotation_id(&self) -> Option<&str> {
        self.selected_annotation.as_deref()
    }

    pub fn selected_measurement_id(&self) -> Option<&str> {
        self.selected_measurement.as_deref()
    }

    pub fn is_annotation_selected(&self, id: &str) -> bool {
        self.selected_annotation.as_deref() == Some(id)
    }

    pub fn selected_annotation<'a>(
        &self,
        annotations: &'a AnnotationCollection,
    ) -> Option<&'a Annotation> {
        annotations.get(self.selected_annotation.as_deref()?)
    }
}

/// Whether `position` (canvas space) lies within `threshold` of the
/// annotation's outline. The outline is the shape's segments, with a closing
/// segment for closed shapes; circles test against the ring.
pub fn near_annotation_edge(
    position: Point,
    annotation: &Annotation,
    threshold: f64,
    image_to_canvas: impl Fn(Point) -> Point,
) -> bool {
    let canvas_points = annotation.canvas_points(image_to_canvas);

    match annotation.kind {
        AnnotationKind::Rectangle => {
            let [p1, p2] = canvas_points[..] else {
                return false;
            };
            let corners = [
                Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
                Point::new(p1.x.max(p2.x), p1.y.min(p2.y)),
                Point::new(p1.x.max(p2.x), p1.y.max(p2.y)),
                Point::new(p1.x.min(p2.x), p1.y.max(p2.y)),
            ];
            any_segment_within(position, &corners, true, threshold)
        }
        AnnotationKind::Circle => {
            let [center, edge] = canvas_points[..] else {
                return false;
            };
            let radius = center.distance_to(edge);
            (position.distance_to(center) - radius).abs() <= threshold
        }
        AnnotationKind::Text => canvas_points
            .first()
            .is_some_and(|anchor| position.distance_to(*anchor) <= threshold),
        kind => any_segment_within(position, &canvas_points, kind.is_closed(), threshold),
    }
}

fn any_segment_within(position: Point, points: &[Point], closed: bool, threshold: f64) -> bool {
    if points.len() < 2 {
        return false;
    }
    let segment_count = if closed {
        points.len()
    } else {
        points.len() - 1
    };
    (0..segment_count).any(|i| {
        let start = points[i];
        let end = points[(i + 1) % points.len()];
        distance_to_segment(position, start, end) <= threshold
    })
}

/// Canvas-space bounding rect of an annotation, for highlight placement and
/// dirty-region marking. Circles use `center ± radius`, not the two stored
/// points.
pub fn canvas_bounding_box(
    annotation: &Annotation,
    image_to_canvas: impl Fn(Point) -> Point,
) -> Rect {
    let canvas_points = annotation.canvas_points(image_to_canvas);

    if annotation.kind == AnnotationKind::Circle {
        if let [center, edge] = canvas_points[..] {
            let radius = center.distance_to(edge);
            return Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            );
        }
    }

    BoundingBox::from_points(&canvas_points).to_rect()
}
