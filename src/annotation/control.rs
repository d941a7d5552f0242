//! Control point generation and hit detection.
//!
//! Control points are ephemeral: derived from the current annotation and
//! transform on demand, never persisted, and discarded whenever selection or
//! geometry changes. Ids are deterministic (`{annotation_id}-{role}`) so
//! repeated generation for an unchanged annotation yields identical ids.

use crate::cursor::CursorKind;
use crate::geometry::Point;

use super::{Annotation, AnnotationKind};

/// Which handle of the annotation a control point edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRole {
    /// Rectangle corners.
    Nw,
    Ne,
    Sw,
    Se,
    /// Rectangle edge midpoints and circle cardinals.
    North,
    South,
    East,
    West,
    /// A vertex of a polygon, freehand stroke, or fallback shape.
    Vertex(usize),
    /// Arrow endpoints.
    Start,
    End,
    /// Text anchor.
    Center,
}

impl ControlRole {
    pub fn label(self) -> String {
        match self {
            Self::Nw => "nw".to_string(),
            Self::Ne => "ne".to_string(),
            Self::Sw => "sw".to_string(),
            Self::Se => "se".to_string(),
            Self::North => "n".to_string(),
            Self::South => "s".to_string(),
            Self::East => "e".to_string(),
            Self::West => "w".to_string(),
            Self::Vertex(index) => format!("p{index}"),
            Self::Start => "start".to_string(),
            Self::End => "end".to_string(),
            Self::Center => "center".to_string(),
        }
    }

    const fn cursor(self) -> CursorKind {
        match self {
            Self::Nw => CursorKind::ResizeNw,
            Self::Ne => CursorKind::ResizeNe,
            Self::Sw => CursorKind::ResizeSw,
            Self::Se => CursorKind::ResizeSe,
            Self::North => CursorKind::ResizeN,
            Self::South => CursorKind::ResizeS,
            Self::East => CursorKind::ResizeE,
            Self::West => CursorKind::ResizeW,
            Self::Vertex(_) | Self::Start | Self::End | Self::Center => CursorKind::Move,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPointKind {
    Corner,
    Edge,
    Point,
    Center,
}

/// An interactive handle for resizing or moving an annotation vertex.
/// Positions are always canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoint {
    pub id: String,
    pub annotation_id: String,
    pub kind: ControlPointKind,
    pub role: ControlRole,
    pub position: Point,
    pub cursor: CursorKind,
    /// Index into `points` for vertex-editing control points.
    pub index: Option<usize>,
}

impl ControlPoint {
    fn new(
        annotation: &Annotation,
        kind: ControlPointKind,
        role: ControlRole,
        position: Point,
        index: Option<usize>,
    ) -> Self {
        Self {
            id: format!("{}-{}", annotation.id, role.label()),
            annotation_id: annotation.id.clone(),
            kind,
            role,
            position,
            cursor: role.cursor(),
            index,
        }
    }
}

/// Derives the editable handles for `annotation`, mapping its points through
/// `image_to_canvas` when they are normalized.
pub fn generate_control_points(
    annotation: &Annotation,
    image_to_canvas: impl Fn(Point) -> Point,
) -> Vec<ControlPoint> {
    let canvas_points = annotation.canvas_points(image_to_canvas);

    match annotation.kind {
        AnnotationKind::Rectangle => rectangle_control_points(annotation, &canvas_points),
        AnnotationKind::Circle => circle_control_points(annotation, &canvas_points),
        AnnotationKind::Freehand | AnnotationKind::Polygon => {
            vertex_control_points(annotation, &canvas_points)
        }
        AnnotationKind::Arrow => arrow_control_points(annotation, &canvas_points),
        AnnotationKind::Text => text_control_points(annotation, &canvas_points),
        // Remaining kinds fall back to one handle per vertex.
        _ => vertex_control_points(annotation, &canvas_points),
    }
}

/// Four corners then four edge midpoints. Corners come first so they win
/// hit-test ties against edges.
fn rectangle_control_points(annotation: &Annotation, canvas_points: &[Point]) -> Vec<ControlPoint> {
    let [p1, p2] = canvas_points else {
        return Vec::new();
    };
    let min_x = p1.x.min(p2.x);
    let max_x = p1.x.max(p2.x);
    let min_y = p1.y.min(p2.y);
    let max_y = p1.y.max(p2.y);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    let corner = |role, x, y| {
        ControlPoint::new(
            annotation,
            ControlPointKind::Corner,
            role,
            Point::new(x, y),
            None,
        )
    };
    let edge = |role, x, y| {
        ControlPoint::new(
            annotation,
            ControlPointKind::Edge,
            role,
            Point::new(x, y),
            None,
        )
    };

    vec![
        corner(ControlRole::Nw, min_x, min_y),
        corner(ControlRole::Ne, max_x, min_y),
        corner(ControlRole::Sw, min_x, max_y),
        corner(ControlRole::Se, max_x, max_y),
        edge(ControlRole::North, mid_x, min_y),
        edge(ControlRole::South, mid_x, max_y),
        edge(ControlRole::West, min_x, mid_y),
        edge(ControlRole::East, max_x, mid_y),
    ]
}

/// Four cardinal handles at `center ± radius` along each axis.
fn circle_control_points(annotation: &Annotation, canvas_points: &[Point]) -> Vec<ControlPoint> {
    let [center, edge] = canvas_points else {
        return Vec::new();
    };
    let radius = center.distance_to(*edge);

    let cardinal = |role, x, y| {
        ControlPoint::new(
            annotation,
            ControlPointKind::Edge,
            role,
            Point::new(x, y),
            None,
        )
    };

    vec![
        cardinal(ControlRole::North, center.x, center.y - radius),
        cardinal(ControlRole::South, center.x, center.y + radius),
        cardinal(ControlRole::West, center.x - radius, center.y),
        cardinal(ControlRole::East, center.x + radius, center.y),
    ]
}

fn vertex_control_points(annotation: &Annotation, canvas_points: &[Point]) -> Vec<ControlPoint> {
    canvas_points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            ControlPoint::new(
                annotation,
                ControlPointKind::Point,
                ControlRole::Vertex(index),
                *point,
                Some(index),
            )
        })
        .collect()
}

fn arrow_control_points(annotation: &Annotation, canvas_points: &[Point]) -> Vec<ControlPoint> {
    let [start, end] = canvas_points else {
        return Vec::new();
    };
    vec![
        ControlPoint::new(
            annotation,
            ControlPointKind::Point,
            ControlRole::Start,
            *start,
            Some(0),
        ),
        ControlPoint::new(
            annotation,
            ControlPointKind::Point,
            ControlRole::End,
            *end,
            Some(1),
        ),
    ]
}

fn text_control_points(annotation: &Annotation, canvas_points: &[Point]) -> Vec<ControlPoint> {
    let Some(anchor) = canvas_points.first() else {
        return Vec::new();
    };
    vec![ControlPoint::new(
        annotation,
        ControlPointKind::Center,
        ControlRole::Center,
        *anchor,
        None,
    )]
}

/// First control point within `hit_radius` of `position`, in generation
/// order.
pub fn control_point_at(
    control_points: &[ControlPoint],
    position: Point,
    hit_radius: f64,
) -> Option<&ControlPoint> {
    control_points
        .iter()
        .find(|cp| cp.position.distance_to(position) <= hit_radius)
}
