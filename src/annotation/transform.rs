//! Pure geometric transforms over annotation values.
//!
//! Every function here returns a new annotation (inputs are never mutated)
//! and stamps `updated_at` on real changes. Invalid input degrades to a
//! logged no-op returning the input unchanged, so callers must not assume
//! every call produced a change.

use crate::geometry::{segments_intersect, BoundingBox, Point};

use super::{Annotation, AnnotationKind, ControlPoint, ControlRole};

/// Bounds of the annotation's points in whatever space they currently hold.
/// A degenerate annotation with no points yields a zero box at the origin.
pub fn bounding_box(annotation: &Annotation) -> BoundingBox {
    BoundingBox::from_points(&annotation.points)
}

/// Resizes `annotation` by dragging `control_point` to `new_position`.
/// `new_position` and `min_size` must be in the annotation's own coordinate
/// space.
pub fn resize(
    annotation: &Annotation,
    control_point: &ControlPoint,
    new_position: Point,
    min_size: f64,
) -> Annotation {
    match annotation.kind {
        AnnotationKind::Rectangle => {
            resize_rectangle(annotation, control_point, new_position, min_size)
        }
        AnnotationKind::Circle => resize_circle(annotation, control_point, new_position, min_size),
        AnnotationKind::Freehand | AnnotationKind::Polygon => match control_point.index {
            Some(index) => move_point(annotation, index, new_position),
            None => {
                tracing::warn!(
                    annotation_id = %annotation.id,
                    control_point = %control_point.id,
                    "vertex resize without an index",
                );
                annotation.clone()
            }
        },
        kind => {
            tracing::warn!(annotation_id = %annotation.id, ?kind, "resize not supported for kind");
            annotation.clone()
        }
    }
}

fn resize_rectangle(
    annotation: &Annotation,
    control_point: &ControlPoint,
    new_position: Point,
    min_size: f64,
) -> Annotation {
    let [top_left, bottom_right] = annotation.points[..] else {
        tracing::warn!(
            annotation_id = %annotation.id,
            "rectangle must have exactly 2 points",
        );
        return annotation.clone();
    };
    let mut new_top_left = top_left;
    let mut new_bottom_right = bottom_right;

    match control_point.role {
        ControlRole::Nw => new_top_left = new_position,
        ControlRole::Ne => {
            new_top_left.y = new_position.y;
            new_bottom_right.x = new_position.x;
        }
        ControlRole::Se => new_bottom_right = new_position,
        ControlRole::Sw => {
            new_top_left.x = new_position.x;
            new_bottom_right.y = new_position.y;
        }
        ControlRole::North => new_top_left.y = new_position.y,
        ControlRole::East => new_bottom_right.x = new_position.x,
        ControlRole::South => new_bottom_right.y = new_position.y,
        ControlRole::West => new_top_left.x = new_position.x,
        role => {
            tracing::warn!(
                annotation_id = %annotation.id,
                ?role,
                "unexpected control role for rectangle resize",
            );
            return annotation.clone();
        }
    }

    let width = (new_bottom_right.x - new_top_left.x).abs();
    let height = (new_bottom_right.y - new_top_left.y).abs();
    if width < min_size || height < min_size {
        tracing::warn!(
            annotation_id = %annotation.id,
            width,
            height,
            min_size,
            "rectangle resize below minimum size, keeping prior geometry",
        );
        return annotation.clone();
    }

    // Re-normalize so points[0] is top-left-most and points[1]
    // bottom-right-most, even after a corner drag flips the rectangle.
    let final_top_left = Point::new(
        new_top_left.x.min(new_bottom_right.x),
        new_top_left.y.min(new_bottom_right.y),
    );
    let final_bottom_right = Point::new(
        new_top_left.x.max(new_bottom_right.x),
        new_top_left.y.max(new_bottom_right.y),
    );

    let mut resized = annotation.clone();
    resized.points = vec![final_top_left, final_bottom_right];
    resized.touch();
    resized
}

fn resize_circle(
    annotation: &Annotation,
    control_point: &ControlPoint,
    new_position: Point,
    min_size: f64,
) -> Annotation {
    let [center, _edge] = annotation.points[..] else {
        tracing::warn!(
            annotation_id = %annotation.id,
            "circle must have exactly 2 points (center + edge)",
        );
        return annotation.clone();
    };

    let new_radius = center.distance_to(new_position);
    if new_radius < min_size {
        tracing::warn!(
            annotation_id = %annotation.id,
            new_radius,
            min_size,
            "circle resize below minimum radius, keeping prior geometry",
        );
        return annotation.clone();
    }

    let new_edge = match control_point.role {
        ControlRole::North => Point::new(center.x, center.y - new_radius),
        ControlRole::East => Point::new(center.x + new_radius, center.y),
        ControlRole::South => Point::new(center.x, center.y + new_radius),
        ControlRole::West => Point::new(center.x - new_radius, center.y),
        _ => new_position,
    };

    let mut resized = annotation.clone();
    resized.points = vec![center, new_edge];
    resized.touch();
    resized
}

/// Replaces `points[index]`. An out-of-range index is a logged no-op.
pub fn move_point(annotation: &Annotation, index: usize, new_position: Point) -> Annotation {
    if index >= annotation.points.len() {
        tracing::warn!(
            annotation_id = %annotation.id,
            index,
            point_count = annotation.points.len(),
            "point index out of range",
        );
        return annotation.clone();
    }

    let mut moved = annotation.clone();
    moved.points[index] = new_position;
    moved.touch();
    moved
}

/// Translates every point by `delta`.
pub fn move_annotation(annotation: &Annotation, delta: Point) -> Annotation {
    let mut moved = annotation.clone();
    moved.points = moved
        .points
        .iter()
        .map(|p| p.translated(delta.x, delta.y))
        .collect();
    moved.touch();
    moved
}

/// True when a polygon/freehand annotation has no pair of intersecting
/// non-adjacent edges. Other kinds and point counts below 4 are trivially
/// valid.
pub fn validate_no_self_intersection(annotation: &Annotation) -> bool {
    if !matches!(
        annotation.kind,
        AnnotationKind::Polygon | AnnotationKind::Freehand
    ) {
        return true;
    }

    let points = &annotation.points;
    let count = points.len();
    if count < 4 {
        return true;
    }

    for i in 0..count {
        let p1 = points[i];
        let p2 = points[(i + 1) % count];

        for j in (i + 2)..count {
            // Skip the edge adjacent to i through the wraparound.
            if j == (i + count - 1) % count {
                continue;
            }
            let p3 = points[j];
            let p4 = points[(j + 1) % count];
            if segments_intersect(p1, p2, p3, p4) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::generate_control_points;

    fn find_control<'a>(
        control_points: &'a [ControlPoint],
        suffix: &str,
    ) -> &'a ControlPoint {
        control_points
            .iter()
            .find(|cp| cp.id.ends_with(suffix))
            .expect("control point should exist")
    }

    fn normalized_rectangle() -> Annotation {
        Annotation::new(
            "r1",
            AnnotationKind::Rectangle,
            vec![Point::new(0.2, 0.2), Point::new(0.5, 0.5)],
        )
    }

    #[test]
    fn bounding_box_uses_points_as_given() {
        let annotation = normalized_rectangle();
        let bounds = bounding_box(&annotation);
        assert_eq!(bounds.min_x, 0.2);
        assert_eq!(bounds.max_y, 0.5);
        assert!((bounds.width - 0.3).abs() < 1e-12);
    }

    #[test]
    fn dragging_se_corner_past_nw_flips_and_renormalizes() {
        let annotation = normalized_rectangle();
        let control_points = generate_control_points(&annotation, |p| p);
        let se = find_control(&control_points, "-se");

        let resized = resize(&annotation, se, Point::new(0.1, 0.1), 0.01);
        assert_eq!(resized.points[0], Point::new(0.1, 0.1));
        assert_eq!(resized.points[1], Point::new(0.2, 0.2));
        assert!(resized.updated_at >= annotation.updated_at);
    }

    #[test]
    fn rectangle_points_stay_ordered_across_resize_sequences() {
        let mut annotation = normalized_rectangle();
        let drags = [
            ("-se", Point::new(0.9, 0.9)),
            ("-nw", Point::new(0.95, 0.95)),
            ("-n", Point::new(0.5, 0.05)),
            ("-e", Point::new(0.02, 0.5)),
            ("-sw", Point::new(0.7, 0.01)),
        ];
        for (suffix, target) in drags {
            let control_points = generate_control_points(&annotation, |p| p);
            let handle = find_control(&control_points, suffix);
            annotation = resize(&annotation, handle, target, 0.01);

            assert!(annotation.points[0].x <= annotation.points[1].x);
            assert!(annotation.points[0].y <= annotation.points[1].y);
        }
    }

    #[test]
    fn rectangle_resize_below_min_size_is_a_repeatable_noop() {
        let annotation = normalized_rectangle();
        let control_points = generate_control_points(&annotation, |p| p);
        let se = find_control(&control_points, "-se");

        let first = resize(&annotation, se, Point::new(0.201, 0.4), 0.01);
        assert_eq!(first.points, annotation.points);
        assert_eq!(first.updated_at, annotation.updated_at);

        let second = resize(&first, se, Point::new(0.201, 0.4), 0.01);
        assert_eq!(second, first);
    }

    #[test]
    fn circle_cardinal_drag_recomputes_edge_along_axis() {
        let mut annotation = Annotation::new(
            "c1",
            AnnotationKind::Circle,
            vec![Point::new(0.0, 0.0), Point::new(0.0, -1.0)],
        );
        annotation.normalized = false;
        let control_points = generate_control_points(&annotation, |p| p);
        let east = find_control(&control_points, "-e");

        let resized = resize(&annotation, east, Point::new(3.0, 0.0), 0.01);
        assert_eq!(resized.points[0], Point::new(0.0, 0.0));
        assert_eq!(resized.points[1], Point::new(3.0, 0.0));
    }

    #[test]
    fn circle_resize_below_min_radius_keeps_prior_geometry() {
        let mut annotation = Annotation::new(
            "c1",
            AnnotationKind::Circle,
            vec![Point::new(0.0, 0.0), Point::new(0.0, -1.0)],
        );
        annotation.normalized = false;
        let control_points = generate_control_points(&annotation, |p| p);
        let east = find_control(&control_points, "-e");

        let resized = resize(&annotation, east, Point::new(0.001, 0.0), 0.01);
        assert_eq!(resized.points, annotation.points);
    }

    #[test]
    fn polygon_vertex_resize_moves_that_vertex() {
        let mut annotation = Annotation::new(
            "p1",
            AnnotationKind::Polygon,
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(2.0, 3.0),
            ],
        );
        annotation.normalized = false;
        let control_points = generate_control_points(&annotation, |p| p);
        let vertex = find_control(&control_points, "-p2");

        let resized = resize(&annotation, vertex, Point::new(2.0, 9.0), 0.01);
        assert_eq!(resized.points[2], Point::new(2.0, 9.0));
        assert_eq!(resized.points[0], annotation.points[0]);
    }

    #[test]
    fn unsupported_kind_resize_returns_input_unchanged() {
        let annotation = Annotation::new("t1", AnnotationKind::Text, vec![Point::new(0.5, 0.5)]);
        let control_points = generate_control_points(&annotation, |p| p);
        let resized = resize(&annotation, &control_points[0], Point::new(0.9, 0.9), 0.01);
        assert_eq!(resized.points, annotation.points);
        assert_eq!(resized.updated_at, annotation.updated_at);
    }

    #[test]
    fn move_point_out_of_range_never_changes_the_annotation() {
        let annotation = normalized_rectangle();
        let mut current = annotation.clone();
        for _ in 0..3 {
            current = move_point(&current, 7, Point::new(0.9, 0.9));
            assert_eq!(current, annotation);
        }
    }

    #[test]
    fn move_annotation_translates_every_point() {
        let annotation = normalized_rectangle();
        let moved = move_annotation(&annotation, Point::new(0.1, -0.05));
        assert!((moved.points[0].x - 0.3).abs() < 1e-12);
        assert!((moved.points[0].y - 0.15).abs() < 1e-12);
        assert!((moved.points[1].x - 0.6).abs() < 1e-12);
        assert!((moved.points[1].y - 0.45).abs() < 1e-12);
        assert!(moved.updated_at >= annotation.updated_at);
    }

    #[test]
    fn self_intersection_detected_only_for_crossing_polygons() {
        let mut bow_tie = Annotation::new(
            "p1",
            AnnotationKind::Polygon,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0),
            ],
        );
        bow_tie.normalized = false;
        assert!(!validate_no_self_intersection(&bow_tie));

        let mut square = bow_tie.clone();
        square.points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(validate_no_self_intersection(&square));

        let triangle = Annotation::new(
            "p2",
            AnnotationKind::Polygon,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(0.5, 1.0),
            ],
        );
        assert!(validate_no_self_intersection(&triangle));

        let rect = normalized_rectangle();
        assert!(validate_no_self_intersection(&rect));
    }
}
