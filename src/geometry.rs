//! Shared geometric primitives used across annotation and render modules.

use serde::{Deserialize, Serialize};

/// A 2D position. Whether it holds normalized (0..1) or canvas-pixel
/// coordinates is decided by the owning annotation's `normalized` flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle in canvas-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x + self.width < other.x
            || other.x + other.width < self.x
            || self.y + self.height < other.y
            || other.y + other.height < self.y)
    }

    pub fn union(&self, other: &Rect) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Self::new(x, y, max_x - x, max_y - y)
    }
}

/// Bounds of an annotation's point set, with derived dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl BoundingBox {
    pub const ZERO: Self = Self {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
        width: 0.0,
        height: 0.0,
        center_x: 0.0,
        center_y: 0.0,
    };

    pub fn from_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::ZERO;
        };
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x;
        let mut max_y = first.y;
        for point in &points[1..] {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        let width = max_x - min_x;
        let height = max_y - min_y;
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width,
            height,
            center_x: min_x + width / 2.0,
            center_y: min_y + height / 2.0,
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.width, self.height)
    }
}

/// Distance from `point` to the segment `start..end`, with the projection
/// clamped to the segment.
pub fn distance_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_squared = dx * dx + dy * dy;

    if length_squared == 0.0 {
        return point.distance_to(start);
    }

    let t =
        (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_squared).clamp(0.0, 1.0);
    let projection = Point::new(start.x + t * dx, start.y + t * dy);
    point.distance_to(projection)
}

/// Orientation-based proper-intersection test for segments `p1..p2` and
/// `p3..p4`.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    fn ccw(a: Point, b: Point, c: Point) -> bool {
        (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
    }

    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_of_empty_point_set_is_zero_at_origin() {
        let bounds = BoundingBox::from_points(&[]);
        assert_eq!(bounds, BoundingBox::ZERO);
    }

    #[test]
    fn bounding_box_tracks_extremes_and_center() {
        let bounds = BoundingBox::from_points(&[
            Point::new(10.0, 20.0),
            Point::new(-4.0, 6.0),
            Point::new(2.0, 40.0),
        ]);
        assert_eq!(bounds.min_x, -4.0);
        assert_eq!(bounds.max_x, 10.0);
        assert_eq!(bounds.min_y, 6.0);
        assert_eq!(bounds.max_y, 40.0);
        assert_eq!(bounds.width, 14.0);
        assert_eq!(bounds.height, 34.0);
        assert_eq!(bounds.center_x, 3.0);
        assert_eq!(bounds.center_y, 23.0);
    }

    #[test]
    fn distance_to_segment_clamps_projection_to_endpoints() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(5.0, 3.0), start, end), 3.0);
        assert_eq!(distance_to_segment(Point::new(-4.0, 0.0), start, end), 4.0);
        assert_eq!(distance_to_segment(Point::new(13.0, 4.0), start, end), 5.0);
    }

    #[test]
    fn distance_to_degenerate_segment_is_point_distance() {
        let anchor = Point::new(2.0, 2.0);
        assert_eq!(
            distance_to_segment(Point::new(5.0, 6.0), anchor, anchor),
            5.0
        );
    }

    #[test]
    fn crossing_segments_intersect_and_parallel_segments_do_not() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        ));
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
        ));
    }

    #[test]
    fn rect_union_covers_both_inputs() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 10.0);
        let union = a.union(&b);
        assert_eq!(union, Rect::new(0.0, 0.0, 30.0, 15.0));
        assert!(union.intersects(&a));
        assert!(union.intersects(&b));
    }

    #[test]
    fn rect_expansion_grows_all_sides() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0).expanded(5.0);
        assert_eq!(rect, Rect::new(5.0, 5.0, 30.0, 30.0));
    }
}
