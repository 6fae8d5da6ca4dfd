//! Geometric primitives for the editing core.
//!
//! Coordinates are stored as `f64`. Interactive arithmetic (moves, snapping)
//! goes through [`add`] and [`snap`], which compute in `rust_decimal` so that
//! many small drag increments do not accumulate binary rounding drift.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use core2d_core::constants::GEOMETRY_EPSILON;

/// A point in drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point translated by `(dx, dy)` using decimal arithmetic.
    pub fn translated(&self, dx: f64, dy: f64) -> Point2 {
        Point2::new(add(self.x, dx), add(self.y, dy))
    }

    /// Rotate around `center` by `degrees` (counter-clockwise in a y-up frame).
    pub fn rotated_around(&self, center: Point2, degrees: f64) -> Point2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point2::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }

    /// Nearest point on the segment `a`-`b`.
    pub fn nearest_on_segment(&self, a: Point2, b: Point2) -> Point2 {
        nearest_point_on_segment(a, b, *self)
    }

    /// Distance to the segment `a`-`b`.
    pub fn distance_to_segment(&self, a: Point2, b: Point2) -> f64 {
        self.distance_to(self.nearest_on_segment(a, b))
    }
}

/// Axis-aligned rectangle, always normalized to non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect2 {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect2 {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_coords(x, y, x + width, y + height)
    }

    /// Rectangle spanning two corners given in any order.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    pub fn from_points(a: Point2, b: Point2) -> Self {
        Self::from_coords(a.x, a.y, b.x, b.y)
    }

    /// Smallest rectangle containing every point, `None` for no points.
    pub fn bounding(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_coords(min_x, min_y, max_x, max_y))
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect2) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Grow on every side by `amount`.
    pub fn inflate(&self, amount: f64) -> Rect2 {
        Rect2::from_coords(
            self.left() - amount,
            self.top() - amount,
            self.right() + amount,
            self.bottom() + amount,
        )
    }

    pub fn union(&self, other: &Rect2) -> Rect2 {
        Rect2::from_coords(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

/// Nearest point to `p` on the segment `a`-`b`.
pub fn nearest_point_on_segment(a: Point2, b: Point2, p: Point2) -> Point2 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < GEOMETRY_EPSILON {
        return a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Point2::new(a.x + t * dx, a.y + t * dy)
}

/// Whether the segment `a`-`b` touches `rect`.
pub fn segment_intersects_rect(a: Point2, b: Point2, rect: &Rect2) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let corners = [
        Point2::new(rect.left(), rect.top()),
        Point2::new(rect.right(), rect.top()),
        Point2::new(rect.right(), rect.bottom()),
        Point2::new(rect.left(), rect.bottom()),
    ];
    (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
}

fn orientation(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether segments `p1`-`p2` and `q1`-`q2` intersect (touching counts).
pub fn segments_intersect(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    let on_segment = |a: Point2, b: Point2, p: Point2| {
        p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    };
    (d1.abs() < GEOMETRY_EPSILON && on_segment(q1, q2, p1))
        || (d2.abs() < GEOMETRY_EPSILON && on_segment(q1, q2, p2))
        || (d3.abs() < GEOMETRY_EPSILON && on_segment(p1, p2, q1))
        || (d4.abs() < GEOMETRY_EPSILON && on_segment(p1, p2, q2))
}

/// Convex hull by monotone chain, counter-clockwise, no repeated end point.
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    let mut pts: Vec<Point2> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| (a.x - b.x).abs() < GEOMETRY_EPSILON && (a.y - b.y).abs() < GEOMETRY_EPSILON);
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point2> = Vec::with_capacity(pts.len() + 1);
    fn push(hull: &mut Vec<Point2>, floor: usize, p: Point2) {
        while hull.len() >= floor + 2
            && orientation(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    for p in &pts {
        push(&mut hull, 0, *p);
    }
    // The upper chain starts at the last lower point and never pops below it.
    let lower_len = hull.len() - 1;
    for p in pts.iter().rev().skip(1) {
        push(&mut hull, lower_len, *p);
    }
    hull.pop();
    hull
}

/// Even-odd point in polygon test.
pub fn polygon_contains(polygon: &[Point2], p: Point2) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Distance from `p` to the outline of a closed polygon.
pub fn distance_to_polygon_outline(polygon: &[Point2], p: Point2) -> f64 {
    let n = polygon.len();
    match n {
        0 => f64::INFINITY,
        1 => p.distance_to(polygon[0]),
        _ => (0..n)
            .map(|i| p.distance_to_segment(polygon[i], polygon[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Ellipse arc described by a bounding rectangle and two direction points.
///
/// `point1`/`point2` span the ellipse bounds; the rays from the ellipse
/// center through `point3` and `point4` give the start and end angles.
/// Angles are in degrees and the sweep is always in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcEllipse {
    pub center: Point2,
    pub radius_x: f64,
    pub radius_y: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub sweep_angle: f64,
}

impl ArcEllipse {
    pub fn from_points(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Self {
        let rect = Rect2::from_points(p1, p2);
        let center = rect.center();
        let start = (p3.y - center.y).atan2(p3.x - center.x);
        let end = (p4.y - center.y).atan2(p4.x - center.x);
        let mut sweep = (end - start).to_degrees();
        if sweep < 0.0 {
            sweep += 360.0;
        }
        Self {
            center,
            radius_x: rect.width / 2.0,
            radius_y: rect.height / 2.0,
            start_angle: start.to_degrees(),
            end_angle: end.to_degrees(),
            sweep_angle: sweep,
        }
    }

    /// Point on the ellipse at `degrees`.
    pub fn point_at(&self, degrees: f64) -> Point2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point2::new(
            self.center.x + self.radius_x * cos,
            self.center.y + self.radius_y * sin,
        )
    }

    pub fn start_point(&self) -> Point2 {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point2 {
        self.point_at(self.start_angle + self.sweep_angle)
    }
}

/// Decimal addition of two coordinates.
pub fn add(a: f64, b: f64) -> f64 {
    match (Decimal::from_f64(a), Decimal::from_f64(b)) {
        (Some(da), Some(db)) => da
            .checked_add(db)
            .and_then(|sum| sum.to_f64())
            .unwrap_or(a + b),
        _ => a + b,
    }
}

/// Round `value` to the nearest multiple of `step`; a zero step is a no-op.
pub fn snap(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    match (Decimal::from_f64(value), Decimal::from_f64(step)) {
        (Some(v), Some(s)) => v
            .checked_div(s)
            .map(|q| q.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|q| q.checked_mul(s))
            .and_then(|r| r.to_f64())
            .unwrap_or_else(|| (value / step).round() * step),
        _ => (value / step).round() * step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_point_clamps_to_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(100.0, 0.0);
        assert_eq!(nearest_point_on_segment(a, b, Point2::new(50.0, 7.0)), Point2::new(50.0, 0.0));
        assert_eq!(nearest_point_on_segment(a, b, Point2::new(-20.0, 3.0)), a);
        assert_eq!(nearest_point_on_segment(a, b, Point2::new(140.0, 3.0)), b);
        assert_eq!(nearest_point_on_segment(a, a, Point2::new(1.0, 1.0)), a);
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let r = Rect2::from_coords(10.0, 20.0, 0.0, 5.0);
        assert_eq!(r, Rect2 { x: 0.0, y: 5.0, width: 10.0, height: 15.0 });
        assert!(r.contains(Point2::new(10.0, 20.0)));
        assert!(!r.contains(Point2::new(10.1, 20.0)));
    }

    #[test]
    fn test_segment_rect_intersection() {
        let rect = Rect2::new(10.0, 10.0, 10.0, 10.0);
        assert!(segment_intersects_rect(Point2::new(0.0, 15.0), Point2::new(30.0, 15.0), &rect));
        assert!(!segment_intersects_rect(Point2::new(0.0, 0.0), Point2::new(30.0, 0.0), &rect));
        assert!(segment_intersects_rect(Point2::new(12.0, 12.0), Point2::new(13.0, 13.0), &rect));
    }

    #[test]
    fn test_convex_hull_drops_interior_points() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, 2.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(hull.contains(&Point2::new(10.0, 10.0)));
        assert!(!hull.contains(&Point2::new(5.0, 2.0)));
        assert!(polygon_contains(&hull, Point2::new(5.0, 5.0)));
        assert!(!polygon_contains(&hull, Point2::new(11.0, 5.0)));
    }

    #[test]
    fn test_arc_from_points() {
        let arc = ArcEllipse::from_points(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 50.0),
            Point2::new(100.0, 25.0),
            Point2::new(50.0, 0.0),
        );
        assert_eq!(arc.center, Point2::new(50.0, 25.0));
        assert_eq!(arc.radius_x, 50.0);
        assert_eq!(arc.radius_y, 25.0);
        assert!((arc.start_angle - 0.0).abs() < 1e-9);
        assert!((arc.sweep_angle - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_decimal_add_has_no_drift() {
        let mut x = 0.0;
        for _ in 0..10 {
            x = add(x, 0.1);
        }
        assert_eq!(x, 1.0);
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(16.0, 15.0), 15.0);
        assert_eq!(snap(23.0, 15.0), 30.0);
        assert_eq!(snap(-8.0, 15.0), -15.0);
        assert_eq!(snap(7.3, 0.0), 7.3);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Point2::new(10.0, 0.0).rotated_around(Point2::default(), 90.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }
}
