//! Shape model.
//!
//! Shapes are a closed set of variants ([`ShapeKind`]) stored in an arena
//! ([`ShapeStore`]) and addressed by [`ShapeId`]. Geometry-defining points
//! are shapes too; a line endpoint reused as another line's start is simply
//! the same point id held by both lines.

mod factory;
mod fragment;
mod ids;
mod store;

pub use factory::ShapeDefaults;
pub use fragment::{RecordSnapshot, ShapeFragment};
pub use ids::{DocumentId, LayerId, LibraryId, PageId, ShapeId, StyleId};
pub use store::{AllShapes, ShapeStore};

use serde::{Deserialize, Serialize};

use crate::data::Context;
use crate::geometry::Point2;

bitflags::bitflags! {
    /// Flags controlling editability, rendering and scaling of a shape.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ShapeState: u32 {
        const VISIBLE = 1 << 0;
        const PRINTABLE = 1 << 1;
        const LOCKED = 1 << 2;
        const SIZE = 1 << 3;
        const THICKNESS = 1 << 4;
        const CONNECTOR = 1 << 5;
        const NONE = 1 << 6;
        const STANDALONE = 1 << 7;
        const INPUT = 1 << 8;
        const OUTPUT = 1 << 9;
    }
}

impl Default for ShapeState {
    fn default() -> Self {
        ShapeState::VISIBLE | ShapeState::PRINTABLE | ShapeState::STANDALONE
    }
}

/// Discriminant of [`ShapeKind`], used to register per-kind behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKindTag {
    Point,
    Line,
    Arc,
    CubicBezier,
    QuadraticBezier,
    Rectangle,
    Ellipse,
    Text,
    Image,
    Path,
    Group,
}

impl std::fmt::Display for ShapeKindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointShape {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    pub start: ShapeId,
    pub end: ShapeId,
}

/// Arc inscribed in the ellipse bounded by `point1`/`point2`, from the ray
/// through `point3` to the ray through `point4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
    pub point4: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicBezierShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
    pub point4: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticBezierShape {
    pub point1: ShapeId,
    pub point2: ShapeId,
    pub point3: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
    /// Image cache key.
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    EvenOdd,
    #[default]
    Nonzero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// Path segment; every segment ends at its last point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PathSegment {
    Line {
        point: ShapeId,
    },
    Arc {
        point: ShapeId,
        width: f64,
        height: f64,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep_direction: SweepDirection,
    },
    CubicBezier {
        point1: ShapeId,
        point2: ShapeId,
        point3: ShapeId,
    },
    QuadraticBezier {
        point1: ShapeId,
        point2: ShapeId,
    },
}

impl PathSegment {
    pub fn points(&self) -> Vec<ShapeId> {
        match self {
            PathSegment::Line { point } | PathSegment::Arc { point, .. } => vec![*point],
            PathSegment::CubicBezier {
                point1,
                point2,
                point3,
            } => vec![*point1, *point2, *point3],
            PathSegment::QuadraticBezier { point1, point2 } => vec![*point1, *point2],
        }
    }

    /// The point the segment ends at.
    pub fn end_point(&self) -> ShapeId {
        match self {
            PathSegment::Line { point } | PathSegment::Arc { point, .. } => *point,
            PathSegment::CubicBezier { point3, .. } => *point3,
            PathSegment::QuadraticBezier { point2, .. } => *point2,
        }
    }

    fn map_ids(&mut self, f: &mut impl FnMut(ShapeId) -> ShapeId) {
        match self {
            PathSegment::Line { point } | PathSegment::Arc { point, .. } => *point = f(*point),
            PathSegment::CubicBezier {
                point1,
                point2,
                point3,
            } => {
                *point1 = f(*point1);
                *point2 = f(*point2);
                *point3 = f(*point3);
            }
            PathSegment::QuadraticBezier { point1, point2 } => {
                *point1 = f(*point1);
                *point2 = f(*point2);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathFigure {
    pub start_point: ShapeId,
    pub segments: Vec<PathSegment>,
    pub is_filled: bool,
    pub is_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathGeometry {
    pub fill_rule: FillRule,
    pub figures: Vec<PathFigure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub geometry: PathGeometry,
}

/// Composite shape. `connectors` are boundary points flagged
/// [`ShapeState::CONNECTOR`] that external lines attach to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupShape {
    pub shapes: Vec<ShapeId>,
    pub connectors: Vec<ShapeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeKind {
    Point(PointShape),
    Line(LineShape),
    Arc(ArcShape),
    CubicBezier(CubicBezierShape),
    QuadraticBezier(QuadraticBezierShape),
    Rectangle(RectangleShape),
    Ellipse(EllipseShape),
    Text(TextShape),
    Image(ImageShape),
    Path(PathShape),
    Group(GroupShape),
}

impl ShapeKind {
    pub fn tag(&self) -> ShapeKindTag {
        match self {
            ShapeKind::Point(_) => ShapeKindTag::Point,
            ShapeKind::Line(_) => ShapeKindTag::Line,
            ShapeKind::Arc(_) => ShapeKindTag::Arc,
            ShapeKind::CubicBezier(_) => ShapeKindTag::CubicBezier,
            ShapeKind::QuadraticBezier(_) => ShapeKindTag::QuadraticBezier,
            ShapeKind::Rectangle(_) => ShapeKindTag::Rectangle,
            ShapeKind::Ellipse(_) => ShapeKindTag::Ellipse,
            ShapeKind::Text(_) => ShapeKindTag::Text,
            ShapeKind::Image(_) => ShapeKindTag::Image,
            ShapeKind::Path(_) => ShapeKindTag::Path,
            ShapeKind::Group(_) => ShapeKindTag::Group,
        }
    }

    /// Geometry points owned directly by this shape, in definition order.
    /// Groups own no points of their own besides their connectors.
    pub fn own_points(&self) -> Vec<ShapeId> {
        match self {
            ShapeKind::Point(_) => Vec::new(),
            ShapeKind::Line(l) => vec![l.start, l.end],
            ShapeKind::Arc(a) => vec![a.point1, a.point2, a.point3, a.point4],
            ShapeKind::CubicBezier(c) => vec![c.point1, c.point2, c.point3, c.point4],
            ShapeKind::QuadraticBezier(q) => vec![q.point1, q.point2, q.point3],
            ShapeKind::Rectangle(r) => vec![r.top_left, r.bottom_right],
            ShapeKind::Ellipse(e) => vec![e.top_left, e.bottom_right],
            ShapeKind::Text(t) => vec![t.top_left, t.bottom_right],
            ShapeKind::Image(i) => vec![i.top_left, i.bottom_right],
            ShapeKind::Path(p) => p
                .geometry
                .figures
                .iter()
                .flat_map(|f| {
                    std::iter::once(f.start_point).chain(f.segments.iter().flat_map(|s| s.points()))
                })
                .collect(),
            ShapeKind::Group(g) => g.connectors.clone(),
        }
    }

    /// Every shape id this shape refers to: points, group children and
    /// connectors.
    pub fn children(&self) -> Vec<ShapeId> {
        match self {
            ShapeKind::Group(g) => g.shapes.iter().chain(g.connectors.iter()).copied().collect(),
            other => other.own_points(),
        }
    }

    /// Rewrite every referenced shape id through `f`.
    pub fn map_ids(&mut self, mut f: impl FnMut(ShapeId) -> ShapeId) {
        match self {
            ShapeKind::Point(_) => {}
            ShapeKind::Line(l) => {
                l.start = f(l.start);
                l.end = f(l.end);
            }
            ShapeKind::Arc(a) => {
                a.point1 = f(a.point1);
                a.point2 = f(a.point2);
                a.point3 = f(a.point3);
                a.point4 = f(a.point4);
            }
            ShapeKind::CubicBezier(c) => {
                c.point1 = f(c.point1);
                c.point2 = f(c.point2);
                c.point3 = f(c.point3);
                c.point4 = f(c.point4);
            }
            ShapeKind::QuadraticBezier(q) => {
                q.point1 = f(q.point1);
                q.point2 = f(q.point2);
                q.point3 = f(q.point3);
            }
            ShapeKind::Rectangle(r) => {
                r.top_left = f(r.top_left);
                r.bottom_right = f(r.bottom_right);
            }
            ShapeKind::Ellipse(e) => {
                e.top_left = f(e.top_left);
                e.bottom_right = f(e.bottom_right);
            }
            ShapeKind::Text(t) => {
                t.top_left = f(t.top_left);
                t.bottom_right = f(t.bottom_right);
            }
            ShapeKind::Image(i) => {
                i.top_left = f(i.top_left);
                i.bottom_right = f(i.bottom_right);
            }
            ShapeKind::Path(p) => {
                for figure in &mut p.geometry.figures {
                    figure.start_point = f(figure.start_point);
                    for segment in &mut figure.segments {
                        segment.map_ids(&mut f);
                    }
                }
            }
            ShapeKind::Group(g) => {
                for id in g.shapes.iter_mut().chain(g.connectors.iter_mut()) {
                    *id = f(*id);
                }
            }
        }
    }

    /// Replace every reference to `from` with `to`.
    pub fn replace_point(&mut self, from: ShapeId, to: ShapeId) {
        self.map_ids(|id| if id == from { to } else { id });
    }
}

/// A drawable entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: ShapeState,
    #[serde(default)]
    pub style: Option<StyleId>,
    #[serde(default)]
    pub is_stroked: bool,
    #[serde(default)]
    pub is_filled: bool,
    #[serde(default)]
    pub data: Context,
    pub kind: ShapeKind,
    #[serde(skip)]
    dirty: bool,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.state == other.state
            && self.style == other.style
            && self.is_stroked == other.is_stroked
            && self.is_filled == other.is_filled
            && self.data == other.data
            && self.kind == other.kind
    }
}

impl Shape {
    /// New dirty shape with default state and no style.
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            name: String::new(),
            state: ShapeState::default(),
            style: None,
            is_stroked: true,
            is_filled: false,
            data: Context::default(),
            kind,
            dirty: true,
        }
    }

    pub fn tag(&self) -> ShapeKindTag {
        self.kind.tag()
    }

    /// Position when this shape is a point.
    pub fn point(&self) -> Option<Point2> {
        match &self.kind {
            ShapeKind::Point(p) => Some(Point2::new(p.x, p.y)),
            _ => None,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self.kind, ShapeKind::Point(_))
    }

    pub fn is_connector(&self) -> bool {
        self.state.contains(ShapeState::CONNECTOR)
    }

    pub fn is_locked(&self) -> bool {
        self.state.contains(ShapeState::LOCKED)
    }

    pub fn is_visible(&self) -> bool {
        self.state.contains(ShapeState::VISIBLE)
    }

    /// Whether this shape's own fields changed since the last invalidation.
    /// See [`ShapeStore::is_dirty`] for the recursive check.
    pub fn is_self_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_as_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = ShapeState::default();
        assert!(state.contains(ShapeState::VISIBLE | ShapeState::PRINTABLE));
        assert!(!state.contains(ShapeState::LOCKED));
    }

    #[test]
    fn test_path_points_in_order() {
        let kind = ShapeKind::Path(PathShape {
            geometry: PathGeometry {
                fill_rule: FillRule::EvenOdd,
                figures: vec![PathFigure {
                    start_point: ShapeId(1),
                    segments: vec![
                        PathSegment::Line { point: ShapeId(2) },
                        PathSegment::QuadraticBezier {
                            point1: ShapeId(3),
                            point2: ShapeId(4),
                        },
                    ],
                    is_filled: true,
                    is_closed: true,
                }],
            },
        });
        assert_eq!(
            kind.own_points(),
            vec![ShapeId(1), ShapeId(2), ShapeId(3), ShapeId(4)]
        );
    }

    #[test]
    fn test_map_ids_rewrites_group_children() {
        let mut kind = ShapeKind::Group(GroupShape {
            shapes: vec![ShapeId(1), ShapeId(2)],
            connectors: vec![ShapeId(3)],
        });
        kind.map_ids(|id| ShapeId(id.0 + 10));
        assert_eq!(kind.children(), vec![ShapeId(11), ShapeId(12), ShapeId(13)]);
    }

    #[test]
    fn test_shape_equality_ignores_dirty_flag() {
        let a = Shape::new(ShapeId(1), ShapeKind::Point(PointShape { x: 1.0, y: 2.0 }));
        let mut b = a.clone();
        b.clear_dirty();
        assert_eq!(a, b);
    }

    #[test]
    fn test_state_serializes() {
        let json = serde_json::to_string(&ShapeState::VISIBLE).unwrap();
        let back: ShapeState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ShapeState::VISIBLE);
    }
}
