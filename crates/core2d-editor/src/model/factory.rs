//! Factory functions. Shapes are always created through these so every new
//! shape gets default state, style and stroke/fill flags before insertion.

use super::{
    ArcShape, CubicBezierShape, EllipseShape, GroupShape, ImageShape, LineShape, PathGeometry,
    PathShape, PointShape, QuadraticBezierShape, RectangleShape, Shape, ShapeId, ShapeKind,
    ShapeState, ShapeStore, StyleId, TextShape,
};
use crate::geometry::Point2;
use crate::style::ShapeStyle;

/// Defaults applied to newly created shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDefaults {
    pub style: Option<StyleId>,
    pub is_stroked: bool,
    pub is_filled: bool,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            style: None,
            is_stroked: true,
            is_filled: false,
        }
    }
}

impl ShapeStore {
    fn create(&mut self, name: &str, kind: ShapeKind, defaults: ShapeDefaults) -> ShapeId {
        let id = ShapeId(self.generate_id());
        let mut shape = Shape::new(id, kind);
        shape.name = name.to_string();
        shape.style = defaults.style;
        shape.is_stroked = defaults.is_stroked;
        shape.is_filled = defaults.is_filled;
        self.insert(shape)
    }

    pub fn create_style(&mut self, name: &str) -> StyleId {
        let id = StyleId(self.generate_id());
        self.insert_style(ShapeStyle::new(id, name))
    }

    pub fn create_point(&mut self, x: f64, y: f64) -> ShapeId {
        let id = ShapeId(self.generate_id());
        let mut shape = Shape::new(id, ShapeKind::Point(PointShape { x, y }));
        shape.name = "Point".to_string();
        shape.state = ShapeState::VISIBLE | ShapeState::PRINTABLE;
        shape.is_stroked = false;
        self.insert(shape)
    }

    fn create_points(&mut self, points: &[Point2]) -> Vec<ShapeId> {
        points.iter().map(|p| self.create_point(p.x, p.y)).collect()
    }

    /// Line between two existing points.
    pub fn create_line_between(
        &mut self,
        start: ShapeId,
        end: ShapeId,
        defaults: ShapeDefaults,
    ) -> ShapeId {
        self.create("Line", ShapeKind::Line(LineShape { start, end }), defaults)
    }

    pub fn create_line(&mut self, start: Point2, end: Point2, defaults: ShapeDefaults) -> ShapeId {
        let p = self.create_points(&[start, end]);
        self.create_line_between(p[0], p[1], defaults)
    }

    pub fn create_arc(
        &mut self,
        points: [Point2; 4],
        defaults: ShapeDefaults,
    ) -> ShapeId {
        let p = self.create_points(&points);
        let kind = ShapeKind::Arc(ArcShape {
            point1: p[0],
            point2: p[1],
            point3: p[2],
            point4: p[3],
        });
        self.create("Arc", kind, defaults)
    }

    pub fn create_cubic_bezier(&mut self, points: [Point2; 4], defaults: ShapeDefaults) -> ShapeId {
        let p = self.create_points(&points);
        let kind = ShapeKind::CubicBezier(CubicBezierShape {
            point1: p[0],
            point2: p[1],
            point3: p[2],
            point4: p[3],
        });
        self.create("CubicBezier", kind, defaults)
    }

    pub fn create_quadratic_bezier(
        &mut self,
        points: [Point2; 3],
        defaults: ShapeDefaults,
    ) -> ShapeId {
        let p = self.create_points(&points);
        let kind = ShapeKind::QuadraticBezier(QuadraticBezierShape {
            point1: p[0],
            point2: p[1],
            point3: p[2],
        });
        self.create("QuadraticBezier", kind, defaults)
    }

    pub fn create_rectangle(
        &mut self,
        top_left: Point2,
        bottom_right: Point2,
        defaults: ShapeDefaults,
    ) -> ShapeId {
        let p = self.create_points(&[top_left, bottom_right]);
        let kind = ShapeKind::Rectangle(RectangleShape {
            top_left: p[0],
            bottom_right: p[1],
        });
        self.create("Rectangle", kind, defaults)
    }

    pub fn create_ellipse(
        &mut self,
        top_left: Point2,
        bottom_right: Point2,
        defaults: ShapeDefaults,
    ) -> ShapeId {
        let p = self.create_points(&[top_left, bottom_right]);
        let kind = ShapeKind::Ellipse(EllipseShape {
            top_left: p[0],
            bottom_right: p[1],
        });
        self.create("Ellipse", kind, defaults)
    }

    pub fn create_text(
        &mut self,
        top_left: Point2,
        bottom_right: Point2,
        text: &str,
        defaults: ShapeDefaults,
    ) -> ShapeId {
        let p = self.create_points(&[top_left, bottom_right]);
        let kind = ShapeKind::Text(TextShape {
            top_left: p[0],
            bottom_right: p[1],
            text: text.to_string(),
        });
        self.create("Text", kind, defaults)
    }

    pub fn create_image(
        &mut self,
        top_left: Point2,
        bottom_right: Point2,
        key: &str,
        defaults: ShapeDefaults,
    ) -> ShapeId {
        let p = self.create_points(&[top_left, bottom_right]);
        let kind = ShapeKind::Image(ImageShape {
            top_left: p[0],
            bottom_right: p[1],
            key: key.to_string(),
        });
        self.create("Image", kind, defaults)
    }

    /// Path over already inserted points.
    pub fn create_path(&mut self, geometry: PathGeometry, defaults: ShapeDefaults) -> ShapeId {
        self.create("Path", ShapeKind::Path(PathShape { geometry }), defaults)
    }

    /// Group over existing shapes; connectors are flagged accordingly.
    pub fn create_group(
        &mut self,
        name: &str,
        shapes: Vec<ShapeId>,
        connectors: Vec<ShapeId>,
    ) -> ShapeId {
        for connector in &connectors {
            if let Some(point) = self.get_mut(*connector) {
                point.state |= ShapeState::CONNECTOR;
            }
        }
        let defaults = ShapeDefaults {
            style: None,
            is_stroked: false,
            is_filled: false,
        };
        self.create(
            name,
            ShapeKind::Group(GroupShape { shapes, connectors }),
            defaults,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_line_inserts_points() {
        let mut store = ShapeStore::new();
        let style = store.create_style("Default");
        let defaults = ShapeDefaults {
            style: Some(style),
            ..ShapeDefaults::default()
        };
        let line = store.create_line(Point2::new(0.0, 0.0), Point2::new(10.0, 5.0), defaults);

        assert_eq!(store.len(), 3);
        let shape = store.get(line).unwrap();
        assert_eq!(shape.style, Some(style));
        assert!(shape.is_stroked);
        assert_eq!(
            store.points_at(&shape.kind.own_points()),
            Some(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 5.0)])
        );
    }

    #[test]
    fn test_group_flags_connectors() {
        let mut store = ShapeStore::new();
        let rect = store.create_rectangle(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            ShapeDefaults::default(),
        );
        let c = store.create_point(0.0, 5.0);
        let group = store.create_group("Block", vec![rect], vec![c]);

        assert!(store.get(c).unwrap().is_connector());
        assert_eq!(store.get(group).unwrap().name, "Block");
    }
}
