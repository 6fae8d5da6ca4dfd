//! Path geometry with resolved coordinates.

use lyon::geom::{Arc, ArcFlags, SvgArc};
use lyon::math::{point, vector, Angle};
use lyon::path::iterator::*;
use lyon::path::Path;

use crate::data::Context;
use crate::geometry::Point2;
use crate::model::{
    FillRule, PathFigure, PathGeometry, PathSegment, ShapeDefaults, ShapeFragment, ShapeStore,
    StyleId, SweepDirection,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line(Point2),
    Arc {
        to: Point2,
        radius_x: f64,
        radius_y: f64,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep_direction: SweepDirection,
    },
    Cubic {
        control1: Point2,
        control2: Point2,
        to: Point2,
    },
    Quadratic {
        control: Point2,
        to: Point2,
    },
}

impl Segment {
    pub fn end(&self) -> Point2 {
        match self {
            Segment::Line(to)
            | Segment::Arc { to, .. }
            | Segment::Cubic { to, .. }
            | Segment::Quadratic { to, .. } => *to,
        }
    }

    fn points(&self) -> Vec<Point2> {
        match self {
            Segment::Line(to) | Segment::Arc { to, .. } => vec![*to],
            Segment::Cubic {
                control1,
                control2,
                to,
            } => vec![*control1, *control2, *to],
            Segment::Quadratic { control, to } => vec![*control, *to],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub start: Point2,
    pub segments: Vec<Segment>,
    pub is_filled: bool,
    pub is_closed: bool,
}

impl Figure {
    pub fn new(start: Point2, is_filled: bool, is_closed: bool) -> Self {
        Self {
            start,
            segments: Vec::new(),
            is_filled,
            is_closed,
        }
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[Point2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut figure = Figure::new(*first, true, true);
        figure
            .segments
            .extend(rest.iter().map(|p| Segment::Line(*p)));
        Some(figure)
    }

    pub fn end(&self) -> Point2 {
        self.segments.last().map(Segment::end).unwrap_or(self.start)
    }
}

/// A flattened figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point2>,
    pub is_closed: bool,
}

/// How the shape built from an outline looks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathTemplate {
    pub name: String,
    pub style: Option<StyleId>,
    pub is_stroked: bool,
    pub is_filled: bool,
    pub data: Context,
}

/// Figures with concrete coordinates, independent of any store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub fill_rule: FillRule,
    pub figures: Vec<Figure>,
}

impl Outline {
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            fill_rule,
            figures: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Every coordinate, control points included.
    pub fn points(&self) -> Vec<Point2> {
        self.figures
            .iter()
            .flat_map(|f| std::iter::once(f.start).chain(f.segments.iter().flat_map(Segment::points)))
            .collect()
    }

    /// Resolve a stored geometry; `None` if a point is missing.
    pub fn from_geometry(store: &ShapeStore, geometry: &PathGeometry) -> Option<Self> {
        let mut outline = Outline::new(geometry.fill_rule);
        for figure in &geometry.figures {
            let mut resolved = Figure::new(
                store.point(figure.start_point)?,
                figure.is_filled,
                figure.is_closed,
            );
            for segment in &figure.segments {
                let segment = match segment {
                    PathSegment::Line { point } => Segment::Line(store.point(*point)?),
                    PathSegment::Arc {
                        point,
                        width,
                        height,
                        rotation_angle,
                        is_large_arc,
                        sweep_direction,
                    } => Segment::Arc {
                        to: store.point(*point)?,
                        radius_x: *width,
                        radius_y: *height,
                        rotation_angle: *rotation_angle,
                        is_large_arc: *is_large_arc,
                        sweep_direction: *sweep_direction,
                    },
                    PathSegment::CubicBezier {
                        point1,
                        point2,
                        point3,
                    } => Segment::Cubic {
                        control1: store.point(*point1)?,
                        control2: store.point(*point2)?,
                        to: store.point(*point3)?,
                    },
                    PathSegment::QuadraticBezier { point1, point2 } => Segment::Quadratic {
                        control: store.point(*point1)?,
                        to: store.point(*point2)?,
                    },
                };
                resolved.segments.push(segment);
            }
            outline.figures.push(resolved);
        }
        Some(outline)
    }

    /// Create point shapes and a path geometry over them in `store`.
    pub fn to_geometry(&self, store: &mut ShapeStore) -> PathGeometry {
        let figures = self
            .figures
            .iter()
            .map(|figure| {
                let start_point = store.create_point(figure.start.x, figure.start.y);
                let segments = figure
                    .segments
                    .iter()
                    .map(|segment| match segment {
                        Segment::Line(to) => PathSegment::Line {
                            point: store.create_point(to.x, to.y),
                        },
                        Segment::Arc {
                            to,
                            radius_x,
                            radius_y,
                            rotation_angle,
                            is_large_arc,
                            sweep_direction,
                        } => PathSegment::Arc {
                            point: store.create_point(to.x, to.y),
                            width: *radius_x,
                            height: *radius_y,
                            rotation_angle: *rotation_angle,
                            is_large_arc: *is_large_arc,
                            sweep_direction: *sweep_direction,
                        },
                        Segment::Cubic {
                            control1,
                            control2,
                            to,
                        } => PathSegment::CubicBezier {
                            point1: store.create_point(control1.x, control1.y),
                            point2: store.create_point(control2.x, control2.y),
                            point3: store.create_point(to.x, to.y),
                        },
                        Segment::Quadratic { control, to } => PathSegment::QuadraticBezier {
                            point1: store.create_point(control.x, control.y),
                            point2: store.create_point(to.x, to.y),
                        },
                    })
                    .collect();
                PathFigure {
                    start_point,
                    segments,
                    is_filled: figure.is_filled,
                    is_closed: figure.is_closed,
                }
            })
            .collect();
        PathGeometry {
            fill_rule: self.fill_rule,
            figures,
        }
    }

    /// A fragment holding one path shape with this outline.
    pub fn into_fragment(&self, template: &PathTemplate) -> ShapeFragment {
        let mut scratch = ShapeStore::new();
        let geometry = self.to_geometry(&mut scratch);
        let defaults = ShapeDefaults {
            style: template.style,
            is_stroked: template.is_stroked,
            is_filled: template.is_filled,
        };
        let id = scratch.create_path(geometry, defaults);
        if let Some(shape) = scratch.get_mut(id) {
            if !template.name.is_empty() {
                shape.name = template.name.clone();
            }
            shape.data = template.data.clone();
        }
        scratch.export_fragment(&[id], &[])
    }

    pub fn to_lyon_path(&self) -> Path {
        let mut builder = Path::builder();
        let p = |q: Point2| point(q.x as f32, q.y as f32);
        for figure in &self.figures {
            builder.begin(p(figure.start));
            let mut current = figure.start;
            for segment in &figure.segments {
                match segment {
                    Segment::Line(to) => {
                        builder.line_to(p(*to));
                    }
                    Segment::Arc {
                        to,
                        radius_x,
                        radius_y,
                        rotation_angle,
                        is_large_arc,
                        sweep_direction,
                    } => {
                        let svg_arc = SvgArc {
                            from: p(current),
                            to: p(*to),
                            radii: vector(*radius_x as f32, *radius_y as f32),
                            x_rotation: Angle::degrees(*rotation_angle as f32),
                            flags: ArcFlags {
                                large_arc: *is_large_arc,
                                sweep: *sweep_direction == SweepDirection::Clockwise,
                            },
                        };
                        if svg_arc.is_straight_line() {
                            builder.line_to(p(*to));
                        } else {
                            let arc: Arc<f32> = svg_arc.to_arc();
                            arc.for_each_cubic_bezier(&mut |ctrl| {
                                builder.cubic_bezier_to(ctrl.ctrl1, ctrl.ctrl2, ctrl.to);
                            });
                        }
                    }
                    Segment::Cubic {
                        control1,
                        control2,
                        to,
                    } => {
                        builder.cubic_bezier_to(p(*control1), p(*control2), p(*to));
                    }
                    Segment::Quadratic { control, to } => {
                        builder.quadratic_bezier_to(p(*control), p(*to));
                    }
                }
                current = segment.end();
            }
            builder.end(figure.is_closed);
        }
        builder.build()
    }

    /// Flatten curves into polylines.
    pub fn flatten(&self, tolerance: f64) -> Vec<Contour> {
        let path = self.to_lyon_path();
        let mut contours = Vec::new();
        let mut current: Vec<Point2> = Vec::new();
        for event in path.iter().flattened(tolerance as f32) {
            match event {
                lyon::path::Event::Begin { at } => {
                    current.clear();
                    current.push(Point2::new(at.x as f64, at.y as f64));
                }
                lyon::path::Event::Line { to, .. } => {
                    current.push(Point2::new(to.x as f64, to.y as f64));
                }
                lyon::path::Event::End { close, .. } => {
                    if !current.is_empty() {
                        contours.push(Contour {
                            points: std::mem::take(&mut current),
                            is_closed: close,
                        });
                    }
                }
                _ => {}
            }
        }
        contours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        let mut outline = Outline::new(FillRule::EvenOdd);
        outline.figures.push(
            Figure::polygon(&[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ])
            .unwrap(),
        );
        outline
    }

    #[test]
    fn test_geometry_round_trip() {
        let mut store = ShapeStore::new();
        let outline = square();
        let geometry = outline.to_geometry(&mut store);
        assert_eq!(store.len(), 4);
        assert_eq!(Outline::from_geometry(&store, &geometry), Some(outline));
    }

    #[test]
    fn test_flatten_square() {
        let contours = square().flatten(0.1);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].is_closed);
        assert_eq!(contours[0].points.len(), 4);
    }

    #[test]
    fn test_flatten_arc_stays_on_circle() {
        let mut outline = Outline::new(FillRule::Nonzero);
        let mut figure = Figure::new(Point2::new(0.0, 50.0), false, false);
        figure.segments.push(Segment::Arc {
            to: Point2::new(100.0, 50.0),
            radius_x: 50.0,
            radius_y: 50.0,
            rotation_angle: 0.0,
            is_large_arc: false,
            sweep_direction: SweepDirection::Clockwise,
        });
        outline.figures.push(figure);
        let contours = outline.flatten(0.05);
        let center = Point2::new(50.0, 50.0);
        assert!(contours[0].points.len() > 4);
        for p in &contours[0].points {
            assert!((p.distance_to(center) - 50.0).abs() < 0.5);
        }
    }

    #[test]
    fn test_fragment_has_one_root() {
        let fragment = square().into_fragment(&PathTemplate {
            is_filled: true,
            ..PathTemplate::default()
        });
        assert_eq!(fragment.roots.len(), 1);
        assert_eq!(fragment.shapes.len(), 5);
        assert!(fragment.shape(fragment.roots[0]).unwrap().is_filled);
    }
}
