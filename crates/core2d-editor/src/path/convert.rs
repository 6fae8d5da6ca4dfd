//! Shape to path conversions.

use tracing::debug;

use core2d_core::{PathError, Result};

use super::boolean::sketch_from_contours;
use super::outline::{Figure, Outline, PathTemplate, Segment};
use super::stroke::stroke_outline;
use crate::geometry::{ArcEllipse, Point2, Rect2};
use crate::model::{
    FillRule, Shape, ShapeFragment, ShapeId, ShapeKind, ShapeStore, StyleId, SweepDirection,
};
use crate::style::{LineCap, ShapeStyle};

use core2d_core::constants::FLATTEN_TOLERANCE;

/// Lossless outline of one shape; text and bare points have none.
pub fn shape_outline(store: &ShapeStore, id: ShapeId) -> Option<Outline> {
    let shape = store.get(id)?;
    let mut outline = Outline::new(FillRule::EvenOdd);
    append_shape(store, shape, &mut outline)?;
    Some(outline)
}

fn corners(store: &ShapeStore, a: ShapeId, b: ShapeId) -> Option<Rect2> {
    Some(Rect2::from_points(store.point(a)?, store.point(b)?))
}

fn rect_figure(rect: Rect2, is_filled: bool) -> Option<Figure> {
    let mut figure = Figure::polygon(&[
        Point2::new(rect.left(), rect.top()),
        Point2::new(rect.right(), rect.top()),
        Point2::new(rect.right(), rect.bottom()),
        Point2::new(rect.left(), rect.bottom()),
    ])?;
    figure.is_filled = is_filled;
    Some(figure)
}

fn append_shape(store: &ShapeStore, shape: &Shape, outline: &mut Outline) -> Option<()> {
    let filled = shape.is_filled;
    match &shape.kind {
        ShapeKind::Point(_) | ShapeKind::Text(_) => {}
        ShapeKind::Line(line) => {
            let mut figure = Figure::new(store.point(line.start)?, filled, false);
            figure.segments.push(Segment::Line(store.point(line.end)?));
            outline.figures.push(figure);
        }
        ShapeKind::Rectangle(r) => {
            outline
                .figures
                .push(rect_figure(corners(store, r.top_left, r.bottom_right)?, filled)?);
        }
        ShapeKind::Image(i) => {
            outline
                .figures
                .push(rect_figure(corners(store, i.top_left, i.bottom_right)?, filled)?);
        }
        ShapeKind::Ellipse(e) => {
            let rect = corners(store, e.top_left, e.bottom_right)?;
            let (rx, ry) = (rect.width / 2.0, rect.height / 2.0);
            let center = rect.center();
            let left = Point2::new(rect.left(), center.y);
            let right = Point2::new(rect.right(), center.y);
            let half = |to| Segment::Arc {
                to,
                radius_x: rx,
                radius_y: ry,
                rotation_angle: 0.0,
                is_large_arc: false,
                sweep_direction: SweepDirection::Clockwise,
            };
            let mut figure = Figure::new(left, filled, true);
            figure.segments.push(half(right));
            figure.segments.push(half(left));
            outline.figures.push(figure);
        }
        ShapeKind::Arc(a) => {
            let points = store.points_at(&[a.point1, a.point2, a.point3, a.point4])?;
            let arc = ArcEllipse::from_points(points[0], points[1], points[2], points[3]);
            let mut figure = Figure::new(arc.start_point(), filled, false);
            figure.segments.push(Segment::Arc {
                to: arc.end_point(),
                radius_x: arc.radius_x,
                radius_y: arc.radius_y,
                rotation_angle: 0.0,
                is_large_arc: arc.sweep_angle > 180.0,
                sweep_direction: SweepDirection::Clockwise,
            });
            outline.figures.push(figure);
        }
        ShapeKind::CubicBezier(c) => {
            let p = store.points_at(&[c.point1, c.point2, c.point3, c.point4])?;
            let mut figure = Figure::new(p[0], filled, false);
            figure.segments.push(Segment::Cubic {
                control1: p[1],
                control2: p[2],
                to: p[3],
            });
            outline.figures.push(figure);
        }
        ShapeKind::QuadraticBezier(q) => {
            let p = store.points_at(&[q.point1, q.point2, q.point3])?;
            let mut figure = Figure::new(p[0], filled, false);
            figure.segments.push(Segment::Quadratic {
                control: p[1],
                to: p[2],
            });
            outline.figures.push(figure);
        }
        ShapeKind::Path(path) => {
            let resolved = Outline::from_geometry(store, &path.geometry)?;
            if outline.figures.is_empty() {
                outline.fill_rule = resolved.fill_rule;
            }
            outline.figures.extend(resolved.figures);
        }
        ShapeKind::Group(group) => {
            for child in &group.shapes {
                if let Some(child) = store.get(*child) {
                    append_shape(store, child, outline)?;
                }
            }
        }
    }
    Some(())
}

fn template_of(shape: &Shape) -> PathTemplate {
    PathTemplate {
        name: shape.name.clone(),
        style: shape.style,
        is_stroked: shape.is_stroked,
        is_filled: shape.is_filled,
        data: shape.data.clone(),
    }
}

fn first_shape<'a>(store: &'a ShapeStore, ids: &[ShapeId]) -> Result<&'a Shape> {
    ids.iter()
        .find_map(|id| store.get(*id))
        .ok_or_else(|| {
            PathError::NotEnoughShapes {
                required: 1,
                actual: 0,
            }
            .into()
        })
}

fn combined_outline(store: &ShapeStore, ids: &[ShapeId]) -> Result<Outline> {
    let mut outline = Outline::new(FillRule::EvenOdd);
    for id in ids {
        if let Some(shape) = store.get(*id) {
            append_shape(store, shape, &mut outline).ok_or_else(|| PathError::Other {
                message: format!("shape {} references a missing point", id),
            })?;
        }
    }
    if outline.is_empty() {
        let kind = first_shape(store, ids)?.tag().to_string();
        return Err(PathError::Unconvertible { kind }.into());
    }
    Ok(outline)
}

/// Exact path over the geometry of `ids`, keeping stroke and fill flags of
/// the first shape.
pub fn to_path(store: &ShapeStore, ids: &[ShapeId]) -> Result<ShapeFragment> {
    let first = first_shape(store, ids)?;
    let template = template_of(first);
    let outline = combined_outline(store, ids)?;
    Ok(outline.into_fragment(&template))
}

/// Region covered by the stroke of `ids` as drawn, as filled geometry.
///
/// Width, cap and dashes come from each shape's style. Shapes without a
/// style use a one unit pen with flat caps.
pub fn to_stroke_path(store: &ShapeStore, ids: &[ShapeId]) -> Result<ShapeFragment> {
    let first = first_shape(store, ids)?;
    let mut fallback = ShapeStyle::new(StyleId::default(), "");
    fallback.thickness = 1.0;
    fallback.line_cap = LineCap::Flat;
    let mut region = Outline::new(FillRule::Nonzero);
    for id in ids {
        if !store.get(*id).is_some_and(|s| s.is_stroked) {
            continue;
        }
        let Some(outline) = shape_outline(store, *id) else {
            continue;
        };
        let style = store.style_of(*id).unwrap_or(&fallback);
        if let Some(stroked) = stroke_outline(&outline, style) {
            region.figures.extend(stroked.figures);
        }
    }
    if region.is_empty() {
        return Err(PathError::Unconvertible {
            kind: first.tag().to_string(),
        }
        .into());
    }
    debug!("Stroke outline with {} figures", region.figures.len());
    let template = PathTemplate {
        is_stroked: false,
        is_filled: true,
        ..template_of(first)
    };
    Ok(region.into_fragment(&template))
}

fn region_path(store: &ShapeStore, ids: &[ShapeId], fill_rule: FillRule) -> Result<ShapeFragment> {
    let first = first_shape(store, ids)?;
    let outline = combined_outline(store, ids)?;
    let mut region = Outline::new(fill_rule);
    for contour in outline.flatten(FLATTEN_TOLERANCE) {
        if contour.points.len() > 2 {
            region.figures.extend(Figure::polygon(&contour.points));
        }
    }
    if region.is_empty() {
        return Err(PathError::Unconvertible {
            kind: first.tag().to_string(),
        }
        .into());
    }
    let template = PathTemplate {
        is_stroked: false,
        is_filled: true,
        ..template_of(first)
    };
    Ok(region.into_fragment(&template))
}

/// Filled interior under the even-odd rule.
pub fn to_fill_path(store: &ShapeStore, ids: &[ShapeId]) -> Result<ShapeFragment> {
    region_path(store, ids, FillRule::EvenOdd)
}

/// Filled interior under the non-zero winding rule.
pub fn to_winding_path(store: &ShapeStore, ids: &[ShapeId]) -> Result<ShapeFragment> {
    region_path(store, ids, FillRule::Nonzero)
}

/// Path of `id` without coincident points and with collinear line runs
/// merged. Curves are kept as they are.
pub fn simplify(store: &ShapeStore, id: ShapeId, tolerance: f64) -> Result<ShapeFragment> {
    let shape = store
        .get(id)
        .ok_or_else(|| PathError::Other {
            message: format!("shape {} not found", id),
        })?;
    let outline = shape_outline(store, id)
        .filter(|o| !o.is_empty())
        .ok_or_else(|| PathError::Unconvertible {
            kind: shape.tag().to_string(),
        })?;
    let simplified = simplify_outline(&outline, tolerance);
    Ok(simplified.into_fragment(&template_of(shape)))
}

pub(crate) fn simplify_outline(outline: &Outline, tolerance: f64) -> Outline {
    let mut result = Outline::new(outline.fill_rule);
    for figure in &outline.figures {
        let mut simplified = Figure::new(figure.start, figure.is_filled, figure.is_closed);
        for segment in &figure.segments {
            let from = simplified.end();
            if let Segment::Line(to) = segment {
                if from.distance_to(*to) <= tolerance {
                    continue;
                }
                let before = match simplified.segments.len() {
                    0 => None,
                    1 => Some(simplified.start),
                    n => Some(simplified.segments[n - 2].end()),
                };
                let extends = matches!(simplified.segments.last(), Some(Segment::Line(_)))
                    && before.is_some_and(|b| is_straight_run(b, from, *to, tolerance));
                if extends {
                    if let Some(last) = simplified.segments.last_mut() {
                        *last = Segment::Line(*to);
                    }
                    continue;
                }
            }
            simplified.segments.push(segment.clone());
        }
        if simplified.is_closed {
            // The closing edge is implicit.
            if let Some(Segment::Line(to)) = simplified.segments.last() {
                if to.distance_to(simplified.start) <= tolerance {
                    simplified.segments.pop();
                }
            }
        }
        result.figures.push(simplified);
    }
    result
}

/// `b` lies on the segment `a`-`c` within `tolerance`, pointing forward.
fn is_straight_run(a: Point2, b: Point2, c: Point2, tolerance: f64) -> bool {
    let forward = (b.x - a.x) * (c.x - b.x) + (b.y - a.y) * (c.y - b.y) > 0.0;
    forward && b.distance_to_segment(a, c) <= tolerance
}

/// Polygons of every closed contour of `ids`, used by boolean operations.
pub(crate) fn shape_sketch(store: &ShapeStore, id: ShapeId) -> Option<csgrs::sketch::Sketch<()>> {
    let outline = shape_outline(store, id)?;
    let polygons: Vec<Vec<Point2>> = outline
        .flatten(FLATTEN_TOLERANCE)
        .into_iter()
        .filter(|c| c.points.len() > 2)
        .map(|c| c.points)
        .collect();
    Some(sketch_from_contours(&polygons))
}
