//! Boolean operations on filled regions, backed by `csgrs` sketches.

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core2d_core::constants::GEOMETRY_EPSILON;
use core2d_core::{PathError, Result};

use super::convert::shape_sketch;
use super::outline::{Figure, Outline, PathTemplate};
use crate::geometry::Point2;
use crate::model::{FillRule, ShapeFragment, ShapeId, ShapeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathOp {
    Union,
    Intersect,
    Xor,
    /// First shape minus all others.
    Exclude,
}

fn polygon(points: &[Point2]) -> Sketch<()> {
    let pts: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    Sketch::polygon(&pts, None)
}

fn xor(a: &Sketch<()>, b: &Sketch<()>) -> Sketch<()> {
    a.union(b).difference(&a.intersection(b))
}

/// Region of several contours under the even-odd rule.
pub(crate) fn sketch_from_contours(contours: &[Vec<Point2>]) -> Sketch<()> {
    contours
        .iter()
        .filter(|c| c.len() > 2)
        .fold(Sketch::new(), |acc, c| xor(&acc, &polygon(c)))
}

fn ring(coords: impl Iterator<Item = (f64, f64)>) -> Vec<Point2> {
    let mut points: Vec<Point2> = coords.map(|(x, y)| Point2::new(x, y)).collect();
    if points.len() > 1 {
        let (first, last) = (points[0], points[points.len() - 1]);
        if first.distance_to(last) < GEOMETRY_EPSILON {
            points.pop();
        }
    }
    points
}

/// Exteriors and holes become closed figures.
pub(crate) fn outline_from_sketch(sketch: &Sketch<()>, fill_rule: FillRule) -> Outline {
    let mut outline = Outline::new(fill_rule);
    let mp = sketch.to_multipolygon();
    for poly in mp.0 {
        let exterior = ring(poly.exterior().0.iter().map(|c| (c.x, c.y)));
        outline.figures.extend(Figure::polygon(&exterior).filter(|_| exterior.len() > 2));
        for interior in poly.interiors() {
            let hole = ring(interior.0.iter().map(|c| (c.x, c.y)));
            outline.figures.extend(Figure::polygon(&hole).filter(|_| hole.len() > 2));
        }
    }
    outline
}

/// Combine the filled regions of `ids` into one path. Disjoint inputs
/// stay separate figures; an empty result is a path without figures.
pub fn op(store: &ShapeStore, ids: &[ShapeId], op: PathOp) -> Result<ShapeFragment> {
    let shapes: Vec<_> = ids.iter().filter_map(|id| store.get(*id)).collect();
    if shapes.len() < 2 {
        return Err(PathError::NotEnoughShapes {
            required: 2,
            actual: shapes.len(),
        }
        .into());
    }
    let mut sketches = Vec::with_capacity(shapes.len());
    for shape in &shapes {
        let sketch = shape_sketch(store, shape.id).ok_or_else(|| PathError::Unconvertible {
            kind: shape.tag().to_string(),
        })?;
        sketches.push(sketch);
    }

    let mut iter = sketches.into_iter();
    let first = iter.next().unwrap_or_else(Sketch::new);
    let result = iter.fold(first, |acc, next| match op {
        PathOp::Union => acc.union(&next),
        PathOp::Intersect => acc.intersection(&next),
        PathOp::Xor => xor(&acc, &next),
        PathOp::Exclude => acc.difference(&next),
    });

    let outline = outline_from_sketch(&result, FillRule::EvenOdd);
    debug!("{:?} of {} shapes: {} figures", op, shapes.len(), outline.figures.len());
    let first = shapes[0];
    let template = PathTemplate {
        name: String::new(),
        style: first.style,
        is_stroked: first.is_stroked,
        is_filled: true,
        data: first.data.clone(),
    };
    Ok(outline.into_fragment(&template))
}
