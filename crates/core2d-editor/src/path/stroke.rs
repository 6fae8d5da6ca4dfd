//! Stroke geometry on `tiny-skia`, shared by the raster renderer and the
//! stroke-to-path conversion so both produce the same region.

use tiny_skia::{LineCap as SkiaLineCap, PathBuilder, PathSegment, Stroke, StrokeDash};

use super::outline::{Figure, Outline, Segment};
use crate::geometry::Point2;
use crate::model::FillRule;
use crate::style::{LineCap, ShapeStyle};

/// Curve precision of the stroker relative to document units.
const STROKE_RESOLUTION: f32 = 4.0;

pub(crate) fn skia_path(outline: &Outline) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in outline.to_lyon_path().iter() {
        match event {
            lyon::path::Event::Begin { at } => pb.move_to(at.x, at.y),
            lyon::path::Event::Line { to, .. } => pb.line_to(to.x, to.y),
            lyon::path::Event::Quadratic { ctrl, to, .. } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            lyon::path::Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y),
            lyon::path::Event::End { close, .. } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}

/// Pen for `style`: width, cap and the dash array scaled by the thickness.
pub(crate) fn skia_stroke(style: &ShapeStyle) -> Stroke {
    let mut stroke = Stroke {
        width: style.thickness as f32,
        line_cap: match style.line_cap {
            LineCap::Flat => SkiaLineCap::Butt,
            LineCap::Square => SkiaLineCap::Square,
            LineCap::Round => SkiaLineCap::Round,
        },
        ..Default::default()
    };
    if let Some(dashes) = style.dash_array() {
        let dashes: Vec<f32> = dashes.iter().map(|d| *d as f32).collect();
        let offset = (style.dash_offset * style.thickness) as f32;
        stroke.dash = StrokeDash::new(dashes, offset);
    }
    stroke
}

fn point(p: tiny_skia::Point) -> Point2 {
    Point2::new(p.x as f64, p.y as f64)
}

fn outline_from_skia(path: &tiny_skia::Path) -> Outline {
    let mut outline = Outline::new(FillRule::Nonzero);
    let mut current: Option<Figure> = None;
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                outline.figures.extend(current.take());
                current = Some(Figure::new(point(p), true, true));
            }
            PathSegment::LineTo(p) => {
                if let Some(figure) = current.as_mut() {
                    figure.segments.push(Segment::Line(point(p)));
                }
            }
            PathSegment::QuadTo(c, p) => {
                if let Some(figure) = current.as_mut() {
                    figure.segments.push(Segment::Quadratic {
                        control: point(c),
                        to: point(p),
                    });
                }
            }
            PathSegment::CubicTo(c1, c2, p) => {
                if let Some(figure) = current.as_mut() {
                    figure.segments.push(Segment::Cubic {
                        control1: point(c1),
                        control2: point(c2),
                        to: point(p),
                    });
                }
            }
            PathSegment::Close => outline.figures.extend(current.take()),
        }
    }
    outline.figures.extend(current);
    outline.figures.retain(|f| !f.segments.is_empty());
    outline
}

/// Region painted when `outline` is stroked with `style`, as closed figures
/// filled with the nonzero rule. `None` when nothing would be painted.
pub fn stroke_outline(outline: &Outline, style: &ShapeStyle) -> Option<Outline> {
    let path = skia_path(outline)?;
    let stroked = path.stroke(&skia_stroke(style), STROKE_RESOLUTION)?;
    let region = outline_from_skia(&stroked);
    (!region.is_empty()).then_some(region)
}
