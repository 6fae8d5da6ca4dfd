//! Raster export renderer on `tiny-skia`.

use std::collections::HashMap;

use tiny_skia::{
    Color, FillRule as SkiaFillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect,
    Transform,
};
use tracing::{debug, warn};

use core2d_core::{Error, Result};

use crate::geometry::{ArcEllipse, Point2, Rect2};
use crate::model::{FillRule, SweepDirection};
use crate::path::stroke::{skia_path, skia_stroke};
use crate::path::{Figure, Outline, Segment};
use crate::renderer::{DrawStyle, ShapeRenderer};
use crate::style::ArgbColor;

const POINT_RADIUS: f32 = 2.0;

fn color(c: ArgbColor) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_rect(rect: Rect2) -> Option<Rect> {
    Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

fn single_figure(figure: Figure) -> Outline {
    Outline {
        fill_rule: FillRule::Nonzero,
        figures: vec![figure],
    }
}

/// Decode an encoded image into a premultiplied pixmap.
fn decode(bytes: &[u8]) -> Option<Pixmap> {
    let rgba = match image::load_from_memory(bytes) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!("Failed to decode image: {}", e);
            return None;
        }
    };
    let (w, h) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = (u16::from(*c) * a / 255) as u8;
        }
    }
    Pixmap::from_vec(data, IntSize::from_wh(w, h)?)
}

/// Draws into an RGBA pixmap scaled from page units.
pub struct RasterRenderer {
    pixmap: Pixmap,
    scale: f32,
    images: HashMap<String, Option<Pixmap>>,
}

impl RasterRenderer {
    /// A canvas for a page of `width` x `height` units drawn at `scale`
    /// pixels per unit.
    pub fn new(width: f64, height: f64, scale: f64) -> Result<Self> {
        let scale = scale.max(f64::EPSILON);
        let w = (width * scale).ceil().max(1.0) as u32;
        let h = (height * scale).ceil().max(1.0) as u32;
        let pixmap = Pixmap::new(w, h)
            .ok_or_else(|| Error::other(format!("cannot allocate a {}x{} canvas", w, h)))?;
        Ok(Self {
            pixmap,
            scale: scale as f32,
            images: HashMap::new(),
        })
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::other(format!("PNG encoding failed: {}", e)))
    }

    fn draw(&mut self, path: &tiny_skia::Path, style: &DrawStyle<'_>, fill_rule: FillRule) {
        let transform = self.transform();
        if style.is_filled {
            let mut paint = Paint::default();
            paint.set_color(color(style.style.fill));
            paint.anti_alias = true;
            let rule = match fill_rule {
                FillRule::EvenOdd => SkiaFillRule::EvenOdd,
                FillRule::Nonzero => SkiaFillRule::Winding,
            };
            self.pixmap.fill_path(path, &paint, rule, transform, None);
        }
        if style.is_stroked {
            let mut paint = Paint::default();
            paint.set_color(color(style.style.stroke));
            paint.anti_alias = true;
            let stroke = skia_stroke(style.style);
            self.pixmap.stroke_path(path, &paint, &stroke, transform, None);
        }
    }

    fn draw_outline(&mut self, outline: &Outline, style: &DrawStyle<'_>) {
        if let Some(path) = skia_path(outline) {
            self.draw(&path, style, outline.fill_rule);
        }
    }
}

impl ShapeRenderer for RasterRenderer {
    fn clear_cache(&mut self) {
        self.images.clear();
    }

    fn draw_page(&mut self, _width: f64, _height: f64, background: ArgbColor) {
        self.pixmap.fill(color(background));
    }

    fn draw_point(&mut self, at: Point2, style: &DrawStyle<'_>) {
        if let Some(path) = PathBuilder::from_circle(at.x as f32, at.y as f32, POINT_RADIUS) {
            let mut paint = Paint::default();
            paint.set_color(color(style.style.stroke));
            paint.anti_alias = true;
            let transform = self.transform();
            self.pixmap
                .fill_path(&path, &paint, SkiaFillRule::Winding, transform, None);
        }
    }

    fn draw_line(&mut self, start: Point2, end: Point2, style: &DrawStyle<'_>) {
        let mut pb = PathBuilder::new();
        pb.move_to(start.x as f32, start.y as f32);
        pb.line_to(end.x as f32, end.y as f32);
        if let Some(path) = pb.finish() {
            let stroke_only = DrawStyle {
                is_filled: false,
                ..*style
            };
            self.draw(&path, &stroke_only, FillRule::Nonzero);
        }
    }

    fn draw_arc(&mut self, arc: &ArcEllipse, style: &DrawStyle<'_>) {
        let mut figure = Figure::new(arc.start_point(), style.is_filled, false);
        figure.segments.push(Segment::Arc {
            to: arc.end_point(),
            radius_x: arc.radius_x,
            radius_y: arc.radius_y,
            rotation_angle: 0.0,
            is_large_arc: arc.sweep_angle > 180.0,
            sweep_direction: SweepDirection::Clockwise,
        });
        self.draw_outline(&single_figure(figure), style);
    }

    fn draw_cubic_bezier(&mut self, p: [Point2; 4], style: &DrawStyle<'_>) {
        let mut figure = Figure::new(p[0], style.is_filled, false);
        figure.segments.push(Segment::Cubic {
            control1: p[1],
            control2: p[2],
            to: p[3],
        });
        self.draw_outline(&single_figure(figure), style);
    }

    fn draw_quadratic_bezier(&mut self, p: [Point2; 3], style: &DrawStyle<'_>) {
        let mut figure = Figure::new(p[0], style.is_filled, false);
        figure.segments.push(Segment::Quadratic {
            control: p[1],
            to: p[2],
        });
        self.draw_outline(&single_figure(figure), style);
    }

    fn draw_rectangle(&mut self, rect: Rect2, style: &DrawStyle<'_>) {
        if let Some(r) = skia_rect(rect) {
            let path = PathBuilder::from_rect(r);
            self.draw(&path, style, FillRule::Nonzero);
        }
    }

    fn draw_ellipse(&mut self, rect: Rect2, style: &DrawStyle<'_>) {
        if let Some(path) = skia_rect(rect).and_then(PathBuilder::from_oval) {
            self.draw(&path, style, FillRule::Nonzero);
        }
    }

    fn draw_text(&mut self, _rect: Rect2, text: &str, _style: &DrawStyle<'_>) {
        // No font rasterizer; text is exported by the SVG renderer only.
        debug!("Raster export skips text '{}'", text);
    }

    fn draw_image(&mut self, rect: Rect2, key: &str, bytes: Option<&[u8]>, style: &DrawStyle<'_>) {
        if let Some(bytes) = bytes {
            if !self.images.contains_key(key) {
                self.images.insert(key.to_string(), decode(bytes));
            }
            if let Some(Some(image)) = self.images.get(key) {
                let sx = rect.width as f32 / image.width() as f32;
                let sy = rect.height as f32 / image.height() as f32;
                let transform = self
                    .transform()
                    .pre_translate(rect.x as f32, rect.y as f32)
                    .pre_scale(sx, sy);
                self.pixmap.draw_pixmap(
                    0,
                    0,
                    image.as_ref(),
                    &PixmapPaint::default(),
                    transform,
                    None,
                );
            }
        }
        if style.is_stroked {
            let frame = DrawStyle {
                is_filled: false,
                ..*style
            };
            self.draw_rectangle(rect, &frame);
        }
    }

    fn draw_path(&mut self, outline: &Outline, style: &DrawStyle<'_>) {
        self.draw_outline(outline, style);
    }
}
