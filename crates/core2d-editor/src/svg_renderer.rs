//! SVG export renderer.
//!
//! Collects one element per drawn shape and wraps them in an `<svg>` root
//! sized to the page. Images are embedded as base64 data URIs; text becomes
//! a plain `<text>` element positioned by the style's alignment.

use std::fmt::Write as _;

use base64::Engine as _;

use crate::geometry::{ArcEllipse, Point2, Rect2};
use crate::model::{FillRule, SweepDirection};
use crate::path::{to_svg_path_data, Figure, Outline, Segment};
use crate::renderer::{DrawStyle, ShapeRenderer};
use crate::style::{ArgbColor, LineCap, TextHAlignment, TextVAlignment};

const POINT_RADIUS: f64 = 2.0;

#[derive(Debug, Default)]
pub struct SvgRenderer {
    width: f64,
    height: f64,
    background: Option<ArgbColor>,
    body: String,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn mime_for(key: &str) -> &'static str {
    match key.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// `stroke`/`fill` presentation attributes for a shape.
fn paint_attributes(style: &DrawStyle<'_>, fill_rule: Option<FillRule>) -> String {
    let s = style.style;
    let mut attrs = String::new();
    if style.is_stroked {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-width="{}""#,
            s.stroke.to_rgb_hex(),
            s.thickness
        );
        if s.stroke.a != 0xFF {
            let _ = write!(attrs, r#" stroke-opacity="{:.3}""#, s.stroke.opacity());
        }
        match s.line_cap {
            LineCap::Flat => {}
            LineCap::Square => attrs.push_str(r#" stroke-linecap="square""#),
            LineCap::Round => attrs.push_str(r#" stroke-linecap="round""#),
        }
        if let Some(dashes) = s.dash_array() {
            let list: Vec<String> = dashes.iter().map(|d| d.to_string()).collect();
            let _ = write!(attrs, r#" stroke-dasharray="{}""#, list.join(" "));
            if s.dash_offset != 0.0 {
                let _ = write!(attrs, r#" stroke-dashoffset="{}""#, s.dash_offset * s.thickness);
            }
        }
    } else {
        attrs.push_str(r#" stroke="none""#);
    }
    if style.is_filled {
        let _ = write!(attrs, r#" fill="{}""#, s.fill.to_rgb_hex());
        if s.fill.a != 0xFF {
            let _ = write!(attrs, r#" fill-opacity="{:.3}""#, s.fill.opacity());
        }
        match fill_rule {
            Some(FillRule::EvenOdd) => attrs.push_str(r#" fill-rule="evenodd""#),
            Some(FillRule::Nonzero) => attrs.push_str(r#" fill-rule="nonzero""#),
            None => {}
        }
    } else {
        attrs.push_str(r#" fill="none""#);
    }
    attrs
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn element(&mut self, tag: &str, geometry: &str, paint: &str) {
        let _ = writeln!(self.body, "  <{} {}{}/>", tag, geometry, paint);
    }

    fn path_element(&mut self, outline: &Outline, style: &DrawStyle<'_>) {
        let d = to_svg_path_data(outline);
        let paint = paint_attributes(style, Some(outline.fill_rule));
        self.element("path", &format!(r#"d="{}""#, d), &paint);
    }

    /// Finished document.
    pub fn finish(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        if let Some(bg) = self.background.filter(|c| c.a != 0) {
            let _ = writeln!(
                svg,
                r#"  <rect x="0" y="0" width="{}" height="{}" fill="{}" fill-opacity="{:.3}"/>"#,
                self.width,
                self.height,
                bg.to_rgb_hex(),
                bg.opacity()
            );
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

impl ShapeRenderer for SvgRenderer {
    fn draw_page(&mut self, width: f64, height: f64, background: ArgbColor) {
        self.width = width;
        self.height = height;
        self.background = Some(background);
        self.body.clear();
    }

    fn draw_point(&mut self, at: Point2, style: &DrawStyle<'_>) {
        let paint = format!(r#" fill="{}""#, style.style.stroke.to_rgb_hex());
        self.element(
            "circle",
            &format!(r#"cx="{}" cy="{}" r="{}""#, at.x, at.y, POINT_RADIUS),
            &paint,
        );
    }

    fn draw_line(&mut self, start: Point2, end: Point2, style: &DrawStyle<'_>) {
        let stroke_only = DrawStyle {
            is_filled: false,
            ..*style
        };
        self.element(
            "line",
            &format!(
                r#"x1="{}" y1="{}" x2="{}" y2="{}""#,
                start.x, start.y, end.x, end.y
            ),
            &paint_attributes(&stroke_only, None),
        );
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
        let outline = Outline {
            fill_rule: FillRule::Nonzero,
            figures: vec![figure],
        };
        self.path_element(&outline, style);
    }

    fn draw_cubic_bezier(&mut self, p: [Point2; 4], style: &DrawStyle<'_>) {
        let mut figure = Figure::new(p[0], style.is_filled, false);
        figure.segments.push(Segment::Cubic {
            control1: p[1],
            control2: p[2],
            to: p[3],
        });
        let outline = Outline {
            fill_rule: FillRule::Nonzero,
            figures: vec![figure],
        };
        self.path_element(&outline, style);
    }

    fn draw_quadratic_bezier(&mut self, p: [Point2; 3], style: &DrawStyle<'_>) {
        let mut figure = Figure::new(p[0], style.is_filled, false);
        figure.segments.push(Segment::Quadratic {
            control: p[1],
            to: p[2],
        });
        let outline = Outline {
            fill_rule: FillRule::Nonzero,
            figures: vec![figure],
        };
        self.path_element(&outline, style);
    }

    fn draw_rectangle(&mut self, rect: Rect2, style: &DrawStyle<'_>) {
        self.element(
            "rect",
            &format!(
                r#"x="{}" y="{}" width="{}" height="{}""#,
                rect.x, rect.y, rect.width, rect.height
            ),
            &paint_attributes(style, None),
        );
    }

    fn draw_ellipse(&mut self, rect: Rect2, style: &DrawStyle<'_>) {
        let c = rect.center();
        self.element(
            "ellipse",
            &format!(
                r#"cx="{}" cy="{}" rx="{}" ry="{}""#,
                c.x,
                c.y,
                rect.width / 2.0,
                rect.height / 2.0
            ),
            &paint_attributes(style, None),
        );
    }

    fn draw_text(&mut self, rect: Rect2, text: &str, style: &DrawStyle<'_>) {
        let t = &style.style.text;
        let (x, anchor) = match t.h_alignment {
            TextHAlignment::Left => (rect.left(), "start"),
            TextHAlignment::Center => (rect.center().x, "middle"),
            TextHAlignment::Right => (rect.right(), "end"),
        };
        let (y, baseline) = match t.v_alignment {
            TextVAlignment::Top => (rect.top(), "hanging"),
            TextVAlignment::Center => (rect.center().y, "middle"),
            TextVAlignment::Bottom => (rect.bottom(), "text-after-edge"),
        };
        let mut attrs = format!(
            r#"x="{}" y="{}" font-family="{}" font-size="{}" text-anchor="{}" dominant-baseline="{}" fill="{}""#,
            x,
            y,
            escape(&t.font_name),
            t.font_size,
            anchor,
            baseline,
            style.style.stroke.to_rgb_hex()
        );
        if t.bold {
            attrs.push_str(r#" font-weight="bold""#);
        }
        if t.italic {
            attrs.push_str(r#" font-style="italic""#);
        }
        if t.underline {
            attrs.push_str(r#" text-decoration="underline""#);
        }
        let _ = writeln!(self.body, "  <text {}>{}</text>", attrs, escape(text));
    }

    fn draw_image(&mut self, rect: Rect2, key: &str, bytes: Option<&[u8]>, style: &DrawStyle<'_>) {
        if let Some(bytes) = bytes {
            let data = base64::engine::general_purpose::STANDARD.encode(bytes);
            let _ = writeln!(
                self.body,
                r#"  <image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" href="data:{};base64,{}"/>"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                mime_for(key),
                data
            );
        }
        if style.is_stroked || style.is_filled {
            // Frame drawn over the image like any rectangle.
            let frame = DrawStyle {
                is_filled: false,
                ..*style
            };
            self.draw_rectangle(rect, &frame);
        }
    }

    fn draw_path(&mut self, outline: &Outline, style: &DrawStyle<'_>) {
        self.path_element(outline, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShapeDefaults, StyleId};
    use crate::project::Project;
    use crate::renderer::render_page;
    use crate::style::ShapeStyle;

    #[test]
    fn test_page_document() {
        let mut project = Project::with_defaults("Test");
        let layer = project.current_layer_id().unwrap();
        let defaults = ShapeDefaults {
            is_filled: true,
            ..ShapeDefaults::default()
        };
        let rect = project.store.create_rectangle(
            Point2::new(10.0, 10.0),
            Point2::new(30.0, 20.0),
            defaults,
        );
        let text = project.store.create_text(
            Point2::new(0.0, 0.0),
            Point2::new(40.0, 10.0),
            "a < b",
            ShapeDefaults::default(),
        );
        project.add_shapes(layer, &[rect, text]).unwrap();

        let mut svg = SvgRenderer::new();
        render_page(&mut svg, &project, project.current_page().unwrap());
        let out = svg.finish();
        assert!(out.starts_with("<svg"));
        assert!(out.contains(r#"width="800""#));
        assert!(out.contains(r#"<rect x="10" y="10" width="20" height="10""#));
        assert!(out.contains("a &lt; b"));
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_unfilled_path_has_no_fill() {
        let style = ShapeStyle::new(StyleId(1), "s");
        let draw = DrawStyle {
            style: &style,
            is_stroked: true,
            is_filled: false,
        };
        let mut svg = SvgRenderer::new();
        svg.draw_quadratic_bezier(
            [
                Point2::new(0.0, 0.0),
                Point2::new(5.0, 5.0),
                Point2::new(10.0, 0.0),
            ],
            &draw,
        );
        let out = svg.finish();
        assert!(out.contains(r#"d="M0,0 Q5,5 10,0""#));
        assert!(out.contains(r#"fill="none""#));
    }

    #[test]
    fn test_image_is_embedded() {
        let style = ShapeStyle::new(StyleId(1), "s");
        let draw = DrawStyle {
            style: &style,
            is_stroked: false,
            is_filled: false,
        };
        let mut svg = SvgRenderer::new();
        svg.draw_image(Rect2::new(0.0, 0.0, 4.0, 4.0), "k.png", Some(b"abc"), &draw);
        assert!(svg.finish().contains("data:image/png;base64,YWJj"));
    }
}
