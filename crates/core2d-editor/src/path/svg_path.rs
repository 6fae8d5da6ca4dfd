//! SVG path data (`d` attribute) reading and writing.
//!
//! Supports `M/L/H/V/C/S/Q/T/A/Z` and their relative forms. Arcs stay arc
//! segments. An optional leading `F0`/`F1` selects even-odd or non-zero
//! filling, as in XAML path markup.

use std::fmt::Write as _;

use core2d_core::{PathError, Result};

use super::outline::{Figure, Outline, PathTemplate, Segment};
use crate::geometry::Point2;
use crate::model::{FillRule, PathGeometry, ShapeFragment, ShapeStore, SweepDirection};

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            data: d.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.data.get(self.pos) {
            if c.is_ascii_whitespace() || *c == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.data.len()
    }

    /// Next byte is a command letter.
    fn peek_command(&mut self) -> Option<u8> {
        self.skip_separators();
        self.data
            .get(self.pos)
            .copied()
            .filter(|c| c.is_ascii_alphabetic() && *c != b'e' && *c != b'E')
    }

    fn has_number(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.data.get(self.pos),
            Some(c) if c.is_ascii_digit() || matches!(*c, b'-' | b'+' | b'.')
        )
    }

    fn error(&self, reason: impl Into<String>) -> core2d_core::Error {
        PathError::InvalidPathData {
            position: self.pos,
            reason: reason.into(),
        }
        .into()
    }

    fn number(&mut self) -> Result<f64> {
        self.skip_separators();
        let start = self.pos;
        let bytes = self.data;
        let mut end = start;
        if matches!(bytes.get(end), Some(b'-' | b'+')) {
            end += 1;
        }
        let mut seen_dot = false;
        let mut digits = 0;
        while let Some(c) = bytes.get(end) {
            match c {
                b'0'..=b'9' => digits += 1,
                b'.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            end += 1;
        }
        if digits == 0 {
            return Err(self.error("expected a number"));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'-' | b'+')) {
                exp += 1;
            }
            if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                while bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                    exp += 1;
                }
                end = exp;
            }
        }
        let text = std::str::from_utf8(&bytes[start..end]).map_err(|_| self.error("invalid text"))?;
        let value = text
            .parse::<f64>()
            .map_err(|e| self.error(format!("invalid number '{}': {}", text, e)))?;
        self.pos = end;
        Ok(value)
    }

    fn point(&mut self) -> Result<Point2> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point2::new(x, y))
    }

    /// Arc flags may be packed without separators (`a5 5 0 011 1`).
    fn flag(&mut self) -> Result<bool> {
        self.skip_separators();
        match self.data.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected an arc flag")),
        }
    }
}

struct Builder {
    outline: Outline,
    figure: Option<Figure>,
    current: Point2,
    start: Point2,
}

impl Builder {
    fn begin(&mut self, at: Point2) {
        self.finish();
        self.figure = Some(Figure::new(at, true, false));
        self.current = at;
        self.start = at;
    }

    fn push(&mut self, segment: Segment) {
        if self.figure.is_none() {
            self.figure = Some(Figure::new(self.current, true, false));
            self.start = self.current;
        }
        self.current = segment.end();
        if let Some(figure) = self.figure.as_mut() {
            figure.segments.push(segment);
        }
    }

    fn close(&mut self) {
        if let Some(mut figure) = self.figure.take() {
            figure.is_closed = true;
            self.outline.figures.push(figure);
        }
        self.current = self.start;
    }

    fn finish(&mut self) {
        if let Some(figure) = self.figure.take() {
            self.outline.figures.push(figure);
        }
    }
}

fn reflect(p: Point2, around: Point2) -> Point2 {
    Point2::new(2.0 * around.x - p.x, 2.0 * around.y - p.y)
}

/// Parse path data into an outline.
pub fn parse_path_data(d: &str) -> Result<Outline> {
    let mut cursor = Cursor::new(d);
    let mut fill_rule = FillRule::EvenOdd;
    if matches!(cursor.peek_command(), Some(b'F' | b'f')) {
        cursor.pos += 1;
        fill_rule = match cursor.data.get(cursor.pos) {
            Some(b'0') => FillRule::EvenOdd,
            Some(b'1') => FillRule::Nonzero,
            _ => return Err(cursor.error("expected 0 or 1 after F")),
        };
        cursor.pos += 1;
    }

    let mut b = Builder {
        outline: Outline::new(fill_rule),
        figure: None,
        current: Point2::new(0.0, 0.0),
        start: Point2::new(0.0, 0.0),
    };
    let mut prev_cubic: Option<Point2> = None;
    let mut prev_quad: Option<Point2> = None;
    let mut command: Option<u8> = None;

    while !cursor.at_end() {
        let cmd = match cursor.peek_command() {
            Some(c) => {
                cursor.pos += 1;
                c
            }
            None => match command {
                // Repeated parameters reuse the previous command; after a
                // moveto they mean lineto.
                Some(b'M') => b'L',
                Some(b'm') => b'l',
                Some(c) if !matches!(c, b'Z' | b'z') => c,
                _ => return Err(cursor.error("expected a command")),
            },
        };
        let relative = cmd.is_ascii_lowercase();
        let origin = if relative {
            b.current
        } else {
            Point2::new(0.0, 0.0)
        };
        let abs = |p: Point2| Point2::new(p.x + origin.x, p.y + origin.y);
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let p = abs(cursor.point()?);
                b.begin(p);
            }
            b'L' => {
                let p = abs(cursor.point()?);
                b.push(Segment::Line(p));
            }
            b'H' => {
                let x = cursor.number()? + origin.x;
                let y = b.current.y;
                b.push(Segment::Line(Point2::new(x, y)));
            }
            b'V' => {
                let y = cursor.number()? + origin.y;
                let x = b.current.x;
                b.push(Segment::Line(Point2::new(x, y)));
            }
            b'C' => {
                let control1 = abs(cursor.point()?);
                let control2 = abs(cursor.point()?);
                let to = abs(cursor.point()?);
                b.push(Segment::Cubic {
                    control1,
                    control2,
                    to,
                });
                cubic_ctrl = Some(control2);
            }
            b'S' => {
                let control1 = prev_cubic.map_or(b.current, |c| reflect(c, b.current));
                let control2 = abs(cursor.point()?);
                let to = abs(cursor.point()?);
                b.push(Segment::Cubic {
                    control1,
                    control2,
                    to,
                });
                cubic_ctrl = Some(control2);
            }
            b'Q' => {
                let control = abs(cursor.point()?);
                let to = abs(cursor.point()?);
                b.push(Segment::Quadratic { control, to });
                quad_ctrl = Some(control);
            }
            b'T' => {
                let control = prev_quad.map_or(b.current, |c| reflect(c, b.current));
                let to = abs(cursor.point()?);
                b.push(Segment::Quadratic { control, to });
                quad_ctrl = Some(control);
            }
            b'A' => {
                let radius_x = cursor.number()?.abs();
                let radius_y = cursor.number()?.abs();
                let rotation_angle = cursor.number()?;
                let is_large_arc = cursor.flag()?;
                let sweep = cursor.flag()?;
                let to = abs(cursor.point()?);
                b.push(Segment::Arc {
                    to,
                    radius_x,
                    radius_y,
                    rotation_angle,
                    is_large_arc,
                    sweep_direction: if sweep {
                        SweepDirection::Clockwise
                    } else {
                        SweepDirection::CounterClockwise
                    },
                });
            }
            b'Z' => b.close(),
            other => {
                cursor.pos -= 1;
                return Err(cursor.error(format!("unknown command '{}'", other as char)));
            }
        }
        prev_cubic = cubic_ctrl;
        prev_quad = quad_ctrl;
        command = Some(cmd);

        if cursor.peek_command().is_none() && !cursor.at_end() && !cursor.has_number() {
            return Err(cursor.error("unexpected character"));
        }
    }
    b.finish();
    Ok(b.outline)
}

/// Parse path data into a fragment holding one path shape.
pub fn from_svg_path_data(d: &str, template: &PathTemplate) -> Result<ShapeFragment> {
    let outline = parse_path_data(d)?;
    Ok(outline.into_fragment(template))
}

fn fmt(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Path data for an outline; the fill rule is not part of the output.
pub fn to_svg_path_data(outline: &Outline) -> String {
    let mut d = String::new();
    for figure in &outline.figures {
        let _ = write!(d, "M{},{}", fmt(figure.start.x), fmt(figure.start.y));
        for segment in &figure.segments {
            let _ = match segment {
                Segment::Line(to) => write!(d, " L{},{}", fmt(to.x), fmt(to.y)),
                Segment::Arc {
                    to,
                    radius_x,
                    radius_y,
                    rotation_angle,
                    is_large_arc,
                    sweep_direction,
                } => write!(
                    d,
                    " A{},{} {} {} {} {},{}",
                    fmt(*radius_x),
                    fmt(*radius_y),
                    fmt(*rotation_angle),
                    u8::from(*is_large_arc),
                    u8::from(*sweep_direction == SweepDirection::Clockwise),
                    fmt(to.x),
                    fmt(to.y)
                ),
                Segment::Cubic {
                    control1,
                    control2,
                    to,
                } => write!(
                    d,
                    " C{},{} {},{} {},{}",
                    fmt(control1.x),
                    fmt(control1.y),
                    fmt(control2.x),
                    fmt(control2.y),
                    fmt(to.x),
                    fmt(to.y)
                ),
                Segment::Quadratic { control, to } => write!(
                    d,
                    " Q{},{} {},{}",
                    fmt(control.x),
                    fmt(control.y),
                    fmt(to.x),
                    fmt(to.y)
                ),
            };
        }
        if figure.is_closed {
            d.push_str(" Z");
        }
        d.push(' ');
    }
    d.trim_end().to_string()
}

/// Path data of a stored geometry, or `None` if a point is missing.
pub fn geometry_to_svg_path_data(store: &ShapeStore, geometry: &PathGeometry) -> Option<String> {
    Outline::from_geometry(store, geometry).map(|o| to_svg_path_data(&o))
}
