//! Shape styles.
//!
//! Styles live in the [`ShapeStore`](crate::model::ShapeStore) next to the
//! shapes and are referenced by [`StyleId`]; every shape holding the same id
//! sees the same style, so editing it restyles all of them.

use serde::{Deserialize, Serialize};

use crate::model::StyleId;

/// 32-bit ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArgbColor {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ArgbColor {
    pub const BLACK: ArgbColor = ArgbColor::new(0xFF, 0x00, 0x00, 0x00);
    pub const WHITE: ArgbColor = ArgbColor::new(0xFF, 0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: ArgbColor = ArgbColor::new(0x00, 0x00, 0x00, 0x00);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Parse `#rrggbb` or `#aarrggbb`.
    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self::new(
                0xFF,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            8 => Some(Self::new(
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            _ => None,
        }
    }

    /// `#rrggbb` without alpha, as SVG expects.
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..1 opacity.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl std::fmt::Display for ArgbColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Flat,
    Square,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextHAlignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextVAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Font and alignment used by text shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_name: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub h_alignment: TextHAlignment,
    pub v_alignment: TextVAlignment,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_name: "Calibri".to_string(),
            font_size: 12.0,
            bold: false,
            italic: false,
            underline: false,
            h_alignment: TextHAlignment::Center,
            v_alignment: TextVAlignment::Center,
        }
    }
}

/// Stroke, fill and text appearance shared by shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub id: StyleId,
    pub name: String,
    pub stroke: ArgbColor,
    pub fill: ArgbColor,
    pub thickness: f64,
    #[serde(default)]
    pub line_cap: LineCap,
    /// Dash lengths relative to the thickness, e.g. `"2 2"`.
    #[serde(default)]
    pub dashes: Option<String>,
    #[serde(default)]
    pub dash_offset: f64,
    #[serde(default)]
    pub text: TextStyle,
    #[serde(skip)]
    dirty: bool,
}

impl PartialEq for ShapeStyle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.same_appearance(other)
    }
}

impl ShapeStyle {
    pub fn new(id: StyleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            stroke: ArgbColor::BLACK,
            fill: ArgbColor::TRANSPARENT,
            thickness: 2.0,
            line_cap: LineCap::Round,
            dashes: None,
            dash_offset: 0.0,
            text: TextStyle::default(),
            dirty: true,
        }
    }

    /// Equality ignoring the id and the dirty flag.
    pub fn same_appearance(&self, other: &ShapeStyle) -> bool {
        self.name == other.name
            && self.stroke == other.stroke
            && self.fill == other.fill
            && self.thickness == other.thickness
            && self.line_cap == other.line_cap
            && self.dashes == other.dashes
            && self.dash_offset == other.dash_offset
            && self.text == other.text
    }

    /// Parsed dash array scaled by the thickness, `None` for solid strokes.
    pub fn dash_array(&self) -> Option<Vec<f64>> {
        let dashes: Vec<f64> = self
            .dashes
            .as_deref()?
            .split([' ', ','])
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f64>().ok())
            .map(|d| d * self.thickness)
            .collect();
        (!dashes.is_empty()).then_some(dashes)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_as_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn invalidate(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        assert_eq!(ArgbColor::parse("#ff0000"), Some(ArgbColor::new(255, 255, 0, 0)));
        assert_eq!(ArgbColor::parse("#80112233"), Some(ArgbColor::new(0x80, 0x11, 0x22, 0x33)));
        assert_eq!(ArgbColor::parse("red"), None);
        assert_eq!(ArgbColor::new(0x80, 0x11, 0x22, 0x33).to_string(), "#80112233");
        assert_eq!(ArgbColor::WHITE.to_rgb_hex(), "#ffffff");
    }

    #[test]
    fn test_dash_array_scaled_by_thickness() {
        let mut style = ShapeStyle::new(StyleId(1), "dashed");
        style.thickness = 3.0;
        style.dashes = Some("2 1".to_string());
        assert_eq!(style.dash_array(), Some(vec![6.0, 3.0]));
        style.dashes = Some("".to_string());
        assert_eq!(style.dash_array(), None);
    }

    #[test]
    fn test_dirty_cycle() {
        let mut style = ShapeStyle::new(StyleId(1), "s");
        assert!(style.is_dirty());
        style.invalidate();
        assert!(!style.is_dirty());
        style.mark_as_dirty();
        assert!(style.is_dirty());
    }
}
