use serde::{Deserialize, Serialize};

use core2d_core::constants::{DEFAULT_HIT_THRESHOLD, DEFAULT_SNAP_STEP};

use crate::model::{FillRule, ShapeDefaults, StyleId};

/// Whether dragging moves whole shapes or only their points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveMode {
    Point,
    #[default]
    Shape,
}

/// Per-project editing options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub snap_to_grid: bool,
    pub snap_x: f64,
    pub snap_y: f64,
    /// Hit radius in screen pixels.
    pub hit_threshold: f64,
    pub move_mode: MoveMode,
    pub default_is_stroked: bool,
    pub default_is_filled: bool,
    pub default_is_closed: bool,
    pub default_fill_rule: FillRule,
    /// Reuse points under the cursor and split lines when dropping groups.
    pub try_to_connect: bool,
    /// Style assigned to new shapes.
    pub current_style: Option<StyleId>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            snap_to_grid: true,
            snap_x: DEFAULT_SNAP_STEP,
            snap_y: DEFAULT_SNAP_STEP,
            hit_threshold: DEFAULT_HIT_THRESHOLD,
            move_mode: MoveMode::Shape,
            default_is_stroked: true,
            default_is_filled: false,
            default_is_closed: true,
            default_fill_rule: FillRule::EvenOdd,
            try_to_connect: false,
            current_style: None,
        }
    }
}

impl Options {
    pub fn shape_defaults(&self) -> ShapeDefaults {
        ShapeDefaults {
            style: self.current_style,
            is_stroked: self.default_is_stroked,
            is_filled: self.default_is_filled,
        }
    }

    /// Snap a coordinate pair when snapping is enabled.
    pub fn snap(&self, x: f64, y: f64) -> (f64, f64) {
        if self.snap_to_grid {
            (
                crate::geometry::snap(x, self.snap_x),
                crate::geometry::snap(y, self.snap_y),
            )
        } else {
            (x, y)
        }
    }
}
