//! Path commands over the selection.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use core2d_core::constants::FLATTEN_TOLERANCE;
use core2d_core::Result;

use super::Editor;
use crate::commands::Edit;
use crate::model::{ShapeFragment, ShapeId, ShapeStore};
use crate::path::{self, PathOp, PathTemplate};

/// Per-shape conversion into an explicit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathConversion {
    Path,
    Stroke,
    Fill,
    Winding,
    Simplify,
}

impl PathConversion {
    fn name(self) -> &'static str {
        match self {
            PathConversion::Path => "Convert To Path",
            PathConversion::Stroke => "Convert Stroke To Path",
            PathConversion::Fill => "Convert Fill To Path",
            PathConversion::Winding => "Convert Winding To Path",
            PathConversion::Simplify => "Simplify Path",
        }
    }

    fn apply(self, store: &ShapeStore, id: ShapeId) -> Result<ShapeFragment> {
        match self {
            PathConversion::Path => path::to_path(store, &[id]),
            PathConversion::Stroke => path::to_stroke_path(store, &[id]),
            PathConversion::Fill => path::to_fill_path(store, &[id]),
            PathConversion::Winding => path::to_winding_path(store, &[id]),
            PathConversion::Simplify => path::simplify(store, id, FLATTEN_TOLERANCE),
        }
    }
}

impl Editor {
    /// Replace every selected shape by its converted path, in place.
    ///
    /// Shapes that cannot be converted are left alone. Returns the number
    /// of replaced shapes.
    pub fn convert_selection(&mut self, conversion: PathConversion) -> usize {
        let selected = self.editable_selection();
        let Some(layer) = self.current_layer_id() else {
            return 0;
        };
        let Some(project) = self.project.as_mut() else {
            return 0;
        };
        let Some(mut shapes) = project.layer(layer).map(|l| l.shapes.clone()) else {
            return 0;
        };

        let mut replaced = Vec::new();
        for id in selected {
            let fragment = match conversion.apply(&project.store, id) {
                Ok(fragment) => fragment,
                Err(e) => {
                    warn!("Shape {} not converted: {}", id, e);
                    continue;
                }
            };
            let Some(new) = project.store.import_fragment(&fragment).first().copied() else {
                continue;
            };
            if let Some(slot) = shapes.iter_mut().find(|s| **s == id) {
                *slot = new;
                replaced.push(new);
            }
        }

        let count = replaced.len();
        let edits = project.layer_shapes_edit(layer, shapes).into_iter().collect();
        if !self.commit(conversion.name(), edits) {
            return 0;
        }
        self.select(&replaced);
        count
    }

    /// Combine the selected shapes into one path at the position of the
    /// lowest of them.
    pub fn path_op(&mut self, op: PathOp) -> Option<ShapeId> {
        let selected = self.editable_selection();
        let layer = self.current_layer_id()?;
        let project = self.project.as_mut()?;
        let fragment = match path::op(&project.store, &selected, op) {
            Ok(fragment) => fragment,
            Err(e) => {
                error!("{:?} failed: {}", op, e);
                return None;
            }
        };
        let new = *project.store.import_fragment(&fragment).first()?;

        let shapes = project.layer(layer)?.shapes.clone();
        let index = shapes.iter().position(|s| selected.contains(s))?;
        let mut kept: Vec<ShapeId> = shapes
            .into_iter()
            .filter(|s| !selected.contains(s))
            .collect();
        kept.insert(index, new);

        let edits = project.layer_shapes_edit(layer, kept).into_iter().collect();
        if !self.commit(&format!("Path {:?}", op), edits) {
            return None;
        }
        self.select(&[new]);
        Some(new)
    }

    /// Add a path parsed from SVG path data on top of the current layer.
    pub fn insert_svg_path(&mut self, d: &str) -> Option<ShapeId> {
        let layer = self.current_layer_id()?;
        let project = self.project.as_mut()?;
        let options = &project.options;
        let template = PathTemplate {
            name: "Path".to_string(),
            style: options.current_style,
            is_stroked: options.default_is_stroked,
            is_filled: options.default_is_filled,
            ..PathTemplate::default()
        };
        let fragment = match path::from_svg_path_data(d, &template) {
            Ok(fragment) => fragment,
            Err(e) => {
                error!("Invalid path data: {}", e);
                return None;
            }
        };
        let new = *project.store.import_fragment(&fragment).first()?;
        let mut shapes = project.layer(layer)?.shapes.clone();
        shapes.push(new);
        let edits: Vec<Edit> = project.layer_shapes_edit(layer, shapes).into_iter().collect();
        if !self.commit("Add Path", edits) {
            return None;
        }
        self.select(&[new]);
        Some(new)
    }
}
