//! Undoable edits.
//!
//! Every undoable change is an [`Edit`] value holding both the previous and
//! the next state of one target. Applying an edit writes the next state,
//! undoing it writes the previous one; edits never capture references into
//! the project.

use core2d_core::{Error, ModelError, Result};
use uuid::Uuid;

use crate::data::Database;
use crate::model::{DocumentId, LayerId, PageId, Shape, ShapeId, StyleId};
use crate::project::{Document, Layer, Options, Page, Project};
use crate::style::ShapeStyle;

#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum Edit {
    /// Shape sequence of one layer.
    LayerShapes {
        layer: LayerId,
        old: Vec<ShapeId>,
        new: Vec<ShapeId>,
    },
    /// Whole value of one shape.
    Shape { old: Box<Shape>, new: Box<Shape> },
    /// Whole value of one style.
    Style {
        old: Box<ShapeStyle>,
        new: Box<ShapeStyle>,
    },
    StyleLibrary {
        index: usize,
        old: Vec<StyleId>,
        new: Vec<StyleId>,
    },
    GroupLibrary {
        index: usize,
        old: Vec<ShapeId>,
        new: Vec<ShapeId>,
    },
    Databases {
        old: Vec<Database>,
        new: Vec<Database>,
        old_current: Option<Uuid>,
        new_current: Option<Uuid>,
    },
    PageLayers {
        page: PageId,
        old: Vec<Layer>,
        new: Vec<Layer>,
    },
    DocumentPages {
        document: DocumentId,
        old: Vec<Page>,
        new: Vec<Page>,
    },
    Documents {
        old: Vec<Document>,
        new: Vec<Document>,
    },
    Templates { old: Vec<Page>, new: Vec<Page> },
    Options { old: Box<Options>, new: Box<Options> },
}

impl Edit {
    /// Edit replacing `old` by `new`, or `None` when they are equal.
    pub fn shape(old: Shape, new: Shape) -> Option<Edit> {
        (old != new).then(|| Edit::Shape {
            old: Box::new(old),
            new: Box::new(new),
        })
    }

    pub fn style(old: ShapeStyle, new: ShapeStyle) -> Option<Edit> {
        (old != new).then(|| Edit::Style {
            old: Box::new(old),
            new: Box::new(new),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Edit::LayerShapes { .. } => "Layer Shapes",
            Edit::Shape { .. } => "Shape",
            Edit::Style { .. } => "Style",
            Edit::StyleLibrary { .. } => "Style Library",
            Edit::GroupLibrary { .. } => "Group Library",
            Edit::Databases { .. } => "Databases",
            Edit::PageLayers { .. } => "Page Layers",
            Edit::DocumentPages { .. } => "Document Pages",
            Edit::Documents { .. } => "Documents",
            Edit::Templates { .. } => "Templates",
            Edit::Options { .. } => "Options",
        }
    }

    /// Write the next state.
    pub fn apply(&self, project: &mut Project) -> Result<()> {
        self.assign(project, true)
    }

    /// Write the previous state.
    pub fn undo(&self, project: &mut Project) -> Result<()> {
        self.assign(project, false)
    }

    fn assign(&self, project: &mut Project, forward: bool) -> Result<()> {
        fn pick<T>(forward: bool, old: T, new: T) -> T {
            if forward {
                new
            } else {
                old
            }
        }

        match self {
            Edit::LayerShapes { layer, old, new } => {
                let target = project
                    .layer_mut(*layer)
                    .ok_or(ModelError::LayerNotFound { id: layer.0 })?;
                target.shapes = pick(forward, old, new).clone();
            }
            Edit::Shape { old, new } => {
                let value = pick(forward, old, new);
                project.store.insert(value.as_ref().clone());
            }
            Edit::Style { old, new } => {
                let value = pick(forward, old, new);
                project.store.insert_style(value.as_ref().clone());
            }
            Edit::StyleLibrary { index, old, new } => {
                let library = project
                    .style_libraries
                    .get_mut(*index)
                    .ok_or_else(|| Error::other(format!("no style library at {}", index)))?;
                library.items = pick(forward, old, new).clone();
                clamp_selected(&mut library.selected, library.items.len());
            }
            Edit::GroupLibrary { index, old, new } => {
                let library = project
                    .group_libraries
                    .get_mut(*index)
                    .ok_or_else(|| Error::other(format!("no group library at {}", index)))?;
                library.items = pick(forward, old, new).clone();
                clamp_selected(&mut library.selected, library.items.len());
            }
            Edit::Databases {
                old,
                new,
                old_current,
                new_current,
            } => {
                project.databases = pick(forward, old, new).clone();
                project.current_database = *pick(forward, old_current, new_current);
            }
            Edit::PageLayers { page, old, new } => {
                let target = project
                    .page_mut(*page)
                    .ok_or(ModelError::PageNotFound { id: page.0 })?;
                target.layers = pick(forward, old, new).clone();
                if target
                    .current_layer
                    .is_some_and(|id| target.layer(id).is_none())
                {
                    target.current_layer = target.layers.first().map(|l| l.id);
                }
            }
            Edit::DocumentPages { document, old, new } => {
                let target = project
                    .document_mut(*document)
                    .ok_or_else(|| Error::other(format!("document {} not found", document)))?;
                target.pages = pick(forward, old, new).clone();
                project.repair_current();
            }
            Edit::Documents { old, new } => {
                project.documents = pick(forward, old, new).clone();
                project.repair_current();
            }
            Edit::Templates { old, new } => {
                project.templates = pick(forward, old, new).clone();
            }
            Edit::Options { old, new } => {
                project.options = pick(forward, old, new).as_ref().clone();
            }
        }
        Ok(())
    }
}

fn clamp_selected(selected: &mut Option<usize>, len: usize) {
    if selected.is_some_and(|i| i >= len) {
        *selected = len.checked_sub(1);
    }
}

/// A named group of edits undone and redone as one step.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub name: String,
    pub edits: Vec<Edit>,
}

impl HistoryEntry {
    pub fn new(name: impl Into<String>, edits: Vec<Edit>) -> Self {
        Self {
            name: name.into(),
            edits,
        }
    }

    pub fn apply(&self, project: &mut Project) -> Result<()> {
        for edit in &self.edits {
            edit.apply(project)?;
        }
        Ok(())
    }

    pub fn undo(&self, project: &mut Project) -> Result<()> {
        for edit in self.edits.iter().rev() {
            edit.undo(project)?;
        }
        Ok(())
    }
}
