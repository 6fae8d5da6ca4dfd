use serde::{Deserialize, Serialize};

use crate::data::Context;
use crate::model::{DocumentId, LayerId, LibraryId, PageId, ShapeId, StyleId};
use crate::style::ArgbColor;

/// Ordered shape sequence; sequence order is z-order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub owner: PageId,
    pub shapes: Vec<ShapeId>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, owner: PageId) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            shapes: Vec::new(),
            is_visible: true,
        }
    }

    pub fn index_of(&self, shape: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| *s == shape)
    }
}

/// A drawing surface: user layers plus transient working/helper layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub background: ArgbColor,
    pub layers: Vec<Layer>,
    pub current_layer: Option<LayerId>,
    /// Template page drawn underneath, owned by the project.
    #[serde(default)]
    pub template: Option<PageId>,
    #[serde(default)]
    pub data: Context,
    /// Tool previews; never persisted.
    #[serde(skip)]
    pub working_layer: Layer,
    /// Tool decorations; never persisted.
    #[serde(skip)]
    pub helper_layer: Layer,
}

impl Page {
    pub fn new(id: PageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            width: 800.0,
            height: 600.0,
            background: ArgbColor::WHITE,
            layers: Vec::new(),
            current_layer: None,
            template: None,
            data: Context::default(),
            working_layer: Layer::new(LayerId(0), "Working", id),
            helper_layer: Layer::new(LayerId(0), "Helper", id),
        }
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Current layer, falling back to the first one.
    pub fn current_layer(&self) -> Option<&Layer> {
        self.current_layer
            .and_then(|id| self.layer(id))
            .or_else(|| self.layers.first())
    }

    /// Owner back-references of transient layers are not persisted.
    pub(crate) fn restore_transient_layers(&mut self) {
        self.working_layer = Layer::new(LayerId(0), "Working", self.id);
        self.helper_layer = Layer::new(LayerId(0), "Helper", self.id);
        for layer in &mut self.layers {
            layer.owner = self.id;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pages: Vec::new(),
        }
    }

    pub fn contains_page(&self, page: PageId) -> bool {
        self.pages.iter().any(|p| p.id == page)
    }
}

/// Named, ordered collection of reusable items (style ids or group ids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library<T> {
    pub id: LibraryId,
    pub name: String,
    pub items: Vec<T>,
    #[serde(default)]
    pub selected: Option<usize>,
}

impl<T: PartialEq> Library<T> {
    pub fn new(id: LibraryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            items: Vec::new(),
            selected: None,
        }
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

pub type StyleLibrary = Library<StyleId>;
pub type GroupLibrary = Library<ShapeId>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    pub code: String,
}
