//! Container hierarchy: project, documents, pages and layers.
//!
//! The project owns the shape arena, the container tree and the undo
//! history. Every undoable mutation goes through [`Project::commit`].

mod containers;
mod images;
mod options;
mod records;

pub use containers::{Document, GroupLibrary, Layer, Library, Page, Script, StyleLibrary};
pub use images::ImageCache;
pub use options::{MoveMode, Options};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use core2d_core::{ModelError, Result};

use crate::commands::{Edit, HistoryEntry};
use crate::data::Database;
use crate::history::UndoRedoManager;
use crate::model::{
    DocumentId, LayerId, LibraryId, PageId, Shape, ShapeId, ShapeKind, ShapeStore, StyleId,
};
use crate::style::ShapeStyle;

/// What the user is currently focused on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selected {
    Layer(LayerId),
    Page(PageId),
    Document(DocumentId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub options: Options,
    pub store: ShapeStore,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub templates: Vec<Page>,
    #[serde(default)]
    pub style_libraries: Vec<StyleLibrary>,
    #[serde(default)]
    pub group_libraries: Vec<GroupLibrary>,
    #[serde(default)]
    pub databases: Vec<Database>,
    #[serde(default)]
    pub current_database: Option<Uuid>,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub current_document: Option<DocumentId>,
    #[serde(default)]
    pub current_page: Option<PageId>,
    #[serde(default)]
    selected: Option<Selected>,
    #[serde(default)]
    next_container_id: u64,
    #[serde(skip)]
    pub history: UndoRedoManager,
    #[serde(skip)]
    pub images: ImageCache,
}

impl Project {
    /// Empty project without documents.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Options::default(),
            store: ShapeStore::new(),
            documents: Vec::new(),
            templates: Vec::new(),
            style_libraries: Vec::new(),
            group_libraries: Vec::new(),
            databases: Vec::new(),
            current_database: None,
            scripts: Vec::new(),
            current_document: None,
            current_page: None,
            selected: None,
            next_container_id: 1,
            history: UndoRedoManager::default(),
            images: ImageCache::default(),
        }
    }

    /// Project with one document, one page on a template, one layer, and
    /// default style and group libraries.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        let mut project = Self::new(name);

        let style = project.store.create_style("Default");
        let mut styles = Library::new(LibraryId(project.generate_container_id()), "Default");
        styles.items.push(style);
        styles.selected = Some(0);
        project.style_libraries.push(styles);
        project.options.current_style = Some(style);

        let groups = Library::new(LibraryId(project.generate_container_id()), "Default");
        project.group_libraries.push(groups);

        let template = project.create_page("Template");
        let template_id = template.id;
        project.templates.push(template);

        let mut document = project.create_document("Document");
        let mut page = project.create_page("Page");
        page.template = Some(template_id);
        let (page_id, layer_id) = (page.id, page.current_layer);
        document.pages.push(page);
        let document_id = document.id;
        project.documents.push(document);

        project.current_document = Some(document_id);
        project.current_page = Some(page_id);
        project.selected = layer_id.map(Selected::Layer);
        project
    }

    pub fn generate_container_id(&mut self) -> u64 {
        self.next_container_id = self.next_container_id.max(1);
        let id = self.next_container_id;
        self.next_container_id += 1;
        id
    }

    /// New layer owned by `page`, not yet inserted.
    pub fn create_layer(&mut self, page: PageId, name: &str) -> Layer {
        Layer::new(LayerId(self.generate_container_id()), name, page)
    }

    /// New page with a single layer, not yet inserted.
    pub fn create_page(&mut self, name: &str) -> Page {
        let mut page = Page::new(PageId(self.generate_container_id()), name);
        let layer = self.create_layer(page.id, "Layer1");
        page.current_layer = Some(layer.id);
        page.layers.push(layer);
        page
    }

    pub fn create_document(&mut self, name: &str) -> Document {
        Document::new(DocumentId(self.generate_container_id()), name)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Every page, document pages first, then templates.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.documents
            .iter()
            .flat_map(|d| d.pages.iter())
            .chain(self.templates.iter())
    }

    fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.documents
            .iter_mut()
            .flat_map(|d| d.pages.iter_mut())
            .chain(self.templates.iter_mut())
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages_mut().find(|p| p.id == id)
    }

    pub fn template(&self, id: PageId) -> Option<&Page> {
        self.templates.iter().find(|p| p.id == id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.pages().find_map(|p| p.layer(id))
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.pages_mut().find_map(|p| p.layer_mut(id))
    }

    /// Document owning `page`; `None` for templates.
    pub fn document_of_page(&self, page: PageId) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.contains_page(page))
            .map(|d| d.id)
    }

    /// Layer holding `shape` at its top level.
    pub fn layer_of_shape(&self, shape: ShapeId) -> Option<LayerId> {
        self.pages()
            .flat_map(|p| p.layers.iter())
            .find(|l| l.shapes.contains(&shape))
            .map(|l| l.id)
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_page.and_then(|id| self.page(id))
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        let id = self.current_page?;
        self.page_mut(id)
    }

    pub fn current_layer_id(&self) -> Option<LayerId> {
        self.current_page()?.current_layer().map(|l| l.id)
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.current_page()?.current_layer()
    }

    pub fn current_database(&self) -> Option<&Database> {
        let id = self.current_database?;
        self.databases.iter().find(|d| d.id == id)
    }

    pub fn selected(&self) -> Option<Selected> {
        self.selected
    }

    /// Change the focused container and normalize the current document and
    /// page. Returns `false` when `value` names nothing in the project.
    pub fn set_selected(&mut self, value: Selected) -> bool {
        match value {
            Selected::Layer(layer_id) => {
                let Some(owner) = self.layer(layer_id).map(|l| l.owner) else {
                    return false;
                };
                if self.current_page != Some(owner) {
                    self.current_page = Some(owner);
                    if let Some(document) = self.document_of_page(owner) {
                        self.current_document = Some(document);
                    }
                }
                if let Some(page) = self.page_mut(owner) {
                    page.current_layer = Some(layer_id);
                }
            }
            Selected::Page(page_id) => {
                if self.page(page_id).is_none() {
                    return false;
                }
                if let Some(document) = self.document_of_page(page_id) {
                    self.current_document = Some(document);
                    self.fall_back_to_first_page(document);
                }
            }
            Selected::Document(document_id) => {
                if self.document(document_id).is_none() {
                    return false;
                }
                self.current_document = Some(document_id);
                self.fall_back_to_first_page(document_id);
            }
        }
        self.selected = Some(value);
        debug!(?value, "Selection changed");
        true
    }

    fn fall_back_to_first_page(&mut self, document: DocumentId) {
        let Some(doc) = self.document(document) else {
            return;
        };
        let belongs = self.current_page.is_some_and(|p| doc.contains_page(p));
        let first = doc.pages.first().map(|p| p.id);
        if !belongs {
            self.current_page = first;
        }
    }

    /// Re-establish current pointers after the container tree changed.
    pub(crate) fn repair_current(&mut self) {
        if !self
            .current_document
            .is_some_and(|d| self.document(d).is_some())
        {
            self.current_document = self.documents.first().map(|d| d.id);
        }
        let valid_page = match (self.current_document, self.current_page) {
            (Some(d), Some(p)) => self.document(d).is_some_and(|doc| doc.contains_page(p)),
            _ => false,
        };
        if !valid_page {
            self.current_page = self
                .current_document
                .and_then(|d| self.document(d))
                .and_then(|d| d.pages.first())
                .map(|p| p.id);
        }
        let selected_valid = match self.selected {
            Some(Selected::Layer(id)) => self.layer(id).is_some(),
            Some(Selected::Page(id)) => self.page(id).is_some(),
            Some(Selected::Document(id)) => self.document(id).is_some(),
            None => true,
        };
        if !selected_valid {
            self.selected = self.current_page.map(Selected::Page);
        }
    }

    /// Apply `edits` and record them as one undo step. On failure the
    /// edits already applied are reverted and nothing is recorded.
    pub fn commit(&mut self, name: &str, edits: Vec<Edit>) -> Result<()> {
        if edits.is_empty() {
            return Ok(());
        }
        for (index, edit) in edits.iter().enumerate() {
            if let Err(err) = edit.apply(self) {
                for applied in edits[..index].iter().rev() {
                    if let Err(undo_err) = applied.undo(self) {
                        warn!("Failed to roll back {}: {}", applied.name(), undo_err);
                    }
                }
                return Err(err);
            }
        }
        self.record(name, edits);
        Ok(())
    }

    /// Record edits whose new state is already in place.
    pub fn record(&mut self, name: &str, edits: Vec<Edit>) {
        if edits.is_empty() {
            return;
        }
        debug!("History: {} ({} edits)", name, edits.len());
        self.history.push(HistoryEntry::new(name, edits));
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the last entry. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        if let Err(err) = entry.undo(self) {
            warn!("Undo of '{}' failed: {}", entry.name, err);
        }
        self.history.push_redo(entry);
        true
    }

    /// Re-apply the last undone entry. `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        if let Err(err) = entry.apply(self) {
            warn!("Redo of '{}' failed: {}", entry.name, err);
        }
        self.history.push_undo(entry);
        true
    }

    /// Edit setting the shapes of `layer`, `None` if unchanged or missing.
    pub fn layer_shapes_edit(&self, layer: LayerId, shapes: Vec<ShapeId>) -> Option<Edit> {
        let old = &self.layer(layer)?.shapes;
        (*old != shapes).then(|| Edit::LayerShapes {
            layer,
            old: old.clone(),
            new: shapes,
        })
    }

    pub fn add_shape(&mut self, layer: LayerId, shape: ShapeId) -> Result<()> {
        self.add_shapes(layer, &[shape])
    }

    /// Append shapes on top of `layer`.
    pub fn add_shapes(&mut self, layer: LayerId, shapes: &[ShapeId]) -> Result<()> {
        let mut list = self
            .layer(layer)
            .ok_or(ModelError::LayerNotFound { id: layer.0 })?
            .shapes
            .clone();
        list.extend_from_slice(shapes);
        let edits = self.layer_shapes_edit(layer, list).into_iter().collect();
        self.commit("Add Shapes", edits)
    }

    /// Remove top-level shapes from whichever layers hold them.
    /// Returns `false` when none of them was found.
    pub fn remove_shapes(&mut self, shapes: &[ShapeId]) -> Result<bool> {
        let edits = self.remove_shapes_edits(shapes);
        if edits.is_empty() {
            return Ok(false);
        }
        self.commit("Remove Shapes", edits)?;
        Ok(true)
    }

    pub(crate) fn remove_shapes_edits(&self, shapes: &[ShapeId]) -> Vec<Edit> {
        let remove: HashSet<ShapeId> = shapes.iter().copied().collect();
        self.pages()
            .flat_map(|p| p.layers.iter())
            .filter(|l| l.shapes.iter().any(|s| remove.contains(s)))
            .filter_map(|l| {
                let kept = l
                    .shapes
                    .iter()
                    .copied()
                    .filter(|s| !remove.contains(s))
                    .collect();
                self.layer_shapes_edit(l.id, kept)
            })
            .collect()
    }

    /// Replace a shape value through history.
    pub fn update_shape(&mut self, shape: Shape) -> Result<()> {
        let old = self
            .store
            .get(shape.id)
            .cloned()
            .ok_or(ModelError::ShapeNotFound { id: shape.id.0 })?;
        let edits = Edit::shape(old, shape).into_iter().collect();
        self.commit("Update Shape", edits)
    }

    pub fn update_style(&mut self, style: ShapeStyle) -> Result<()> {
        let old = self
            .store
            .style(style.id)
            .cloned()
            .ok_or(ModelError::StyleNotFound { id: style.id.0 })?;
        let edits = Edit::style(old, style).into_iter().collect();
        self.commit("Update Style", edits)
    }

    pub fn set_options(&mut self, options: Options) -> Result<()> {
        if options == self.options {
            return Ok(());
        }
        let edit = Edit::Options {
            old: Box::new(self.options.clone()),
            new: Box::new(options),
        };
        self.commit("Options", vec![edit])
    }

    pub fn add_layer(&mut self, page: PageId, name: &str) -> Result<LayerId> {
        let layers = self
            .page(page)
            .ok_or(ModelError::PageNotFound { id: page.0 })?
            .layers
            .clone();
        let layer = self.create_layer(page, name);
        let id = layer.id;
        let mut new = layers.clone();
        new.push(layer);
        let edit = Edit::PageLayers {
            page,
            old: layers,
            new,
        };
        self.commit("Add Layer", vec![edit])?;
        Ok(id)
    }

    /// Remove a layer; the last layer of a page stays.
    pub fn remove_layer(&mut self, layer: LayerId) -> Result<bool> {
        let Some(owner) = self.layer(layer).map(|l| l.owner) else {
            return Ok(false);
        };
        let layers = self
            .page(owner)
            .ok_or(ModelError::PageNotFound { id: owner.0 })?
            .layers
            .clone();
        if layers.len() < 2 {
            return Ok(false);
        }
        let new = layers.iter().filter(|l| l.id != layer).cloned().collect();
        let edit = Edit::PageLayers {
            page: owner,
            old: layers,
            new,
        };
        self.commit("Remove Layer", vec![edit])?;
        self.repair_current();
        Ok(true)
    }

    pub fn add_page(&mut self, document: DocumentId, name: &str) -> Result<PageId> {
        let pages = self
            .document(document)
            .ok_or_else(|| ModelError::Other {
                message: format!("Document {} not found", document),
            })?
            .pages
            .clone();
        let mut page = self.create_page(name);
        page.template = self.templates.first().map(|t| t.id);
        let id = page.id;
        let mut new = pages.clone();
        new.push(page);
        let edit = Edit::DocumentPages {
            document,
            old: pages,
            new,
        };
        self.commit("Add Page", vec![edit])?;
        Ok(id)
    }

    pub fn add_document(&mut self, name: &str) -> Result<DocumentId> {
        let mut document = self.create_document(name);
        let mut page = self.create_page("Page");
        page.template = self.templates.first().map(|t| t.id);
        document.pages.push(page);
        let id = document.id;
        let mut new = self.documents.clone();
        new.push(document);
        let edit = Edit::Documents {
            old: self.documents.clone(),
            new,
        };
        self.commit("Add Document", vec![edit])?;
        Ok(id)
    }

    pub fn add_template(&mut self, name: &str) -> Result<PageId> {
        let template = self.create_page(name);
        let id = template.id;
        let mut new = self.templates.clone();
        new.push(template);
        let edit = Edit::Templates {
            old: self.templates.clone(),
            new,
        };
        self.commit("Add Template", vec![edit])?;
        Ok(id)
    }

    /// Point `page` at a template (or none).
    pub fn set_page_template(&mut self, page: PageId, template: Option<PageId>) -> Result<()> {
        if template.is_some_and(|t| self.template(t).is_none()) {
            return Err(ModelError::PageNotFound {
                id: template.map(|t| t.0).unwrap_or_default(),
            }
            .into());
        }
        let document = self
            .document_of_page(page)
            .ok_or(ModelError::PageNotFound { id: page.0 })?;
        let old = self
            .document(document)
            .map(|d| d.pages.clone())
            .unwrap_or_default();
        let mut new = old.clone();
        if let Some(target) = new.iter_mut().find(|p| p.id == page) {
            target.template = template;
        }
        let edit = Edit::DocumentPages { document, old, new };
        self.commit("Set Template", vec![edit])
    }

    pub fn add_style_to_library(&mut self, library: usize, style: StyleId) -> Result<bool> {
        let Some(old) = self.style_libraries.get(library).map(|l| l.items.clone()) else {
            return Ok(false);
        };
        if old.contains(&style) || self.store.style(style).is_none() {
            return Ok(false);
        }
        let mut new = old.clone();
        new.push(style);
        let edit = Edit::StyleLibrary {
            index: library,
            old,
            new,
        };
        self.commit("Add Style", vec![edit])?;
        Ok(true)
    }

    pub fn remove_style_from_library(&mut self, library: usize, style: StyleId) -> Result<bool> {
        let Some(old) = self.style_libraries.get(library).map(|l| l.items.clone()) else {
            return Ok(false);
        };
        if !old.contains(&style) {
            return Ok(false);
        }
        let new = old.iter().copied().filter(|s| *s != style).collect();
        let edit = Edit::StyleLibrary {
            index: library,
            old,
            new,
        };
        self.commit("Remove Style", vec![edit])?;
        Ok(true)
    }

    pub fn add_group_to_library(&mut self, library: usize, group: ShapeId) -> Result<bool> {
        let Some(old) = self.group_libraries.get(library).map(|l| l.items.clone()) else {
            return Ok(false);
        };
        let is_group = self
            .store
            .get(group)
            .is_some_and(|s| matches!(s.kind, ShapeKind::Group(_)));
        if !is_group || old.contains(&group) {
            return Ok(false);
        }
        let mut new = old.clone();
        new.push(group);
        let edit = Edit::GroupLibrary {
            index: library,
            old,
            new,
        };
        self.commit("Add Group", vec![edit])?;
        Ok(true)
    }

    pub fn remove_group_from_library(&mut self, library: usize, group: ShapeId) -> Result<bool> {
        let Some(old) = self.group_libraries.get(library).map(|l| l.items.clone()) else {
            return Ok(false);
        };
        if !old.contains(&group) {
            return Ok(false);
        }
        let new = old.iter().copied().filter(|g| *g != group).collect();
        let edit = Edit::GroupLibrary {
            index: library,
            old,
            new,
        };
        self.commit("Remove Group", vec![edit])?;
        Ok(true)
    }

    /// Top-level shapes of every persisted container plus library groups.
    pub fn root_shapes(&self) -> Vec<ShapeId> {
        self.pages()
            .flat_map(|p| p.layers.iter())
            .flat_map(|l| l.shapes.iter().copied())
            .chain(
                self.group_libraries
                    .iter()
                    .flat_map(|l| l.items.iter().copied()),
            )
            .collect()
    }

    /// Styles kept alive by libraries and options even when unused.
    pub fn library_styles(&self) -> Vec<StyleId> {
        self.style_libraries
            .iter()
            .flat_map(|l| l.items.iter().copied())
            .chain(self.options.current_style)
            .collect()
    }

    /// Image keys referenced by reachable image shapes.
    pub fn used_image_keys(&self) -> HashSet<String> {
        let reachable = self.store.reachable(self.root_shapes());
        reachable
            .into_iter()
            .filter_map(|id| match &self.store.get(id)?.kind {
                ShapeKind::Image(image) => Some(image.key.clone()),
                _ => None,
            })
            .collect()
    }

    /// Drop unreachable shapes, styles and images. Only valid while history
    /// is empty, since undo entries may reference dropped shapes.
    pub fn purge(&mut self) -> usize {
        let roots = self.root_shapes();
        let styles = self.library_styles();
        let removed = self.store.retain_reachable(roots, styles);
        let used = self.used_image_keys();
        let images = self.images.purge_unused_images(&used);
        if removed + images > 0 {
            debug!("Purged {} shapes/styles and {} images", removed, images);
        }
        removed
    }

    /// Restore transient state after deserialization.
    pub(crate) fn after_load(&mut self) {
        for page in self.pages_mut() {
            page.restore_transient_layers();
        }
        self.history.reset();
        self.repair_current();
        self.repair_dangling_records();
    }

    /// Ids currently used by containers, for id counter recovery.
    fn max_container_id(&self) -> u64 {
        let layer_ids = self
            .pages()
            .flat_map(|p| p.layers.iter().map(|l| l.id.0).chain([p.id.0]));
        let doc_ids = self.documents.iter().map(|d| d.id.0);
        let lib_ids = self
            .style_libraries
            .iter()
            .map(|l| l.id.0)
            .chain(self.group_libraries.iter().map(|l| l.id.0));
        layer_ids.chain(doc_ids).chain(lib_ids).max().unwrap_or(0)
    }

    pub(crate) fn recover_container_ids(&mut self) {
        self.next_container_id = self.next_container_id.max(self.max_container_id() + 1);
    }
}
