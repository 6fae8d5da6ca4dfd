//! Styles, databases, record binding and containers.

use std::path::Path;

use tracing::{debug, error, info};
use uuid::Uuid;

use core2d_core::{FileSystem, ScriptRunner, TextFieldReader, TextFieldWriter};

use super::Editor;
use crate::commands::Edit;
use crate::data::{Database, DataFlow};
use crate::geometry::Point2;
use crate::model::{ShapeId, ShapeKind, StyleId};
use crate::project::Selected;
use crate::style::ShapeStyle;

/// Size of the text boxes created when a record is dropped on empty space.
const RECORD_TEXT_WIDTH: f64 = 120.0;
const RECORD_TEXT_HEIGHT: f64 = 20.0;

impl Editor {
    /// Add a copy of `style` to the first style library.
    pub fn import_style(&mut self, style: ShapeStyle) -> Option<StyleId> {
        let project = self.project.as_mut()?;
        let old = project.style_libraries.first()?.items.clone();
        let mut copy = style;
        copy.id = StyleId(project.store.generate_id());
        let id = project.store.insert_style(copy);
        let mut new = old.clone();
        new.push(id);
        let edit = Edit::StyleLibrary { index: 0, old, new };
        self.commit("Import Style", vec![edit]).then_some(id)
    }

    /// Make `style` the style of new shapes.
    pub fn set_current_style(&mut self, style: Option<StyleId>) -> bool {
        let Some(project) = self.project.as_ref() else {
            return false;
        };
        if style.is_some_and(|s| project.store.style(s).is_none()) {
            return false;
        }
        let old = project.options.clone();
        let mut new = old.clone();
        new.current_style = style;
        if old == new {
            return false;
        }
        let edit = Edit::Options {
            old: Box::new(old),
            new: Box::new(new),
        };
        self.commit("Set Style", vec![edit])
    }

    /// Give every editable selected shape `style`.
    pub fn apply_style(&mut self, style: StyleId) -> bool {
        let ids = self.editable_selection();
        self.set_style_of(&ids, style, "Apply Style")
    }

    /// Give the shape under `at` `style`.
    pub fn drop_style(&mut self, style: StyleId, at: Point2) -> bool {
        match self.shape_at(at) {
            Some(id) => self.set_style_of(&[id], style, "Drop Style"),
            None => false,
        }
    }

    fn set_style_of(&mut self, ids: &[ShapeId], style: StyleId, name: &str) -> bool {
        let Some(project) = self.project.as_ref() else {
            return false;
        };
        if project.store.style(style).is_none() {
            return false;
        }
        let edits = ids
            .iter()
            .filter_map(|id| {
                let old = project.store.get(*id)?.clone();
                let mut new = old.clone();
                new.style = Some(style);
                Edit::shape(old, new)
            })
            .collect();
        self.commit(name, edits)
    }

    /// Add `database` and make it current. A database with the same id is
    /// not added twice.
    pub fn add_database(&mut self, database: Database) -> bool {
        let Some(project) = self.project.as_ref() else {
            return false;
        };
        if project.databases.iter().any(|d| d.id == database.id) {
            debug!("Database {} already present", database.id);
            return false;
        }
        let old = project.databases.clone();
        let mut new = old.clone();
        let new_current = Some(database.id);
        new.push(database);
        let edit = Edit::Databases {
            old,
            new,
            old_current: project.current_database,
            new_current,
        };
        self.commit("Add Database", vec![edit])
    }

    pub fn remove_database(&mut self, id: Uuid) -> bool {
        let Some(project) = self.project.as_ref() else {
            return false;
        };
        if !project.databases.iter().any(|d| d.id == id) {
            return false;
        }
        let old = project.databases.clone();
        let new: Vec<Database> = old.iter().filter(|d| d.id != id).cloned().collect();
        let new_current = match project.current_database {
            Some(current) if current == id => new.first().map(|d| d.id),
            other => other,
        };
        let edit = Edit::Databases {
            old,
            new,
            old_current: project.current_database,
            new_current,
        };
        self.commit("Remove Database", vec![edit])
    }

    /// Read a database through `reader` and add it to the project.
    pub fn import_database(
        &mut self,
        reader: &dyn TextFieldReader<Database>,
        fs: &dyn FileSystem,
        path: &Path,
    ) -> bool {
        if self.project.is_none() {
            return false;
        }
        match reader.read(fs, path) {
            Ok(database) => {
                info!(
                    "Imported {} records from {} ({})",
                    database.records.len(),
                    path.display(),
                    reader.name()
                );
                self.add_database(database)
            }
            Err(e) => {
                error!("Failed to import {}: {}", path.display(), e);
                false
            }
        }
    }

    pub fn export_database(
        &self,
        writer: &dyn TextFieldWriter<Database>,
        fs: &dyn FileSystem,
        path: &Path,
        id: Uuid,
    ) -> bool {
        let Some(database) = self
            .project
            .as_ref()
            .and_then(|p| p.databases.iter().find(|d| d.id == id))
        else {
            return false;
        };
        match writer.write(fs, path, database) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to export {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Bind `record` to the shape under `at`. On empty space a text box per
    /// visible column is added instead, grouped and bound to the record.
    pub fn drop_record(&mut self, record: Uuid, at: Point2) -> Option<ShapeId> {
        let project = self.project.as_ref()?;
        let database = project
            .databases
            .iter()
            .find(|d| d.contains_record(record))?
            .clone();

        if let Some(id) = self.shape_at(at) {
            let old = project.store.get(id)?.clone();
            let mut new = old.clone();
            new.data.record = Some(record);
            let edits = Edit::shape(old, new).into_iter().collect();
            return self.commit("Bind Record", edits).then_some(id);
        }

        let layer = self.current_layer_id()?;
        let origin = self.snapped(at);
        let project = self.project.as_mut()?;
        let defaults = project.options.shape_defaults();
        let columns = database.columns.iter().filter(|c| c.is_visible);
        let mut texts = Vec::new();
        for (row, column) in columns.enumerate() {
            let top = origin.y + row as f64 * RECORD_TEXT_HEIGHT;
            let id = project.store.create_text(
                Point2::new(origin.x, top),
                Point2::new(origin.x + RECORD_TEXT_WIDTH, top + RECORD_TEXT_HEIGHT),
                &format!("{{{}}}", column.name),
                defaults,
            );
            if let Some(text) = project.store.get_mut(id) {
                text.data.record = Some(record);
            }
            texts.push(id);
        }
        if texts.is_empty() {
            return None;
        }
        let group = project.store.create_group(&database.name, texts, Vec::new());
        if let Some(shape) = project.store.get_mut(group) {
            shape.data.record = Some(record);
        }
        let mut shapes = project.layer(layer)?.shapes.clone();
        shapes.push(group);
        let edits = project.layer_shapes_edit(layer, shapes).into_iter().collect();
        if !self.commit("Drop Record", edits) {
            return None;
        }
        self.select(&[group]);
        Some(group)
    }

    /// Text of a text shape with its placeholders resolved against the
    /// bound record and the current page.
    pub fn bound_text(&self, id: ShapeId) -> Option<String> {
        let project = self.project.as_ref()?;
        let shape = project.store.get(id)?;
        let ShapeKind::Text(text) = &shape.kind else {
            return None;
        };
        let page = project.current_page().map(|p| &p.data);
        let flow = DataFlow::new(&project.databases, page);
        Some(flow.bind_text(&text.text, &shape.data))
    }

    /// Run `code` through the async slot.
    pub async fn run_script(&mut self, runner: &dyn ScriptRunner, code: &str) -> bool {
        let Some(ticket) = self.begin_async() else {
            return false;
        };
        let result = runner.execute(code).await;
        if !self.finish_async(ticket) {
            return false;
        }
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Script failed: {}", e);
                false
            }
        }
    }

    /// Add a layer to the current page and focus it.
    pub fn add_layer(&mut self, name: &str) -> Option<Selected> {
        let project = self.project.as_mut()?;
        let page = project.current_page()?.id;
        let layer = match project.add_layer(page, name) {
            Ok(layer) => layer,
            Err(e) => {
                error!("Failed to add layer: {}", e);
                return None;
            }
        };
        self.notify_history();
        let selected = Selected::Layer(layer);
        self.set_selected(selected).then_some(selected)
    }

    /// Remove the current layer. The last layer of a page stays.
    pub fn remove_current_layer(&mut self) -> bool {
        let Some(layer) = self.current_layer_id() else {
            return false;
        };
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let removed = match project.remove_layer(layer) {
            Ok(removed) => removed,
            Err(e) => {
                error!("Failed to remove layer: {}", e);
                false
            }
        };
        if removed {
            self.reset();
            self.retain_selection();
            self.notify_history();
        }
        removed
    }

    /// Add a page to the current document and focus it.
    pub fn add_page(&mut self, name: &str) -> Option<Selected> {
        let project = self.project.as_mut()?;
        let document = project.current_document?;
        let page = match project.add_page(document, name) {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to add page: {}", e);
                return None;
            }
        };
        // Selecting a page keeps the current page of its document, so move
        // the focus first.
        project.current_page = Some(page);
        self.notify_history();
        let selected = Selected::Page(page);
        self.set_selected(selected).then_some(selected)
    }
}
