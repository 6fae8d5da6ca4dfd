//! Shape operations (delete, clipboard, duplicate, group) for the editor.

use std::collections::HashSet;

use tracing::{debug, error};

use core2d_core::{Clipboard, Result};

use super::{Editor, Ticket};
use crate::commands::Edit;
use crate::model::{ShapeFragment, ShapeId, ShapeKind, ShapeState};
use crate::serialization::{export_json, import_json, LibraryObject};

impl Editor {
    pub fn can_group(&self) -> bool {
        !self.editable_selection().is_empty()
    }

    pub fn can_ungroup(&self) -> bool {
        let Some(project) = &self.project else {
            return false;
        };
        self.editable_selection().iter().any(|id| {
            project
                .store
                .get(*id)
                .is_some_and(|s| matches!(s.kind, ShapeKind::Group(_)))
        })
    }

    /// Remove the selected shapes from their layer.
    pub fn delete_selected(&mut self) -> bool {
        let ids = self.editable_selection();
        let Some(project) = &self.project else {
            return false;
        };
        let edits = project.remove_shapes_edits(&ids);
        if !self.commit("Delete", edits) {
            return false;
        }
        self.deselect();
        true
    }

    /// Fragment holding the selected shapes with everything they reference.
    pub fn copy_fragment(&self) -> Option<ShapeFragment> {
        let project = self.project.as_ref()?;
        let ids: Vec<ShapeId> = self
            .layer_shapes()
            .into_iter()
            .filter(|id| self.selection.contains(id))
            .collect();
        if ids.is_empty() {
            return None;
        }
        Some(project.store.export_fragment(&ids, &project.databases))
    }

    /// Clipboard text for the selection.
    pub fn copy_text(&self) -> Option<String> {
        let fragment = self.copy_fragment()?;
        match export_json(&LibraryObject::Fragment(fragment)) {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Failed to serialize selection: {}", e);
                None
            }
        }
    }

    pub async fn copy(&self, clipboard: &dyn Clipboard) -> bool {
        let Some(text) = self.copy_text() else {
            return false;
        };
        match clipboard.set_text(&text).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to write clipboard: {}", e);
                false
            }
        }
    }

    pub async fn cut(&mut self, clipboard: &dyn Clipboard) -> bool {
        self.copy(clipboard).await && self.delete_selected()
    }

    /// Paste whatever library object the clipboard holds.
    ///
    /// An object of an unknown kind is returned as an error, every other
    /// failure is logged and reported as `false`.
    pub async fn paste(&mut self, clipboard: &dyn Clipboard) -> Result<bool> {
        let Some(ticket) = self.begin_async() else {
            return Ok(false);
        };
        let text = clipboard.get_text().await;
        self.complete_paste(ticket, text)
    }

    /// Second half of [`paste`](Editor::paste) for callers driving the
    /// clipboard read themselves.
    pub fn complete_paste(&mut self, ticket: Ticket, text: Result<Option<String>>) -> Result<bool> {
        if !self.finish_async(ticket) {
            return Ok(false);
        }
        match text {
            Ok(Some(text)) => self.paste_text(&text),
            Ok(None) => Ok(false),
            Err(e) => {
                error!("Failed to read clipboard: {}", e);
                Ok(false)
            }
        }
    }

    pub fn paste_text(&mut self, text: &str) -> Result<bool> {
        let object = match import_json(text) {
            Ok(object) => object,
            Err(e) if e.is_not_supported() => return Err(e),
            Err(e) => {
                error!("Clipboard does not hold a library object: {}", e);
                return Ok(false);
            }
        };
        debug!("Pasting {}", object.kind());
        Ok(match object {
            LibraryObject::Fragment(fragment) | LibraryObject::Group(fragment) => {
                self.paste_fragment(&fragment).is_some()
            }
            LibraryObject::Style(style) => self.import_style(style).is_some(),
            LibraryObject::Database(database) => self.add_database(database),
        })
    }

    /// Insert a copy of `fragment` on top of the current layer, adopting
    /// records no database knows about. The pasted roots become the
    /// selection.
    pub fn paste_fragment(&mut self, fragment: &ShapeFragment) -> Option<Vec<ShapeId>> {
        if fragment.is_empty() {
            return None;
        }
        let layer = self.current_layer_id()?;
        let project = self.project.as_mut()?;
        let ids = project.store.import_fragment(fragment);
        let mut shapes = project.layer(layer)?.shapes.clone();
        shapes.extend_from_slice(&ids);
        let mut edits: Vec<Edit> = project.layer_shapes_edit(layer, shapes).into_iter().collect();
        edits.extend(project.restore_records_edit(&ids, fragment));
        if !self.commit("Paste", edits) {
            return None;
        }
        self.select(&ids);
        Some(ids)
    }

    /// Copy the selection in place on top of the layer.
    pub fn duplicate_selected(&mut self) -> Option<Vec<ShapeId>> {
        let fragment = self.copy_fragment()?;
        self.paste_fragment(&fragment)
    }

    /// Replace the selected shapes by a group.
    ///
    /// The group takes the place of the topmost grouped shape. Points the
    /// group shares with shapes outside of it become its connectors.
    pub fn group_selected(&mut self, name: &str) -> Option<ShapeId> {
        let members = self.editable_selection();
        if members.is_empty() {
            return None;
        }
        let layer = self.current_layer_id()?;
        let project = self.project.as_mut()?;
        let mut shapes = project.layer(layer)?.shapes.clone();
        let top = members
            .iter()
            .filter_map(|id| shapes.iter().position(|s| s == id))
            .max()?;
        let index = top + 1 - members.len();

        let outside_roots: Vec<ShapeId> = project
            .root_shapes()
            .into_iter()
            .filter(|id| !members.contains(id))
            .collect();
        let outside = project.store.reachable(outside_roots);
        let mut connectors = Vec::new();
        for member in &members {
            for point in project.store.get_points(*member) {
                if outside.contains(&point) && !connectors.contains(&point) {
                    connectors.push(point);
                }
            }
        }

        let mut edits = Vec::new();
        for point in &connectors {
            if let Some(old) = project.store.get(*point).cloned() {
                let mut new = old.clone();
                new.state |= ShapeState::CONNECTOR;
                edits.extend(Edit::shape(old, new));
            }
        }
        let group = project.store.create_group(name, members.clone(), Vec::new());
        if let Some(shape) = project.store.get_mut(group) {
            if let ShapeKind::Group(g) = &mut shape.kind {
                g.connectors = connectors;
            }
        }
        shapes.retain(|id| !members.contains(id));
        shapes.insert(index.min(shapes.len()), group);
        edits.extend(project.layer_shapes_edit(layer, shapes));
        if !self.commit("Group", edits) {
            return None;
        }
        self.select(&[group]);
        Some(group)
    }

    /// Replace every selected group by its children, in their order.
    pub fn ungroup_selected(&mut self) -> bool {
        let selected = self.editable_selection();
        let Some(layer) = self.current_layer_id() else {
            return false;
        };
        let Some(project) = self.project.as_ref() else {
            return false;
        };
        let Some(mut shapes) = project.layer(layer).map(|l| l.shapes.clone()) else {
            return false;
        };

        let mut ungrouped = Vec::new();
        let mut released = Vec::new();
        let mut children_all = Vec::new();
        for id in &selected {
            let Some(ShapeKind::Group(group)) = project.store.get(*id).map(|s| &s.kind) else {
                continue;
            };
            let Some(index) = shapes.iter().position(|s| s == id) else {
                continue;
            };
            shapes.splice(index..=index, group.shapes.iter().copied());
            ungrouped.push(*id);
            released.extend(group.connectors.iter().copied());
            children_all.extend(group.shapes.iter().copied());
        }
        if ungrouped.is_empty() {
            return false;
        }

        // Connectors still claimed by another live group keep their flag.
        let live = project.store.reachable(
            project
                .root_shapes()
                .into_iter()
                .filter(|id| !ungrouped.contains(id)),
        );
        let claimed: HashSet<ShapeId> = live
            .iter()
            .filter_map(|id| match &project.store.get(*id)?.kind {
                ShapeKind::Group(g) => Some(g.connectors.clone()),
                _ => None,
            })
            .flatten()
            .collect();

        let mut edits = Vec::new();
        for point in released {
            if claimed.contains(&point) {
                continue;
            }
            if let Some(old) = project.store.get(point).cloned() {
                let mut new = old.clone();
                new.state.remove(ShapeState::CONNECTOR);
                edits.extend(Edit::shape(old, new));
            }
        }
        edits.extend(project.layer_shapes_edit(layer, shapes));
        if !self.commit("Ungroup", edits) {
            return false;
        }
        self.select(&children_all);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;
    use crate::model::ShapeDefaults;
    use core2d_core::MemoryClipboard;

    fn editor_with(count: usize) -> (Editor, Vec<ShapeId>) {
        let mut editor = Editor::default();
        editor.new_project("Shapes");
        let project = editor.project_mut().unwrap();
        let layer = project.current_layer_id().unwrap();
        let ids: Vec<ShapeId> = (0..count)
            .map(|i| {
                let y = i as f64 * 20.0;
                project.store.create_rectangle(
                    Point2::new(0.0, y),
                    Point2::new(10.0, y + 10.0),
                    ShapeDefaults::default(),
                )
            })
            .collect();
        project.add_shapes(layer, &ids).unwrap();
        (editor, ids)
    }

    #[test]
    fn test_delete_is_undoable() {
        let (mut editor, ids) = editor_with(2);
        editor.select(&[ids[0]]);
        assert!(editor.delete_selected());
        assert_eq!(editor.layer_shapes(), vec![ids[1]]);
        assert!(editor.undo());
        assert_eq!(editor.layer_shapes(), ids);
    }

    #[test]
    fn test_group_takes_topmost_position() {
        let (mut editor, ids) = editor_with(4);
        editor.select(&[ids[0], ids[2]]);
        let group = editor.group_selected("G").unwrap();
        assert_eq!(editor.layer_shapes(), vec![ids[1], group, ids[3]]);
    }

    #[test]
    fn test_ungroup_restores_sequence() {
        let (mut editor, ids) = editor_with(4);
        editor.select(&[ids[1], ids[2]]);
        let group = editor.group_selected("G").unwrap();
        assert_eq!(editor.layer_shapes(), vec![ids[0], group, ids[3]]);
        assert!(editor.ungroup_selected());
        assert_eq!(editor.layer_shapes(), ids);
        assert_eq!(editor.selection(), &ids[1..3]);
    }

    #[test]
    fn test_group_flags_shared_points() {
        let mut editor = Editor::default();
        editor.new_project("Connectors");
        let project = editor.project_mut().unwrap();
        let layer = project.current_layer_id().unwrap();
        let d = ShapeDefaults::default();
        let a = project.store.create_point(0.0, 0.0);
        let b = project.store.create_point(10.0, 0.0);
        let c = project.store.create_point(20.0, 0.0);
        let first = project.store.create_line_between(a, b, d);
        let second = project.store.create_line_between(b, c, d);
        project.add_shapes(layer, &[first, second]).unwrap();

        editor.select(&[first]);
        let group = editor.group_selected("G").unwrap();
        let project = editor.project().unwrap();
        assert!(project.store.get(b).unwrap().is_connector());
        assert!(!project.store.get(a).unwrap().is_connector());
        match &project.store.get(group).unwrap().kind {
            ShapeKind::Group(g) => assert_eq!(g.connectors, vec![b]),
            _ => panic!("not a group"),
        }

        assert!(editor.ungroup_selected());
        assert!(!editor.project().unwrap().store.get(b).unwrap().is_connector());
    }

    #[tokio::test]
    async fn test_copy_paste_through_clipboard() {
        let (mut editor, ids) = editor_with(1);
        let clipboard = MemoryClipboard::new();
        editor.select(&ids);
        assert!(editor.copy(&clipboard).await);
        assert!(editor.paste(&clipboard).await.unwrap());
        let shapes = editor.layer_shapes();
        assert_eq!(shapes.len(), 2);
        assert_ne!(shapes[1], ids[0]);
        assert_eq!(editor.selection(), &shapes[1..]);
    }

    #[test]
    fn test_paste_unknown_kind_is_error() {
        let (mut editor, _) = editor_with(0);
        let err = editor.paste_text(r#"{"kind":"xaml"}"#).unwrap_err();
        assert!(err.is_not_supported());
        assert!(!editor.paste_text("not json").unwrap());
    }

    #[test]
    fn test_duplicate_copies_selection() {
        let (mut editor, ids) = editor_with(2);
        editor.select(&ids);
        let copies = editor.duplicate_selected().unwrap();
        assert_eq!(copies.len(), 2);
        assert_eq!(editor.layer_shapes().len(), 4);
    }
}
