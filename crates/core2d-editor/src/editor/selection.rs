//! Shape selection on the current layer.

use crate::events::EditorEvent;
use crate::geometry::{Point2, Rect2};
use crate::model::ShapeId;

use super::Editor;

impl Editor {
    /// Replace the selection. Ids not on the current layer are ignored.
    pub fn select(&mut self, ids: &[ShapeId]) {
        let shapes = self.layer_shapes();
        let mut selection: Vec<ShapeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if shapes.contains(id) && !selection.contains(id) {
                selection.push(*id);
            }
        }
        self.selection = selection;
        self.events
            .publish(EditorEvent::ShapesSelected(self.selection.len()));
    }

    pub fn deselect(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.events.publish(EditorEvent::ShapesSelected(0));
    }

    pub fn select_all(&mut self) {
        let shapes = self.layer_shapes();
        self.select(&shapes);
    }

    /// Topmost shape of the current layer under `at`.
    pub fn shape_at(&self, at: Point2) -> Option<ShapeId> {
        let project = self.project.as_ref()?;
        let shapes = &project.current_layer()?.shapes;
        self.hit_test.try_to_get_shape(
            &project.store,
            shapes,
            at,
            self.hit_radius(),
            self.viewport.zoom(),
        )
    }

    /// Topmost point under `at`, owned by or being a shape of the current
    /// layer.
    pub fn point_at(&self, at: Point2) -> Option<ShapeId> {
        let project = self.project.as_ref()?;
        let shapes = &project.current_layer()?.shapes;
        self.hit_test.try_to_get_point(
            &project.store,
            shapes,
            at,
            self.hit_radius(),
            self.viewport.zoom(),
        )
    }

    /// Select the topmost shape under `at`, or clear the selection.
    pub fn select_at(&mut self, at: Point2) -> Option<ShapeId> {
        match self.shape_at(at) {
            Some(id) => {
                self.select(&[id]);
                Some(id)
            }
            None => {
                self.deselect();
                None
            }
        }
    }

    /// Select every shape intersecting `rect`. Returns the selection size.
    pub fn select_in_rect(&mut self, rect: Rect2) -> usize {
        let Some(project) = self.project.as_ref() else {
            return 0;
        };
        let Some(layer) = project.current_layer() else {
            return 0;
        };
        let ids = self.hit_test.try_to_get_shapes(
            &project.store,
            &layer.shapes,
            &rect,
            self.hit_radius(),
            self.viewport.zoom(),
        );
        self.select(&ids);
        self.selection.len()
    }

    /// Selected shapes that are not locked, in layer order.
    pub(crate) fn editable_selection(&self) -> Vec<ShapeId> {
        let Some(project) = self.project.as_ref() else {
            return Vec::new();
        };
        self.layer_shapes()
            .into_iter()
            .filter(|id| self.selection.contains(id))
            .filter(|id| project.store.get(*id).is_some_and(|s| !s.is_locked()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeDefaults;

    fn editor_with_lines() -> (Editor, ShapeId, ShapeId) {
        let mut editor = Editor::default();
        editor.new_project("Selection");
        let project = editor.project_mut().unwrap();
        let layer = project.current_layer_id().unwrap();
        let a = project.store.create_line(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            ShapeDefaults::default(),
        );
        let b = project.store.create_line(
            Point2::new(0.0, 50.0),
            Point2::new(100.0, 50.0),
            ShapeDefaults::default(),
        );
        project.add_shapes(layer, &[a, b]).unwrap();
        (editor, a, b)
    }

    #[test]
    fn test_select_at_picks_line() {
        let (mut editor, a, _) = editor_with_lines();
        assert_eq!(editor.select_at(Point2::new(50.0, 2.0)), Some(a));
        assert_eq!(editor.selection(), &[a]);
        assert_eq!(editor.select_at(Point2::new(50.0, 25.0)), None);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_select_in_rect_and_all() {
        let (mut editor, a, b) = editor_with_lines();
        assert_eq!(editor.select_in_rect(Rect2::new(-5.0, 40.0, 20.0, 20.0)), 1);
        assert_eq!(editor.selection(), &[b]);
        editor.select_all();
        assert_eq!(editor.selection(), &[a, b]);
    }

    #[test]
    fn test_select_ignores_foreign_ids() {
        let (mut editor, a, _) = editor_with_lines();
        editor.select(&[ShapeId(9999), a, a]);
        assert_eq!(editor.selection(), &[a]);
    }
}
