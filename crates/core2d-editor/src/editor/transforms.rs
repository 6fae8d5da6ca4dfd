//! Transform operations (move, z-order, align, distribute, flip, rotate).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Editor;
use crate::commands::Edit;
use crate::geometry::{Point2, Rect2};
use crate::model::{Shape, ShapeId, ShapeKind, ShapeStore};
use crate::project::MoveMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nudge {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZOrder {
    Front,
    Forward,
    Backward,
    Back,
}

/// Copy of a point shape at `position`, or `None` for other kinds.
fn repositioned(shape: &Shape, position: Point2) -> Option<Shape> {
    let mut moved = shape.clone();
    match &mut moved.kind {
        ShapeKind::Point(p) => {
            p.x = position.x;
            p.y = position.y;
        }
        _ => return None,
    }
    moved.mark_as_dirty();
    Some(moved)
}

/// Edits moving points to new positions. The first position given for a
/// point wins, so a point shared by two shapes moves once.
fn point_edits(store: &ShapeStore, positions: &[(ShapeId, Point2)]) -> Vec<Edit> {
    let mut seen = HashSet::new();
    let mut edits = Vec::new();
    for (id, position) in positions {
        if !seen.insert(*id) {
            continue;
        }
        let Some(old) = store.get(*id) else {
            continue;
        };
        if let Some(new) = repositioned(old, *position) {
            edits.extend(Edit::shape(old.clone(), new));
        }
    }
    edits
}

/// Positions of the move targets of `id` translated by `(dx, dy)`.
fn translated_targets(store: &ShapeStore, id: ShapeId, dx: f64, dy: f64) -> Vec<(ShapeId, Point2)> {
    store
        .move_targets(&[id])
        .into_iter()
        .filter_map(|p| Some((p, store.point(p)?.translated(dx, dy))))
        .collect()
}

impl Editor {
    /// Points a drag of `ids` moves under the project's move mode.
    pub(crate) fn drag_targets(&self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let Some(project) = &self.project else {
            return Vec::new();
        };
        let store = &project.store;
        match project.options.move_mode {
            MoveMode::Shape => store.move_targets(ids),
            MoveMode::Point => {
                let mut points = Vec::new();
                for id in ids {
                    for point in store.get_points(*id) {
                        let locked = store.get(point).is_some_and(|p| p.is_locked());
                        if !locked && !points.contains(&point) {
                            points.push(point);
                        }
                    }
                }
                points
            }
        }
    }

    /// Translate the selection by `(dx, dy)` as one undo step.
    pub fn move_selection(&mut self, dx: f64, dy: f64) -> bool {
        let ids = self.editable_selection();
        let targets = self.drag_targets(&ids);
        let Some(project) = &self.project else {
            return false;
        };
        let positions: Vec<(ShapeId, Point2)> = targets
            .into_iter()
            .filter_map(|p| Some((p, project.store.point(p)?.translated(dx, dy))))
            .collect();
        let edits = point_edits(&project.store, &positions);
        self.commit("Move", edits)
    }

    /// Keyboard move by one grid step, or one unit without snapping.
    pub fn nudge(&mut self, direction: Nudge) -> bool {
        let (sx, sy) = match &self.project {
            Some(p) if p.options.snap_to_grid => (p.options.snap_x, p.options.snap_y),
            Some(_) => (1.0, 1.0),
            None => return false,
        };
        let (dx, dy) = match direction {
            Nudge::Left => (-sx, 0.0),
            Nudge::Right => (sx, 0.0),
            Nudge::Up => (0.0, -sy),
            Nudge::Down => (0.0, sy),
        };
        self.move_selection(dx, dy)
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.reorder(ZOrder::Front)
    }

    pub fn bring_forward(&mut self) -> bool {
        self.reorder(ZOrder::Forward)
    }

    pub fn send_backward(&mut self) -> bool {
        self.reorder(ZOrder::Backward)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.reorder(ZOrder::Back)
    }

    /// Move each selected shape within its layer, one undo step per shape.
    ///
    /// Forward moves walk the selection topmost first, as hit-testing
    /// reports it. Backward moves walk it in reverse, bottom first. Jumps to
    /// the front or back stack the moved shapes behind the ones already
    /// moved, and a single step never passes another selected shape, so
    /// relative order survives.
    fn reorder(&mut self, order: ZOrder) -> bool {
        let Some(layer) = self.current_layer_id() else {
            return false;
        };
        let mut ids = self.editable_selection();
        if matches!(order, ZOrder::Front | ZOrder::Forward) {
            ids.reverse();
        }
        let name = match order {
            ZOrder::Front => "Bring to Front",
            ZOrder::Forward => "Bring Forward",
            ZOrder::Backward => "Send Backward",
            ZOrder::Back => "Send to Back",
        };

        let mut moved = false;
        for (placed, id) in ids.iter().enumerate() {
            let Some(project) = &self.project else {
                break;
            };
            let Some(mut shapes) = project.layer(layer).map(|l| l.shapes.clone()) else {
                break;
            };
            let Some(source) = shapes.iter().position(|s| s == id) else {
                continue;
            };
            let last = shapes.len() - 1;
            let target = match order {
                ZOrder::Front => last.saturating_sub(placed),
                ZOrder::Back => placed.min(last),
                ZOrder::Forward if source < last => source + 1,
                ZOrder::Backward if source > 0 => source - 1,
                _ => continue,
            };
            if target == source {
                continue;
            }
            if matches!(order, ZOrder::Forward | ZOrder::Backward) && ids.contains(&shapes[target]) {
                continue;
            }
            let shape = shapes.remove(source);
            shapes.insert(target, shape);
            let edits = project.layer_shapes_edit(layer, shapes).into_iter().collect();
            moved |= self.commit(name, edits);
        }
        moved
    }

    /// Selected shapes with their bounds, in layer order.
    fn selection_bounds(&self) -> Vec<(ShapeId, Rect2)> {
        let Some(project) = &self.project else {
            return Vec::new();
        };
        self.editable_selection()
            .into_iter()
            .filter_map(|id| Some((id, project.store.bounds(id)?)))
            .collect()
    }

    /// Commit per-shape translations as one undo step.
    fn commit_offsets(&mut self, name: &str, offsets: &[(ShapeId, f64, f64)]) -> bool {
        let Some(project) = &self.project else {
            return false;
        };
        let positions: Vec<(ShapeId, Point2)> = offsets
            .iter()
            .filter(|(_, dx, dy)| *dx != 0.0 || *dy != 0.0)
            .flat_map(|(id, dx, dy)| translated_targets(&project.store, *id, *dx, *dy))
            .collect();
        let edits = point_edits(&project.store, &positions);
        self.commit(name, edits)
    }

    /// Align the selected shapes to an edge or centre of their common
    /// bounds.
    pub fn align(&mut self, alignment: Alignment) -> bool {
        let items = self.selection_bounds();
        if items.len() < 2 {
            return false;
        }
        let Some(total) = items.iter().map(|(_, b)| *b).reduce(|a, b| a.union(&b)) else {
            return false;
        };
        let offsets: Vec<(ShapeId, f64, f64)> = items
            .iter()
            .map(|(id, b)| {
                let (dx, dy) = match alignment {
                    Alignment::Left => (total.left() - b.left(), 0.0),
                    Alignment::Center => (total.center().x - b.center().x, 0.0),
                    Alignment::Right => (total.right() - b.right(), 0.0),
                    Alignment::Top => (0.0, total.top() - b.top()),
                    Alignment::Middle => (0.0, total.center().y - b.center().y),
                    Alignment::Bottom => (0.0, total.bottom() - b.bottom()),
                };
                (*id, dx, dy)
            })
            .collect();
        self.commit_offsets("Align", &offsets)
    }

    /// Space three or more shapes evenly between the outermost two.
    pub fn distribute(&mut self, axis: Axis) -> bool {
        let mut items = self.selection_bounds();
        if items.len() < 3 {
            return false;
        }
        let start = |r: &Rect2| match axis {
            Axis::Horizontal => r.left(),
            Axis::Vertical => r.top(),
        };
        let size = |r: &Rect2| match axis {
            Axis::Horizontal => r.width,
            Axis::Vertical => r.height,
        };
        items.sort_by(|a, b| start(&a.1).total_cmp(&start(&b.1)));
        let first = start(&items[0].1);
        let end = items
            .iter()
            .map(|(_, b)| start(b) + size(b))
            .fold(f64::MIN, f64::max);
        let occupied: f64 = items.iter().map(|(_, b)| size(b)).sum();
        let gap = (end - first - occupied) / (items.len() - 1) as f64;

        let mut cursor = first;
        let mut offsets = Vec::with_capacity(items.len());
        for (id, b) in &items {
            let delta = cursor - start(b);
            offsets.push(match axis {
                Axis::Horizontal => (*id, delta, 0.0),
                Axis::Vertical => (*id, 0.0, delta),
            });
            cursor += size(b) + gap;
        }
        self.commit_offsets("Distribute", &offsets)
    }

    /// Place the selected shapes edge to edge, starting at the first one.
    pub fn stack(&mut self, axis: Axis) -> bool {
        let mut items = self.selection_bounds();
        if items.len() < 2 {
            return false;
        }
        match axis {
            Axis::Horizontal => items.sort_by(|a, b| a.1.left().total_cmp(&b.1.left())),
            Axis::Vertical => items.sort_by(|a, b| a.1.top().total_cmp(&b.1.top())),
        }
        let mut cursor = match axis {
            Axis::Horizontal => items[0].1.left(),
            Axis::Vertical => items[0].1.top(),
        };
        let mut offsets = Vec::with_capacity(items.len());
        for (id, b) in &items {
            match axis {
                Axis::Horizontal => {
                    offsets.push((*id, cursor - b.left(), 0.0));
                    cursor += b.width;
                }
                Axis::Vertical => {
                    offsets.push((*id, 0.0, cursor - b.top()));
                    cursor += b.height;
                }
            }
        }
        self.commit_offsets("Stack", &offsets)
    }

    /// Apply `f` to every point the selection owns, as one undo step.
    fn map_selection_points(&mut self, name: &str, f: impl Fn(Point2, Point2) -> Point2) -> bool {
        let items = self.selection_bounds();
        let Some(total) = items.iter().map(|(_, b)| *b).reduce(|a, b| a.union(&b)) else {
            return false;
        };
        let ids: Vec<ShapeId> = items.iter().map(|(id, _)| *id).collect();
        let Some(project) = &self.project else {
            return false;
        };
        let center = total.center();
        let positions: Vec<(ShapeId, Point2)> = project
            .store
            .move_targets(&ids)
            .into_iter()
            .filter_map(|p| Some((p, f(project.store.point(p)?, center))))
            .collect();
        let edits = point_edits(&project.store, &positions);
        self.commit(name, edits)
    }

    /// Mirror the selection about the centre of its bounds.
    pub fn flip(&mut self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.map_selection_points("Flip Horizontal", |p, c| {
                Point2::new(2.0 * c.x - p.x, p.y)
            }),
            Axis::Vertical => self.map_selection_points("Flip Vertical", |p, c| {
                Point2::new(p.x, 2.0 * c.y - p.y)
            }),
        }
    }

    /// Rotate the selection about the centre of its bounds.
    pub fn rotate(&mut self, degrees: f64) -> bool {
        self.map_selection_points("Rotate", |p, c| p.rotated_around(c, degrees))
    }
}
