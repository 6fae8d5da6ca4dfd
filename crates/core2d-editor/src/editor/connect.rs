//! Wiring dropped groups into existing lines.

use tracing::debug;

use super::Editor;
use crate::commands::Edit;
use crate::geometry::Point2;
use crate::hit_test::HitTest;
use crate::model::{LineShape, ShapeId, ShapeKind, ShapeStore};

/// Split lines of `shapes` at pairs of axis-aligned connectors.
///
/// Each connector picks the topmost line passing within `radius` of it,
/// ignoring shapes that already hold the connector. A line hit by exactly
/// two connectors lying on a common horizontal or vertical is replaced in
/// place by two lines: start to the nearer connector and the farther
/// connector to end. Returns the new shape sequence when anything was split.
pub(crate) fn connect_lines(
    store: &mut ShapeStore,
    hit_test: &HitTest,
    shapes: &[ShapeId],
    connectors: &[ShapeId],
    radius: f64,
) -> Option<Vec<ShapeId>> {
    let mut hits: Vec<(ShapeId, Vec<ShapeId>)> = Vec::new();
    for connector in connectors {
        let Some(at) = store.point(*connector) else {
            continue;
        };
        let line = shapes.iter().rev().copied().find(|id| {
            store
                .get(*id)
                .is_some_and(|s| matches!(s.kind, ShapeKind::Line(_)))
                && !store.get_points(*id).contains(connector)
                && hit_test.contains(store, *id, at, radius)
        });
        let Some(line) = line else {
            continue;
        };
        match hits.iter_mut().find(|(l, _)| *l == line) {
            Some((_, list)) => list.push(*connector),
            None => hits.push((line, vec![*connector])),
        }
    }

    let mut result = shapes.to_vec();
    let mut changed = false;
    for (line, pair) in hits {
        let [a, b] = pair[..] else {
            debug!("Line {} hit by {} connectors, skipped", line, pair.len());
            continue;
        };
        let Some(split) = split_line(store, line, a, b, radius) else {
            continue;
        };
        if let Some(index) = result.iter().position(|s| *s == line) {
            result.splice(index..=index, split);
            changed = true;
        }
    }
    changed.then_some(result)
}

fn split_line(
    store: &mut ShapeStore,
    line: ShapeId,
    a: ShapeId,
    b: ShapeId,
    tolerance: f64,
) -> Option<[ShapeId; 2]> {
    let original = store.get(line)?.clone();
    let ShapeKind::Line(LineShape { start, end }) = original.kind else {
        return None;
    };
    let (pa, pb, ps) = (store.point(a)?, store.point(b)?, store.point(start)?);
    if !is_aligned(pa, pb, tolerance) {
        debug!("Connectors of line {} are not aligned", line);
        return None;
    }
    let (near, far) = if ps.distance_to(pa) <= ps.distance_to(pb) {
        (a, b)
    } else {
        (b, a)
    };

    let mut first = original.clone();
    first.id = ShapeId(store.generate_id());
    first.kind = ShapeKind::Line(LineShape { start, end: near });
    let mut second = original;
    second.id = ShapeId(store.generate_id());
    second.kind = ShapeKind::Line(LineShape { start: far, end });
    Some([store.insert(first), store.insert(second)])
}

fn is_aligned(a: Point2, b: Point2, tolerance: f64) -> bool {
    (a.y - b.y).abs() <= tolerance || (a.x - b.x).abs() <= tolerance
}

impl Editor {
    /// Split lines of the current layer at `connectors`.
    pub fn try_to_connect_lines(&mut self, connectors: &[ShapeId]) -> bool {
        let Some(layer) = self.current_layer_id() else {
            return false;
        };
        let radius = self.world_radius();
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let Some(shapes) = project.layer(layer).map(|l| l.shapes.clone()) else {
            return false;
        };
        let Some(connected) =
            connect_lines(&mut project.store, &self.hit_test, &shapes, connectors, radius)
        else {
            return false;
        };
        let edits = project.layer_shapes_edit(layer, connected).into_iter().collect();
        self.commit("Connect", edits)
    }

    /// Insert a copy of `group` with its top-left corner at `at`.
    ///
    /// With `Options::try_to_connect` set, lines under the copy's connectors
    /// are split and wired to them in the same undo step.
    pub fn drop_group(&mut self, group: ShapeId, at: Point2) -> Option<ShapeId> {
        let layer = self.current_layer_id()?;
        let target = self.snapped(at);
        let radius = self.world_radius();
        let project = self.project.as_mut()?;
        if !matches!(project.store.get(group)?.kind, ShapeKind::Group(_)) {
            return None;
        }

        let fragment = project.store.export_fragment(&[group], &project.databases);
        let ids = project.store.import_fragment(&fragment);
        let copy = *ids.first()?;
        let bounds = project.store.bounds(copy)?;
        project
            .store
            .move_shapes(&[copy], target.x - bounds.left(), target.y - bounds.top());

        let mut shapes = project.layer(layer)?.shapes.clone();
        shapes.push(copy);
        if project.options.try_to_connect {
            let connectors = match &project.store.get(copy)?.kind {
                ShapeKind::Group(g) => g.connectors.clone(),
                _ => Vec::new(),
            };
            if let Some(connected) =
                connect_lines(&mut project.store, &self.hit_test, &shapes, &connectors, radius)
            {
                shapes = connected;
            }
        }

        let mut edits: Vec<Edit> = project.layer_shapes_edit(layer, shapes).into_iter().collect();
        edits.extend(project.restore_records_edit(&ids, &fragment));
        if !self.commit("Drop Group", edits) {
            return None;
        }
        self.select(&[copy]);
        Some(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeDefaults;

    fn line_points(store: &ShapeStore, id: ShapeId) -> (Point2, Point2) {
        let points = store.get(id).unwrap().kind.own_points();
        (
            store.point(points[0]).unwrap(),
            store.point(points[1]).unwrap(),
        )
    }

    /// Group whose two connectors sit 80 units apart horizontally.
    fn connector_group(store: &mut ShapeStore) -> (ShapeId, ShapeId, ShapeId) {
        let c1 = store.create_point(10.0, 0.0);
        let c2 = store.create_point(90.0, 0.0);
        let body = store.create_rectangle(
            Point2::new(10.0, -10.0),
            Point2::new(90.0, 10.0),
            ShapeDefaults::default(),
        );
        let group = store.create_group("Resistor", vec![body], vec![c1, c2]);
        (group, c1, c2)
    }

    #[test]
    fn test_connect_lines_splits_at_connectors() {
        let mut store = ShapeStore::new();
        let hit_test = HitTest::default();
        let line = store.create_line(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            ShapeDefaults::default(),
        );
        let other = store.create_line(
            Point2::new(0.0, 50.0),
            Point2::new(100.0, 50.0),
            ShapeDefaults::default(),
        );
        let (group, c1, c2) = connector_group(&mut store);

        let shapes = vec![line, other, group];
        let result = connect_lines(&mut store, &hit_test, &shapes, &[c1, c2], 2.0).unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result[2], other);
        assert_eq!(result[3], group);

        let first = store.get(result[0]).unwrap().kind.own_points();
        let second = store.get(result[1]).unwrap().kind.own_points();
        assert_eq!(first[1], c1);
        assert_eq!(second[0], c2);
        assert_eq!(
            line_points(&store, result[0]),
            (Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))
        );
        assert_eq!(
            line_points(&store, result[1]),
            (Point2::new(90.0, 0.0), Point2::new(100.0, 0.0))
        );
    }

    #[test]
    fn test_connect_lines_skips_single_hit() {
        let mut store = ShapeStore::new();
        let hit_test = HitTest::default();
        let line = store.create_line(
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 0.0),
            ShapeDefaults::default(),
        );
        let (_, c1, c2) = connector_group(&mut store);
        assert!(connect_lines(&mut store, &hit_test, &[line], &[c1, c2], 2.0).is_none());
    }

    #[test]
    fn test_connect_lines_skips_unaligned_pair() {
        let mut store = ShapeStore::new();
        let hit_test = HitTest::default();
        let line = store.create_line(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 100.0),
            ShapeDefaults::default(),
        );
        let c1 = store.create_point(10.0, 10.0);
        let c2 = store.create_point(90.0, 90.0);
        assert!(connect_lines(&mut store, &hit_test, &[line], &[c1, c2], 2.0).is_none());
    }

    #[test]
    fn test_drop_group_connects_and_undoes() {
        let mut editor = Editor::default();
        editor.new_project("Drop");
        let project = editor.project_mut().unwrap();
        project.options.snap_to_grid = false;
        project.options.try_to_connect = true;
        let layer = project.current_layer_id().unwrap();
        let line = project.store.create_line(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            ShapeDefaults::default(),
        );
        project.add_shapes(layer, &[line]).unwrap();
        let (group, _, _) = connector_group(&mut project.store);

        let dropped = editor.drop_group(group, Point2::new(10.0, -10.0)).unwrap();
        assert_ne!(dropped, group);
        let shapes = editor.layer_shapes();
        assert_eq!(shapes.len(), 3);
        assert!(!shapes.contains(&line));
        assert_eq!(shapes[2], dropped);
        assert_eq!(editor.selection(), &[dropped]);

        assert!(editor.undo());
        assert_eq!(editor.layer_shapes(), vec![line]);
    }
}
