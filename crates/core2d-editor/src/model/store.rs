use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Shape, ShapeId, ShapeKind, StyleId};
use crate::geometry::{Point2, Rect2};
use crate::style::ShapeStyle;

/// Arena owning every shape and style of a project.
///
/// Containers, groups and geometry refer to entries by id. Entries are never
/// dropped while history may still reference them; [`retain_reachable`]
/// compacts the arena when history is reset.
///
/// [`retain_reachable`]: ShapeStore::retain_reachable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StoreRepr", into = "StoreRepr")]
pub struct ShapeStore {
    shapes: HashMap<ShapeId, Shape>,
    styles: HashMap<StyleId, ShapeStyle>,
    next_id: u64,
}

#[derive(Serialize, Deserialize)]
struct StoreRepr {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    styles: Vec<ShapeStyle>,
    #[serde(default)]
    shapes: Vec<Shape>,
}

impl From<StoreRepr> for ShapeStore {
    fn from(repr: StoreRepr) -> Self {
        let max_id = repr
            .shapes
            .iter()
            .map(|s| s.id.0)
            .chain(repr.styles.iter().map(|s| s.id.0))
            .max()
            .unwrap_or(0);
        Self {
            next_id: repr.next_id.max(max_id + 1),
            styles: repr.styles.into_iter().map(|s| (s.id, s)).collect(),
            shapes: repr.shapes.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

impl From<ShapeStore> for StoreRepr {
    fn from(store: ShapeStore) -> Self {
        let mut shapes: Vec<Shape> = store.shapes.into_values().collect();
        shapes.sort_by_key(|s| s.id);
        let mut styles: Vec<ShapeStyle> = store.styles.into_values().collect();
        styles.sort_by_key(|s| s.id);
        Self {
            next_id: store.next_id,
            styles,
            shapes,
        }
    }
}

/// Tracks points already moved during one move operation so shared points
/// move exactly once.
#[derive(Debug, Default)]
struct MoveContext {
    moved: HashSet<ShapeId>,
    order: Vec<ShapeId>,
}

impl MoveContext {
    fn add(&mut self, id: ShapeId) {
        if self.moved.insert(id) {
            self.order.push(id);
        }
    }
}

impl ShapeStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Fresh id shared by shapes and styles.
    pub fn generate_id(&mut self) -> u64 {
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        let shape = self.shapes.get_mut(&id)?;
        shape.mark_as_dirty();
        Some(shape)
    }

    /// Insert a shape under its own id, replacing any previous value.
    pub fn insert(&mut self, mut shape: Shape) -> ShapeId {
        let id = shape.id;
        self.next_id = self.next_id.max(id.0 + 1);
        shape.mark_as_dirty();
        self.shapes.insert(id, shape);
        id
    }

    /// Create and insert a shape of `kind` with a fresh id.
    pub fn add(&mut self, kind: ShapeKind) -> ShapeId {
        let id = ShapeId(self.generate_id());
        self.insert(Shape::new(id, kind))
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.remove(&id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn style(&self, id: StyleId) -> Option<&ShapeStyle> {
        self.styles.get(&id)
    }

    pub fn style_mut(&mut self, id: StyleId) -> Option<&mut ShapeStyle> {
        let style = self.styles.get_mut(&id)?;
        style.mark_as_dirty();
        Some(style)
    }

    pub fn insert_style(&mut self, mut style: ShapeStyle) -> StyleId {
        let id = style.id;
        self.next_id = self.next_id.max(id.0 + 1);
        style.mark_as_dirty();
        self.styles.insert(id, style);
        id
    }

    pub fn styles(&self) -> impl Iterator<Item = &ShapeStyle> {
        self.styles.values()
    }

    /// Style of a shape, if it has one.
    pub fn style_of(&self, id: ShapeId) -> Option<&ShapeStyle> {
        self.get(id)?.style.and_then(|s| self.style(s))
    }

    /// Position of a point shape.
    pub fn point(&self, id: ShapeId) -> Option<Point2> {
        self.get(id)?.point()
    }

    /// Positions of several point shapes, `None` if any is missing.
    pub fn points_at(&self, ids: &[ShapeId]) -> Option<Vec<Point2>> {
        ids.iter().map(|id| self.point(*id)).collect()
    }

    /// All geometry points of a shape, groups included, without duplicates.
    pub fn get_points(&self, id: ShapeId) -> Vec<ShapeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_points(id, &mut out, &mut seen);
        out
    }

    fn collect_points(&self, id: ShapeId, out: &mut Vec<ShapeId>, seen: &mut HashSet<ShapeId>) {
        let Some(shape) = self.get(id) else {
            return;
        };
        match &shape.kind {
            ShapeKind::Point(_) => {
                if seen.insert(id) {
                    out.push(id);
                }
            }
            ShapeKind::Group(group) => {
                for connector in &group.connectors {
                    self.collect_points(*connector, out, seen);
                }
                for child in &group.shapes {
                    self.collect_points(*child, out, seen);
                }
            }
            kind => {
                for point in kind.own_points() {
                    if seen.insert(point) {
                        out.push(point);
                    }
                }
            }
        }
    }

    /// Post-order flattening of `ids`: group children come before the group.
    pub fn all_shapes<'a>(&'a self, ids: &'a [ShapeId]) -> AllShapes<'a> {
        AllShapes {
            store: self,
            stack: vec![Frame {
                ids,
                next: 0,
                group: None,
            }],
        }
    }

    /// Bounding box of a shape's geometry.
    pub fn bounds(&self, id: ShapeId) -> Option<Rect2> {
        let shape = self.get(id)?;
        match &shape.kind {
            ShapeKind::Point(p) => Some(Rect2::new(p.x, p.y, 0.0, 0.0)),
            ShapeKind::Arc(arc) => {
                // The ellipse rectangle, not the direction points.
                Some(Rect2::from_points(self.point(arc.point1)?, self.point(arc.point2)?))
            }
            ShapeKind::Group(group) => group
                .shapes
                .iter()
                .chain(group.connectors.iter())
                .filter_map(|child| self.bounds(*child))
                .reduce(|a, b| a.union(&b)),
            kind => Rect2::bounding(kind.own_points().iter().filter_map(|p| self.point(*p))),
        }
    }

    /// Union of the bounds of several shapes.
    pub fn bounds_of(&self, ids: &[ShapeId]) -> Option<Rect2> {
        ids.iter()
            .filter_map(|id| self.bounds(*id))
            .reduce(|a, b| a.union(&b))
    }

    /// Points a move of `ids` has to translate.
    ///
    /// Owned points flagged as connectors stay put, except a group's own
    /// connectors which move with the group. A point reached through
    /// several shapes is listed once.
    pub fn move_targets(&self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let mut ctx = MoveContext::default();
        for id in ids {
            self.collect_move_targets(*id, &mut ctx);
        }
        ctx.order
    }

    fn collect_move_targets(&self, id: ShapeId, ctx: &mut MoveContext) {
        let Some(shape) = self.get(id) else {
            return;
        };
        match &shape.kind {
            ShapeKind::Point(_) => ctx.add(id),
            ShapeKind::Group(group) => {
                for child in &group.shapes {
                    if self.get(*child).is_some_and(|c| !c.is_connector()) {
                        self.collect_move_targets(*child, ctx);
                    }
                }
                for connector in &group.connectors {
                    ctx.add(*connector);
                }
            }
            kind => {
                for point in kind.own_points() {
                    if self.get(point).is_some_and(|p| !p.is_connector()) {
                        ctx.add(point);
                    }
                }
            }
        }
    }

    /// New states of the points moved by translating `ids` by `(dx, dy)`,
    /// leaving the store untouched.
    pub fn moved_points(&self, ids: &[ShapeId], dx: f64, dy: f64) -> Vec<Shape> {
        self.move_targets(ids)
            .into_iter()
            .filter_map(|id| {
                let mut shape = self.get(id)?.clone();
                if let ShapeKind::Point(p) = &mut shape.kind {
                    let moved = Point2::new(p.x, p.y).translated(dx, dy);
                    p.x = moved.x;
                    p.y = moved.y;
                }
                shape.mark_as_dirty();
                Some(shape)
            })
            .collect()
    }

    /// Translate `ids` in place.
    pub fn move_shapes(&mut self, ids: &[ShapeId], dx: f64, dy: f64) {
        for shape in self.moved_points(ids, dx, dy) {
            self.insert(shape);
        }
    }

    /// Set a point's position, returning the previous value.
    pub fn set_point(&mut self, id: ShapeId, position: Point2) -> Option<Point2> {
        let shape = self.get_mut(id)?;
        match &mut shape.kind {
            ShapeKind::Point(p) => {
                let old = Point2::new(p.x, p.y);
                p.x = position.x;
                p.y = position.y;
                Some(old)
            }
            _ => None,
        }
    }

    /// Whether the shape, its style or anything it references changed since
    /// the last [`invalidate`](ShapeStore::invalidate).
    pub fn is_dirty(&self, id: ShapeId) -> bool {
        let Some(shape) = self.get(id) else {
            return false;
        };
        shape.is_self_dirty()
            || shape
                .style
                .and_then(|s| self.style(s))
                .is_some_and(ShapeStyle::is_dirty)
            || shape.kind.children().into_iter().any(|c| self.is_dirty(c))
    }

    /// Clear dirty flags bottom-up.
    pub fn invalidate(&mut self, id: ShapeId) {
        let Some(shape) = self.shapes.get(&id) else {
            return;
        };
        let children = shape.kind.children();
        let style = shape.style;
        for child in children {
            self.invalidate(child);
        }
        if let Some(style) = style.and_then(|s| self.styles.get_mut(&s)) {
            style.invalidate();
        }
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.clear_dirty();
        }
    }

    pub fn mark_as_dirty(&mut self, id: ShapeId) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.mark_as_dirty();
        }
    }

    /// Every shape id reachable from `roots` (roots included).
    pub fn reachable(&self, roots: impl IntoIterator<Item = ShapeId>) -> HashSet<ShapeId> {
        let mut seen = HashSet::new();
        let mut stack: Vec<ShapeId> = roots.into_iter().collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(shape) = self.get(id) {
                stack.extend(shape.kind.children());
            }
        }
        seen
    }

    /// Drop shapes not reachable from `roots` and styles used by neither a
    /// remaining shape nor `keep_styles`.
    pub fn retain_reachable(
        &mut self,
        roots: impl IntoIterator<Item = ShapeId>,
        keep_styles: impl IntoIterator<Item = StyleId>,
    ) -> usize {
        let live = self.reachable(roots);
        let before = self.shapes.len() + self.styles.len();
        self.shapes.retain(|id, _| live.contains(id));
        let mut used: HashSet<StyleId> = keep_styles.into_iter().collect();
        used.extend(self.shapes.values().filter_map(|s| s.style));
        self.styles.retain(|id, _| used.contains(id));
        before - self.shapes.len() - self.styles.len()
    }
}

struct Frame<'a> {
    ids: &'a [ShapeId],
    next: usize,
    group: Option<&'a Shape>,
}

/// Lazy post-order walk over a shape sequence, see
/// [`ShapeStore::all_shapes`]. Clone it to restart from the same position.
pub struct AllShapes<'a> {
    store: &'a ShapeStore,
    stack: Vec<Frame<'a>>,
}

impl Clone for AllShapes<'_> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            stack: self
                .stack
                .iter()
                .map(|f| Frame {
                    ids: f.ids,
                    next: f.next,
                    group: f.group,
                })
                .collect(),
        }
    }
}

impl<'a> Iterator for AllShapes<'a> {
    type Item = &'a Shape;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.next < frame.ids.len() {
                let id = frame.ids[frame.next];
                frame.next += 1;
                let Some(shape) = self.store.get(id) else {
                    continue;
                };
                if let ShapeKind::Group(group) = &shape.kind {
                    self.stack.push(Frame {
                        ids: &group.shapes,
                        next: 0,
                        group: Some(shape),
                    });
                    continue;
                }
                return Some(shape);
            }
            let finished = self.stack.pop()?;
            if let Some(group) = finished.group {
                return Some(group);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupShape, LineShape, PointShape, ShapeState};

    fn point(store: &mut ShapeStore, x: f64, y: f64) -> ShapeId {
        store.add(ShapeKind::Point(PointShape { x, y }))
    }

    fn line(store: &mut ShapeStore, start: ShapeId, end: ShapeId) -> ShapeId {
        store.add(ShapeKind::Line(LineShape { start, end }))
    }

    #[test]
    fn test_shared_point_moves_once() {
        let mut store = ShapeStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let shared = point(&mut store, 10.0, 0.0);
        let c = point(&mut store, 20.0, 0.0);
        let l1 = line(&mut store, a, shared);
        let l2 = line(&mut store, shared, c);

        store.move_shapes(&[l1, l2], 5.0, 1.0);

        assert_eq!(store.point(shared), Some(Point2::new(15.0, 1.0)));
        assert_eq!(store.point(a), Some(Point2::new(5.0, 1.0)));
        assert_eq!(store.point(c), Some(Point2::new(25.0, 1.0)));
    }

    #[test]
    fn test_connector_endpoint_not_moved_by_line() {
        let mut store = ShapeStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 10.0, 0.0);
        store.get_mut(b).unwrap().state |= ShapeState::CONNECTOR;
        let l = line(&mut store, a, b);

        store.move_shapes(&[l], 3.0, 0.0);

        assert_eq!(store.point(a), Some(Point2::new(3.0, 0.0)));
        assert_eq!(store.point(b), Some(Point2::new(10.0, 0.0)));
    }

    #[test]
    fn test_group_moves_its_connectors() {
        let mut store = ShapeStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 10.0, 0.0);
        store.get_mut(b).unwrap().state |= ShapeState::CONNECTOR;
        let l = line(&mut store, a, b);
        let g = store.add(ShapeKind::Group(GroupShape {
            shapes: vec![l],
            connectors: vec![b],
        }));

        assert_eq!(store.move_targets(&[g]), vec![a, b]);
        store.move_shapes(&[g], 1.0, 1.0);
        assert_eq!(store.point(b), Some(Point2::new(11.0, 1.0)));
    }

    #[test]
    fn test_all_shapes_is_post_order() {
        let mut store = ShapeStore::new();
        let p1 = point(&mut store, 0.0, 0.0);
        let p2 = point(&mut store, 1.0, 1.0);
        let inner = store.add(ShapeKind::Group(GroupShape {
            shapes: vec![p2],
            connectors: vec![],
        }));
        let outer = store.add(ShapeKind::Group(GroupShape {
            shapes: vec![p1, inner],
            connectors: vec![],
        }));
        let roots = vec![outer];

        let walk = store.all_shapes(&roots);
        let order: Vec<ShapeId> = walk.clone().map(|s| s.id).collect();
        assert_eq!(order, vec![p1, p2, inner, outer]);

        let again: Vec<ShapeId> = walk.map(|s| s.id).collect();
        assert_eq!(again, order);
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let mut store = ShapeStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 1.0, 0.0);
        let l = line(&mut store, a, b);
        assert!(store.is_dirty(l));

        store.invalidate(l);
        assert!(!store.is_dirty(l));
        store.invalidate(l);
        assert!(!store.is_dirty(l));

        store.set_point(b, Point2::new(2.0, 0.0));
        assert!(store.is_dirty(l));
    }

    #[test]
    fn test_round_trip_keeps_next_id() {
        let mut store = ShapeStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let json = serde_json::to_string(&store).unwrap();
        let mut back: ShapeStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.point(a), Some(Point2::new(0.0, 0.0)));
        assert!(back.generate_id() > a.0);
    }

    #[test]
    fn test_retain_reachable() {
        let mut store = ShapeStore::new();
        let a = point(&mut store, 0.0, 0.0);
        let b = point(&mut store, 1.0, 0.0);
        let l = line(&mut store, a, b);
        let orphan = point(&mut store, 5.0, 5.0);

        let removed = store.retain_reachable([l], []);
        assert_eq!(removed, 1);
        assert!(!store.contains(orphan));
        assert!(store.contains(a));
    }
}
