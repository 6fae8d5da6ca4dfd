//! Pointer-driven drawing tools.
//!
//! The outer state is the active [`Tool`]; while it is [`Tool::Path`] the
//! inner [`PathTool`] picks the kind of the next segment. Shapes under
//! construction live in the page's working layer and only reach the
//! current layer, through history, once they are complete. Switching tools
//! always resets the previous one first, which discards any partial shape.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use core2d_core::{ImagePicker, PickedImage, Result};

use super::{Editor, Ticket};
use crate::commands::Edit;
use crate::events::EditorEvent;
use crate::geometry::{Point2, Rect2};
use crate::model::{
    PathFigure, PathGeometry, PathSegment, Shape, ShapeDefaults, ShapeId, ShapeKind,
    SweepDirection,
};
use crate::project::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    None,
    #[default]
    Selection,
    Point,
    Line,
    Arc,
    CubicBezier,
    QuadraticBezier,
    Path,
    Rectangle,
    Ellipse,
    Text,
    Image,
}

/// Segment kind added by the next clicks of the path tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PathTool {
    #[default]
    Line,
    Arc,
    CubicBezier,
    QuadraticBezier,
    /// Start a new figure at the next click.
    Move,
}

/// Progress of the active tool.
#[derive(Debug, Clone, Default)]
pub(crate) enum ToolState {
    #[default]
    Idle,
    /// Rubber-band selection; `frame` sits in the helper layer.
    Selecting { origin: Point2, frame: ShapeId },
    /// Dragging the selection. `originals` are the moved points as they
    /// were before the drag.
    Moving { last: Point2, originals: Vec<Shape> },
    /// Shape in the working layer. `order` lists its points in click order
    /// and the first `fixed` of them are placed.
    Drawing {
        shape: ShapeId,
        order: Vec<ShapeId>,
        fixed: usize,
    },
    /// Path in the working layer with the points of its last, unfinished
    /// segment in click order.
    Path {
        shape: ShapeId,
        pending: Vec<ShapeId>,
        fixed: usize,
    },
}

/// Click order of the points of a freshly created shape.
fn click_order(kind: &ShapeKind) -> Vec<ShapeId> {
    let points = kind.own_points();
    let order: &[usize] = match kind {
        ShapeKind::CubicBezier(_) => &[0, 3, 1, 2],
        ShapeKind::QuadraticBezier(_) => &[0, 2, 1],
        _ => &[0, 1, 2, 3],
    };
    order.iter().filter_map(|i| points.get(*i).copied()).collect()
}

impl Editor {
    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.reset();
        self.tool = tool;
        debug!("Tool changed to {:?}", tool);
        self.events.publish(EditorEvent::ToolChanged(tool));
    }

    pub fn path_tool(&self) -> PathTool {
        self.path_tool
    }

    /// Change the segment kind while the path tool is active. An unstarted
    /// segment of a path in progress is replaced by one of the new kind.
    pub fn set_path_tool(&mut self, path_tool: PathTool) -> bool {
        if self.tool != Tool::Path || path_tool == self.path_tool {
            return false;
        }
        self.path_tool = path_tool;
        let ToolState::Path {
            shape,
            pending,
            fixed: 0,
        } = &self.state
        else {
            return true;
        };
        let (shape, pending) = (*shape, pending.clone());
        if path_tool == PathTool::Move {
            return true;
        }
        let at = pending
            .first()
            .and_then(|p| self.project.as_ref()?.store.point(*p));
        if let Some(at) = at {
            self.pop_pending_segment(shape);
            let pending = self.start_segment(shape, at);
            self.state = ToolState::Path {
                shape,
                pending,
                fixed: 0,
            };
        }
        true
    }

    pub fn image_key(&self) -> Option<&str> {
        self.image_key.as_deref()
    }

    /// Key used by the image tool. It must name a cached image.
    pub fn set_image_key(&mut self, key: Option<String>) -> bool {
        match key {
            Some(key) => {
                let cached = self
                    .project
                    .as_ref()
                    .is_some_and(|p| p.images.get_image(&key).is_some());
                if cached {
                    self.image_key = Some(key);
                }
                cached
            }
            None => {
                self.image_key = None;
                true
            }
        }
    }

    /// Ask `picker` for an image, cache it and make it the image tool's key.
    pub async fn acquire_image(&mut self, picker: &dyn ImagePicker) -> bool {
        let Some(ticket) = self.begin_async() else {
            return false;
        };
        let picked = picker.pick_image().await;
        self.complete_image(ticket, picked)
    }

    pub fn complete_image(&mut self, ticket: Ticket, picked: Result<Option<PickedImage>>) -> bool {
        if !self.finish_async(ticket) {
            return false;
        }
        let image = match picked {
            Ok(Some(image)) => image,
            Ok(None) => return false,
            Err(e) => {
                error!("Failed to pick an image: {}", e);
                return false;
            }
        };
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let key = project.images.add_image(&image.name, image.bytes);
        debug!("Image '{}' cached as {}", image.name, key);
        self.image_key = Some(key);
        true
    }

    /// Whether a tool holds unfinished geometry.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, ToolState::Drawing { .. } | ToolState::Path { .. })
    }

    fn working_layer_mut(&mut self) -> Option<&mut Layer> {
        Some(&mut self.project.as_mut()?.current_page_mut()?.working_layer)
    }

    fn helper_layer_mut(&mut self) -> Option<&mut Layer> {
        Some(&mut self.project.as_mut()?.current_page_mut()?.helper_layer)
    }

    fn defaults(&self) -> ShapeDefaults {
        self.project
            .as_ref()
            .map(|p| p.options.shape_defaults())
            .unwrap_or_default()
    }

    fn set_point(&mut self, id: ShapeId, at: Point2) {
        if let Some(project) = self.project.as_mut() {
            project.store.set_point(id, at);
            project.store.mark_as_dirty(id);
        }
    }

    /// Abandon whatever the active tool was doing.
    pub fn reset(&mut self) {
        match std::mem::take(&mut self.state) {
            ToolState::Idle => {}
            ToolState::Selecting { frame, .. } => {
                if let Some(layer) = self.helper_layer_mut() {
                    layer.shapes.retain(|s| *s != frame);
                }
            }
            ToolState::Moving { originals, .. } => {
                if let Some(project) = self.project.as_mut() {
                    for shape in originals {
                        project.store.insert(shape);
                    }
                }
            }
            ToolState::Drawing { shape, .. } | ToolState::Path { shape, .. } => {
                debug!("Discarding unfinished shape {}", shape);
                if let Some(layer) = self.working_layer_mut() {
                    layer.shapes.retain(|s| *s != shape);
                }
            }
        }
    }

    pub fn left_down(&mut self, at: Point2) -> bool {
        if self.project.is_none() || self.current_layer_id().is_none() {
            return false;
        }
        match self.tool {
            Tool::None => false,
            Tool::Selection => self.selection_down(at),
            Tool::Point => self.add_point(at),
            Tool::Path => self.path_down(at),
            _ => self.drawing_down(at),
        }
    }

    pub fn left_up(&mut self, at: Point2) -> bool {
        match std::mem::take(&mut self.state) {
            ToolState::Selecting { origin, frame } => {
                if let Some(layer) = self.helper_layer_mut() {
                    layer.shapes.retain(|s| *s != frame);
                }
                self.select_in_rect(Rect2::from_points(origin, at));
                true
            }
            ToolState::Moving { originals, .. } => self.finish_move(originals),
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Finish a path, cancel anything else.
    pub fn right_down(&mut self, _at: Point2) -> bool {
        match &self.state {
            ToolState::Idle => false,
            ToolState::Path { shape, .. } => {
                let shape = *shape;
                self.finish_path(shape)
            }
            _ => {
                self.reset();
                true
            }
        }
    }

    pub fn move_pointer(&mut self, at: Point2) -> bool {
        match &self.state {
            ToolState::Idle => false,
            ToolState::Selecting { frame, .. } => {
                let frame = *frame;
                let corner = self
                    .project
                    .as_ref()
                    .and_then(|p| p.store.get(frame))
                    .and_then(|s| s.kind.own_points().get(1).copied());
                if let Some(corner) = corner {
                    self.set_point(corner, at);
                }
                true
            }
            ToolState::Moving { last, .. } => {
                let last = *last;
                let snapped = self.snapped(at);
                let (dx, dy) = (snapped.x - last.x, snapped.y - last.y);
                if dx == 0.0 && dy == 0.0 {
                    return false;
                }
                let ids: Vec<ShapeId> = match &self.state {
                    ToolState::Moving { originals, .. } => originals.iter().map(|s| s.id).collect(),
                    _ => Vec::new(),
                };
                for id in ids {
                    let moved = self
                        .project
                        .as_ref()
                        .and_then(|p| p.store.point(id))
                        .map(|p| p.translated(dx, dy));
                    if let Some(moved) = moved {
                        self.set_point(id, moved);
                    }
                }
                if let ToolState::Moving { last, .. } = &mut self.state {
                    *last = snapped;
                }
                true
            }
            ToolState::Drawing { order, fixed, .. } => {
                let rest = order[*fixed..].to_vec();
                let at = self.snapped(at);
                for id in rest {
                    self.set_point(id, at);
                }
                true
            }
            ToolState::Path {
                shape,
                pending,
                fixed,
            } => {
                let (shape, rest) = (*shape, pending[*fixed..].to_vec());
                let at = self.snapped(at);
                for id in rest {
                    self.set_point(id, at);
                }
                self.update_arc_size(shape);
                true
            }
        }
    }

    fn selection_down(&mut self, at: Point2) -> bool {
        if let Some(hit) = self.shape_at(at) {
            if !self.is_selected(hit) {
                self.select(&[hit]);
            }
            let targets = self.drag_targets(&self.editable_selection());
            let Some(project) = &self.project else {
                return false;
            };
            let originals = targets
                .iter()
                .filter_map(|id| project.store.get(*id).cloned())
                .collect();
            self.state = ToolState::Moving {
                last: self.snapped(at),
                originals,
            };
            return true;
        }

        self.deselect();
        let defaults = ShapeDefaults {
            style: None,
            is_stroked: true,
            is_filled: false,
        };
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let frame = project.store.create_rectangle(at, at, defaults);
        if let Some(layer) = self.helper_layer_mut() {
            layer.shapes.push(frame);
        }
        self.state = ToolState::Selecting { origin: at, frame };
        true
    }

    /// Record a finished drag. The points are already in place.
    fn finish_move(&mut self, originals: Vec<Shape>) -> bool {
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let edits: Vec<Edit> = originals
            .into_iter()
            .filter_map(|old| {
                let new = project.store.get(old.id)?.clone();
                Edit::shape(old, new)
            })
            .collect();
        if edits.is_empty() {
            return false;
        }
        project.record("Move", edits);
        self.notify_history();
        true
    }

    fn add_point(&mut self, at: Point2) -> bool {
        let at = self.snapped(at);
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let id = project.store.create_point(at.x, at.y);
        self.add_finished(id, "Add Point")
    }

    /// Append a finished shape to the current layer.
    fn add_finished(&mut self, id: ShapeId, name: &str) -> bool {
        let Some(layer) = self.current_layer_id() else {
            return false;
        };
        let Some(project) = &self.project else {
            return false;
        };
        let Some(mut shapes) = project.layer(layer).map(|l| l.shapes.clone()) else {
            return false;
        };
        shapes.push(id);
        let edits = project.layer_shapes_edit(layer, shapes).into_iter().collect();
        self.commit(name, edits)
    }

    fn drawing_down(&mut self, at: Point2) -> bool {
        let at = self.snapped(at);
        if let ToolState::Drawing { order, fixed, .. } = &mut self.state {
            let rest = order[*fixed..].to_vec();
            *fixed += 1;
            let done = *fixed >= order.len();
            for id in rest {
                self.set_point(id, at);
            }
            if done {
                return self.finish_drawing(at);
            }
            return true;
        }

        let defaults = self.defaults();
        let connect_to = match self.tool {
            Tool::Line if self.try_to_connect() => self.point_at(at),
            _ => None,
        };
        let image_key = self.image_key.clone();
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let store = &mut project.store;
        let shape = match self.tool {
            Tool::Line => match connect_to {
                Some(start) => {
                    let end = store.create_point(at.x, at.y);
                    store.create_line_between(start, end, defaults)
                }
                None => store.create_line(at, at, defaults),
            },
            Tool::Arc => store.create_arc([at; 4], defaults),
            Tool::CubicBezier => store.create_cubic_bezier([at; 4], defaults),
            Tool::QuadraticBezier => store.create_quadratic_bezier([at; 3], defaults),
            Tool::Rectangle => store.create_rectangle(at, at, defaults),
            Tool::Ellipse => store.create_ellipse(at, at, defaults),
            Tool::Text => store.create_text(at, at, "Text", defaults),
            Tool::Image => match image_key {
                Some(key) => store.create_image(at, at, &key, defaults),
                None => {
                    debug!("Image tool has no image");
                    return false;
                }
            },
            Tool::None | Tool::Selection | Tool::Point | Tool::Path => return false,
        };
        let order = store
            .get(shape)
            .map(|s| click_order(&s.kind))
            .unwrap_or_default();
        if let Some(layer) = self.working_layer_mut() {
            layer.shapes.push(shape);
        }
        self.state = ToolState::Drawing {
            shape,
            order,
            fixed: 1,
        };
        true
    }

    fn try_to_connect(&self) -> bool {
        self.project
            .as_ref()
            .is_some_and(|p| p.options.try_to_connect)
    }

    fn finish_drawing(&mut self, at: Point2) -> bool {
        let ToolState::Drawing { shape, order, .. } = std::mem::take(&mut self.state) else {
            return false;
        };
        if let Some(layer) = self.working_layer_mut() {
            layer.shapes.retain(|s| *s != shape);
        }
        if self.tool == Tool::Line && self.try_to_connect() {
            if let (Some(end), Some(existing)) = (order.last().copied(), self.point_at(at)) {
                if let Some(line) = self.project.as_mut().and_then(|p| p.store.get_mut(shape)) {
                    line.kind.replace_point(end, existing);
                }
            }
        }
        let name = format!("Add {:?}", self.tool);
        self.add_finished(shape, &name)
    }

    fn path_down(&mut self, at: Point2) -> bool {
        let at = self.snapped(at);
        let (shape, pending, fixed) = match &self.state {
            ToolState::Path {
                shape,
                pending,
                fixed,
            } => (*shape, pending.clone(), *fixed),
            _ => return self.start_path(at),
        };

        if self.path_tool == PathTool::Move {
            self.pop_pending_segment(shape);
            self.path_tool = PathTool::Line;
            self.start_figure(shape, at);
            let pending = self.start_segment(shape, at);
            self.state = ToolState::Path {
                shape,
                pending,
                fixed: 0,
            };
            return true;
        }

        for id in &pending[fixed..] {
            self.set_point(*id, at);
        }
        self.update_arc_size(shape);
        let fixed = fixed + 1;
        let pending = if fixed >= pending.len() {
            self.start_segment(shape, at)
        } else {
            pending
        };
        let fixed = if fixed >= pending.len() { 0 } else { fixed };
        self.state = ToolState::Path {
            shape,
            pending,
            fixed,
        };
        true
    }

    fn start_path(&mut self, at: Point2) -> bool {
        let defaults = self.defaults();
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let geometry = PathGeometry {
            fill_rule: project.options.default_fill_rule,
            figures: Vec::new(),
        };
        let shape = project.store.create_path(geometry, defaults);
        if let Some(layer) = self.working_layer_mut() {
            layer.shapes.push(shape);
        }
        if self.path_tool == PathTool::Move {
            self.path_tool = PathTool::Line;
        }
        self.start_figure(shape, at);
        let pending = self.start_segment(shape, at);
        self.state = ToolState::Path {
            shape,
            pending,
            fixed: 0,
        };
        true
    }

    fn path_geometry_mut(&mut self, shape: ShapeId) -> Option<&mut PathGeometry> {
        let shape = self.project.as_mut()?.store.get_mut(shape)?;
        match &mut shape.kind {
            ShapeKind::Path(path) => Some(&mut path.geometry),
            _ => None,
        }
    }

    fn start_figure(&mut self, shape: ShapeId, at: Point2) {
        let Some(project) = self.project.as_mut() else {
            return;
        };
        let start_point = project.store.create_point(at.x, at.y);
        let is_filled = project.options.default_is_filled;
        let is_closed = project.options.default_is_closed;
        if let Some(geometry) = self.path_geometry_mut(shape) {
            geometry.figures.push(PathFigure {
                start_point,
                segments: Vec::new(),
                is_filled,
                is_closed,
            });
        }
    }

    /// Append a segment of the current path tool with every point at `at`.
    /// Returns its points in click order: the end point first.
    fn start_segment(&mut self, shape: ShapeId, at: Point2) -> Vec<ShapeId> {
        let Some(project) = self.project.as_mut() else {
            return Vec::new();
        };
        let mut point = || project.store.create_point(at.x, at.y);
        let (segment, order) = match self.path_tool {
            PathTool::Line | PathTool::Move => {
                let p = point();
                (PathSegment::Line { point: p }, vec![p])
            }
            PathTool::Arc => {
                let p = point();
                let segment = PathSegment::Arc {
                    point: p,
                    width: 0.0,
                    height: 0.0,
                    rotation_angle: 0.0,
                    is_large_arc: false,
                    sweep_direction: SweepDirection::Clockwise,
                };
                (segment, vec![p])
            }
            PathTool::CubicBezier => {
                let (c1, c2, end) = (point(), point(), point());
                let segment = PathSegment::CubicBezier {
                    point1: c1,
                    point2: c2,
                    point3: end,
                };
                (segment, vec![end, c1, c2])
            }
            PathTool::QuadraticBezier => {
                let (control, end) = (point(), point());
                let segment = PathSegment::QuadraticBezier {
                    point1: control,
                    point2: end,
                };
                (segment, vec![end, control])
            }
        };
        if let Some(figure) = self
            .path_geometry_mut(shape)
            .and_then(|g| g.figures.last_mut())
        {
            figure.segments.push(segment);
        }
        order
    }

    fn pop_pending_segment(&mut self, shape: ShapeId) {
        if let Some(figure) = self
            .path_geometry_mut(shape)
            .and_then(|g| g.figures.last_mut())
        {
            figure.segments.pop();
        }
    }

    /// Size a trailing arc segment as a half circle over its chord.
    fn update_arc_size(&mut self, shape: ShapeId) {
        let Some(project) = self.project.as_mut() else {
            return;
        };
        let store = &mut project.store;
        let Some(ShapeKind::Path(path)) = store.get(shape).map(|s| &s.kind) else {
            return;
        };
        let Some(figure) = path.geometry.figures.last() else {
            return;
        };
        let Some(PathSegment::Arc { point, .. }) = figure.segments.last() else {
            return;
        };
        let start = match figure.segments.len() {
            0 | 1 => figure.start_point,
            n => figure.segments[n - 2].end_point(),
        };
        let (Some(a), Some(b)) = (store.point(start), store.point(*point)) else {
            return;
        };
        let radius = a.distance_to(b) / 2.0;
        if let Some(ShapeKind::Path(path)) = store.get_mut(shape).map(|s| &mut s.kind) {
            if let Some(PathSegment::Arc { width, height, .. }) = path
                .geometry
                .figures
                .last_mut()
                .and_then(|f| f.segments.last_mut())
            {
                *width = radius;
                *height = radius;
            }
        }
    }

    /// Drop the unfinished segment and commit the path if anything is left.
    fn finish_path(&mut self, shape: ShapeId) -> bool {
        self.state = ToolState::Idle;
        self.pop_pending_segment(shape);
        if let Some(layer) = self.working_layer_mut() {
            layer.shapes.retain(|s| *s != shape);
        }
        let has_segments = match self.path_geometry_mut(shape) {
            Some(geometry) => {
                geometry.figures.retain(|f| !f.segments.is_empty());
                !geometry.figures.is_empty()
            }
            None => false,
        };
        if !has_segments {
            debug!("Discarding empty path");
            return false;
        }
        self.add_finished(shape, "Add Path")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeKindTag;

    fn editor() -> Editor {
        let mut editor = Editor::default();
        editor.new_project("Tools");
        editor.project_mut().unwrap().options.snap_to_grid = false;
        editor
    }

    fn working(editor: &Editor) -> Vec<ShapeId> {
        editor
            .project()
            .unwrap()
            .current_page()
            .unwrap()
            .working_layer
            .shapes
            .clone()
    }

    fn click(editor: &mut Editor, x: f64, y: f64) {
        let at = Point2::new(x, y);
        editor.move_pointer(at);
        editor.left_down(at);
        editor.left_up(at);
    }

    #[test]
    fn test_line_tool_two_clicks() {
        let mut editor = editor();
        editor.set_tool(Tool::Line);
        click(&mut editor, 0.0, 0.0);
        assert_eq!(working(&editor).len(), 1);
        editor.move_pointer(Point2::new(40.0, 10.0));
        click(&mut editor, 50.0, 10.0);
        assert!(working(&editor).is_empty());
        let shapes = editor.layer_shapes();
        assert_eq!(shapes.len(), 1);
        let store = &editor.project().unwrap().store;
        let bounds = store.bounds(shapes[0]).unwrap();
        assert_eq!(bounds, Rect2::new(0.0, 0.0, 50.0, 10.0));
        assert!(editor.can_undo());
    }

    #[test]
    fn test_switching_tool_discards_partial_shape() {
        let mut editor = editor();
        editor.set_tool(Tool::Rectangle);
        click(&mut editor, 0.0, 0.0);
        assert!(editor.is_drawing());
        editor.set_tool(Tool::Ellipse);
        assert!(!editor.is_drawing());
        assert!(working(&editor).is_empty());
        assert!(editor.layer_shapes().is_empty());
    }

    #[test]
    fn test_cubic_needs_four_clicks() {
        let mut editor = editor();
        editor.set_tool(Tool::CubicBezier);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 30.0, 0.0);
        click(&mut editor, 10.0, 10.0);
        assert!(editor.layer_shapes().is_empty());
        click(&mut editor, 20.0, 10.0);
        let shapes = editor.layer_shapes();
        assert_eq!(shapes.len(), 1);
        let project = editor.project().unwrap();
        let points = project.store.get(shapes[0]).unwrap().kind.own_points();
        let end = project.store.point(points[3]).unwrap();
        assert_eq!(end, Point2::new(30.0, 0.0));
    }

    #[test]
    fn test_image_tool_requires_key() {
        let mut editor = editor();
        editor.set_tool(Tool::Image);
        assert!(!editor.left_down(Point2::new(0.0, 0.0)));
        assert!(!editor.set_image_key(Some("missing.png".into())));
        let key = editor
            .project_mut()
            .unwrap()
            .images
            .add_image("a.png", vec![1, 2, 3]);
        assert!(editor.set_image_key(Some(key)));
        assert!(editor.left_down(Point2::new(0.0, 0.0)));
    }

    #[test]
    fn test_line_tool_reuses_points() {
        let mut editor = editor();
        editor.project_mut().unwrap().options.try_to_connect = true;
        editor.set_tool(Tool::Line);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 50.0, 0.0);
        click(&mut editor, 50.0, 1.0);
        click(&mut editor, 50.0, 50.0);
        let shapes = editor.layer_shapes();
        let store = &editor.project().unwrap().store;
        let first = store.get(shapes[0]).unwrap().kind.own_points();
        let second = store.get(shapes[1]).unwrap().kind.own_points();
        assert_eq!(first[1], second[0]);
    }

    #[test]
    fn test_path_tool_builds_segments() {
        let mut editor = editor();
        editor.set_tool(Tool::Path);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 10.0, 0.0);
        assert!(editor.set_path_tool(PathTool::QuadraticBezier));
        click(&mut editor, 20.0, 0.0);
        click(&mut editor, 15.0, 10.0);
        assert!(editor.right_down(Point2::new(15.0, 10.0)));
        let shapes = editor.layer_shapes();
        assert_eq!(shapes.len(), 1);
        let shape = editor.project().unwrap().store.get(shapes[0]).unwrap();
        assert_eq!(shape.tag(), ShapeKindTag::Path);
        match &shape.kind {
            ShapeKind::Path(path) => {
                assert_eq!(path.geometry.figures.len(), 1);
                assert_eq!(path.geometry.figures[0].segments.len(), 2);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_path_tool_is_only_set_inside_path_tool() {
        let mut editor = editor();
        editor.set_tool(Tool::Line);
        assert!(!editor.set_path_tool(PathTool::CubicBezier));
        assert_eq!(editor.path_tool(), PathTool::Line);
        editor.set_tool(Tool::Path);
        assert!(editor.set_path_tool(PathTool::CubicBezier));
        assert!(!editor.set_path_tool(PathTool::CubicBezier));
        assert_eq!(editor.path_tool(), PathTool::CubicBezier);
    }

    #[test]
    fn test_drag_moves_selection_as_one_step() {
        let mut editor = editor();
        editor.set_tool(Tool::Rectangle);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 10.0, 10.0);
        editor.set_tool(Tool::Selection);
        let id = editor.layer_shapes()[0];

        editor.left_down(Point2::new(0.0, 5.0));
        editor.move_pointer(Point2::new(10.0, 5.0));
        editor.move_pointer(Point2::new(20.0, 15.0));
        assert!(editor.left_up(Point2::new(20.0, 15.0)));
        let bounds = editor.project().unwrap().store.bounds(id).unwrap();
        assert_eq!(bounds, Rect2::new(20.0, 10.0, 10.0, 10.0));

        assert!(editor.undo());
        let bounds = editor.project().unwrap().store.bounds(id).unwrap();
        assert_eq!(bounds, Rect2::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_rubber_band_selects() {
        let mut editor = editor();
        editor.set_tool(Tool::Ellipse);
        click(&mut editor, 10.0, 10.0);
        click(&mut editor, 20.0, 20.0);
        editor.set_tool(Tool::Selection);
        editor.left_down(Point2::new(100.0, 100.0));
        editor.move_pointer(Point2::new(5.0, 5.0));
        assert!(editor.left_up(Point2::new(5.0, 5.0)));
        assert_eq!(editor.selection().len(), 1);
        let helper = &editor.project().unwrap().current_page().unwrap().helper_layer;
        assert!(helper.shapes.is_empty());
    }
}
