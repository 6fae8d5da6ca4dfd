//! Editing session.
//!
//! [`Editor`] is the context every command runs against: the open project,
//! the shape selection, the active tool and the view. Commands are grouped
//! into submodules:
//! - `file_io`: new, open, save, close
//! - `selection`: selection by point and rectangle
//! - `shapes`: delete, clipboard, duplicate, group and ungroup
//! - `transforms`: move, nudge, z-order and layout
//! - `connect`: line splitting and group drops
//! - `paths`: path conversions and boolean operations
//! - `data`: databases, records, styles and text binding
//! - `tools`: the pointer-driven tool state machine
//!
//! Commands never panic on bad input. Unmet preconditions return `false`
//! (or `None`), failures from collaborators are logged with `error!` and
//! leave the session unchanged.

mod connect;
mod data;
mod file_io;
mod paths;
mod selection;
mod shapes;
mod tools;
mod transforms;

pub use paths::PathConversion;
pub use tools::{PathTool, Tool};
pub use transforms::{Alignment, Axis, Nudge};

use tokio::sync::broadcast;
use tracing::{debug, error};

use core2d_settings::Config;

use crate::commands::Edit;
use crate::events::{EditorEvent, EventDispatcher};
use crate::geometry::Point2;
use crate::hit_test::HitTest;
use crate::model::{LayerId, ShapeId};
use crate::project::{Project, Selected};
use crate::viewport::Viewport;

use tools::ToolState;

/// Handle for the single in-flight async command.
///
/// A ticket is only honoured while it is the pending one and the project
/// it was issued for is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    generation: u64,
}

pub struct Editor {
    project: Option<Project>,
    pub config: Config,
    pub hit_test: HitTest,
    pub viewport: Viewport,
    selection: Vec<ShapeId>,
    tool: Tool,
    path_tool: PathTool,
    state: ToolState,
    image_key: Option<String>,
    events: EventDispatcher,
    generation: u64,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Editor {
    pub fn new(config: Config) -> Self {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(config.canvas.min_zoom, config.canvas.max_zoom);
        Self {
            project: None,
            config,
            hit_test: HitTest::default(),
            viewport,
            selection: Vec::new(),
            tool: Tool::Selection,
            path_tool: PathTool::Line,
            state: ToolState::Idle,
            image_key: None,
            events: EventDispatcher::default(),
            generation: 0,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Direct access for callers that manage history themselves.
    pub fn project_mut(&mut self) -> Option<&mut Project> {
        self.project.as_mut()
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    /// Incremented every time a project is opened or closed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    pub(crate) fn current_layer_id(&self) -> Option<LayerId> {
        self.project.as_ref()?.current_layer_id()
    }

    /// Shapes of the current layer, bottom to top.
    pub(crate) fn layer_shapes(&self) -> Vec<ShapeId> {
        self.project
            .as_ref()
            .and_then(|p| p.current_layer())
            .map(|l| l.shapes.clone())
            .unwrap_or_default()
    }

    /// Hit radius in screen pixels.
    pub(crate) fn hit_radius(&self) -> f64 {
        self.project
            .as_ref()
            .map(|p| p.options.hit_threshold)
            .unwrap_or(self.config.canvas.hit_radius)
    }

    /// Hit radius in world units at the current zoom.
    pub(crate) fn world_radius(&self) -> f64 {
        self.hit_radius() / self.viewport.zoom()
    }

    /// `p` snapped to the project grid when snapping is on.
    pub(crate) fn snapped(&self, p: Point2) -> Point2 {
        match &self.project {
            Some(project) => {
                let (x, y) = project.options.snap(p.x, p.y);
                Point2::new(x, y)
            }
            None => p,
        }
    }

    /// Commit `edits` as one history entry. Failures are logged and leave
    /// the project as it was.
    pub(crate) fn commit(&mut self, name: &str, edits: Vec<Edit>) -> bool {
        if edits.is_empty() {
            return false;
        }
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        if let Err(e) = project.commit(name, edits) {
            error!("{} failed: {}", name, e);
            return false;
        }
        self.notify_history();
        true
    }

    fn notify_history(&self) {
        if let Some(project) = &self.project {
            self.events.publish(EditorEvent::HistoryChanged {
                can_undo: project.can_undo(),
                can_redo: project.can_redo(),
            });
        }
    }

    pub fn can_undo(&self) -> bool {
        self.project.as_ref().is_some_and(|p| p.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.project.as_ref().is_some_and(|p| p.can_redo())
    }

    pub fn undo(&mut self) -> bool {
        self.reset();
        let done = self.project.as_mut().is_some_and(|p| p.undo());
        if done {
            self.retain_selection();
            self.notify_history();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        self.reset();
        let done = self.project.as_mut().is_some_and(|p| p.redo());
        if done {
            self.retain_selection();
            self.notify_history();
        }
        done
    }

    /// Focus a layer, page or document and notify subscribers.
    pub fn set_selected(&mut self, value: Selected) -> bool {
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        if !project.set_selected(value) {
            return false;
        }
        self.reset();
        self.retain_selection();
        self.events.publish(EditorEvent::SelectedChanged(value));
        true
    }

    /// Drop selected shapes that left the current layer.
    fn retain_selection(&mut self) {
        let shapes = self.layer_shapes();
        let before = self.selection.len();
        self.selection.retain(|id| shapes.contains(id));
        if self.selection.len() != before {
            self.events
                .publish(EditorEvent::ShapesSelected(self.selection.len()));
        }
    }

    /// Reserve the async slot. `None` while another command is in flight
    /// or when no project is open.
    pub fn begin_async(&mut self) -> Option<Ticket> {
        if self.pending.is_some() || self.project.is_none() {
            debug!("Async command rejected, slot busy or no project");
            return None;
        }
        self.next_ticket += 1;
        let ticket = Ticket {
            id: self.next_ticket,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        Some(ticket)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the slot for `ticket`. Returns whether its result may still
    /// be applied.
    pub(crate) fn finish_async(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
        let current = ticket.generation == self.generation && self.project.is_some();
        if !current {
            debug!("Dropping result of async command {}", ticket.id);
        }
        current
    }

    /// Give up on `ticket` without applying anything.
    pub fn cancel_async(&mut self, ticket: Ticket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }
}
