//! Editor notifications.

use std::fmt;

use tokio::sync::broadcast;

use crate::editor::Tool;
use crate::project::Selected;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Fired after selection normalization.
    SelectedChanged(Selected),
    ProjectOpened { name: String },
    ProjectClosed,
    HistoryChanged { can_undo: bool, can_redo: bool },
    ToolChanged(Tool),
    /// Shapes selected on the canvas.
    ShapesSelected(usize),
}

impl fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorEvent::SelectedChanged(selected) => write!(f, "Selected: {:?}", selected),
            EditorEvent::ProjectOpened { name } => write!(f, "Project opened: {}", name),
            EditorEvent::ProjectClosed => write!(f, "Project closed"),
            EditorEvent::HistoryChanged { can_undo, can_redo } => {
                write!(f, "History: undo={} redo={}", can_undo, can_redo)
            }
            EditorEvent::ToolChanged(tool) => write!(f, "Tool: {:?}", tool),
            EditorEvent::ShapesSelected(count) => write!(f, "{} shapes selected", count),
        }
    }
}

/// Publishes [`EditorEvent`]s to any number of subscribers.
#[derive(Clone)]
pub struct EventDispatcher {
    tx: broadcast::Sender<EditorEvent>,
}

impl EventDispatcher {
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.tx.subscribe()
    }

    /// Publish to current subscribers. Having none is not an error.
    pub fn publish(&self, event: EditorEvent) -> usize {
        tracing::trace!("{}", event);
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let events = EventDispatcher::default();
        assert_eq!(events.publish(EditorEvent::ProjectClosed), 0);
    }

    #[test]
    fn test_subscriber_receives() {
        let events = EventDispatcher::default();
        let mut rx = events.subscribe();
        assert_eq!(events.publish(EditorEvent::ProjectClosed), 1);
        assert_eq!(rx.try_recv().unwrap(), EditorEvent::ProjectClosed);
    }
}
