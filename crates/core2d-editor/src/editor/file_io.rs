//! Project lifecycle (new, open, save, close) for the editor.

use std::path::Path;

use tracing::{error, info};

use core2d_core::FileSystem;

use super::Editor;
use crate::events::EditorEvent;
use crate::project::Project;
use crate::serialization::ProjectArchive;

impl Editor {
    /// Replace the open project with `project`.
    ///
    /// History starts empty and any pending async result becomes stale.
    pub fn open_project(&mut self, mut project: Project) {
        self.reset();
        project.history.reset();
        project
            .history
            .set_max_depth(self.config.history.max_depth);
        let name = project.name.clone();
        self.project = Some(project);
        self.selection.clear();
        self.image_key = None;
        self.generation += 1;
        self.pending = None;
        self.viewport.reset();
        info!("Project '{}' opened", name);
        self.events.publish(EditorEvent::ProjectOpened { name });
    }

    /// Open a fresh project with one document, page and layer.
    pub fn new_project(&mut self, name: &str) {
        self.open_project(Project::with_defaults(name));
    }

    /// Load a project archive. Failures are logged and keep the current
    /// project open.
    pub fn open(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        match ProjectArchive::new(fs).load(path) {
            Ok(project) => {
                self.open_project(project);
                self.config.add_recent_file(path.to_path_buf());
                true
            }
            Err(e) => {
                error!("Failed to open {}: {}", path.display(), e);
                false
            }
        }
    }

    pub fn save(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        let Some(project) = &self.project else {
            return false;
        };
        match ProjectArchive::new(fs).save(path, project) {
            Ok(()) => {
                self.config.add_recent_file(path.to_path_buf());
                true
            }
            Err(e) => {
                error!("Failed to save {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Close the open project, discarding its history and tool state.
    pub fn close(&mut self) -> bool {
        self.reset();
        let Some(mut project) = self.project.take() else {
            return false;
        };
        let used = project.used_image_keys();
        let purged = project.images.purge_unused_images(&used);
        info!(
            "Project '{}' closed ({} unused images released)",
            project.name, purged
        );
        self.selection.clear();
        self.image_key = None;
        self.generation += 1;
        self.pending = None;
        self.events.publish(EditorEvent::ProjectClosed);
        true
    }
}
