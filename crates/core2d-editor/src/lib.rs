//! # Core2D Editor
//!
//! Editing core of a 2D vector diagram editor: the shape model, undo/redo
//! history, hit-testing under zoom, the path engine and the command layer
//! that turns pointer input and menu actions into history entries.
//!
//! ## Core Components
//!
//! ### Model
//! - **Shapes**: points, lines, arcs, Bézier curves, rectangles, ellipses,
//!   text, images, paths and groups, stored in a [`ShapeStore`] arena.
//!   Points are shapes too and may be shared between geometry owners.
//! - **Project**: documents, pages, layers, template pages, style and group
//!   libraries, databases and the image cache.
//! - **Data binding**: `{Column}` placeholders resolved against records.
//!
//! ### Editing
//! - **History**: every change is an [`Edit`] holding old and new state.
//! - **Hit-testing**: per-kind testers with a zoom-scaled tolerance.
//! - **Path engine**: conversion to path, stroke, fill and winding
//!   outlines, boolean operations and SVG path data.
//! - **Editor**: selection, tools, grouping, layout, clipboard and drops.
//!
//! ### Output
//! - **Renderers**: a [`ShapeRenderer`] trait with SVG and PNG exporters.
//! - **Serialization**: zip project archives and JSON library objects.
//!
//! ## Architecture
//!
//! ```text
//! Editor (commands, tools, selection, async slot)
//!   ├── Project (containers, libraries, databases, images)
//!   │     ├── ShapeStore (shapes and styles by id)
//!   │     └── UndoRedoManager (Edit entries)
//!   ├── HitTest (per-kind Bounds registry)
//!   └── Viewport (zoom and pan)
//!
//! Renderers (page draw pass -> SVG / PNG)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core2d_editor::{Editor, Point2, Tool};
//!
//! let mut editor = Editor::default();
//! editor.new_project("Diagram");
//! editor.set_tool(Tool::Line);
//! editor.left_down(Point2::new(0.0, 0.0));
//! editor.left_down(Point2::new(100.0, 0.0));
//! editor.undo();
//! ```

pub mod commands;
pub mod data;
pub mod editor;
pub mod events;
pub mod geometry;
pub mod history;
pub mod model;
pub mod path;
pub mod project;
pub mod raster_renderer;
pub mod renderer;
pub mod serialization;
pub mod style;
pub mod svg_renderer;
pub mod viewport;

pub use commands::{Edit, HistoryEntry};
pub use data::{Column, Context, DataFlow, Database, Property, Record};
pub use editor::{Alignment, Axis, Editor, Nudge, PathConversion, PathTool, Ticket, Tool};
pub use events::{EditorEvent, EventDispatcher};
pub use geometry::{Point2, Rect2};
pub use history::UndoRedoManager;
pub use hit_test::{Bounds, HitTest};
pub use model::{
    Shape, ShapeDefaults, ShapeFragment, ShapeId, ShapeKind, ShapeKindTag, ShapeState,
    ShapeStore, StyleId,
};
pub use path::PathOp;
pub use project::{Document, Layer, Options, Page, Project, Selected};
pub use raster_renderer::RasterRenderer;
pub use renderer::{render_page, ShapeRenderer};
pub use serialization::{export_json, import_json, LibraryObject, ProjectArchive};
pub use style::{ArgbColor, ShapeStyle};
pub use svg_renderer::SvgRenderer;
pub use viewport::Viewport;
