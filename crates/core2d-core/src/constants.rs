//! Shared constants used across the Core2D crates.

/// Default hit-test radius in screen pixels.
pub const DEFAULT_HIT_THRESHOLD: f64 = 7.0;

/// Default grid step used by snap-to-grid.
pub const DEFAULT_SNAP_STEP: f64 = 15.0;

/// Default number of undo entries retained.
pub const DEFAULT_MAX_UNDO_DEPTH: usize = 100;

/// Zoom limits for the canvas viewport.
pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 100.0;

/// Multiplier applied by a single zoom in/out step.
pub const ZOOM_STEP: f64 = 1.2;

/// Curve flattening tolerance used by the path engine.
pub const FLATTEN_TOLERANCE: f64 = 0.05;

/// Distance below which two coordinates are treated as equal.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// File extension of project archives.
pub const PROJECT_EXTENSION: &str = "project";

/// Entry name of the serialized project inside an archive.
pub const PROJECT_ENTRY: &str = "Project.json";

/// Archive folder holding cached images.
pub const IMAGES_FOLDER: &str = "Images";

/// Name given to databases created for orphaned records.
pub const IMPORTED_DATABASE_NAME: &str = "Imported";

/// Current project file format version.
pub const PROJECT_FORMAT_VERSION: &str = "1.0";
