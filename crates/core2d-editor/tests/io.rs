#[path = "io/archive.rs"]
mod archive;
#[path = "io/library_objects.rs"]
mod library_objects;
#[path = "io/svg_export.rs"]
mod svg_export;
