//! Path engine: conversion of shapes into explicit path geometry, boolean
//! operations between filled regions and SVG path data.
//!
//! Every operation is pure. Results come back as a [`ShapeFragment`] with
//! local ids that the caller imports into its store and commits as one
//! history entry.
//!
//! [`ShapeFragment`]: crate::model::ShapeFragment

pub mod boolean;
pub mod convert;
pub mod outline;
pub mod stroke;
pub mod svg_path;

pub use boolean::{op, PathOp};
pub use convert::{
    shape_outline, simplify, to_fill_path, to_path, to_stroke_path, to_winding_path,
};
pub use outline::{Contour, Figure, Outline, PathTemplate, Segment};
pub use stroke::stroke_outline;
pub use svg_path::{from_svg_path_data, geometry_to_svg_path_data, parse_path_data, to_svg_path_data};
