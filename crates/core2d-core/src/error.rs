//! Error handling for Core2D
//!
//! Errors are grouped by the layer that raises them:
//! - Model errors (missing shapes, containers, invalid geometry)
//! - Path errors (conversion and boolean operations)
//! - File errors (project archives, serializer failures)
//!
//! Precondition failures of user commands are not errors; they are reported
//! as `false`/`None` by the editor. `Error::NotSupported` is the one variant
//! callers are expected to propagate to a top-level handler.

use thiserror::Error;

/// Shape model error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Shape id is not present in the store
    #[error("Shape {id} not found")]
    ShapeNotFound {
        /// The missing shape id.
        id: u64,
    },

    /// Style id is not present in the store
    #[error("Style {id} not found")]
    StyleNotFound {
        /// The missing style id.
        id: u64,
    },

    /// Layer id is not present in the project
    #[error("Layer {id} not found")]
    LayerNotFound {
        /// The missing layer id.
        id: u64,
    },

    /// Page id is not present in the project
    #[error("Page {id} not found")]
    PageNotFound {
        /// The missing page id.
        id: u64,
    },

    /// Geometry cannot be built from the given points
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry {
        /// Why the geometry is invalid.
        reason: String,
    },

    /// Generic model error
    #[error("Model error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Path conversion and boolean operation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Operation needs more input shapes
    #[error("Path operation needs at least {required} shapes, got {actual}")]
    NotEnoughShapes {
        /// Minimum number of shapes.
        required: usize,
        /// Number of shapes supplied.
        actual: usize,
    },

    /// Shape kind has no path representation
    #[error("Shape kind {kind} cannot be converted to a path")]
    Unconvertible {
        /// The shape kind name.
        kind: String,
    },

    /// SVG path data could not be parsed
    #[error("Invalid path data at {position}: {reason}")]
    InvalidPathData {
        /// Byte offset of the offending token.
        position: usize,
        /// What went wrong.
        reason: String,
    },

    /// Generic path error
    #[error("Path error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Project file error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    /// File does not exist
    #[error("File not found: {path}")]
    NotFound {
        /// The requested path.
        path: String,
    },

    /// Archive lacks a required entry
    #[error("Archive entry missing: {name}")]
    MissingEntry {
        /// The entry name.
        name: String,
    },

    /// Archive could not be read or written
    #[error("Archive error: {reason}")]
    Archive {
        /// The underlying reason.
        reason: String,
    },

    /// Project format version is newer than this build understands
    #[error("Unsupported project version {version}")]
    UnsupportedVersion {
        /// The version found in the file.
        version: String,
    },

    /// Serializer rejected the content
    #[error("Serializer error: {reason}")]
    Serializer {
        /// The serializer message.
        reason: String,
    },
}

/// Main error type for Core2D
///
/// Unified error type that wraps all specific error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Model error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Path error
    #[error(transparent)]
    Path(#[from] PathError),

    /// File error
    #[error(transparent)]
    File(#[from] FileError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input of an unrecognized kind
    #[error("Not supported: {kind}")]
    NotSupported {
        /// The unrecognized kind.
        kind: String,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a "not supported" error for the given kind
    pub fn not_supported(kind: impl Into<String>) -> Self {
        Error::NotSupported { kind: kind.into() }
    }

    /// Check if this error must reach a top-level handler
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Error::NotSupported { .. })
    }

    /// Check if this is an I/O level failure (file, archive or serializer)
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Json(_) | Error::File(_))
    }
}

/// Result type for Core2D operations
pub type Result<T> = std::result::Result<T, Error>;
