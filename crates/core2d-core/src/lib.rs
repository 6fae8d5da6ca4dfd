//! # Core2D Core
//!
//! Error taxonomy, shared constants and the narrow collaborator interfaces
//! the editing core talks to: file system, JSON serializer, tabular data
//! readers/writers and the asynchronous platform services (clipboard, script
//! runner, image picker).

pub mod constants;
pub mod error;
pub mod services;

pub use error::{Error, FileError, ModelError, PathError, Result};

pub use services::{
    Clipboard, FileSystem, ImagePicker, JsonSerializer, MemoryClipboard, PickedImage,
    ScriptRunner, SerdeJsonSerializer, StdFileSystem, TextFieldReader, TextFieldWriter,
};
