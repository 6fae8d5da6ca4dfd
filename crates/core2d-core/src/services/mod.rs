//! Collaborator interfaces consumed by the editing core.
//!
//! The core never touches the platform directly: bytes and text come through
//! [`FileSystem`], object graphs through [`JsonSerializer`], tabular data
//! through [`TextFieldReader`]/[`TextFieldWriter`], and the few operations
//! that may suspend (clipboard, scripts, file picker) through the async
//! traits in [`platform`].

pub mod file_system;
pub mod json;
pub mod platform;
pub mod text_fields;

pub use file_system::{FileSystem, StdFileSystem};
pub use json::{JsonSerializer, SerdeJsonSerializer};
pub use platform::{Clipboard, ImagePicker, MemoryClipboard, PickedImage, ScriptRunner};
pub use text_fields::{TextFieldReader, TextFieldWriter};
