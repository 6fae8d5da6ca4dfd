//! Tabular import/export interfaces.

use std::path::Path;

use super::file_system::FileSystem;
use crate::error::Result;

/// Reads a tabular file (CSV, spreadsheet, ...) into a model object.
pub trait TextFieldReader<T> {
    /// Short format name shown to the user, e.g. `"csv"`.
    fn name(&self) -> &str;

    /// File extension handled by this reader, without the dot.
    fn extension(&self) -> &str;

    /// Read `path` through `fs`.
    fn read(&self, fs: &dyn FileSystem, path: &Path) -> Result<T>;
}

/// Writes a model object to a tabular file.
pub trait TextFieldWriter<T> {
    /// Short format name shown to the user.
    fn name(&self) -> &str;

    /// File extension produced by this writer, without the dot.
    fn extension(&self) -> &str;

    /// Write `value` to `path` through `fs`.
    fn write(&self, fs: &dyn FileSystem, path: &Path, value: &T) -> Result<()>;
}
