//! Byte and text stream access.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{FileError, Result};

/// File system access used by project load/save and tabular import.
///
/// Implementations only move bytes around; no path parsing is expected.
pub trait FileSystem {
    /// Directory relative paths are resolved against.
    fn get_base_directory(&self) -> PathBuf;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Open a readable stream.
    fn open(&self, path: &Path) -> Result<Box<dyn Read>>;

    /// Create (or truncate) a writable stream.
    fn create(&self, path: &Path) -> Result<Box<dyn Write>>;

    /// Read a whole file as bytes.
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        let mut stream = self.open(path)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Write bytes to a file, replacing its contents.
    fn write_binary(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut stream = self.create(path)?;
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(())
    }

    /// Read a whole file as UTF-8 text. A leading byte order mark is dropped.
    fn read_utf8_text(&self, path: &Path) -> Result<String> {
        let bytes = self.read_binary(path)?;
        let text = String::from_utf8(bytes).map_err(|e| FileError::Serializer {
            reason: format!("{} is not valid UTF-8: {}", path.display(), e),
        })?;
        if text.starts_with('\u{feff}') {
            Ok(text['\u{feff}'.len_utf8()..].to_string())
        } else {
            Ok(text)
        }
    }

    /// Write UTF-8 text to a file.
    fn write_utf8_text(&self, path: &Path, text: &str) -> Result<()> {
        self.write_binary(path, text.as_bytes())
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone)]
pub struct StdFileSystem {
    base: PathBuf,
}

impl StdFileSystem {
    /// Create a file system rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

impl Default for StdFileSystem {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

impl FileSystem for StdFileSystem {
    fn get_base_directory(&self) -> PathBuf {
        self.base.clone()
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        let full = self.resolve(path);
        if !full.is_file() {
            return Err(FileError::NotFound {
                path: full.display().to_string(),
            }
            .into());
        }
        Ok(Box::new(fs::File::open(full)?))
    }

    fn create(&self, path: &Path) -> Result<Box<dyn Write>> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Box::new(fs::File::create(full)?))
    }
}
