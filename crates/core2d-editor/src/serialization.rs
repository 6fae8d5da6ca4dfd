//! Project archives and library object exchange.
//!
//! A project is saved as a zip archive holding `Project.json` (a versioned
//! [`ProjectFile`]) and one `Images/<key>` entry per cached image. All IO
//! goes through a [`FileSystem`]; JSON goes through a [`JsonSerializer`].
//!
//! Single library objects (clipboard fragments, styles, groups, databases)
//! travel as JSON tagged with a `"kind"` field, see [`LibraryObject`].

use std::io::{Cursor, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use core2d_core::constants::{IMAGES_FOLDER, PROJECT_ENTRY, PROJECT_FORMAT_VERSION};
use core2d_core::{Error, FileError, FileSystem, JsonSerializer, Result, SerdeJsonSerializer};

use crate::data::Database;
use crate::model::ShapeFragment;
use crate::project::Project;
use crate::style::ShapeStyle;

/// Project file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Contents of `Project.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: String,
    pub metadata: ProjectMetadata,
    pub project: Project,
}

impl ProjectFile {
    pub fn new(project: Project) -> Self {
        let now = Utc::now();
        Self {
            version: PROJECT_FORMAT_VERSION.to_string(),
            metadata: ProjectMetadata {
                name: project.name.clone(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            project,
        }
    }

    fn check_version(&self) -> Result<()> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.version) != major(PROJECT_FORMAT_VERSION) {
            return Err(FileError::UnsupportedVersion {
                version: self.version.clone(),
            }
            .into());
        }
        Ok(())
    }
}

fn archive_error(e: zip::result::ZipError) -> Error {
    FileError::Archive {
        reason: e.to_string(),
    }
    .into()
}

/// Reads and writes project archives.
pub struct ProjectArchive<'a, J = SerdeJsonSerializer> {
    fs: &'a dyn FileSystem,
    json: J,
}

impl<'a> ProjectArchive<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            json: SerdeJsonSerializer::pretty(),
        }
    }
}

impl<'a, J: JsonSerializer> ProjectArchive<'a, J> {
    pub fn with_serializer(fs: &'a dyn FileSystem, json: J) -> Self {
        Self { fs, json }
    }

    /// Archive bytes of `project`.
    ///
    /// A purged copy is written: unreachable shapes, styles and images are
    /// dropped, the open project and its history are left alone.
    pub fn to_bytes(&self, project: &Project) -> Result<Vec<u8>> {
        let mut copy = project.clone();
        copy.history.reset();
        copy.purge();
        let images: Vec<(String, Vec<u8>)> = copy
            .images
            .keys()
            .filter_map(|k| copy.images.get_image(k).map(|b| (k.to_string(), b.to_vec())))
            .collect();
        let json = self.json.serialize(&ProjectFile::new(copy))?;

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            zip.start_file(PROJECT_ENTRY, options).map_err(archive_error)?;
            zip.write_all(json.as_bytes())?;
            for (key, bytes) in &images {
                zip.start_file(format!("{}/{}", IMAGES_FOLDER, key), options)
                    .map_err(archive_error)?;
                zip.write_all(bytes)?;
            }
            zip.finish().map_err(archive_error)?;
        }
        Ok(buffer.into_inner())
    }

    /// Project from archive bytes, ready for editing.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Project> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_error)?;
        let text = {
            let mut entry = archive
                .by_name(PROJECT_ENTRY)
                .map_err(|_| FileError::MissingEntry {
                    name: PROJECT_ENTRY.to_string(),
                })?;
            let mut text = String::new();
            entry.read_to_string(&mut text)?;
            text
        };
        let file: ProjectFile = self.json.deserialize(&text)?;
        file.check_version()?;
        let mut project = file.project;

        let prefix = format!("{}/", IMAGES_FOLDER);
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(archive_error)?;
            let Some(key) = entry.name().strip_prefix(&prefix).map(str::to_string) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            project.images.insert(key, data);
        }

        project.after_load();
        project.recover_container_ids();
        debug!(
            "Loaded project '{}' with {} images",
            project.name,
            project.images.len()
        );
        Ok(project)
    }

    pub fn save(&self, path: &Path, project: &Project) -> Result<()> {
        let bytes = self.to_bytes(project)?;
        self.fs.write_binary(path, &bytes)?;
        info!("Saved project '{}' to {}", project.name, path.display());
        Ok(())
    }

    pub fn load(&self, path: &Path) -> Result<Project> {
        if !self.fs.exists(path) {
            return Err(FileError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let bytes = self.fs.read_binary(path)?;
        let project = self.from_bytes(&bytes)?;
        info!("Opened project '{}' from {}", project.name, path.display());
        Ok(project)
    }
}

/// A single exchangeable object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LibraryObject {
    /// Shapes copied to the clipboard.
    Fragment(ShapeFragment),
    Style(ShapeStyle),
    /// A library group with everything it references.
    Group(ShapeFragment),
    Database(Database),
}

impl LibraryObject {
    pub fn kind(&self) -> &'static str {
        match self {
            LibraryObject::Fragment(_) => "fragment",
            LibraryObject::Style(_) => "style",
            LibraryObject::Group(_) => "group",
            LibraryObject::Database(_) => "database",
        }
    }
}

const KNOWN_KINDS: [&str; 4] = ["fragment", "style", "group", "database"];

pub fn export_json(object: &LibraryObject) -> Result<String> {
    SerdeJsonSerializer::pretty().serialize(object)
}

/// Parse a library object. An unknown or missing `"kind"` is
/// [`Error::NotSupported`].
pub fn import_json(text: &str) -> Result<LibraryObject> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let kind = value
        .get("kind")
        .and_then(|k| k.as_str())
        .unwrap_or("<missing>")
        .to_string();
    if !KNOWN_KINDS.contains(&kind.as_str()) {
        return Err(Error::not_supported(kind));
    }
    Ok(serde_json::from_value(value)?)
}
