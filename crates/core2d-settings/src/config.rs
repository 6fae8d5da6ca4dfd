//! Configuration and settings management for Core2D
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Canvas interaction (hit radius, zoom limits)
//! - History (undo depth)
//! - Export defaults (format, background, raster scale)

use core2d_core::constants::{
    DEFAULT_HIT_THRESHOLD, DEFAULT_MAX_UNDO_DEPTH, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Maximum number of entries kept in the recent files list.
const RECENT_FILES_LIMIT: usize = 10;

/// Canvas interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Hit-test radius in screen pixels
    pub hit_radius: f64,
    /// Size of selection handles in screen pixels
    pub handle_size: f64,
    /// Smallest zoom factor
    pub min_zoom: f64,
    /// Largest zoom factor
    pub max_zoom: f64,
    /// Multiplier of one zoom step
    pub zoom_step: f64,
    /// Draw the page grid
    pub show_grid: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            hit_radius: DEFAULT_HIT_THRESHOLD,
            handle_size: 6.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            show_grid: true,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo entries
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_UNDO_DEPTH,
        }
    }
}

/// Export target format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Scalable vector graphics
    #[default]
    Svg,
    /// Raster PNG
    Png,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Svg => write!(f, "svg"),
            Self::Png => write!(f, "png"),
        }
    }
}

impl ExportFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Format used when the target path gives no hint
    pub default_format: ExportFormat,
    /// Page background as `#rrggbb`, empty for transparent
    pub background: String,
    /// Pixels per drawing unit for raster export
    pub png_scale: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Svg,
            background: "#ffffff".to_string(),
            png_scale: 1.0,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Canvas interaction
    pub canvas: CanvasSettings,
    /// Undo history
    pub history: HistorySettings,
    /// Export defaults
    pub export: ExportSettings,
    /// Recently opened projects, most recent first
    pub recent_files: Vec<PathBuf>,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location: `<config_dir>/core2d/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(dir.join("core2d").join("config.toml"))
    }

    /// Load the config from the default location, falling back to defaults
    /// when no file has been written yet.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.is_file() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        config.validate()?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        fn invalid(key: &str, reason: &str) -> SettingsError {
            SettingsError::InvalidSetting {
                key: key.to_string(),
                reason: reason.to_string(),
            }
        }

        if self.canvas.hit_radius <= 0.0 {
            return Err(invalid("canvas.hit_radius", "must be > 0"));
        }
        if self.canvas.handle_size <= 0.0 {
            return Err(invalid("canvas.handle_size", "must be > 0"));
        }
        if self.canvas.min_zoom <= 0.0 || self.canvas.min_zoom >= self.canvas.max_zoom {
            return Err(invalid("canvas.min_zoom", "must be > 0 and below max_zoom"));
        }
        if self.canvas.zoom_step <= 1.0 {
            return Err(invalid("canvas.zoom_step", "must be > 1"));
        }
        if self.history.max_depth == 0 {
            return Err(invalid("history.max_depth", "must be > 0"));
        }
        if self.export.png_scale <= 0.0 {
            return Err(invalid("export.png_scale", "must be > 0"));
        }

        Ok(())
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(RECENT_FILES_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.canvas.hit_radius, DEFAULT_HIT_THRESHOLD);
    }

    #[test]
    fn test_validation_rejects_inverted_zoom() {
        let mut config = Config::default();
        config.canvas.min_zoom = 10.0;
        config.canvas.max_zoom = 5.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_recent_files_deduplicated_and_bounded() {
        let mut config = Config::default();
        for i in 0..15 {
            config.add_recent_file(PathBuf::from(format!("/tmp/p{}.project", i)));
        }
        config.add_recent_file(PathBuf::from("/tmp/p3.project"));
        assert_eq!(config.recent_files.len(), RECENT_FILES_LIMIT);
        assert_eq!(config.recent_files[0], PathBuf::from("/tmp/p3.project"));
        assert_eq!(
            config
                .recent_files
                .iter()
                .filter(|p| p.ends_with("p3.project"))
                .count(),
            1
        );
    }

    #[test]
    fn test_export_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("a/b.SVG")),
            Some(ExportFormat::Svg)
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.png")),
            Some(ExportFormat::Png)
        );
        assert_eq!(ExportFormat::from_path(Path::new("out.pdf")), None);
    }
}
