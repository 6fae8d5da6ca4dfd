//! Core2D Settings Crate
//!
//! Handles application preferences and their persistence.

pub mod config;
pub mod error;

pub use config::{CanvasSettings, Config, ExportFormat, ExportSettings, HistorySettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
