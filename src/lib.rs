//! # Core2D
//!
//! Headless editing core for 2D diagrams: a shared-point shape model,
//! undoable commands, hit-testing, path conversion and page export.
//!
//! ## Architecture
//!
//! Core2D is organized as a workspace with multiple crates:
//!
//! 1. **core2d-core** - Errors, constants and collaborator interfaces
//! 2. **core2d-settings** - Persisted application preferences
//! 3. **core2d-editor** - Shape model, history, tools, renderers and archives
//! 4. **core2d** - This crate plus the `core2d` export binary

pub use core2d_core as core;
pub use core2d_editor as editor;
pub use core2d_settings as settings;

pub use core2d_core::{Error, FileSystem, Result, StdFileSystem};
pub use core2d_editor::{
    render_page, Editor, Project, ProjectArchive, RasterRenderer, SvgRenderer,
};
pub use core2d_settings::{Config, ExportFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Environment variable that switches log output to JSON lines.
pub const LOG_JSON_ENV: &str = "CORE2D_LOG_JSON";

/// Initialize logging.
///
/// Honours `RUST_LOG` (default `info`). Output goes to stderr so exported
/// documents can be piped from stdout; set `CORE2D_LOG_JSON=1` for JSON.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_JSON_ENV).is_ok_and(|v| v == "1");

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
