//! `core2d` - export a page of a project archive to SVG or PNG.
//!
//! Usage: `core2d <project> <output.svg|output.png> [page-number]`

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use tracing::{info, warn};

use core2d::{
    init_logging, render_page, Config, ExportFormat, ProjectArchive, RasterRenderer,
    StdFileSystem, SvgRenderer, BUILD_DATE, VERSION,
};

struct Args {
    project: PathBuf,
    output: PathBuf,
    page: usize,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1);
    let usage = "usage: core2d <project> <output.svg|output.png> [page-number]";
    let project = args.next().ok_or_else(|| anyhow!(usage))?;
    if project == "--version" {
        println!("core2d {} ({})", VERSION, BUILD_DATE);
        std::process::exit(0);
    }
    let output = args.next().ok_or_else(|| anyhow!(usage))?;
    let page = match args.next() {
        Some(n) => n
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .with_context(|| format!("page number must be 1 or greater, got '{}'", n))?,
        None => 1,
    };
    Ok(Args {
        project: project.into(),
        output: output.into(),
        page,
    })
}

fn load_config() -> Config {
    match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring unreadable config: {}", e);
            Config::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = parse_args()?;
    let config = load_config();

    let fs = StdFileSystem::new(Path::new("."));
    let project = ProjectArchive::new(&fs)
        .load(&args.project)
        .with_context(|| format!("failed to open {}", args.project.display()))?;

    let page = project
        .documents
        .iter()
        .flat_map(|d| d.pages.iter())
        .nth(args.page - 1)
        .with_context(|| format!("project has no page {}", args.page))?;

    let format =
        ExportFormat::from_path(&args.output).unwrap_or(config.export.default_format);
    let bytes = match format {
        ExportFormat::Svg => {
            let mut svg = SvgRenderer::new();
            render_page(&mut svg, &project, page);
            svg.finish().into_bytes()
        }
        ExportFormat::Png => {
            let scale = config.export.png_scale;
            if scale <= 0.0 {
                bail!("export.png_scale must be positive, got {}", scale);
            }
            let mut png = RasterRenderer::new(page.width, page.height, scale)?;
            render_page(&mut png, &project, page);
            png.encode_png()?
        }
    };

    std::fs::write(&args.output, bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        "Exported page '{}' of '{}' to {} ({})",
        page.name,
        project.name,
        args.output.display(),
        format
    );
    Ok(())
}
