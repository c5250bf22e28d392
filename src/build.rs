//! Site building orchestration.
//!
//! Loads content, renders every page and writes the output directory.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output() ──► Clear (--clean) or create the output directory
//!     │
//!     ├── render_site()    ──► Render every route in parallel
//!     │
//!     ├── write_page()     ──► Minify + write each page in parallel
//!     │
//!     └── copy_assets()    ──► Stylesheet + assets directory
//! ```

use crate::{
    config::SiteConfig,
    content::Content,
    log,
    render::{Page, Renderer, STYLESHEET, STYLESHEET_PATH},
    settings::Settings,
    storage::FileStore,
    utils::minify::{MinifyType, minify},
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Everything the renderer reads besides the config.
#[derive(Debug)]
pub struct Site {
    pub content: Content,
    pub settings: Settings,
}

impl Site {
    /// Load content files and the persisted UI settings.
    pub fn load(config: &SiteConfig) -> Result<Self> {
        let content = Content::load(&config.build.content).context("Failed to load content")?;
        let store = FileStore::open(config.prefs_path()).context("Failed to open preferences")?;
        let settings = Settings::load(&store);
        Ok(Self { content, settings })
    }

    pub fn renderer<'a>(&'a self, config: &'a SiteConfig) -> Renderer<'a> {
        Renderer::new(config, &self.content, self.settings)
    }
}

/// Build the entire site, writing pages and assets in parallel.
///
/// Returns the rendered pages for sitemap generation.
/// If `config.build.clean` is true, clears the entire output directory first.
pub fn build_site(config: &'static SiteConfig, site: &Site) -> Result<Vec<Page>> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    log!("build"; "rendering {} projects...", site.content.projects.len());
    let pages = site.renderer(config).render_site();

    let has_error = AtomicBool::new(false);
    let (pages_result, assets_result) = rayon::join(
        || {
            pages.par_iter().try_for_each(|page| {
                if has_error.load(Ordering::Relaxed) {
                    return Err(anyhow!("Aborted"));
                }
                if let Err(e) = write_page(page, config) {
                    if !has_error.swap(true, Ordering::Relaxed) {
                        log!("error"; "{}: {:#}", page.path, e);
                    }
                    return Err(anyhow!("Build failed"));
                }
                Ok(())
            })
        },
        || copy_assets(config),
    );

    pages_result?;
    assets_result?;

    log!("build"; "done, {} pages", pages.len());
    Ok(pages)
}

/// Clear or create the output directory.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Minify (when enabled) and write one page.
fn write_page(page: &Page, config: &SiteConfig) -> Result<()> {
    let path = page.output_path(&config.build.output);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let html = minify(MinifyType::Html(page.html.as_bytes()), config);
    fs::write(&path, &*html).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the stylesheet and copy the assets directory.
fn copy_assets(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    fs::write(output.join(STYLESHEET_PATH.trim_start_matches('/')), STYLESHEET)?;

    let assets = &config.build.assets;
    let dest_root = output.join("assets");
    collect_all_files(assets).par_iter().try_for_each(|src| {
        let relative = src.strip_prefix(assets)?;
        let dest = dest_root.join(relative);
        if !config.build.clean && is_up_to_date(src, &dest) {
            return Ok(());
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, &dest).with_context(|| format!("Failed to copy {}", src.display()))?;
        Ok(())
    })
}

/// Collect all files from a directory recursively
fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.into_path())
        .collect()
}

/// Check if destination exists and is not older than the source
fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let modified = |path: &Path| path.metadata().and_then(|meta| meta.modified()).ok();
    match (modified(src), modified(dst)) {
        (Some(src_time), Some(dst_time)) => src_time <= dst_time,
        _ => false,
    }
}
