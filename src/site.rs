//! Whole-site assembly.
//!
//! Walks the site tree and writes a ready-to-serve copy to the output
//! directory. Every HTML page with at least one placeholder goes through the
//! full pipeline:
//!
//! ```text
//! page shell ─▶ registry (depth) ─▶ load_all ═▶ fragments ready
//!                                                     │
//!                                   effects (copy buttons, target scan)
//!                                                     │
//!      dist/<same path> ◀─ preload hints ◀─ lazy images
//! ```
//!
//! Effects are wired only once every fragment has settled, so they always see
//! the assembled page. Pages without placeholders and all other files are
//! copied unchanged. The fragments directory and the output directory itself
//! are never copied.

use crate::catalog::{CatalogError, ProjectCatalog};
use crate::config::{self, ConfigError, SiteConfig};
use crate::effects::{EffectWiring, wire_effects};
use crate::loader::{FragmentLoader, LoadReport};
use crate::optimize::{add_lazy_loading, critical_resources, inject_preload_hints};
use crate::page::Page;
use crate::registry::FragmentRegistry;
use crate::source::{DirSource, FetchError, FragmentSource, HttpSource};
use crate::template::{TemplateError, write_project_page};
use crate::types::PageDepth;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Fetch setup error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Load the site config (the given file, or `folio.toml` in the site root)
/// and build the project catalog from it.
pub fn load_site(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<(SiteConfig, ProjectCatalog), SiteError> {
    let config = match config_path {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(root)?,
    };
    let catalog = ProjectCatalog::new(config.projects.clone())?;
    Ok((config, catalog))
}

/// What happened to one assembled page.
#[derive(Debug, Clone)]
pub struct PageReport {
    /// Path relative to the site root, `/`-separated.
    pub path: String,
    pub depth: PageDepth,
    pub load: LoadReport,
    pub effects: EffectWiring,
    pub lazy_images: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SiteReport {
    pub pages: Vec<PageReport>,
    /// Files copied unchanged, including HTML without placeholders.
    pub copied: Vec<String>,
}

impl SiteReport {
    pub fn fragments_failed(&self) -> usize {
        self.pages.iter().map(|p| p.load.failed()).sum()
    }
}

/// Per-page fragment sources: the page's directory on disk, or the
/// configured base URL joined with the page path.
enum Sources {
    Disk,
    Http { client: Client, base: String },
}

impl Sources {
    fn from_config(config: &SiteConfig) -> Result<Self, SiteError> {
        Ok(match &config.fetch.base_url {
            Some(base) => Sources::Http {
                client: HttpSource::client(config.fetch.timeout())?,
                base: base.clone(),
            },
            None => Sources::Disk,
        })
    }

    fn for_page(&self, page_dir: &Path, rel: &str) -> Result<Box<dyn FragmentSource>, SiteError> {
        Ok(match self {
            Sources::Disk => Box::new(DirSource::new(page_dir)),
            Sources::Http { client, base } => {
                Box::new(HttpSource::for_page(client.clone(), base, rel)?)
            }
        })
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Assemble every page under `root` into `out`.
pub fn assemble_site(root: &Path, out: &Path, config: &SiteConfig) -> Result<SiteReport, SiteError> {
    fs::create_dir_all(out)?;
    let out_canonical = out.canonicalize()?;
    let components = root.join(&config.site.components_dir);

    let loader = FragmentLoader::from_config(&config.fetch);
    let sources = Sources::from_config(config)?;
    let mut report = SiteReport::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if is_hidden(entry) {
                return false;
            }
            if entry.file_type().is_dir() {
                let path = entry.path();
                if path == components
                    || path.canonicalize().is_ok_and(|p| p == out_canonical)
                {
                    debug!(dir = %path.display(), "skipping directory");
                    return false;
                }
            }
            true
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(rel) = relative_path(root, path) else {
            continue;
        };
        if rel == config::CONFIG_FILE {
            continue;
        }
        let dest = out.join(&rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let is_html = path.extension().is_some_and(|e| e == "html");
        if !is_html {
            fs::copy(path, &dest)?;
            report.copied.push(rel);
            continue;
        }

        let html = fs::read_to_string(path)?;
        let page = Page::parse(&html);
        if page.slot_names().is_empty() {
            debug!(page = %rel, "no placeholders, copying as-is");
            fs::write(&dest, html)?;
            report.copied.push(rel);
            continue;
        }

        let page_dir = path.parent().unwrap_or(root);
        let source = sources.for_page(page_dir, &rel)?;
        let (assembled, page_report) = assemble_page(page, &rel, &loader, source.as_ref(), config);
        fs::write(&dest, assembled)?;
        info!(
            page = %rel,
            fragments = page_report.load.injected(),
            failed = page_report.load.failed(),
            "page assembled"
        );
        report.pages.push(page_report);
    }

    Ok(report)
}

/// Load a page's fragments, then wire its effects and load hints.
pub fn assemble_page(
    mut page: Page,
    rel: &str,
    loader: &FragmentLoader,
    source: &dyn FragmentSource,
    config: &SiteConfig,
) -> (String, PageReport) {
    let registry = FragmentRegistry::for_page(
        &config.fragments,
        &format!("/{rel}"),
        &config.site.nested_marker,
    );
    let load = loader.load_all(&registry, source, &mut page);

    // Every fragment has settled: the page is final from here on.
    let (html, effects) = wire_effects(&page.render(), &config.effects);
    let (html, lazy_images) = add_lazy_loading(&html);
    let html = inject_preload_hints(&html, &critical_resources(&registry));

    let report = PageReport {
        path: rel.to_string(),
        depth: registry.depth(),
        load,
        effects,
        lazy_images,
    };
    (html, report)
}

/// Write a standalone page for every catalog project that has none yet.
/// Returns the ids of the pages written.
pub fn scaffold_project_pages(
    root: &Path,
    config: &SiteConfig,
    catalog: &ProjectCatalog,
) -> Result<Vec<String>, SiteError> {
    let dir = root.join(&config.site.nested_marker);
    let mut written = Vec::new();
    for project in catalog.all_projects() {
        if dir.join(format!("{}.html", project.id)).exists() {
            continue;
        }
        write_project_page(project, &dir)?;
        written.push(project.id.clone());
    }
    Ok(written)
}
