//! Site configuration module.
//!
//! Handles loading, validating, and merging `folio.toml`. Stock defaults are
//! serialized to a TOML table and the user file is merged on top of it, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── folio.toml               # Optional, overrides stock defaults
//! ├── index.html
//! ├── components/
//! │   ├── header.html
//! │   └── ...
//! └── projects/
//!     └── bbc-converter.html
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! nested_marker = "projects"   # Pages under this directory reach assets via ../
//! components_dir = "components"
//!
//! [fetch]
//! # base_url = "http://localhost:8000/"  # Fetch fragments over HTTP instead of disk
//! # timeout_secs = 10                    # No timeout unless set
//! # max_parallel = 4                     # Concurrent fetches (default: all fragments at once)
//!
//! [[fragments]]
//! name = "header"
//! path = "components/header.html"
//!
//! [links]
//! repository_base = "https://github.com/vuduchoangs/"
//!
//! [gallery]
//! description_chars = 120
//!
//! [effects.typing]
//! phrases = ["Web Scraping", "Automation Testing"]
//! type_ms = 100
//! delete_ms = 50
//! hold_ms = 2000
//! start_delay_ms = 1000
//!
//! [effects.counter]
//! duration_ms = 2000
//! frame_ms = 16
//!
//! [effects.reveal]
//! stagger_ms = 100
//! classes = ["project-card", "capability-card", "skill-category"]
//!
//! [[projects]]
//! id = "automation-testing"
//! ...
//! ```
//!
//! Arrays (`fragments`, `projects`, phrase lists) replace the defaults as a
//! whole. Unknown keys are rejected to catch typos early.

use crate::catalog;
use crate::types::ProjectRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File name looked up in the site root.
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `folio.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page layout conventions.
    pub site: SiteSection,
    /// How fragments are fetched.
    pub fetch: FetchConfig,
    /// External link targets used by the renderer.
    pub links: LinksConfig,
    /// All-projects gallery options.
    pub gallery: GalleryConfig,
    /// Timings and targets for the page effects.
    pub effects: EffectsConfig,
    /// Fragments loaded into every page, in order.
    pub fragments: Vec<FragmentEntry>,
    /// The project catalog.
    pub projects: Vec<ProjectRecord>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteSection::default(),
            fetch: FetchConfig::default(),
            links: LinksConfig::default(),
            gallery: GalleryConfig::default(),
            effects: EffectsConfig::default(),
            fragments: default_fragments(),
            projects: catalog::seed_projects(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.nested_marker.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.nested_marker must not be empty".into(),
            ));
        }
        let mut names = HashSet::new();
        for fragment in &self.fragments {
            if fragment.name.is_empty() || fragment.path.is_empty() {
                return Err(ConfigError::Validation(
                    "fragments entries need a name and a path".into(),
                ));
            }
            if !names.insert(fragment.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate fragment name: {}",
                    fragment.name
                )));
            }
        }
        let mut ids = HashSet::new();
        for project in &self.projects {
            if !ids.insert(project.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate project id: {}",
                    project.id
                )));
            }
        }
        if self.effects.counter.duration_ms == 0 || self.effects.counter.frame_ms == 0 {
            return Err(ConfigError::Validation(
                "effects.counter durations must be non-zero".into(),
            ));
        }
        if self.fetch.max_parallel == Some(0) {
            return Err(ConfigError::Validation(
                "fetch.max_parallel must be at least 1".into(),
            ));
        }
        if let Some(base) = &self.fetch.base_url {
            if reqwest::Url::parse(base).is_err() {
                return Err(ConfigError::Validation(format!(
                    "fetch.base_url is not a valid URL: {base}"
                )));
            }
        }
        Ok(())
    }
}

/// Layout conventions of the site tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Directory name marking nested pages.
    pub nested_marker: String,
    /// Directory holding fragment files; skipped when assembling pages.
    pub components_dir: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            nested_marker: "projects".to_string(),
            components_dir: "components".to_string(),
        }
    }
}

/// Fragment fetch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Fetch over HTTP relative to this URL instead of reading from disk.
    /// It names the site directory; a missing trailing `/` is implied.
    pub base_url: Option<String>,
    /// Per-request timeout. Absent means no timeout.
    pub timeout_secs: Option<u64>,
    /// Maximum concurrent fetches. Absent means every fragment of a page is
    /// fetched at once.
    pub max_parallel: Option<usize>,
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Number of fetch workers for a page carrying `fragments` fragments.
///
/// Fetches wait on I/O, not CPU, so the core count plays no part:
/// - `None` → one worker per fragment, every fetch in flight at once
/// - `Some(n)` → `min(n, fragments)` (user can constrain down, not up)
pub fn fetch_width(max_parallel: Option<usize>, fragments: usize) -> usize {
    max_parallel
        .map_or(fragments, |n| n.min(fragments))
        .max(1)
}

/// A named fragment and its path relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentEntry {
    pub name: String,
    pub path: String,
}

impl FragmentEntry {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

/// The stock fragment list: header, footer, intro and the gallery modal.
pub fn default_fragments() -> Vec<FragmentEntry> {
    vec![
        FragmentEntry::new("header", "components/header.html"),
        FragmentEntry::new("footer", "components/footer.html"),
        FragmentEntry::new("intro", "components/intro.html"),
        FragmentEntry::new(
            "project-gallery-modal",
            "components/project-gallery-modal.html",
        ),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Prefix of every project's source repository link.
    pub repository_base: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            repository_base: "https://github.com/vuduchoangs/".to_string(),
        }
    }
}

impl LinksConfig {
    pub fn repository_url(&self, folder: &str) -> String {
        format!("{}{}", self.repository_base, folder)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Card descriptions longer than this many characters are truncated.
    pub description_chars: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            description_chars: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    pub typing: TypingConfig,
    pub counter: CounterConfig,
    pub reveal: RevealConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub type_ms: u64,
    pub delete_ms: u64,
    pub hold_ms: u64,
    pub start_delay_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "Web Scraping",
                "Automation Testing",
                "Data Analysis",
                "Automation Engineer",
                "Wireshark Analyst",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            type_ms: 100,
            delete_ms: 50,
            hold_ms: 2000,
            start_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    pub duration_ms: u64,
    pub frame_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            frame_ms: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub stagger_ms: u64,
    /// Elements carrying any of these classes fade in on first sight.
    pub classes: Vec<String>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            stagger_ms: 100,
            classes: ["project-card", "capability-card", "skill-category"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `folio.toml` in the given site root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILE))
}

/// Load config from an explicit file path. A missing file yields the defaults.
pub fn load_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `folio.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio-site configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
# Arrays ([[fragments]], [[projects]], phrase lists) replace the defaults as a whole.

# ---------------------------------------------------------------------------
# Site layout
# ---------------------------------------------------------------------------
[site]
# Pages inside this directory are "nested": fragment paths and header links
# get a ../ prefix.
nested_marker = "projects"

# Directory holding the fragment files. Skipped when assembling pages.
components_dir = "components"

# ---------------------------------------------------------------------------
# Fragment fetching
# ---------------------------------------------------------------------------
[fetch]
# Fetch fragments over HTTP, relative to each page's URL under this base,
# instead of reading them from disk.
# base_url = "http://localhost:8000/"

# Per-request timeout in seconds. No timeout when omitted.
# timeout_secs = 10

# Maximum concurrent fetches per page. Omit to fetch every fragment at once.
# max_parallel = 4

# ---------------------------------------------------------------------------
# Fragments injected into {name}-placeholder elements, in order
# ---------------------------------------------------------------------------
[[fragments]]
name = "header"
path = "components/header.html"

[[fragments]]
name = "footer"
path = "components/footer.html"

[[fragments]]
name = "intro"
path = "components/intro.html"

[[fragments]]
name = "project-gallery-modal"
path = "components/project-gallery-modal.html"

# ---------------------------------------------------------------------------
# Links
# ---------------------------------------------------------------------------
[links]
# "View Source" links are this prefix followed by the project's folder.
repository_base = "https://github.com/vuduchoangs/"

# ---------------------------------------------------------------------------
# All-projects gallery
# ---------------------------------------------------------------------------
[gallery]
# Card descriptions are cut to this many characters.
description_chars = 120

# ---------------------------------------------------------------------------
# Effects
# ---------------------------------------------------------------------------
[effects.typing]
phrases = ["Web Scraping", "Automation Testing", "Data Analysis", "Automation Engineer", "Wireshark Analyst"]
type_ms = 100          # Per typed character
delete_ms = 50         # Per deleted character
hold_ms = 2000         # Pause on a complete phrase
start_delay_ms = 1000  # Delay before the first character

[effects.counter]
duration_ms = 2000     # Time to count from 0 to the target
frame_ms = 16          # Frame cadence (~60fps)

[effects.reveal]
stagger_ms = 100       # Extra delay per element revealed in the same batch
classes = ["project-card", "capability-card", "skill-category"]

# ---------------------------------------------------------------------------
# Projects (replaces the built-in catalog when present)
# ---------------------------------------------------------------------------
# [[projects]]
# id = "your-project-id"
# title = "Your Project Title"
# description = "Brief project description"
# technologies = ["Tech1", "Tech2"]
# stats = ["Stat1", "Stat2"]
# icon = "fas fa-icon-name"
# featured = true
# repository_folder = "your_project_folder"
"##
}
