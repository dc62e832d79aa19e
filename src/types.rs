//! Shared types used across the loader, catalog, renderer and templates.
//!
//! [`ProjectRecord`] is serialized both ways: it is read from `[[projects]]`
//! in `folio.toml` and written by `projects --json` and `quick-setup`.

use serde::{Deserialize, Serialize};

/// A portfolio project as shown on cards, in the modal and on its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectRecord {
    /// Unique identifier, also the stem of `projects/{id}.html`.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Technology tags in display order. The first one is the "primary" tech.
    #[serde(alias = "tech")]
    pub technologies: Vec<String>,
    /// Short badge labels, e.g. `"4 Vulnerabilities"`.
    pub stats: Vec<String>,
    /// Icon class list, e.g. `"fas fa-shield-alt"`.
    pub icon: String,
    #[serde(default)]
    pub featured: bool,
    /// Folder name appended to the repository base URL.
    #[serde(alias = "folder")]
    pub repository_folder: String,
    /// Long-form markdown shown on the project page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProjectRecord {
    /// The first technology tag, if any.
    pub fn primary_technology(&self) -> Option<&str> {
        self.technologies.first().map(String::as_str)
    }
}

/// Where a page sits relative to the site root.
///
/// Only one level of nesting exists: pages inside the subdirectory named by
/// `site.nested_marker` (default `projects/`) reach shared resources via `../`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDepth {
    TopLevel,
    Nested,
}

impl PageDepth {
    /// Detect depth from a navigable path such as `/projects/bbc.html`.
    ///
    /// Both separators are accepted so Windows-style paths behave the same.
    pub fn detect(path: &str, marker: &str) -> Self {
        let slash = format!("/{marker}/");
        let backslash = format!("\\{marker}\\");
        if path.contains(&slash) || path.contains(&backslash) {
            PageDepth::Nested
        } else {
            PageDepth::TopLevel
        }
    }

    /// Relative prefix that reaches the site root from this depth.
    pub fn base_prefix(self) -> &'static str {
        match self {
            PageDepth::TopLevel => "",
            PageDepth::Nested => "../",
        }
    }

    pub fn is_nested(self) -> bool {
        self == PageDepth::Nested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_nested_unix_path() {
        assert_eq!(
            PageDepth::detect("/projects/bbc-converter.html", "projects"),
            PageDepth::Nested
        );
    }

    #[test]
    fn detect_nested_windows_path() {
        assert_eq!(
            PageDepth::detect("C:\\site\\projects\\wiki.html", "projects"),
            PageDepth::Nested
        );
    }

    #[test]
    fn detect_top_level() {
        assert_eq!(PageDepth::detect("/index.html", "projects"), PageDepth::TopLevel);
        // Marker must be a whole path component
        assert_eq!(
            PageDepth::detect("/my-projects.html", "projects"),
            PageDepth::TopLevel
        );
    }

    #[test]
    fn base_prefix_per_depth() {
        assert_eq!(PageDepth::TopLevel.base_prefix(), "");
        assert_eq!(PageDepth::Nested.base_prefix(), "../");
    }

    #[test]
    fn record_accepts_short_field_aliases() {
        let toml = r#"
id = "x"
title = "X"
description = "d"
tech = ["Rust"]
stats = []
icon = "fas fa-x"
folder = "x_repo"
"#;
        let record: ProjectRecord = toml::from_str(toml).unwrap();
        assert_eq!(record.technologies, vec!["Rust"]);
        assert_eq!(record.repository_folder, "x_repo");
        assert!(!record.featured);
        assert_eq!(record.primary_technology(), Some("Rust"));
    }
}
