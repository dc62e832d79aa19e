//! The project catalog.
//!
//! An ordered, read-only list of [`ProjectRecord`]s built once at startup,
//! either from the built-in seed or from `[[projects]]` in `folio.toml`.
//! There are no mutation operations; consumers borrow records.

use crate::types::ProjectRecord;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate project id: {0}")]
    DuplicateId(String),
    #[error("project at position {0} has an empty id")]
    EmptyId(usize),
}

#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    projects: Vec<ProjectRecord>,
}

impl ProjectCatalog {
    /// Build a catalog, rejecting empty or duplicate ids.
    pub fn new(projects: Vec<ProjectRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (pos, project) in projects.iter().enumerate() {
            if project.id.is_empty() {
                return Err(CatalogError::EmptyId(pos));
            }
            if !seen.insert(project.id.as_str()) {
                return Err(CatalogError::DuplicateId(project.id.clone()));
            }
        }
        Ok(Self { projects })
    }

    /// The built-in five-project catalog.
    pub fn seed() -> Self {
        Self {
            projects: seed_projects(),
        }
    }

    /// Exact id match; no partial matching.
    pub fn get_project(&self, id: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Featured records, in catalog order.
    pub fn featured_projects(&self) -> Vec<&ProjectRecord> {
        self.projects.iter().filter(|p| p.featured).collect()
    }

    pub fn all_projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

fn record(
    id: &str,
    title: &str,
    description: &str,
    technologies: &[&str],
    stats: &[&str],
    icon: &str,
    folder: &str,
) -> ProjectRecord {
    ProjectRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        technologies: technologies.iter().map(|s| s.to_string()).collect(),
        stats: stats.iter().map(|s| s.to_string()).collect(),
        icon: icon.to_string(),
        featured: true,
        repository_folder: folder.to_string(),
        overview: None,
        features: Vec::new(),
        date: None,
        category: None,
    }
}

/// Seed records, all featured.
pub fn seed_projects() -> Vec<ProjectRecord> {
    vec![
        record(
            "automation-testing",
            "Altoro Bank Security Audit",
            "Comprehensive security testing & automation suite for banking system vulnerability assessment",
            &["Python", "Playwright", "Security Testing"],
            &["4 Vulnerabilities", "16 CSV Exports"],
            "fas fa-shield-alt",
            "automation_demotestfire",
        ),
        record(
            "vnexpress-news",
            "VNExpress News Scraper",
            "Automated news category extraction & classification system for VNExpress.net",
            &["Python", "Selenium", "BeautifulSoup"],
            &["Categories", "CSV Export"],
            "fas fa-newspaper",
            "vnexpress_news",
        ),
        record(
            "bbc-converter",
            "BBC Article to DOCX",
            "Advanced web scraper converting BBC articles to formatted Word documents with images",
            &["Python", "BeautifulSoup", "python-docx"],
            &["Image Support", "DOCX Format"],
            "fas fa-file-word",
            "bbc",
        ),
        record(
            "wiki-table",
            "Wikipedia Table Extractor",
            "Automated Olympic medal table extraction and CSV export from Wikipedia",
            &["Python", "BeautifulSoup", "CSV Processing"],
            &["Olympic Data", "Table Parsing"],
            "fas fa-table",
            "table_wiki",
        ),
        record(
            "thpt-scores",
            "THPT Exam Score Crawler",
            "Mass data collection system for Vietnamese high school graduation exam results",
            &["Python", "Requests", "Mass Scraping"],
            &["Mass Data", "Analytics"],
            "fas fa-graduation-cap",
            "vnexpress_diemthi_thptqg",
        ),
    ]
}
