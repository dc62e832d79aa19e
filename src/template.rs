//! Standalone project pages and quick project scaffolding.
//!
//! [`render_project_page`] produces the `projects/{id}.html` page for a
//! catalog record. The page lives one level deep, so every shared resource is
//! referenced through `../`, and the header and footer come in through the
//! usual placeholders when the page is assembled.
//!
//! [`quick_setup`] builds a new [`ProjectRecord`] from a [`ProjectType`]
//! preset, ready to be added under `[[projects]]` in `folio.toml`.

use crate::types::ProjectRecord;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown project type {0:?} (expected one of: {1})")]
    UnknownType(String, String),
    #[error("project id must not be empty")]
    EmptyId,
}

const DEFAULT_DATE: &str = "December 2024";
const DEFAULT_FEATURE: &str = "Advanced automation capabilities";
const STAT_ICONS: &[&str] = &["users", "shield-virus", "file-csv", "check-circle"];

/// Presets for a new project: icon, category, default technologies and
/// features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectType {
    #[default]
    WebScraping,
    SecurityTesting,
    DataAnalysis,
    Automation,
}

impl ProjectType {
    pub const ALL: [ProjectType; 4] = [
        ProjectType::WebScraping,
        ProjectType::SecurityTesting,
        ProjectType::DataAnalysis,
        ProjectType::Automation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ProjectType::WebScraping => "web-scraping",
            ProjectType::SecurityTesting => "security-testing",
            ProjectType::DataAnalysis => "data-analysis",
            ProjectType::Automation => "automation",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ProjectType::WebScraping => "fas fa-spider",
            ProjectType::SecurityTesting => "fas fa-shield-alt",
            ProjectType::DataAnalysis => "fas fa-chart-line",
            ProjectType::Automation => "fas fa-robot",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            ProjectType::WebScraping => "Web Scraping",
            ProjectType::SecurityTesting => "Security Testing",
            ProjectType::DataAnalysis => "Data Analysis",
            ProjectType::Automation => "Process Automation",
        }
    }

    pub fn default_technologies(self) -> &'static [&'static str] {
        match self {
            ProjectType::WebScraping => &["Python", "BeautifulSoup", "Selenium"],
            ProjectType::SecurityTesting => &["Python", "Playwright", "Security Tools"],
            ProjectType::DataAnalysis => &["Python", "Pandas", "Visualization"],
            ProjectType::Automation => &["Python", "Automation Tools", "APIs"],
        }
    }

    pub fn default_features(self) -> &'static [&'static str] {
        match self {
            ProjectType::WebScraping => &[
                "Advanced web scraping capabilities",
                "Data extraction & processing",
                "Export to structured formats",
                "Error handling & retry logic",
            ],
            ProjectType::SecurityTesting => &[
                "Vulnerability assessment",
                "Automated penetration testing",
                "Security reporting",
                "Evidence collection",
            ],
            ProjectType::DataAnalysis => &[
                "Large dataset processing",
                "Statistical analysis",
                "Data visualization",
                "Insights generation",
            ],
            ProjectType::Automation => &[
                "End-to-end automation",
                "Task scheduling",
                "Monitoring & alerting",
                "Scalable architecture",
            ],
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProjectType {
    type Err = TemplateError;

    /// Accepts the kebab-case key (`web-scraping`) or the camelCase form
    /// (`webScraping`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        ProjectType::ALL
            .into_iter()
            .find(|t| t.key().replace('-', "") == normalized)
            .ok_or_else(|| {
                let expected: Vec<&str> = ProjectType::ALL.iter().map(|t| t.key()).collect();
                TemplateError::UnknownType(s.to_string(), expected.join(", "))
            })
    }
}

/// A new featured project record from a type preset. `technologies`
/// overrides the preset's defaults when given.
pub fn quick_setup(
    id: &str,
    title: &str,
    description: &str,
    technologies: Option<Vec<String>>,
    kind: ProjectType,
) -> Result<ProjectRecord, TemplateError> {
    if id.is_empty() {
        return Err(TemplateError::EmptyId);
    }
    let technologies = technologies
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| to_strings(kind.default_technologies()));
    Ok(ProjectRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        technologies,
        stats: Vec::new(),
        icon: kind.icon().to_string(),
        featured: true,
        repository_folder: id.replacen('-', "_", 1),
        overview: None,
        features: to_strings(kind.default_features()),
        date: None,
        category: Some(kind.category().to_string()),
    })
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Split a stat badge into its leading number and the rest of the label:
/// `"4 Vulnerabilities"` becomes `("4", "Vulnerabilities")`.
pub fn split_stat(stat: &str) -> (&str, &str) {
    match stat.split_once(' ') {
        Some((number, label)) => (number, label.trim()),
        None => (stat, ""),
    }
}

fn markdown_to_html(source: &str) -> String {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(source));
    out
}

/// Renders the standalone page for one project.
pub fn render_project_page(project: &ProjectRecord) -> Markup {
    let overview = match &project.overview {
        Some(md) => PreEscaped(markdown_to_html(md)),
        None => PreEscaped(html! { p { (project.description) } }.into_string()),
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (project.title) " - Project Details" }
                link rel="stylesheet" href="../assets/css/main.css";
                link rel="stylesheet" href="../assets/css/project-detail.css";
            }
            body {
                div #header-placeholder {}
                main.main {
                    div.container {
                        (project_hero(project))
                        section.project-section {
                            h2 { i.fas.fa-info-circle {} " Project Overview" }
                            div.overview-grid {
                                div.overview-content {
                                    (overview)
                                    h3 { "Key Features:" }
                                    ul.feature-list {
                                        @if project.features.is_empty() {
                                            li { i.fas.fa-check {} " " (DEFAULT_FEATURE) }
                                        }
                                        @for feature in &project.features {
                                            li { i.fas.fa-check {} " " (feature) }
                                        }
                                    }
                                }
                                (stats_panel(&project.stats))
                            }
                        }
                        (tech_showcase(&project.technologies))
                    }
                }
                div #footer-placeholder {}
                script src="../assets/js/main.js" {}
            }
        }
    }
}

fn project_hero(project: &ProjectRecord) -> Markup {
    html! {
        section.project-hero {
            div.project-hero-content {
                div.project-breadcrumb {
                    a href="../index.html" { i.fas.fa-home {} " Home" }
                    span { i.fas.fa-chevron-right {} }
                    span { "Projects" }
                    span { i.fas.fa-chevron-right {} }
                    span { (project.title) }
                }
                div.project-title-section {
                    div.project-icon-hero { i class=(project.icon) {} }
                    div.project-title-content {
                        h1 { (project.title) }
                        p.project-tagline { (project.description) }
                        div.project-meta {
                            span.meta-item {
                                i.fas.fa-calendar {} " "
                                (project.date.as_deref().unwrap_or(DEFAULT_DATE))
                            }
                            @if let Some(tech) = project.primary_technology() {
                                span.meta-item { i.fas.fa-code {} " " (tech) }
                            }
                            span.meta-item {
                                i.fas.fa-tag {} " "
                                (project.category.as_deref().unwrap_or(ProjectType::default().category()))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn stats_panel(stats: &[String]) -> Markup {
    html! {
        div.project-stats-panel {
            @for (index, stat) in stats.iter().enumerate() {
                @let (number, label) = split_stat(stat);
                div.stat-card {
                    i class={ "fas fa-" (STAT_ICONS.get(index).copied().unwrap_or("star")) } {}
                    span.stat-number { (number) }
                    span.stat-label { (label) }
                }
            }
        }
    }
}

fn tech_showcase(technologies: &[String]) -> Markup {
    html! {
        section.project-section {
            h2 { i.fas.fa-cogs {} " Technical Implementation" }
            div.tech-showcase {
                @for tech in technologies {
                    div.tech-item {
                        div.tech-icon { i class={ "fab fa-" (tech.to_lowercase()) } {} }
                        h3 { (tech) }
                    }
                }
            }
        }
    }
}

/// Render a project page and write it under `out_dir`, returning the path
/// written.
pub fn write_project_page(
    project: &ProjectRecord,
    out_dir: &Path,
) -> Result<PathBuf, TemplateError> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}.html", project.id));
    std::fs::write(&path, render_project_page(project).into_string())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProjectCatalog;
    use crate::page::Page;

    fn bbc() -> ProjectRecord {
        ProjectCatalog::seed()
            .get_project("bbc-converter")
            .cloned()
            .unwrap()
    }

    #[test]
    fn page_has_fragment_placeholders_and_nested_assets() {
        let html = render_project_page(&bbc()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        let page = Page::parse(&html);
        assert!(page.has_slot("header"));
        assert!(page.has_slot("footer"));
        assert!(html.contains(r#"href="../assets/css/main.css""#));
        assert!(html.contains(r#"href="../index.html""#));
    }

    #[test]
    fn features_fall_back_to_a_single_default() {
        let html = render_project_page(&bbc()).into_string();
        assert!(html.contains(DEFAULT_FEATURE));
        assert_eq!(html.matches("fa-check").count(), 1);
    }

    #[test]
    fn overview_markdown_is_rendered() {
        let mut project = bbc();
        project.overview = Some("Converts **feeds** to CSV.".to_string());
        let html = render_project_page(&project).into_string();
        assert!(html.contains("<strong>feeds</strong>"));
    }

    #[test]
    fn description_is_escaped_when_no_overview() {
        let mut project = bbc();
        project.description = "a < b".to_string();
        let html = render_project_page(&project).into_string();
        assert!(html.contains("<p>a &lt; b</p>"));
    }

    #[test]
    fn stats_split_into_number_and_label() {
        assert_eq!(split_stat("4 Vulnerabilities"), ("4", "Vulnerabilities"));
        assert_eq!(split_stat("100% Accuracy Rate"), ("100%", "Accuracy Rate"));
        assert_eq!(split_stat("Realtime"), ("Realtime", ""));

        let mut project = bbc();
        project.stats = vec!["4 Vulnerabilities".to_string(), "9 Things".to_string()];
        let html = render_project_page(&project).into_string();
        assert!(html.contains(r#"<span class="stat-number">4</span>"#));
        assert!(html.contains("fa-users"));
        assert!(html.contains("fa-shield-virus"));
    }

    #[test]
    fn meta_defaults() {
        let html = render_project_page(&bbc()).into_string();
        assert!(html.contains(DEFAULT_DATE));
    }

    #[test]
    fn quick_setup_uses_preset() {
        let record = quick_setup(
            "price-tracker-bot",
            "Price Tracker",
            "Tracks prices",
            None,
            ProjectType::Automation,
        )
        .unwrap();
        assert_eq!(record.repository_folder, "price_tracker-bot");
        assert_eq!(record.icon, "fas fa-robot");
        assert_eq!(record.category.as_deref(), Some("Process Automation"));
        assert_eq!(record.technologies, vec!["Python", "Automation Tools", "APIs"]);
        assert_eq!(record.features.len(), 4);
        assert!(record.featured);
    }

    #[test]
    fn quick_setup_tech_override() {
        let record = quick_setup(
            "x",
            "X",
            "d",
            Some(vec!["Rust".to_string()]),
            ProjectType::default(),
        )
        .unwrap();
        assert_eq!(record.technologies, vec!["Rust"]);
        assert_eq!(record.category.as_deref(), Some("Web Scraping"));
    }

    #[test]
    fn quick_setup_rejects_empty_id() {
        assert!(matches!(
            quick_setup("", "t", "d", None, ProjectType::default()),
            Err(TemplateError::EmptyId)
        ));
    }

    #[test]
    fn project_type_parsing() {
        assert_eq!("webScraping".parse::<ProjectType>().unwrap(), ProjectType::WebScraping);
        assert_eq!(
            "security-testing".parse::<ProjectType>().unwrap(),
            ProjectType::SecurityTesting
        );
        assert_eq!("data_analysis".parse::<ProjectType>().unwrap(), ProjectType::DataAnalysis);
        assert!("gardening".parse::<ProjectType>().is_err());
    }

    #[test]
    fn writes_page_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_project_page(&bbc(), &tmp.path().join("projects")).unwrap();
        assert!(path.ends_with("projects/bbc-converter.html"));
        assert!(std::fs::read_to_string(path).unwrap().contains("BBC"));
    }
}
