//! Project navigation on top of the catalog, renderer and modal.
//!
//! [`PortfolioApp`] is constructed once with borrowed handles to the catalog
//! and config; nothing is looked up globally. It reacts to three inputs:
//!
//! - a project id ([`PortfolioApp::navigate_to_project`]),
//! - the "all projects" control ([`PortfolioApp::show_all_projects`]),
//! - a clicked card element ([`PortfolioApp::click`]), or every card of a
//!   page in turn ([`PortfolioApp::click_cards`], used by `folio preview`).
//!
//! A known project with a dedicated page (`projects/{id}.html`) navigates to
//! that page; otherwise its detail view opens in the modal. Unknown ids are
//! logged and leave the modal exactly as it was.

use crate::catalog::ProjectCatalog;
use crate::config::SiteConfig;
use crate::markup::{self, Tag};
use crate::modal::Modal;
use crate::render::{render_detail, render_gallery};
use crate::source::FragmentSource;
use crate::types::ProjectRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, error};

static INLINE_HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"navigateToProject\('([^']+)'\)").expect("handler pattern is valid")
});

const ADD_MORE_CLASS: &str = "add-more";
const CARD_CLASS: &str = "project-card";

/// Where a navigation request ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// A dedicated page exists; navigate to this relative URL.
    Page(String),
    /// The project's detail view is open in the modal.
    Detail,
    /// The all-projects gallery is open in the modal.
    Gallery,
    /// No project with that id; nothing changed.
    NotFound,
}

/// Project id carried by a card element.
///
/// `data-project-id` is the supported mechanism. Cards still using an inline
/// `onclick="navigateToProject('id')"` handler are read as a fallback.
pub fn card_project_id(tag: &Tag<'_>) -> Option<String> {
    if let Some(id) = tag.attr("data-project-id").filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }
    let handler = tag.attr("onclick")?;
    INLINE_HANDLER_RE
        .captures(handler)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub struct PortfolioApp<'a> {
    catalog: &'a ProjectCatalog,
    config: &'a SiteConfig,
    pages: Option<&'a dyn FragmentSource>,
    modal: Modal,
}

impl<'a> PortfolioApp<'a> {
    pub fn new(catalog: &'a ProjectCatalog, config: &'a SiteConfig) -> Self {
        Self {
            catalog,
            config,
            pages: None,
            modal: Modal::new(),
        }
    }

    /// Check this source for dedicated project pages before falling back to
    /// the modal.
    pub fn with_pages(mut self, pages: &'a dyn FragmentSource) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut Modal {
        &mut self.modal
    }

    /// Relative URL of a project's dedicated page.
    pub fn project_page_url(&self, id: &str) -> String {
        format!("{}/{id}.html", self.config.site.nested_marker)
    }

    pub fn navigate_to_project(&mut self, id: &str) -> Navigation {
        let catalog = self.catalog;
        let Some(project) = catalog.get_project(id) else {
            error!(project = %id, "project not found");
            return Navigation::NotFound;
        };

        let url = self.project_page_url(id);
        if self.pages.is_some_and(|pages| pages.exists(&url)) {
            debug!(project = %id, %url, "dedicated page available");
            return Navigation::Page(url);
        }

        self.show_project_modal(project);
        Navigation::Detail
    }

    /// Render a resolved project into the modal.
    pub fn show_project_modal(&mut self, project: &ProjectRecord) {
        let markup = render_detail(project, &self.config.links);
        self.modal.show_detail(&project.id, markup);
    }

    pub fn show_all_projects(&mut self) -> Navigation {
        let markup = render_gallery(self.catalog.all_projects(), &self.config.gallery);
        self.modal.show_gallery(markup);
        Navigation::Gallery
    }

    /// Handle a click on an element. Returns `None` when the element is not
    /// a project card, or is a card without a recoverable id.
    pub fn click(&mut self, tag: &Tag<'_>) -> Option<Navigation> {
        if tag.has_class(ADD_MORE_CLASS) {
            return Some(self.show_all_projects());
        }
        if !tag.has_class(CARD_CLASS) {
            return None;
        }
        match card_project_id(tag) {
            Some(id) => Some(self.navigate_to_project(&id)),
            None => {
                debug!("project card without an id");
                None
            }
        }
    }

    /// Click every card on a page in document order, closing the modal
    /// through its backdrop after each one.
    ///
    /// Returns the card's project id (`"all projects"` for the gallery card)
    /// and where the click led. Cards without an id are skipped.
    pub fn click_cards(&mut self, html: &str) -> Vec<(String, Navigation)> {
        let mut clicked = Vec::new();
        for tag in markup::tags(html).filter(|t| t.is_start()) {
            let Some(nav) = self.click(&tag) else {
                continue;
            };
            let label = if tag.has_class(ADD_MORE_CLASS) {
                "all projects".to_string()
            } else {
                card_project_id(&tag).unwrap_or_default()
            };
            if self.modal.is_visible() {
                self.modal.click_backdrop();
            }
            clicked.push((label, nav));
        }
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::tags;
    use crate::modal::ModalState;
    use crate::test_helpers::MockSource;

    fn first_tag(html: &str) -> Tag<'_> {
        tags(html).next().unwrap()
    }

    fn fixtures() -> (ProjectCatalog, SiteConfig) {
        (ProjectCatalog::seed(), SiteConfig::default())
    }

    #[test]
    fn known_project_opens_detail() {
        let (catalog, config) = fixtures();
        let mut app = PortfolioApp::new(&catalog, &config);

        assert_eq!(app.navigate_to_project("wiki-table"), Navigation::Detail);
        assert!(app.modal().is_visible());
        assert_eq!(
            app.modal().state(),
            &ModalState::ShowingDetail("wiki-table".to_string())
        );
        assert!(app.modal().content().contains("Wikipedia Table Extractor"));
    }

    #[test]
    fn unknown_project_leaves_modal_unchanged() {
        let (catalog, config) = fixtures();
        let mut app = PortfolioApp::new(&catalog, &config);

        assert_eq!(app.navigate_to_project("not-real"), Navigation::NotFound);
        assert_eq!(app.modal().state(), &ModalState::Closed);

        app.show_all_projects();
        let before = app.modal().content().to_string();
        assert_eq!(app.navigate_to_project("not-real"), Navigation::NotFound);
        assert_eq!(app.modal().state(), &ModalState::ShowingGallery);
        assert_eq!(app.modal().content(), before);
    }

    #[test]
    fn dedicated_page_wins_over_modal() {
        let (catalog, config) = fixtures();
        let pages = MockSource::new().with("projects/bbc-converter.html", "<html></html>");
        let mut app = PortfolioApp::new(&catalog, &config).with_pages(&pages);

        assert_eq!(
            app.navigate_to_project("bbc-converter"),
            Navigation::Page("projects/bbc-converter.html".to_string())
        );
        assert!(!app.modal().is_visible());

        // No page for this one: modal fallback
        assert_eq!(app.navigate_to_project("thpt-scores"), Navigation::Detail);
    }

    #[test]
    fn gallery_lists_all_projects() {
        let (catalog, config) = fixtures();
        let mut app = PortfolioApp::new(&catalog, &config);
        assert_eq!(app.show_all_projects(), Navigation::Gallery);
        for project in catalog.all_projects() {
            assert!(app.modal().content().contains(&project.title));
        }
    }

    #[test]
    fn card_id_from_data_attribute() {
        let tag = first_tag(r#"<div class="project-card" data-project-id="vnexpress-news">"#);
        assert_eq!(card_project_id(&tag).as_deref(), Some("vnexpress-news"));
    }

    #[test]
    fn card_id_from_inline_handler_shim() {
        let tag = first_tag(r#"<div class="project-card" onclick="navigateToProject('bbc-converter')">"#);
        assert_eq!(card_project_id(&tag).as_deref(), Some("bbc-converter"));
    }

    #[test]
    fn data_attribute_takes_precedence() {
        let tag = first_tag(
            r#"<div class="project-card" data-project-id="wiki-table" onclick="navigateToProject('bbc-converter')">"#,
        );
        assert_eq!(card_project_id(&tag).as_deref(), Some("wiki-table"));
    }

    #[test]
    fn click_dispatches_cards() {
        let (catalog, config) = fixtures();
        let mut app = PortfolioApp::new(&catalog, &config);

        let card = first_tag(r#"<div class="project-card" data-project-id="thpt-scores">"#);
        assert_eq!(app.click(&card), Some(Navigation::Detail));

        let more = first_tag(r#"<div class="project-card add-more">"#);
        assert_eq!(app.click(&more), Some(Navigation::Gallery));

        let other = first_tag(r#"<div class="capability-card" data-project-id="x">"#);
        assert_eq!(app.click(&other), None);

        let anonymous = first_tag(r#"<div class="project-card">"#);
        assert_eq!(app.click(&anonymous), None);
        assert_eq!(app.modal().state(), &ModalState::ShowingGallery);
    }

    #[test]
    fn dismiss_after_navigation() {
        let (catalog, config) = fixtures();
        let mut app = PortfolioApp::new(&catalog, &config);
        app.navigate_to_project("automation-testing");
        assert!(app.modal_mut().dismiss());
        app.show_all_projects();
        assert!(app.modal_mut().dismiss());
        assert!(!app.modal().is_visible());
    }

    #[test]
    fn click_cards_walks_page_in_order() {
        let (catalog, config) = fixtures();
        let mut app = PortfolioApp::new(&catalog, &config);

        let clicked = app.click_cards(crate::test_helpers::INDEX_HTML);

        assert_eq!(
            clicked,
            vec![
                ("wiki-table".to_string(), Navigation::Detail),
                ("all projects".to_string(), Navigation::Gallery),
            ]
        );
        assert!(!app.modal().is_visible());
    }
}
