//! The shared project modal.
//!
//! One overlay serves both the project detail view and the all-projects
//! gallery. Its state is explicit ([`ModalState`]) instead of being inferred
//! from a style property, and visibility is derived from it.
//!
//! ## Dismiss Binding
//!
//! Replacing the modal's content detaches whatever was bound to the old close
//! control. Every content replacement therefore bumps a generation counter,
//! and the dismiss binding only works while it belongs to the current
//! generation. The `show_*` methods always rebind; [`Modal::replace_content`]
//! on its own does not, which leaves the close control inert until
//! [`Modal::bind_dismiss`] is called.

use maud::Markup;
use tracing::debug;

/// What the modal is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    /// Detail view for the project with this id.
    ShowingDetail(String),
    ShowingGallery,
}

#[derive(Debug, Clone, Default)]
pub struct Modal {
    state: ModalState,
    content: String,
    generation: u64,
    dismiss_bound_to: Option<u64>,
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != ModalState::Closed
    }

    /// The markup currently inside `.modal-content`.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content without changing visibility or rebinding.
    pub fn replace_content(&mut self, markup: Markup) {
        self.content = markup.into_string();
        self.generation += 1;
    }

    /// Bind the dismiss control of the current content.
    pub fn bind_dismiss(&mut self) {
        self.dismiss_bound_to = Some(self.generation);
    }

    pub fn dismiss_bound(&self) -> bool {
        self.dismiss_bound_to == Some(self.generation)
    }

    /// Show a project's detail view, replacing whatever was shown.
    pub fn show_detail(&mut self, project_id: &str, markup: Markup) {
        self.replace_content(markup);
        self.bind_dismiss();
        self.state = ModalState::ShowingDetail(project_id.to_string());
    }

    /// Show the gallery, replacing whatever was shown.
    pub fn show_gallery(&mut self, markup: Markup) {
        self.replace_content(markup);
        self.bind_dismiss();
        self.state = ModalState::ShowingGallery;
    }

    /// Activate the close control. Returns whether the modal closed.
    pub fn dismiss(&mut self) -> bool {
        if !self.dismiss_bound() {
            debug!("close control has no binding for the current content");
            return false;
        }
        self.close();
        true
    }

    /// A click on the backdrop outside the content closes the modal.
    pub fn click_backdrop(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.state = ModalState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::html;

    #[test]
    fn starts_closed_and_hidden() {
        let modal = Modal::new();
        assert_eq!(modal.state(), &ModalState::Closed);
        assert!(!modal.is_visible());
        assert!(modal.content().is_empty());
    }

    #[test]
    fn show_detail_makes_visible() {
        let mut modal = Modal::new();
        modal.show_detail("bbc-converter", html! { h1 { "BBC" } });
        assert_eq!(
            modal.state(),
            &ModalState::ShowingDetail("bbc-converter".to_string())
        );
        assert!(modal.is_visible());
        assert_eq!(modal.content(), "<h1>BBC</h1>");
    }

    #[test]
    fn gallery_replaces_detail() {
        let mut modal = Modal::new();
        modal.show_detail("bbc-converter", html! { h1 { "BBC" } });
        modal.show_gallery(html! { h2 { "All" } });
        assert_eq!(modal.state(), &ModalState::ShowingGallery);
        assert_eq!(modal.content(), "<h2>All</h2>");
    }

    #[test]
    fn dismiss_works_after_every_replacement() {
        let mut modal = Modal::new();
        modal.show_detail("a", html! { "a" });
        assert!(modal.dismiss());
        assert!(!modal.is_visible());

        modal.show_gallery(html! { "g" });
        assert!(modal.dismiss());

        modal.show_detail("b", html! { "b" });
        modal.show_detail("c", html! { "c" });
        assert!(modal.dismiss());
        assert_eq!(modal.state(), &ModalState::Closed);
    }

    #[test]
    fn raw_replacement_detaches_dismiss() {
        let mut modal = Modal::new();
        modal.show_detail("a", html! { "a" });
        modal.replace_content(html! { "other" });

        assert!(!modal.dismiss_bound());
        assert!(!modal.dismiss());
        assert!(modal.is_visible());

        modal.bind_dismiss();
        assert!(modal.dismiss());
    }

    #[test]
    fn backdrop_click_closes_without_binding() {
        let mut modal = Modal::new();
        modal.show_gallery(html! { "g" });
        modal.replace_content(html! { "x" });
        modal.click_backdrop();
        assert!(!modal.is_visible());
    }
}
