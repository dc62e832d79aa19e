//! Project markup rendering.
//!
//! Two views share the modal: the detail view for one project and the
//! all-projects gallery. Both are plain functions from records to [`Markup`];
//! the [`Modal`](crate::modal::Modal) owns injecting them.
//!
//! Uses [maud](https://maud.lambda.xyz/), so every interpolated record field
//! is escaped.

use crate::config::{GalleryConfig, LinksConfig};
use crate::types::ProjectRecord;
use maud::{Markup, html};

/// The dismiss control rendered at the top of every modal view.
pub fn close_control() -> Markup {
    html! {
        span.close role="button" aria-label="Close" { "×" }
    }
}

fn tech_tags(technologies: &[String]) -> Markup {
    html! {
        @for tech in technologies {
            span.tech-tag { (tech) }
        }
    }
}

/// Detail view for one project.
///
/// The overview copy is derived from the record: all technologies, the
/// primary one, and the stats joined with "and".
pub fn render_detail(project: &ProjectRecord, links: &LinksConfig) -> Markup {
    let all_tech = project.technologies.join(", ");
    let all_stats = project.stats.join(" and ");

    html! {
        (close_control())
        div.project-detail data-project-id=(project.id) {
            header.project-header {
                div.project-icon-large {
                    i class=(project.icon) {}
                }
                div.project-title-section {
                    h1 { (project.title) }
                    p.project-subtitle { (project.description) }
                    div.project-tech-tags { (tech_tags(&project.technologies)) }
                }
            }
            div.project-content {
                div.project-stats-detailed {
                    @for stat in &project.stats {
                        div.stat-badge { (stat) }
                    }
                }
                div.project-info {
                    h3 { "🎯 Project Overview" }
                    p { "This project demonstrates advanced " (all_tech) " skills in a real-world application." }
                    @if let Some(primary) = project.primary_technology() {
                        h3 { "🔧 Technical Implementation" }
                        p { "Built using modern " (primary) " practices with emphasis on scalability and maintainability." }
                    }
                    @if !project.stats.is_empty() {
                        h3 { "📊 Results & Impact" }
                        p { "Successfully delivered " (all_stats) " with high performance and reliability." }
                    }
                }
                div.project-actions {
                    a.btn.btn-primary href=(links.repository_url(&project.repository_folder))
                        target="_blank" rel="noopener" {
                        i.fab.fa-github {} " View Source"
                    }
                    a.btn.btn-outline href="#" data-action="live-demo" title="Live demo coming soon!" {
                        i.fas.fa-external-link-alt {} " Live Demo"
                    }
                }
            }
        }
    }
}

/// Truncate to `max` characters (not bytes), appending `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Summary card used in the gallery.
pub fn render_card(project: &ProjectRecord, gallery: &GalleryConfig) -> Markup {
    html! {
        div.project-card.modal-project-card data-project-id=(project.id) {
            div.project-image {
                i class={ (project.icon) " project-icon" } {}
            }
            div.project-content {
                h3 { (project.title) }
                p { (truncate_chars(&project.description, gallery.description_chars)) }
                div.tech-tags { (tech_tags(&project.technologies)) }
                div.project-stats {
                    @for stat in &project.stats {
                        span { i.fas.fa-star {} " " (stat) }
                    }
                }
            }
        }
    }
}

/// All-projects gallery: heading plus one card per record, in order.
pub fn render_gallery<'a>(
    projects: impl IntoIterator<Item = &'a ProjectRecord>,
    gallery: &GalleryConfig,
) -> Markup {
    html! {
        (close_control())
        h2 { i.fas.fa-th {} " All Projects Portfolio" }
        div.all-projects-grid {
            @for project in projects {
                (render_card(project, gallery))
            }
        }
    }
}
