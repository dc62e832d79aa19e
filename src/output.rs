//! CLI output formatting.
//!
//! Output is content-first: every entity leads with its identity (page path,
//! project title) and the details follow as indented context lines.
//!
//! # Output Format
//!
//! ## Assemble
//!
//! ```text
//! index.html
//!     header: injected
//!     intro: FAILED (components/intro.html: No such file or directory)
//!     Effects: 2 counters, typing, 4 reveal targets
//! projects/bbc-converter.html (nested)
//!     header: injected
//!     Effects: 1 code block (1 copy button added)
//!
//! Copied 3 files
//! Assembled 2 pages, 1 fragment failed
//! ```
//!
//! ## Projects
//!
//! ```text
//! 001 Altoro Bank Security Audit [featured]
//!     Id: automation-testing
//!     Tech: Python, Playwright, Security Testing
//!     Comprehensive security testing & automation suite for banking...
//! ```
//!
//! ## Preview
//!
//! ```text
//! Counters
//!     5 (125 frames)
//!     120 (125 frames)
//! Reveals: 0ms, 100ms
//! Lazy content: 1 element loaded
//! Cards
//!     wiki-table: detail
//!     all projects: gallery
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::app::Navigation;
use crate::effects::{EffectWiring, ViewportPass};
use crate::loader::{FragmentOutcome, LoadReport};
use crate::render::truncate_chars;
use crate::site::SiteReport;
use crate::types::{PageDepth, ProjectRecord};

const SUMMARY_CHARS: usize = 72;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Fragment loading
// ============================================================================

/// One line per fragment that was actually placed or failed. Fragments the
/// page has no placeholder for are left out.
pub fn format_load_report(report: &LoadReport) -> Vec<String> {
    report
        .fragments
        .iter()
        .filter_map(|f| match &f.outcome {
            FragmentOutcome::Injected => Some(format!("{}: injected", f.name)),
            FragmentOutcome::Fallback { shown: true, error } => {
                Some(format!("{}: FAILED ({}: {})", f.name, f.path, error))
            }
            FragmentOutcome::Fallback { shown: false, .. } | FragmentOutcome::NoPlaceholder => None,
        })
        .collect()
}

fn format_effects(effects: &EffectWiring) -> Option<String> {
    let mut parts = Vec::new();
    if !effects.counters.is_empty() {
        parts.push(plural(effects.counters.len(), "counter"));
    }
    if effects.typing {
        parts.push("typing".to_string());
    }
    if effects.reveal_targets > 0 {
        parts.push(plural(effects.reveal_targets, "reveal target"));
    }
    if effects.lazy_targets > 0 {
        parts.push(plural(effects.lazy_targets, "lazy target"));
    }
    if effects.code_blocks > 0 {
        let mut code = plural(effects.code_blocks, "code block");
        if effects.copy_buttons_added > 0 {
            code.push_str(&format!(
                " ({} added)",
                plural(effects.copy_buttons_added, "copy button")
            ));
        }
        parts.push(code);
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("Effects: {}", parts.join(", ")))
    }
}

// ============================================================================
// Site assembly
// ============================================================================

pub fn format_site_output(report: &SiteReport) -> Vec<String> {
    let mut lines = Vec::new();

    for page in &report.pages {
        match page.depth {
            PageDepth::Nested => lines.push(format!("{} (nested)", page.path)),
            PageDepth::TopLevel => lines.push(page.path.clone()),
        }
        for line in format_load_report(&page.load) {
            lines.push(format!("{}{}", indent(1), line));
        }
        if let Some(effects) = format_effects(&page.effects) {
            lines.push(format!("{}{}", indent(1), effects));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    if !report.copied.is_empty() {
        lines.push(format!("Copied {}", plural(report.copied.len(), "file")));
    }

    let failed = report.fragments_failed();
    let mut summary = format!("Assembled {}", plural(report.pages.len(), "page"));
    if failed > 0 {
        summary.push_str(&format!(", {} failed", plural(failed, "fragment")));
    }
    lines.push(summary);
    lines
}

pub fn print_site_output(report: &SiteReport) {
    for line in format_site_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

fn format_navigation(nav: &Navigation) -> String {
    match nav {
        Navigation::Page(url) => format!("page {url}"),
        Navigation::Detail => "detail".to_string(),
        Navigation::Gallery => "gallery".to_string(),
        Navigation::NotFound => "not found".to_string(),
    }
}

pub fn format_preview(pass: &ViewportPass, cards: &[(String, Navigation)]) -> Vec<String> {
    let mut lines = Vec::new();
    if !pass.counters.is_empty() {
        lines.push("Counters".to_string());
        for (target, frames) in &pass.counters {
            lines.push(format!("{}{target} ({})", indent(1), plural(*frames, "frame")));
        }
    }
    if !pass.reveal_delays.is_empty() {
        let delays: Vec<String> = pass
            .reveal_delays
            .iter()
            .map(|d| format!("{}ms", d.as_millis()))
            .collect();
        lines.push(format!("Reveals: {}", delays.join(", ")));
    }
    if pass.lazy_loaded > 0 {
        lines.push(format!(
            "Lazy content: {} loaded",
            plural(pass.lazy_loaded, "element")
        ));
    }
    if !cards.is_empty() {
        lines.push("Cards".to_string());
        for (label, nav) in cards {
            lines.push(format!("{}{label}: {}", indent(1), format_navigation(nav)));
        }
    }
    if lines.is_empty() {
        lines.push("No effects or project cards".to_string());
    }
    lines
}

pub fn print_preview(pass: &ViewportPass, cards: &[(String, Navigation)]) {
    for line in format_preview(pass, cards) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub fn format_projects<'a>(projects: impl IntoIterator<Item = &'a ProjectRecord>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, project) in projects.into_iter().enumerate() {
        let mut header = format!("{} {}", format_index(i + 1), project.title);
        if project.featured {
            header.push_str(" [featured]");
        }
        lines.push(header);
        lines.push(format!("{}Id: {}", indent(1), project.id));
        if !project.technologies.is_empty() {
            lines.push(format!(
                "{}Tech: {}",
                indent(1),
                project.technologies.join(", ")
            ));
        }
        lines.push(format!(
            "{}{}",
            indent(1),
            truncate_chars(&project.description, SUMMARY_CHARS)
        ));
    }
    if lines.is_empty() {
        lines.push("No projects".to_string());
    }
    lines
}

pub fn print_projects<'a>(projects: impl IntoIterator<Item = &'a ProjectRecord>) {
    for line in format_projects(projects) {
        println!("{}", line);
    }
}
