//! Header path rewriting for nested pages.
//!
//! The shared header is written for top-level pages. When it is injected into
//! a page one directory down, its relative links and the logo image would
//! point into the wrong directory, so they get a `../` prefix:
//!
//! - `img.nav-profile` → `src`
//! - `a.nav-link` and any `a` inside `.dropdown-content` → `href`
//!
//! Values that are already fine are left alone: fragments (`#...`), absolute
//! URLs (`http...`), root-relative paths, other schemes (`mailto:`, `tel:`,
//! `data:`) and anything already starting with `../`. That guard is what makes
//! the pass idempotent.

use crate::markup::{self, within_class};
use crate::types::PageDepth;

const PARENT: &str = "../";

/// Whether a relative reference needs the parent prefix.
pub fn needs_prefix(value: &str) -> bool {
    !(value.is_empty()
        || value.starts_with('#')
        || value.starts_with("http")
        || value.starts_with(PARENT)
        || value.starts_with('/')
        || value.starts_with("mailto:")
        || value.starts_with("tel:")
        || value.starts_with("data:"))
}

/// Rewrite header markup for a page at `depth`. Top-level pages are returned
/// unchanged.
pub fn rewrite_header(header: &str, depth: PageDepth) -> String {
    if !depth.is_nested() {
        return header.to_string();
    }

    markup::rewrite_start_tags(header, |tag, ancestors| {
        let attr = match tag.name.as_str() {
            "img" if tag.has_class("nav-profile") => "src",
            "a" if tag.has_class("nav-link") || within_class(ancestors, "dropdown-content") => {
                "href"
            }
            _ => return None,
        };
        let value = tag.attr(attr)?;
        needs_prefix(value).then(|| tag.with_attr(header, attr, &format!("{PARENT}{value}")))
    })
}
