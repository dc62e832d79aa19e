//! Fragment registry: which shared fragments a page loads, and from where.
//!
//! The configured paths are relative to the site root. A registry is built
//! per page, once, and prefixes every path with `../` when the page lives in
//! the nested subdirectory. Misdetected depth is not an error here; it shows
//! up later as failed fetches.

use crate::config::FragmentEntry;
use crate::types::PageDepth;

/// A fragment name and the path it is fetched from, relative to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDescriptor {
    pub name: String,
    pub path: String,
}

impl FragmentDescriptor {
    /// The id of the element this fragment is injected into.
    pub fn placeholder_id(&self) -> String {
        format!("{}-placeholder", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct FragmentRegistry {
    depth: PageDepth,
    fragments: Vec<FragmentDescriptor>,
}

impl FragmentRegistry {
    /// Build the registry for a page at `page_path` (a navigable path such as
    /// `/projects/wiki-table.html`).
    pub fn for_page(entries: &[FragmentEntry], page_path: &str, nested_marker: &str) -> Self {
        Self::new(entries, PageDepth::detect(page_path, nested_marker))
    }

    pub fn new(entries: &[FragmentEntry], depth: PageDepth) -> Self {
        let prefix = depth.base_prefix();
        let fragments = entries
            .iter()
            .map(|entry| FragmentDescriptor {
                name: entry.name.clone(),
                path: format!("{prefix}{}", entry.path),
            })
            .collect();
        Self { depth, fragments }
    }

    pub fn depth(&self) -> PageDepth {
        self.depth
    }

    /// All descriptors in configuration order.
    pub fn fragments(&self) -> &[FragmentDescriptor] {
        &self.fragments
    }

    /// Resolved path for a fragment name.
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
