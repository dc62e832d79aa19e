//! Page shells and their placeholder slots.
//!
//! A page shell is ordinary HTML with empty container elements named by
//! convention, e.g. `<div id="header-placeholder"></div>`. [`Page::parse`]
//! splits the shell into literal markup and named slots; the loader then
//! fills slots by name and [`Page::render`] stitches everything back together.
//! Bytes outside the slots are never touched.

use crate::markup::{self, ElementBounds};

const PLACEHOLDER_SUFFIX: &str = "-placeholder";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Markup(String),
    Slot(Slot),
}

/// A placeholder element: its start and end tags are kept verbatim, only the
/// content in between is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    open_tag: String,
    pub content: String,
    close_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    segments: Vec<Segment>,
}

impl Page {
    /// Split `html` into markup and slots.
    ///
    /// Nested placeholders are not supported: the outermost one wins and its
    /// content is treated as opaque. An unclosed placeholder element is left
    /// as literal markup.
    pub fn parse(html: &str) -> Self {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for tag in markup::tags(html) {
            if tag.closing || tag.span.start < cursor {
                continue;
            }
            let Some(name) = tag
                .attr("id")
                .and_then(|id| id.strip_suffix(PLACEHOLDER_SUFFIX))
                .filter(|name| !name.is_empty())
            else {
                continue;
            };
            let Some(ElementBounds { inner, end_tag }) = markup::element_bounds(html, &tag) else {
                continue;
            };

            if cursor < tag.span.start {
                segments.push(Segment::Markup(html[cursor..tag.span.start].to_string()));
            }
            segments.push(Segment::Slot(Slot {
                name: name.to_string(),
                open_tag: html[tag.span.clone()].to_string(),
                content: html[inner].to_string(),
                close_tag: html[end_tag.clone()].to_string(),
            }));
            cursor = end_tag.end;
        }

        if cursor < html.len() {
            segments.push(Segment::Markup(html[cursor..].to_string()));
        }
        Page { segments }
    }

    /// Names of all slots, in document order.
    pub fn slot_names(&self) -> Vec<&str> {
        self.slots().map(|s| s.name.as_str()).collect()
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots().find(|s| s.name == name)
    }

    /// Current content of a slot.
    pub fn slot_content(&self, name: &str) -> Option<&str> {
        self.slot(name).map(|s| s.content.as_str())
    }

    /// Replace a slot's content. Returns `false` when no such slot exists.
    pub fn set_slot(&mut self, name: &str, content: impl Into<String>) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                slot.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Apply `f` to a slot's content in place. Returns `false` when absent.
    pub fn update_slot(&mut self, name: &str, f: impl FnOnce(&str) -> String) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                slot.content = f(&slot.content);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Reassemble the page.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markup(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    out.push_str(&slot.open_tag);
                    out.push_str(&slot.content);
                    out.push_str(&slot.close_tag);
                }
            }
        }
        out
    }

    fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(slot) => Some(slot),
            Segment::Markup(_) => None,
        })
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.segments.iter_mut().find_map(|s| match s {
            Segment::Slot(slot) if slot.name == name => Some(slot),
            _ => None,
        })
    }
}
