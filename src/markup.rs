//! A small start-tag scanner for the markup this crate handles.
//!
//! Page shells and fragments are hand-written HTML, so a full HTML5 parser is
//! not needed: everything the loader, rewriter and effects query is an
//! attribute on a start tag (`id`, `class`, `href`, `src`, `data-*`) or the
//! text between an element's start and its matching end tag. The scanner
//! recognises start, end and self-closing tags, tracks open elements so
//! callers can ask about ancestors (e.g. "inside `.dropdown-content`"), and
//! rewrites single attributes in place, leaving every other byte untouched.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<(/?)([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s/>"'=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+))?)*)\s*(/?)>"#,
    )
    .expect("tag pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s/>"'=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+)))?"#)
        .expect("attribute pattern is valid")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// One tag occurrence in a markup string.
#[derive(Debug, Clone)]
pub struct Tag<'a> {
    /// Lowercased element name.
    pub name: String,
    pub closing: bool,
    pub self_closing: bool,
    /// Byte range of the whole tag (`<` through `>`) in the scanned string.
    pub span: Range<usize>,
    attrs: &'a str,
    attrs_offset: usize,
}

struct Attr<'a> {
    name: &'a str,
    value: Option<&'a str>,
    /// Range of the value (without quotes) relative to the scanned string.
    value_span: Option<Range<usize>>,
}

impl<'a> Tag<'a> {
    /// True for start tags that never have content (`img`, `br`, ...).
    pub fn is_void(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn is_start(&self) -> bool {
        !self.closing
    }

    fn attrs(&self) -> impl Iterator<Item = Attr<'a>> + '_ {
        let attrs = self.attrs;
        let offset = self.attrs_offset;
        ATTR_RE.captures_iter(attrs).filter_map(move |caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4));
            Some(Attr {
                name,
                value: value.map(|m| m.as_str()),
                value_span: value.map(|m| offset + m.start()..offset + m.end()),
            })
        })
    }

    /// Attribute value by (case-insensitive) name. Bare attributes yield `""`.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Rewrite this tag's text with `name` set to `value`.
    ///
    /// An existing value is replaced in place (quotes preserved); a missing
    /// attribute is appended just before the closing `>` / `/>`.
    pub fn with_attr(&self, source: &str, name: &str, value: &str) -> String {
        let raw = &source[self.span.clone()];
        let existing = self
            .attrs()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value_span);

        match existing {
            Some(span) => {
                let start = span.start - self.span.start;
                let end = span.end - self.span.start;
                let quoted = raw[..start].ends_with(['"', '\'']);
                let escaped = escape_attr(value);
                if quoted {
                    format!("{}{}{}", &raw[..start], escaped, &raw[end..])
                } else {
                    format!("{}\"{}\"{}", &raw[..start], escaped, &raw[end..])
                }
            }
            None => {
                let tail = if raw.ends_with("/>") { 2 } else { 1 };
                let head = raw[..raw.len() - tail].trim_end();
                format!(
                    "{head} {name}=\"{}\"{}",
                    escape_attr(value),
                    &raw[raw.len() - tail..]
                )
            }
        }
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Scan every tag in `html`, in document order.
pub fn tags(html: &str) -> impl Iterator<Item = Tag<'_>> {
    TAG_RE.captures_iter(html).filter_map(|caps| {
        let whole = caps.get(0)?;
        let attrs = caps.get(3)?;
        Some(Tag {
            name: caps.get(2)?.as_str().to_ascii_lowercase(),
            closing: !caps.get(1)?.as_str().is_empty(),
            self_closing: !caps.get(4)?.as_str().is_empty(),
            span: whole.range(),
            attrs: attrs.as_str(),
            attrs_offset: attrs.start(),
        })
    })
}

/// An element that is open at some point of the scan.
#[derive(Debug, Clone)]
pub struct OpenElement {
    pub name: String,
    pub classes: Vec<String>,
}

impl OpenElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// True when any open element carries `class`.
pub fn within_class(ancestors: &[OpenElement], class: &str) -> bool {
    ancestors.iter().any(|el| el.has_class(class))
}

/// Visit every start tag together with its open ancestors and splice in the
/// replacement text returned by `f`. Tags for which `f` returns `None` are
/// copied unchanged.
pub fn rewrite_start_tags<F>(html: &str, mut f: F) -> String
where
    F: FnMut(&Tag<'_>, &[OpenElement]) -> Option<String>,
{
    let mut out = String::with_capacity(html.len() + 64);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut cursor = 0;

    for tag in tags(html) {
        if tag.closing {
            if let Some(pos) = stack.iter().rposition(|el| el.name == tag.name) {
                stack.truncate(pos);
            }
            continue;
        }

        if let Some(replacement) = f(&tag, &stack) {
            out.push_str(&html[cursor..tag.span.start]);
            out.push_str(&replacement);
            cursor = tag.span.end;
        }

        if !tag.is_void() {
            stack.push(OpenElement {
                name: tag.name.clone(),
                classes: tag
                    .attr("class")
                    .map(|c| c.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
            });
        }
    }

    out.push_str(&html[cursor..]);
    out
}

/// Byte ranges of an element located by its start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBounds {
    /// Everything between the start tag and the matching end tag.
    pub inner: Range<usize>,
    /// The matching end tag itself.
    pub end_tag: Range<usize>,
}

/// Find the end tag matching `open`. `None` for void elements or when the
/// element is never closed.
pub fn element_bounds(html: &str, open: &Tag<'_>) -> Option<ElementBounds> {
    if open.closing || open.is_void() {
        return None;
    }
    let rest_start = open.span.end;
    let mut depth = 1usize;
    for tag in tags(&html[rest_start..]) {
        if tag.name != open.name {
            continue;
        }
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return Some(ElementBounds {
                    inner: rest_start..rest_start + tag.span.start,
                    end_tag: rest_start + tag.span.start..rest_start + tag.span.end,
                });
            }
        } else if !tag.is_void() {
            depth += 1;
        }
    }
    None
}

/// Plain text of a markup fragment: comments and tags removed, the common
/// character references decoded.
pub fn text_content(fragment: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(fragment, "");
    let without_tags = TAG_RE.replace_all(&without_comments, "");
    without_tags
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Text of every `<code>` element, in document order.
pub fn code_blocks(html: &str) -> Vec<String> {
    tags(html)
        .filter(|t| t.is_start() && t.name == "code")
        .filter_map(|t| element_bounds(html, &t))
        .map(|b| text_content(&html[b.inner]))
        .collect()
}
