//! Page load hints added at assembly time.
//!
//! Images without an explicit `loading` attribute are marked lazy, and the
//! resources every page needs first (the main stylesheet and the header and
//! footer fragments) get `<link rel="preload">` hints in the document head.

use crate::markup;
use crate::registry::FragmentRegistry;
use maud::{Markup, html};

pub const MAIN_STYLESHEET: &str = "assets/css/main.css";

/// Fragments preloaded on every page, when registered.
const CRITICAL_FRAGMENTS: &[&str] = &["header", "footer"];

/// Set `loading="lazy"` on every `<img>` that has no `loading` attribute.
/// Returns the new markup and the number of images changed.
pub fn add_lazy_loading(html: &str) -> (String, usize) {
    let mut changed = 0;
    let out = markup::rewrite_start_tags(html, |tag, _| {
        if tag.name != "img" || tag.has_attr("loading") {
            return None;
        }
        changed += 1;
        Some(tag.with_attr(html, "loading", "lazy"))
    });
    (out, changed)
}

/// Critical resources of a page as `(href, as)` pairs, relative to the page.
pub fn critical_resources(registry: &FragmentRegistry) -> Vec<(String, &'static str)> {
    let mut resources = vec![(
        format!("{}{MAIN_STYLESHEET}", registry.depth().base_prefix()),
        "style",
    )];
    resources.extend(
        CRITICAL_FRAGMENTS
            .iter()
            .filter_map(|name| registry.path_of(name))
            .map(|path| (path.to_string(), "fetch")),
    );
    resources
}

pub fn preload_hints(resources: &[(String, &'static str)]) -> Markup {
    html! {
        @for (href, kind) in resources {
            link rel="preload" href=(href) as=(kind);
        }
    }
}

/// Insert preload hints just before `</head>`. Resources that already have a
/// preload hint are skipped, and pages without a head are left unchanged.
pub fn inject_preload_hints(html: &str, resources: &[(String, &'static str)]) -> String {
    let missing: Vec<(String, &'static str)> = resources
        .iter()
        .filter(|(href, _)| {
            !markup::tags(html).any(|t| {
                t.name == "link" && t.attr("rel") == Some("preload") && t.attr("href") == Some(href)
            })
        })
        .cloned()
        .collect();
    if missing.is_empty() {
        return html.to_string();
    }

    let Some(head_end) = markup::tags(html)
        .find(|t| t.closing && t.name == "head")
        .map(|t| t.span.start)
    else {
        return html.to_string();
    };

    let mut out = String::with_capacity(html.len() + 64 * missing.len());
    out.push_str(&html[..head_end]);
    out.push_str(&preload_hints(&missing).into_string());
    out.push_str(&html[head_end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_fragments;

    #[test]
    fn lazy_loading_respects_existing_attribute() {
        let html = r#"<img src="a.png"><img src="b.png" loading="eager"><img src="c.png"/>"#;
        let (out, changed) = add_lazy_loading(html);
        assert_eq!(changed, 2);
        assert_eq!(
            out,
            r#"<img src="a.png" loading="lazy"><img src="b.png" loading="eager"><img src="c.png" loading="lazy"/>"#
        );
    }

    #[test]
    fn critical_resources_follow_depth() {
        let top = FragmentRegistry::for_page(&default_fragments(), "/index.html", "projects");
        let resources = critical_resources(&top);
        assert_eq!(
            resources,
            vec![
                ("assets/css/main.css".to_string(), "style"),
                ("components/header.html".to_string(), "fetch"),
                ("components/footer.html".to_string(), "fetch"),
            ]
        );

        let nested = FragmentRegistry::for_page(&default_fragments(), "/projects/bbc.html", "projects");
        assert_eq!(critical_resources(&nested)[0].0, "../assets/css/main.css");
        assert_eq!(critical_resources(&nested)[1].0, "../components/header.html");
    }

    #[test]
    fn hints_go_before_head_end_once() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let resources = vec![("assets/css/main.css".to_string(), "style")];
        let out = inject_preload_hints(html, &resources);
        assert!(out.contains(
            r#"<link rel="preload" href="assets/css/main.css" as="style"></head>"#
        ));
        assert_eq!(inject_preload_hints(&out, &resources), out);
    }

    #[test]
    fn headless_markup_is_untouched() {
        let resources = vec![("a.css".to_string(), "style")];
        assert_eq!(inject_preload_hints("<p>x</p>", &resources), "<p>x</p>");
    }
}
