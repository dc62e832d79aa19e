//! Concurrent fragment loading.
//!
//! Every fragment in the registry is fetched at the same time on a rayon pool
//! with one worker per fragment (fewer only when `fetch.max_parallel` says so).
//! Completions arrive in any order; each one takes the page lock just long
//! enough to fill its own slot, and the header additionally runs the
//! [path rewriter](crate::rewrite) right there, before the lock is released.
//!
//! ## Failure Isolation
//!
//! A failed fetch never cancels or delays the others and never escapes
//! [`FragmentLoader::load_all`]. Its slot (when present) gets a visible
//! warning block naming the fragment and the path it was expected at, and
//! the failure is logged. Nothing is retried.
//!
//! ```text
//! header  ─fetch─▶ inject ─▶ rewrite paths
//! footer  ─fetch─▶ inject
//! intro   ─fetch─▶ 404 ─▶ fallback block
//! modal   ─fetch─▶ (no placeholder on this page)
//!                                  └──▶ LoadReport (registry order)
//! ```

use crate::config::{FetchConfig, fetch_width};
use crate::page::Page;
use crate::registry::{FragmentDescriptor, FragmentRegistry};
use crate::rewrite::rewrite_header;
use crate::source::FragmentSource;
use crate::types::PageDepth;
use maud::{Markup, html};
use rayon::prelude::*;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// The fragment whose injection triggers path rewriting.
pub const HEADER: &str = "header";

/// What happened to one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// Fetched and injected into its placeholder.
    Injected,
    /// Fetch failed. `shown` is true when the fallback block was injected.
    Fallback { error: String, shown: bool },
    /// Fetched, but the page has no placeholder for it.
    NoPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentResult {
    pub name: String,
    pub path: String,
    pub outcome: FragmentOutcome,
}

/// Per-fragment results, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub fragments: Vec<FragmentResult>,
}

impl LoadReport {
    pub fn outcome(&self, name: &str) -> Option<&FragmentOutcome> {
        self.fragments
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.outcome)
    }

    pub fn injected(&self) -> usize {
        self.count(|o| matches!(o, FragmentOutcome::Injected))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FragmentOutcome::Fallback { .. }))
    }

    pub fn all_injected(&self) -> bool {
        self.injected() == self.fragments.len()
    }

    fn count(&self, pred: impl Fn(&FragmentOutcome) -> bool) -> usize {
        self.fragments.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// The visible block shown in place of a fragment that failed to load.
pub fn fallback_block(name: &str, path: &str) -> Markup {
    html! {
        div.component-fallback {
            p {
                "⚠️ Component " strong { (name) } " failed to load. Check file path: "
                code { (path) }
            }
        }
    }
}

/// Runs fragment fetches on a per-page pool with one worker per fragment,
/// optionally capped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentLoader {
    max_parallel: Option<usize>,
}

impl FragmentLoader {
    /// Loader with at most `max_parallel` concurrent fetches.
    pub fn new(max_parallel: usize) -> Self {
        Self {
            max_parallel: Some(max_parallel.max(1)),
        }
    }

    /// Loader honoring `fetch.max_parallel`; uncapped when it is absent.
    pub fn from_config(fetch: &FetchConfig) -> Self {
        Self {
            max_parallel: fetch.max_parallel,
        }
    }

    /// Pool sized for one page. If it cannot be built the global rayon pool
    /// is used instead.
    fn pool_for(&self, fragments: usize) -> Option<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(fetch_width(self.max_parallel, fragments))
            .thread_name(|i| format!("fragment-fetch-{i}"))
            .build()
            .map_err(|e| warn!(error = %e, "falling back to the global fetch pool"))
            .ok()
    }

    /// Fetch every registered fragment into `page` and wait for all of them.
    ///
    /// Never fails: partial failure is reported per fragment in the returned
    /// [`LoadReport`] and in the page itself.
    pub fn load_all(
        &self,
        registry: &FragmentRegistry,
        source: &dyn FragmentSource,
        page: &mut Page,
    ) -> LoadReport {
        let depth = registry.depth();
        let shared = Mutex::new(page);
        let run = || {
            registry
                .fragments()
                .par_iter()
                .map(|fragment| load_one(fragment, source, &shared, depth))
                .collect::<Vec<_>>()
        };
        let fragments = match self.pool_for(registry.len()) {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let report = LoadReport { fragments };
        info!(
            loaded = report.injected(),
            failed = report.failed(),
            total = report.fragments.len(),
            "fragments settled"
        );
        report
    }
}

fn lock<'a, 'p>(page: &'a Mutex<&'p mut Page>) -> MutexGuard<'a, &'p mut Page> {
    page.lock().unwrap_or_else(PoisonError::into_inner)
}

fn load_one(
    fragment: &FragmentDescriptor,
    source: &dyn FragmentSource,
    page: &Mutex<&mut Page>,
    depth: PageDepth,
) -> FragmentResult {
    let outcome = match source.fetch(&fragment.path) {
        Ok(markup) => {
            let mut page = lock(page);
            if !page.set_slot(&fragment.name, markup) {
                debug!(fragment = %fragment.name, "no placeholder, skipping");
                FragmentOutcome::NoPlaceholder
            } else {
                if fragment.name == HEADER {
                    page.update_slot(HEADER, |header| rewrite_header(header, depth));
                }
                info!(fragment = %fragment.name, "fragment loaded");
                FragmentOutcome::Injected
            }
        }
        Err(err) => {
            warn!(
                fragment = %fragment.name,
                path = %fragment.path,
                error = %err,
                "fragment failed to load, using fallback"
            );
            let block = fallback_block(&fragment.name, &fragment.path).into_string();
            let shown = lock(page).set_slot(&fragment.name, block);
            FragmentOutcome::Fallback {
                error: err.to_string(),
                shown,
            }
        }
    };

    FragmentResult {
        name: fragment.name.clone(),
        path: fragment.path.clone(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FragmentEntry, default_fragments};
    use crate::source::FetchError;
    use crate::test_helpers::{MockSource, shell_with_slots};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Source that records how many fetches run at the same time.
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
        hold: Duration,
    }

    impl InFlight {
        fn new(hold_ms: u64) -> Self {
            Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                hold: Duration::from_millis(hold_ms),
            }
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    impl FragmentSource for InFlight {
        fn fetch(&self, path: &str) -> Result<String, FetchError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.hold);
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(format!("<p>{path}</p>"))
        }
    }

    fn three_fragments() -> Vec<FragmentEntry> {
        vec![
            FragmentEntry::new("header", "components/header.html"),
            FragmentEntry::new("footer", "components/footer.html"),
            FragmentEntry::new("intro", "components/intro.html"),
        ]
    }

    #[test]
    fn successful_fragments_fill_slots_verbatim() {
        let source = MockSource::new()
            .with("components/header.html", "<nav>H</nav>")
            .with("components/footer.html", "<p>F</p>")
            .with("components/intro.html", "<h1>I</h1>");
        let registry = FragmentRegistry::new(&three_fragments(), PageDepth::TopLevel);
        let mut page = Page::parse(&shell_with_slots(&["header", "footer", "intro"]));

        let report = FragmentLoader::new(4).load_all(&registry, &source, &mut page);

        assert!(report.all_injected());
        assert_eq!(page.slot_content("header"), Some("<nav>H</nav>"));
        assert_eq!(page.slot_content("footer"), Some("<p>F</p>"));
        assert_eq!(page.slot_content("intro"), Some("<h1>I</h1>"));
    }

    #[test]
    fn one_failure_does_not_block_the_others() {
        let source = MockSource::new()
            .with("components/header.html", "<nav>H</nav>")
            .with_status("components/footer.html", 404)
            .with("components/intro.html", "<h1>I</h1>");
        let registry = FragmentRegistry::new(&three_fragments(), PageDepth::TopLevel);
        let mut page = Page::parse(&shell_with_slots(&["header", "footer", "intro"]));

        let report = FragmentLoader::new(4).load_all(&registry, &source, &mut page);

        assert_eq!(report.injected(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(page.slot_content("header"), Some("<nav>H</nav>"));
        assert_eq!(page.slot_content("intro"), Some("<h1>I</h1>"));
        let footer = page.slot_content("footer").unwrap();
        assert!(footer.contains("component-fallback"));
        assert!(footer.contains("footer"));
        assert!(footer.contains("components/footer.html"));
        assert!(matches!(
            report.outcome("footer"),
            Some(FragmentOutcome::Fallback { shown: true, error }) if error.contains("404")
        ));
    }

    #[test]
    fn every_fragment_is_attempted_even_when_all_fail() {
        let source = MockSource::new();
        let registry = FragmentRegistry::new(&default_fragments(), PageDepth::TopLevel);
        let mut page = Page::parse(&shell_with_slots(&["header"]));

        let report = FragmentLoader::new(2).load_all(&registry, &source, &mut page);

        assert_eq!(report.fragments.len(), 4);
        assert_eq!(report.failed(), 4);
        assert_eq!(source.requested().len(), 4);
        // Only the header has a slot to show its fallback in
        assert!(matches!(
            report.outcome("footer"),
            Some(FragmentOutcome::Fallback { shown: false, .. })
        ));
    }

    #[test]
    fn missing_placeholder_is_recorded() {
        let source = MockSource::new()
            .with("components/header.html", "<nav>H</nav>")
            .with("components/footer.html", "<p>F</p>")
            .with("components/intro.html", "<h1>I</h1>");
        let registry = FragmentRegistry::new(&three_fragments(), PageDepth::TopLevel);
        let mut page = Page::parse(&shell_with_slots(&["header"]));

        let report = FragmentLoader::new(1).load_all(&registry, &source, &mut page);

        assert_eq!(report.outcome("header"), Some(&FragmentOutcome::Injected));
        assert_eq!(report.outcome("footer"), Some(&FragmentOutcome::NoPlaceholder));
        assert!(!page.render().contains("<p>F</p>"));
    }

    #[test]
    fn nested_page_fetches_parent_paths_and_rewrites_header() {
        let source = MockSource::new()
            .with(
                "../components/header.html",
                r#"<a class="nav-link" href="about.html">About</a>"#,
            )
            .with("../components/footer.html", "<p>F</p>")
            .with("../components/intro.html", "<h1>I</h1>");
        let registry = FragmentRegistry::new(&three_fragments(), PageDepth::Nested);
        let mut page = Page::parse(&shell_with_slots(&["header", "footer"]));

        let report = FragmentLoader::new(4).load_all(&registry, &source, &mut page);

        assert_eq!(report.injected(), 2);
        assert_eq!(
            page.slot_content("header"),
            Some(r#"<a class="nav-link" href="../about.html">About</a>"#)
        );
        // Only the header is rewritten
        assert_eq!(page.slot_content("footer"), Some("<p>F</p>"));
    }

    #[test]
    fn report_keeps_registry_order() {
        let source = MockSource::new()
            .with("components/intro.html", "<h1>I</h1>")
            .with_delay("components/header.html", "<nav>H</nav>", 30);
        let registry = FragmentRegistry::new(&three_fragments(), PageDepth::TopLevel);
        let mut page = Page::parse(&shell_with_slots(&["header", "footer", "intro"]));

        let report = FragmentLoader::new(3).load_all(&registry, &source, &mut page);

        let names: Vec<&str> = report.fragments.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["header", "footer", "intro"]);
    }

    #[test]
    fn fallback_block_names_fragment_and_path() {
        let html = fallback_block("intro", "../components/intro.html").into_string();
        assert!(html.contains("component-fallback"));
        assert!(html.contains("<strong>intro</strong>"));
        assert!(html.contains("<code>../components/intro.html</code>"));
    }

    #[test]
    fn default_loader_fetches_every_fragment_at_once() {
        let source = InFlight::new(200);
        let registry = FragmentRegistry::new(&default_fragments(), PageDepth::TopLevel);
        let mut page = Page::parse(&shell_with_slots(&[
            "header",
            "footer",
            "intro",
            "project-gallery-modal",
        ]));

        let report = FragmentLoader::default().load_all(&registry, &source, &mut page);

        assert_eq!(report.injected(), 4);
        assert_eq!(source.peak(), registry.len());
    }

    #[test]
    fn configured_cap_limits_fetches_in_flight() {
        let source = InFlight::new(20);
        let registry = FragmentRegistry::new(&default_fragments(), PageDepth::TopLevel);
        let mut page = Page::parse(&shell_with_slots(&["header"]));
        let fetch = FetchConfig {
            max_parallel: Some(1),
            ..FetchConfig::default()
        };

        let report = FragmentLoader::from_config(&fetch).load_all(&registry, &source, &mut page);

        assert_eq!(report.fragments.len(), 4);
        assert_eq!(source.peak(), 1);
    }
}
