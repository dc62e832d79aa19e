//! Interactive page effects.
//!
//! Each effect is a pure model that can be driven and tested without a
//! browser:
//!
//! | Module        | Effect                                               |
//! |---------------|------------------------------------------------------|
//! | `counter`     | Stat numbers count up when first seen                |
//! | `typing`      | Looping typed-text banner, cancellable task          |
//! | `reveal`      | Staggered `fade-in` of cards when first seen         |
//! | `lazy`        | `.lazy-load` elements marked `loaded` when first seen |
//! | `clipboard`   | Copy buttons on code blocks, with clipboard fallback |
//! | `observer`    | One-shot visibility tracking shared by the above     |
//!
//! [`wire_effects`] runs on a fully assembled page: it adds missing copy
//! buttons and records which effect targets the page carries.
//! [`first_view`] drives the visibility-triggered models (counters, reveal,
//! lazy content) through the first time the whole page scrolls into view;
//! the `folio preview` command prints its result.

pub mod clipboard;
pub mod counter;
pub mod lazy;
pub mod observer;
pub mod reveal;
pub mod typing;

use crate::config::EffectsConfig;
use crate::markup;
use counter::CounterBoard;
use lazy::LazyContent;
use reveal::RevealScheduler;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const TYPING_CLASS: &str = "typing-text";

/// Effect targets found on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectWiring {
    /// Counter targets in document order.
    pub counters: Vec<u64>,
    pub typing: bool,
    pub reveal_targets: usize,
    pub lazy_targets: usize,
    pub code_blocks: usize,
    pub copy_buttons_added: usize,
}

impl EffectWiring {
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
            && !self.typing
            && self.reveal_targets == 0
            && self.lazy_targets == 0
            && self.code_blocks == 0
    }
}

pub fn wire_effects(html: &str, config: &EffectsConfig) -> (String, EffectWiring) {
    let (html, copy_buttons_added) = clipboard::ensure_copy_buttons(html);

    let typing = markup::tags(&html).any(|t| t.is_start() && t.has_class(TYPING_CLASS));
    if !typing {
        debug!("no typed-text element on page");
    }

    let wiring = EffectWiring {
        counters: counter::find_counters(&html),
        typing,
        reveal_targets: reveal::count_reveal_targets(&html, &config.reveal),
        lazy_targets: lazy::count_lazy_targets(&html),
        code_blocks: markup::code_blocks(&html).len(),
        copy_buttons_added,
    };
    (html, wiring)
}

/// What happens when every effect target is in view at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportPass {
    /// `(target, frame count)` per started counter, in document order.
    pub counters: Vec<(u64, usize)>,
    /// Fade-in delay per revealed element, in document order.
    pub reveal_delays: Vec<Duration>,
    /// Elements marked `loaded`.
    pub lazy_loaded: usize,
}

fn all_visible(count: usize) -> Vec<(usize, bool)> {
    (0..count).map(|i| (i, true)).collect()
}

/// Run one visibility batch in which every target of `html` intersects.
pub fn first_view(html: &str, config: &EffectsConfig) -> ViewportPass {
    let mut board = CounterBoard::new(&counter::find_counters(html), &config.counter);
    let counters = board
        .on_visibility(&all_visible(board.len()))
        .into_iter()
        .map(|(_, animation)| (animation.target(), animation.frames().len()))
        .collect();

    let reveal_count = reveal::count_reveal_targets(html, &config.reveal);
    let mut reveal = RevealScheduler::new(&config.reveal);
    let mut lazy = LazyContent::new();
    (0..reveal_count).for_each(|i| reveal.observe(i));
    let lazy_count = lazy::count_lazy_targets(html);
    (0..lazy_count).for_each(|i| lazy.observe(i));

    ViewportPass {
        counters,
        reveal_delays: reveal
            .on_intersections(&all_visible(reveal_count))
            .into_iter()
            .map(|r| r.delay)
            .collect(),
        lazy_loaded: lazy.on_intersections(&all_visible(lazy_count)).len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{INDEX_HTML, PROJECT_HTML};

    #[test]
    fn index_page_targets() {
        let (_, wiring) = wire_effects(INDEX_HTML, &EffectsConfig::default());
        assert_eq!(wiring.counters, vec![5, 120]);
        assert!(wiring.typing);
        assert_eq!(wiring.reveal_targets, 2);
        assert_eq!(wiring.code_blocks, 0);
        assert_eq!(wiring.copy_buttons_added, 0);
    }

    #[test]
    fn project_page_gets_copy_button() {
        let (html, wiring) = wire_effects(PROJECT_HTML, &EffectsConfig::default());
        assert_eq!(wiring.code_blocks, 1);
        assert_eq!(wiring.copy_buttons_added, 1);
        assert!(html.contains("copy-btn"));
        assert!(!wiring.typing);
    }

    #[test]
    fn plain_markup_has_no_effects() {
        let (html, wiring) = wire_effects("<p>hello</p>", &EffectsConfig::default());
        assert_eq!(html, "<p>hello</p>");
        assert!(wiring.is_empty());
    }

    #[test]
    fn lazy_targets_are_recorded() {
        let html = r#"<div class="lazy-load"></div><section class="lazy-load"></section>"#;
        let (_, wiring) = wire_effects(html, &EffectsConfig::default());
        assert_eq!(wiring.lazy_targets, 2);
        assert!(!wiring.is_empty());
    }

    #[test]
    fn first_view_starts_everything_once() {
        let html = format!("{INDEX_HTML}<div class=\"lazy-load\"></div>");
        let pass = first_view(&html, &EffectsConfig::default());
        assert_eq!(pass.counters, vec![(5, 125), (120, 125)]);
        assert_eq!(
            pass.reveal_delays,
            vec![Duration::ZERO, Duration::from_millis(100)]
        );
        assert_eq!(pass.lazy_loaded, 1);
    }

    #[test]
    fn first_view_of_plain_markup_is_empty() {
        assert_eq!(first_view("<p>x</p>", &EffectsConfig::default()), ViewportPass::default());
    }
}
