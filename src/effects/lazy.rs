//! Deferred content: `.lazy-load` elements get the `loaded` class the first
//! time they come into view, then stop being watched.

use super::observer::OneShotObserver;
use crate::markup;

/// Marker class of deferred elements.
pub const LAZY_CLASS: &str = "lazy-load";
/// State class applied once an element has been seen.
pub const LOADED_CLASS: &str = "loaded";

#[derive(Debug, Clone)]
pub struct LazyContent<K> {
    observer: OneShotObserver<K>,
}

impl<K: PartialEq + Clone> Default for LazyContent<K> {
    fn default() -> Self {
        Self {
            observer: OneShotObserver::new(),
        }
    }
}

impl<K: PartialEq + Clone> LazyContent<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, target: K) {
        self.observer.observe(target);
    }

    pub fn pending(&self) -> usize {
        self.observer.len()
    }

    /// Elements that become `loaded` with this visibility batch.
    pub fn on_intersections(&mut self, entries: &[(K, bool)]) -> Vec<K> {
        self.observer
            .notify(entries)
            .into_iter()
            .map(|(_, target)| target)
            .collect()
    }
}

/// Number of start tags carrying the `lazy-load` class.
pub fn count_lazy_targets(html: &str) -> usize {
    markup::tags(html)
        .filter(|t| t.is_start() && t.has_class(LAZY_CLASS))
        .count()
}
