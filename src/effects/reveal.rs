//! Staggered fade-in of cards on first sight.

use super::observer::OneShotObserver;
use crate::config::RevealConfig;
use crate::markup;
use std::time::Duration;

/// State class applied to a revealed element.
pub const REVEALED_CLASS: &str = "fade-in";

/// A reveal to apply `delay` after the visibility notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal<K> {
    pub target: K,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct RevealScheduler<K> {
    observer: OneShotObserver<K>,
    stagger: Duration,
}

impl<K: PartialEq + Clone> RevealScheduler<K> {
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            observer: OneShotObserver::new(),
            stagger: Duration::from_millis(config.stagger_ms),
        }
    }

    pub fn observe(&mut self, target: K) {
        self.observer.observe(target);
    }

    pub fn pending(&self) -> usize {
        self.observer.len()
    }

    /// Schedule reveals for one visibility batch. The delay grows with the
    /// entry's position in the batch, not with its position on the page.
    pub fn on_intersections(&mut self, entries: &[(K, bool)]) -> Vec<Reveal<K>> {
        self.observer
            .notify(entries)
            .into_iter()
            .map(|(index, target)| Reveal {
                target,
                delay: stagger_delay(self.stagger, index),
            })
            .collect()
    }
}

/// `stagger × index`, saturating instead of wrapping.
fn stagger_delay(stagger: Duration, index: usize) -> Duration {
    stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Number of start tags carrying any of the configured reveal classes.
pub fn count_reveal_targets(html: &str, config: &RevealConfig) -> usize {
    markup::tags(html)
        .filter(|t| t.is_start() && config.classes.iter().any(|c| t.has_class(c)))
        .count()
}
