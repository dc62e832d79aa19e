//! One-shot visibility observation.
//!
//! Counters and reveal animations both start the first time an element
//! scrolls into view and then stop watching it. [`OneShotObserver`] keeps the
//! set of still-watched elements and, given a batch of visibility entries,
//! returns the ones that fire now.

/// Elements watched until they are first seen.
#[derive(Debug, Clone)]
pub struct OneShotObserver<K> {
    watched: Vec<K>,
}

impl<K> Default for OneShotObserver<K> {
    fn default() -> Self {
        Self {
            watched: Vec::new(),
        }
    }
}

impl<K: PartialEq + Clone> OneShotObserver<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `key`. Watching twice has no extra effect.
    pub fn observe(&mut self, key: K) {
        if !self.watched.contains(&key) {
            self.watched.push(key);
        }
    }

    pub fn is_observing(&self, key: &K) -> bool {
        self.watched.contains(key)
    }

    pub fn len(&self) -> usize {
        self.watched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Process one batch of `(element, is_intersecting)` entries.
    ///
    /// Returns `(position in batch, element)` for every intersecting element
    /// that was still watched, and stops watching it.
    pub fn notify(&mut self, entries: &[(K, bool)]) -> Vec<(usize, K)> {
        let mut fired = Vec::new();
        for (index, (key, intersecting)) in entries.iter().enumerate() {
            if !intersecting {
                continue;
            }
            if let Some(pos) = self.watched.iter().position(|k| k == key) {
                self.watched.remove(pos);
                fired.push((index, key.clone()));
            }
        }
        fired
    }
}
