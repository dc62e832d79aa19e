//! Stat counters that count up from zero when first scrolled into view.
//!
//! Targets come from `.stat-number[data-count]` elements. The displayed value
//! at a point in time is `floor(target * elapsed / duration)`, which matches
//! adding `target / frames` per animation frame, and is exactly the target
//! once the duration has passed.

use super::observer::OneShotObserver;
use crate::config::CounterConfig;
use crate::markup;
use std::time::Duration;
use tracing::debug;

const COUNTER_CLASS: &str = "stat-number";
const COUNT_ATTR: &str = "data-count";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAnimation {
    target: u64,
    duration: Duration,
    frame: Duration,
}

impl CounterAnimation {
    pub fn new(target: u64, config: &CounterConfig) -> Self {
        Self {
            target,
            duration: Duration::from_millis(config.duration_ms.max(1)),
            frame: Duration::from_millis(config.frame_ms.max(1)),
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Value shown `elapsed` after the animation started.
    pub fn value_at(&self, elapsed: Duration) -> u64 {
        if elapsed >= self.duration {
            return self.target;
        }
        let scaled = u128::from(self.target) * elapsed.as_micros() / self.duration.as_micros();
        u64::try_from(scaled).unwrap_or(self.target)
    }

    /// Every displayed value, one per frame, ending on the target.
    pub fn frames(&self) -> Vec<u64> {
        let mut values = Vec::new();
        let mut elapsed = self.frame;
        while elapsed < self.duration {
            values.push(self.value_at(elapsed));
            elapsed += self.frame;
        }
        values.push(self.target);
        values
    }
}

/// Counter targets on a page, in document order.
///
/// Elements whose `data-count` is not a non-negative integer are skipped.
pub fn find_counters(html: &str) -> Vec<u64> {
    markup::tags(html)
        .filter(|t| t.is_start() && t.has_class(COUNTER_CLASS))
        .filter_map(|t| {
            let raw = t.attr(COUNT_ATTR)?;
            match raw.trim().parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    debug!(value = raw, "ignoring non-numeric counter target");
                    None
                }
            }
        })
        .collect()
}

/// All counters of a page, each started on its first visibility.
#[derive(Debug, Clone)]
pub struct CounterBoard {
    animations: Vec<CounterAnimation>,
    observer: OneShotObserver<usize>,
}

impl CounterBoard {
    pub fn new(targets: &[u64], config: &CounterConfig) -> Self {
        let mut observer = OneShotObserver::new();
        let animations = targets
            .iter()
            .enumerate()
            .map(|(index, &target)| {
                observer.observe(index);
                CounterAnimation::new(target, config)
            })
            .collect();
        Self {
            animations,
            observer,
        }
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Counters (by index) that start with this visibility batch.
    pub fn on_visibility(&mut self, entries: &[(usize, bool)]) -> Vec<(usize, CounterAnimation)> {
        self.observer
            .notify(entries)
            .into_iter()
            .filter_map(|(_, index)| self.animations.get(index).map(|a| (index, *a)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CounterConfig {
        CounterConfig::default()
    }

    #[test]
    fn value_starts_at_zero_and_ends_at_target() {
        let counter = CounterAnimation::new(120, &config());
        assert_eq!(counter.value_at(Duration::ZERO), 0);
        assert_eq!(counter.value_at(Duration::from_millis(1000)), 60);
        assert_eq!(counter.value_at(Duration::from_millis(2000)), 120);
        assert_eq!(counter.value_at(Duration::from_secs(10)), 120);
    }

    #[test]
    fn frames_are_monotonic_and_finish_on_target() {
        let counter = CounterAnimation::new(16, &config());
        let frames = counter.frames();
        // 2000ms at 16ms cadence: 124 partial frames + the final target
        assert_eq!(frames.len(), 125);
        assert_eq!(frames.last(), Some(&16));
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn zero_target_is_a_single_frame_of_zero_values() {
        let counter = CounterAnimation::new(0, &config());
        assert!(counter.frames().iter().all(|&v| v == 0));
    }

    #[test]
    fn find_counters_reads_data_count() {
        let html = r#"
            <span class="stat-number" data-count="5">0</span>
            <span class="stat-number" data-count="abc">0</span>
            <span class="stat-label" data-count="9">x</span>
            <span class="stat-number big" data-count=" 42 ">0</span>
            <span class="stat-number">7</span>"#;
        assert_eq!(find_counters(html), vec![5, 42]);
    }

    #[test]
    fn board_starts_each_counter_once() {
        let mut board = CounterBoard::new(&[5, 120], &config());
        let started = board.on_visibility(&[(1, true)]);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].0, 1);
        assert_eq!(started[0].1.target(), 120);

        assert!(board.on_visibility(&[(1, true)]).is_empty());
        assert_eq!(board.on_visibility(&[(0, true)]).len(), 1);
    }
}
