//! The looping typed-text effect.
//!
//! [`Typewriter`] is the pure state machine: every [`step`](Typewriter::step)
//! types or deletes one character and says how long to wait before the next
//! step. A full phrase is held for `hold_ms`, an emptied one advances to the
//! next phrase, wrapping around forever.
//!
//! [`TypingTask`] drives a typewriter on its own thread and can be stopped at
//! any time; dropping the task stops it too.

use crate::config::TypingConfig;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What to display after a step, and when to take the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingFrame {
    pub text: String,
    pub next_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<Vec<char>>,
    phrase: usize,
    chars: usize,
    deleting: bool,
    cycles: usize,
    type_delay: Duration,
    delete_delay: Duration,
    hold: Duration,
    start_delay: Duration,
}

impl Typewriter {
    /// `None` when there is no non-empty phrase to type.
    pub fn new(config: &TypingConfig) -> Option<Self> {
        let phrases: Vec<Vec<char>> = config
            .phrases
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.chars().collect())
            .collect();
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases,
            phrase: 0,
            chars: 0,
            deleting: false,
            cycles: 0,
            type_delay: Duration::from_millis(config.type_ms),
            delete_delay: Duration::from_millis(config.delete_ms),
            hold: Duration::from_millis(config.hold_ms),
            start_delay: Duration::from_millis(config.start_delay_ms),
        })
    }

    /// Delay before the very first step.
    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    /// Number of phrases typed and fully deleted so far.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn step(&mut self) -> TypingFrame {
        let current = &self.phrases[self.phrase];
        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
        } else {
            self.chars = (self.chars + 1).min(current.len());
        }
        let text: String = current[..self.chars].iter().collect();

        let mut next_delay = if self.deleting {
            self.delete_delay
        } else {
            self.type_delay
        };

        if !self.deleting && self.chars == current.len() {
            next_delay = self.hold;
            self.deleting = true;
        } else if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
            self.cycles += 1;
        }

        TypingFrame { text, next_delay }
    }
}

impl Iterator for Typewriter {
    type Item = TypingFrame;

    /// Never ends.
    fn next(&mut self) -> Option<TypingFrame> {
        Some(self.step())
    }
}

/// A typewriter running on a background thread until stopped.
pub struct TypingTask {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<usize>>,
}

impl TypingTask {
    /// Start typing; `render` receives the text after every step.
    pub fn spawn<F>(mut typewriter: Typewriter, mut render: F) -> std::io::Result<Self>
    where
        F: FnMut(&str) + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("typing-effect".to_string())
            .spawn(move || {
                let mut steps = 0usize;
                let mut delay = typewriter.start_delay();
                loop {
                    match stopped.recv_timeout(delay) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    let frame = typewriter.step();
                    render(&frame.text);
                    steps += 1;
                    delay = frame.next_delay;
                }
                steps
            })?;
        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Stop the loop and wait for it. Returns the number of steps rendered.
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        if let Some(stop) = self.stop.take() {
            // The thread may already be gone; either way it stops.
            let _ = stop.send(());
        }
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for TypingTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
