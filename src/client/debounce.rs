//! Trailing-edge debounce driven by explicit timestamps.
//!
//! The controller calls `push` on every keystroke and `poll` whenever it
//! gets a chance; a value is released only once `wait` has passed since the
//! last push.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Replace any pending value and restart the wait.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.wait));
    }

    /// The pending value, if its wait has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, deadline)) if *deadline <= now);
        if ready {
            self.flush()
        } else {
            None
        }
    }

    /// When the pending value becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, d)| *d)
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
