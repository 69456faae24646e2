#![forbid(unsafe_code)]

//! Debounced "input has gone quiet" timer.
//!
//! Host-driven: nothing fires on its own. Input handlers [`arm`](SettleTimer::arm)
//! it, and the frame loop [`poll`](SettleTimer::poll)s it with the current time.
//! A late or missed poll only delays the switch back to incremental repaint.

use std::time::Duration;

use web_time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleTimer {
    deadline: Option<Instant>,
}

impl SettleTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// (Re)start the timer. A later arm replaces an earlier deadline.
    pub fn arm(&mut self, now: Instant, quiet: Duration) {
        self.deadline = Some(now + quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
