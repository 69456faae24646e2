#![forbid(unsafe_code)]

//! Host-driven frame scheduler.
//!
//! The host calls [`FrameLoop::tick`] from its animation callback (or a test
//! calls it directly). While stopped, ticks are refused, so a stale callback
//! that fires after [`stop`](FrameLoop::stop) draws nothing.

use std::time::Duration;

use web_time::Instant;

/// One accepted tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based index since the last `start`.
    pub index: u64,
    /// Time since the previous accepted tick.
    pub since_last: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    running: bool,
    frames: u64,
    last: Option<Instant>,
}

impl FrameLoop {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: false,
            frames: 0,
            last: None,
        }
    }

    /// Begin accepting ticks. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.frames = 0;
        self.last = None;
        tracing::debug!(target: "antgrid.render", "frame loop started");
        true
    }

    /// Stop accepting ticks. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        tracing::debug!(target: "antgrid.render", frames = self.frames, "frame loop stopped");
        true
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames accepted since the last `start`.
    #[inline]
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Accept a tick at `now`, or `None` while stopped.
    pub fn tick(&mut self, now: Instant) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        let tick = FrameTick {
            index: self.frames,
            since_last: self.last.map(|last| now.saturating_duration_since(last)),
        };
        self.frames += 1;
        self.last = Some(now);
        Some(tick)
    }
}
