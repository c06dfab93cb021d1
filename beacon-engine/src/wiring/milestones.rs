//! Once-only progress trackers for scroll depth, time on page, and CTA
//! hover timing. Plain state machines so they test without a runtime.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Scroll-depth milestones, in percent.
pub const SCROLL_MILESTONES: [u8; 5] = [25, 50, 75, 90, 100];

/// Time-on-page checkpoints, in seconds.
pub const TIME_CHECKPOINTS: [u64; 5] = [10, 30, 60, 120, 300];

/// Tracks the deepest scroll seen and which milestones already fired.
#[derive(Debug, Default)]
pub struct ScrollDepth {
    max_percent: u8,
    fired: [bool; SCROLL_MILESTONES.len()],
}

impl ScrollDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current scroll position; returns the milestones newly
    /// crossed, each reported exactly once no matter how the position
    /// oscillates afterwards.
    pub fn observe(&mut self, percent: u8) -> Vec<u8> {
        self.max_percent = self.max_percent.max(percent);
        let mut crossed = Vec::new();
        for (i, &milestone) in SCROLL_MILESTONES.iter().enumerate() {
            if percent >= milestone && !self.fired[i] {
                self.fired[i] = true;
                crossed.push(milestone);
            }
        }
        crossed
    }

    /// Deepest position seen this page load.
    pub fn max_percent(&self) -> u8 {
        self.max_percent
    }
}

/// Tracks which elapsed-time checkpoints already fired.
#[derive(Debug, Default)]
pub struct TimeOnPage {
    fired: [bool; TIME_CHECKPOINTS.len()],
}

impl TimeOnPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the elapsed seconds; returns checkpoints newly reached.
    pub fn observe(&mut self, elapsed_secs: u64) -> Vec<u64> {
        let mut reached = Vec::new();
        for (i, &checkpoint) in TIME_CHECKPOINTS.iter().enumerate() {
            if elapsed_secs >= checkpoint && !self.fired[i] {
                self.fired[i] = true;
                reached.push(checkpoint);
            }
        }
        reached
    }
}

/// Per-button hover timing. Re-entering a button restarts its clock;
/// leaving a button that was never entered yields nothing.
#[derive(Debug, Default)]
pub struct HoverTimer {
    active: HashMap<String, Instant>,
}

impl HoverTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, target: &str) {
        self.enter_at(target, Instant::now());
    }

    pub fn enter_at(&mut self, target: &str, at: Instant) {
        self.active.insert(target.to_string(), at);
    }

    pub fn leave(&mut self, target: &str) -> Option<Duration> {
        self.leave_at(target, Instant::now())
    }

    pub fn leave_at(&mut self, target: &str, at: Instant) -> Option<Duration> {
        self.active
            .remove(target)
            .map(|entered| at.saturating_duration_since(entered))
    }
}
