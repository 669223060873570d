//! Time control and search limits for engines.
//!
//! This module provides shared time management functionality that can be used
//! by any engine implementation to respect time constraints during search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Deepest iteration a time-only search will attempt.
pub const MAX_SEARCH_DEPTH: u8 = 32;

/// Search limits that control when an engine should stop searching.
///
/// Iterations up to `min_depth` always complete. Deeper iterations stop as
/// soon as the time limit expires, and the engine falls back to the last
/// completed iteration.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Iterations that run to completion regardless of the clock
    pub min_depth: u8,
    /// Deepest iteration to attempt
    pub max_depth: u8,
    /// Maximum time allowed for this move (None = infinite)
    pub move_time: Option<Duration>,
    /// Time controller for checking if search should stop
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Fixed depth, no time limit.
    pub fn depth(depth: u8) -> Self {
        Self {
            min_depth: depth,
            max_depth: depth,
            move_time: None,
            time_control: TimeControl::new(None),
        }
    }

    /// Guaranteed iterations up to `min_depth`, then deepen until `max_depth`
    /// or until `move_time` runs out.
    pub fn depth_and_time(min_depth: u8, max_depth: u8, move_time: Duration) -> Self {
        Self {
            min_depth: min_depth.min(max_depth),
            max_depth,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Time constraint only; depth 1 is always completed.
    pub fn time(move_time: Duration) -> Self {
        Self::depth_and_time(1, MAX_SEARCH_DEPTH, move_time)
    }

    /// Start the time control clock. Call this when search begins.
    pub fn start(&mut self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Time controller that tracks whether search should stop.
///
/// Clones share the stop flag, so a clone handed to another thread can
/// interrupt a running search. The `is_stopped()` check is a relaxed atomic
/// load and is cheap enough to call on every node.
#[derive(Debug, Clone)]
pub struct TimeControl {
    /// Shared stop flag
    stopped: Arc<AtomicBool>,
    /// Start time of the search
    start_time: Option<Instant>,
    /// Time limit for this search (None = infinite)
    time_limit: Option<Duration>,
    /// How often to check the clock (in nodes). Checking every node is wasteful.
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: None,
            time_limit,
            check_interval: 1024,
        }
    }

    /// Start the clock. A stop already requested stays in force; each
    /// search gets a fresh flag from `new`.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Force stop the search immediately.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// The shared flag behind `stop()`, for callers on other threads. Setting
    /// it before the search starts is honoured: the search then finishes its
    /// guaranteed iterations and returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Check time and update stopped flag if time expired.
    ///
    /// This does the actual clock check. Call this periodically (e.g., every N nodes)
    /// rather than on every node to avoid performance overhead.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(limit) = self.time_limit
            && let Some(start) = self.start_time
            && start.elapsed() >= limit
        {
            self.stop();
            return true;
        }

        false
    }

    /// Returns true every `check_interval` nodes.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes.is_multiple_of(self.check_interval)
    }

    /// Get elapsed time since search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
