//! Cooperative cancellation and clock budgeting for searches.
//!
//! A [`StopHandle`] is a shared flag another thread can raise at any time.
//! [`TimeControl`] pairs it with an optional deadline and is polled by the
//! search every [`CHECK_INTERVAL`] nodes; once the deadline passes it raises
//! the flag itself, so the search only ever has one thing to look at.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// How often (in nodes) the search looks at the clock.
pub const CHECK_INTERVAL: u64 = 1024;

/// Cloneable stop flag shared between a search and whoever may cancel it.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search to stop at its next poll.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Per-search clock: a start instant, an optional budget and the shared
/// stop flag.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stop: StopHandle,
    start: Instant,
    budget: Option<Duration>,
}

impl TimeControl {
    /// Start the clock now. Clears any stop request left from a previous
    /// search.
    pub fn start(stop: StopHandle, budget: Option<Duration>) -> Self {
        stop.reset();
        Self {
            stop,
            start: Instant::now(),
            budget,
        }
    }

    /// Fast check of the stop flag only.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Poll for cancellation. The clock itself is read only every
    /// [`CHECK_INTERVAL`] nodes.
    #[inline]
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.is_stopped() {
            return true;
        }
        if nodes.is_multiple_of(CHECK_INTERVAL) {
            return self.check_time();
        }
        false
    }

    /// Read the clock and raise the stop flag if the budget is spent.
    pub fn check_time(&self) -> bool {
        if let Some(budget) = self.budget
            && self.start.elapsed() >= budget
        {
            self.stop.stop();
        }
        self.is_stopped()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left in the budget; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        let budget = self.budget?;
        Some(budget.saturating_sub(self.elapsed()))
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }
}

/// Moves assumed left in the game when the GUI does not say.
pub const DEFAULT_MOVES_TO_GO: u32 = 30;

/// Time to spend on one move given the side's clock: an even share of the
/// remaining time plus most of the increment, never more than a quarter of
/// what is left.
pub fn clock_budget(remaining: Duration, increment: Duration, moves_to_go: Option<u32>) -> Duration {
    let moves = moves_to_go.filter(|&m| m > 0).unwrap_or(DEFAULT_MOVES_TO_GO);
    let share = remaining / moves + increment * 3 / 4;
    share.min(remaining / 4)
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
