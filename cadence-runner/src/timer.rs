//! Iteration timing.
//!
//! Wall-clock timing at microsecond resolution, the base unit of the whole
//! engine. Nanosecond precision is kept internally and rounded into
//! fractional microseconds on read.

use std::time::Instant;

/// Timer for measuring one iteration.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed microseconds.
    #[inline(always)]
    pub fn stop(&self) -> f64 {
        self.start.elapsed().as_nanos() as f64 / 1_000.0
    }
}
