//! Wall-clock sources for timers.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local};

/// A source of "now" readings.
///
/// Timers only ever ask a clock for the current instant, so swapping the
/// clock is enough to make every timing path deterministic.
pub trait Clock: Clone {
    /// Returns the current local instant.
    fn now(&self) -> DateTime<Local>;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a session and the test driving it
/// observe the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Local>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Moves the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Convenience wrapper around [`advance`](Self::advance) for milliseconds.
    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}
