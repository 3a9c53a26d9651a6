//! Pausable stopwatch that excludes paused intervals from elapsed time.

use chrono::{DateTime, Duration, Local};

use crate::clock::Clock;

/// Where a timer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    /// Not started, or fully stopped. Always reads zero.
    Stopped,
    /// Counting.
    Running {
        started_at: DateTime<Local>,
        /// Total time spent paused since `started_at`.
        paused_total: Duration,
    },
    /// Frozen at `paused_at` until resumed.
    Paused {
        started_at: DateTime<Local>,
        paused_at: DateTime<Local>,
        paused_total: Duration,
    },
}

/// A start/pause/resume/stop timer driven by a [`Clock`].
///
/// Elapsed time is `now - started_at - paused_total` while running and is
/// frozen at the pause instant while paused. A new run only begins when
/// [`start`](Self::start) is called on a stopped timer.
#[derive(Debug, Clone)]
pub struct Timer<C: Clock> {
    clock: C,
    state: TimerState,
}

impl<C: Clock> Timer<C> {
    /// Creates a stopped timer.
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            state: TimerState::Stopped,
        }
    }

    /// Starts a fresh run when stopped, or resumes when paused.
    ///
    /// Calling this on a running timer does nothing.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.state = match self.state {
            TimerState::Stopped => TimerState::Running {
                started_at: now,
                paused_total: Duration::zero(),
            },
            TimerState::Paused {
                started_at,
                paused_at,
                paused_total,
            } => TimerState::Running {
                started_at,
                paused_total: paused_total + (now - paused_at),
            },
            running @ TimerState::Running { .. } => running,
        };
    }

    /// Freezes a running timer. No-op when stopped or already paused.
    pub fn pause(&mut self) {
        if let TimerState::Running {
            started_at,
            paused_total,
        } = self.state
        {
            self.state = TimerState::Paused {
                started_at,
                paused_at: self.clock.now(),
                paused_total,
            };
        }
    }

    /// Stops the timer and returns the elapsed time it had reached.
    ///
    /// The reading is taken before the state flips, since a stopped timer
    /// always reports zero. Stopping a stopped timer returns zero.
    pub fn stop(&mut self) -> Duration {
        let elapsed = self.elapsed();
        self.state = TimerState::Stopped;
        elapsed
    }

    /// Elapsed active time as of now.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(self.clock.now())
    }

    /// Elapsed active time measured against `now`.
    ///
    /// A paused timer ignores `now` and reports the time at which it was
    /// paused. The result is clamped at zero.
    pub fn elapsed_at(&self, now: DateTime<Local>) -> Duration {
        let elapsed = match self.state {
            TimerState::Stopped => return Duration::zero(),
            TimerState::Running {
                started_at,
                paused_total,
            } => now - started_at - paused_total,
            TimerState::Paused {
                started_at,
                paused_at,
                paused_total,
            } => paused_at - started_at - paused_total,
        };
        elapsed.max(Duration::zero())
    }

    /// True unless the timer is stopped.
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, TimerState::Stopped)
    }

    /// True while counting.
    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// True while paused.
    pub const fn is_paused(&self) -> bool {
        matches!(self.state, TimerState::Paused { .. })
    }

    /// The clock this timer reads.
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn setup() -> (ManualClock, Timer<ManualClock>) {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap());
        let timer = Timer::new(clock.clone());
        (clock, timer)
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    #[test]
    fn test_new_timer_is_stopped_and_reads_zero() {
        let (clock, timer) = setup();
        clock.advance_ms(5_000);

        assert!(!timer.is_active());
        assert!(!timer.is_paused());
        assert_eq!(timer.elapsed(), Duration::zero());
    }

    #[test]
    fn test_running_timer_tracks_clock() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(1_234);

        assert!(timer.is_running());
        assert_eq!(timer.elapsed(), ms(1_234));
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(700);
        timer.start();
        clock.advance_ms(300);

        assert_eq!(timer.elapsed(), ms(1_000));
    }

    #[test]
    fn test_paused_timer_is_frozen() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(400);
        timer.pause();
        let frozen = timer.elapsed();
        clock.advance_ms(10_000);

        assert!(timer.is_paused());
        assert!(timer.is_active());
        assert_eq!(frozen, ms(400));
        assert_eq!(timer.elapsed(), ms(400));
    }

    #[test]
    fn test_resume_excludes_paused_interval() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(1_000);
        timer.pause();
        clock.advance_ms(5_000);
        timer.start();
        clock.advance_ms(250);

        assert_eq!(timer.elapsed(), ms(1_250));
    }

    #[test]
    fn test_multiple_pause_cycles_accumulate() {
        let (clock, mut timer) = setup();
        timer.start();
        for _ in 0..3 {
            clock.advance_ms(100);
            timer.pause();
            clock.advance_ms(900);
            timer.start();
        }
        clock.advance_ms(100);

        assert_eq!(timer.elapsed(), ms(400));
    }

    #[test]
    fn test_pause_when_stopped_or_paused_is_noop() {
        let (clock, mut timer) = setup();
        timer.pause();
        assert!(!timer.is_active());

        timer.start();
        clock.advance_ms(100);
        timer.pause();
        clock.advance_ms(100);
        timer.pause();
        clock.advance_ms(100);
        timer.start();

        assert_eq!(timer.elapsed(), ms(100));
    }

    #[test]
    fn test_stop_returns_elapsed_then_reads_zero() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(2_500);
        let before = timer.elapsed();
        let stopped = timer.stop();

        assert_eq!(stopped, before);
        assert_eq!(stopped, ms(2_500));
        assert_eq!(timer.elapsed(), Duration::zero());
        assert!(!timer.is_active());
    }

    #[test]
    fn test_stop_while_paused_returns_frozen_value() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(800);
        timer.pause();
        clock.advance_ms(3_000);

        assert_eq!(timer.stop(), ms(800));
        assert!(!timer.is_paused());
    }

    #[test]
    fn test_stop_when_stopped_returns_zero() {
        let (_clock, mut timer) = setup();
        assert_eq!(timer.stop(), Duration::zero());
    }

    #[test]
    fn test_restart_after_stop_resets_baseline() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(1_000);
        timer.pause();
        clock.advance_ms(1_000);
        timer.stop();
        clock.advance_ms(1_000);
        timer.start();
        clock.advance_ms(50);

        assert_eq!(timer.elapsed(), ms(50));
    }

    #[test]
    fn test_elapsed_never_negative_when_clock_goes_backwards() {
        let (clock, mut timer) = setup();
        timer.start();
        clock.advance_ms(-500);

        assert_eq!(timer.elapsed(), Duration::zero());
    }

    #[test]
    fn test_elapsed_is_monotonic_while_running() {
        let (clock, mut timer) = setup();
        timer.start();
        let mut last = timer.elapsed();
        for step in [1, 10, 0, 250, 3] {
            clock.advance_ms(step);
            let now = timer.elapsed();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_elapsed_at_uses_reference_instant() {
        let (clock, mut timer) = setup();
        timer.start();
        let reference = clock.now() + ms(600);
        clock.advance_ms(10_000);

        assert_eq!(timer.elapsed_at(reference), ms(600));
    }
}
