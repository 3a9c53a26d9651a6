//! Lockstep control of the session and activity timers.
//!
//! The session timer measures the whole study; the activity timer measures
//! the element (or delay) currently being timed. Both are only ever mutated
//! here, which keeps them paused and resumed together.

use chrono::Duration;

use crate::clock::Clock;
use crate::log::{LogEntry, StudyLog};
use crate::rating::Rating;
use crate::timer::Timer;

/// Element name recorded for delay periods.
pub const DELAY_ELEMENT: &str = "Delay";

/// Element name recorded when nothing was selected.
pub const NO_ELEMENT: &str = "N/A";

/// Operator-entered fields copied onto the next log entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryInput<'a> {
    pub category: &'a str,
    pub notes: &'a str,
    /// Raw rating text; parsed leniently.
    pub rating: Option<&'a str>,
}

/// Coarse state of the activity timer, for labelling controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityState {
    Idle,
    Running,
    Paused,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    /// A new activity began. `from` is the element that was running, if any.
    Switched { from: Option<String>, to: String },
    /// An entry was appended to the log.
    Logged { element: String, observed: Duration },
    Paused { element: Option<String> },
    Resumed { element: Option<String> },
    /// Both timers were stopped and the current element cleared.
    Reset,
}

/// Drives the two timers and turns finished activities into log entries.
#[derive(Debug, Clone)]
pub struct ActivityLogger<C: Clock> {
    session: Timer<C>,
    activity: Timer<C>,
    current: Option<String>,
    delay_active: bool,
    events: Vec<ActivityEvent>,
}

impl<C: Clock> ActivityLogger<C> {
    pub fn new(clock: C) -> Self {
        Self {
            session: Timer::new(clock.clone()),
            activity: Timer::new(clock),
            current: None,
            delay_active: false,
            events: Vec::new(),
        }
    }

    /// Starts timing `name`, logging whatever was running before.
    pub fn begin_activity(&mut self, name: &str, input: EntryInput<'_>, log: &mut StudyLog) {
        self.switch_to(name.to_string(), false, input, log);
    }

    /// Starts timing a delay, logging whatever was running before.
    pub fn begin_delay(&mut self, input: EntryInput<'_>, log: &mut StudyLog) {
        self.switch_to(DELAY_ELEMENT.to_string(), true, input, log);
    }

    fn switch_to(&mut self, name: String, delay: bool, input: EntryInput<'_>, log: &mut StudyLog) {
        let from = self.current.clone();
        if self.activity.is_running() {
            self.log_current_activity(input, log);
        } else if self.activity.is_paused() {
            tracing::debug!(
                element = from.as_deref().unwrap_or(NO_ELEMENT),
                elapsed_ms = self.activity.elapsed().num_milliseconds(),
                "discarding paused activity on switch"
            );
        }

        tracing::debug!(from = ?from, to = %name, delay, "switching activity");
        self.current = Some(name.clone());
        self.delay_active = delay;
        self.restart_timers();
        self.events.push(ActivityEvent::Switched { from, to: name });
    }

    /// Resumes a paused session timer (or starts a stopped one) and gives the
    /// activity timer a fresh baseline.
    fn restart_timers(&mut self) {
        if !self.session.is_running() {
            self.session.start();
        }
        self.activity.stop();
        self.activity.start();
    }

    /// Pauses both timers. No-op unless an activity is running.
    pub fn pause_current(&mut self) {
        if !self.activity.is_running() {
            return;
        }
        self.session.pause();
        self.activity.pause();
        tracing::debug!(element = ?self.current, "paused");
        self.events.push(ActivityEvent::Paused {
            element: self.current.clone(),
        });
    }

    /// Resumes both timers. No-op unless the activity is paused.
    pub fn resume_current(&mut self) {
        if !self.activity.is_paused() {
            return;
        }
        self.session.start();
        self.activity.start();
        tracing::debug!(element = ?self.current, "resumed");
        self.events.push(ActivityEvent::Resumed {
            element: self.current.clone(),
        });
    }

    /// Stops the activity timer and appends its entry to `log`.
    ///
    /// Returns `false` without touching anything when no activity is active.
    /// A paused activity is logged with the time it had reached.
    pub fn log_current_activity(&mut self, input: EntryInput<'_>, log: &mut StudyLog) -> bool {
        if !self.activity.is_active() {
            return false;
        }

        let stopped_at = self.activity.clock().now();
        // Must be read before stop(): a stopped timer reports zero.
        let observed = self.activity.elapsed_at(stopped_at);
        let started_at = stopped_at - observed;
        self.activity.stop();

        let rating = if self.delay_active {
            Rating::NotApplicable
        } else {
            Rating::parse_lenient(input.rating)
        };
        let element = self
            .current
            .clone()
            .unwrap_or_else(|| NO_ELEMENT.to_string());

        let entry = LogEntry {
            element: element.clone(),
            category: input.category.to_string(),
            started_at,
            stopped_at,
            observed,
            rating,
            normal: rating.scale(observed),
            notes: input.notes.to_string(),
        };
        tracing::info!(
            element = %element,
            observed_ms = observed.num_milliseconds(),
            rating = %rating,
            "logged activity"
        );
        log.append(entry);
        self.events.push(ActivityEvent::Logged { element, observed });
        true
    }

    /// Logs any active activity, then stops everything.
    pub fn reset_all(&mut self, input: EntryInput<'_>, log: &mut StudyLog) {
        if self.activity.is_active() {
            self.log_current_activity(input, log);
        }
        self.session.stop();
        self.activity.stop();
        self.current = None;
        self.delay_active = false;
        tracing::debug!("timers reset");
        self.events.push(ActivityEvent::Reset);
    }

    pub fn session_elapsed(&self) -> Duration {
        self.session.elapsed()
    }

    pub fn activity_elapsed(&self) -> Duration {
        self.activity.elapsed()
    }

    pub fn current_element(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub const fn is_delay_active(&self) -> bool {
        self.delay_active
    }

    pub const fn activity_state(&self) -> ActivityState {
        if self.activity.is_running() {
            ActivityState::Running
        } else if self.activity.is_paused() {
            ActivityState::Paused
        } else {
            ActivityState::Idle
        }
    }

    /// Session timer state, for invariant checks.
    pub const fn session_timer(&self) -> &Timer<C> {
        &self.session
    }

    /// Activity timer state, for invariant checks.
    pub const fn activity_timer(&self) -> &Timer<C> {
        &self.activity
    }

    /// Drains queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<ActivityEvent> {
        std::mem::take(&mut self.events)
    }
}
