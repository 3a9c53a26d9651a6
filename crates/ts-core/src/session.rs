//! The study session: everything one time study needs, owned in one place.

use chrono::Duration;

use crate::clock::Clock;
use crate::log::{ExportError, Progress, StudyLog};
use crate::logger::{ActivityEvent, ActivityLogger, ActivityState, EntryInput};
use crate::registry::{ElementRegistry, ElementStatus, RegistryError};

/// Pending operator input applied to the next logged entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorInput {
    pub category: String,
    /// Cleared after every logged entry.
    pub notes: String,
    /// Raw rating text as typed.
    pub rating: Option<String>,
}

impl OperatorInput {
    fn as_entry_input(&self) -> EntryInput<'_> {
        EntryInput {
            category: &self.category,
            notes: &self.notes,
            rating: self.rating.as_deref(),
        }
    }
}

/// A point-in-time view for the display tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub session_elapsed: Duration,
    pub activity_elapsed: Duration,
    pub current: Option<String>,
    pub state: ActivityState,
    pub delay_active: bool,
    pub progress: Progress,
}

/// Top-level controller for a time study.
#[derive(Debug, Clone)]
pub struct StudySession<C: Clock> {
    registry: ElementRegistry,
    logger: ActivityLogger<C>,
    log: StudyLog,
    /// Operator input for the next entry.
    pub input: OperatorInput,
}

impl<C: Clock> StudySession<C> {
    pub fn new(clock: C) -> Self {
        Self {
            registry: ElementRegistry::new(),
            logger: ActivityLogger::new(clock),
            log: StudyLog::new(),
            input: OperatorInput::default(),
        }
    }

    pub fn add_element(&mut self, name: &str) -> Result<String, RegistryError> {
        self.registry.add(name).map(str::to_string)
    }

    /// Starts timing a registered element, logging the running one.
    ///
    /// Unregistered names and the delay marker are refused and leave the
    /// timers untouched; delays start through [`begin_delay`](Self::begin_delay).
    pub fn begin_activity(&mut self, name: &str) -> Result<(), RegistryError> {
        let name = name.trim();
        self.registry.check_startable(name)?;
        let before = self.log.len();
        self.logger
            .begin_activity(name, self.input.as_entry_input(), &mut self.log);
        self.after_log(before);
        Ok(())
    }

    pub fn begin_delay(&mut self) {
        let before = self.log.len();
        self.logger
            .begin_delay(self.input.as_entry_input(), &mut self.log);
        self.after_log(before);
    }

    pub fn pause(&mut self) {
        self.logger.pause_current();
    }

    pub fn resume(&mut self) {
        self.logger.resume_current();
    }

    /// Logs the running activity (if any) and stops both timers.
    pub fn reset(&mut self) {
        let before = self.log.len();
        self.logger
            .reset_all(self.input.as_entry_input(), &mut self.log);
        self.after_log(before);
    }

    /// Resets the timers and drops every entry. Callers confirm first.
    pub fn clear(&mut self) {
        self.reset();
        self.log.clear();
        tracing::debug!("study log cleared");
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        self.log.to_csv()
    }

    pub fn progress(&self) -> Progress {
        self.log.completion_ratio(&self.registry)
    }

    pub fn element_statuses(&self) -> Vec<(&str, ElementStatus)> {
        self.registry
            .statuses(self.logger.current_element(), &self.log)
    }

    /// Read-only snapshot for periodic display refresh.
    pub fn readout(&self) -> Readout {
        Readout {
            session_elapsed: self.logger.session_elapsed(),
            activity_elapsed: self.logger.activity_elapsed(),
            current: self.logger.current_element().map(str::to_string),
            state: self.logger.activity_state(),
            delay_active: self.logger.is_delay_active(),
            progress: self.progress(),
        }
    }

    pub fn take_events(&mut self) -> Vec<ActivityEvent> {
        self.logger.take_events()
    }

    pub const fn log(&self) -> &StudyLog {
        &self.log
    }

    fn after_log(&mut self, before: usize) {
        if self.log.len() > before {
            self.input.notes.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::log::LogEntry;
    use crate::logger::DELAY_ELEMENT;
    use crate::rating::Rating;
    use chrono::{Local, TimeZone};

    fn setup() -> (ManualClock, StudySession<ManualClock>) {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap());
        let mut session = StudySession::new(clock.clone());
        session.add_element("A").unwrap();
        session.add_element("B").unwrap();
        (clock, session)
    }

    #[test]
    fn scenario_switch_delay_reset() {
        let (clock, mut session) = setup();

        session.begin_activity("A").unwrap();
        clock.advance_ms(1_000);
        session.begin_activity("B").unwrap();
        session.begin_delay();
        clock.advance_ms(500);
        session.reset();

        let rows: Vec<_> = session.log().entries().iter().map(LogEntry::row).collect();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].element, "A");
        assert_eq!(rows[0].observed_time, "00:00:01.000");
        assert_eq!(rows[0].start_time, "09:00:00");
        assert_eq!(rows[0].stop_time, "09:00:01");

        assert_eq!(rows[1].element, "B");
        assert_eq!(rows[1].observed_time, "00:00:00.000");

        assert_eq!(rows[2].element, DELAY_ELEMENT);
        assert_eq!(rows[2].observed_time, "00:00:00.500");
        assert_eq!(rows[2].rating, "N/A");
        assert_eq!(rows[2].normal_time, rows[2].observed_time);

        let readout = session.readout();
        assert_eq!(readout.state, ActivityState::Idle);
        assert_eq!(readout.session_elapsed, Duration::zero());
        assert_eq!(readout.progress.to_string(), "2/2 (100%)");
    }

    #[test]
    fn notes_clear_after_each_entry_but_category_and_rating_persist() {
        let (clock, mut session) = setup();
        session.input.category = "Assembly".to_string();
        session.input.rating = Some("110".to_string());
        session.input.notes = "dropped a screw".to_string();

        session.begin_activity("A").unwrap();
        assert_eq!(session.input.notes, "dropped a screw");
        clock.advance_ms(1_000);
        session.begin_activity("B").unwrap();

        assert_eq!(session.input.notes, "");
        assert_eq!(session.input.category, "Assembly");
        let entry = &session.log().entries()[0];
        assert_eq!(entry.notes(), "dropped a screw");
        assert_eq!(entry.rating(), Rating::Percent(110));
        assert_eq!(entry.normal(), Duration::milliseconds(1_100));
    }

    #[test]
    fn clear_flushes_then_empties_log() {
        let (clock, mut session) = setup();
        session.begin_activity("A").unwrap();
        clock.advance_ms(100);
        session.clear();

        assert!(session.log().is_empty());
        assert_eq!(session.readout().current, None);
        assert!(matches!(session.export_csv(), Err(ExportError::Empty)));
    }

    #[test]
    fn readout_does_not_change_state() {
        let (clock, mut session) = setup();
        session.begin_activity("A").unwrap();
        clock.advance_ms(250);

        let first = session.readout();
        let second = session.readout();
        assert_eq!(first, second);
        assert_eq!(first.activity_elapsed, Duration::milliseconds(250));
        assert!(session.log().is_empty());
    }

    #[test]
    fn element_statuses_track_current_and_completed() {
        let (clock, mut session) = setup();
        session.add_element("C").unwrap();

        session.begin_activity("A").unwrap();
        clock.advance_ms(10);
        session.begin_activity("B").unwrap();

        assert_eq!(
            session.element_statuses(),
            [
                ("A", ElementStatus::Completed),
                ("B", ElementStatus::Current),
                ("C", ElementStatus::Pending),
            ]
        );
        assert_eq!(session.progress().percent, 33);
    }

    #[test]
    fn paused_session_is_resumed_by_switch() {
        let (clock, mut session) = setup();
        session.begin_activity("A").unwrap();
        clock.advance_ms(100);
        session.pause();
        clock.advance_ms(1_000);
        session.begin_delay();

        let readout = session.readout();
        assert_eq!(readout.state, ActivityState::Running);
        assert!(readout.delay_active);
        assert_eq!(readout.session_elapsed, Duration::milliseconds(100));
    }

    #[test]
    fn begin_activity_refuses_delay_marker_and_unknown_names() {
        let (clock, mut session) = setup();
        session.input.rating = Some("50".to_string());

        assert_eq!(
            session.begin_activity(DELAY_ELEMENT),
            Err(RegistryError::Reserved("Delay".to_string()))
        );
        clock.advance_ms(1_000);
        assert_eq!(
            session.begin_activity("Typo"),
            Err(RegistryError::Unknown("Typo".to_string()))
        );
        clock.advance_ms(1_000);
        session.reset();

        assert!(session.log().is_empty());
        assert_eq!(session.readout().current, None);
        assert!(session.take_events().iter().all(|e| *e == ActivityEvent::Reset));
    }

    #[test]
    fn refused_start_keeps_running_activity() {
        let (clock, mut session) = setup();
        session.begin_activity("A").unwrap();
        clock.advance_ms(400);
        assert!(session.begin_activity("Typo").is_err());
        clock.advance_ms(100);
        session.reset();

        let entries = session.log().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].element(), "A");
        assert_eq!(entries[0].observed(), Duration::milliseconds(500));
    }
}
