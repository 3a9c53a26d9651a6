//! Core domain logic for time studies.
//!
//! This crate contains:
//! - Timer: a pausable stopwatch over a pluggable [`Clock`]
//! - Activity logging: two timers kept in lockstep, producing log entries
//! - Study log: ordered entries, completion progress and CSV export
//! - Study session: the controller that owns all of the above

pub mod clock;
pub mod format;
mod log;
mod logger;
pub mod rating;
mod registry;
mod session;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{format_duration, format_time_of_day};
pub use log::{CSV_HEADERS, ExportError, LogEntry, LogRow, Progress, StudyLog, export_filename};
pub use logger::{
    ActivityEvent, ActivityLogger, ActivityState, DELAY_ELEMENT, EntryInput, NO_ELEMENT,
};
pub use rating::Rating;
pub use registry::{ElementRegistry, ElementStatus, RegistryError};
pub use session::{OperatorInput, Readout, StudySession};
pub use timer::Timer;
