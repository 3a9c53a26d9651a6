//! The study log: completed activities in the order they were logged.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveDate};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::format::{format_duration, format_time_of_day};
use crate::logger::DELAY_ELEMENT;
use crate::rating::Rating;
use crate::registry::ElementRegistry;

/// Column headers for CSV export, in order.
pub const CSV_HEADERS: [&str; 8] = [
    "Element",
    "Category",
    "Start Time",
    "Stop Time",
    "Observed Time",
    "Rating",
    "Normal Time",
    "Notes",
];

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// There are no entries to export.
    #[error("no data to export")]
    Empty,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One timed activity.
///
/// Entries are only built by the activity logger and cannot be changed once
/// appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub(crate) element: String,
    pub(crate) category: String,
    pub(crate) started_at: DateTime<Local>,
    pub(crate) stopped_at: DateTime<Local>,
    pub(crate) observed: Duration,
    pub(crate) rating: Rating,
    pub(crate) normal: Duration,
    pub(crate) notes: String,
}

impl LogEntry {
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub const fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub const fn stopped_at(&self) -> DateTime<Local> {
        self.stopped_at
    }

    pub const fn observed(&self) -> Duration {
        self.observed
    }

    pub const fn rating(&self) -> Rating {
        self.rating
    }

    pub const fn normal(&self) -> Duration {
        self.normal
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// True for entries recorded with [`begin_delay`](crate::ActivityLogger::begin_delay).
    pub fn is_delay(&self) -> bool {
        self.rating == Rating::NotApplicable
    }

    /// The entry rendered as display strings.
    pub fn row(&self) -> LogRow {
        LogRow {
            element: self.element.clone(),
            category: self.category.clone(),
            start_time: format_time_of_day(&self.started_at),
            stop_time: format_time_of_day(&self.stopped_at),
            observed_time: format_duration(self.observed),
            rating: self.rating.to_string(),
            normal_time: format_duration(self.normal),
            notes: self.notes.clone(),
        }
    }
}

/// A log entry rendered as the eight table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow {
    pub element: String,
    pub category: String,
    pub start_time: String,
    pub stop_time: String,
    pub observed_time: String,
    pub rating: String,
    pub normal_time: String,
    pub notes: String,
}

/// How many registered elements have been timed at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `completed / total` as a whole percentage, rounded half up.
    pub percent: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.completed, self.total, self.percent)
    }
}

/// Append-only list of log entries.
#[derive(Debug, Clone, Default)]
pub struct StudyLog {
    entries: Vec<LogEntry>,
}

impl StudyLog {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an entry at the end. Repeats are kept; every occurrence counts.
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct registered, non-delay elements that appear in the log.
    pub fn completion_ratio(&self, registry: &ElementRegistry) -> Progress {
        let total = registry.len();
        let completed = self
            .entries
            .iter()
            .map(LogEntry::element)
            .filter(|name| *name != DELAY_ELEMENT && registry.contains(name))
            .collect::<HashSet<_>>()
            .len();
        let percent = if total == 0 {
            0
        } else {
            (completed * 200 + total) / (total * 2)
        };
        Progress {
            completed,
            total,
            percent,
        }
    }

    /// Renders the log as CSV.
    ///
    /// Only the notes column is quoted (with inner quotes doubled); the
    /// other columns are written as-is.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        if self.entries.is_empty() {
            return Err(ExportError::Empty);
        }

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADERS)?;
        for entry in &self.entries {
            let row = entry.row();
            let notes = format!("\"{}\"", row.notes.replace('"', "\"\""));
            writer.write_record([
                row.element.as_str(),
                row.category.as_str(),
                row.start_time.as_str(),
                row.stop_time.as_str(),
                row.observed_time.as_str(),
                row.rating.as_str(),
                row.normal_time.as_str(),
                notes.as_str(),
            ])?;
        }

        let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// File name for an export made on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("time_study_export_{}.csv", date.format("%Y-%m-%d"))
}
