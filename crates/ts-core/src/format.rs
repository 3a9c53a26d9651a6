//! Display formatting for durations and instants.

use chrono::{DateTime, Duration, Local};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Formats a duration as `HH:MM:SS.mmm`.
///
/// Hours grow past two digits rather than wrapping. Negative durations are
/// rendered as zero.
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.num_milliseconds().max(0);

    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Formats an instant as a local time of day with second precision.
pub fn format_time_of_day(instant: &DateTime<Local>) -> String {
    instant.format("%H:%M:%S").to_string()
}
