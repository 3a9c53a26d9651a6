//! Operator performance ratings.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// A performance rating attached to a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Percentage of normal pace (100 = normal).
    Percent(i64),
    /// Delays are not rated.
    NotApplicable,
}

impl Rating {
    /// Rating assumed when the operator supplies nothing usable.
    pub const DEFAULT_PERCENT: i64 = 100;

    /// Parses operator input, falling back to 100%.
    ///
    /// Leading whitespace and an optional sign are accepted, followed by
    /// digits; anything after the digits is ignored, so `"85%"` reads as 85.
    /// Missing input, input with no leading digits, overflow and zero all
    /// resolve to the default.
    pub fn parse_lenient(input: Option<&str>) -> Self {
        let percent = input
            .and_then(leading_integer)
            .filter(|n| *n != 0)
            .unwrap_or(Self::DEFAULT_PERCENT);
        Self::Percent(percent)
    }

    /// The percentage used for scaling. Unrated entries scale by 100.
    pub const fn percent(self) -> i64 {
        match self {
            Self::Percent(n) => n,
            Self::NotApplicable => Self::DEFAULT_PERCENT,
        }
    }

    /// Applies the rating to an observed duration.
    ///
    /// The result is rounded to the nearest millisecond and never negative.
    pub fn scale(self, observed: Duration) -> Duration {
        if self == Self::NotApplicable {
            return observed;
        }
        let product = i128::from(observed.num_milliseconds()) * i128::from(self.percent());
        let scaled = (product + 50).div_euclid(100).max(0);
        Duration::milliseconds(i64::try_from(scaled).unwrap_or(i64::MAX))
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::Percent(Self::DEFAULT_PERCENT)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(n) => write!(f, "{n}%"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Reads `[+-]?\d+` from the start of `s` after trimming.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_number() {
        assert_eq!(Rating::parse_lenient(Some("85")), Rating::Percent(85));
        assert_eq!(Rating::parse_lenient(Some("  120 ")), Rating::Percent(120));
    }

    #[test]
    fn parse_ignores_trailing_text() {
        assert_eq!(Rating::parse_lenient(Some("90%")), Rating::Percent(90));
        assert_eq!(Rating::parse_lenient(Some("75.9")), Rating::Percent(75));
    }

    #[test]
    fn parse_falls_back_to_default() {
        for input in [None, Some(""), Some("fast"), Some("%80"), Some("0"), Some("-")] {
            assert_eq!(Rating::parse_lenient(input), Rating::Percent(100), "{input:?}");
        }
    }

    #[test]
    fn parse_overflow_falls_back_to_default() {
        assert_eq!(
            Rating::parse_lenient(Some("99999999999999999999999")),
            Rating::Percent(100)
        );
    }

    #[test]
    fn parse_accepts_sign() {
        assert_eq!(Rating::parse_lenient(Some("-20")), Rating::Percent(-20));
        assert_eq!(Rating::parse_lenient(Some("+110")), Rating::Percent(110));
    }

    #[test]
    fn display_labels() {
        assert_eq!(Rating::Percent(85).to_string(), "85%");
        assert_eq!(Rating::NotApplicable.to_string(), "N/A");
    }

    #[test]
    fn scale_applies_percentage() {
        let observed = Duration::milliseconds(10_000);
        assert_eq!(Rating::Percent(85).scale(observed), Duration::milliseconds(8_500));
        assert_eq!(Rating::Percent(120).scale(observed), Duration::milliseconds(12_000));
    }

    #[test]
    fn scale_rounds_to_nearest_millisecond() {
        // 1001 * 85 / 100 = 850.85
        assert_eq!(
            Rating::Percent(85).scale(Duration::milliseconds(1_001)),
            Duration::milliseconds(851)
        );
    }

    #[test]
    fn scale_negative_rating_clamps_to_zero() {
        assert_eq!(
            Rating::Percent(-20).scale(Duration::milliseconds(1_000)),
            Duration::zero()
        );
    }

    #[test]
    fn not_applicable_scale_is_identity() {
        let observed = Duration::milliseconds(1_234);
        assert_eq!(Rating::NotApplicable.scale(observed), observed);
    }
}
