//! Compact age expressions such as `"30d"` or `"2h"`.
//!
//! An age expression is an integer followed by a single unit letter:
//! `s` (seconds), `m` (minutes), `h` (hours), `d` (days) or `y` (years).
//! Years are a fixed 365 days; the unit is intentionally approximate.

use crate::criteria::CriteriaError;
use chrono::{DateTime, Local, TimeDelta};
use regex::Regex;

/// Grammar description embedded in `InvalidFormat` errors.
pub const AGE_GRAMMAR: &str =
    "number + unit (s=seconds, m=minutes, h=hours, d=days, y=years), e.g. \"30d\", \"2h\", \"45m\"";

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
const MILLIS_PER_YEAR: i64 = 365 * MILLIS_PER_DAY;

/// A parsed age expression, normalized to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSpec {
    millis: i64,
}

impl DurationSpec {
    /// Parses an expression matching `^(\d+)([smhdy])$`.
    ///
    /// # Errors
    ///
    /// Returns `CriteriaError::InvalidFormat` naming the offending string and
    /// the accepted grammar when the expression does not match.
    pub fn parse(input: &str) -> Result<Self, CriteriaError> {
        let pattern = Regex::new(r"^(\d+)([smhdy])$").expect("hardcoded pattern is valid");

        let captures = pattern
            .captures(input)
            .ok_or_else(|| Self::invalid(input))?;

        let value: i64 = captures[1].parse().map_err(|_| Self::invalid(input))?;

        let multiplier = match &captures[2] {
            "s" => MILLIS_PER_SECOND,
            "m" => MILLIS_PER_MINUTE,
            "h" => MILLIS_PER_HOUR,
            "d" => MILLIS_PER_DAY,
            "y" => MILLIS_PER_YEAR,
            _ => unreachable!("pattern only admits smhdy"),
        };

        // A huge count can overflow i64 even though the grammar accepts it;
        // wrapped arithmetic would turn the cutoff into a future instant.
        let millis = value
            .checked_mul(multiplier)
            .ok_or_else(|| Self::invalid(input))?;

        Ok(Self { millis })
    }

    /// The normalized duration in milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    /// The point in time this far before `now`. Files modified after the
    /// cutoff are considered too recent to delete.
    pub fn cutoff_before(&self, now: DateTime<Local>) -> DateTime<Local> {
        now - TimeDelta::milliseconds(self.millis)
    }

    fn invalid(input: &str) -> CriteriaError {
        CriteriaError::InvalidFormat {
            value: input.to_string(),
            expected: AGE_GRAMMAR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_units() {
        assert_eq!(DurationSpec::parse("1s").unwrap().as_millis(), 1000);
        assert_eq!(DurationSpec::parse("45m").unwrap().as_millis(), 45 * 60 * 1000);
        assert_eq!(DurationSpec::parse("2h").unwrap().as_millis(), 2 * 3_600_000);
        assert_eq!(DurationSpec::parse("30d").unwrap().as_millis(), 30 * 86_400_000);
        assert_eq!(
            DurationSpec::parse("1y").unwrap().as_millis(),
            365 * 86_400_000
        );
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for input in ["", "d", "10", "10w", "-5d", "5dd", "5 d", "d5"] {
            let result = DurationSpec::parse(input);
            assert!(
                matches!(result, Err(CriteriaError::InvalidFormat { .. })),
                "expected InvalidFormat for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_overflowing_value_is_invalid_format() {
        // Grammar-valid but too large to hold in milliseconds.
        for input in ["9999999999999y", "99999999999999999999s"] {
            let result = DurationSpec::parse(input);
            assert!(
                matches!(result, Err(CriteriaError::InvalidFormat { .. })),
                "expected InvalidFormat for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_invalid_format_names_offender() {
        let err = DurationSpec::parse("10w").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("10w"));
        assert!(message.contains("d=days"));
    }

    #[test]
    fn test_cutoff_before() {
        let now = Local::now();
        let spec = DurationSpec::parse("1d").unwrap();
        assert_eq!(now - spec.cutoff_before(now), TimeDelta::days(1));
    }
}
