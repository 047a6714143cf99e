//! Retention windows: the explicit set of calendar dates eligible for
//! deletion under a depth-based policy.
//!
//! A window is not a continuous range. It is a finite list of dates, compared
//! by exact equality, produced by stepping backward one unit at a time from a
//! reference date.

use crate::criteria::CriteriaError;
use chrono::{Days, Months, NaiveDate};
use regex::Regex;

/// Grammar description embedded in `InvalidFormat` errors.
pub const DEPTH_GRAMMAR: &str =
    "number + unit (d=days, m=months, y=years), e.g. \"5d\", \"1m\"";

/// Largest accepted depth. A window is an explicit list of dates held in
/// memory; a depth beyond this is a typo, not a retention policy.
pub const MAX_DEPTH: usize = 10_000;

/// An ordered set of dates, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionWindow {
    dates: Vec<NaiveDate>,
}

impl RetentionWindow {
    /// A window holding exactly the reference date. Used when a reference
    /// date is given without a depth: the filter matches that date only.
    pub fn single(reference: NaiveDate) -> Self {
        Self {
            dates: vec![reference],
        }
    }

    /// Builds a window of `value` dates from a depth expression matching
    /// `^(\d+)([dmy])$`, starting at the reference date and stepping one
    /// unit backward per entry. Month steps keep the day of month, clamping
    /// to the last day when the earlier month is shorter; year steps behave
    /// the same way for Feb 29.
    ///
    /// # Errors
    ///
    /// Returns `CriteriaError::InvalidFormat` when the expression does not
    /// match the grammar or the depth exceeds [`MAX_DEPTH`].
    pub fn build(reference: NaiveDate, depth: &str) -> Result<Self, CriteriaError> {
        let pattern = Regex::new(r"^(\d+)([dmy])$").expect("hardcoded pattern is valid");

        let captures = pattern
            .captures(depth)
            .ok_or_else(|| Self::invalid(depth))?;

        let value: usize = captures[1].parse().map_err(|_| Self::invalid(depth))?;
        let unit = &captures[2];

        if value > MAX_DEPTH {
            return Err(CriteriaError::InvalidFormat {
                value: depth.to_string(),
                expected: format!("a depth of at most {} dates", MAX_DEPTH),
            });
        }

        let mut dates = Vec::with_capacity(value);
        let mut current = reference;

        for _ in 0..value {
            dates.push(current);

            let earlier = match unit {
                "d" => current.checked_sub_days(Days::new(1)),
                "m" => current.checked_sub_months(Months::new(1)),
                "y" => current.checked_sub_months(Months::new(12)),
                _ => unreachable!("pattern only admits dmy"),
            };

            match earlier {
                Some(date) => current = date,
                // Calendar underflow; the window simply ends here.
                None => break,
            }
        }

        Ok(Self { dates })
    }

    /// Exact-membership test.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// The dates in descending order, reference date first.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of dates in the window.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the window holds no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn invalid(depth: &str) -> CriteriaError {
        CriteriaError::InvalidFormat {
            value: depth.to_string(),
            expected: DEPTH_GRAMMAR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_day_depth() {
        let window = RetentionWindow::build(date(2024, 3, 10), "3d").unwrap();
        assert_eq!(
            window.dates(),
            &[date(2024, 3, 10), date(2024, 3, 9), date(2024, 3, 8)]
        );
    }

    #[test]
    fn test_month_depth() {
        let window = RetentionWindow::build(date(2024, 3, 10), "2m").unwrap();
        assert_eq!(window.dates(), &[date(2024, 3, 10), date(2024, 2, 10)]);
    }

    #[test]
    fn test_month_depth_clamps_to_shorter_month() {
        let window = RetentionWindow::build(date(2024, 3, 31), "2m").unwrap();
        assert_eq!(window.dates(), &[date(2024, 3, 31), date(2024, 2, 29)]);
    }

    #[test]
    fn test_year_depth_clamps_leap_day() {
        let window = RetentionWindow::build(date(2024, 2, 29), "2y").unwrap();
        assert_eq!(window.dates(), &[date(2024, 2, 29), date(2023, 2, 28)]);
    }

    #[test]
    fn test_day_depth_crosses_month_boundary() {
        let window = RetentionWindow::build(date(2024, 3, 1), "2d").unwrap();
        assert_eq!(window.dates(), &[date(2024, 3, 1), date(2024, 2, 29)]);
    }

    #[test]
    fn test_single() {
        let window = RetentionWindow::single(date(2024, 3, 10));
        assert_eq!(window.len(), 1);
        assert!(window.contains(date(2024, 3, 10)));
        assert!(!window.contains(date(2024, 3, 9)));
    }

    #[test]
    fn test_contains_is_exact() {
        let window = RetentionWindow::build(date(2024, 3, 10), "3d").unwrap();
        assert!(window.contains(date(2024, 3, 9)));
        assert!(!window.contains(date(2024, 3, 7)));
        assert!(!window.contains(date(2024, 3, 11)));
    }

    #[test]
    fn test_absurd_depth_is_rejected_not_allocated() {
        // Grammar-valid values past the cap must fail cleanly, including
        // ones large enough that reserving the claimed capacity would abort.
        for input in ["10001d", "18446744073709551615d", "99999999999999999999d"] {
            let result = RetentionWindow::build(date(2024, 1, 1), input);
            assert!(
                matches!(result, Err(CriteriaError::InvalidFormat { .. })),
                "expected InvalidFormat for {:?}",
                input
            );
        }

        // The cap itself is still accepted.
        let window = RetentionWindow::build(date(2024, 1, 1), "10000d").unwrap();
        assert_eq!(window.len(), 10_000);
    }

    #[test]
    fn test_invalid_depth_expressions() {
        for input in ["", "5", "m", "5h", "5s", "5 d", "-2d"] {
            let result = RetentionWindow::build(date(2024, 1, 1), input);
            assert!(
                matches!(result, Err(CriteriaError::InvalidFormat { .. })),
                "expected InvalidFormat for {:?}",
                input
            );
        }
    }
}
