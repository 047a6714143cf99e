//! Filter criteria: the declarative rule set deciding which files in a
//! directory are eligible for deletion.
//!
//! Criteria are a plain value built by the caller (CLI flags, config file)
//! and compiled once per run into optimized matching structures. Compilation
//! validates cross-field rules before any filesystem access happens:
//!
//! - `retention_depth` needs `reference_date` (a depth counts backward from
//!   something) and `date_format`.
//! - `reference_date` needs `date_format` (the format locates the date inside
//!   filenames); on its own it denotes an exact single-date filter.

use crate::date_format::CompiledDateFormat;
use crate::duration::DurationSpec;
use crate::retention::RetentionWindow;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Errors raised while validating and compiling filter criteria.
///
/// All of these are caller-input problems and fail fast, before the target
/// directory is ever listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    /// A duration or depth expression does not match its grammar.
    InvalidFormat {
        /// The offending literal.
        value: String,
        /// Human-readable description of the accepted grammar.
        expected: String,
    },
    /// A reference date string cannot be resolved against its format, or
    /// resolves to a date that does not exist.
    InvalidDate { value: String, format: String },
    /// A parameter was given without another one it depends on.
    MissingParameter {
        missing: &'static str,
        required_by: &'static str,
    },
}

impl std::fmt::Display for CriteriaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CriteriaError::InvalidFormat { value, expected } => {
                write!(f, "Invalid expression \"{}\": expected {}", value, expected)
            }
            CriteriaError::InvalidDate { value, format } => {
                write!(
                    f,
                    "Cannot resolve date \"{}\" against format \"{}\"",
                    value, format
                )
            }
            CriteriaError::MissingParameter {
                missing,
                required_by,
            } => {
                write!(
                    f,
                    "Parameter '{}' is required when '{}' is set",
                    missing, required_by
                )
            }
        }
    }
}

impl std::error::Error for CriteriaError {}

/// Declarative filter criteria, all fields optional.
///
/// This struct is deserialized directly from the `[clean.filters]` section of
/// the configuration file and can be overridden field by field from CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Entry name must start with this text (case-sensitive).
    #[serde(default)]
    pub name_prefix: Option<String>,

    /// Allow-list of extensions, with or without the leading dot
    /// (e.g. `["log", ".tmp"]`). Matched case-insensitively.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Age expression (e.g. `"30d"`); files modified more recently than this
    /// are skipped at deletion time.
    #[serde(default)]
    pub max_age: Option<String>,

    /// Reference date, written in `date_format` (e.g. `"2024-03-10"`).
    #[serde(default)]
    pub reference_date: Option<String>,

    /// Token format locating dates inside filenames (e.g. `"%Y-%m-%d"`).
    #[serde(default)]
    pub date_format: Option<String>,

    /// Depth expression (e.g. `"5d"`); expands the reference date into a
    /// retention window of dates to delete.
    #[serde(default)]
    pub retention_depth: Option<String>,
}

impl FilterCriteria {
    /// True when no filter is active at all. Deleting with empty criteria
    /// would match every file in the target directory, so callers must
    /// reject this case before listing.
    ///
    /// `date_format` is not a filter on its own, only the key for reading
    /// `reference_date` and filenames; a format with nothing else set leaves
    /// the criteria empty.
    pub fn is_empty(&self) -> bool {
        self.name_prefix.is_none()
            && self.extensions.as_ref().is_none_or(|e| e.is_empty())
            && self.max_age.is_none()
            && self.reference_date.is_none()
            && self.retention_depth.is_none()
    }

    /// Validates cross-field rules and compiles the criteria into optimized
    /// matching structures.
    ///
    /// # Errors
    ///
    /// Returns `MissingParameter` when a dependent parameter is absent,
    /// `InvalidFormat` for a malformed age or depth expression and
    /// `InvalidDate` for an unresolvable reference date.
    pub fn compile(&self) -> Result<CompiledCriteria, CriteriaError> {
        if self.retention_depth.is_some() && self.reference_date.is_none() {
            return Err(CriteriaError::MissingParameter {
                missing: "reference_date",
                required_by: "retention_depth",
            });
        }

        if self.reference_date.is_some() && self.date_format.is_none() {
            return Err(CriteriaError::MissingParameter {
                missing: "date_format",
                required_by: "reference_date",
            });
        }

        let max_age = self
            .max_age
            .as_deref()
            .map(DurationSpec::parse)
            .transpose()?;

        let date_format = self
            .date_format
            .as_deref()
            .map(CompiledDateFormat::compile)
            .transpose()?;

        let window = match (&self.reference_date, &date_format) {
            (Some(reference), Some(format)) => {
                let reference = format.parse_exact(reference)?;
                match self.retention_depth.as_deref() {
                    Some(depth) => Some(RetentionWindow::build(reference, depth)?),
                    None => Some(RetentionWindow::single(reference)),
                }
            }
            _ => None,
        };

        let extensions = self
            .extensions
            .iter()
            .flatten()
            .map(|ext| normalize_extension(ext))
            .collect();

        Ok(CompiledCriteria {
            name_prefix: self.name_prefix.clone(),
            extensions,
            max_age,
            date_format,
            window,
        })
    }
}

/// Lowercases an extension and guarantees a leading dot.
fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Criteria compiled for matching: normalized extension set, parsed age,
/// compiled date format and resolved retention window.
///
/// The window is resolved once per run; the filter engine then tests each
/// directory entry against it by exact date equality.
#[derive(Debug, Clone)]
pub struct CompiledCriteria {
    name_prefix: Option<String>,
    extensions: HashSet<String>,
    max_age: Option<DurationSpec>,
    date_format: Option<CompiledDateFormat>,
    window: Option<RetentionWindow>,
}

impl CompiledCriteria {
    /// The required name prefix, if any.
    pub fn name_prefix(&self) -> Option<&str> {
        self.name_prefix.as_deref()
    }

    /// Normalized lowercase extensions, each with a leading dot. Empty when
    /// extension filtering is inactive.
    pub fn extensions(&self) -> &HashSet<String> {
        &self.extensions
    }

    /// The parsed age cutoff, if any. Evaluated at deletion time against the
    /// live modification timestamp, not by the filter engine.
    pub fn max_age(&self) -> Option<DurationSpec> {
        self.max_age
    }

    /// The compiled date format. Date filtering is active exactly when this
    /// is present.
    pub fn date_format(&self) -> Option<&CompiledDateFormat> {
        self.date_format.as_ref()
    }

    /// The resolved retention window: the full depth window, the single
    /// reference date when no depth was requested, or `None` when no
    /// reference date was given.
    pub fn window(&self) -> Option<&RetentionWindow> {
        self.window.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_empty_criteria_detected() {
        assert!(FilterCriteria::default().is_empty());

        let with_empty_extensions = FilterCriteria {
            extensions: Some(vec![]),
            ..Default::default()
        };
        assert!(with_empty_extensions.is_empty());

        let with_prefix = FilterCriteria {
            name_prefix: Some("tmp_".to_string()),
            ..Default::default()
        };
        assert!(!with_prefix.is_empty());

        // A bare format can never match anything; it does not count as a
        // filter, so callers reject it as "no filter defined".
        let format_only = FilterCriteria {
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        };
        assert!(format_only.is_empty());
    }

    #[test]
    fn test_depth_without_reference_date_fails() {
        let criteria = FilterCriteria {
            retention_depth: Some("5d".to_string()),
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        };

        let err = criteria.compile().unwrap_err();
        assert_eq!(
            err,
            CriteriaError::MissingParameter {
                missing: "reference_date",
                required_by: "retention_depth",
            }
        );
    }

    #[test]
    fn test_reference_date_without_format_fails() {
        let criteria = FilterCriteria {
            reference_date: Some("2024-03-10".to_string()),
            ..Default::default()
        };

        let err = criteria.compile().unwrap_err();
        assert_eq!(
            err,
            CriteriaError::MissingParameter {
                missing: "date_format",
                required_by: "reference_date",
            }
        );
    }

    #[test]
    fn test_extension_normalization() {
        let criteria = FilterCriteria {
            extensions: Some(vec!["LOG".to_string(), ".Tmp".to_string()]),
            ..Default::default()
        };

        let compiled = criteria.compile().unwrap();
        assert!(compiled.extensions().contains(".log"));
        assert!(compiled.extensions().contains(".tmp"));
        assert_eq!(compiled.extensions().len(), 2);
    }

    #[test]
    fn test_exact_date_resolves_to_single_window() {
        let criteria = FilterCriteria {
            reference_date: Some("2024-03-10".to_string()),
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        };

        let compiled = criteria.compile().unwrap();
        let window = compiled.window().unwrap();
        assert_eq!(window.dates(), &[date(2024, 3, 10)]);
    }

    #[test]
    fn test_depth_resolves_to_full_window() {
        let criteria = FilterCriteria {
            reference_date: Some("10/03/2024".to_string()),
            date_format: Some("%d/%m/%Y".to_string()),
            retention_depth: Some("3d".to_string()),
            ..Default::default()
        };

        let compiled = criteria.compile().unwrap();
        let window = compiled.window().unwrap();
        assert_eq!(
            window.dates(),
            &[date(2024, 3, 10), date(2024, 3, 9), date(2024, 3, 8)]
        );
    }

    #[test]
    fn test_invalid_reference_date_fails() {
        let criteria = FilterCriteria {
            reference_date: Some("2024-13-40".to_string()),
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            criteria.compile(),
            Err(CriteriaError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_invalid_max_age_fails() {
        let criteria = FilterCriteria {
            max_age: Some("10w".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            criteria.compile(),
            Err(CriteriaError::InvalidFormat { .. })
        ));
    }
}
