//! The filter engine: evaluates one directory entry name against compiled
//! criteria and yields an accept/reject decision with a diagnostic reason.
//!
//! All active rules must pass (logical AND). Age is deliberately not checked
//! here: it depends on the live modification timestamp, which the deletion
//! executor reads just before deleting, not on a static property of the name.

use crate::criteria::CompiledCriteria;
use std::path::Path;

/// The engine's verdict for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The entry matches every active criterion.
    Accept,
    /// The entry failed a criterion.
    Reject(RejectReason),
}

/// Why an entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The name does not start with the required prefix.
    PrefixMismatch,
    /// The extension is not in the allow-list.
    ExtensionMismatch,
    /// Date filtering is active but no date could be recognized in the name.
    NoEmbeddedDate,
    /// The embedded date is not a member of the retention window.
    DateNotRetained,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::PrefixMismatch => write!(f, "name does not match prefix"),
            RejectReason::ExtensionMismatch => write!(f, "extension not in allow-list"),
            RejectReason::NoEmbeddedDate => write!(f, "no date found in name"),
            RejectReason::DateNotRetained => write!(f, "date outside retention window"),
        }
    }
}

/// Stateless evaluator applying compiled criteria to entry names.
pub struct FilterEngine;

impl FilterEngine {
    /// Evaluates a single entry name.
    ///
    /// Rules, in order:
    /// 1. Prefix: byte-wise, case-sensitive `starts_with`.
    /// 2. Extensions: the entry's extension, lowercased and dot-prefixed,
    ///    must be in the allow-list. An entry without an extension never
    ///    matches a non-empty allow-list.
    /// 3. Date: inactive when no date format is set. Otherwise the name must
    ///    carry a recognizable date and that date must be a member of the
    ///    resolved retention window.
    pub fn evaluate(name: &str, criteria: &CompiledCriteria) -> Decision {
        if let Some(prefix) = criteria.name_prefix()
            && !name.starts_with(prefix)
        {
            return Decision::Reject(RejectReason::PrefixMismatch);
        }

        if !criteria.extensions().is_empty() {
            let matches = entry_extension(name)
                .map(|ext| criteria.extensions().contains(&ext))
                .unwrap_or(false);

            if !matches {
                return Decision::Reject(RejectReason::ExtensionMismatch);
            }
        }

        if let Some(format) = criteria.date_format() {
            match format.extract_from_filename(name) {
                None => return Decision::Reject(RejectReason::NoEmbeddedDate),
                Some(date) => {
                    let retained = criteria
                        .window()
                        .map(|window| window.contains(date))
                        .unwrap_or(false);

                    if !retained {
                        return Decision::Reject(RejectReason::DateNotRetained);
                    }
                }
            }
        }

        Decision::Accept
    }
}

/// The entry's extension, lowercased and with a leading dot.
fn entry_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::FilterCriteria;

    fn compile(criteria: FilterCriteria) -> crate::criteria::CompiledCriteria {
        criteria.compile().expect("criteria should compile")
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let criteria = compile(FilterCriteria {
            name_prefix: Some("report_".to_string()),
            ..Default::default()
        });

        assert_eq!(
            FilterEngine::evaluate("report_march.csv", &criteria),
            Decision::Accept
        );
        assert_eq!(
            FilterEngine::evaluate("Report_march.csv", &criteria),
            Decision::Reject(RejectReason::PrefixMismatch)
        );
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let criteria = compile(FilterCriteria {
            extensions: Some(vec![".txt".to_string()]),
            ..Default::default()
        });

        assert_eq!(FilterEngine::evaluate("a.TXT", &criteria), Decision::Accept);
        assert_eq!(FilterEngine::evaluate("a.txt", &criteria), Decision::Accept);
        assert_eq!(
            FilterEngine::evaluate("a.txtx", &criteria),
            Decision::Reject(RejectReason::ExtensionMismatch)
        );
    }

    #[test]
    fn test_entry_without_extension_rejected_by_allow_list() {
        let criteria = compile(FilterCriteria {
            extensions: Some(vec!["log".to_string()]),
            ..Default::default()
        });

        assert_eq!(
            FilterEngine::evaluate("README", &criteria),
            Decision::Reject(RejectReason::ExtensionMismatch)
        );
    }

    #[test]
    fn test_date_filter_inactive_without_format() {
        let criteria = compile(FilterCriteria {
            name_prefix: Some("a".to_string()),
            ..Default::default()
        });

        // No date format: names with or without dates pass the date rule.
        assert_eq!(
            FilterEngine::evaluate("a-2024-03-10.log", &criteria),
            Decision::Accept
        );
        assert_eq!(FilterEngine::evaluate("a.log", &criteria), Decision::Accept);
    }

    #[test]
    fn test_date_filter_rejects_dateless_names() {
        let criteria = compile(FilterCriteria {
            reference_date: Some("2024-03-10".to_string()),
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        });

        assert_eq!(
            FilterEngine::evaluate("notes.txt", &criteria),
            Decision::Reject(RejectReason::NoEmbeddedDate)
        );
    }

    #[test]
    fn test_exact_date_mode() {
        let criteria = compile(FilterCriteria {
            reference_date: Some("2024-03-10".to_string()),
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        });

        assert_eq!(
            FilterEngine::evaluate("dump-2024-03-10.sql", &criteria),
            Decision::Accept
        );
        assert_eq!(
            FilterEngine::evaluate("dump-2024-03-09.sql", &criteria),
            Decision::Reject(RejectReason::DateNotRetained)
        );
    }

    #[test]
    fn test_window_mode() {
        let criteria = compile(FilterCriteria {
            reference_date: Some("2024-03-10".to_string()),
            date_format: Some("%Y-%m-%d".to_string()),
            retention_depth: Some("3d".to_string()),
            ..Default::default()
        });

        assert_eq!(
            FilterEngine::evaluate("dump-2024-03-08.sql", &criteria),
            Decision::Accept
        );
        assert_eq!(
            FilterEngine::evaluate("dump-2024-03-07.sql", &criteria),
            Decision::Reject(RejectReason::DateNotRetained)
        );
    }

    #[test]
    fn test_rules_combine_with_and() {
        let criteria = compile(FilterCriteria {
            name_prefix: Some("dump-".to_string()),
            extensions: Some(vec!["sql".to_string()]),
            reference_date: Some("2024-03-10".to_string()),
            date_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        });

        assert_eq!(
            FilterEngine::evaluate("dump-2024-03-10.sql", &criteria),
            Decision::Accept
        );
        // Right date and extension, wrong prefix.
        assert_eq!(
            FilterEngine::evaluate("backup-2024-03-10.sql", &criteria),
            Decision::Reject(RejectReason::PrefixMismatch)
        );
        // Right prefix and date, wrong extension.
        assert_eq!(
            FilterEngine::evaluate("dump-2024-03-10.bak", &criteria),
            Decision::Reject(RejectReason::ExtensionMismatch)
        );
    }
}
