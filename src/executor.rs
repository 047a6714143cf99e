//! The deletion executor: applies filter decisions to real directory entries
//! and reports what happened.
//!
//! Only the immediate children of the target directory are considered, never
//! a subtree. Each entry succeeds or fails on its own; one failed deletion
//! never aborts the rest of the batch. The single fatal error is a failure to
//! list the target directory itself.

use crate::criteria::CompiledCriteria;
use crate::filter::{Decision, FilterEngine};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Whether the executor actually deletes or only classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanMode {
    /// Delete matching files.
    Delete,
    /// Classify matching files without touching them.
    DryRun,
}

/// A successfully deleted file (or, in a dry run, a file that would be).
#[derive(Debug, Clone, Serialize)]
pub struct DeletedFile {
    pub name: String,
    /// Last-modified timestamp read just before deletion.
    pub modified: DateTime<Local>,
}

/// A file that matched the criteria but was skipped rather than deleted.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

/// Why a matching entry was not deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Directories are never eligible; only files are deleted.
    Directory,
    /// The file was modified more recently than the age cutoff allows.
    TooRecent,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Directory => write!(f, "is a directory"),
            SkipReason::TooRecent => write!(f, "modified too recently"),
        }
    }
}

/// A per-entry failure, recorded without aborting the batch.
#[derive(Debug, Clone, Serialize)]
pub struct EntryError {
    pub name: String,
    pub error: String,
}

/// The full result of one cleanup run.
#[derive(Debug, Default, Serialize)]
pub struct DeletionOutcome {
    /// Files deleted (or that would be deleted, in a dry run).
    pub deleted: Vec<DeletedFile>,
    /// Matching entries skipped as directories or as too recent.
    pub skipped: Vec<SkippedEntry>,
    /// Entries that could not be inspected or deleted.
    pub errors: Vec<EntryError>,
}

impl DeletionOutcome {
    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Fatal errors of a cleanup run.
#[derive(Debug)]
pub enum CleanError {
    /// The target directory could not be enumerated. Nothing was deleted.
    ListingFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for CleanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanError::ListingFailure { path, source } => {
                write!(f, "Failed to list directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CleanError {}

/// Applies compiled criteria to a directory and deletes the matching files.
pub struct DeletionExecutor;

impl DeletionExecutor {
    /// Cleans the immediate children of `target`.
    ///
    /// For every entry accepted by the filter engine the executor reads the
    /// current metadata, skips directories and files newer than the age
    /// cutoff, and deletes the rest (unless running in `CleanMode::DryRun`).
    /// Metadata and deletion failures are accumulated per entry.
    ///
    /// # Errors
    ///
    /// Returns `CleanError::ListingFailure` when `target` cannot be listed;
    /// this is the only fatal filesystem error.
    pub fn clean(
        target: &Path,
        criteria: &CompiledCriteria,
        mode: CleanMode,
    ) -> Result<DeletionOutcome, CleanError> {
        let entries = fs::read_dir(target).map_err(|e| CleanError::ListingFailure {
            path: target.to_path_buf(),
            source: e,
        })?;

        let cutoff = criteria.max_age().map(|age| age.cutoff_before(Local::now()));
        let mut outcome = DeletionOutcome::default();

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();

            if let Decision::Reject(_) = FilterEngine::evaluate(&name, criteria) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    outcome.errors.push(EntryError {
                        name,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if metadata.is_dir() {
                outcome.skipped.push(SkippedEntry {
                    name,
                    reason: SkipReason::Directory,
                });
                continue;
            }

            let modified = match metadata.modified() {
                Ok(time) => DateTime::<Local>::from(time),
                Err(e) => {
                    outcome.errors.push(EntryError {
                        name,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(cutoff) = cutoff
                && modified > cutoff
            {
                outcome.skipped.push(SkippedEntry {
                    name,
                    reason: SkipReason::TooRecent,
                });
                continue;
            }

            if mode == CleanMode::Delete
                && let Err(e) = fs::remove_file(entry.path())
            {
                outcome.errors.push(EntryError {
                    name,
                    error: e.to_string(),
                });
                continue;
            }

            outcome.deleted.push(DeletedFile { name, modified });
        }

        Ok(outcome)
    }
}
