//! Lock-tolerant recursive tree purge, used to reclaim temporary storage.
//!
//! The purger visits a tree depth-first, deleting files and then removing
//! each directory once its contents are gone. Entries held open by another
//! process ("resource busy", "permission denied") are skipped and traversal
//! continues; every other per-entry failure is likewise recorded and skipped.
//! Best-effort completion wins over strict error surfacing here: the only way
//! the call fails is when the root itself cannot be listed.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An entry the purger could not remove.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub cause: String,
    /// True for the expected lock class (resource busy / permission denied),
    /// false for any other failure kind.
    pub in_use: bool,
}

/// What a purge run accomplished.
#[derive(Debug, Default, Serialize)]
pub struct PurgeReport {
    pub deleted_files: usize,
    pub removed_dirs: usize,
    pub skipped: Vec<SkippedPath>,
}

impl PurgeReport {
    fn skip(&mut self, path: PathBuf, error: &io::Error) {
        self.skipped.push(SkippedPath {
            path,
            cause: error.to_string(),
            in_use: is_lock_error(error),
        });
    }
}

/// Fatal purge errors.
#[derive(Debug)]
pub enum PurgeError {
    /// The root directory could not be enumerated. Nothing was deleted.
    ListingFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for PurgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurgeError::ListingFailure { path, source } => {
                write!(
                    f,
                    "Failed to list purge root {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for PurgeError {}

/// True for the error kinds raised by files held open elsewhere.
fn is_lock_error(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    )
}

/// Recursively empties a directory tree, tolerating in-use entries.
pub struct TreePurger;

impl TreePurger {
    /// Purges the contents of `root`. The root directory itself is kept.
    ///
    /// Subdirectories are purged before their own removal is attempted, so a
    /// directory is never removed while it still has unvisited contents.
    /// Symbolic links are removed as links, never followed.
    ///
    /// # Errors
    ///
    /// Returns `PurgeError::ListingFailure` when `root` cannot be listed.
    /// Per-entry failures never fail the call; they end up in the report.
    pub fn purge(root: &Path) -> Result<PurgeReport, PurgeError> {
        let entries = fs::read_dir(root).map_err(|e| PurgeError::ListingFailure {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut report = PurgeReport::default();
        Self::visit(entries, &mut report);
        Ok(report)
    }

    /// Purges a subdirectory. Unlike the root, a subdirectory that cannot be
    /// listed is a skipped entry, not a failure.
    fn purge_dir(dir: &Path, report: &mut PurgeReport) {
        match fs::read_dir(dir) {
            Ok(entries) => Self::visit(entries, report),
            Err(e) => report.skip(dir.to_path_buf(), &e),
        }
    }

    fn visit(entries: fs::ReadDir, report: &mut PurgeReport) {
        for entry in entries.flatten() {
            let path = entry.path();

            // file_type does not follow symlinks; a link to a directory is
            // deleted as a file.
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if is_dir {
                Self::purge_dir(&path, report);

                match fs::remove_dir(&path) {
                    Ok(()) => report.removed_dirs += 1,
                    Err(e) => report.skip(path, &e),
                }
            } else {
                match fs::remove_file(&path) {
                    Ok(()) => report.deleted_files += 1,
                    Err(e) => report.skip(path, &e),
                }
            }
        }
    }
}
