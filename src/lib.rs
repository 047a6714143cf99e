//! sweepdir - filter-driven file cleanup and temp-tree purging
//!
//! This library decides, given a directory listing and a declarative set of
//! criteria, which entries are eligible for removal, deletes them with
//! per-entry failure isolation, and offers a lock-tolerant recursive purge
//! for temporary-directory reclamation. Criteria combine a name prefix, an
//! extension allow-list, an age cutoff and filename-embedded date matching
//! against a retention window.

pub mod cli;
pub mod config;
pub mod criteria;
pub mod date_format;
pub mod duration;
pub mod executor;
pub mod filter;
pub mod output;
pub mod purge;
pub mod retention;

pub use config::{CleanupConfig, ConfigError};
pub use criteria::{CompiledCriteria, CriteriaError, FilterCriteria};
pub use date_format::{CompiledDateFormat, DateToken};
pub use duration::DurationSpec;
pub use executor::{
    CleanError, CleanMode, DeletedFile, DeletionExecutor, DeletionOutcome, EntryError,
    SkipReason, SkippedEntry,
};
pub use filter::{Decision, FilterEngine, RejectReason};
pub use purge::{PurgeError, PurgeReport, TreePurger};
pub use retention::RetentionWindow;
