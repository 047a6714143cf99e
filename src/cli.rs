//! Command-line interface module for sweepdir.
//!
//! This module handles all CLI-related functionality including:
//! - Command and flag parsing
//! - Merging configuration-file defaults with CLI overrides
//! - Target-path validation before any filesystem mutation
//! - Orchestrating the deletion executor and the tree purger
//! - Styled or JSON reporting of outcomes

use crate::config::CleanupConfig;
use crate::criteria::FilterCriteria;
use crate::executor::{CleanMode, DeletionExecutor, DeletionOutcome};
use crate::output::OutputFormatter;
use crate::purge::{PurgeReport, TreePurger};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "sweepdir",
    version,
    about = "Filter-driven file cleanup and lock-tolerant temp purge"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// The available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Delete files in a directory matching filter criteria.
    Clean(CleanArgs),
    /// Recursively empty a directory tree, skipping in-use entries.
    Purge(PurgeArgs),
}

/// Arguments of the `clean` subcommand.
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Directory to clean; defaults to target_path from the config file.
    pub path: Option<PathBuf>,

    /// Only delete files whose name starts with this text (case-sensitive).
    #[arg(long)]
    pub prefix: Option<String>,

    /// Only delete files with this extension; repeat for several.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Only delete files older than this age, e.g. "30d", "2h", "45m".
    #[arg(long, value_name = "AGE")]
    pub older_than: Option<String>,

    /// Reference date written in --date-format, e.g. "2024-03-10".
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Token format locating dates in filenames, e.g. "%Y-%m-%d".
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Expand the reference date into a retention window, e.g. "5d", "1m".
    #[arg(long, value_name = "DEPTH")]
    pub depth: Option<String>,

    /// Classify files without deleting anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the outcome as JSON instead of styled text.
    #[arg(long)]
    pub json: bool,

    /// Path to an explicit configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments of the `purge` subcommand.
#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Directory to purge; defaults to the OS temporary directory.
    pub path: Option<PathBuf>,

    /// Print the report as JSON instead of styled text.
    #[arg(long)]
    pub json: bool,
}

/// Runs the parsed command.
///
/// This is the main entry point for CLI operations. Errors are returned as
/// display-ready strings for `main` to print.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Clean(args) => run_clean(args),
        Command::Purge(args) => run_purge(args),
    }
}

/// Builds the effective criteria: config-file defaults, overridden field by
/// field with whatever was passed on the command line.
fn merge_criteria(base: FilterCriteria, args: &CleanArgs) -> FilterCriteria {
    FilterCriteria {
        name_prefix: args.prefix.clone().or(base.name_prefix),
        extensions: if args.extensions.is_empty() {
            base.extensions
        } else {
            Some(args.extensions.clone())
        },
        max_age: args.older_than.clone().or(base.max_age),
        reference_date: args.date.clone().or(base.reference_date),
        date_format: args.date_format.clone().or(base.date_format),
        retention_depth: args.depth.clone().or(base.retention_depth),
    }
}

fn run_clean(args: CleanArgs) -> Result<(), String> {
    let config = CleanupConfig::load(args.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    let criteria = merge_criteria(config.clean.filters, &args);

    let target = args
        .path
        .or(config.clean.target_path)
        .ok_or_else(|| {
            "No target directory: pass a path or set clean.target_path in the configuration"
                .to_string()
        })?;

    // The executor assumes an existing directory and at least one active
    // filter; both are checked here, before anything is listed.
    if !target.is_dir() {
        return Err(format!(
            "Target {} does not exist or is not a directory",
            target.display()
        ));
    }

    if criteria.is_empty() {
        return Err(
            "No filter defined. Specify at least one of --prefix, --ext, --older-than, \
             --date or --depth (or configure clean.filters)."
                .to_string(),
        );
    }

    let compiled = criteria.compile().map_err(|e| e.to_string())?;

    let mode = if args.dry_run {
        CleanMode::DryRun
    } else {
        CleanMode::Delete
    };

    if !args.json {
        if args.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                target.display()
            ));
        } else {
            OutputFormatter::info(&format!("Cleaning contents of: {}", target.display()));
        }
    }

    let outcome =
        DeletionExecutor::clean(&target, &compiled, mode).map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| format!("Failed to serialize outcome: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    print_clean_outcome(&outcome, args.dry_run);
    Ok(())
}

fn print_clean_outcome(outcome: &DeletionOutcome, dry_run: bool) {
    for file in &outcome.deleted {
        let verb = if dry_run { "Would delete" } else { "Deleted" };
        OutputFormatter::success(&format!(
            "{} - {} (modified {})",
            verb,
            file.name,
            file.modified.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    for entry in &outcome.skipped {
        OutputFormatter::plain(&format!("Skipped - {} ({})", entry.name, entry.reason));
    }

    for entry in &outcome.errors {
        OutputFormatter::error(&format!("Could not delete {} - {}", entry.name, entry.error));
    }

    OutputFormatter::clean_summary(outcome, dry_run);

    if !outcome.is_clean() {
        OutputFormatter::warning("Some files could not be deleted. Please review errors above.");
    }
}

fn run_purge(args: PurgeArgs) -> Result<(), String> {
    let target = args.path.unwrap_or_else(std::env::temp_dir);

    if !target.is_dir() {
        return Err(format!(
            "Purge target {} does not exist or is not a directory",
            target.display()
        ));
    }

    let report = if args.json {
        TreePurger::purge(&target).map_err(|e| e.to_string())?
    } else {
        let spinner =
            OutputFormatter::create_spinner(&format!("Purging {} ...", target.display()));
        let result = TreePurger::purge(&target);
        spinner.finish_and_clear();
        result.map_err(|e| e.to_string())?
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    print_purge_report(&target.display().to_string(), &report);
    Ok(())
}

fn print_purge_report(target: &str, report: &PurgeReport) {
    OutputFormatter::info(&format!("Purged: {}", target));

    for skipped in &report.skipped {
        let label = if skipped.in_use { "in use" } else { "error" };
        OutputFormatter::warning(&format!(
            "Skipped ({}) - {}: {}",
            label,
            skipped.path.display(),
            skipped.cause
        ));
    }

    OutputFormatter::purge_summary(report);
}
