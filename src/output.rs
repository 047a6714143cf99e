//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! status lines, a spinner for long purge walks, and summary tables. This
//! module abstracts away output details, making it easy to change formatting
//! globally.

use crate::executor::DeletionOutcome;
use crate::purge::PurgeReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a spinner for operations without a known length, such as
    /// walking a temp tree.
    pub fn create_spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Prints a summary table for a cleanup run.
    pub fn clean_summary(outcome: &DeletionOutcome, dry_run: bool) {
        let verb = if dry_run { "Would delete" } else { "Deleted" };
        Self::summary_table(&[
            (verb, outcome.deleted.len()),
            ("Skipped", outcome.skipped.len()),
            ("Failed", outcome.errors.len()),
        ]);
    }

    /// Prints a summary table for a purge run.
    pub fn purge_summary(report: &PurgeReport) {
        Self::summary_table(&[
            ("Files deleted", report.deleted_files),
            ("Directories removed", report.removed_dirs),
            ("Skipped (in use)", report.skipped.len()),
        ]);
    }

    /// Prints rows of labeled counts in a bordered table.
    fn summary_table(rows: &[(&str, usize)]) {
        Self::header("SUMMARY");

        let label_width = rows
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!("{}", "-".repeat(label_width + 10));
        for (label, count) in rows {
            let styled = if *count == 0 {
                count.to_string().normal()
            } else {
                count.to_string().green()
            };
            println!("{:<width$} | {}", label, styled, width = label_width);
        }
        println!("{}", "-".repeat(label_width + 10));
    }
}
