//! Sweep command: archive expired tagged entries out of the notes log.

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use cjan_core::WriteGate;
use cjan_core::config::JanitorConfig;
use cjan_core::notes::TagArchiver;

use crate::cli::SweepCommand;

/// Execute the sweep command.
pub fn execute(cmd: SweepCommand, config: &JanitorConfig) -> Result<()> {
    let gate = WriteGate::new(cmd.dry_run);
    let archiver = TagArchiver::new(gate);
    let today = Local::now().date_naive();

    let report = archiver.sweep(
        &config.paths.notes_path(),
        &config.paths.archive_path(),
        today,
    )?;

    if report.archived == 0 {
        println!("{} No expired entries to archive", "ℹ".blue());
        return Ok(());
    }

    match report.archive_file {
        Some(path) => println!(
            "{} Archived {} entries -> {}",
            "✓".green(),
            report.archived,
            path.display()
        ),
        None => println!("{} Archived {} entries", "✓".green(), report.archived),
    }
    if cmd.dry_run {
        println!("{} Dry run: no files were changed", "ℹ".blue());
    }

    Ok(())
}
