//! Clean command: session pruning plus memory-document archival.
//!
//! The two components run independently; either can be a no-op without
//! affecting the other. The combined report is rendered at the end.

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use cjan_core::WriteGate;
use cjan_core::archive::{MemoryArchivalScheduler, cutoff_date};
use cjan_core::config::JanitorConfig;
use cjan_core::highlight::{ExtractConfig, HighlightExtractor};
use cjan_core::report::MaintenanceReport;
use cjan_core::session::{JsonFileStore, PrunePolicy, SessionPruner, cutoff_millis};

use crate::cli::CleanCommand;

/// Longest key/file listing printed before truncating.
const MAX_LISTED: usize = 50;

/// Execute the clean command.
pub fn execute(cmd: CleanCommand, config: &JanitorConfig) -> Result<()> {
    let gate = WriteGate::new(cmd.dry_run);
    let mut report = MaintenanceReport::new(cmd.dry_run);

    let sessions_days = cmd.sessions_days.unwrap_or(config.sessions.keep_days);
    let memory_days = cmd.memory_days.unwrap_or(config.memory.keep_days);

    if let Some(store_path) = &cmd.store {
        let store = JsonFileStore::new(store_path, gate);
        let policy = PrunePolicy {
            protected_keywords: config.sessions.protected_keywords.clone(),
        };
        let pruner = SessionPruner::new(store, policy);
        let cutoff = cutoff_millis(Local::now(), sessions_days);
        report.sessions = Some(pruner.prune(cutoff)?);
    }

    let extractor = HighlightExtractor::new(ExtractConfig {
        heading_keywords: config.memory.heading_keywords.clone(),
        bullet_prefixes: config.memory.bullet_prefixes.clone(),
        ..ExtractConfig::default()
    });
    let scheduler = MemoryArchivalScheduler::new(extractor, gate);
    let cutoff = cutoff_date(Local::now().date_naive(), memory_days);
    report.memory = Some(scheduler.run(
        &config.paths.memory_path(),
        &config.paths.log_path(),
        cutoff,
    )?);

    render(&report, cmd.store.as_deref());
    Ok(())
}

fn render(report: &MaintenanceReport, store: Option<&Path>) {
    println!("{} Context janitor report", "🧹".cyan());
    println!("  dryRun: {}", report.dry_run);

    match (&report.sessions, store) {
        (Some(sessions), Some(path)) => {
            println!("  sessionsStore: {}", path.display());
            println!("  sessionsDeleted: {}", sessions.deleted);
            println!("  protectedSessionsKept: {}", sessions.protected_kept.len());
            print_listed("protectedSessionKeys", &sessions.protected_kept);
        }
        _ => println!("  sessions: {}", "skipped (no --store)".dimmed()),
    }

    if let Some(memory) = &report.memory {
        println!("  memoryFilesProcessed: {}", memory.processed);
        println!("  memoryHighlightsExtracted: {}", memory.extracted);
        println!("  memoryFilesDeleted: {}", memory.deleted.len());
        print_listed("memoryFiles", &memory.deleted);
        if !memory.failed.is_empty() {
            println!("  {} Unreadable, left in place:", "⚠".yellow());
            for name in &memory.failed {
                println!("    - {name}");
            }
        }
    }

    if !report.has_changes() {
        println!("{} Nothing to clean", "ℹ".blue());
    } else if report.dry_run {
        println!("{} Dry run: no files were changed", "ℹ".blue());
    } else {
        println!("{} Done", "✓".green());
    }
}

/// Print up to MAX_LISTED entries, then a count of the rest.
fn print_listed(label: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    println!("  {label}:");
    for entry in entries.iter().take(MAX_LISTED) {
        println!("    - {}", entry.dimmed());
    }
    if entries.len() > MAX_LISTED {
        println!("    - ... (+{} more)", entries.len() - MAX_LISTED);
    }
}
