//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Context Janitor CLI
///
/// Lifecycle maintenance for an agent's persisted memory.
#[derive(Parser, Debug)]
#[command(name = "cjan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (overrides CJAN_CONFIG and the default lookup)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prune stale sessions and distill old memory documents
    Clean(CleanCommand),

    /// Archive expired tagged entries out of the notes log
    Sweep(SweepCommand),

    /// Show version
    Version,
}

#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Path to the session store document, as resolved by the session runtime.
    /// Session pruning is skipped when omitted.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Keep sessions updated within this many days (default from config)
    #[arg(long)]
    pub sessions_days: Option<i64>,

    /// Keep memory documents dated within this many days (default from config)
    #[arg(long)]
    pub memory_days: Option<i64>,

    /// Print actions only; no changes
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct SweepCommand {
    /// Print actions only; no changes
    #[arg(long)]
    pub dry_run: bool,
}
