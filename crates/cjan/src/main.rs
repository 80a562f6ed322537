//! cjan - Context Janitor CLI
//!
//! Scheduled maintenance for agent memory: prune stale sessions, sweep
//! expired notes entries, distill old memory documents into highlights.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;

use cjan_core::config::JanitorConfig;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("cjan=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => JanitorConfig::load_from(path)?,
        None => JanitorConfig::load()?,
    };

    // Execute command
    match cli.command {
        Commands::Clean(cmd) => commands::clean::execute(cmd, &config),
        Commands::Sweep(cmd) => commands::sweep::execute(cmd, &config),
        Commands::Version => {
            println!("cjan {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
