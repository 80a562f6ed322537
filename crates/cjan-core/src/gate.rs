//! Write gate for dry-run support.
//!
//! Every mutating filesystem operation in the janitor goes through a single
//! `WriteGate`, so a simulated run and a real run walk identical decision
//! paths and differ only in side effects.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::error::{Error, Result};

/// Gate consulted before any filesystem mutation.
#[derive(Debug, Clone, Copy)]
pub struct WriteGate {
    dry_run: bool,
}

impl WriteGate {
    /// Create a gate. `dry_run = true` turns every mutation into a logged no-op.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Gate that performs all writes.
    pub fn live() -> Self {
        Self::new(false)
    }

    /// Whether this gate suppresses writes.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Overwrite a file with the given contents.
    pub fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.dry_run {
            tracing::debug!(path = %path.display(), "dry-run: skipped write");
            return Ok(());
        }
        fs::write(path, contents).map_err(|e| Error::path_io("write", path, e))
    }

    /// Append to a file, creating it if absent.
    pub fn append(&self, path: &Path, contents: &str) -> Result<()> {
        if self.dry_run {
            tracing::debug!(path = %path.display(), "dry-run: skipped append");
            return Ok(());
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::path_io("open for append", path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| Error::path_io("append", path, e))
    }

    /// Copy a file (used for store backups).
    pub fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        if self.dry_run {
            tracing::debug!(from = %from.display(), to = %to.display(), "dry-run: skipped copy");
            return Ok(());
        }
        fs::copy(from, to).map_err(|e| Error::path_io("copy", from, e))?;
        Ok(())
    }

    /// Remove a file.
    pub fn remove_file(&self, path: &Path) -> Result<()> {
        if self.dry_run {
            tracing::debug!(path = %path.display(), "dry-run: skipped remove");
            return Ok(());
        }
        fs::remove_file(path).map_err(|e| Error::path_io("remove", path, e))
    }

    /// Create a directory and all of its parents.
    pub fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.dry_run {
            tracing::debug!(path = %path.display(), "dry-run: skipped mkdir");
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|e| Error::path_io("create dir", path, e))
    }
}
