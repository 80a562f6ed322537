//! Dated memory-document archival.
//!
//! Discovers `YYYY-MM-DD.md` documents in the memory directory, distills each
//! one into highlights appended to the cumulative log, then deletes the
//! source document. Documents are processed oldest first so the log reads in
//! chronological order.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};

use crate::error::{Error, Result};
use crate::gate::WriteGate;
use crate::highlight::HighlightExtractor;

/// Report from one archival run.
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Documents read and distilled.
    pub processed: usize,
    /// Total highlights appended to the log.
    pub extracted: usize,
    /// File names of deleted documents.
    pub deleted: Vec<String>,
    /// Documents that could not be read; left in place.
    pub failed: Vec<String>,
}

/// Parse a memory-document filename of the exact shape `YYYY-MM-DD.md`.
///
/// Returns None for anything else, including calendar-invalid dates.
pub fn parse_dated_filename(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".md")?;
    let bytes = stem.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !stem
        .char_indices()
        .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
    {
        return None;
    }
    let year = stem[0..4].parse().ok()?;
    let month = stem[5..7].parse().ok()?;
    let day = stem[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Calendar cutoff for "today minus `days`".
pub fn cutoff_date(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

/// Distills and deletes memory documents past the retention window.
pub struct MemoryArchivalScheduler {
    extractor: HighlightExtractor,
    gate: WriteGate,
}

impl MemoryArchivalScheduler {
    pub fn new(extractor: HighlightExtractor, gate: WriteGate) -> Self {
        Self { extractor, gate }
    }

    /// Process every dated document not newer than the cutoff.
    ///
    /// Documents that fail to read are reported and left in place; the rest
    /// of the batch still runs. A missing memory directory is a zero-count
    /// no-op.
    pub fn run(
        &self,
        memory_dir: &Path,
        log_path: &Path,
        cutoff: NaiveDate,
    ) -> Result<ArchiveReport> {
        let mut report = ArchiveReport::default();

        if !memory_dir.is_dir() {
            tracing::debug!(dir = %memory_dir.display(), "memory directory missing, nothing to archive");
            return Ok(report);
        }

        let mut candidates: Vec<(NaiveDate, PathBuf)> = Vec::new();
        let entries =
            std::fs::read_dir(memory_dir).map_err(|e| Error::path_io("read dir", memory_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::path_io("read dir", memory_dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(date) = parse_dated_filename(name) else {
                continue;
            };
            if date > cutoff {
                continue;
            }
            candidates.push((date, path));
        }
        candidates.sort_by_key(|(date, _)| *date);

        for (date, path) in candidates {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "skipping unreadable memory document");
                    report.failed.push(name);
                    continue;
                }
            };

            let highlights = self.extractor.extract(&text);
            report.processed += 1;

            if !highlights.is_empty() {
                report.extracted += highlights.len();
                if let Some(parent) = log_path.parent() {
                    self.gate.create_dir_all(parent)?;
                }
                let mut block = format!("\n## Archive {date}\n");
                for highlight in &highlights {
                    block.push_str("- ");
                    block.push_str(highlight);
                    block.push('\n');
                }
                self.gate.append(log_path, &block)?;
            }

            // Absence of extractable content is not a reason to retain the
            // raw file.
            self.gate.remove_file(&path)?;
            report.deleted.push(name);
        }

        tracing::info!(
            processed = report.processed,
            extracted = report.extracted,
            failed = report.failed.len(),
            "memory archival run complete"
        );

        Ok(report)
    }
}
