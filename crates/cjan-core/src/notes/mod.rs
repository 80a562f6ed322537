//! Tagged-line archival sweep over the notes log.
//!
//! Recognized line shape: `- [P0|P1|P2(|expire:YYYY-MM-DD)?] body`. One sweep
//! partitions the document into kept and archived lines: expired P1/P2
//! entries move to a dated archive file, everything else passes through in
//! its original position. P0 entries and entries without a parseable expiry
//! are never archived.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Error, Result};
use crate::gate::WriteGate;

/// Priority tag on a notes line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPriority {
    /// Permanent entries, exempt from expiry.
    P0,
    P1,
    P2,
}

impl TagPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagPriority::P0 => "P0",
            TagPriority::P1 => "P1",
            TagPriority::P2 => "P2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "P0" => Some(TagPriority::P0),
            "P1" => Some(TagPriority::P1),
            "P2" => Some(TagPriority::P2),
            _ => None,
        }
    }
}

/// A notes line matched against the tag pattern.
///
/// The expiry is kept raw here; calendar validation happens at decision time
/// so malformed dates can fail safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine<'a> {
    pub priority: TagPriority,
    pub expiry: Option<&'a str>,
    pub body: &'a str,
}

/// Report from one sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Lines moved out of the primary document.
    pub archived: usize,
    /// Archive file the lines were appended to, when any were.
    pub archive_file: Option<PathBuf>,
}

/// Sweeps expired tagged entries out of a notes document.
pub struct TagArchiver {
    gate: WriteGate,
    pattern: Regex,
}

impl TagArchiver {
    pub fn new(gate: WriteGate) -> Self {
        Self {
            gate,
            pattern: Regex::new(r"^\s*-\s*\[(P0|P1|P2)(?:\|expire:(\d{4}-\d{2}-\d{2}))?\]\s*(.*)$")
                .expect("valid regex"),
        }
    }

    /// Match one line against the tag pattern.
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<TaggedLine<'a>> {
        let caps = self.pattern.captures(line)?;
        let priority = TagPriority::from_str(caps.get(1)?.as_str())?;
        let expiry = caps.get(2).map(|m| m.as_str());
        let body = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        Some(TaggedLine {
            priority,
            expiry,
            body,
        })
    }

    /// Per-line decision: true means the line moves to the archive.
    ///
    /// Pure function of the line text and `today`.
    pub fn should_archive(&self, line: &str, today: NaiveDate) -> bool {
        let Some(tag) = self.parse_line(line) else {
            return false;
        };
        if tag.priority == TagPriority::P0 {
            return false;
        }
        let Some(raw) = tag.expiry else {
            return false;
        };
        // Unparseable dates are never archived.
        let Some(expiry) = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok() else {
            return false;
        };
        expiry < today
    }

    /// Run one sweep over `document`, archiving expired lines into
    /// `archive_dir`.
    ///
    /// When nothing expires, no file is touched. A missing document is a
    /// no-op, not an error.
    pub fn sweep(
        &self,
        document: &Path,
        archive_dir: &Path,
        today: NaiveDate,
    ) -> Result<SweepReport> {
        if !document.exists() {
            tracing::debug!(document = %document.display(), "notes document missing, skipping sweep");
            return Ok(SweepReport::default());
        }

        let content = std::fs::read_to_string(document)
            .map_err(|e| Error::path_io("read notes", document, e))?;

        let mut kept: Vec<&str> = Vec::new();
        let mut archived: Vec<&str> = Vec::new();

        for raw in content.split_inclusive('\n') {
            let line = raw.strip_suffix('\n').unwrap_or(raw);
            let line = line.strip_suffix('\r').unwrap_or(line);
            if self.should_archive(line, today) {
                archived.push(raw);
            } else {
                kept.push(raw);
            }
        }

        if archived.is_empty() {
            return Ok(SweepReport::default());
        }

        let file_name = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notes".to_string());
        let stem = document
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notes".to_string());
        let archive_file = archive_dir.join(format!("{stem}-archive-{today}.md"));

        self.gate.create_dir_all(archive_dir)?;

        if !archive_file.exists() {
            let banner = format!(
                "# Archived from {file_name} ({today})\n\n\
                 Entries below were archived by the janitor because they expired.\n\n"
            );
            self.gate.write(&archive_file, &banner)?;
        }
        self.gate.append(&archive_file, &archived.concat())?;

        // Archive append is durable before the primary shrinks; a crash in
        // between is recovered by re-running the sweep.
        self.gate.write(document, &kept.concat())?;

        tracing::info!(
            archived = archived.len(),
            archive = %archive_file.display(),
            "swept expired notes entries"
        );

        Ok(SweepReport {
            archived: archived.len(),
            archive_file: Some(archive_file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn archiver() -> TagArchiver {
        TagArchiver::new(WriteGate::live())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line parsing and per-line decisions
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_line_variants() {
        let a = archiver();

        let tag = a.parse_line("- [P1|expire:2024-01-01] rotate the token").unwrap();
        assert_eq!(tag.priority, TagPriority::P1);
        assert_eq!(tag.expiry, Some("2024-01-01"));
        assert_eq!(tag.body, "rotate the token");

        let tag = a.parse_line("  - [P0] keep forever").unwrap();
        assert_eq!(tag.priority, TagPriority::P0);
        assert_eq!(tag.expiry, None);

        assert!(a.parse_line("plain prose line").is_none());
        assert!(a.parse_line("- [P9] unknown tag").is_none());
    }

    #[test]
    fn test_p0_is_never_archived() {
        let a = archiver();
        assert!(!a.should_archive("- [P0] keep me", date("2024-02-01")));
        assert!(!a.should_archive("- [P0|expire:2020-01-01] keep me", date("2024-02-01")));
    }

    #[test]
    fn test_expired_entry_is_archived() {
        let a = archiver();
        let line = "- [P1|expire:2024-01-01] short lived";
        assert!(a.should_archive(line, date("2024-02-01")));
        assert!(!a.should_archive(line, date("2023-12-01")));
        // Expiring today means still valid.
        assert!(!a.should_archive(line, date("2024-01-01")));
    }

    #[test]
    fn test_missing_or_malformed_expiry_is_kept() {
        let a = archiver();
        assert!(!a.should_archive("- [P2] no ttl", date("2024-02-01")));
        assert!(!a.should_archive("- [P2|expire:2024-02-31] bad date", date("2024-06-01")));
        assert!(!a.should_archive("- [P2|expire:2024-13-01] bad month", date("2024-06-01")));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sweep side effects
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_sweep_moves_expired_lines_preserving_order() {
        let temp = tempdir().expect("Failed to create temp dir");
        let doc = temp.path().join("MEMORY.md");
        let archive_dir = temp.path().join("archive");
        std::fs::write(
            &doc,
            "# Notes\n\
             - [P0] permanent rule\n\
             - [P1|expire:2024-01-01] first expired\n\
             plain line\n\
             - [P2|expire:2024-01-15] second expired\n\
             - [P1|expire:2024-12-31] still valid\n",
        )
        .unwrap();

        let report = archiver()
            .sweep(&doc, &archive_dir, date("2024-02-01"))
            .expect("sweep failed");

        assert_eq!(report.archived, 2);

        let rewritten = std::fs::read_to_string(&doc).unwrap();
        assert_eq!(
            rewritten,
            "# Notes\n\
             - [P0] permanent rule\n\
             plain line\n\
             - [P1|expire:2024-12-31] still valid\n"
        );

        let archive_file = report.archive_file.unwrap();
        assert_eq!(
            archive_file,
            archive_dir.join("MEMORY-archive-2024-02-01.md")
        );
        let archived = std::fs::read_to_string(&archive_file).unwrap();
        assert!(archived.starts_with("# Archived from MEMORY.md (2024-02-01)\n"));
        let first = archived.find("first expired").unwrap();
        let second = archived.find("second expired").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_sweep_without_expired_lines_writes_nothing() {
        let temp = tempdir().expect("Failed to create temp dir");
        let doc = temp.path().join("MEMORY.md");
        let archive_dir = temp.path().join("archive");
        std::fs::write(&doc, "- [P0] rule\n- [P1|expire:2099-01-01] future\n").unwrap();
        let before = std::fs::read_to_string(&doc).unwrap();

        let report = archiver()
            .sweep(&doc, &archive_dir, date("2024-02-01"))
            .expect("sweep failed");

        assert_eq!(report.archived, 0);
        assert!(report.archive_file.is_none());
        assert!(!archive_dir.exists());
        assert_eq!(std::fs::read_to_string(&doc).unwrap(), before);
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let temp = tempdir().expect("Failed to create temp dir");
        let doc = temp.path().join("MEMORY.md");
        let archive_dir = temp.path().join("archive");
        std::fs::write(&doc, "- [P1|expire:2024-01-01] expired\n- [P0] rule\n").unwrap();

        let a = archiver();
        let first = a.sweep(&doc, &archive_dir, date("2024-02-01")).unwrap();
        assert_eq!(first.archived, 1);

        let doc_after_first = std::fs::read_to_string(&doc).unwrap();
        let archive_after_first =
            std::fs::read_to_string(archive_dir.join("MEMORY-archive-2024-02-01.md")).unwrap();

        let second = a.sweep(&doc, &archive_dir, date("2024-02-01")).unwrap();
        assert_eq!(second.archived, 0);
        assert_eq!(std::fs::read_to_string(&doc).unwrap(), doc_after_first);
        assert_eq!(
            std::fs::read_to_string(archive_dir.join("MEMORY-archive-2024-02-01.md")).unwrap(),
            archive_after_first
        );
    }

    #[test]
    fn test_sweep_appends_to_existing_archive_without_second_banner() {
        let temp = tempdir().expect("Failed to create temp dir");
        let doc = temp.path().join("MEMORY.md");
        let archive_dir = temp.path().join("archive");

        std::fs::write(&doc, "- [P1|expire:2024-01-01] first batch\n").unwrap();
        let a = archiver();
        a.sweep(&doc, &archive_dir, date("2024-02-01")).unwrap();

        std::fs::write(&doc, "- [P2|expire:2024-01-02] second batch\n").unwrap();
        a.sweep(&doc, &archive_dir, date("2024-02-01")).unwrap();

        let archived =
            std::fs::read_to_string(archive_dir.join("MEMORY-archive-2024-02-01.md")).unwrap();
        assert_eq!(archived.matches("# Archived from").count(), 1);
        assert!(archived.contains("first batch"));
        assert!(archived.contains("second batch"));
    }

    #[test]
    fn test_sweep_missing_document_is_noop() {
        let temp = tempdir().expect("Failed to create temp dir");
        let report = archiver()
            .sweep(
                &temp.path().join("absent.md"),
                &temp.path().join("archive"),
                date("2024-02-01"),
            )
            .expect("sweep failed");
        assert_eq!(report.archived, 0);
    }

    #[test]
    fn test_dry_run_reports_without_touching_files() {
        let temp = tempdir().expect("Failed to create temp dir");
        let doc = temp.path().join("MEMORY.md");
        let archive_dir = temp.path().join("archive");
        std::fs::write(&doc, "- [P1|expire:2024-01-01] expired\n").unwrap();
        let before = std::fs::read_to_string(&doc).unwrap();

        let report = TagArchiver::new(WriteGate::new(true))
            .sweep(&doc, &archive_dir, date("2024-02-01"))
            .expect("sweep failed");

        assert_eq!(report.archived, 1);
        assert!(!archive_dir.exists());
        assert_eq!(std::fs::read_to_string(&doc).unwrap(), before);
    }
}
