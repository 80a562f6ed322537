//! Aggregated maintenance report.

use crate::archive::ArchiveReport;
use crate::notes::SweepReport;
use crate::session::PruneReport;

/// Everything one maintenance run did (or, under dry-run, would have done).
///
/// Components that did not run stay `None`; rendering is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceReport {
    pub dry_run: bool,
    pub sessions: Option<PruneReport>,
    pub memory: Option<ArchiveReport>,
    pub notes: Option<SweepReport>,
}

impl MaintenanceReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Whether any component deleted or archived anything.
    pub fn has_changes(&self) -> bool {
        self.sessions.as_ref().is_some_and(|s| s.deleted > 0)
            || self
                .memory
                .as_ref()
                .is_some_and(|m| !m.deleted.is_empty())
            || self.notes.as_ref().is_some_and(|n| n.archived > 0)
    }
}
