//! Session retention and pruning.
//!
//! Classifies session records against a cutoff timestamp and rewrites the
//! store without the stale ones. Protected keys and records of unknown age
//! always survive; the store is only rewritten when at least one record was
//! actually deleted.

mod store;

pub use store::{JsonFileStore, SessionMap, SessionStore};

use chrono::{DateTime, Duration, Local};
use serde_json::Value;

use crate::error::Result;

/// Retention policy for session records.
#[derive(Debug, Clone)]
pub struct PrunePolicy {
    /// Case-insensitive substrings that mark a session key as protected.
    pub protected_keywords: Vec<String>,
}

impl Default for PrunePolicy {
    fn default() -> Self {
        Self {
            protected_keywords: vec!["important".to_string(), "memory".to_string()],
        }
    }
}

impl PrunePolicy {
    /// Whether a key matches the protected predicate.
    pub fn is_protected(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.protected_keywords
            .iter()
            .any(|kw| key.contains(&kw.to_lowercase()))
    }
}

/// Outcome of the per-record retention decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Key matches the protected predicate.
    Protected,
    /// No usable timestamp; unknown age is never deleted.
    KeepUnknownAge,
    /// Updated at or after the cutoff.
    KeepFresh,
    /// Stale and unprotected.
    Delete,
}

/// Decide what happens to one record.
///
/// Pure and total over key, timestamp and cutoff.
pub fn classify(
    policy: &PrunePolicy,
    key: &str,
    updated_at_ms: Option<i64>,
    cutoff_ms: i64,
) -> Verdict {
    if policy.is_protected(key) {
        return Verdict::Protected;
    }
    match updated_at_ms {
        None => Verdict::KeepUnknownAge,
        Some(ts) if ts >= cutoff_ms => Verdict::KeepFresh,
        Some(_) => Verdict::Delete,
    }
}

/// Read the optional epoch-ms timestamp off a raw record value.
///
/// Anything that is not an object carrying an integer `updatedAt` counts as
/// unknown age.
fn updated_at_ms(value: &Value) -> Option<i64> {
    value.as_object()?.get("updatedAt")?.as_i64()
}

/// Epoch-ms cutoff for "now minus `days`".
pub fn cutoff_millis(now: DateTime<Local>, days: i64) -> i64 {
    (now - Duration::days(days)).timestamp_millis()
}

/// Report from one prune run.
#[derive(Debug, Clone, Default)]
pub struct PruneReport {
    /// Records removed from the store.
    pub deleted: usize,
    /// Protected keys that survived, sorted for stable reporting.
    pub protected_kept: Vec<String>,
}

/// Prunes stale session records from a store.
pub struct SessionPruner<S: SessionStore> {
    store: S,
    policy: PrunePolicy,
}

impl<S: SessionStore> SessionPruner<S> {
    pub fn new(store: S, policy: PrunePolicy) -> Self {
        Self { store, policy }
    }

    /// Run one prune pass against the given cutoff (epoch milliseconds).
    ///
    /// A failed load aborts the whole prune: without a trustworthy baseline
    /// there is no safe deletion decision. With zero deletions the store is
    /// not rewritten and no backup is taken.
    pub fn prune(&self, cutoff_ms: i64) -> Result<PruneReport> {
        let records = self.store.load()?;

        let mut report = PruneReport::default();
        let mut retained = SessionMap::new();

        for (key, value) in &records {
            match classify(&self.policy, key, updated_at_ms(value), cutoff_ms) {
                Verdict::Delete => {
                    report.deleted += 1;
                    tracing::debug!(key, "pruning stale session");
                }
                verdict => {
                    if verdict == Verdict::Protected {
                        report.protected_kept.push(key.clone());
                    }
                    retained.insert(key.clone(), value.clone());
                }
            }
        }

        if report.deleted > 0 {
            self.store.save(&retained)?;
        }

        report.protected_kept.sort();
        Ok(report)
    }
}
