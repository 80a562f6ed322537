//! Session store repository.
//!
//! The store is a single JSON document mapping session keys to records. The
//! pruner only sees `load`/`save`, so a real key-value backing store can be
//! substituted without touching the decision logic.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::gate::WriteGate;

/// Key → record mapping as persisted in the store document.
///
/// Record values are kept as raw JSON so a rewrite never alters a record the
/// janitor decided to retain.
pub type SessionMap = Map<String, Value>;

/// Repository abstraction over the session store.
pub trait SessionStore {
    /// Load all records.
    fn load(&self) -> Result<SessionMap>;

    /// Persist the given records, replacing the previous contents.
    fn save(&self, records: &SessionMap) -> Result<()>;
}

/// JSON-file-backed session store.
///
/// `save` copies the current document to a timestamped `.bak` sibling before
/// overwriting it. Backup and overwrite are two independent operations; a
/// crash in between leaves the backup durable and the store unchanged.
pub struct JsonFileStore {
    path: PathBuf,
    gate: WriteGate,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, gate: WriteGate) -> Self {
        Self {
            path: path.into(),
            gate,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backup sibling named `<file>.<YYYYMMDD-HHMMSS>.bak`.
    fn backup_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sessions".to_string());
        self.path.with_file_name(format!("{name}.{stamp}.bak"))
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<SessionMap> {
        if !self.path.exists() {
            return Err(Error::StoreNotFound(self.path.clone()));
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::path_io("read store", &self.path, e))?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| Error::StoreParse {
            path: self.path.clone(),
            source: e,
        })?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(Error::StoreShape(self.path.clone())),
        }
    }

    fn save(&self, records: &SessionMap) -> Result<()> {
        self.gate.copy(&self.path, &self.backup_path())?;

        // Stable, portable text form: pretty JSON with a trailing newline.
        let mut body = serde_json::to_string_pretty(records)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        body.push('\n');
        self.gate.write(&self.path, &body)
    }
}
