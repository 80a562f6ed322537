//! Error types for cjan-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using cjan-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for janitor operations
#[derive(Error, Debug)]
pub enum Error {
    // Session store errors
    #[error("Session store not found: {0}")]
    StoreNotFound(PathBuf),

    #[error("Failed to parse session store {path}: {source}")]
    StoreParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session store is not a key/record mapping: {0}")]
    StoreShape(PathBuf),

    // Config errors
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{op} failed for {path}: {source}")]
    PathIo {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an IO error carrying the operation and path it failed on
    pub fn path_io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathIo {
            op,
            path: path.into(),
            source,
        }
    }
}
