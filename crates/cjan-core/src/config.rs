//! Configuration management for the janitor.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variable (CJAN_CONFIG pointing at a toml file)
//! 2. Config file (~/.cjan/config.toml)
//! 3. Default values
//!
//! The rule tables that drive decision logic (protected keywords, heading
//! keywords, bullet prefixes) live here as explicit ordered lists so behavior
//! can be tuned without touching control flow.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JanitorConfig {
    /// Filesystem layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Session retention settings
    #[serde(default)]
    pub sessions: SessionsConfig,

    /// Memory document retention settings
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Where the janitor's inputs and outputs live.
///
/// Relative entries resolve against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Workspace root all other paths resolve against
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Notes log carrying tagged entries
    #[serde(default = "default_notes_file")]
    pub notes_file: PathBuf,

    /// Directory holding dated memory documents
    #[serde(default = "default_memory_dir")]
    pub memory_dir: PathBuf,

    /// Directory expired notes entries are archived into
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Cumulative log highlights are appended to
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

/// Session-record retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Sessions updated within this many days are kept
    #[serde(default = "default_sessions_days")]
    pub keep_days: i64,

    /// Case-insensitive substrings that exempt a session key from pruning
    #[serde(default = "default_protected_keywords")]
    pub protected_keywords: Vec<String>,
}

/// Memory-document retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Memory documents dated within this many days are kept
    #[serde(default = "default_memory_days")]
    pub keep_days: i64,

    /// Heading keywords that mark a summary/takeaway section
    #[serde(default = "default_heading_keywords")]
    pub heading_keywords: Vec<String>,

    /// Line prefixes the bullet fallback recognizes
    #[serde(default = "default_bullet_prefixes")]
    pub bullet_prefixes: Vec<String>,
}

impl PathsConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Resolved path of the notes log.
    pub fn notes_path(&self) -> PathBuf {
        self.resolve(&self.notes_file)
    }

    /// Resolved path of the memory directory.
    pub fn memory_path(&self) -> PathBuf {
        self.resolve(&self.memory_dir)
    }

    /// Resolved path of the notes archive directory.
    pub fn archive_path(&self) -> PathBuf {
        self.resolve(&self.archive_dir)
    }

    /// Resolved path of the cumulative highlight log.
    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }
}

// Default value functions

fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_notes_file() -> PathBuf {
    PathBuf::from("MEMORY.md")
}

fn default_memory_dir() -> PathBuf {
    PathBuf::from("memory")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("memory/archive")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("MEMORY.md")
}

fn default_sessions_days() -> i64 {
    7
}

fn default_memory_days() -> i64 {
    30
}

fn default_protected_keywords() -> Vec<String> {
    vec!["important".to_string(), "memory".to_string()]
}

fn default_heading_keywords() -> Vec<String> {
    ["精华", "要点", "总结", "回顾", "反思", "结论", "行动", "改进", "学到"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_bullet_prefixes() -> Vec<String> {
    ["- ", "* ", "• ", "1. ", "2. ", "3. "]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            notes_file: default_notes_file(),
            memory_dir: default_memory_dir(),
            archive_dir: default_archive_dir(),
            log_file: default_log_file(),
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            keep_days: default_sessions_days(),
            protected_keywords: default_protected_keywords(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            keep_days: default_memory_days(),
            heading_keywords: default_heading_keywords(),
            bullet_prefixes: default_bullet_prefixes(),
        }
    }
}

impl JanitorConfig {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::path_io("read config", path, e))?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CJAN_CONFIG") {
            PathBuf::from(path)
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cjan")
                .join("config.toml")
        }
    }
}
