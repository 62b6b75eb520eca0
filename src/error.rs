//! Error types for the chronofs library
//!
//! Every failure the engine can report is a value of [`ChronoFsError`]. None of
//! them are fatal: a failed operation leaves the repository exactly as it was
//! and the caller is free to keep issuing commands.

use crate::version::VersionId;
use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the chronofs library
pub type Result<T> = std::result::Result<T, ChronoFsError>;

/// Main error type for all chronofs operations
#[derive(Debug, Error)]
pub enum ChronoFsError {
    /// A file with this name is already tracked
    #[error("File '{0}' already exists.")]
    AlreadyExists(String),

    /// No file with this name is tracked
    #[error("File not found: '{0}'.")]
    FileNotFound(String),

    /// The active version is already an immutable snapshot
    #[error("A snapshot already exists for the current version. Modify the file to create a new version before snapshotting.")]
    AlreadySnapshotted,

    /// Parent-mode rollback requested while the root is active
    #[error("Rollback failed. Already at the root version.")]
    NoParent,

    /// Id-mode rollback to an id this file never issued
    #[error("Rollback failed. Version {0} does not exist.")]
    VersionNotFound(VersionId),

    /// Id-mode rollback to the version that is already checked out
    #[error("Cannot rollback to the version that is already active ({0}).")]
    AlreadyActive(VersionId),

    /// Lookup in an associative index missed
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Extraction from an empty priority selector
    #[error("Priority selector is empty")]
    Empty,

    /// I/O errors while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON deserialization of configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file missing
    #[error("Configuration file not found: {0:?}")]
    ConfigNotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ChronoFsError {
    /// Create an invalid-configuration error with a custom message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        ChronoFsError::InvalidConfiguration(msg.into())
    }

    /// Check if this error is recoverable
    ///
    /// Engine errors never alter state, so the caller can simply carry on.
    /// Configuration errors happen before a repository exists.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ChronoFsError::Io(_)
                | ChronoFsError::Json(_)
                | ChronoFsError::ConfigNotFound(_)
                | ChronoFsError::InvalidConfiguration(_)
        )
    }

    /// Check if this error reports a missing file, version or key
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ChronoFsError::FileNotFound(_)
                | ChronoFsError::VersionNotFound(_)
                | ChronoFsError::NotFound(_)
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            ChronoFsError::FileNotFound(name) => {
                format!("File '{}' not found. Use 'CREATE {}' to start tracking it.", name, name)
            }
            ChronoFsError::VersionNotFound(id) => {
                format!("Version {} does not exist. Use 'HISTORY' or 'TREE' to see available versions.", id)
            }
            ChronoFsError::NoParent => {
                "Already at the root version; there is nothing older to roll back to.".to_string()
            }
            ChronoFsError::ConfigNotFound(path) => {
                format!("Configuration file {:?} does not exist. Omit --config to use defaults.", path)
            }
            _ => self.to_string(),
        }
    }
}
