//! Core data types shared across the chronofs library
//!
//! ## Overview
//!
//! The types in this module represent:
//! - **Operation results**: [`EditOutcome`], [`HistoryEntry`], [`RankedFile`]
//! - **Inspection**: [`FileSummary`]
//! - **Configuration**: [`RepositoryConfig`]
//!
//! ## Examples
//!
//! ```rust
//! use chronofs::types::RepositoryConfig;
//!
//! let config = RepositoryConfig {
//!     root_message: "Empty file".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{ChronoFsError, Result};
use crate::version::VersionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Message attached to the root version of every new file
pub const DEFAULT_ROOT_MESSAGE: &str = "Initial version";

/// What an insert or update did to the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditOutcome {
    /// The active version was a working version and was overwritten
    InPlace(VersionId),
    /// The active version was a snapshot; a new child was created
    Branched {
        /// The snapshot the new version branched from
        parent: VersionId,
        /// The newly created (and now active) version
        created: VersionId,
    },
}

impl EditOutcome {
    /// Id of the version that now holds the edited content
    pub fn version(&self) -> VersionId {
        match self {
            EditOutcome::InPlace(id) => *id,
            EditOutcome::Branched { created, .. } => *created,
        }
    }

    /// Whether a new version was created
    pub fn is_branch(&self) -> bool {
        matches!(self, EditOutcome::Branched { .. })
    }
}

/// One snapshot on the path from the root to the active version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Version id
    pub id: VersionId,
    /// When the version was snapshotted
    pub snapshot_at: DateTime<Utc>,
    /// Snapshot message
    pub message: String,
}

/// A file and its score in one of the repository rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedFile {
    /// File name
    pub name: String,
    /// Score the file was ranked by
    pub score: i64,
}

/// Read-only summary of one tracked file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// File name
    pub name: String,
    /// Versions ever created
    pub version_count: usize,
    /// Checked-out version
    pub active_version: VersionId,
    /// Whether the checked-out version is a snapshot
    pub active_is_snapshot: bool,
    /// Last insert, update or snapshot
    pub last_modified_at: DateTime<Utc>,
}

/// Repository configuration
///
/// Every field has a default, so a configuration file only needs to list
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Message attached to every root version
    pub root_message: String,
    /// Initial capacity of the name -> file index
    pub file_capacity: usize,
    /// Initial capacity of each file's id -> version index
    pub version_capacity: usize,
    /// strftime pattern used when rendering timestamps
    pub time_format: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root_message: DEFAULT_ROOT_MESSAGE.to_string(),
            file_capacity: 256,
            version_capacity: 16,
            time_format: "%c".to_string(),
        }
    }
}

impl RepositoryConfig {
    /// Load and validate a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// - [`ChronoFsError::ConfigNotFound`] if the path does not exist
    /// - [`ChronoFsError::Io`] / [`ChronoFsError::Json`] on read or parse failure
    /// - [`ChronoFsError::InvalidConfiguration`] if validation fails
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChronoFsError::ConfigNotFound(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path)?;
        let config: RepositoryConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field holds a usable value
    pub fn validate(&self) -> Result<()> {
        if self.file_capacity == 0 {
            return Err(ChronoFsError::invalid_config("file_capacity must be at least 1"));
        }
        if self.version_capacity == 0 {
            return Err(ChronoFsError::invalid_config("version_capacity must be at least 1"));
        }
        if self.time_format.trim().is_empty() {
            return Err(ChronoFsError::invalid_config("time_format must not be empty"));
        }
        Ok(())
    }
}
