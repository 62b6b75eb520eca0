//! Multi-file repository
//!
//! This module provides [`Repository`], the entry point for every operation:
//! it owns all tracked files by name, delegates per-file work to each
//! [`VersionedFile`], and keeps the two analytics rankings current.
//!
//! ## Analytics
//!
//! After every successful mutation (create, insert, update, snapshot) both
//! rankings are discarded and rebuilt from the live files. Rebuilding costs
//! O(files) on the mutation path only; queries drain a copy and never touch
//! the live rankings. Rollback changes neither score and does not rebuild.
//!
//! ## Examples
//!
//! ```rust
//! use chronofs::Repository;
//!
//! # fn main() -> chronofs::Result<()> {
//! let mut repo = Repository::new();
//! repo.create("a")?;
//! repo.insert("a", "hi")?;
//! repo.snapshot("a", "v1")?;
//! repo.insert("a", " there")?;
//! assert_eq!(repo.read("a")?, "hi there");
//!
//! repo.rollback("a", Some(1))?;
//! assert_eq!(repo.read("a")?, "hi");
//!
//! let biggest = repo.rank_by_size(Some(1));
//! assert_eq!(biggest[0].name, "a");
//! assert_eq!(biggest[0].score, 3);
//! # Ok(())
//! # }
//! ```

use crate::clock::{Clock, SystemClock};
use crate::collections::AssocIndex;
use crate::error::{ChronoFsError, Result};
use crate::file::VersionedFile;
use crate::ranking::PrioritySelector;
use crate::tree::{TreeStats, TreeView};
use crate::types::{EditOutcome, FileSummary, HistoryEntry, RankedFile, RepositoryConfig};
use crate::version::VersionId;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

/// Top-level container of versioned files
pub struct Repository {
    /// Configuration
    config: RepositoryConfig,
    /// Source of every timestamp
    clock: Arc<dyn Clock>,
    /// File name -> file engine
    files: AssocIndex<String, VersionedFile>,
    /// Ranking by last modification time
    by_recency: PrioritySelector<String>,
    /// Ranking by number of versions
    by_size: PrioritySelector<String>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("files", &format!("<{} files>", self.files.len()))
            .finish()
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    /// Create an empty repository with default configuration
    pub fn new() -> Self {
        Self::with_parts(RepositoryConfig::default(), Arc::new(SystemClock))
    }

    /// Create an empty repository with the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`ChronoFsError::InvalidConfiguration`] if validation fails.
    pub fn with_config(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_parts(config, Arc::new(SystemClock)))
    }

    fn with_parts(config: RepositoryConfig, clock: Arc<dyn Clock>) -> Self {
        info!("Initializing repository (capacity {})", config.file_capacity);
        Self {
            files: AssocIndex::with_capacity(config.file_capacity),
            by_recency: PrioritySelector::new(),
            by_size: PrioritySelector::new(),
            config,
            clock,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Start tracking a new file
    ///
    /// The file starts with a single root snapshot carrying the configured
    /// root message.
    ///
    /// # Errors
    ///
    /// [`ChronoFsError::AlreadyExists`] if the name is taken.
    #[instrument(skip(self))]
    pub fn create(&mut self, name: &str) -> Result<()> {
        if self.files.contains_key(&name.to_string()) {
            return Err(ChronoFsError::AlreadyExists(name.to_string()));
        }

        let file = VersionedFile::new(
            name,
            &self.config.root_message,
            self.clock.now(),
            self.config.version_capacity,
        );
        self.files.put(name.to_string(), file);
        info!("Created file '{}'", name);

        self.rebuild_analytics();
        Ok(())
    }

    /// Content of the file's checked-out version
    pub fn read(&self, name: &str) -> Result<&str> {
        Ok(self.file(name)?.read())
    }

    /// Append text to a file, branching if its active version is a snapshot
    #[instrument(skip(self, text))]
    pub fn insert(&mut self, name: &str, text: &str) -> Result<EditOutcome> {
        let now = self.clock.now();
        let outcome = self.file_mut(name)?.insert(text, now)?;
        self.rebuild_analytics();
        Ok(outcome)
    }

    /// Replace a file's content, branching if its active version is a snapshot
    #[instrument(skip(self, text))]
    pub fn update(&mut self, name: &str, text: &str) -> Result<EditOutcome> {
        let now = self.clock.now();
        let outcome = self.file_mut(name)?.update(text, now)?;
        self.rebuild_analytics();
        Ok(outcome)
    }

    /// Freeze a file's active version
    ///
    /// # Errors
    ///
    /// - [`ChronoFsError::FileNotFound`] for an unknown name
    /// - [`ChronoFsError::AlreadySnapshotted`] if the active version is frozen
    #[instrument(skip(self))]
    pub fn snapshot(&mut self, name: &str, message: &str) -> Result<VersionId> {
        let now = self.clock.now();
        let id = self.file_mut(name)?.snapshot(message, now)?;
        self.rebuild_analytics();
        Ok(id)
    }

    /// Move a file's active pointer to its parent (`None`) or to any version
    #[instrument(skip(self))]
    pub fn rollback(&mut self, name: &str, target: Option<VersionId>) -> Result<VersionId> {
        self.file_mut(name)?.rollback(target)
    }

    /// Snapshots from root to the active version of a file, oldest first
    pub fn history(&self, name: &str) -> Result<Vec<HistoryEntry>> {
        Ok(self.file(name)?.history())
    }

    /// Files ordered by last modification, most recent first
    ///
    /// Scores are microseconds since the Unix epoch. `None` returns all files.
    pub fn rank_by_recency(&self, limit: Option<usize>) -> Vec<RankedFile> {
        Self::drain(&self.by_recency, limit)
    }

    /// Files ordered by number of versions, largest first
    ///
    /// `None` returns all files.
    pub fn rank_by_size(&self, limit: Option<usize>) -> Vec<RankedFile> {
        Self::drain(&self.by_size, limit)
    }

    fn drain(selector: &PrioritySelector<String>, limit: Option<usize>) -> Vec<RankedFile> {
        selector
            .top(limit)
            .into_iter()
            .map(|scored| RankedFile {
                name: scored.item,
                score: scored.score,
            })
            .collect()
    }

    /// Discard and rebuild both rankings from the live files
    ///
    /// Files are fed in name order so equal scores always rank the same way.
    fn rebuild_analytics(&mut self) {
        let mut files: Vec<&VersionedFile> = self.files.values().collect();
        files.sort_by(|a, b| a.name().cmp(b.name()));

        let mut by_recency = PrioritySelector::with_capacity(files.len());
        let mut by_size = PrioritySelector::with_capacity(files.len());
        for file in files {
            by_recency.insert(file.name().to_string(), recency_score(file.last_modified_at()));
            by_size.insert(file.name().to_string(), file.version_count() as i64);
        }

        self.by_recency = by_recency;
        self.by_size = by_size;
        debug!("Rebuilt analytics for {} files", self.files.len());
    }

    /// Look up a tracked file
    ///
    /// # Errors
    ///
    /// [`ChronoFsError::FileNotFound`] for an unknown name.
    pub fn file(&self, name: &str) -> Result<&VersionedFile> {
        self.files
            .get(&name.to_string())
            .map_err(|_| ChronoFsError::FileNotFound(name.to_string()))
    }

    fn file_mut(&mut self, name: &str) -> Result<&mut VersionedFile> {
        trace!("Resolving file '{}'", name);
        self.files
            .get_mut(&name.to_string())
            .map_err(|_| ChronoFsError::FileNotFound(name.to_string()))
    }

    /// Tree rendering of a file with its active version marked
    pub fn tree(&self, name: &str) -> Result<TreeView> {
        Ok(self.file(name)?.tree_view())
    }

    /// Tree statistics of a file
    pub fn stats(&self, name: &str) -> Result<TreeStats> {
        Ok(self.file(name)?.stats())
    }

    /// Whether a file with this name is tracked
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(&name.to_string())
    }

    /// Number of tracked files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are tracked
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Names of all tracked files, sorted
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort();
        names
    }

    /// Summaries of all tracked files, sorted by name
    pub fn summaries(&self) -> Vec<FileSummary> {
        let mut summaries: Vec<FileSummary> = self.files.values().map(|f| f.summary()).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}

/// Score used by the recency ranking
pub fn recency_score(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

/// Builder for creating [`Repository`] instances with custom configuration
///
/// # Examples
///
/// ```rust
/// use chronofs::RepositoryBuilder;
/// use chronofs::clock::ManualClock;
///
/// let repo = RepositoryBuilder::new()
///     .root_message("Empty")
///     .file_capacity(8)
///     .clock(ManualClock::starting_at_epoch())
///     .build()?;
/// assert!(repo.is_empty());
/// # Ok::<(), chronofs::ChronoFsError>(())
/// ```
#[derive(Debug)]
pub struct RepositoryBuilder {
    config: RepositoryConfig,
    clock: Arc<dyn Clock>,
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: RepositoryConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Message attached to the root version of new files
    pub fn root_message(mut self, message: impl Into<String>) -> Self {
        self.config.root_message = message.into();
        self
    }

    /// Initial capacity of the file index
    pub fn file_capacity(mut self, capacity: usize) -> Self {
        self.config.file_capacity = capacity;
        self
    }

    /// Initial capacity of each file's version index
    pub fn version_capacity(mut self, capacity: usize) -> Self {
        self.config.version_capacity = capacity;
        self
    }

    /// strftime pattern used by renderers
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.config.time_format = format.into();
        self
    }

    /// Time source for creation, snapshot and modification stamps
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Build the repository
    ///
    /// # Errors
    ///
    /// Returns [`ChronoFsError::InvalidConfiguration`] if validation fails.
    pub fn build(self) -> Result<Repository> {
        self.config.validate()?;
        Ok(Repository::with_parts(self.config, self.clock))
    }
}
