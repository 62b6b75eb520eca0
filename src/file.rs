//! Per-file version engine
//!
//! A [`VersionedFile`] owns one [`VersionTree`], tracks which version is
//! checked out, and applies the branch-or-mutate policy to every edit:
//!
//! - if the active version is a working version, the edit overwrites it in
//!   place;
//! - if the active version is a snapshot, the edit creates a new child of it
//!   and checks that child out.
//!
//! Snapshotting freezes the active version. Rollback only moves the active
//! pointer; it never touches content or the modification time.
//!
//! ```rust
//! use chronofs::file::VersionedFile;
//! use chrono::Utc;
//!
//! let mut file = VersionedFile::new("notes", "Initial version", Utc::now(), 16);
//! file.insert("hi", Utc::now())?;          // root is a snapshot: branches
//! assert_eq!(file.version_count(), 2);
//! file.insert(" there", Utc::now())?;      // working version: in place
//! assert_eq!(file.read(), "hi there");
//! assert_eq!(file.version_count(), 2);
//! # Ok::<(), chronofs::ChronoFsError>(())
//! ```

use crate::error::{ChronoFsError, Result};
use crate::tree::{TreeStats, TreeView, VersionTree};
use crate::types::{EditOutcome, FileSummary, HistoryEntry};
use crate::version::{VersionId, VersionNode, ROOT_VERSION};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// How an edit derives the new content from the active content
#[derive(Debug, Clone, Copy)]
enum Edit<'a> {
    /// Active content followed by the text
    Append(&'a str),
    /// The text verbatim
    Replace(&'a str),
}

impl Edit<'_> {
    fn derive(&self, current: &str) -> String {
        match self {
            Edit::Append(text) => {
                let mut content = String::with_capacity(current.len() + text.len());
                content.push_str(current);
                content.push_str(text);
                content
            }
            Edit::Replace(text) => (*text).to_string(),
        }
    }
}

/// One named, independently versioned document
#[derive(Debug, Clone)]
pub struct VersionedFile {
    name: String,
    tree: VersionTree,
    active: VersionId,
    last_modified_at: DateTime<Utc>,
}

impl VersionedFile {
    /// Create a file whose history is a single root snapshot
    ///
    /// `index_capacity` sizes the id index.
    pub fn new(
        name: impl Into<String>,
        root_message: &str,
        now: DateTime<Utc>,
        index_capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            tree: VersionTree::new(root_message, now, index_capacity),
            active: ROOT_VERSION,
            last_modified_at: now,
        }
    }

    /// File name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content of the checked-out version
    pub fn read(&self) -> &str {
        self.active_version().content()
    }

    /// Append text to the active content
    pub fn insert(&mut self, text: &str, now: DateTime<Utc>) -> Result<EditOutcome> {
        self.apply(Edit::Append(text), now)
    }

    /// Replace the active content
    pub fn update(&mut self, text: &str, now: DateTime<Utc>) -> Result<EditOutcome> {
        self.apply(Edit::Replace(text), now)
    }

    fn apply(&mut self, edit: Edit<'_>, now: DateTime<Utc>) -> Result<EditOutcome> {
        let active = self.active_version();
        let content = edit.derive(active.content());

        let outcome = if active.is_snapshot() {
            let parent = self.active;
            let created = self.tree.add_child(parent, content, now)?;
            self.active = created;
            debug!(file = %self.name, parent, created, "Branched new version from snapshot");
            EditOutcome::Branched { parent, created }
        } else {
            self.active_version_mut()?.content = content;
            trace!(file = %self.name, version = self.active, "Edited working version in place");
            EditOutcome::InPlace(self.active)
        };

        self.last_modified_at = now;
        Ok(outcome)
    }

    /// Freeze the active version with a message
    ///
    /// # Errors
    ///
    /// [`ChronoFsError::AlreadySnapshotted`] if the active version is already
    /// frozen; nothing changes in that case.
    pub fn snapshot(&mut self, message: &str, now: DateTime<Utc>) -> Result<VersionId> {
        if self.active_version().is_snapshot() {
            return Err(ChronoFsError::AlreadySnapshotted);
        }

        let node = self.active_version_mut()?;
        node.message = message.to_string();
        node.snapshot_at = Some(now);
        self.last_modified_at = now;

        debug!(file = %self.name, version = self.active, "Snapshot created");
        Ok(self.active)
    }

    /// Move the active pointer
    ///
    /// With `None`, steps to the parent of the active version. With
    /// `Some(id)`, checks out that version wherever it sits in the tree.
    ///
    /// # Errors
    ///
    /// - [`ChronoFsError::NoParent`] stepping up from the root
    /// - [`ChronoFsError::AlreadyActive`] if `id` is already checked out
    /// - [`ChronoFsError::VersionNotFound`] if `id` was never issued
    pub fn rollback(&mut self, target: Option<VersionId>) -> Result<VersionId> {
        let destination = match target {
            None => self.active_version().parent().ok_or(ChronoFsError::NoParent)?,
            Some(id) if id == self.active => return Err(ChronoFsError::AlreadyActive(id)),
            Some(id) => self.tree.get(id)?.id(),
        };

        debug!(file = %self.name, from = self.active, to = destination, "Rolled back");
        self.active = destination;
        Ok(destination)
    }

    /// Snapshots from the root to the active version, oldest first
    ///
    /// Working versions, including a working active version, are skipped.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self
            .tree
            .path_to_root(self.active)
            .filter_map(|node| {
                node.snapshot_at().map(|snapshot_at| HistoryEntry {
                    id: node.id(),
                    snapshot_at,
                    message: node.message().to_string(),
                })
            })
            .collect();
        entries.reverse();
        entries
    }

    /// Number of versions ever created
    pub fn version_count(&self) -> usize {
        self.tree.len()
    }

    /// Time of the last insert, update or snapshot
    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    /// Id of the checked-out version
    pub fn active_id(&self) -> VersionId {
        self.active
    }

    /// The checked-out version
    pub fn active_version(&self) -> &VersionNode {
        match self.tree.get(self.active) {
            Ok(node) => node,
            // active is only ever set to ids issued by this tree
            Err(_) => unreachable!("active version {} missing from {}", self.active, self.name),
        }
    }

    fn active_version_mut(&mut self) -> Result<&mut VersionNode> {
        self.tree.get_mut(self.active)
    }

    /// Whether the checked-out version is frozen
    pub fn is_active_snapshot(&self) -> bool {
        self.active_version().is_snapshot()
    }

    /// Look up any version of this file
    pub fn version(&self, id: VersionId) -> Result<&VersionNode> {
        self.tree.get(id)
    }

    /// The underlying version tree
    pub fn tree(&self) -> &VersionTree {
        &self.tree
    }

    /// Tree statistics for this file
    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    /// Tree rendering with the active version marked
    pub fn tree_view(&self) -> TreeView {
        self.tree.to_tree_view(self.active)
    }

    /// Summary for listings
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            version_count: self.version_count(),
            active_version: self.active,
            active_is_snapshot: self.is_active_snapshot(),
            last_modified_at: self.last_modified_at,
        }
    }
}
