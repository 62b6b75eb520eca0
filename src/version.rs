//! Version node definitions
//!
//! A [`VersionNode`] is one point in a file's history. It holds the full text
//! of the file at that point (never a diff), an optional snapshot stamp, and
//! links to its parent and children expressed as [`VersionId`]s into the
//! owning tree's arena.
//!
//! ## Mutability
//!
//! A node starts out *working*: its content may be overwritten in place. Once
//! [`VersionNode::snapshot_at`] is set the node is a *snapshot* and its content
//! is frozen for good. The only way to keep editing after that is to branch a
//! new child off it, which is what the version tree does.
//!
//! ```rust
//! use chronofs::version::VersionNode;
//! use chrono::Utc;
//!
//! let root = VersionNode::root(Utc::now(), "Initial version");
//! assert_eq!(root.id(), 0);
//! assert!(root.is_snapshot());
//! assert!(root.parent().is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a version within one file
///
/// Ids are handed out sequentially starting at 0 and are never reused.
pub type VersionId = u64;

/// Id of the root version of every file
pub const ROOT_VERSION: VersionId = 0;

/// One version in a file's history tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionNode {
    pub(crate) id: VersionId,
    pub(crate) content: String,
    pub(crate) message: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) snapshot_at: Option<DateTime<Utc>>,
    pub(crate) parent: Option<VersionId>,
    pub(crate) children: Vec<VersionId>,
}

impl VersionNode {
    /// Create the root version: empty content, already a snapshot
    pub fn root(now: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            id: ROOT_VERSION,
            content: String::new(),
            message: message.into(),
            created_at: now,
            snapshot_at: Some(now),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a working (mutable) child of `parent`
    pub(crate) fn working(
        id: VersionId,
        content: String,
        parent: VersionId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content,
            message: String::new(),
            created_at: now,
            snapshot_at: None,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    /// Identifier of this version
    pub fn id(&self) -> VersionId {
        self.id
    }

    /// Full text of the file at this version
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Snapshot annotation; empty until the node is snapshotted
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When this version was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When this version was frozen, if it has been
    pub fn snapshot_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot_at
    }

    /// Parent version, `None` for the root
    pub fn parent(&self) -> Option<VersionId> {
        self.parent
    }

    /// Child versions in branch creation order
    pub fn children(&self) -> &[VersionId] {
        &self.children
    }

    /// Whether this version is an immutable snapshot
    pub fn is_snapshot(&self) -> bool {
        self.snapshot_at.is_some()
    }

    /// Whether this version is the root of its tree
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
