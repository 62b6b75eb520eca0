//! Version tree storage and navigation
//!
//! This module provides the arena that holds every version of one file and
//! the id index used to reach any of them in O(1).
//!
//! ## Overview
//!
//! Nodes live in a single growable `Vec`; parent and child links are
//! [`VersionId`]s rather than references, so the tree never needs shared
//! mutable aliasing. The tree is append-only: nodes are added as children of
//! existing nodes and are never removed.
//!
//! ## Structure
//!
//! ```text
//! [0] Initial version
//! ├── [1] v1
//! │   [3] (working)
//! └── [2] experiment
//! ```
//!
//! An only child continues in its parent's column; indentation grows only at
//! branch points.
//!
//! ## Examples
//!
//! ```rust
//! use chronofs::tree::VersionTree;
//! use chrono::Utc;
//!
//! let mut tree = VersionTree::new("Initial version", Utc::now(), 16);
//! let child = tree.add_child(0, "hello".to_string(), Utc::now())?;
//!
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree.get(child)?.parent(), Some(0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::collections::AssocIndex;
use crate::error::{ChronoFsError, Result};
use crate::version::{VersionId, VersionNode, ROOT_VERSION};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::trace;

/// Arena of version nodes plus the id index over them
#[derive(Debug, Clone)]
pub struct VersionTree {
    /// Every node ever created, in creation order
    nodes: Vec<VersionNode>,
    /// Version id -> arena slot
    index: AssocIndex<VersionId, usize>,
}

impl VersionTree {
    /// Create a tree holding only the root snapshot
    ///
    /// `capacity` sizes the id index; it grows past that as needed.
    pub fn new(root_message: &str, now: DateTime<Utc>, capacity: usize) -> Self {
        let mut index = AssocIndex::with_capacity(capacity.max(1));
        index.put(ROOT_VERSION, 0);

        Self {
            nodes: vec![VersionNode::root(now, root_message)],
            index,
        }
    }

    /// Number of versions ever created
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root version
    pub fn root(&self) -> &VersionNode {
        &self.nodes[0]
    }

    /// Id the next appended node will receive
    pub fn next_id(&self) -> VersionId {
        self.nodes.len() as VersionId
    }

    /// Whether `id` was ever issued by this tree
    pub fn contains(&self, id: VersionId) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a version by id
    ///
    /// # Errors
    ///
    /// Returns [`ChronoFsError::VersionNotFound`] if the id was never issued.
    pub fn get(&self, id: VersionId) -> Result<&VersionNode> {
        let slot = self.slot(id)?;
        Ok(&self.nodes[slot])
    }

    pub(crate) fn get_mut(&mut self, id: VersionId) -> Result<&mut VersionNode> {
        let slot = self.slot(id)?;
        Ok(&mut self.nodes[slot])
    }

    fn slot(&self, id: VersionId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .map_err(|_| ChronoFsError::VersionNotFound(id))
    }

    /// Append a new working node under `parent`
    ///
    /// The node gets the next sequential id, is pushed onto the parent's
    /// children and registered in the id index.
    pub fn add_child(
        &mut self,
        parent: VersionId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<VersionId> {
        let parent_slot = self.slot(parent)?;
        let id = self.next_id();
        let slot = self.nodes.len();

        self.nodes.push(VersionNode::working(id, content, parent, now));
        self.nodes[parent_slot].children.push(id);
        self.index.put(id, slot);

        trace!("Appended version {} under {}", id, parent);
        Ok(id)
    }

    /// Every node, in creation order
    pub fn iter(&self) -> impl Iterator<Item = &VersionNode> {
        self.nodes.iter()
    }

    /// Walk from `id` up to the root, starting with `id` itself
    pub fn path_to_root(&self, id: VersionId) -> PathToRoot<'_> {
        PathToRoot {
            tree: self,
            next: Some(id),
        }
    }

    /// All ancestors of a version, root first, excluding the version itself
    pub fn ancestors(&self, id: VersionId) -> Vec<&VersionNode> {
        let mut ancestors: Vec<_> = self.path_to_root(id).skip(1).collect();
        ancestors.reverse();
        ancestors
    }

    /// Direct children of a version in branch creation order
    pub fn children(&self, id: VersionId) -> Vec<&VersionNode> {
        self.get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.get(*child).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All descendants of a version, breadth first
    pub fn descendants(&self, id: VersionId) -> Vec<&VersionNode> {
        let mut descendants = Vec::new();
        let mut queue: VecDeque<VersionId> = self
            .get(id)
            .map(|node| node.children.iter().copied().collect())
            .unwrap_or_default();

        while let Some(current) = queue.pop_front() {
            if let Ok(node) = self.get(current) {
                descendants.push(node);
                queue.extend(node.children.iter().copied());
            }
        }

        descendants
    }

    /// Depth of a version, the root being at depth 0
    pub fn depth(&self, id: VersionId) -> usize {
        self.path_to_root(id).count().saturating_sub(1)
    }

    /// Tree statistics
    pub fn stats(&self) -> TreeStats {
        let total_versions = self.nodes.len();
        let snapshots = self.nodes.iter().filter(|n| n.is_snapshot()).count();
        let leaf_versions = self.nodes.iter().filter(|n| n.children.is_empty()).count();
        let branch_points = self.nodes.iter().filter(|n| n.children.len() > 1).count();
        let max_depth = self.calculate_depth(ROOT_VERSION);

        TreeStats {
            total_versions,
            snapshots,
            leaf_versions,
            max_depth,
            branch_points,
        }
    }

    /// Number of levels below and including `id`
    fn calculate_depth(&self, id: VersionId) -> usize {
        // Iterative so deep linear histories cannot blow the stack
        let mut deepest = 0;
        let mut stack = vec![(id, 1usize)];

        while let Some((current, level)) = stack.pop() {
            deepest = deepest.max(level);
            if let Ok(node) = self.get(current) {
                stack.extend(node.children.iter().map(|child| (*child, level + 1)));
            }
        }

        deepest
    }

    /// Flatten the tree into display lines, root first, depth-first
    ///
    /// Walks with an explicit stack so rendering stays bounded on deep
    /// histories. Only branch points add indentation; an only child continues
    /// in its parent's column.
    pub fn to_tree_view(&self, active: VersionId) -> TreeView {
        let mut lines = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Frame {
            id: ROOT_VERSION,
            connector: String::new(),
            body: String::new(),
        }];

        while let Some(frame) = stack.pop() {
            let Ok(node) = self.get(frame.id) else {
                continue;
            };
            lines.push(TreeLine {
                prefix: frame.connector,
                id: node.id,
                message: node.message.clone(),
                snapshot_at: node.snapshot_at,
                content_len: node.content.len(),
                is_active: node.id == active,
            });

            match node.children.as_slice() {
                [] => {}
                [only] => stack.push(Frame {
                    id: *only,
                    connector: frame.body.clone(),
                    body: frame.body,
                }),
                children => {
                    let last = children.len() - 1;
                    // Reversed so the first child is popped first
                    for (i, child) in children.iter().enumerate().rev() {
                        let (connector, extension) =
                            if i == last { ("└── ", "    ") } else { ("├── ", "│   ") };
                        stack.push(Frame {
                            id: *child,
                            connector: format!("{}{}", frame.body, connector),
                            body: format!("{}{}", frame.body, extension),
                        });
                    }
                }
            }
        }

        trace!("Flattened {} versions for display", lines.len());
        TreeView { lines }
    }
}

/// Pending node during tree flattening
struct Frame {
    id: VersionId,
    /// Text before this node's label
    connector: String,
    /// Indentation inherited by this node's children
    body: String,
}

/// Iterator from a version up through its parents to the root
pub struct PathToRoot<'a> {
    tree: &'a VersionTree,
    next: Option<VersionId>,
}

impl<'a> Iterator for PathToRoot<'a> {
    type Item = &'a VersionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.next?).ok()?;
        self.next = node.parent;
        Some(node)
    }
}

/// One rendered row of a [`TreeView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// Box-drawing prefix placing the row in the tree
    pub prefix: String,
    /// Version id
    pub id: VersionId,
    /// Snapshot message, empty for working versions
    pub message: String,
    /// Snapshot time, `None` for working versions
    pub snapshot_at: Option<DateTime<Utc>>,
    /// Content length in bytes
    pub content_len: usize,
    /// Whether this is the checked-out version
    pub is_active: bool,
}

impl TreeLine {
    /// Label for this row, rendering timestamps with `format_time`
    pub fn label<F>(&self, format_time: F) -> String
    where
        F: Fn(DateTime<Utc>) -> String,
    {
        let marker = if self.is_active { "* " } else { "" };
        match self.snapshot_at {
            Some(at) => format!(
                "{}{}[{}] {} - {}",
                self.prefix,
                marker,
                self.id,
                format_time(at),
                self.message
            ),
            None => format!(
                "{}{}[{}] (working, {} bytes)",
                self.prefix, marker, self.id, self.content_len
            ),
        }
    }
}

/// Flattened, display-ready version tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeView {
    /// Rows in depth-first order, root first
    pub lines: Vec<TreeLine>,
}

impl TreeView {
    /// Render every row with RFC 3339 UTC timestamps
    pub fn render(&self) -> String {
        self.render_with(|at| at.to_rfc3339())
    }

    /// Render every row, one per line, formatting timestamps with `format_time`
    pub fn render_with<F>(&self, format_time: F) -> String
    where
        F: Fn(DateTime<Utc>) -> String,
    {
        let mut result = String::new();
        for line in &self.lines {
            result.push_str(&line.label(&format_time));
            result.push('\n');
        }
        result
    }
}

/// Version tree statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Total number of versions
    pub total_versions: usize,
    /// Versions that are snapshots
    pub snapshots: usize,
    /// Versions without children
    pub leaf_versions: usize,
    /// Number of levels from the root to the deepest leaf
    pub max_depth: usize,
    /// Versions with more than one child
    pub branch_points: usize,
}
