//! # chronofs - A time-travelling file system in memory
//!
//! Every tracked file owns a tree of versions. Editing a frozen version
//! branches a new one; editing a working version changes it in place; any
//! version can be checked out again by id.
//!
//! ## Overview
//!
//! chronofs provides:
//! - Per-file version trees with append-only history
//! - Snapshots that freeze a version's content for good
//! - Copy-on-write branching when a snapshot is edited
//! - Rollback to the parent version or to any version by id
//! - Repository-wide rankings by recency and by history size
//!
//! ## Quick Start
//!
//! ```rust
//! use chronofs::Repository;
//!
//! # fn main() -> chronofs::Result<()> {
//! let mut repo = Repository::new();
//! repo.create("notes")?;
//!
//! // The root is a snapshot, so the first edit branches version 1
//! repo.insert("notes", "hello")?;
//! repo.snapshot("notes", "first draft")?;
//!
//! // Version 1 is frozen now; this edit branches version 2
//! repo.update("notes", "goodbye")?;
//! assert_eq!(repo.read("notes")?, "goodbye");
//!
//! repo.rollback("notes", Some(1))?;
//! assert_eq!(repo.read("notes")?, "hello");
//!
//! for entry in repo.history("notes")? {
//!     println!("{} {}", entry.id, entry.message);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Versions
//!
//! A version holds the full text of a file at one point. Versions are either
//! *working* (mutable) or *snapshots* (immutable, stamped and annotated). The
//! root version of every file is created as a snapshot.
//!
//! ### Rollback
//!
//! Rollback moves the checked-out pointer. Without an id it steps to the
//! parent; with an id it jumps anywhere in the tree, including sibling
//! branches and descendants. It never changes content or modification time.
//!
//! ### Rankings
//!
//! The repository keeps two priority selectors, rebuilt after every mutation,
//! that answer "most recently modified" and "most versions" queries without
//! re-sorting.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, ChronoFsError>`. Every engine error is
//! local and leaves state untouched.
//!
//! ## Module Organization
//!
//! - [`repository`]: Multi-file coordinator and builder
//! - [`file`]: Per-file version engine
//! - [`tree`]: Version arena, navigation and rendering
//! - [`version`]: Version node definitions
//! - [`ranking`]: Top-K priority selector
//! - [`shell`]: Command parsing and rendering
//! - [`clock`]: Time sources
//! - [`types`]: Results, summaries and configuration
//! - [`error`]: Error types and handling

// Public API modules
pub mod clock;
pub mod error;
pub mod file;
pub mod ranking;
pub mod repository;
pub mod shell;
pub mod tree;
pub mod types;
pub mod version;

// Internal modules (not part of public API)
mod collections;

// Re-export main types for convenience
pub use error::{ChronoFsError, Result};
pub use file::VersionedFile;
pub use repository::{Repository, RepositoryBuilder};
pub use shell::{Command, Response, RollbackTarget, Shell};
pub use tree::{TreeLine, TreeStats, TreeView, VersionTree};
pub use types::*;
pub use version::{VersionId, VersionNode, ROOT_VERSION};
