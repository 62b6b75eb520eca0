//! Property-based testing for chronofs
//!
//! Uses proptest to verify engine invariants across randomly generated
//! operation sequences.

use ::chronofs::*;
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

/// A single engine operation against one file
#[derive(Debug, Clone)]
pub enum FileOperation {
    Insert(String),
    Update(String),
    Snapshot(String),
    RollbackParent,
    RollbackTo(VersionId),
}

/// Generate a random file operation
fn file_operation_strategy() -> impl Strategy<Value = FileOperation> {
    prop_oneof![
        3 => content_strategy().prop_map(FileOperation::Insert),
        2 => content_strategy().prop_map(FileOperation::Update),
        2 => "[a-z ]{0,12}".prop_map(FileOperation::Snapshot),
        1 => Just(FileOperation::RollbackParent),
        // Ids past the issued range exercise the not-found path
        1 => (0u64..40).prop_map(FileOperation::RollbackTo),
    ]
}

/// Generate random text content
fn content_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        "\\PC{0,8}",
    ]
}

fn at(step: usize) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(step as i64 + 1)
}

/// Apply an operation, returning whatever the engine returned
fn apply(file: &mut VersionedFile, op: &FileOperation, now: DateTime<Utc>) -> Result<()> {
    match op {
        FileOperation::Insert(text) => file.insert(text, now).map(|_| ()),
        FileOperation::Update(text) => file.update(text, now).map(|_| ()),
        FileOperation::Snapshot(message) => file.snapshot(message, now).map(|_| ()),
        FileOperation::RollbackParent => file.rollback(None).map(|_| ()),
        FileOperation::RollbackTo(id) => file.rollback(Some(*id)).map(|_| ()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Edits branch off snapshots and mutate working versions in place
    #[test]
    fn prop_branch_or_mutate(ops in prop::collection::vec(file_operation_strategy(), 1..60)) {
        let mut file = VersionedFile::new("f", DEFAULT_ROOT_MESSAGE, at(0), 16);

        for (step, op) in ops.iter().enumerate() {
            let before_count = file.version_count();
            let before_active = file.active_id();
            let was_snapshot = file.is_active_snapshot();
            let before_content = file.read().to_string();

            let result = apply(&mut file, op, at(step + 1));

            match op {
                FileOperation::Insert(text) | FileOperation::Update(text) => {
                    prop_assert!(result.is_ok());
                    if was_snapshot {
                        prop_assert_eq!(file.version_count(), before_count + 1);
                        prop_assert_eq!(file.active_id(), before_count as VersionId);
                        prop_assert_eq!(file.active_version().parent(), Some(before_active));
                    } else {
                        prop_assert_eq!(file.version_count(), before_count);
                        prop_assert_eq!(file.active_id(), before_active);
                    }

                    let expected = match op {
                        FileOperation::Insert(_) => format!("{}{}", before_content, text),
                        _ => text.clone(),
                    };
                    prop_assert_eq!(file.read(), expected.as_str());
                    prop_assert_eq!(file.last_modified_at(), at(step + 1));
                }
                FileOperation::Snapshot(message) => {
                    if was_snapshot {
                        prop_assert!(matches!(result, Err(ChronoFsError::AlreadySnapshotted)));
                    } else {
                        prop_assert!(result.is_ok());
                        prop_assert!(file.is_active_snapshot());
                        prop_assert_eq!(file.active_version().message(), message.as_str());
                    }
                    prop_assert_eq!(file.version_count(), before_count);
                }
                FileOperation::RollbackParent | FileOperation::RollbackTo(_) => {
                    // Rollback never creates versions or changes content
                    prop_assert_eq!(file.version_count(), before_count);
                    if result.is_err() {
                        prop_assert_eq!(file.active_id(), before_active);
                    }
                }
            }
        }
    }

    /// Rollback by id reaches every issued id and rejects the rest
    #[test]
    fn prop_rollback_reachability(
        ops in prop::collection::vec(file_operation_strategy(), 1..40),
        probe in 0u64..80,
    ) {
        let mut file = VersionedFile::new("f", DEFAULT_ROOT_MESSAGE, at(0), 16);
        for (step, op) in ops.iter().enumerate() {
            let _ = apply(&mut file, op, at(step + 1));
        }

        let issued = file.version_count() as VersionId;
        let active = file.active_id();
        let result = file.rollback(Some(probe));

        if probe == active {
            prop_assert!(matches!(result, Err(ChronoFsError::AlreadyActive(id)) if id == probe));
        } else if probe < issued {
            prop_assert_eq!(result.unwrap(), probe);
            prop_assert_eq!(file.active_id(), probe);
        } else {
            prop_assert!(matches!(result, Err(ChronoFsError::VersionNotFound(id)) if id == probe));
            prop_assert_eq!(file.active_id(), active);
        }
    }

    /// History lists only snapshots on the active path, root first
    #[test]
    fn prop_history_ordering(ops in prop::collection::vec(file_operation_strategy(), 1..60)) {
        let mut file = VersionedFile::new("f", DEFAULT_ROOT_MESSAGE, at(0), 16);
        for (step, op) in ops.iter().enumerate() {
            let _ = apply(&mut file, op, at(step + 1));
        }

        let history = file.history();
        prop_assert!(!history.is_empty());
        prop_assert_eq!(history[0].id, ROOT_VERSION);

        let mut path: Vec<VersionId> = file.tree().path_to_root(file.active_id())
            .map(|node| node.id())
            .collect();
        path.reverse();
        let mut cursor = 0;
        for entry in &history {
            let node = file.version(entry.id).unwrap();
            prop_assert!(node.is_snapshot());
            prop_assert_eq!(node.snapshot_at(), Some(entry.snapshot_at));

            // Entries appear in root-to-active path order
            let position = path[cursor..].iter().position(|id| *id == entry.id);
            prop_assert!(position.is_some());
            cursor += position.unwrap() + 1;
        }
        prop_assert!(history.windows(2).all(|w| w[0].id < w[1].id));
    }

    /// Rankings are ordered by score and honour the requested limit
    #[test]
    fn prop_ranking_order_and_limit(
        edits in prop::collection::vec((0usize..6, any::<bool>()), 1..50),
        limit in 0usize..10,
    ) {
        let mut repo = Repository::new();
        let names: Vec<String> = (0..6).map(|i| format!("file{}", i)).collect();
        for name in &names {
            repo.create(name).unwrap();
        }
        for (index, freeze) in &edits {
            repo.insert(&names[*index], "x").unwrap();
            if *freeze {
                repo.snapshot(&names[*index], "frozen").unwrap();
            }
        }

        for ranking in [repo.rank_by_recency(Some(limit)), repo.rank_by_size(Some(limit))] {
            prop_assert_eq!(ranking.len(), limit.min(names.len()));
            prop_assert!(ranking.windows(2).all(|w| w[0].score >= w[1].score));
        }

        let by_size = repo.rank_by_size(None);
        prop_assert_eq!(by_size.len(), names.len());
        for ranked in &by_size {
            let count = repo.file(&ranked.name).unwrap().version_count() as i64;
            prop_assert_eq!(ranked.score, count);
        }
    }
}
