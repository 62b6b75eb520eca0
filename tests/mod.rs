//! Main test module for chronofs
//!
//! This module includes all test suites:
//! - Integration tests for multi-file scenarios
//! - Property-based tests for engine invariants

pub mod integration;
pub mod property;

#[cfg(test)]
mod edge_cases {
    use ::chronofs::*;

    #[test]
    fn test_empty_and_whitespace_content() {
        let mut repo = Repository::new();
        repo.create("blank").unwrap();

        repo.update("blank", "").unwrap();
        assert_eq!(repo.read("blank").unwrap(), "");
        assert_eq!(repo.file("blank").unwrap().version_count(), 2);

        repo.insert("blank", "   ").unwrap();
        assert_eq!(repo.read("blank").unwrap(), "   ");
    }

    #[test]
    fn test_unicode_names_and_content() {
        let mut repo = Repository::new();
        let names = ["файл", "文件", "ファイル", "🚀🌟💾"];

        for name in &names {
            repo.create(name).unwrap();
            repo.insert(name, "αβγ ").unwrap();
            repo.insert(name, "δ").unwrap();
        }

        for name in &names {
            assert_eq!(repo.read(name).unwrap(), "αβγ δ");
        }
        assert_eq!(repo.len(), names.len());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut repo = Repository::new();
        repo.create("Notes").unwrap();
        repo.create("notes").unwrap();

        repo.insert("Notes", "upper").unwrap();
        assert_eq!(repo.read("notes").unwrap(), "");
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_rollback_by_id_to_working_version_elsewhere() {
        let mut repo = Repository::new();
        repo.create("a").unwrap();
        repo.insert("a", "draft").unwrap(); // 1, never snapshotted
        repo.rollback("a", Some(0)).unwrap();
        repo.insert("a", "other").unwrap(); // 2, sibling of 1

        repo.rollback("a", Some(1)).unwrap();
        assert_eq!(repo.read("a").unwrap(), "draft");
        assert!(!repo.file("a").unwrap().is_active_snapshot());

        // History only shows the root: 1 is a working version
        let ids: Vec<_> = repo.history("a").unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn test_ranking_on_empty_repository() {
        let repo = Repository::new();
        assert!(repo.rank_by_recency(None).is_empty());
        assert!(repo.rank_by_size(Some(5)).is_empty());
    }
}
