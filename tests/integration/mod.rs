//! Integration tests for chronofs
//!
//! Multi-file scenarios: branching histories, rollback across branches and
//! the analytics rankings that follow every mutation.

use ::chronofs::clock::ManualClock;
use ::chronofs::*;
use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Test harness driving a repository with a controllable clock
pub struct RepoTestHarness {
    pub repo: Repository,
    pub clock: ManualClock,
    pub operation_log: Vec<TestOperation>,
}

#[derive(Debug, Clone)]
pub enum TestOperation {
    Create { name: String },
    Insert { name: String, text: String },
    Update { name: String, text: String },
    Snapshot { name: String, message: String },
    Rollback { name: String, target: Option<VersionId> },
}

impl RepoTestHarness {
    /// Create a new harness with the clock at the Unix epoch
    pub fn new() -> Self {
        let clock = ManualClock::starting_at_epoch();
        let repo = RepositoryBuilder::new()
            .clock(clock.clone())
            .build()
            .unwrap();

        Self {
            repo,
            clock,
            operation_log: Vec::new(),
        }
    }

    /// Advance the clock one second and apply an operation
    pub fn apply(&mut self, op: TestOperation) -> Result<()> {
        self.clock.advance(Duration::seconds(1));
        let result = match &op {
            TestOperation::Create { name } => self.repo.create(name),
            TestOperation::Insert { name, text } => self.repo.insert(name, text).map(|_| ()),
            TestOperation::Update { name, text } => self.repo.update(name, text).map(|_| ()),
            TestOperation::Snapshot { name, message } => {
                self.repo.snapshot(name, message).map(|_| ())
            }
            TestOperation::Rollback { name, target } => {
                self.repo.rollback(name, *target).map(|_| ())
            }
        };
        self.operation_log.push(op);
        result
    }

    pub fn create(&mut self, name: &str) {
        self.apply(TestOperation::Create { name: name.to_string() }).unwrap();
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.apply(TestOperation::Insert {
            name: name.to_string(),
            text: text.to_string(),
        })
        .unwrap();
    }

    pub fn update(&mut self, name: &str, text: &str) {
        self.apply(TestOperation::Update {
            name: name.to_string(),
            text: text.to_string(),
        })
        .unwrap();
    }

    pub fn snapshot(&mut self, name: &str, message: &str) {
        self.apply(TestOperation::Snapshot {
            name: name.to_string(),
            message: message.to_string(),
        })
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_branch_rollback_walkthrough() {
        let mut harness = RepoTestHarness::new();
        harness.create("a");

        harness.insert("a", "hi");
        assert_eq!(harness.repo.file("a").unwrap().version_count(), 2);
        assert_eq!(harness.repo.read("a").unwrap(), "hi");

        harness.snapshot("a", "v1");
        harness.insert("a", " there");
        assert_eq!(harness.repo.file("a").unwrap().version_count(), 3);
        assert_eq!(harness.repo.read("a").unwrap(), "hi there");

        harness.repo.rollback("a", Some(1)).unwrap();
        assert_eq!(harness.repo.read("a").unwrap(), "hi");

        harness.repo.rollback("a", None).unwrap();
        assert_eq!(harness.repo.file("a").unwrap().active_id(), 0);
        assert_eq!(harness.operation_log.len(), 4);
    }

    #[test]
    fn test_branching_from_one_snapshot_twice() {
        let mut harness = RepoTestHarness::new();
        harness.create("doc");
        harness.update("doc", "base");
        harness.snapshot("doc", "base");

        harness.insert("doc", " + left"); // 2
        harness.snapshot("doc", "left");
        harness.repo.rollback("doc", Some(1)).unwrap();
        harness.insert("doc", " + right"); // 3
        harness.snapshot("doc", "right");

        let file = harness.repo.file("doc").unwrap();
        assert_eq!(file.version(1).unwrap().children(), &[2, 3]);
        assert_eq!(file.version(2).unwrap().content(), "base + left");
        assert_eq!(file.version(3).unwrap().content(), "base + right");

        let stats = harness.repo.stats("doc").unwrap();
        assert_eq!(stats.total_versions, 4);
        assert_eq!(stats.branch_points, 1);
        assert_eq!(stats.snapshots, 4);

        let history: Vec<_> = harness
            .repo
            .history("doc")
            .unwrap()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(history, vec!["Initial version", "base", "right"]);
    }

    #[test]
    fn test_history_timestamps_follow_clock() {
        let mut harness = RepoTestHarness::new();
        harness.create("a"); // t = 1s
        harness.insert("a", "x"); // t = 2s
        harness.snapshot("a", "x"); // t = 3s

        let history = harness.repo.history("a").unwrap();
        assert_eq!(history[0].snapshot_at.timestamp(), 1);
        assert_eq!(history[1].snapshot_at.timestamp(), 3);
        assert_eq!(
            harness.repo.file("a").unwrap().version(1).unwrap().created_at().timestamp(),
            2
        );
    }

    #[test]
    fn test_recency_and_size_rankings() {
        let mut harness = RepoTestHarness::new();
        for name in ["alpha", "beta", "gamma"] {
            harness.create(name);
        }

        // beta grows the largest tree, alpha is touched last
        for i in 0..3 {
            harness.insert("beta", &format!("{}", i));
            harness.snapshot("beta", &format!("b{}", i));
        }
        harness.insert("gamma", "g");
        harness.insert("alpha", "a");

        let recent: Vec<_> = harness
            .repo
            .rank_by_recency(Some(2))
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(recent, vec!["alpha", "gamma"]);

        let biggest = harness.repo.rank_by_size(None);
        assert_eq!(biggest.len(), 3);
        assert_eq!(biggest[0].name, "beta");
        assert_eq!(biggest[0].score, 4);
        assert!(biggest.windows(2).all(|w| w[0].score >= w[1].score));

        // Limit larger than the file count returns each file once
        let all = harness.repo.rank_by_recency(Some(100));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_random_navigation_matches_model() {
        let mut harness = RepoTestHarness::new();
        harness.create("f");
        let mut rng = StdRng::seed_from_u64(42);

        // Model: id -> content, recorded whenever the active version changes
        let mut contents: BTreeMap<VersionId, String> = BTreeMap::new();
        contents.insert(0, String::new());

        for step in 0..200 {
            match rng.random_range(0..4) {
                0 => harness.insert("f", &format!("<{}>", step)),
                1 => harness.update("f", &format!("u{}", step)),
                2 => {
                    let _ = harness.apply(TestOperation::Snapshot {
                        name: "f".to_string(),
                        message: format!("s{}", step),
                    });
                }
                _ => {
                    let count = harness.repo.file("f").unwrap().version_count() as VersionId;
                    let target = rng.random_range(0..count);
                    let _ = harness.apply(TestOperation::Rollback {
                        name: "f".to_string(),
                        target: Some(target),
                    });
                }
            }

            let file = harness.repo.file("f").unwrap();
            let active = file.active_id();
            contents.insert(active, file.read().to_string());

            // Snapshotted versions keep whatever the model last saw for them
            for (id, content) in &contents {
                let node = file.version(*id).unwrap();
                if node.is_snapshot() {
                    assert_eq!(node.content(), content);
                }
            }
        }

        let file = harness.repo.file("f").unwrap();
        assert_eq!(file.tree().iter().count(), file.version_count());
        for node in file.tree().iter().skip(1) {
            let parent = file.version(node.parent().unwrap()).unwrap();
            assert!(parent.is_snapshot(), "version {} branched from a working version", node.id());
        }
    }
}
