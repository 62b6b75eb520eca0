//! Bounded top-K ranking
//!
//! [`PrioritySelector`] is a max-oriented priority queue over scored items.
//! The repository keeps two of them (by recency, by version count) and
//! answers "top N" queries by draining a throwaway clone, so a query never
//! consumes the live structure.
//!
//! Equal scores come out in insertion order: the item inserted first wins.

use crate::error::{ChronoFsError, Result};
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// An item together with the score it is ranked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scored<T> {
    /// The ranked item
    pub item: T,
    /// Ranking score, higher is better
    pub score: i64,
}

#[derive(Debug, Clone)]
struct HeapEntry<T> {
    score: i64,
    seq: Reverse<u64>,
    item: T,
}

impl<T> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl<T> Eq for HeapEntry<T> {}

impl<T> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for HeapEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Max-priority selector with deterministic tie-breaking
#[derive(Debug, Clone)]
pub struct PrioritySelector<T> {
    heap: BinaryHeap<HeapEntry<T>>,
    inserted: u64,
}

impl<T> Default for PrioritySelector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PrioritySelector<T> {
    /// Create an empty selector
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            inserted: 0,
        }
    }

    /// Create an empty selector with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            inserted: 0,
        }
    }

    /// Add an item with its score
    pub fn insert(&mut self, item: T, score: i64) {
        let seq = Reverse(self.inserted);
        self.inserted += 1;
        self.heap.push(HeapEntry { score, seq, item });
    }

    /// Remove and return the highest-scored item
    ///
    /// # Errors
    ///
    /// Returns [`ChronoFsError::Empty`] when no items remain.
    pub fn extract_max(&mut self) -> Result<Scored<T>> {
        self.heap
            .pop()
            .map(|entry| Scored {
                item: entry.item,
                score: entry.score,
            })
            .ok_or(ChronoFsError::Empty)
    }

    /// Highest score without removing anything
    pub fn peek_score(&self) -> Option<i64> {
        self.heap.peek().map(|entry| entry.score)
    }

    /// Number of items held
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the selector is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T: Clone> PrioritySelector<T> {
    /// Best `limit` items in descending score order, without consuming `self`
    ///
    /// `None` returns every item.
    pub fn top(&self, limit: Option<usize>) -> Vec<Scored<T>> {
        let mut scratch = self.clone();
        let limit = limit.unwrap_or(scratch.len()).min(scratch.len());

        let mut ranked = Vec::with_capacity(limit);
        while ranked.len() < limit {
            match scratch.extract_max() {
                Ok(scored) => ranked.push(scored),
                Err(_) => break,
            }
        }
        ranked
    }
}
