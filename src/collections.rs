//! Associative index used for every keyed lookup in the engine
//!
//! Two lookups run through this module: version id to arena slot inside a
//! file, and file name to file engine inside the repository. The backing map
//! switches between gxhash and std collections based on the `gxhash` feature,
//! which allows building on systems without AES-NI/SSE2 intrinsics while
//! using the faster hasher where it is available.

use crate::error::{ChronoFsError, Result};
use std::fmt::{Debug, Display};
use std::hash::Hash;

#[cfg(feature = "gxhash")]
use gxhash::{HashMap as GxHashMap, HashMapExt};

#[cfg(not(feature = "gxhash"))]
use std::collections::HashMap as StdHashMap;

/// Type alias for HashMap that uses gxhash when available, std otherwise
#[cfg(feature = "gxhash")]
pub type HashMap<K, V> = GxHashMap<K, V>;

/// Type alias for HashMap that uses gxhash when available, std otherwise
#[cfg(not(feature = "gxhash"))]
pub type HashMap<K, V> = StdHashMap<K, V>;

/// Key-to-value lookup with O(1) average access
///
/// Keys compare by value. Iteration order is unspecified and may change
/// across mutations; callers that need a stable order sort the output.
#[derive(Clone)]
pub struct AssocIndex<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> AssocIndex<K, V>
where
    K: Eq + Hash + Display,
{
    /// Create an index sized for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a value, overwriting any previous value for the key
    pub fn put(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Look up a value, reporting [`ChronoFsError::NotFound`] on a miss
    pub fn get(&self, key: &K) -> Result<&V> {
        self.entries
            .get(key)
            .ok_or_else(|| ChronoFsError::NotFound(key.to_string()))
    }

    /// Mutable lookup, reporting [`ChronoFsError::NotFound`] on a miss
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| ChronoFsError::NotFound(key.to_string()))
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// All stored values, in no particular order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// All stored keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Debug for AssocIndex<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
