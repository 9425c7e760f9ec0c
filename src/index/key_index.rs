//! KeyIndex implementation
//!
//! HashMap-based key → offset index.

use std::collections::{HashMap, HashSet};

use crate::Offset;

/// Key → offset index for one record log
#[derive(Debug, Default, Clone)]
pub struct KeyIndex {
    entries: HashMap<String, Offset>,
}

impl KeyIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a key has been inserted
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the offset recorded for a key
    pub fn get(&self, key: &str) -> Option<Offset> {
        self.entries.get(key).copied()
    }

    /// Insert a key if absent
    ///
    /// Returns `false` and leaves the index untouched when the key is already present.
    pub fn insert(&mut self, key: &str, offset: Offset) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_owned(), offset);
        true
    }

    /// Snapshot of all keys
    pub fn keys(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Snapshot of all offsets, ascending (which is insertion order)
    pub fn offsets(&self) -> Vec<Offset> {
        let mut offsets: Vec<Offset> = self.entries.values().copied().collect();
        offsets.sort_unstable();
        offsets
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
