//! Hash Index for O(1) Equality Lookups
//!
//! Flat key → value map over `ahash`. Range queries have no structure to
//! lean on: they scan every entry, filter, then sort the matches.

use ahash::RandomState;
use std::collections::HashMap;
use std::hash::Hash;

use super::KeyIndex;
use crate::types::IndexKind;

/// Exact-match hash index
#[derive(Debug, Clone)]
pub struct HashIndex<K, V> {
    index: HashMap<K, V, RandomState>,
}

impl<K, V> Default for HashIndex<K, V> {
    fn default() -> Self {
        Self { index: HashMap::with_hasher(RandomState::new()) }
    }
}

impl<K: Hash + Ord + Clone, V: Clone> HashIndex<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()) }
    }

    /// Unconditional upsert: any previous value for `key` is replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.index.insert(key, value)
    }

    pub fn search(&self, key: &K) -> Option<&V> {
        self.index.get(key)
    }

    /// Full scan: O(n) filter plus O(m log m) sort of the m matches.
    pub fn range_search(&self, start: &K, end: &K) -> Vec<(K, V)> {
        if start > end {
            return Vec::new();
        }
        let mut results: Vec<(K, V)> = self
            .index
            .iter()
            .filter(|(k, _)| *k >= start && *k <= end)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        results.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        results
    }

    /// Sorted snapshot of every entry.
    pub fn entries(&self) -> Vec<(K, V)> {
        let mut all: Vec<(K, V)> = self.index.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        all.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn clear(&mut self) {
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl<K: Hash + Ord + Clone, V: Clone> KeyIndex<K, V> for HashIndex<K, V> {
    fn insert(&mut self, key: K, value: V) {
        HashIndex::insert(self, key, value);
    }

    fn search(&self, key: &K) -> Option<&V> {
        HashIndex::search(self, key)
    }

    fn range_search(&self, start: &K, end: &K) -> Vec<(K, V)> {
        HashIndex::range_search(self, start, end)
    }

    fn clear(&mut self) {
        HashIndex::clear(self);
    }

    fn kind(&self) -> IndexKind {
        IndexKind::Hash
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
