//! Key Index Module
//!
//! Two structures over the same key space:
//! - OrderedIndex: B+Tree-like, O(log n) lookups, ordered range scans
//! - HashIndex: O(1) equality lookups, range queries scan everything
//!
//! Both implement `KeyIndex`, which is what the benchmark harness drives.

mod hash_index;
mod ordered_index;

pub use hash_index::HashIndex;
pub use ordered_index::OrderedIndex;

use std::hash::Hash;

use crate::error::Result;
use crate::types::IndexKind;

/// Common surface of both index structures.
pub trait KeyIndex<K, V> {
    /// Insert or overwrite the value for `key`
    fn insert(&mut self, key: K, value: V);

    /// Exact match lookup
    fn search(&self, key: &K) -> Option<&V>;

    /// Inclusive range, ascending by key; empty when `start > end`
    fn range_search(&self, start: &K, end: &K) -> Vec<(K, V)>;

    /// Drop every entry
    fn clear(&mut self);

    /// Which structure this is
    fn kind(&self) -> IndexKind;

    /// Number of distinct keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Create an index based on kind. `order` only applies to the ordered index.
pub fn create_index<K, V>(kind: IndexKind, order: usize) -> Result<Box<dyn KeyIndex<K, V>>>
where
    K: Hash + Ord + Clone + 'static,
    V: Clone + 'static,
{
    Ok(match kind {
        IndexKind::Ordered => Box::new(OrderedIndex::new(order)?),
        IndexKind::Hash => Box::new(HashIndex::new()),
    })
}
