//! Record store contract and the catalog that keeps the engine in step.
//!
//! The store owns the truth; the engine is a derived view. On startup the
//! engine is bulk-loaded from a snapshot, adds and updates are mirrored as
//! upserts, and a delete triggers a full rebuild from a fresh snapshot
//! because the ordered index has no per-key removal.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::engine::DualIndexEngine;
use crate::error::Result;
use crate::types::{
    BenchmarkReport, IndexKind, Key, PointOutcome, RangeOutcome, StatsSnapshot, Value, WorkloadKind,
};

/// Source of truth for `(id, title)` records.
///
/// Implementations:
/// - `MemoryStore`: in-process `BTreeMap`
pub trait RecordStore {
    fn get(&self, id: Key) -> Option<Value>;

    /// Returns false when the id already exists.
    fn insert(&mut self, id: Key, title: Value) -> bool;

    /// Returns false when nothing was modified (unknown id or same title).
    fn update(&mut self, id: Key, title: Value) -> bool;

    /// Returns false when the id is unknown.
    fn delete(&mut self, id: Key) -> bool;

    /// Every record, in any order.
    fn snapshot(&self) -> Vec<(Key, Value)>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<Key, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(Key, Value)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: Key) -> Option<Value> {
        self.records.get(&id).cloned()
    }

    fn insert(&mut self, id: Key, title: Value) -> bool {
        if self.records.contains_key(&id) {
            return false;
        }
        self.records.insert(id, title);
        true
    }

    fn update(&mut self, id: Key, title: Value) -> bool {
        match self.records.get_mut(&id) {
            Some(current) if *current != title => {
                *current = title;
                true
            }
            _ => false,
        }
    }

    fn delete(&mut self, id: Key) -> bool {
        self.records.remove(&id).is_some()
    }

    fn snapshot(&self) -> Vec<(Key, Value)> {
        self.records.iter().map(|(k, v)| (*k, v.clone())).collect()
    }
}

// ============ CATALOG ============

/// A record store with a dual-index engine kept in sync over it.
pub struct Catalog<S: RecordStore> {
    store: S,
    engine: DualIndexEngine,
}

impl<S: RecordStore> Catalog<S> {
    /// Build the engine and bulk-load it from the store.
    pub fn open(store: S, config: EngineConfig) -> Result<Self> {
        let mut engine = DualIndexEngine::new(config)?;
        let records = store.snapshot();
        info!("loading {} records into indexes", records.len());
        engine.load(records);
        Ok(Self { store, engine })
    }

    /// Add a new record. Rejected when the id exists.
    pub fn add(&mut self, id: Key, title: &str) -> bool {
        if !self.store.insert(id, title.to_string()) {
            debug!("add rejected: id {id} exists");
            return false;
        }
        self.engine.insert(id, title.to_string());
        true
    }

    /// Change a title. Indexes are touched only if the store changed.
    pub fn update(&mut self, id: Key, title: &str) -> bool {
        if !self.store.update(id, title.to_string()) {
            return false;
        }
        self.engine.insert(id, title.to_string());
        true
    }

    /// Remove a record and rebuild both indexes from a fresh snapshot.
    pub fn delete(&mut self, id: Key) -> bool {
        if !self.store.delete(id) {
            return false;
        }
        self.engine.rebuild_from(self.store.snapshot());
        true
    }

    pub fn find(&mut self, id: Key) -> PointOutcome {
        self.engine.search(id)
    }

    pub fn range(&mut self, start: Key, end: Key) -> RangeOutcome {
        self.engine.range_search(start, end)
    }

    pub fn benchmark(&mut self, query_count: usize, workload: WorkloadKind) -> Result<BenchmarkReport> {
        self.engine.run_benchmark(query_count, workload)
    }

    pub fn preference(&self) -> IndexKind {
        self.engine.current_preference()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.engine.stats()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &DualIndexEngine {
        &self.engine
    }
}
