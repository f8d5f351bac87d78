//! Shared engine handle for concurrent hosts.
//!
//! The engine has no internal synchronization: a split rewrites nodes in
//! place and every query updates the statistics. This handle serializes all
//! of that behind one `parking_lot::RwLock`; only pure observers share the
//! read side.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::DualIndexEngine;
use crate::error::Result;
use crate::types::{
    BenchmarkReport, IndexKind, Key, PointOutcome, RangeOutcome, StatsSnapshot, Value, WorkloadKind,
};

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<DualIndexEngine>>,
}

impl SharedEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self::from_engine(DualIndexEngine::new(config)?))
    }

    pub fn from_engine(engine: DualIndexEngine) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    pub fn insert(&self, key: Key, value: Value) {
        self.inner.write().insert(key, value);
    }

    pub fn rebuild_from<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (Key, Value)>,
    {
        self.inner.write().rebuild_from(entries);
    }

    pub fn search(&self, key: Key) -> PointOutcome {
        self.inner.write().search(key)
    }

    pub fn range_search(&self, start: Key, end: Key) -> RangeOutcome {
        self.inner.write().range_search(start, end)
    }

    /// Holds the write lock for the whole run so the key population stays fixed.
    pub fn run_benchmark(&self, query_count: usize, workload: WorkloadKind) -> Result<BenchmarkReport> {
        self.inner.write().run_benchmark(query_count, workload)
    }

    pub fn current_preference(&self) -> IndexKind {
        self.inner.read().current_preference()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` with shared access to the engine.
    pub fn read<R>(&self, f: impl FnOnce(&DualIndexEngine) -> R) -> R {
        f(&self.inner.read())
    }
}
