//! Dual-index engine
//!
//! Keeps an ordered index and a hash index over the same `(key, value)`
//! pairs. Every query executes and is timed on both indexes; the query
//! statistics only pick which of the two results the caller gets.

use log::info;
use std::time::Instant;

use crate::bench::BenchmarkHarness;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::{HashIndex, OrderedIndex};
use crate::stats::QueryStatistics;
use crate::types::{
    BenchmarkReport, IndexKind, Key, PointOutcome, QueryKind, RangeOutcome, StatsSnapshot, Value,
    WorkloadKind,
};

/// Ordered index + hash index over one key space, with adaptive routing.
///
/// Every mutation goes to both indexes. Every query runs on both and is
/// timed on both; the statistics only decide which answer is authoritative.
/// Deletion is not incremental: the owner rebuilds from a full snapshot.
pub struct DualIndexEngine {
    config: EngineConfig,
    ordered: OrderedIndex<Key, Value>,
    hash: HashIndex<Key, Value>,
    stats: QueryStatistics,
    bench: BenchmarkHarness,
}

impl DualIndexEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ordered: OrderedIndex::new(config.order)?,
            hash: HashIndex::new(),
            stats: QueryStatistics::new(),
            bench: BenchmarkHarness::new(config.benchmark.clone()),
            config,
        })
    }

    /// Default configuration with the given tree order.
    pub fn with_order(order: usize) -> Result<Self> {
        Self::new(EngineConfig::with_order(order))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ============ MUTATION ============

    /// Upsert into both indexes.
    pub fn insert(&mut self, key: Key, value: Value) {
        self.ordered.insert(key, value.clone());
        self.hash.insert(key, value);
    }

    /// Bulk insert without discarding existing entries (startup load).
    pub fn load<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Key, Value)>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    /// Discard both indexes and reload from a full snapshot.
    /// Statistics and the current preference survive.
    pub fn rebuild_from<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Key, Value)>,
    {
        self.ordered.clear();
        self.hash.clear();
        self.load(entries);
        info!("rebuilt indexes: {} keys, tree height {}", self.hash.len(), self.ordered.height());
    }

    // ============ QUERIES ============

    /// Point lookup on both indexes; records an equality query.
    pub fn search(&mut self, key: Key) -> PointOutcome {
        let served_by = self.stats.record(QueryKind::Equality);

        let started = Instant::now();
        let ordered = self.ordered.search(&key).cloned();
        let ordered_elapsed = started.elapsed();

        let started = Instant::now();
        let hash = self.hash.search(&key).cloned();
        let hash_elapsed = started.elapsed();

        PointOutcome {
            key,
            value: self.stats.select(ordered, hash),
            ordered_elapsed,
            hash_elapsed,
            served_by,
        }
    }

    /// Inclusive range scan on both indexes; records a range query.
    pub fn range_search(&mut self, start: Key, end: Key) -> RangeOutcome {
        let served_by = self.stats.record(QueryKind::Range);

        let started = Instant::now();
        let ordered = self.ordered.range_search(&start, &end);
        let ordered_elapsed = started.elapsed();

        let started = Instant::now();
        let hash = self.hash.range_search(&start, &end);
        let hash_elapsed = started.elapsed();

        RangeOutcome {
            start,
            end,
            ordered,
            ordered_elapsed,
            hash,
            hash_elapsed,
            served_by,
        }
    }

    /// Compare both indexes under a synthetic workload and adopt the faster one.
    pub fn run_benchmark(&mut self, query_count: usize, workload: WorkloadKind) -> Result<BenchmarkReport> {
        self.bench
            .run(&self.ordered, &self.hash, &mut self.stats, query_count, workload)
    }

    // ============ OBSERVABILITY ============

    pub fn current_preference(&self) -> IndexKind {
        self.stats.preferred()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn len(&self) -> usize {
        self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }

    pub fn ordered(&self) -> &OrderedIndex<Key, Value> {
        &self.ordered
    }

    pub fn hash(&self) -> &HashIndex<Key, Value> {
        &self.hash
    }
}
