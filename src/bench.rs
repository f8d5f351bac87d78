//! Benchmark harness
//!
//! Runs a synthetic workload against the ordered index alone, then an
//! equally shaped (independently drawn) batch against the hash index alone,
//! and hands the preference to whichever finished first.
//!
//! Only the mixed workload feeds the shared query statistics, and only from
//! the ordered pass. Pure equality and range runs leave the counters alone.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::config::BenchmarkConfig;
use crate::error::{DuodexError, Result};
use crate::index::KeyIndex;
use crate::stats::QueryStatistics;
use crate::types::{BenchmarkReport, IndexKind, Key, QueryKind, Value, WorkloadKind};

/// One synthetic query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticQuery {
    Point(Key),
    Range(Key, Key),
}

impl SyntheticQuery {
    pub fn kind(&self) -> QueryKind {
        match self {
            SyntheticQuery::Point(_) => QueryKind::Equality,
            SyntheticQuery::Range(..) => QueryKind::Range,
        }
    }
}

pub struct BenchmarkHarness {
    config: BenchmarkConfig,
    rng: StdRng,
}

impl BenchmarkHarness {
    /// Seeded from `config.seed` when set, from OS entropy otherwise.
    pub fn new(config: BenchmarkConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Draw the next query of the given workload.
    pub fn next_query(&mut self, workload: WorkloadKind) -> SyntheticQuery {
        let point = match workload {
            WorkloadKind::Equality => true,
            WorkloadKind::Range => false,
            WorkloadKind::Mixed => self.rng.gen_bool(0.5),
        };
        if point {
            let keys = self.config.equality_keys;
            SyntheticQuery::Point(self.rng.gen_range(keys.lo..=keys.hi))
        } else {
            let starts = self.config.range_starts;
            let width = self.config.range_width;
            let start = self.rng.gen_range(starts.lo..=starts.hi);
            SyntheticQuery::Range(start, start + self.rng.gen_range(width.lo..=width.hi))
        }
    }

    /// Run `count` queries against one index and return the total wall-clock time.
    /// Each query's kind is recorded into `stats` when given.
    pub fn run_batch(
        &mut self,
        index: &dyn KeyIndex<Key, Value>,
        workload: WorkloadKind,
        count: usize,
        mut stats: Option<&mut QueryStatistics>,
    ) -> Duration {
        let started = Instant::now();
        for _ in 0..count {
            let query = self.next_query(workload);
            match query {
                SyntheticQuery::Point(key) => {
                    black_box(index.search(&key));
                }
                SyntheticQuery::Range(start, end) => {
                    black_box(index.range_search(&start, &end));
                }
            }
            if let Some(stats) = stats.as_deref_mut() {
                stats.record(query.kind());
            }
        }
        let elapsed = started.elapsed();
        debug!("{} batch: {} {} queries in {:?}", index.name(), count, workload, elapsed);
        elapsed
    }

    /// Full comparison run. Overrides the preference in `stats` with the
    /// faster index: Hash iff its total is strictly smaller.
    pub fn run(
        &mut self,
        ordered: &dyn KeyIndex<Key, Value>,
        hash: &dyn KeyIndex<Key, Value>,
        stats: &mut QueryStatistics,
        query_count: usize,
        workload: WorkloadKind,
    ) -> Result<BenchmarkReport> {
        if query_count == 0 {
            return Err(DuodexError::InvalidQueryCount);
        }

        let shared = match workload {
            WorkloadKind::Mixed => Some(&mut *stats),
            WorkloadKind::Equality | WorkloadKind::Range => None,
        };
        let ordered_total = self.run_batch(ordered, workload, query_count, shared);
        let hash_total = self.run_batch(hash, workload, query_count, None);

        let chosen = if hash_total < ordered_total {
            IndexKind::Hash
        } else {
            IndexKind::Ordered
        };
        stats.override_preference(chosen);

        info!(
            "benchmark {} x{}: ordered {:?}, hash {:?} -> {}",
            workload, query_count, ordered_total, hash_total, chosen
        );

        Ok(BenchmarkReport {
            workload,
            query_count,
            ordered_total,
            hash_total,
            chosen,
        })
    }
}
