//! Query statistics and the adaptive selector.
//!
//! Counts equality vs. range queries and derives the preferred index from
//! the equality share. The decision is recomputed from the counters on every
//! query with no hysteresis, so a workload sitting near the threshold flips
//! back and forth as single queries arrive.

use log::trace;

use crate::types::{IndexKind, QueryKind, StatsSnapshot};

/// Equality share above which the hash index is preferred.
pub const EQUALITY_THRESHOLD: f64 = 0.9;

#[derive(Debug, Clone, Default)]
pub struct QueryStatistics {
    equality_count: u64,
    range_count: u64,
    preferred: IndexKind,
}

impl QueryStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one query and recompute the preference.
    pub fn record(&mut self, kind: QueryKind) -> IndexKind {
        match kind {
            QueryKind::Equality => self.equality_count += 1,
            QueryKind::Range => self.range_count += 1,
        }
        let next = Self::preference_for(self.equality_count, self.range_count);
        if next != self.preferred {
            trace!(
                "preference {} -> {} (equality {}, range {})",
                self.preferred,
                next,
                self.equality_count,
                self.range_count
            );
        }
        self.preferred = next;
        next
    }

    /// Pure threshold rule: Hash iff equality / total > 0.9.
    pub fn preference_for(equality: u64, range: u64) -> IndexKind {
        let total = equality + range;
        if total > 0 && equality as f64 / total as f64 > EQUALITY_THRESHOLD {
            IndexKind::Hash
        } else {
            IndexKind::Ordered
        }
    }

    /// Force a preference (benchmark outcome). Counters are untouched, so the
    /// next recorded query recomputes from them again.
    pub fn override_preference(&mut self, kind: IndexKind) {
        self.preferred = kind;
    }

    pub fn preferred(&self) -> IndexKind {
        self.preferred
    }

    /// Pick the authoritative result out of two already computed ones.
    pub fn select<T>(&self, ordered: T, hash: T) -> T {
        match self.preferred {
            IndexKind::Ordered => ordered,
            IndexKind::Hash => hash,
        }
    }

    pub fn equality_count(&self) -> u64 {
        self.equality_count
    }

    pub fn range_count(&self) -> u64 {
        self.range_count
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            equality_count: self.equality_count,
            range_count: self.range_count,
            preferred: self.preferred,
        }
    }
}
