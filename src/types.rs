use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DuodexError;

/// Catalog key: the integer record id.
pub type Key = i64;

/// Catalog value: the record title.
pub type Value = String;

/// A `(key, value)` pair as returned by range scans.
pub type Entry = (Key, Value);

/// Which index structure a result came from (or is preferred).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// B+Tree-like ordered index, O(log n) lookups and ordered range scans
    #[default]
    Ordered,
    /// Hash index, O(1) lookups and full-scan range queries
    Hash,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Ordered => "ordered",
            IndexKind::Hash => "hash",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a single query as seen by the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Equality,
    Range,
}

/// Synthetic workload driven by the benchmark harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    /// Point lookups only
    Equality,
    /// Range scans only
    Range,
    /// 50/50 mix, recorded into the shared statistics
    Mixed,
}

impl WorkloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::Equality => "equality",
            WorkloadKind::Range => "range",
            WorkloadKind::Mixed => "mixed",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkloadKind {
    type Err = DuodexError;

    /// Parse from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equality" | "eq" | "point" => Ok(WorkloadKind::Equality),
            "range" => Ok(WorkloadKind::Range),
            "mixed" | "mix" => Ok(WorkloadKind::Mixed),
            other => Err(DuodexError::UnknownWorkload(other.to_string())),
        }
    }
}

// ============ QUERY OUTCOMES ============

/// Result of a point lookup. Both indexes are always executed and timed;
/// `value` is the answer of the index named by `served_by`.
#[derive(Clone, Debug)]
pub struct PointOutcome {
    pub key: Key,
    pub value: Option<Value>,
    pub ordered_elapsed: Duration,
    pub hash_elapsed: Duration,
    pub served_by: IndexKind,
}

/// Result of an inclusive range scan over both indexes.
#[derive(Clone, Debug)]
pub struct RangeOutcome {
    pub start: Key,
    pub end: Key,
    pub ordered: Vec<Entry>,
    pub ordered_elapsed: Duration,
    pub hash: Vec<Entry>,
    pub hash_elapsed: Duration,
    pub served_by: IndexKind,
}

impl RangeOutcome {
    /// The result list of the index the selector treats as authoritative.
    pub fn chosen(&self) -> &[Entry] {
        match self.served_by {
            IndexKind::Ordered => &self.ordered,
            IndexKind::Hash => &self.hash,
        }
    }

    /// Elapsed time of the authoritative index.
    pub fn chosen_elapsed(&self) -> Duration {
        match self.served_by {
            IndexKind::Ordered => self.ordered_elapsed,
            IndexKind::Hash => self.hash_elapsed,
        }
    }
}

/// Totals of one benchmark run and the preference it left behind.
#[derive(Clone, Debug)]
pub struct BenchmarkReport {
    pub workload: WorkloadKind,
    pub query_count: usize,
    pub ordered_total: Duration,
    pub hash_total: Duration,
    pub chosen: IndexKind,
}

/// Point-in-time view of the query statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsSnapshot {
    pub equality_count: u64,
    pub range_count: u64,
    pub preferred: IndexKind,
}

impl StatsSnapshot {
    pub fn total(&self) -> u64 {
        self.equality_count + self.range_count
    }

    /// Share of equality queries, `None` before the first query.
    pub fn equality_ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.equality_count as f64 / total as f64),
        }
    }
}

// JSON serialization for outcomes
fn entries_json(entries: &[Entry]) -> serde_json::Value {
    serde_json::Value::Array(
        entries
            .iter()
            .map(|(k, v)| serde_json::json!({ "key": k, "value": v }))
            .collect(),
    )
}

impl PointOutcome {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "key": self.key,
            "value": self.value,
            "served_by": self.served_by,
            "ordered_ns": self.ordered_elapsed.as_nanos() as u64,
            "hash_ns": self.hash_elapsed.as_nanos() as u64
        })
    }
}

impl RangeOutcome {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "start": self.start,
            "end": self.end,
            "served_by": self.served_by,
            "ordered": entries_json(&self.ordered),
            "ordered_ns": self.ordered_elapsed.as_nanos() as u64,
            "hash": entries_json(&self.hash),
            "hash_ns": self.hash_elapsed.as_nanos() as u64
        })
    }
}

impl BenchmarkReport {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "workload": self.workload,
            "query_count": self.query_count,
            "ordered_ns": self.ordered_total.as_nanos() as u64,
            "hash_ns": self.hash_total.as_nanos() as u64,
            "chosen": self.chosen
        })
    }
}

impl StatsSnapshot {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "equality_count": self.equality_count,
            "range_count": self.range_count,
            "equality_ratio": self.equality_ratio(),
            "preferred": self.preferred
        })
    }
}
