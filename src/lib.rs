// duodex v0.1.0 - Adaptive Dual-Index Engine
// B+Tree and hash index over one key space, routed by query statistics

pub mod error;
pub mod config;
pub mod types;
pub mod index;
pub mod stats;
pub mod bench;
pub mod engine;
pub mod shared;
pub mod store;

// Re-export main types
pub use engine::DualIndexEngine;
pub use shared::SharedEngine;
pub use config::{EngineConfig, BenchmarkConfig, KeySpan};
pub use error::{DuodexError, Result};
pub use index::{HashIndex, OrderedIndex, KeyIndex};
pub use stats::{QueryStatistics, EQUALITY_THRESHOLD};
pub use store::{Catalog, MemoryStore, RecordStore};
pub use types::{
    BenchmarkReport, Entry, IndexKind, Key, PointOutcome, QueryKind, RangeOutcome, StatsSnapshot,
    Value, WorkloadKind,
};
