//! Error types for duodex.

use thiserror::Error;

/// Result type alias using DuodexError.
pub type Result<T> = std::result::Result<T, DuodexError>;

/// Errors that can occur in duodex operations.
///
/// A missing key is not an error: lookups return `None`. An inverted range
/// is not an error either: it yields an empty result.
#[derive(Debug, Error)]
pub enum DuodexError {
    // Configuration errors
    #[error("Invalid order: {order} (minimum is 2)")]
    InvalidOrder { order: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Benchmark errors
    #[error("Query count must be positive")]
    InvalidQueryCount,

    #[error("Unknown workload: {0} (expected equality, range or mixed)")]
    UnknownWorkload(String),

    // Ordered index errors
    #[error("Ordered index corrupted: {0}")]
    Corrupted(String),
}
