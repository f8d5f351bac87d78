//! Engine configuration.
//!
//! Loadable from JSON; every field has a default so a partial document
//! (or `{}`) is valid.
//!
//! ```ignore
//! let config = EngineConfig::from_json_str(r#"{ "order": 4, "benchmark": { "seed": 7 } }"#)?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DuodexError, Result};
use crate::types::Key;

/// Node capacity used by the catalog service.
pub const DEFAULT_ORDER: usize = 3;

/// Smallest order a tree can be built with.
pub const MIN_ORDER: usize = 2;

/// Inclusive key interval `[lo, hi]` for synthetic key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpan {
    pub lo: Key,
    pub hi: Key,
}

impl KeySpan {
    pub const fn new(lo: Key, hi: Key) -> Self {
        Self { lo, hi }
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.lo > self.hi {
            return Err(DuodexError::InvalidConfig(format!(
                "{field}: empty span [{}, {}]",
                self.lo, self.hi
            )));
        }
        Ok(())
    }
}

/// Synthetic workload shape for the benchmark harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Keys drawn for equality queries
    pub equality_keys: KeySpan,
    /// Start keys drawn for range queries
    pub range_starts: KeySpan,
    /// Offset added to a range start to form its end
    pub range_width: KeySpan,
    /// Fixed RNG seed for reproducible key streams (None = entropy)
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            equality_keys: KeySpan::new(1, 100),
            range_starts: KeySpan::new(1, 50),
            range_width: KeySpan::new(1, 10),
            seed: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<()> {
        self.equality_keys.validate("benchmark.equality_keys")?;
        self.range_starts.validate("benchmark.range_starts")?;
        self.range_width.validate("benchmark.range_width")?;
        if self.range_width.lo < 0 {
            return Err(DuodexError::InvalidConfig(
                "benchmark.range_width: offsets must be non-negative".to_string(),
            ));
        }
        // Widest generated range end must stay representable
        if self.range_starts.hi.checked_add(self.range_width.hi).is_none() {
            return Err(DuodexError::InvalidConfig(format!(
                "benchmark: range end {} + {} overflows the key type",
                self.range_starts.hi, self.range_width.hi
            )));
        }
        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum keys per ordered-index node before a split is forced
    pub order: usize,
    pub benchmark: BenchmarkConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            benchmark: BenchmarkConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_order(order: usize) -> Self {
        Self { order, ..Self::default() }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(DuodexError::InvalidOrder { order: self.order });
        }
        self.benchmark.validate()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.order, 3);
        assert_eq!(config.benchmark.equality_keys, KeySpan::new(1, 100));
        assert_eq!(config.benchmark.range_starts, KeySpan::new(1, 50));
        assert_eq!(config.benchmark.range_width, KeySpan::new(1, 10));
        assert!(config.benchmark.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(r#"{ "order": 8, "benchmark": { "seed": 42 } }"#).unwrap();
        assert_eq!(config.order, 8);
        assert_eq!(config.benchmark.seed, Some(42));
        assert_eq!(config.benchmark.equality_keys, KeySpan::new(1, 100));

        let empty = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(empty.order, DEFAULT_ORDER);
    }

    #[test]
    fn test_invalid_order_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "order": 1 }"#).unwrap_err();
        assert!(matches!(err, DuodexError::InvalidOrder { order: 1 }));
    }

    #[test]
    fn test_invalid_span_rejected() {
        let json = r#"{ "benchmark": { "range_starts": { "lo": 10, "hi": 5 } } }"#;
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, DuodexError::InvalidConfig(_)));
    }

    #[test]
    fn test_range_end_overflow_rejected() {
        let json = r#"{ "benchmark": {
            "range_starts": { "lo": 9223372036854775800, "hi": 9223372036854775807 },
            "range_width": { "lo": 10, "hi": 10 },
            "seed": 1
        } }"#;
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, DuodexError::InvalidConfig(_)));

        // Largest start that still fits
        let edge = BenchmarkConfig {
            range_starts: KeySpan::new(i64::MAX - 10, i64::MAX - 10),
            range_width: KeySpan::new(10, 10),
            ..BenchmarkConfig::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_to_json_round_trip() {
        let config = EngineConfig::with_order(6);
        let json = config.to_json();
        assert_eq!(json["order"], 6);
        assert_eq!(json["benchmark"]["equality_keys"]["hi"], 100);

        let back = EngineConfig::from_json_str(&json.to_string()).unwrap();
        assert_eq!(back.order, 6);
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json_str("{ order: ").unwrap_err();
        assert!(matches!(err, DuodexError::Config(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "order": 5 }}"#).unwrap();
        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.order, 5);

        let missing = EngineConfig::from_path(Path::new("/nonexistent/duodex.json")).unwrap_err();
        assert!(matches!(missing, DuodexError::Io(_)));
    }
}
