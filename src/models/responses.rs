//! Replay replies
//!
//! Each command produces one JSON object on stdout.

use serde::Serialize;

use crate::cache::CacheStats;

/// Reply to a single replay command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Reply {
    /// The key was stored; `len` is the entry count afterwards
    Set { key: String, len: usize },
    /// Lookup result; `value` is null on a miss
    Get {
        key: String,
        value: Option<String>,
        hit: bool,
    },
    Full { full: bool },
    Stats(StatsResponse),
}

impl Reply {
    /// Builds a lookup reply.
    pub fn get(key: impl Into<String>, value: Option<String>) -> Self {
        Reply::Get {
            key: key.into(),
            hit: value.is_some(),
            value,
        }
    }
}

/// Snapshot of cache statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// When the snapshot was taken, in ISO 8601 format
    pub generated_at: String,
}

impl StatsResponse {
    /// Creates a snapshot stamped with the current time.
    pub fn new(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Reply for a line that could not be handled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
