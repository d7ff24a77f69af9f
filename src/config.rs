//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Lifetime of every entry in milliseconds
    pub ttl_ms: u64,
    /// Minimum gap between ledger sweeps in milliseconds
    pub scrub_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - Entry lifetime in milliseconds (default: 300000)
    /// - `CACHE_SCRUB_INTERVAL_MS` - Sweep rate limit in milliseconds (default: 10000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_env("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            ttl_ms: parse_env("CACHE_TTL_MS").unwrap_or(defaults.ttl_ms),
            scrub_interval_ms: parse_env("CACHE_SCRUB_INTERVAL_MS")
                .unwrap_or(defaults.scrub_interval_ms),
        }
    }

    /// Rejects values the cache constructor would panic on.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be positive".to_string(),
            ));
        }
        if self.ttl_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "ttl must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds an empty cache from this configuration.
    ///
    /// # Panics
    /// If the configuration does not pass [`Config::validate`].
    pub fn build_cache<V>(&self) -> TtlCache<V> {
        TtlCache::with_scrub_interval(
            Duration::from_millis(self.ttl_ms),
            self.capacity,
            Duration::from_millis(self.scrub_interval_ms),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_ms: 300_000,
            scrub_interval_ms: 10_000,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
