//! Cache Statistics Module
//!
//! Tracks hits, misses, evictions, expirations and sweep activity.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of `get` calls that returned a live value
    pub hits: u64,
    /// Number of `get` calls that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries removed to make room under the capacity bound
    pub evictions: u64,
    /// Number of entries removed because their TTL ran out
    pub expirations: u64,
    /// Number of ledger sweeps that actually ran
    pub scrubs: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current number of ledger records, stale ones included
    pub ledger_len: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_scrub(&mut self) {
        self.scrubs += 1;
    }

    // == Update Sizes ==
    /// Updates the entry and ledger sizes.
    pub fn set_sizes(&mut self, total_entries: usize, ledger_len: usize) {
        self.total_entries = total_entries;
        self.ledger_len = ledger_len;
    }
}
