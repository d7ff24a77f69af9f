//! Cache Entry Module
//!
//! Defines the map-side record for a cached value and its expiration.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single live cache entry: the stored value and when it stops being served.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires at `expires_at`.
    pub fn new(value: V, expires_at: u64) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// Boundary condition: an entry is live only while `expires_at > now`, so it
    /// is already expired at the exact expiration instant.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as 0 rather than panicking.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
