//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with an insertion ledger that
//! drives both lazy TTL expiry and FIFO capacity eviction.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{
    current_timestamp_ms, CacheEntry, CacheStats, Ledger, LedgerEntry, DEFAULT_SCRUB_INTERVAL,
};

// == TTL Cache ==
/// Key-value cache bounded by capacity and time-to-live.
///
/// Expired entries are reclaimed lazily: every `set`/`get` first runs a ledger
/// sweep, rate-limited to once per scrub interval, and a read of an expired key
/// removes it on the spot. When a `set` would grow a full cache, the oldest
/// surviving insertion is evicted.
///
/// Not thread-safe on its own; wrap it in [`crate::SharedCache`] to share it.
///
/// ```
/// use std::time::Duration;
/// use ledger_cache::TtlCache;
///
/// let mut cache = TtlCache::new(Duration::from_secs(60), 2);
/// cache.set_at("a", 1, 0).set_at("b", 2, 0).set_at("c", 3, 0);
///
/// assert_eq!(cache.get_at("a", 1), None);
/// assert_eq!(cache.get_at("c", 1), Some(&3));
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Live entries, at most one per key
    entries: HashMap<String, CacheEntry<V>>,
    /// One record per `set`, oldest first
    ledger: Ledger,
    /// Performance statistics
    stats: CacheStats,
    /// Lifetime given to every entry, in milliseconds
    ttl_ms: u64,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Minimum gap between two ledger sweeps, in milliseconds
    scrub_interval_ms: u64,
    /// Time of the last sweep, None until the first one runs
    last_scrub: Option<u64>,
}

impl<V> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache with the default scrub interval.
    ///
    /// # Panics
    /// If `ttl` is shorter than one millisecond or `capacity` is zero.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_scrub_interval(ttl, capacity, DEFAULT_SCRUB_INTERVAL)
    }

    /// Creates a cache that sweeps its ledger at most once per `scrub_interval`.
    ///
    /// # Panics
    /// If `ttl` is shorter than one millisecond or `capacity` is zero.
    pub fn with_scrub_interval(ttl: Duration, capacity: usize, scrub_interval: Duration) -> Self {
        let ttl_ms = saturating_millis(ttl);
        assert!(ttl_ms > 0, "TtlCache ttl must be at least 1ms, got {:?}", ttl);
        assert!(capacity > 0, "TtlCache capacity must be positive");

        Self {
            entries: HashMap::new(),
            ledger: Ledger::new(),
            stats: CacheStats::new(),
            ttl_ms,
            capacity,
            scrub_interval_ms: saturating_millis(scrub_interval),
            last_scrub: None,
        }
    }

    // == Set ==
    /// Stores `value` under `key` using the wall clock.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> &mut Self {
        self.set_at(key, value, current_timestamp_ms())
    }

    /// Stores `value` under `key` as of `now` (Unix milliseconds).
    ///
    /// Overwriting a key that is still live never evicts, since the map does
    /// not grow. Otherwise a full cache evicts before inserting.
    pub fn set_at(&mut self, key: impl Into<String>, value: V, now: u64) -> &mut Self {
        let key = key.into();
        self.scrub_at(now);

        if self.is_full() && !self.probe_live(&key, now) {
            let evicted = self.evict();
            self.stats.record_evictions(evicted);
            if evicted > 0 {
                debug!(key = %key, evicted, "Cache full, evicted oldest insertions");
            }
        }

        let expires_at = now.saturating_add(self.ttl_ms);
        self.entries
            .insert(key.clone(), CacheEntry::new(value, expires_at));
        self.ledger.push(expires_at, key);

        debug_assert!(self.entries.len() <= self.capacity);
        self
    }

    // == Get ==
    /// Looks up `key` using the wall clock.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Looks up `key` as of `now` (Unix milliseconds).
    ///
    /// An entry found expired is removed immediately, whether or not the ledger
    /// sweep has reached it yet.
    pub fn get_at(&mut self, key: &str, now: u64) -> Option<&V> {
        self.scrub_at(now);

        if self.probe_live(key, now) {
            self.stats.record_hit();
            self.entries.get(key).map(|entry| &entry.value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Is Full ==
    /// Returns true when the map holds `capacity` entries or more.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    // == Scrub ==
    /// Runs a ledger sweep using the wall clock. See [`TtlCache::scrub_at`].
    pub fn scrub(&mut self) -> usize {
        self.scrub_at(current_timestamp_ms())
    }

    /// Purges entries whose expiration is at or before `now`.
    ///
    /// Does nothing if the previous sweep was less than one scrub interval ago.
    /// Otherwise consumes the expired prefix of the ledger, deleting each map
    /// entry whose expiration still matches its record. Returns the number of
    /// entries removed.
    pub fn scrub_at(&mut self, now: u64) -> usize {
        if let Some(last) = self.last_scrub {
            if now.saturating_sub(last) < self.scrub_interval_ms {
                return 0;
            }
        }

        let prefix = self.ledger.expired_prefix_len(now);
        let mut removed = 0;
        for record in self.ledger.iter().take(prefix) {
            if remove_if_current(&mut self.entries, record) {
                removed += 1;
            }
        }
        self.ledger.drop_front(prefix);
        self.last_scrub = Some(now);

        self.stats.record_scrub();
        self.stats.record_expirations(removed);
        if removed > 0 {
            debug!(removed, consumed = prefix, "Scrubbed expired entries");
        } else {
            trace!(consumed = prefix, "Scrub found no live expired entries");
        }

        removed
    }

    // == Evict ==
    /// Drops the oldest surviving insertions until the cache is below capacity.
    ///
    /// Stale records met along the way are consumed without counting as
    /// progress. Returns the number of entries removed.
    fn evict(&mut self) -> usize {
        let mut scanned = 0;
        let mut evicted = 0;

        for record in self.ledger.iter() {
            if self.entries.len() < self.capacity {
                break;
            }
            scanned += 1;
            if remove_if_current(&mut self.entries, record) {
                evicted += 1;
                trace!(key = %record.key, "Evicted entry");
            }
        }
        self.ledger.drop_front(scanned);

        debug_assert!(
            self.entries.len() < self.capacity,
            "ledger exhausted while cache still full"
        );
        evicted
    }

    // == Probe ==
    /// Returns whether `key` is live at `now`, removing it if it has expired.
    fn probe_live(&mut self, key: &str, now: u64) -> bool {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => return false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            trace!(key, "Removed expired entry on read");
        }
        !expired
    }

    // == Accessors ==
    /// Returns the number of entries in the map, expired-but-unswept ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the lifetime given to every entry.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Returns the minimum gap between two ledger sweeps.
    pub fn scrub_interval(&self) -> Duration {
        Duration::from_millis(self.scrub_interval_ms)
    }

    /// Returns the number of ledger records, stale ones included.
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_sizes(self.entries.len(), self.ledger.len());
        stats
    }

    /// Every map entry must still have a ledger record with its exact expiration.
    #[cfg(test)]
    pub(crate) fn assert_ledger_covers_entries(&self) {
        for (key, entry) in &self.entries {
            assert!(
                self.ledger
                    .iter()
                    .any(|r| &r.key == key && r.expires_at == entry.expires_at),
                "entry {} has no matching ledger record",
                key
            );
        }
    }
}

/// Whole milliseconds in `duration`, capped at `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Deletes the map entry for `record.key` only if it still carries
/// `record.expires_at`. A newer `set` of the same key is left alone.
fn remove_if_current<V>(entries: &mut HashMap<String, CacheEntry<V>>, record: &LedgerEntry) -> bool {
    let current = entries
        .get(&record.key)
        .is_some_and(|entry| entry.expires_at == record.expires_at);
    if current {
        entries.remove(&record.key);
    }
    current
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_cache_new() {
        let cache: TtlCache<u32> = TtlCache::new(MINUTE, 100);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert!(!cache.is_full());
        assert_eq!(cache.capacity(), 100);
        assert_eq!(cache.ttl(), MINUTE);
        assert_eq!(cache.scrub_interval(), DEFAULT_SCRUB_INTERVAL);
    }

    #[test]
    #[should_panic(expected = "ttl")]
    fn test_cache_rejects_zero_ttl() {
        let _cache: TtlCache<u32> = TtlCache::new(Duration::ZERO, 10);
    }

    #[test]
    #[should_panic(expected = "ttl")]
    fn test_cache_rejects_sub_millisecond_ttl() {
        let _cache: TtlCache<u32> = TtlCache::new(Duration::from_micros(500), 10);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_cache_rejects_zero_capacity() {
        let _cache: TtlCache<u32> = TtlCache::new(MINUTE, 0);
    }

    #[test]
    fn test_cache_huge_ttl_saturates() {
        let mut cache = TtlCache::new(Duration::from_secs(1u64 << 61), 1);
        assert_eq!(cache.ttl(), Duration::from_millis(u64::MAX));

        cache.set_at("a", 1, 0);
        assert_eq!(cache.get_at("a", 1_000), Some(&1));

        let mut cache = TtlCache::with_scrub_interval(
            Duration::from_secs(u64::MAX / 1000 + 1),
            4,
            Duration::MAX,
        );
        assert_eq!(cache.scrub_interval(), Duration::from_millis(u64::MAX));

        cache.set_at("a", 1, 0);
        assert_eq!(cache.get_at("a", 1_000), Some(&1));
    }

    #[test]
    fn test_cache_set_and_get() {
        let mut cache = TtlCache::new(MINUTE, 100);

        cache.set_at("key1", "value1".to_string(), 1_000);

        assert_eq!(cache.get_at("key1", 1_000), Some(&"value1".to_string()));
        assert_eq!(cache.get_at("key1", 60_999), Some(&"value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_set_is_fluent() {
        let mut cache = TtlCache::new(MINUTE, 10);

        cache.set_at("a", 1, 0).set_at("b", 2, 0).set_at("c", 3, 0);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get_at("b", 0), Some(&2));
    }

    #[test]
    fn test_cache_get_nonexistent() {
        let mut cache: TtlCache<u32> = TtlCache::new(MINUTE, 100);

        assert_eq!(cache.get_at("nonexistent", 0), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_cache_overwrite() {
        let mut cache = TtlCache::new(MINUTE, 100);

        cache.set_at("key1", 1, 0);
        cache.set_at("key1", 2, 10);

        assert_eq!(cache.get_at("key1", 20), Some(&2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ledger_len(), 2);
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let mut cache = TtlCache::new(Duration::from_millis(100), 100);

        cache.set_at("key1", 1, 1_000);

        assert_eq!(cache.get_at("key1", 1_099), Some(&1));
        // Expired exactly at set time + ttl
        assert_eq!(cache.get_at("key1", 1_100), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_ttl_expiration_wall_clock() {
        let mut cache = TtlCache::new(Duration::from_millis(1), 1000);

        cache.set("a", 1).set("b", 2);
        sleep(Duration::from_millis(10));

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_cache_fifo_eviction() {
        let mut cache = TtlCache::new(MINUTE, 3);

        cache.set("a", 1).set("b", 2).set("c", 3).set("d", 4);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(&2));
        assert_eq!(cache.get("c"), Some(&3));
        assert_eq!(cache.get("d"), Some(&4));
        assert_eq!(cache.stats().evictions, 1);

        // Re-adding the evicted key pushes out the next oldest insertion
        cache.set("a", 5);
        assert_eq!(cache.get("a"), Some(&5));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_cache_get_does_not_promote() {
        let mut cache = TtlCache::new(MINUTE, 3);

        cache.set_at("a", 1, 0).set_at("b", 2, 1).set_at("c", 3, 2);
        assert_eq!(cache.get_at("a", 3), Some(&1));

        cache.set_at("d", 4, 4);

        // Reads do not move "a" back; it is still the oldest insertion
        assert_eq!(cache.get_at("a", 5), None);
        assert_eq!(cache.get_at("b", 5), Some(&2));
    }

    #[test]
    fn test_cache_overwrite_live_key_at_capacity_does_not_evict() {
        let mut cache = TtlCache::new(MINUTE, 3);

        cache.set_at("a", 1, 0).set_at("b", 2, 1).set_at("c", 3, 2);
        cache.set_at("b", 20, 3);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get_at("a", 4), Some(&1));
        assert_eq!(cache.get_at("b", 4), Some(&20));
        assert_eq!(cache.get_at("c", 4), Some(&3));
    }

    #[test]
    fn test_cache_reset_key_moves_to_back_of_eviction_order() {
        let mut cache = TtlCache::new(MINUTE, 3);

        cache.set_at("a", 1, 0).set_at("b", 2, 1).set_at("c", 3, 2);
        cache.set_at("a", 10, 3);
        cache.set_at("d", 4, 4);

        // The first record for "a" is stale, so "b" is the oldest survivor
        assert_eq!(cache.get_at("a", 5), Some(&10));
        assert_eq!(cache.get_at("b", 5), None);
        assert_eq!(cache.get_at("c", 5), Some(&3));
        assert_eq!(cache.get_at("d", 5), Some(&4));
        assert_eq!(cache.stats().evictions, 1);
        // Stale "a" record and "b" record were both consumed
        assert_eq!(cache.ledger_len(), 3);
        cache.assert_ledger_covers_entries();
    }

    #[test]
    fn test_cache_set_expired_key_at_capacity_reclaims_slot() {
        let mut cache = TtlCache::with_scrub_interval(
            Duration::from_millis(100),
            2,
            Duration::from_secs(3600),
        );

        cache.set_at("a", 1, 0).set_at("b", 2, 50);
        // "a" expired at 100 but the sweep is rate-limited; the overwrite
        // probe drops it, after which the cache is no longer full
        cache.set_at("a", 3, 120);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get_at("a", 121), Some(&3));
        assert_eq!(cache.get_at("b", 121), Some(&2));
    }

    #[test]
    fn test_scrub_removes_expired_prefix() {
        let mut cache =
            TtlCache::with_scrub_interval(Duration::from_millis(100), 10, Duration::ZERO);

        cache.set_at("a", 1, 0).set_at("b", 2, 10).set_at("c", 3, 60);

        let removed = cache.scrub_at(150);

        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ledger_len(), 1);
        assert_eq!(cache.stats().expirations, 2);
    }

    #[test]
    fn test_scrub_keeps_reset_key() {
        let mut cache =
            TtlCache::with_scrub_interval(Duration::from_millis(100), 10, Duration::ZERO);

        cache.set_at("a", 1, 0);
        cache.set_at("a", 2, 50);

        // The record from t=0 has expired but no longer matches the map
        assert_eq!(cache.scrub_at(120), 0);
        assert_eq!(cache.ledger_len(), 1);
        assert_eq!(cache.get_at("a", 120), Some(&2));

        assert_eq!(cache.scrub_at(150), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_scrub_rate_limited() {
        let mut cache = TtlCache::with_scrub_interval(
            Duration::from_millis(100),
            10,
            Duration::from_millis(1_000),
        );

        cache.set_at("a", 1, 0).set_at("b", 2, 10);
        assert_eq!(cache.stats().scrubs, 1);

        // Both expired, but the next sweep is not due until t=1000
        assert_eq!(cache.get_at("zzz", 500), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().scrubs, 1);

        // On-read expiry still hides the stale value
        assert_eq!(cache.get_at("a", 500), None);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get_at("zzz", 1_000), None);
        assert_eq!(cache.stats().scrubs, 2);
        assert!(cache.is_empty());
        assert_eq!(cache.ledger_len(), 0);
    }

    #[test]
    fn test_scrub_ignores_clock_going_backwards() {
        let mut cache =
            TtlCache::with_scrub_interval(Duration::from_millis(100), 10, Duration::from_millis(10));

        cache.set_at("a", 1, 1_000);
        assert_eq!(cache.scrub_at(500), 0);
        assert_eq!(cache.stats().scrubs, 1);
    }

    #[test]
    fn test_evict_skips_stale_records_without_progress() {
        let mut cache = TtlCache::new(MINUTE, 2);

        cache.set_at("a", 1, 0).set_at("a", 2, 1).set_at("a", 3, 2);
        cache.set_at("b", 4, 3);
        assert!(cache.is_full());

        let evicted = cache.evict();

        // Two stale "a" records consumed, the third one evicted "a"
        assert_eq!(evicted, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ledger_len(), 1);
        assert_eq!(cache.get_at("b", 4), Some(&4));
    }

    #[test]
    fn test_cache_capacity_one() {
        let mut cache = TtlCache::new(MINUTE, 1);

        cache.set_at("a", 1, 0);
        cache.set_at("b", 2, 1);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("a", 2), None);
        assert_eq!(cache.get_at("b", 2), Some(&2));
    }

    #[test]
    fn test_cache_stats() {
        let mut cache = TtlCache::new(MINUTE, 100);

        cache.set_at("key1", 1, 0);
        cache.get_at("key1", 1); // hit
        cache.get_at("nonexistent", 1); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.ledger_len, 1);
    }
}
