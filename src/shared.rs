//! Shared Cache Handle
//!
//! Lets concurrent async code use one [`TtlCache`] by holding a single mutex
//! for the whole of every call, so a sweep, the capacity check and the write
//! of a `set` can never interleave with another caller.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheStats, TtlCache};
use crate::config::Config;

/// Cloneable handle to a mutex-guarded cache.
///
/// Values are cloned out on `get`, since no reference may outlive the lock.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<Mutex<TtlCache<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    /// Wraps an existing cache.
    pub fn new(cache: TtlCache<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Creates a shared cache from configuration.
    ///
    /// # Panics
    /// If the configuration does not pass [`Config::validate`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.build_cache())
    }

    /// Stores `value` under `key` using the wall clock.
    ///
    /// Returns the entry count right after the write, read under the same lock.
    pub async fn set(&self, key: impl Into<String>, value: V) -> usize {
        self.inner.lock().await.set(key, value).len()
    }

    /// Stores `value` under `key` as of `now` (Unix milliseconds).
    ///
    /// Returns the entry count right after the write, read under the same lock.
    pub async fn set_at(&self, key: impl Into<String>, value: V, now: u64) -> usize {
        self.inner.lock().await.set_at(key, value, now).len()
    }

    /// Looks up `key` using the wall clock, cloning the value out.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().await.get(key).cloned()
    }

    /// Looks up `key` as of `now`, cloning the value out.
    pub async fn get_at(&self, key: &str, now: u64) -> Option<V> {
        self.inner.lock().await.get_at(key, now).cloned()
    }

    /// Returns true when the cache is at capacity.
    pub async fn is_full(&self) -> bool {
        self.inner.lock().await.is_full()
    }

    /// Returns the number of entries, expired-but-unswept ones included.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }
}
