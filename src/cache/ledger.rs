//! Ledger Module
//!
//! Records every insertion in chronological order so expiry sweeps and
//! capacity eviction can work from the front without per-key timers.

use std::collections::VecDeque;

// == Ledger Entry ==
/// One `set` call: the key written and the expiration it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Expiration timestamp (Unix milliseconds) assigned by the `set`
    pub expires_at: u64,
    /// The key that was written
    pub key: String,
}

// == Ledger ==
/// Append-only insertion log.
///
/// Entries are pushed at the back and only ever dropped from the front:
/// - Front = oldest `set`
/// - Back = newest `set`
///
/// A key set several times appears several times. Only the newest occurrence
/// can still match the map; older ones are stale and get discarded when reached.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: VecDeque<LedgerEntry>,
}

impl Ledger {
    // == Constructor ==
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    // == Push ==
    /// Records a `set` of `key` expiring at `expires_at`.
    pub fn push(&mut self, expires_at: u64, key: String) {
        self.entries.push_back(LedgerEntry { expires_at, key });
    }

    // == Expired Prefix ==
    /// Counts the leading entries whose expiration is at or before `now`.
    ///
    /// The scan stops at the first entry still in the future.
    pub fn expired_prefix_len(&self, now: u64) -> usize {
        self.entries
            .iter()
            .take_while(|entry| entry.expires_at <= now)
            .count()
    }

    // == Iter ==
    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    // == Drop Front ==
    /// Removes the first `count` entries in one go.
    pub fn drop_front(&mut self, count: usize) {
        let count = count.min(self.entries.len());
        self.entries.drain(..count);
    }

    // == Length ==
    /// Returns the number of recorded insertions, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if no insertion is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
