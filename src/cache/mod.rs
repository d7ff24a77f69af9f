//! Cache Module
//!
//! Provides an in-memory cache bounded by capacity and TTL, cleaned up lazily
//! from an insertion ledger instead of per-entry timers.

use std::time::Duration;

mod entry;
mod ledger;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use ledger::{Ledger, LedgerEntry};
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// Minimum time between two ledger sweeps when none is given
pub const DEFAULT_SCRUB_INTERVAL: Duration = Duration::from_millis(10_000);
