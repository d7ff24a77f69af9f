//! Ledger Cache - A bounded in-memory TTL cache
//!
//! Bounds entries by count and by age, reclaiming them lazily from an
//! insertion ledger instead of per-entry timers.

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod replay;
pub mod shared;

pub use cache::{CacheStats, TtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use loader::{DocumentSource, ReadThrough};
pub use replay::Replay;
pub use shared::SharedCache;
