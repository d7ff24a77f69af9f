//! Error types for the cache crate
//!
//! Cache operations themselves are total; these errors cover configuration,
//! replay input and the document source behind read-through lookups.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for everything around the cache core.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration would violate the cache's construction preconditions
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A replay line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The document source behind a read-through lookup failed
    #[error("Source error: {0}")]
    Source(#[from] anyhow::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
