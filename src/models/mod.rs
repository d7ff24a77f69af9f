//! Replay command and reply models
//!
//! This module defines the line commands read by the replay driver and the
//! JSON replies it prints for each of them.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::Command;
pub use responses::{ErrorResponse, Reply, StatsResponse};
