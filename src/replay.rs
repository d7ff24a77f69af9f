//! Replay Executor
//!
//! Applies parsed [`Command`]s to a shared string cache and turns the outcome
//! into a [`Reply`].

use tracing::debug;

use crate::models::{Command, Reply, StatsResponse};
use crate::shared::SharedCache;

/// Runs replay commands against one cache.
#[derive(Debug, Clone)]
pub struct Replay {
    cache: SharedCache<String>,
}

impl Replay {
    pub fn new(cache: SharedCache<String>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SharedCache<String> {
        &self.cache
    }

    /// Executes one command.
    pub async fn execute(&self, command: Command) -> Reply {
        debug!(?command, "Executing replay command");

        match command {
            Command::Set { key, value, at } => {
                let len = match at {
                    Some(now) => self.cache.set_at(key.clone(), value, now).await,
                    None => self.cache.set(key.clone(), value).await,
                };
                Reply::Set { key, len }
            }
            Command::Get { key, at } => {
                let value = match at {
                    Some(now) => self.cache.get_at(&key, now).await,
                    None => self.cache.get(&key).await,
                };
                Reply::get(key, value)
            }
            Command::Full => Reply::Full {
                full: self.cache.is_full().await,
            },
            Command::Stats => Reply::Stats(StatsResponse::new(self.cache.stats().await)),
        }
    }
}
