//! Replay commands
//!
//! Parses one whitespace-separated line into a [`Command`].

use std::str::FromStr;

use crate::error::CacheError;

/// A single replay instruction.
///
/// # Syntax
/// - `set <key> <value> [at_ms]`
/// - `get <key> [at_ms]`
/// - `full`
/// - `stats`
///
/// Without `at_ms` the wall clock is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        at: Option<u64>,
    },
    Get {
        key: String,
        at: Option<u64>,
    },
    Full,
    Stats,
}

impl Command {
    /// Returns true for lines the replay driver should skip.
    pub fn is_ignorable(line: &str) -> bool {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    }
}

impl FromStr for Command {
    type Err = CacheError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            ["set", key, value] => Ok(Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                at: None,
            }),
            ["set", key, value, at] => Ok(Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                at: Some(parse_time(at)?),
            }),
            ["get", key] => Ok(Command::Get {
                key: key.to_string(),
                at: None,
            }),
            ["get", key, at] => Ok(Command::Get {
                key: key.to_string(),
                at: Some(parse_time(at)?),
            }),
            ["full"] => Ok(Command::Full),
            ["stats"] => Ok(Command::Stats),
            [] => Err(CacheError::InvalidCommand("empty line".to_string())),
            [op @ ("set" | "get" | "full" | "stats"), ..] => Err(CacheError::InvalidCommand(
                format!("wrong number of arguments for '{}'", op),
            )),
            [op, ..] => Err(CacheError::InvalidCommand(format!(
                "unknown command '{}'",
                op
            ))),
        }
    }
}

fn parse_time(raw: &str) -> Result<u64, CacheError> {
    raw.parse()
        .map_err(|_| CacheError::InvalidCommand(format!("invalid timestamp '{}'", raw)))
}
