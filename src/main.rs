//! Ledger Cache - replay driver
//!
//! Reads cache commands from stdin, one per line, and prints a JSON reply for
//! each on stdout. Logs go to stderr.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_cache::models::{Command, ErrorResponse};
use ledger_cache::{Config, Replay, SharedCache};

/// Main entry point for the replay driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the shared cache
/// 4. Replay stdin until EOF or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledger_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting ledger cache replay");

    let config = Config::from_env();
    config
        .validate()
        .context("refusing to start with invalid configuration")?;
    info!(
        "Configuration loaded: capacity={}, ttl={}ms, scrub_interval={}ms",
        config.capacity, config.ttl_ms, config.scrub_interval_ms
    );

    let replay = Replay::new(SharedCache::from_config(&config));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut executed = 0usize;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping replay...");
                None
            }
        };
        let Some(line) = line else { break };

        if Command::is_ignorable(&line) {
            continue;
        }

        let output = match line.parse::<Command>() {
            Ok(command) => {
                executed += 1;
                serde_json::to_string(&replay.execute(command).await)?
            }
            Err(err) => {
                warn!(line = %line, "Skipping malformed line: {}", err);
                serde_json::to_string(&ErrorResponse::new(err.to_string()))?
            }
        };

        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;

    let stats = replay.cache().stats().await;
    info!(
        executed,
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        expirations = stats.expirations,
        "Replay complete"
    );

    Ok(())
}
