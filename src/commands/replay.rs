//! Replay command handler.
//!
//! Implements the `replay` subcommand: drives a paper trader from a recorded
//! event file and prints the summary as JSON.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::ReplayCliConfig;
use crate::metrics;
use crate::trading::ReplaySession;

/// Run a replay of `events` with the configuration at `config` (or defaults).
///
/// # Errors
/// Returns error if the configuration is invalid or the events file cannot be read.
pub async fn run_replay(
    events: PathBuf,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cli = ReplayCliConfig::new(events, config.as_deref())?;

    let mut session = ReplaySession::new(cli.trader);
    let summary = session.run_file(&cli.events).await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    debug!(metrics = %metrics::gather_metrics(), "Final metrics");
    Ok(())
}
