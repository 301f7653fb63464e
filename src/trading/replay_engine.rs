//! Event replay engine.
//!
//! Feeds a JSON-lines file of `GatewayEvent`s into an `AutoTrader` backed by
//! the `PaperGateway`, one event at a time and strictly in file order. The
//! async side only reads lines and watches for Ctrl-C; each event is handled
//! synchronously to completion before the next line is awaited.

use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::gateway::{GatewayEvent, PaperGateway};
use crate::strategy::{AutoTrader, TraderConfig, TraderSnapshot};

/// Errors that end a replay early.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to open event file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Why the replay loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndOfInput,
    Disconnected,
    Interrupted,
}

/// Outcome of one replay run.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub events_processed: u64,
    pub malformed_lines: u64,
    pub stopped_by: StopReason,
    pub inserts: usize,
    pub cancels: usize,
    pub hedges: usize,
    /// Session fees in dollars (negative = net rebate)
    pub fees: Decimal,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: i64,
    pub trader: TraderSnapshot,
}

/// Replays recorded venue events against a paper trader.
pub struct ReplaySession {
    trader: AutoTrader<PaperGateway>,
    events_processed: u64,
    malformed_lines: u64,
}

impl ReplaySession {
    pub fn new(config: TraderConfig) -> Self {
        Self::with_trader(AutoTrader::new(config, PaperGateway::new()))
    }

    pub fn with_trader(trader: AutoTrader<PaperGateway>) -> Self {
        Self {
            trader,
            events_processed: 0,
            malformed_lines: 0,
        }
    }

    pub fn trader(&self) -> &AutoTrader<PaperGateway> {
        &self.trader
    }

    pub fn into_trader(self) -> AutoTrader<PaperGateway> {
        self.trader
    }

    /// Replay every event in the file at `path`.
    pub async fn run_file(&mut self, path: impl AsRef<Path>) -> Result<ReplaySummary, ReplayError> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|source| ReplayError::Open {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "Replaying events");
        self.run(BufReader::new(file)).await
    }

    /// Replay events from any line-oriented async reader.
    ///
    /// Blank lines and lines starting with `#` are skipped. Lines that do not
    /// parse as an event are logged and counted, never fatal.
    pub async fn run<R>(&mut self, reader: R) -> Result<ReplaySummary, ReplayError>
    where
        R: AsyncBufRead + Unpin,
    {
        let started_at = Utc::now();
        let mut lines = reader.lines();
        let mut line_no: u64 = 0;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let stopped_by = loop {
            let next = tokio::select! {
                next = lines.next_line() => next,
                _ = &mut ctrl_c => {
                    warn!(line = line_no, "Interrupted, stopping replay");
                    break StopReason::Interrupted;
                }
            };
            line_no += 1;

            let line = match next.map_err(|source| ReplayError::Read {
                line: line_no,
                source,
            })? {
                Some(line) => line,
                None => break StopReason::EndOfInput,
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match serde_json::from_str::<GatewayEvent>(trimmed) {
                Ok(event) => {
                    if self.apply(&event) {
                        break StopReason::Disconnected;
                    }
                }
                Err(e) => {
                    self.malformed_lines += 1;
                    warn!(line = line_no, error = %e, "Skipping malformed event");
                }
            }
        };

        let summary = self.summary(started_at, stopped_by);
        info!(
            events = summary.events_processed,
            malformed = summary.malformed_lines,
            stopped_by = ?summary.stopped_by,
            position = summary.trader.position,
            inserts = summary.inserts,
            cancels = summary.cancels,
            hedges = summary.hedges,
            fees = %summary.fees,
            "Replay finished"
        );
        Ok(summary)
    }

    /// Dispatch one event. Returns true when the session should stop.
    fn apply(&mut self, event: &GatewayEvent) -> bool {
        debug!(kind = event.kind(), "Dispatching event");
        event.dispatch(&mut self.trader);
        self.events_processed += 1;
        matches!(event, GatewayEvent::Disconnect)
    }

    fn summary(&self, started_at: DateTime<Utc>, stopped_by: StopReason) -> ReplaySummary {
        let gateway = self.trader.gateway();
        ReplaySummary {
            events_processed: self.events_processed,
            malformed_lines: self.malformed_lines,
            stopped_by,
            inserts: gateway.inserts().count(),
            cancels: gateway.cancels().count(),
            hedges: gateway.hedges().count(),
            fees: Decimal::new(self.trader.total_fees(), 2),
            started_at,
            elapsed_ms: (Utc::now() - started_at).num_milliseconds(),
            trader: self.trader.snapshot(),
        }
    }
}
