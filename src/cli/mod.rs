//! CLI argument parsing using clap.
//!
//! This module defines the command-line interface for the autotrader,
//! including all subcommands and their arguments.

mod config;

pub use config::{resolve_trader_config, ReplayCliConfig};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pairs-trading autotrader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub verbose: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines file of venue events through a paper trader
    Replay {
        /// Path to the events file
        #[arg(long)]
        events: PathBuf,
        /// Path to a JSON trader configuration file
        #[arg(long, env = "AUTOTRADER_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the effective trader configuration as JSON
    ShowConfig {
        /// Path to a JSON trader configuration file
        #[arg(long, env = "AUTOTRADER_CONFIG")]
        config: Option<PathBuf>,
    },
}
