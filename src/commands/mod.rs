//! CLI command handlers.
//!
//! This module contains the implementation for each CLI subcommand.

mod replay;
mod show_config;

pub use replay::run_replay;
pub use show_config::run_show_config;
