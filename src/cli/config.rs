//! CLI configuration structs bridging CLI arguments to domain types.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::strategy::{ConfigError, TraderConfig};

/// Validated inputs for the `replay` command.
#[derive(Debug, Clone)]
pub struct ReplayCliConfig {
    pub events: PathBuf,
    pub trader: TraderConfig,
}

impl ReplayCliConfig {
    pub fn new(events: PathBuf, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            events,
            trader: resolve_trader_config(config_path)?,
        })
    }
}

/// Load the trader configuration from `path`, or fall back to the defaults.
pub fn resolve_trader_config(path: Option<&Path>) -> Result<TraderConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = TraderConfig::from_file(path)?;
            info!(path = %path.display(), "Loaded trader configuration");
            Ok(config)
        }
        None => Ok(TraderConfig::default()),
    }
}
