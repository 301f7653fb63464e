//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the CLI verbosity is used as the
//! default directive. Trade events are logged under the `trades` target so
//! they can be filtered on their own (`RUST_LOG=trades=info`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Fails if a subscriber is already installed or the verbosity is not a
/// valid filter directive.
pub fn init_tracing(verbosity: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(verbosity)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }

    Ok(())
}
