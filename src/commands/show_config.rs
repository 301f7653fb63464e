//! Show-config command handler.

use std::path::PathBuf;

use crate::cli::resolve_trader_config;

/// Print the effective configuration, including the derived hedge prices.
pub fn run_show_config(config: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_trader_config(config.as_deref())?;

    let mut value = serde_json::to_value(&config)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("hedge_sell_price".into(), config.hedge_sell_price().into());
        map.insert("hedge_buy_price".into(), config.hedge_buy_price().into());
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
