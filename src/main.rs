use autotrader::cli::{Cli, Commands};
use autotrader::commands::{run_replay, run_show_config};
use autotrader::observability::init_tracing;
use clap::Parser;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables (AUTOTRADER_CONFIG, RUST_LOG) from .env
    dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Replay { events, config } => run_replay(events, config).await?,
        Commands::ShowConfig { config } => run_show_config(config)?,
    }

    Ok(())
}
