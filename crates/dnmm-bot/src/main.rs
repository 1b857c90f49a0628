//! Delta-Neutral Market Maker - Entry Point
//!
//! Paper mode: quotes a margin-skewed ladder against a simulated
//! depth feed and hedges spot inventory drift on simulated futures.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Delta-neutral market maker (paper mode)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via DNMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dnmm_bot::init_logging()?;

    info!("Starting dnmm-bot v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > DNMM_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("DNMM_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = dnmm_bot::AppConfig::from_file(&config_path)?;
    info!(symbol = %config.engine.symbol, "Configuration loaded");

    let app = dnmm_bot::Application::new(config);
    app.run().await?;

    Ok(())
}
