use anyhow::Context;
use clap::Parser;
use tracing::info;

use meshcred::cli::{self, Cli, Commands};
use meshcred::config::ObservabilityConfig;
use meshcred::observability::init_tracing;
use meshcred::{APP_NAME, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    init_tracing(&ObservabilityConfig::from_env()).context("Failed to initialize logging")?;

    info!(app_name = APP_NAME, version = VERSION, "Starting meshcred");

    match cli.command {
        Commands::Run(args) => cli::run(args).await.context("Certificate manager failed")?,
        Commands::Check(args) => {
            cli::check(args).await.context("Certificate authority probe failed")?
        }
    }

    Ok(())
}
