//! PrepZone — AI-driven disaster preparedness training game.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use prep_zone::cli::Cli;
use prep_zone::config::GeminiConfig;
use prep_zone::controller::GameController;
use prep_zone::gemini_client::GeminiClient;
use prep_zone::image_resolver::ImageResolver;
use prep_zone::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Log to a file; the TUI owns the terminal.
    let log_file = std::fs::File::create(&cli.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!(model = %cli.model, "Starting PrepZone");

    // A missing GEMINI_API_KEY is fatal: refuse to start rather than fail
    // on the first generation request.
    let config = GeminiConfig::from_env(&cli.model)?;
    let images = ImageResolver::new(cli.asset_base.clone());
    let client = GeminiClient::new(config, images);

    let mut controller = GameController::new(client);
    tui::run(&mut controller).await
}
