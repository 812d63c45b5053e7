//! `mastermind` binary entry point.
use anyhow::{Context, Result};
use mastermind_cli::{Config, Controller, HttpGameApi, Outcome};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = Config::from_env();
    tracing::info!(base_url = %config.base_url, timeout = ?config.request_timeout, "starting");

    let api = HttpGameApi::new(&config).context("failed to build HTTP client")?;
    let mut controller = Controller::new(api, std::io::stdout());
    let outcome = controller
        .run(BufReader::new(tokio::io::stdin()))
        .await
        .context("terminal I/O failed")?;

    if outcome == Outcome::CreationFailed {
        // Nothing to play and nothing to clean up; stay alive without
        // prompting. Interrupt to quit.
        tracing::warn!("no game was created, idling");
        return std::future::pending().await;
    }

    std::process::exit(0)
}

/// Log to stderr so the game transcript on stdout stays clean.
fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
