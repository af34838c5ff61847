//! Brandwright Daemon - brand content generation service
//!
//! Normalizes form submissions, renders prompts and forwards them to the
//! configured generative-text provider.

use anyhow::Result;
use brandwright_common::Config;
use brandwrightd::server::{self, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Brandwright Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    let state = AppState::from_config(&config, config.resolve_api_key())?;

    server::run(state, &config.server).await?;

    info!("Brandwright Daemon stopped");
    Ok(())
}
