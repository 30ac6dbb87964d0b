//! # Social Feed
//!
//! Feed and social-interaction backend for a short-post network.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Document store (PostgreSQL pool or in-memory)
//! - HTTP server

use anyhow::Result;
use tracing::info;

use social_feed::config::Settings;
use social_feed::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    social_feed::telemetry::init_tracing();

    info!("Starting Social Feed...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        backend = ?settings.database.backend,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
