/**
 * SocialHub Server Entry Point
 *
 * Loads configuration, initializes tracing and runs the server. Exits with
 * an error if the configuration is invalid or the database is unreachable.
 */

use socialhub::shared::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("[Server] Starting SocialHub");

    let config = AppConfig::load().map_err(|e| {
        tracing::error!("[Server] Invalid configuration: {}", e);
        e
    })?;

    socialhub::backend::server::run(config).await?;

    Ok(())
}
