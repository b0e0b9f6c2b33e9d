/**
 * Server Configuration
 *
 * Database connection for startup. The realtime layer never queries the
 * database; the pool exists for the persistence collaborators and doubles
 * as a startup gate: the server does not listen until it is connected.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::backend::error::BackendError;
use crate::shared::{AppConfig, ConfigError};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect to Postgres using `DATABASE_URL`
///
/// # Errors
///
/// - `ConfigError::MissingValue` if no URL is configured
/// - `DatabaseError` if the connection cannot be established
pub async fn connect_database(config: &AppConfig) -> Result<PgPool, BackendError> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or(ConfigError::MissingValue("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}
