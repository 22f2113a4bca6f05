//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is shared by
//! every concurrent operation; nothing here serializes access to a row.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// How long to wait for a free connection before failing the call.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a PostgreSQL connection pool and verify it can connect.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_idle)
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_idle = config.min_idle,
        "database pool ready"
    );
    Ok(pool)
}
