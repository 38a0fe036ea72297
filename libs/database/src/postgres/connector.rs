use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Connect with custom connection options
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}

/// Connect from config, retrying with exponential backoff on failure
///
/// Used at startup when the database may come up after the service. Once
/// retries are exhausted the last driver error is returned as
/// [`DatabaseError::ConnectionFailed`].
///
/// # Example
/// ```ignore
/// use database::postgres::{PostgresConfig, connect_from_config_with_retry};
/// use database::common::RetryConfig;
///
/// let config = PostgresConfig::from_env()?;
/// let retry = RetryConfig::new().with_max_retries(10);
/// let db = connect_from_config_with_retry(config, Some(retry)).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<DatabaseConnection> {
    info!(url = %config.redacted_url(), "Connecting to PostgreSQL");
    let options = config.into_connect_options();

    retry_with_backoff(
        "PostgreSQL connect",
        || connect_with_options(options.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
    .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Close the pool, waiting for checked-out connections to be returned
pub async fn close(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("PostgreSQL connection pool closed"),
        Err(e) => warn!(error = %e, "Failed to close PostgreSQL connection pool"),
    }
}
