use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseResult, RetryConfig, retry_with_backoff};

/// Opens a pool with the given options.
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}

/// Opens a pool from config, retrying with exponential backoff.
///
/// `retry_config` defaults to [`PostgresConfig::retry_config`]. The last
/// connection error is returned as [`DatabaseError::Connection`](crate::DatabaseError).
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<DatabaseConnection> {
    let retry = retry_config.unwrap_or_else(|| config.retry_config());
    let options = config.into_connect_options();

    let db = retry_with_backoff(
        || {
            let opts = options.clone();
            connect_with_options(opts)
        },
        retry,
    )
    .await?;

    Ok(db)
}
