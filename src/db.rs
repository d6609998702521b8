//! Database connection and pool management.
//!
//! Initializes the SeaORM connection pool with configurable bounds and
//! applies schema migrations at startup.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AppConfig;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {source}")]
    ConnectionFailed {
        #[from]
        source: sea_orm::DbErr,
    },
    #[error("Invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

const CONNECT_ATTEMPTS: u32 = 5;
const FIRST_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Delay before retrying after the given failed attempt (1-based).
fn retry_delay(failed_attempt: u32) -> Duration {
    FIRST_RETRY_DELAY * 2u32.saturating_pow(failed_attempt.saturating_sub(1))
}

/// Opens the SeaORM pool described by `cfg`.
///
/// Connecting is retried with doubling delays so the API can start alongside
/// its database container.
///
/// ```no_run
/// use church_api::{config::AppConfig, db::init_pool};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::default();
///     let db = init_pool(&config).await?;
///     Ok(())
/// }
/// ```
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    if cfg.database_url.trim().is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "CHURCH_DATABASE_URL is empty".to_string(),
        }
        .into());
    }

    let mut opt = ConnectOptions::new(&cfg.database_url);
    opt.max_connections(cfg.db_max_connections)
        .min_connections(cfg.db_min_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .idle_timeout(Duration::from_millis(cfg.db_idle_timeout_ms))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let mut attempt = 1;
    loop {
        match Database::connect(opt.clone()).await {
            Ok(conn) => {
                tracing::info!(
                    attempt,
                    max_connections = cfg.db_max_connections,
                    "Church database pool ready"
                );
                return Ok(conn);
            }
            Err(source) if attempt >= CONNECT_ATTEMPTS => {
                tracing::error!(
                    attempts = attempt,
                    error = %source,
                    "Giving up on the church database"
                );
                return Err(DatabaseError::ConnectionFailed { source }.into());
            }
            Err(source) => {
                let delay = retry_delay(attempt);
                tracing::warn!(
                    attempt,
                    error = %source,
                    retry_in_ms = delay.as_millis() as u64,
                    "Church database unavailable"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Apply all pending schema migrations.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("Failed to apply database migrations")?;
    log::info!("Database migrations applied");
    Ok(())
}

/// Verifies that the connection is still usable.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    // `get_database_backend` panics on a disconnected handle.
    db.ping().await.context("Database health check failed")?;

    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    db.query_one(stmt)
        .await
        .context("Database health check failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_database_url() {
        let config = AppConfig {
            database_url: String::new(),
            ..AppConfig::default()
        };

        let result = init_pool(&config).await;

        assert!(matches!(
            result.unwrap_err().downcast::<DatabaseError>(),
            Ok(DatabaseError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_retry_delay_doubles() {
        let delays: Vec<u64> = (1..CONNECT_ATTEMPTS)
            .map(|attempt| retry_delay(attempt).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![100, 200, 400, 800]);
    }

    #[tokio::test]
    async fn test_unreachable_database_fails_after_retries() {
        let config = AppConfig {
            database_url: "sqlite:///nonexistent-dir/church.db?mode=ro".to_string(),
            ..AppConfig::default()
        };

        let result = init_pool(&config).await;

        assert!(matches!(
            result.unwrap_err().downcast::<DatabaseError>(),
            Ok(DatabaseError::ConnectionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_health_check_against_sqlite() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        assert!(health_check(&db).await.is_ok());
    }

    #[tokio::test]
    async fn test_health_check_fails_when_disconnected() {
        let db = DatabaseConnection::default();
        assert!(health_check(&db).await.is_err());
    }
}
