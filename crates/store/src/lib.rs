//! User store abstraction and implementations for roster.
//!
//! This crate owns everything that touches the `users` table:
//! - Transactional batch insert of user rows
//! - The grouped age query behind the distribution report
//! - PostgreSQL (production) and SQLite (development, tests) backends

pub mod error;
pub mod models;
pub mod postgres;
pub mod report;
pub mod repos;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use postgres::{PgPoolSettings, PostgresStore};
pub use report::age_distribution;
pub use repos::{ReportRepo, UserRepo};
pub use store::{SqliteStore, UserStore};

use roster_core::config::DatabaseConfig;
use std::sync::Arc;
use std::time::Duration;

/// Create a user store from configuration.
pub async fn from_config(config: &DatabaseConfig) -> StoreResult<Arc<dyn UserStore>> {
    match config {
        DatabaseConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn UserStore>)
        }
        DatabaseConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
            acquire_timeout_secs,
        } => {
            let settings = PgPoolSettings {
                max_connections: *max_connections,
                statement_timeout_ms: *statement_timeout_ms,
                acquire_timeout: Duration::from_secs(*acquire_timeout_secs),
            };
            let store = if let Some(url) = url {
                tracing::info!("Connecting to PostgreSQL using connection URL");
                PostgresStore::from_url(url, settings).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *ssl_mode,
                    settings,
                )
                .await?
            } else {
                return Err(StoreError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn UserStore>)
        }
    }
}
