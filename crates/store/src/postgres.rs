//! PostgreSQL-based user store implementation.

use crate::error::{StoreError, StoreResult};
use crate::models::AgeGroupCountRow;
use crate::repos::reports::AGE_GROUP_COUNTS;
use crate::repos::users::INSERT_USER_PG;
use crate::repos::{ReportRepo, UserRepo};
use crate::store::UserStore;
use async_trait::async_trait;
use roster_core::UserRecord;
use roster_core::config::PgSslMode;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// Connection pool settings.
#[derive(Clone, Copy, Debug)]
pub struct PgPoolSettings {
    pub max_connections: u32,
    /// Server-side `statement_timeout`, if any.
    pub statement_timeout_ms: Option<u64>,
    pub acquire_timeout: Duration,
}

impl Default for PgPoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            statement_timeout_ms: None,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// PostgreSQL-based user store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(url: &str, settings: PgPoolSettings) -> StoreResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, settings).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    ///
    /// This allows the password to come from its own environment variable
    /// rather than being embedded in a URL.
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        settings: PgPoolSettings,
    ) -> StoreResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL with individual parameters"
        );

        Self::connect(opts, settings).await
    }

    async fn connect(mut opts: PgConnectOptions, settings: PgPoolSettings) -> StoreResult<Self> {
        if let Some(timeout_ms) = settings.statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn migrate(&self) -> StoreResult<()> {
        // Prepared statements hold a single statement each.
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepo for PostgresStore {
    async fn insert_users(&self, users: &[UserRecord]) -> StoreResult<u64> {
        if users.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for (row, user) in users.iter().enumerate() {
            let result = sqlx::query(INSERT_USER_PG)
                .bind(&user.name)
                .bind(user.age.as_deref())
                .bind(Json(&user.address))
                .bind(Json(&user.additional_info))
                .execute(&mut *tx)
                .await;

            if let Err(source) = result {
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(error = %e, "Rollback of failed user batch failed");
                }
                return Err(StoreError::Insert { row, source });
            }
        }

        tx.commit().await?;
        Ok(users.len() as u64)
    }

    async fn count_users(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ReportRepo for PostgresStore {
    async fn age_group_counts(&self) -> StoreResult<Vec<AgeGroupCountRow>> {
        let rows = sqlx::query_as::<_, AgeGroupCountRow>(AGE_GROUP_COUNTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
