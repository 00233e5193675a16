//! User store trait and the SQLite implementation.

use crate::error::{StoreError, StoreResult};
use crate::models::AgeGroupCountRow;
use crate::repos::reports::AGE_GROUP_COUNTS;
use crate::repos::users::INSERT_USER_SQLITE;
use crate::repos::{ReportRepo, UserRepo};
use async_trait::async_trait;
use roster_core::UserRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// SQLite schema (embedded).
const SQLITE_SCHEMA: &str = include_str!("sqlite_schema.sql");

/// Combined user store trait.
#[async_trait]
pub trait UserStore: UserRepo + ReportRepo + Send + Sync {
    /// Create the users table if it does not exist yet.
    async fn migrate(&self) -> StoreResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> StoreResult<()>;
}

/// SQLite-based user store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) a SQLite database at `path`.
    pub async fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // A single connection serialises writers and avoids "database is locked".
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(path = %path.display(), "SQLite user store opened");
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SQLITE_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepo for SqliteStore {
    async fn insert_users(&self, users: &[UserRecord]) -> StoreResult<u64> {
        if users.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for (row, user) in users.iter().enumerate() {
            let result = sqlx::query(INSERT_USER_SQLITE)
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
impl ReportRepo for SqliteStore {
    async fn age_group_counts(&self) -> StoreResult<Vec<AgeGroupCountRow>> {
        let rows = sqlx::query_as::<_, AgeGroupCountRow>(AGE_GROUP_COUNTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
