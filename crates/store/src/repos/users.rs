//! User repository trait.

use crate::error::StoreResult;
use async_trait::async_trait;
use roster_core::UserRecord;

/// Insert the user rows of one upload as a single transaction.
///
/// `age` is bound as text and cast to an integer by the database, so a
/// non-numeric age fails that row.
pub(crate) const INSERT_USER_PG: &str = r#"
    INSERT INTO users (name, age, address, additional_info)
    VALUES ($1, $2::text::integer, $3, $4)
"#;

/// SQLite variant of [`INSERT_USER_PG`]; the `STRICT` table performs the
/// integer coercion.
pub(crate) const INSERT_USER_SQLITE: &str = r#"
    INSERT INTO users (name, age, address, additional_info)
    VALUES (?, ?, ?, ?)
"#;

/// Repository for user rows.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert every record in one transaction.
    ///
    /// Either all rows are committed and their count returned, or none are:
    /// the first failing insert rolls the batch back and is reported as
    /// [`StoreError::Insert`](crate::StoreError::Insert).
    async fn insert_users(&self, users: &[UserRecord]) -> StoreResult<u64>;

    /// Count all persisted users.
    async fn count_users(&self) -> StoreResult<u64>;
}
