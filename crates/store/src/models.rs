//! Database models mapping to the users schema.

use sqlx::FromRow;

/// One group of the age distribution query.
#[derive(Debug, Clone, FromRow)]
pub struct AgeGroupCountRow {
    pub age_group: String,
    pub count: i64,
}
