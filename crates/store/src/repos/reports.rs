//! Reporting repository trait.

use crate::error::StoreResult;
use crate::models::AgeGroupCountRow;
use async_trait::async_trait;

/// Grouped count of persisted users per age bucket. Rows without an age
/// are left out.
pub(crate) const AGE_GROUP_COUNTS: &str = r#"
    SELECT age_group, COUNT(*) AS count
    FROM (
        SELECT
            CASE
                WHEN age < 20 THEN '< 20'
                WHEN age >= 20 AND age <= 40 THEN '20 to 40'
                WHEN age > 40 AND age <= 60 THEN '40 to 60'
                ELSE '> 60'
            END AS age_group
        FROM users
        WHERE age IS NOT NULL
    ) AS grouped
    GROUP BY age_group
    ORDER BY age_group
"#;

/// Repository for read-only aggregate queries.
#[async_trait]
pub trait ReportRepo: Send + Sync {
    /// Count users per age bucket label.
    async fn age_group_counts(&self) -> StoreResult<Vec<AgeGroupCountRow>>;
}
