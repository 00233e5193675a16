//! Age distribution report over the persisted users.

use crate::error::{StoreError, StoreResult};
use crate::repos::ReportRepo;
use crate::store::UserStore;
use roster_core::{AgeBucket, DistributionEntry, summarize};

/// Compute the age distribution of every persisted user.
///
/// Returns an empty list when no user has an age.
pub async fn age_distribution(store: &dyn UserStore) -> StoreResult<Vec<DistributionEntry>> {
    let rows = store.age_group_counts().await?;

    let mut counts = Vec::with_capacity(rows.len());
    for row in rows {
        let bucket: AgeBucket = row.age_group.parse().map_err(StoreError::Internal)?;
        let count = u64::try_from(row.count).map_err(|_| {
            StoreError::Internal(format!(
                "negative count {} for age group {}",
                row.count, row.age_group
            ))
        })?;
        counts.push((bucket, count));
    }

    Ok(summarize(counts))
}
