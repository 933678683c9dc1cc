use cache::{Cache, keys};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Invalidation policy invoked by the builder after every rebuild.
///
/// Range-keyed query results (performance, changes) are invalidated
/// coarsely: the whole namespace is dropped regardless of overlap with the
/// rebuilt range. Precise invalidation would require indexing cache keys by
/// range overlap; dropping the namespace guarantees correctness cheaply at
/// the cost of extra cache churn. Composition entries are keyed by a single
/// date, so those are deleted day by day.
pub struct CacheCoordinator {
    cache: Arc<dyn Cache>,
}

impl CacheCoordinator {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    pub async fn invalidate_for_rebuild(&self, start: NaiveDate, end: NaiveDate) {
        self.cache.delete_pattern(keys::PERFORMANCE_PATTERN).await;

        // Every calendar day in the range, not just trading days: a date's
        // cached (possibly empty) composition may predate the rebuild.
        let mut day = start;
        while day <= end {
            self.cache.delete(&keys::composition_key(day)).await;
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        self.cache.delete_pattern(keys::CHANGES_PATTERN).await;

        info!(%start, %end, "invalidated cached index queries after rebuild");
    }
}
