use crate::error::IndexError;
use crate::report::PerformanceResponse;
use crate::stats;
use cache::{Cache, keys};
use chrono::NaiveDate;
use database::DbRepository;
use std::sync::Arc;
use tracing::debug;

/// Serves the stored performance series with summary statistics,
/// read-through cached per `(start, end)` query.
pub struct PerformanceAggregator {
    repo: DbRepository,
    cache: Arc<dyn Cache>,
}

impl PerformanceAggregator {
    pub fn new(repo: DbRepository, cache: Arc<dyn Cache>) -> Self {
        Self { repo, cache }
    }

    pub async fn get_performance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PerformanceResponse, IndexError> {
        let key = keys::performance_key(start, end);
        if let Some(hit) = self.cache.get(&key).await {
            // An unreadable payload (e.g. written by an older build) is
            // just a miss; the store remains the source of truth.
            if let Ok(response) = serde_json::from_str::<PerformanceResponse>(&hit) {
                debug!(%key, "performance cache hit");
                return Ok(response);
            }
        }

        let points = self.repo.performance_range(start, end).await?;
        if points.is_empty() {
            return Err(IndexError::NotFound(
                "performance data",
                format!("{start} to {end}"),
            ));
        }

        let summary = stats::summarize(&points);
        let response = PerformanceResponse {
            start_date: start,
            end_date: end,
            total_days: points.len(),
            points,
            summary,
        };

        if let Ok(body) = serde_json::to_string(&response) {
            self.cache.set(&key, &body).await;
        }
        Ok(response)
    }
}
