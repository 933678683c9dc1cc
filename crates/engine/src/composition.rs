use crate::error::IndexError;
use crate::report::{ChangedStock, ChangesResponse, CompositionChange, CompositionResponse};
use cache::{Cache, keys};
use chrono::NaiveDate;
use database::{ConstituentRow, DbRepository};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Serves single-date compositions and day-over-day composition diffs,
/// both read-through cached.
pub struct CompositionService {
    repo: DbRepository,
    cache: Arc<dyn Cache>,
}

impl CompositionService {
    pub fn new(repo: DbRepository, cache: Arc<dyn Cache>) -> Self {
        Self { repo, cache }
    }

    /// Fetches the composition for one date, constituents ordered by market
    /// cap descending.
    pub async fn get_composition(&self, date: NaiveDate) -> Result<CompositionResponse, IndexError> {
        let key = keys::composition_key(date);
        if let Some(hit) = self.cache.get(&key).await {
            if let Ok(response) = serde_json::from_str::<CompositionResponse>(&hit) {
                debug!(%key, "composition cache hit");
                return Ok(response);
            }
        }

        let constituents = self.repo.composition_for_date(date).await?;
        if constituents.is_empty() {
            return Err(IndexError::NotFound("composition data", date.to_string()));
        }

        let response = CompositionResponse {
            date,
            total_stocks: constituents.len(),
            constituents,
        };

        if let Ok(body) = serde_json::to_string(&response) {
            self.cache.set(&key, &body).await;
        }
        Ok(response)
    }

    /// Diffs every consecutive pair of stored composition dates in
    /// `[start, end]`.
    ///
    /// Consecutive here means adjacent in the stored enumeration; the pair
    /// may span a calendar gap when the builder skipped dates in between.
    /// A change record is emitted only when at least one stock was added or
    /// removed.
    pub async fn get_composition_changes(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ChangesResponse, IndexError> {
        let key = keys::changes_key(start, end);
        if let Some(hit) = self.cache.get(&key).await {
            if let Ok(response) = serde_json::from_str::<ChangesResponse>(&hit) {
                debug!(%key, "changes cache hit");
                return Ok(response);
            }
        }

        let dates = self.repo.composition_dates(start, end).await?;
        if dates.is_empty() {
            return Err(IndexError::NotFound(
                "composition data",
                format!("{start} to {end}"),
            ));
        }

        let mut changes = Vec::new();
        let mut previous: Option<Vec<ConstituentRow>> = None;

        for date in dates {
            let current = self.repo.composition_for_date(date).await?;

            if let Some(prev) = &previous {
                let prev_tickers: HashSet<&str> =
                    prev.iter().map(|r| r.ticker.as_str()).collect();
                let curr_tickers: HashSet<&str> =
                    current.iter().map(|r| r.ticker.as_str()).collect();

                let added: Vec<ChangedStock> = current
                    .iter()
                    .filter(|r| !prev_tickers.contains(r.ticker.as_str()))
                    .map(changed_stock)
                    .collect();
                let removed: Vec<ChangedStock> = prev
                    .iter()
                    .filter(|r| !curr_tickers.contains(r.ticker.as_str()))
                    .map(changed_stock)
                    .collect();

                if !added.is_empty() || !removed.is_empty() {
                    changes.push(CompositionChange {
                        date,
                        added,
                        removed,
                    });
                }
            }

            previous = Some(current);
        }

        let response = ChangesResponse {
            start_date: start,
            end_date: end,
            total_change_dates: changes.len(),
            changes,
        };

        if let Ok(body) = serde_json::to_string(&response) {
            self.cache.set(&key, &body).await;
        }
        Ok(response)
    }
}

fn changed_stock(row: &ConstituentRow) -> ChangedStock {
    ChangedStock {
        ticker: row.ticker.clone(),
        name: row.name.clone(),
        market_cap: row.market_cap,
    }
}
