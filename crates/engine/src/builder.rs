use crate::error::IndexError;
use crate::invalidation::CacheCoordinator;
use crate::report::BuildOutcome;
use chrono::NaiveDate;
use configuration::IndexSettings;
use core_types::{CompositionEntry, PerformancePoint};
use database::DbRepository;
use std::collections::HashSet;
use tracing::{info, warn};

/// Rebuilds compositions and the performance series for a date range.
///
/// A rebuild is destructive and idempotent: existing rows in the range are
/// deleted first, then every trading date is re-selected from the raw daily
/// records. The delete-then-reinsert sequence is not wrapped in a single
/// transaction, so a concurrent reader can observe a partially rebuilt
/// range (each individual date's composition is still written atomically).
/// Concurrent rebuilds of overlapping ranges are unguarded.
pub struct IndexBuilder {
    repo: DbRepository,
    coordinator: CacheCoordinator,
    index_size: usize,
    base_value: f64,
}

impl IndexBuilder {
    pub fn new(
        repo: DbRepository,
        coordinator: CacheCoordinator,
        settings: &IndexSettings,
    ) -> Self {
        Self {
            repo,
            coordinator,
            index_size: settings.size,
            base_value: settings.base_value,
        }
    }

    /// Builds the equal-weighted index for `[start, end]`.
    ///
    /// When `end` is omitted it resolves to the latest ingested date. Dates
    /// with fewer than N qualifying stocks are skipped with a warning and
    /// excluded from `dates_processed`.
    pub async fn build(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<BuildOutcome, IndexError> {
        let end = match end {
            Some(end) => end,
            None => self
                .repo
                .latest_record_date()
                .await?
                .ok_or_else(|| IndexError::NoData("any date (no records ingested)".to_string()))?,
        };

        info!(%start, %end, "rebuilding index");

        self.repo.delete_index_range(start, end).await?;

        let trading_dates = self.repo.trading_dates(start, end).await?;
        if trading_dates.is_empty() {
            return Err(IndexError::NoData(format!("{start} to {end}")));
        }

        let weight = 1.0 / self.index_size as f64;
        let mut previous_value = self.base_value;
        let mut first_processed = true;
        let mut dates_processed = 0usize;

        for (i, date) in trading_dates.iter().enumerate() {
            let candidates = self.repo.top_candidates(*date, self.index_size as i64).await?;
            if candidates.len() < self.index_size {
                warn!(
                    date = %date,
                    available = candidates.len(),
                    required = self.index_size,
                    "not enough qualifying stocks, skipping date"
                );
                continue;
            }

            let entries: Vec<CompositionEntry> = candidates
                .into_iter()
                .map(|c| CompositionEntry {
                    ticker: c.ticker,
                    weight,
                    market_cap: c.market_cap,
                })
                .collect();
            self.repo.upsert_compositions(*date, &entries).await?;

            // A day's return belongs to the portfolio held going into it:
            // the composition selected on the previous trading date, not the
            // one just re-selected. Pricing with same-day membership would
            // introduce look-ahead bias.
            let (value, daily_return) = if first_processed {
                (self.base_value, 0.0)
            } else {
                let r = self.daily_return(trading_dates[i - 1], *date).await?;
                (previous_value * (1.0 + r), r)
            };

            self.repo
                .upsert_performance(&PerformancePoint {
                    date: *date,
                    value,
                    daily_return,
                    cumulative_return: value / self.base_value - 1.0,
                })
                .await?;

            previous_value = value;
            first_processed = false;
            dates_processed += 1;
        }

        self.coordinator.invalidate_for_rebuild(start, end).await;

        info!(dates_processed, "index rebuild complete");
        Ok(BuildOutcome {
            dates_processed,
            start_date: start,
            end_date: end,
        })
    }

    /// Equal-weighted mean of `curr_close / prev_close - 1` over the tickers
    /// in the previous trading date's composition that have close prices on
    /// both dates. 0 when the previous composition is empty (e.g. the
    /// previous date was skipped) or no constituent has both prices.
    async fn daily_return(
        &self,
        prev_date: NaiveDate,
        curr_date: NaiveDate,
    ) -> Result<f64, IndexError> {
        let prev_tickers: HashSet<String> = self
            .repo
            .composition_tickers(prev_date)
            .await?
            .into_iter()
            .collect();
        if prev_tickers.is_empty() {
            return Ok(0.0);
        }

        let paired = self.repo.paired_closes(prev_date, curr_date).await?;
        let returns: Vec<f64> = paired
            .iter()
            .filter(|p| prev_tickers.contains(&p.ticker) && p.prev_close > 0.0)
            .map(|p| p.curr_close / p.prev_close - 1.0)
            .collect();

        if returns.is_empty() {
            return Ok(0.0);
        }
        Ok(returns.iter().sum::<f64>() / returns.len() as f64)
    }
}
