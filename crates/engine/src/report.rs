use chrono::NaiveDate;
use core_types::PerformancePoint;
use database::ConstituentRow;
use serde::{Deserialize, Serialize};

/// The result of one index rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOutcome {
    /// Dates actually written. May be less than the trading-date count when
    /// some dates lacked enough qualifying stocks.
    pub dates_processed: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Summary statistics over one retrieved performance series (not the whole
/// history). All fields are 0 when the series has fewer than 2 points,
/// except `total_return` which is the last point's cumulative return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub average_daily_return: f64,
    /// Sample standard deviation (N-1) of the daily returns.
    pub volatility: f64,
    pub max_daily_return: f64,
    pub min_daily_return: f64,
    /// Annualized over 252 trading days against a fixed 2% risk-free rate.
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: usize,
    pub points: Vec<PerformancePoint>,
    pub summary: PerformanceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionResponse {
    pub date: NaiveDate,
    pub total_stocks: usize,
    /// Constituents ordered by market cap descending.
    pub constituents: Vec<ConstituentRow>,
}

/// A stock that entered or left the index on a change date. The market cap
/// is taken from the composition row of the date the stock is present on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedStock {
    pub ticker: String,
    pub name: String,
    pub market_cap: f64,
}

/// The delta between one stored composition and the previous one.
/// Only emitted when at least one of the two lists is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionChange {
    pub date: NaiveDate,
    pub added: Vec<ChangedStock>,
    pub removed: Vec<ChangedStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangesResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_change_dates: usize,
    pub changes: Vec<CompositionChange>,
}
