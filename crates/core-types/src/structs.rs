use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Static descriptive metadata for a listed stock.
///
/// Written by the external ingestion pipeline; the index core only ever
/// reads this table (to attach names/sectors to composition rows).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct StockMeta {
    pub ticker: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// One ticker's raw market data for a single trading day.
///
/// The composite key is `(ticker, date)`. Market cap drives index selection;
/// close prices drive the return calculation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct DailyRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub close: f64,
    pub volume: Option<i64>,
    pub market_cap: f64,
}

/// A single constituent of the index composition for one date.
///
/// For an index of size N every entry carries weight `1/N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub ticker: String,
    pub weight: f64,
    pub market_cap: f64,
}

/// One point of the index performance series.
///
/// The series chains multiplicatively: the first point of a build has
/// `value == base_value` and `daily_return == 0`, and every later point
/// satisfies `value == previous.value * (1 + daily_return)`. Returns are
/// fractions (0.01 == 1%), not percentages.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub value: f64,
    pub daily_return: f64,
    pub cumulative_return: f64,
}
