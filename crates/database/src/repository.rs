use crate::DbError;
use chrono::NaiveDate;
use core_types::{CompositionEntry, DailyRecord, PerformancePoint, StockMeta};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::sqlite::SqlitePool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

/// A selection candidate for one trading date: a ticker and its market cap.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub ticker: String,
    pub market_cap: f64,
}

/// A composition row joined with the stock's static metadata.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ConstituentRow {
    pub ticker: String,
    pub name: String,
    pub weight: f64,
    pub market_cap: f64,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// Close prices for one ticker on two trading dates, used for the
/// day-over-day return calculation.
#[derive(Debug, Clone, FromRow)]
pub struct PairedCloseRow {
    pub ticker: String,
    pub prev_close: f64,
    pub curr_close: f64,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Saves a stock's static metadata. Called by the ingestion pipeline;
    /// idempotent so re-ingesting the same universe is harmless.
    pub async fn save_stock(&self, stock: &StockMeta) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO stocks (ticker, name, sector, industry)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (ticker) DO UPDATE SET
                name = EXCLUDED.name,
                sector = EXCLUDED.sector,
                industry = EXCLUDED.industry
            "#,
        )
        .bind(&stock.ticker)
        .bind(&stock.name)
        .bind(&stock.sector)
        .bind(&stock.industry)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Saves one ticker's daily market data row. Idempotent on `(ticker, date)`.
    pub async fn save_daily_record(&self, record: &DailyRecord) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO daily_records (ticker, date, open, close, volume, market_cap)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (ticker, date) DO UPDATE SET
                open = EXCLUDED.open,
                close = EXCLUDED.close,
                volume = EXCLUDED.volume,
                market_cap = EXCLUDED.market_cap
            "#,
        )
        .bind(&record.ticker)
        .bind(record.date)
        .bind(record.open)
        .bind(record.close)
        .bind(record.volume)
        .bind(record.market_cap)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns the most recent date present in `daily_records`, or `None`
    /// if no market data has been ingested yet.
    pub async fn latest_record_date(&self) -> Result<Option<NaiveDate>, DbError> {
        let max_date = sqlx::query_scalar::<_, Option<NaiveDate>>(
            "SELECT MAX(date) FROM daily_records",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(max_date)
    }

    /// Fetches all distinct trading dates with market data in `[start, end]`,
    /// ascending.
    pub async fn trading_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, DbError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT date
            FROM daily_records
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }

    /// Fetches the top `limit` stocks by market cap for one trading date.
    ///
    /// Rows with a non-positive market cap never qualify. Ties are broken by
    /// ascending ticker so that rebuilds are deterministic.
    pub async fn top_candidates(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> Result<Vec<CandidateRow>, DbError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT ticker, market_cap
            FROM daily_records
            WHERE date = $1 AND market_cap > 0
            ORDER BY market_cap DESC, ticker ASC
            LIMIT $2
            "#,
        )
        .bind(date)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetches close prices for every ticker that has a row on both dates.
    ///
    /// Callers restrict the result to the ticker set they care about; that
    /// set-membership check happens in Rust rather than via an `IN (...)`
    /// list built by string formatting.
    pub async fn paired_closes(
        &self,
        prev_date: NaiveDate,
        curr_date: NaiveDate,
    ) -> Result<Vec<PairedCloseRow>, DbError> {
        let rows = sqlx::query_as::<_, PairedCloseRow>(
            r#"
            SELECT d1.ticker AS ticker,
                   d1.close AS prev_close,
                   d2.close AS curr_close
            FROM daily_records d1
            JOIN daily_records d2 ON d1.ticker = d2.ticker
            WHERE d1.date = $1 AND d2.date = $2
            "#,
        )
        .bind(prev_date)
        .bind(curr_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Deletes all composition and performance rows whose date lies in
    /// `[start, end]`. The first step of every destructive rebuild.
    pub async fn delete_index_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), DbError> {
        sqlx::query("DELETE FROM compositions WHERE date >= $1 AND date <= $2")
            .bind(start)
            .bind(end)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM performance WHERE date >= $1 AND date <= $2")
            .bind(start)
            .bind(end)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Upserts the full constituent set for one date within a single
    /// transaction, so a date's composition is never half-written.
    pub async fn upsert_compositions(
        &self,
        date: NaiveDate,
        entries: &[CompositionEntry],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO compositions (date, ticker, weight, market_cap)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (date, ticker) DO UPDATE SET
                    weight = EXCLUDED.weight,
                    market_cap = EXCLUDED.market_cap
                "#,
            )
            .bind(date)
            .bind(&entry.ticker)
            .bind(entry.weight)
            .bind(entry.market_cap)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Upserts one point of the index performance series.
    pub async fn upsert_performance(&self, point: &PerformancePoint) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO performance (date, value, daily_return, cumulative_return)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (date) DO UPDATE SET
                value = EXCLUDED.value,
                daily_return = EXCLUDED.daily_return,
                cumulative_return = EXCLUDED.cumulative_return
            "#,
        )
        .bind(point.date)
        .bind(point.value)
        .bind(point.daily_return)
        .bind(point.cumulative_return)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetches the performance series for `[start, end]`, ordered by date.
    pub async fn performance_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PerformancePoint>, DbError> {
        let points = sqlx::query_as::<_, PerformancePoint>(
            r#"
            SELECT date, value, daily_return, cumulative_return
            FROM performance
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(points)
    }

    /// Fetches the full composition for one date, joined with stock metadata
    /// and ordered by market cap descending.
    pub async fn composition_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ConstituentRow>, DbError> {
        let rows = sqlx::query_as::<_, ConstituentRow>(
            r#"
            SELECT c.ticker, s.name, c.weight, c.market_cap, s.sector, s.industry
            FROM compositions c
            JOIN stocks s ON c.ticker = s.ticker
            WHERE c.date = $1
            ORDER BY c.market_cap DESC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetches just the constituent tickers for one date.
    pub async fn composition_tickers(&self, date: NaiveDate) -> Result<Vec<String>, DbError> {
        let tickers = sqlx::query_scalar::<_, String>(
            "SELECT ticker FROM compositions WHERE date = $1",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickers)
    }

    /// Fetches all distinct dates with a stored composition in `[start, end]`,
    /// ascending.
    pub async fn composition_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, DbError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT date
            FROM compositions
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }
}
