#![allow(dead_code)]

use cache::MemoryCache;
use chrono::NaiveDate;
use configuration::IndexSettings;
use core_types::{DailyRecord, StockMeta};
use database::{DbRepository, run_migrations};
use engine::{CacheCoordinator, IndexBuilder};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// A repository over a fresh in-memory database with the real schema.
///
/// A single pooled connection, kept alive for the pool's lifetime; with
/// `sqlite::memory:` every connection would otherwise get its own database.
pub async fn test_repo() -> DbRepository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    run_migrations(&pool).await.expect("failed to run migrations");
    DbRepository::new(pool)
}

pub fn test_cache() -> Arc<MemoryCache> {
    Arc::new(MemoryCache::new(Duration::from_secs(3600)))
}

pub fn index_settings(size: usize) -> IndexSettings {
    IndexSettings {
        size,
        base_value: 1000.0,
        min_trading_days: 30,
    }
}

pub fn builder(repo: &DbRepository, cache: Arc<MemoryCache>, size: usize) -> IndexBuilder {
    IndexBuilder::new(
        repo.clone(),
        CacheCoordinator::new(cache),
        &index_settings(size),
    )
}

pub fn d(s: &str) -> NaiveDate {
    s.parse().expect("bad date literal in test")
}

pub async fn seed_stock(repo: &DbRepository, ticker: &str, name: &str) {
    repo.save_stock(&StockMeta {
        ticker: ticker.to_string(),
        name: name.to_string(),
        sector: Some("Technology".to_string()),
        industry: Some("Software".to_string()),
    })
    .await
    .expect("failed to seed stock");
}

pub async fn seed_record(
    repo: &DbRepository,
    ticker: &str,
    date: &str,
    close: f64,
    market_cap: f64,
) {
    repo.save_daily_record(&DailyRecord {
        ticker: ticker.to_string(),
        date: d(date),
        open: Some(close),
        close,
        volume: Some(1_000_000),
        market_cap,
    })
    .await
    .expect("failed to seed daily record");
}

/// The reconstitution fixture: 3 tickers over 2 dates with N=2.
///
/// D1 top-2 is {A, B}; on D2, C overtakes B so the top-2 becomes {A, C}.
/// Closes move A +10% and B -5% across the two dates.
pub async fn seed_reconstitution_fixture(repo: &DbRepository) {
    seed_stock(repo, "AAA", "Alpha Corp").await;
    seed_stock(repo, "BBB", "Beta Inc").await;
    seed_stock(repo, "CCC", "Gamma Ltd").await;

    seed_record(repo, "AAA", "2024-01-02", 10.0, 100e9).await;
    seed_record(repo, "BBB", "2024-01-02", 20.0, 90e9).await;
    seed_record(repo, "CCC", "2024-01-02", 5.0, 10e9).await;

    seed_record(repo, "AAA", "2024-01-03", 11.0, 110e9).await;
    seed_record(repo, "BBB", "2024-01-03", 19.0, 50e9).await;
    seed_record(repo, "CCC", "2024-01-03", 5.5, 95e9).await;
}
