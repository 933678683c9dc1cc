use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub index: IndexSettings,
    pub cache: CacheSettings,
}

/// Parameters that define how the index itself is constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexSettings {
    /// Number of constituent stocks selected per trading day (the "N" in top-N).
    pub size: usize,
    /// The index value assigned to the first processed date of a build (e.g. 1000.0).
    pub base_value: f64,
    /// Minimum trading days of history required per ticker. Consumed by the
    /// external ingestion pipeline, not by the index engine.
    pub min_trading_days: u32,
}

/// Connection and lifetime settings for the read-through cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Redis connection URL, e.g. "redis://127.0.0.1:6379/0".
    pub redis_url: String,
    /// Process-wide default TTL applied to every cached query result.
    pub ttl_secs: u64,
}
