//! # Index Engine
//!
//! The index construction and analytics core: builds daily equal-weighted
//! compositions and a performance series from raw market data, and serves
//! cached reads over the result.
//!
//! ## Architectural Principles
//!
//! - **Orchestration Layer:** This crate owns the index semantics. Durable
//!   state lives behind `database::DbRepository`, advisory caching behind
//!   the `cache::Cache` trait; both are injected at construction so tests
//!   can substitute in-memory implementations.
//! - **Store as Source of Truth:** No component keeps a long-lived in-memory
//!   copy of index state. Every operation re-derives from a fresh read plus
//!   the advisory cache; losing the cache changes latency, never results.
//!
//! ## Public API
//!
//! - `IndexBuilder`: destructive, idempotent rebuild of a date range.
//! - `PerformanceAggregator`: performance series plus summary statistics.
//! - `CompositionService`: single-date composition and day-over-day diffs.
//! - `CacheCoordinator`: post-rebuild cache invalidation policy.
//! - `IndexError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod builder;
pub mod composition;
pub mod error;
pub mod invalidation;
pub mod performance;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use builder::IndexBuilder;
pub use composition::CompositionService;
pub use error::IndexError;
pub use invalidation::CacheCoordinator;
pub use performance::PerformanceAggregator;
pub use report::{
    BuildOutcome, ChangedStock, ChangesResponse, CompositionChange, CompositionResponse,
    PerformanceResponse, PerformanceSummary,
};
