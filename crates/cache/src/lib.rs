//! # Index Cache Crate
//!
//! Best-effort caching for index query results. The cache is advisory only:
//! losing it must never change results, only latency.
//!
//! ## Architectural Principles
//!
//! - **Adapter Layer:** Encapsulates the cache backend behind the small
//!   `Cache` trait so the engine can be wired with Redis in production and
//!   an in-process map in tests.
//! - **Never Fatal:** Every backend failure degrades to a cache miss or a
//!   no-op with a warning log. No error type escapes this crate's trait.
//!
//! ## Public API
//!
//! - `Cache`: The trait the engine's read paths and the cache coordinator
//!   are written against.
//! - `RedisCache` / `MemoryCache`: The two implementations.
//! - `keys`: Builders for the three cache-key namespaces.

use async_trait::async_trait;

pub mod error;
pub mod keys;
pub mod memory;
pub mod redis;

pub use error::CacheError;
pub use memory::MemoryCache;
pub use self::redis::RedisCache;

/// Get/set/delete with a process-wide default TTL.
///
/// Values are full serialized response payloads. Implementations must treat
/// every backend failure as a miss (`get`) or a no-op (everything else).
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` with the implementation's default TTL.
    async fn set(&self, key: &str, value: &str);

    async fn delete(&self, key: &str);

    /// Deletes every key matching `pattern` (trailing-`*` glob).
    async fn delete_pattern(&self, pattern: &str);
}
