use thiserror::Error;

/// Failures inside a cache backend.
///
/// These never cross the `Cache` trait boundary: every implementation
/// swallows them and degrades to a cache miss or a no-op.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(#[from] redis::RedisError),
}
