//! Error types for cache backends.

use thiserror::Error;

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while talking to a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The in-process map lock was poisoned by a panicking writer.
    #[error("cache lock poisoned")]
    LockPoisoned,

    /// Backend is unreachable or rejected the command.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// Redis error.
    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
