//! The cache capability.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

/// Shared key-value store with per-entry TTL.
///
/// Values are opaque strings; callers choose the encoding. Implementations
/// must never return an entry whose TTL has elapsed. Deletes are
/// unconditional and idempotent: deleting a missing key succeeds.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a live entry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Insert or replace an entry that expires after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Remove one entry.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    async fn delete_prefix(&self, prefix: &str) -> CacheResult<u64>;
}
