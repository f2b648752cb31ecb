//! In-process cache with per-entry expiry.
//!
//! ## Features
//!
//! - Thread-safe access via `Arc<RwLock<>>`; clones share state
//! - Expired entries are never returned, even before they are swept
//! - Optional background sweeper that evicts expired entries
//!
//! Expiry uses `tokio::time::Instant`, so tests can drive it with a paused
//! clock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::cache::Cache;
use crate::error::{CacheError, CacheResult};

/// Shortest sweep period; shorter requests are raised to this.
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

/// A cached value with its deadline.
#[derive(Debug, Clone)]
struct CachedValue {
    value: String,
    expires_at: Instant,
}

impl CachedValue {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe in-memory cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CachedValue>>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        if let Ok(mut entries) = self.entries.write() {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(now));
            before - entries.len()
        } else {
            0
        }
    }

    /// Spawn a task that calls [`evict_expired`](Self::evict_expired) every `period`.
    ///
    /// The task runs until the returned handle is aborted or the runtime stops.
    /// Periods below [`MIN_SWEEP_PERIOD`] are raised to it.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        let period = period.max(MIN_SWEEP_PERIOD);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = cache.evict_expired();
                if evicted > 0 {
                    tracing::debug!(evicted, "Evicted expired cache entries");
                }
            }
        })
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        entries.insert(key.to_string(), CachedValue::new(value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> CacheResult<u64> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn set_get() {
        let cache = MemoryCache::new();
        cache.set("article:1", "one".to_string(), TTL).await.unwrap();

        assert_eq!(cache.get("article:1").await.unwrap().as_deref(), Some("one"));
        assert_eq!(cache.get("article:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_replaces_existing() {
        let cache = MemoryCache::new();
        cache.set("k", "old".to_string(), TTL).await.unwrap();
        cache.set("k", "new".to_string(), TTL).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), TTL).await.unwrap();

        cache.delete("k").await.unwrap();
        cache.delete("k").await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn delete_prefix_removes_only_matching_keys() {
        let cache = MemoryCache::new();
        cache.set("articles:1:10:-:-", "a".to_string(), TTL).await.unwrap();
        cache.set("articles:2:10:-:-", "b".to_string(), TTL).await.unwrap();
        cache.set("article:1", "c".to_string(), TTL).await.unwrap();

        let removed = cache.delete_prefix("articles:").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("article:1").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_secs(10))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(cache.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("k").await.unwrap().is_none());

        // Still stored until swept
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.evict_expired(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_evicts_expired_entries() {
        let cache = MemoryCache::new();
        cache
            .set("short", "v".to_string(), Duration::from_secs(1))
            .await
            .unwrap();
        cache.set("long", "v".to_string(), TTL).await.unwrap();

        let handle = cache.spawn_sweeper(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(cache.len(), 1);
        assert!(cache.get("long").await.unwrap().is_some());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_with_zero_period_keeps_running() {
        let cache = MemoryCache::new();
        cache
            .set("short", "v".to_string(), Duration::from_millis(500))
            .await
            .unwrap();

        let handle = cache.spawn_sweeper(Duration::ZERO);
        tokio::time::sleep(MIN_SWEEP_PERIOD * 2).await;

        assert!(!handle.is_finished());
        assert!(cache.is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let cache1 = MemoryCache::new();
        let cache2 = cache1.clone();

        cache1.set("k", "v".to_string(), TTL).await.unwrap();
        assert!(cache2.get("k").await.unwrap().is_some());

        cache2.clear();
        assert!(cache1.is_empty());
    }
}
