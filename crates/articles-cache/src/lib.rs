//! articles-cache: Cache layer for the Articles API
//!
//! This crate provides:
//! - The `Cache` capability (get / set with TTL / delete / delete by prefix)
//! - `MemoryCache`, an in-process implementation
//! - `RedisCache`, behind the `redis` feature
//!
//! The cache is never authoritative: every value in it is derived from the
//! store and may be deleted at any time.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use articles_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! cache.set("article:1", json, Duration::from_secs(60)).await?;
//! let hit = cache.get("article:1").await?;
//! cache.delete_prefix("articles:").await?;
//! ```

pub mod cache;
pub mod error;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_cache;

pub use cache::Cache;
pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;
