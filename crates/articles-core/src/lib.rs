//! articles-core: Core types for the Articles API
//!
//! This crate provides:
//! - Domain types (Identity, Article, NewArticle, ArticlePatch)
//! - Listing filters with pagination defaults
//! - Cache key derivation shared by the service and its tests

pub mod query;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use query::{
    ARTICLE_LIST_CACHE_KEY, ARTICLE_LIST_CACHE_PREFIX, ArticleFilter, DEFAULT_LIMIT,
    DEFAULT_PAGE, FilterError, MAX_LIMIT, article_cache_key,
};
pub use types::{Article, ArticleId, ArticlePatch, Identity, NewArticle, UserId};
