//! Listing filters and cache key derivation.
//!
//! Cache keys live next to the filter so that every component derives
//! them the same way:
//!
//! - `article:{id}` for a single article
//! - `articles:{page}:{limit}:{author}:{published_after}` for a list page
//!
//! Every list key starts with [`ARTICLE_LIST_CACHE_PREFIX`], which is what
//! aggregate invalidation deletes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ArticleId, UserId};

/// Default page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Aggregate key for the article list cache.
pub const ARTICLE_LIST_CACHE_KEY: &str = "articles";

/// Prefix shared by every list-page cache key.
pub const ARTICLE_LIST_CACHE_PREFIX: &str = "articles:";

/// Cache key for a single article.
pub fn article_cache_key(id: ArticleId) -> String {
    format!("article:{}", id)
}

/// Filters and pagination for listing articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFilter {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Only articles owned by this user.
    pub author: Option<UserId>,
    /// Only articles published strictly after this instant.
    pub published_after: Option<DateTime<Utc>>,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            author: None,
            published_after: None,
        }
    }
}

impl ArticleFilter {
    /// A filter for the given page with no author or date restriction.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    /// Restrict to one author.
    pub fn with_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    /// Restrict to articles published after `after`.
    pub fn with_published_after(mut self, after: DateTime<Utc>) -> Self {
        self.published_after = Some(after);
        self
    }

    /// Check page and limit bounds.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.page < 1 {
            return Err(FilterError::InvalidPage(self.page));
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(FilterError::InvalidLimit(self.limit));
        }
        Ok(())
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }

    /// Deterministic cache key for the exact filter tuple.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let author = self
            .author
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let published = self
            .published_after
            .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{}{}:{}:{}:{}",
            ARTICLE_LIST_CACHE_PREFIX, self.page, self.limit, author, published
        )
    }
}

/// Invalid listing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    InvalidPage(u32),
    InvalidLimit(u32),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPage(p) => write!(f, "page must be at least 1, got {}", p),
            Self::InvalidLimit(l) => {
                write!(f, "limit must be between 1 and {}, got {}", MAX_LIMIT, l)
            }
        }
    }
}

impl std::error::Error for FilterError {}
