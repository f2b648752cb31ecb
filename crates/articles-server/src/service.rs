//! Article access: read-through caching and owner-gated mutation.
//!
//! Reads consult the cache first and fall back to the store, populating the
//! cache with a fixed TTL. Writes go to the store and then invalidate the
//! affected cache entries before returning:
//!
//! - create: every list page
//! - update: `article:{id}` and every list page
//! - remove: `article:{id}` and every list page
//!
//! List pages are invalidated as a group (key `articles` plus everything under
//! `articles:`), so any write makes every cached page stale regardless of
//! which filters it matched.
//!
//! A requester who does not own an article gets the same `NotFound` as for a
//! missing article.

use std::sync::Arc;
use std::time::Duration;

use articles_cache::Cache;
use articles_core::{
    ARTICLE_LIST_CACHE_KEY, ARTICLE_LIST_CACHE_PREFIX, Article, ArticleFilter, ArticleId,
    ArticlePatch, Identity, NewArticle, article_cache_key,
};
use articles_store::{ArticleStore, StoreError};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ApiError, ApiResult};

fn not_found(id: ArticleId) -> ApiError {
    ApiError::NotFound(format!("Article with ID {} not found", id))
}

/// Article operations over a store and a cache.
pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl ArticleService {
    pub fn new(store: Arc<dyn ArticleStore>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Persist a new article owned by `requester`.
    pub async fn create(&self, input: NewArticle, requester: &Identity) -> ApiResult<Article> {
        let article = self.store.create_article(&input, requester).await?;
        self.invalidate_lists().await?;

        tracing::info!(article_id = %article.id, user_id = %requester.id, "Article created");
        Ok(article)
    }

    /// One page of articles matching `filter`.
    pub async fn list(&self, filter: &ArticleFilter) -> ApiResult<Vec<Article>> {
        filter.validate()?;

        let key = filter.cache_key();
        if let Some(articles) = self.cached::<Vec<Article>>(&key).await {
            return Ok(articles);
        }

        let articles = self.store.find_articles(filter).await?;
        self.populate(&key, &articles).await;
        Ok(articles)
    }

    /// One article by id.
    pub async fn get(&self, id: ArticleId) -> ApiResult<Article> {
        let key = article_cache_key(id);
        if let Some(article) = self.cached::<Article>(&key).await {
            return Ok(article);
        }

        let article = self
            .store
            .find_article_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        self.populate(&key, &article).await;
        Ok(article)
    }

    /// Apply `patch` to an article owned by `requester`.
    pub async fn update(
        &self,
        id: ArticleId,
        patch: ArticlePatch,
        requester: &Identity,
    ) -> ApiResult<Article> {
        let current = self.owned(id, requester).await?;

        let updated = self
            .store
            .save_article(&patch.apply_to(current))
            .await
            .map_err(|e| match e {
                StoreError::ArticleNotFound(id) => not_found(id),
                other => other.into(),
            })?;

        self.invalidate_article(id).await?;
        self.invalidate_lists().await?;

        tracing::info!(article_id = %id, user_id = %requester.id, "Article updated");
        Ok(updated)
    }

    /// Delete an article owned by `requester`.
    pub async fn remove(&self, id: ArticleId, requester: &Identity) -> ApiResult<()> {
        self.owned(id, requester).await?;

        // A cached read can outlive the row; the store has the final say.
        let deleted = self.store.delete_article(id).await?;
        self.invalidate_article(id).await?;
        self.invalidate_lists().await?;

        if !deleted {
            return Err(not_found(id));
        }

        tracing::info!(article_id = %id, user_id = %requester.id, "Article deleted");
        Ok(())
    }

    async fn owned(&self, id: ArticleId, requester: &Identity) -> ApiResult<Article> {
        let article = self.get(id).await?;
        if !article.is_owned_by(requester.id) {
            tracing::debug!(
                article_id = %id,
                user_id = %requester.id,
                owner_id = %article.author_id(),
                "Requester does not own article"
            );
            return Err(not_found(id));
        }
        Ok(article)
    }

    /// Cached value for `key`. Backend errors and undecodable values count as misses.
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(cache_key = key, error = %e, "Cache read failed, using store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(cache_key = key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(cache_key = key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(cache_key = key, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, raw, self.ttl).await {
            tracing::warn!(cache_key = key, error = %e, "Cache populate failed");
        }
    }

    async fn invalidate_article(&self, id: ArticleId) -> ApiResult<()> {
        self.cache.delete(&article_cache_key(id)).await?;
        Ok(())
    }

    async fn invalidate_lists(&self) -> ApiResult<()> {
        self.cache.delete(ARTICLE_LIST_CACHE_KEY).await?;
        let removed = self.cache.delete_prefix(ARTICLE_LIST_CACHE_PREFIX).await?;
        tracing::debug!(removed, "Invalidated article list cache");
        Ok(())
    }
}

impl std::fmt::Debug for ArticleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
