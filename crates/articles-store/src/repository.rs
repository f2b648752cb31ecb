//! Storage contracts used by the application layer.
//!
//! Two traits cover the persistent state of the system:
//!
//! - [`UserStore`]: identity lookup and registration, keyed by email
//! - [`ArticleStore`]: article CRUD with owner linkage and filtered listing
//!
//! Both are object safe so the server can hold them as `Arc<dyn ...>` and
//! swap the PostgreSQL [`Store`](crate::Store) for the in-memory
//! [`MemoryStore`](crate::MemoryStore) in tests.

use articles_core::{Article, ArticleFilter, ArticleId, Identity, NewArticle, UserId};
use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::UserRow;

/// Identity persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>>;

    /// Look up a user by id.
    async fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<UserRow>>;

    /// Register a new user.
    ///
    /// Fails with `StoreError::DuplicateEmail` if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<UserRow>;
}

/// Article persistence.
///
/// Every returned [`Article`] carries its owner's id and email, never any
/// other owner field.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert a new article owned by `author`.
    async fn create_article(&self, input: &NewArticle, author: &Identity) -> StoreResult<Article>;

    /// Fetch one article.
    async fn find_article_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>>;

    /// Fetch one page of articles matching `filter`, ordered by id.
    ///
    /// The published filter is strict (`published_at > value`).
    async fn find_articles(&self, filter: &ArticleFilter) -> StoreResult<Vec<Article>>;

    /// Persist the mutable fields of an existing article.
    ///
    /// The owner column is never written.
    async fn save_article(&self, article: &Article) -> StoreResult<Article>;

    /// Delete an article. Returns false if it did not exist.
    async fn delete_article(&self, id: ArticleId) -> StoreResult<bool>;
}
