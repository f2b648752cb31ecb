//! In-memory store.
//!
//! Implements the same contracts as the PostgreSQL store with the same
//! observable behavior: sequential ids starting at 1, unique emails, owner
//! must exist, listing ordered by id with strict published filter.
//! Used by tests and by the server when `STORE_BACKEND=memory`.

use std::collections::BTreeMap;

use articles_core::{Article, ArticleFilter, ArticleId, Identity, NewArticle, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::UserRow;
use crate::repository::{ArticleStore, UserStore};

/// Article as stored: owner by id only, email joined on read.
#[derive(Debug, Clone)]
struct StoredArticle {
    title: String,
    description: String,
    published_at: DateTime<Utc>,
    author_id: i64,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, UserRow>,
    articles: BTreeMap<i64, StoredArticle>,
    next_user_id: i64,
    next_article_id: i64,
}

impl State {
    fn join(&self, id: i64, stored: &StoredArticle) -> StoreResult<Article> {
        let owner = self
            .users
            .get(&stored.author_id)
            .ok_or(StoreError::UserNotFound(UserId(stored.author_id)))?;

        Ok(Article {
            id: ArticleId(id),
            title: stored.title.clone(),
            description: stored.description.clone(),
            published_at: stored.published_at,
            author: owner.identity(),
        })
    }
}

/// Store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored articles.
    pub async fn article_count(&self) -> usize {
        self.state.read().await.articles.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<UserRow>> {
        Ok(self.state.read().await.users.get(&id.get()).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<UserRow> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        state.next_user_id += 1;
        let row = UserRow {
            id: state.next_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created: Utc::now(),
        };
        state.users.insert(row.id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn create_article(&self, input: &NewArticle, author: &Identity) -> StoreResult<Article> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&author.id.get()) {
            return Err(StoreError::UserNotFound(author.id));
        }

        state.next_article_id += 1;
        let id = state.next_article_id;
        let stored = StoredArticle {
            title: input.title.clone(),
            description: input.description.clone(),
            published_at: input.published_at,
            author_id: author.id.get(),
        };
        let article = state.join(id, &stored)?;
        state.articles.insert(id, stored);
        Ok(article)
    }

    async fn find_article_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>> {
        let state = self.state.read().await;
        state
            .articles
            .get(&id.get())
            .map(|stored| state.join(id.get(), stored))
            .transpose()
    }

    async fn find_articles(&self, filter: &ArticleFilter) -> StoreResult<Vec<Article>> {
        let state = self.state.read().await;
        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);

        state
            .articles
            .iter()
            .filter(|(_, a)| filter.author.is_none_or(|author| a.author_id == author.get()))
            .filter(|(_, a)| {
                filter
                    .published_after
                    .is_none_or(|after| a.published_at > after)
            })
            .skip(offset)
            .take(filter.limit as usize)
            .map(|(id, stored)| state.join(*id, stored))
            .collect()
    }

    async fn save_article(&self, article: &Article) -> StoreResult<Article> {
        let mut state = self.state.write().await;
        let id = article.id.get();

        let stored = state
            .articles
            .get_mut(&id)
            .ok_or(StoreError::ArticleNotFound(article.id))?;
        stored.title = article.title.clone();
        stored.description = article.description.clone();
        stored.published_at = article.published_at;

        let stored = stored.clone();
        state.join(id, &stored)
    }

    async fn delete_article(&self, id: ArticleId) -> StoreResult<bool> {
        Ok(self.state.write().await.articles.remove(&id.get()).is_some())
    }
}
