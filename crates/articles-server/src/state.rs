//! Application state shared across handlers.

use std::sync::Arc;

use articles_cache::Cache;
use articles_store::{ArticleStore, UserStore};

use crate::auth::TokenService;
use crate::config::ServerConfig;
use crate::service::ArticleService;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Identity store.
    users: Arc<dyn UserStore>,
    /// Article access with caching.
    articles: Arc<ArticleService>,
    /// Access and refresh token minting.
    tokens: Arc<TokenService>,
}

impl AppState {
    /// Create new application state.
    ///
    /// The same store usually backs both users and articles.
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        article_store: Arc<dyn ArticleStore>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        let articles = ArticleService::new(article_store, cache, config.cache_ttl);
        let tokens = TokenService::new(&config.jwt);
        Self {
            config: Arc::new(config),
            users,
            articles: Arc::new(articles),
            tokens: Arc::new(tokens),
        }
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a reference to the identity store.
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Get a reference to the article service.
    pub fn articles(&self) -> &ArticleService {
        &self.articles
    }

    /// Get a reference to the token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("articles", &self.articles)
            .finish_non_exhaustive()
    }
}
