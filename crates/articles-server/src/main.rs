//! Entry point for the articles-server binary.

use std::sync::Arc;

use articles_cache::{Cache, MemoryCache};
use articles_server::{
    app,
    config::{CacheBackend, ConfigError, LogFormat, ServerConfig, StoreBackend},
    state::AppState,
};
use articles_store::{ArticleStore, MemoryStore, Store, UserStore};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    tracing::info!("Starting articles-server");
    tracing::info!(
        port = config.port,
        store = ?config.store_backend,
        cache = ?config.cache_backend,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Configuration loaded"
    );

    let (users, articles) = match config.store_backend {
        StoreBackend::Postgres => {
            let store_config = config
                .database
                .clone()
                .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;
            let store = Arc::new(Store::connect(store_config).await?);
            split_store(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            split_store(Arc::new(MemoryStore::new()))
        }
    };

    let cache = connect_cache(&config).await?;

    // Build application state and router
    let addr = config.socket_addr();
    let state = AppState::new(config, users, articles, cache);
    let router = app(state)?;

    // Create listener
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// One store serves both the identity and article contracts.
fn split_store<S>(store: Arc<S>) -> (Arc<dyn UserStore>, Arc<dyn ArticleStore>)
where
    S: UserStore + ArticleStore + 'static,
{
    (store.clone(), store)
}

async fn connect_cache(config: &ServerConfig) -> Result<Arc<dyn Cache>, Box<dyn std::error::Error>> {
    match config.cache_backend {
        CacheBackend::Memory => {
            let cache = MemoryCache::new();
            cache.spawn_sweeper(config.cache_ttl);
            Ok(Arc::new(cache))
        }
        #[cfg(feature = "redis")]
        CacheBackend::Redis => {
            let cache = articles_cache::RedisCache::connect(&config.redis_url).await?;
            Ok(Arc::new(cache))
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => Err(ConfigError::InvalidValue {
            name: "CACHE_BACKEND".to_string(),
            reason: "server was built without the redis feature".to_string(),
        }
        .into()),
    }
}

/// Initialize the tracing subscriber.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
