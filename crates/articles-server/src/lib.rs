//! articles-server: HTTP API server for the Articles API
//!
//! This crate provides:
//! - REST endpoints for article CRUD and authentication
//! - JWT access/refresh tokens and argon2 password hashing
//! - Read-through caching of article reads with invalidation on writes
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request ID generation and propagation
//! - Request tracing and logging
//! - CORS handling
//! - JSON error responses
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use articles_cache::MemoryCache;
//! use articles_server::{app, config::ServerConfig, state::AppState};
//! use articles_store::MemoryStore;
//!
//! let config = ServerConfig::from_env()?;
//! let store = Arc::new(MemoryStore::new());
//! let state = AppState::new(config, store.clone(), store, Arc::new(MemoryCache::new()));
//! let router = app(state)?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;

use axum::{Router, body::Body};
use http::{HeaderValue, Request};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{propagate_request_id, request_id_layer, request_id_of};

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use service::ArticleService;
pub use state::AppState;

// Re-export dependent crates
pub use articles_cache;
pub use articles_core;
pub use articles_store;

/// Build the router with the full middleware stack.
pub fn app(state: AppState) -> Result<Router, ConfigError> {
    let cors = build_cors_layer(&state.config().cors_allowed_origins)?;

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id_of(request),
        )
    });

    Ok(routes::build_router(state)
        .layer(axum::middleware::from_fn(propagate_request_id))
        .layer(trace)
        .layer(cors)
        .layer(request_id_layer()))
}

/// Build CORS layer from a comma-separated origin list, or `*`.
pub fn build_cors_layer(allowed_origins: &str) -> Result<CorsLayer, ConfigError> {
    if allowed_origins.trim() == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGINS".to_string(),
                    reason: format!("invalid origin: {}", s),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
