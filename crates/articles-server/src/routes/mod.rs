//! Route definitions for the HTTP API.

pub mod articles;
pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(articles::routes())
        .with_state(state)
}
