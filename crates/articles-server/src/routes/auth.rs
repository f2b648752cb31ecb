//! Authentication routes: register, login, refresh, me.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::auth::{self, TokenPair};
use crate::error::{ApiError, ApiResult};
use crate::extract::AuthenticatedUser;
use crate::state::AppState;

/// Minimum password length accepted at registration and login.
pub const MIN_PASSWORD_LEN: usize = 6;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
}

impl CredentialsRequest {
    fn validate(&self) -> ApiResult<()> {
        let valid_email = self
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid_email {
            return Err(ApiError::BadRequest("email must be a valid email".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::BadRequest(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    request: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TokenPair>)> {
    let Json(request) = request?;
    request.validate()?;

    let users = state.users();
    if users.find_user_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Unauthorized("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let user = users.create_user(&request.email, &password_hash).await?;

    tracing::info!(user_id = %user.id, "User registered");

    let tokens = state.tokens().issue(&user.identity())?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    request: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let Json(request) = request?;
    request.validate()?;

    let user = state
        .users()
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !auth::verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(state.tokens().issue(&user.identity())?))
}

/// POST /auth/refresh
async fn refresh(
    State(state): State<AppState>,
    request: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let Json(request) = request?;
    let claims = state.tokens().validate_refresh(&request.refresh_token)?;

    // The user may have been removed since the token was issued.
    let user = state
        .users()
        .find_user_by_id(claims.identity().id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    Ok(Json(state.tokens().issue(&user.identity())?))
}

/// GET /auth/me
async fn me(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id.get(),
        email: user.email,
    })
}

/// Build authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
}
