//! Requester identity extraction from a JWT Bearer access token.

use articles_core::{Identity, UserId};
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller of a request.
///
/// Built from `Authorization: Bearer <access token>`. Handlers that take this
/// extractor reject unauthenticated requests with `Unauthorized` before any
/// other work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
}

impl AuthenticatedUser {
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.email.clone())
    }
}

/// The token part of a Bearer authorization header.
pub fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let Some(auth_header) = parts.headers.get(http::header::AUTHORIZATION) else {
        return Err(ApiError::Unauthorized(
            "Missing Authorization: Bearer <token> header".into(),
        ));
    };

    let auth_str = auth_header.to_str().map_err(|_| {
        ApiError::Unauthorized("Authorization header contains invalid characters".into())
    })?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".into()))
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.tokens().validate_access(token)?;

        Ok(AuthenticatedUser {
            id: UserId(claims.sub),
            email: claims.email,
        })
    }
}
