//! Credential service: password hashing and JWT token management.
//!
//! Each successful register or login yields a token pair. Access and
//! refresh tokens are signed with separate HS256 secrets and carry a `typ`
//! claim, so one kind is never accepted in place of the other.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use articles_core::{Identity, UserId};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::JwtConfig;
use crate::error::ApiError;

/// Kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject).
    pub sub: i64,
    /// User email.
    pub email: String,
    /// Token kind.
    pub typ: TokenType,
    /// Expiration time (unix timestamp).
    pub exp: usize,
    /// Issued at (unix timestamp).
    pub iat: usize,
}

impl Claims {
    /// The identity this token was issued to.
    pub fn identity(&self) -> Identity {
        Identity::new(UserId(self.sub), self.email.clone())
    }
}

/// Tokens returned by register, login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// One signing key and lifetime.
struct Signer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl Signer {
    fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }
}

/// Mints and validates access and refresh tokens.
pub struct TokenService {
    access: Signer,
    refresh: Signer,
}

impl TokenService {
    /// Build a token service from configuration.
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: Signer::new(&config.access_secret, config.access_expires),
            refresh: Signer::new(&config.refresh_secret, config.refresh_expires),
        }
    }

    fn signer(&self, typ: TokenType) -> &Signer {
        match typ {
            TokenType::Access => &self.access,
            TokenType::Refresh => &self.refresh,
        }
    }

    /// Create one token of the given kind.
    pub fn create_token(&self, identity: &Identity, typ: TokenType) -> Result<String, ApiError> {
        let signer = self.signer(typ);
        let now = chrono::Utc::now();
        let lifetime = chrono::Duration::from_std(signer.lifetime)
            .map_err(|e| ApiError::Internal(format!("Invalid token lifetime: {}", e)))?;

        let claims = Claims {
            sub: identity.id.get(),
            email: identity.email.clone(),
            typ,
            exp: (now + lifetime).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &signer.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create an access/refresh token pair.
    pub fn issue(&self, identity: &Identity) -> Result<TokenPair, ApiError> {
        Ok(TokenPair {
            access_token: self.create_token(identity, TokenType::Access)?,
            refresh_token: self.create_token(identity, TokenType::Refresh)?,
        })
    }

    /// Validate a token of the given kind and return its claims.
    pub fn validate(&self, token: &str, typ: TokenType) -> Result<Claims, ApiError> {
        let token_data = decode::<Claims>(token, &self.signer(typ).decoding, &Validation::default())
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                ApiError::Unauthorized(format!("Invalid token: {}", e))
            })?;

        if token_data.claims.typ != typ {
            return Err(ApiError::Unauthorized("Wrong token type".to_string()));
        }

        Ok(token_data.claims)
    }

    /// Validate an access token.
    pub fn validate_access(&self, token: &str) -> Result<Claims, ApiError> {
        self.validate(token, TokenType::Access)
    }

    /// Validate a refresh token.
    pub fn validate_refresh(&self, token: &str) -> Result<Claims, ApiError> {
        self.validate(token, TokenType::Refresh)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_lifetime", &self.access.lifetime)
            .field("refresh_lifetime", &self.refresh.lifetime)
            .finish_non_exhaustive()
    }
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(password_hash.to_string())
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
