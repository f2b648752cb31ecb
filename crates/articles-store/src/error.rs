//! Error types for the storage layer.

use articles_core::{ArticleId, UserId};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Article not found.
    #[error("article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// A user with this email already exists.
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
