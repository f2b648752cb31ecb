//! Database models for the storage layer.
//!
//! These types map directly to database rows and are used for sqlx
//! queries. They are separate from the domain types in articles-core so
//! that secrets such as the password hash never reach a serializable type.

use std::fmt;

use articles_core::{Article, ArticleId, Identity, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row for the `users` table.
#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string. Never leaves the server.
    pub password_hash: String,
    pub created: DateTime<Utc>,
}

impl UserRow {
    /// The outward identity (id and email only).
    pub fn identity(&self) -> Identity {
        Identity::new(UserId(self.id), self.email.clone())
    }
}

impl fmt::Debug for UserRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created", &self.created)
            .finish()
    }
}

/// Database row for an article joined with its owner's email.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_email: String,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: ArticleId(row.id),
            title: row.title,
            description: row.description,
            published_at: row.published_at,
            author: Identity::new(UserId(row.author_id), row.author_email),
        }
    }
}
