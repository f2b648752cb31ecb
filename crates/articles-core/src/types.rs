//! Core data types for the Articles API.
//!
//! This module defines the domain records shared by the store, the cache and
//! the HTTP layer:
//!
//! - Identities (users) are keyed by a numeric id and a unique email
//! - Articles carry a single owner, fixed at creation
//! - Partial updates are explicit patches merged by a pure function
//!
//! Article JSON uses the field names of the public API (`publishedAt`,
//! `author: {id, email}`), so the same representation is used for HTTP
//! responses and for cached values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a user (identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Returns the inner integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Unique identifier for an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl ArticleId {
    /// Returns the inner integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

// ============================================================================
// Identity
// ============================================================================

/// The outward view of a user: id and email only.
///
/// This is what authenticated requests carry and what articles expose as
/// their author. The password hash lives only in the store's row type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

// ============================================================================
// Article
// ============================================================================

/// A published article together with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    /// Owner of the article. Set once at creation.
    pub author: Identity,
}

impl Article {
    /// The owner's id.
    #[must_use]
    pub fn author_id(&self) -> UserId {
        self.author.id
    }

    /// Returns true if `user` owns this article.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.author.id == user
    }
}

/// Fields supplied when creating an article.
///
/// The owner is not part of the input; it is always the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
}

/// A partial update: each present field replaces the stored value,
/// absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl ArticlePatch {
    /// Merge this patch into `current`, producing the updated article.
    ///
    /// `id` and `author` are never touched.
    #[must_use]
    pub fn apply_to(self, current: Article) -> Article {
        Article {
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            published_at: self.published_at.unwrap_or(current.published_at),
            ..current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_article() -> Article {
        Article {
            id: ArticleId(7),
            title: "Original".to_string(),
            description: "Body".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 9, 15, 12, 0, 0).unwrap(),
            author: Identity::new(UserId(1), "owner@example.com"),
        }
    }

    #[test]
    fn ids_display_fromstr() {
        assert_eq!(ArticleId(42).to_string(), "42");
        assert_eq!("42".parse::<ArticleId>().unwrap(), ArticleId(42));
        assert_eq!(" 3 ".parse::<UserId>().unwrap(), UserId(3));
        assert!("abc".parse::<ArticleId>().is_err());
    }

    #[test]
    fn article_serializes_with_api_field_names() {
        let json = serde_json::to_value(sample_article()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["publishedAt"], "2024-09-15T12:00:00Z");
        assert_eq!(json["author"]["id"], 1);
        assert_eq!(json["author"]["email"], "owner@example.com");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn ownership_check() {
        let article = sample_article();
        assert_eq!(article.author_id(), UserId(1));
        assert!(article.is_owned_by(UserId(1)));
        assert!(!article.is_owned_by(UserId(2)));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let patch = ArticlePatch {
            title: Some("X".to_string()),
            ..Default::default()
        };
        let updated = patch.apply_to(sample_article());

        assert_eq!(updated.title, "X");
        assert_eq!(updated.description, "Body");
        assert_eq!(updated.published_at, sample_article().published_at);
        assert_eq!(updated.author, sample_article().author);
    }

    #[test]
    fn empty_patch_is_identity() {
        let patch = ArticlePatch::default();
        assert_eq!(patch.apply_to(sample_article()), sample_article());
    }

    #[test]
    fn patch_ignores_owner_and_id_fields() {
        let json = r#"{"id": 99, "author": {"id": 2, "email": "x@y.z"}, "description": "New"}"#;
        let patch: ArticlePatch = serde_json::from_str(json).unwrap();
        let updated = patch.apply_to(sample_article());

        assert_eq!(updated.id, ArticleId(7));
        assert_eq!(updated.author_id(), UserId(1));
        assert_eq!(updated.description, "New");
    }

    #[test]
    fn new_article_deserializes_camel_case() {
        let json = r#"{"title": "T", "description": "D", "publishedAt": "2024-01-02T03:04:05Z"}"#;
        let input: NewArticle = serde_json::from_str(json).unwrap();
        assert_eq!(input.title, "T");
        assert_eq!(
            input.published_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
        );
    }
}
