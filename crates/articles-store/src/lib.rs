//! articles-store: Storage layer for the Articles API
//!
//! This crate provides:
//! - The `UserStore` and `ArticleStore` contracts
//! - PostgreSQL storage for users and articles (sqlx)
//! - An in-memory implementation with the same behavior
//! - Migration management
//!
//! # Usage
//!
//! ```rust,ignore
//! use articles_store::{ArticleStore, Store, StoreConfig};
//!
//! let config = StoreConfig::from_lookup(|name| std::env::var(name).ok())?;
//! let store = Store::connect(config).await?;
//!
//! let article = store.find_article_by_id(ArticleId(1)).await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::{ArticleRow, UserRow};
pub use repository::{ArticleStore, UserStore};
pub use store::{Store, StoreConfig};

// Re-export articles-core for downstream crates
pub use articles_core;
