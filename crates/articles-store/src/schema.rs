//! Schema definitions and migration utilities.
//!
//! This module provides embedded SQL schema definitions and utilities
//! for managing database migrations.

use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the users and articles tables.
pub const USERS_ARTICLES_MIGRATION: &str = include_str!("../migrations/001_users_articles.sql");

/// Run all pending migrations against the database.
///
/// This function is idempotent - it can be run multiple times safely.
/// Migrations check for existing objects before creating them.
///
/// # Errors
///
/// Returns an error if any migration fails to execute.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    tracing::debug!("Running users/articles migration (001_users_articles.sql)...");
    sqlx::raw_sql(USERS_ARTICLES_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| {
            StoreError::MigrationError(format!("Users/articles migration failed: {}", e))
        })?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}
