//! Database operations for the recipe shelf `PostgreSQL` schema.
//!
//! # Schema: `shelf`
//!
//! ## Tables
//!
//! - `recipe` - Recipes, partitioned by shop (list fields stored as JSONB)
//! - `shop_token` - Shopify Admin API OAuth tokens, one per installed shop
//! - `session` - Session storage (managed by `tower-sessions`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p recipe-shelf-cli -- migrate
//! ```

pub mod memory;
pub mod recipe_store;
pub mod recipes;
pub mod shopify;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::{MemoryRecipeStore, MemoryShopTokenStore};
pub use recipe_store::{NewRecipeRecord, PgRecipeStore, RecipeChanges, RecipeRecord, RecipeStore};
pub use recipes::RecipeRepository;
pub use shopify::{PgShopTokenStore, ShopTokenStore, ShopifyToken};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., a CHECK on servings).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning constraint violations into `Conflict`.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && (db_err.is_unique_violation()
                || db_err.is_check_violation()
                || db_err.is_foreign_key_violation())
        {
            return Self::Conflict(db_err.message().to_string());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
