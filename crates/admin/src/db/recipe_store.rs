//! Recipe storage backends.
//!
//! The [`RecipeStore`] trait is the seam between the repository and the
//! database. [`PgRecipeStore`] talks to `shelf.recipe`; the in-memory
//! implementation in [`super::memory`] backs tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_shelf_core::{RecipeId, ShopDomain, ShopifyProductId};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::RepositoryError;

// =============================================================================
// Types
// =============================================================================

/// A recipe row as stored, with list fields still in their JSON form.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub shop: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Value,
    pub instructions: Value,
    pub tags: Value,
    pub product_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewRecipeRecord {
    pub id: RecipeId,
    pub shop: ShopDomain,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Value,
    pub instructions: Value,
    pub tags: Value,
    pub product_id: Option<String>,
}

/// Column-level changes for an update. `None` leaves the column untouched;
/// `Some(None)` sets a nullable column to `NULL`.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub cook_time: Option<Option<i32>>,
    pub servings: Option<Option<i32>>,
    pub ingredients: Option<Value>,
    pub instructions: Option<Value>,
    pub tags: Option<Value>,
    pub product_id: Option<Option<String>>,
}

impl RecipeChanges {
    /// Whether no column would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.cook_time.is_none()
            && self.servings.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.tags.is_none()
            && self.product_id.is_none()
    }
}

/// Shop-scoped recipe persistence.
///
/// Every method takes the owning shop; a record belonging to another shop
/// behaves exactly like a missing one.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert a new row and return it as stored.
    async fn insert(&self, record: NewRecipeRecord) -> Result<RecipeRecord, RepositoryError>;

    /// Find one row by id within a shop.
    async fn find(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
    ) -> Result<Option<RecipeRecord>, RepositoryError>;

    /// All rows of a shop, optionally filtered by product, newest first.
    async fn find_all(
        &self,
        shop: &ShopDomain,
        product_id: Option<&ShopifyProductId>,
    ) -> Result<Vec<RecipeRecord>, RepositoryError>;

    /// Apply changes and bump `updated_at`. Returns `None` if no row matched.
    async fn update(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
        changes: RecipeChanges,
    ) -> Result<Option<RecipeRecord>, RepositoryError>;

    /// Delete one row. Returns whether a row was removed.
    async fn delete(&self, id: RecipeId, shop: &ShopDomain) -> Result<bool, RepositoryError>;

    /// Delete every row of a shop, returning how many were removed.
    async fn delete_all(&self, shop: &ShopDomain) -> Result<u64, RepositoryError>;

    /// Number of rows in a shop.
    async fn count(&self, shop: &ShopDomain) -> Result<i64, RepositoryError>;
}

// =============================================================================
// PostgreSQL
// =============================================================================

const RECIPE_COLUMNS: &str = "id, shop, title, description, image_url, cook_time, servings, \
     ingredients, instructions, tags, product_id, created_at, updated_at";

/// [`RecipeStore`] backed by the `shelf.recipe` table.
#[derive(Debug, Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn insert(&self, record: NewRecipeRecord) -> Result<RecipeRecord, RepositoryError> {
        let sql = format!(
            "INSERT INTO shelf.recipe \
                 (id, shop, title, description, image_url, cook_time, servings, \
                  ingredients, instructions, tags, product_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {RECIPE_COLUMNS}"
        );

        sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(record.id)
            .bind(record.shop.as_str())
            .bind(&record.title)
            .bind(&record.description)
            .bind(&record.image_url)
            .bind(record.cook_time)
            .bind(record.servings)
            .bind(&record.ingredients)
            .bind(&record.instructions)
            .bind(&record.tags)
            .bind(&record.product_id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)
    }

    async fn find(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
    ) -> Result<Option<RecipeRecord>, RepositoryError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM shelf.recipe WHERE id = $1 AND shop = $2");

        let row = sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(id)
            .bind(shop.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_all(
        &self,
        shop: &ShopDomain,
        product_id: Option<&ShopifyProductId>,
    ) -> Result<Vec<RecipeRecord>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM shelf.recipe WHERE shop = "));
        query.push_bind(shop.as_str());
        if let Some(product_id) = product_id {
            query.push(" AND product_id = ").push_bind(product_id.as_str());
        }
        query.push(" ORDER BY created_at DESC, id");

        let rows = query
            .build_query_as::<RecipeRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn update(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
        changes: RecipeChanges,
    ) -> Result<Option<RecipeRecord>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE shelf.recipe SET ");
        {
            let mut set = query.separated(", ");
            if let Some(title) = changes.title {
                set.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = changes.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Some(image_url) = changes.image_url {
                set.push("image_url = ").push_bind_unseparated(image_url);
            }
            if let Some(cook_time) = changes.cook_time {
                set.push("cook_time = ").push_bind_unseparated(cook_time);
            }
            if let Some(servings) = changes.servings {
                set.push("servings = ").push_bind_unseparated(servings);
            }
            if let Some(ingredients) = changes.ingredients {
                set.push("ingredients = ").push_bind_unseparated(ingredients);
            }
            if let Some(instructions) = changes.instructions {
                set.push("instructions = ").push_bind_unseparated(instructions);
            }
            if let Some(tags) = changes.tags {
                set.push("tags = ").push_bind_unseparated(tags);
            }
            if let Some(product_id) = changes.product_id {
                set.push("product_id = ").push_bind_unseparated(product_id);
            }
            set.push("updated_at = NOW()");
        }
        query.push(" WHERE id = ").push_bind(id);
        query.push(" AND shop = ").push_bind(shop.as_str());
        query.push(format!(" RETURNING {RECIPE_COLUMNS}"));

        query
            .build_query_as::<RecipeRecord>()
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)
    }

    async fn delete(&self, id: RecipeId, shop: &ShopDomain) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shelf.recipe WHERE id = $1 AND shop = $2")
            .bind(id)
            .bind(shop.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, shop: &ShopDomain) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shelf.recipe WHERE shop = $1")
            .bind(shop.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self, shop: &ShopDomain) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shelf.recipe WHERE shop = $1")
            .bind(shop.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
