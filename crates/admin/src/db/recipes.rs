//! Recipe repository.
//!
//! Converts between [`Recipe`] and the stored [`RecipeRecord`] form and
//! applies the create/update/delete contract on top of a [`RecipeStore`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{instrument, warn};

use recipe_shelf_core::{RecipeId, ShopDomain, ShopifyProductId};

use super::RepositoryError;
use super::recipe_store::{NewRecipeRecord, RecipeChanges, RecipeRecord, RecipeStore};
use crate::models::{NewRecipe, Recipe, RecipeUpdate};

/// Decode a stored list value.
///
/// Never fails: anything other than an array yields an empty list. Strings
/// are kept as-is, numbers and booleans are rendered as text, nulls and
/// nested objects or arrays are skipped.
#[must_use]
pub fn decode_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
        .collect()
}

/// Decode list text that is expected to hold a JSON array.
///
/// Malformed JSON yields an empty list.
#[must_use]
pub fn decode_list_text(text: &str) -> Vec<String> {
    serde_json::from_str::<Value>(text)
        .map(|value| decode_list(&value))
        .unwrap_or_default()
}

fn encode_list(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

fn to_column(value: u32, column: &str) -> Result<i32, RepositoryError> {
    i32::try_from(value).map_err(|_| RepositoryError::Conflict(format!("{column} out of range")))
}

fn to_column_opt(value: Option<u32>, column: &str) -> Result<Option<i32>, RepositoryError> {
    value.map(|v| to_column(v, column)).transpose()
}

/// Repository for recipe operations, scoped by shop.
#[derive(Clone)]
pub struct RecipeRepository {
    store: Arc<dyn RecipeStore>,
}

impl std::fmt::Debug for RecipeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeRepository").finish_non_exhaustive()
    }
}

impl RecipeRepository {
    /// Create a repository over a store.
    #[must_use]
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Decode a stored record.
    ///
    /// An absent record is `None`, never an error. List fields decode
    /// fail-open; an unreadable product ID is dropped with a warning.
    #[must_use]
    pub fn parse(record: Option<RecipeRecord>) -> Option<Recipe> {
        let record = record?;

        let shop = match ShopDomain::parse(&record.shop) {
            Ok(shop) => shop,
            Err(e) => {
                warn!(recipe_id = %record.id, error = %e, "Stored recipe has an invalid shop");
                return None;
            }
        };

        let product_id = record.product_id.as_deref().and_then(|raw| {
            ShopifyProductId::parse(raw)
                .inspect_err(|e| warn!(recipe_id = %record.id, error = %e, "Dropping invalid product id"))
                .ok()
        });

        Some(Recipe {
            id: RecipeId::from_uuid(record.id),
            shop,
            title: record.title,
            description: record.description,
            image_url: record.image_url,
            cook_time: record.cook_time.and_then(|v| u32::try_from(v).ok()),
            servings: record.servings.and_then(|v| u32::try_from(v).ok()),
            ingredients: decode_list(&record.ingredients),
            instructions: decode_list(&record.instructions),
            tags: decode_list(&record.tags),
            product_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    fn parse_all(records: Vec<RecipeRecord>) -> Vec<Recipe> {
        records
            .into_iter()
            .filter_map(|record| Self::parse(Some(record)))
            .collect()
    }

    /// All recipes of a shop, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(shop = %shop))]
    pub async fn list(&self, shop: &ShopDomain) -> Result<Vec<Recipe>, RepositoryError> {
        let records = self.store.find_all(shop, None).await?;
        Ok(Self::parse_all(records))
    }

    /// Recipes of a shop linked to one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(shop = %shop, product_id = %product_id))]
    pub async fn list_by_product(
        &self,
        shop: &ShopDomain,
        product_id: &ShopifyProductId,
    ) -> Result<Vec<Recipe>, RepositoryError> {
        let records = self.store.find_all(shop, Some(product_id)).await?;
        Ok(Self::parse_all(records))
    }

    /// Get a recipe by ID within a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(shop = %shop, recipe_id = %id))]
    pub async fn get(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
    ) -> Result<Option<Recipe>, RepositoryError> {
        let record = self.store.find(id, shop).await?;
        Ok(Self::parse(record))
    }

    /// Create a recipe, defaulting omitted lists to empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a constraint violation, or
    /// `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, new), fields(shop = %new.shop))]
    pub async fn create(&self, new: NewRecipe) -> Result<Recipe, RepositoryError> {
        let record = NewRecipeRecord {
            id: RecipeId::generate(),
            shop: new.shop,
            title: new.title,
            description: new.description,
            image_url: new.image_url,
            cook_time: to_column_opt(new.cook_time, "cook_time")?,
            servings: to_column_opt(new.servings, "servings")?,
            ingredients: encode_list(new.ingredients.unwrap_or_default()),
            instructions: encode_list(new.instructions.unwrap_or_default()),
            tags: encode_list(new.tags.unwrap_or_default()),
            product_id: new.product_id.map(String::from),
        };

        let stored = self.store.insert(record).await?;
        Self::parse(Some(stored))
            .ok_or_else(|| RepositoryError::DataCorruption("inserted recipe did not decode".into()))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no recipe matches the ID within
    /// the shop, `RepositoryError::Conflict` on a constraint violation.
    #[instrument(skip(self, update), fields(shop = %shop, recipe_id = %id))]
    pub async fn update(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
        update: RecipeUpdate,
    ) -> Result<Recipe, RepositoryError> {
        let changes = RecipeChanges {
            title: update.title,
            description: update.description,
            image_url: update.image_url,
            cook_time: update
                .cook_time
                .map(|v| to_column_opt(v, "cook_time"))
                .transpose()?,
            servings: update
                .servings
                .map(|v| to_column_opt(v, "servings"))
                .transpose()?,
            ingredients: update.ingredients.map(encode_list),
            instructions: update.instructions.map(encode_list),
            tags: update.tags.map(encode_list),
            product_id: update.product_id.map(|p| p.map(String::from)),
        };

        // Nothing to write; keep updated_at as it was
        if changes.is_empty() {
            return self.get(id, shop).await?.ok_or(RepositoryError::NotFound);
        }

        let stored = self
            .store
            .update(id, shop, changes)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Self::parse(Some(stored))
            .ok_or_else(|| RepositoryError::DataCorruption("updated recipe did not decode".into()))
    }

    /// Delete a recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no recipe matches the ID within
    /// the shop.
    #[instrument(skip(self), fields(shop = %shop, recipe_id = %id))]
    pub async fn delete(&self, id: RecipeId, shop: &ShopDomain) -> Result<(), RepositoryError> {
        if self.store.delete(id, shop).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    /// Number of recipes in a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, shop: &ShopDomain) -> Result<i64, RepositoryError> {
        self.store.count(shop).await
    }

    /// Delete every recipe of a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self), fields(shop = %shop))]
    pub async fn purge(&self, shop: &ShopDomain) -> Result<u64, RepositoryError> {
        self.store.delete_all(shop).await
    }
}
