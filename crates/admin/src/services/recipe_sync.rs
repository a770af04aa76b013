//! Recipe-to-product sync.
//!
//! One-way: a recipe is copied into the `custom.recipe_data` metafield of
//! its linked product so storefront themes can render it. The mirror is
//! read back for display only and never written into the recipe table.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use recipe_shelf_core::{RecipeId, ShopifyProductId};

use crate::models::Recipe;
use crate::shopify::{AdminClient, AdminShopifyError, ProductMirror};

/// Errors from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The recipe has no linked product.
    #[error("recipe is not linked to a product")]
    NotLinked,

    /// The Admin API call failed.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),

    /// The stored mirror does not have the expected shape.
    #[error("invalid recipe metafield: {0}")]
    Payload(#[from] serde_json::Error),
}

/// The metafield value: a denormalized copy of one recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeMetafield {
    pub recipe_id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
}

impl From<&Recipe> for RecipeMetafield {
    fn from(recipe: &Recipe) -> Self {
        Self {
            recipe_id: recipe.id,
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            image_url: recipe.image_url.clone(),
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            tags: recipe.tags.clone(),
        }
    }
}

/// How a recipe's product mirror compares to the recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStatus {
    /// The recipe has no linked product.
    NotLinked,
    /// Linked, but the product has no recipe metafield.
    Missing,
    /// The metafield matches the recipe.
    InSync,
    /// The metafield differs from the recipe (or is unreadable).
    Stale,
}

impl MirrorStatus {
    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotLinked => "Not linked",
            Self::Missing => "Not synced",
            Self::InSync => "In sync",
            Self::Stale => "Out of date",
        }
    }
}

/// Sync operations against one shop's catalog.
pub struct RecipeSync<'a> {
    catalog: &'a AdminClient,
}

impl<'a> RecipeSync<'a> {
    #[must_use]
    pub const fn new(catalog: &'a AdminClient) -> Self {
        Self { catalog }
    }

    /// Write the recipe into its linked product's metafield.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::NotLinked` if the recipe has no product, or
    /// `SyncError::Shopify` if the write fails.
    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    pub async fn push(&self, recipe: &Recipe) -> Result<ProductMirror, SyncError> {
        let product_id = recipe.product_id.as_ref().ok_or(SyncError::NotLinked)?;
        let payload = serde_json::to_value(RecipeMetafield::from(recipe))?;

        let mirror = self
            .catalog
            .set_product_metafield(product_id, &payload)
            .await?;

        info!(product_id = %product_id, "Recipe synced to product");
        Ok(mirror)
    }

    /// Read the mirror stored on a product.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Payload` if the value is not a recipe mirror, or
    /// `SyncError::Shopify` if the read fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn pull(
        &self,
        product_id: &ShopifyProductId,
    ) -> Result<Option<RecipeMetafield>, SyncError> {
        let Some(value) = self.catalog.get_product_metafield(product_id).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Remove the mirror from a product.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Shopify` if the delete fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn unlink(&self, product_id: &ShopifyProductId) -> Result<(), SyncError> {
        self.catalog.clear_product_metafield(product_id).await?;
        info!("Recipe mirror removed from product");
        Ok(())
    }

    /// Compare the recipe with its product mirror.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Shopify` if the read fails. A mirror that does
    /// not decode counts as `Stale`.
    pub async fn mirror_status(&self, recipe: &Recipe) -> Result<MirrorStatus, SyncError> {
        let Some(product_id) = recipe.product_id.as_ref() else {
            return Ok(MirrorStatus::NotLinked);
        };

        match self.pull(product_id).await {
            Ok(None) => Ok(MirrorStatus::Missing),
            Ok(Some(mirror)) if mirror == RecipeMetafield::from(recipe) => Ok(MirrorStatus::InSync),
            Ok(Some(_)) | Err(SyncError::Payload(_)) => Ok(MirrorStatus::Stale),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use recipe_shelf_core::ShopDomain;
    use serde_json::json;

    use super::*;

    fn recipe() -> Recipe {
        Recipe {
            id: RecipeId::generate(),
            shop: ShopDomain::parse("test-store.myshopify.com").unwrap(),
            title: "Texas Trail Dust Burger".to_string(),
            description: None,
            image_url: Some("https://cdn.example.com/burger.jpg".to_string()),
            cook_time: Some(20),
            servings: Some(4),
            ingredients: vec!["2 lbs ground beef".to_string()],
            instructions: vec!["Form patties".to_string(), "Grill".to_string()],
            tags: vec!["burgers".to_string()],
            product_id: Some(ShopifyProductId::parse("77").unwrap()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_payload_shape() {
        let r = recipe();
        let json = serde_json::to_value(RecipeMetafield::from(&r)).unwrap();
        assert_eq!(
            json,
            json!({
                "recipeId": r.id.to_string(),
                "title": "Texas Trail Dust Burger",
                "description": null,
                "imageUrl": "https://cdn.example.com/burger.jpg",
                "cookTime": 20,
                "servings": 4,
                "ingredients": ["2 lbs ground beef"],
                "instructions": ["Form patties", "Grill"],
                "tags": ["burgers"]
            })
        );
    }

    #[test]
    fn test_payload_rejects_wrong_shape() {
        let result = serde_json::from_value::<RecipeMetafield>(json!({"title": 5}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_push_requires_link() {
        let shop = ShopDomain::parse("test-store.myshopify.com").unwrap();
        let client = AdminClient::with_endpoint(
            reqwest::Client::new(),
            &shop,
            "http://127.0.0.1:9/graphql.json",
            secrecy::SecretString::from("token"),
        );
        let mut r = recipe();
        r.product_id = None;

        let sync = RecipeSync::new(&client);
        assert!(matches!(sync.push(&r).await, Err(SyncError::NotLinked)));
        assert_eq!(sync.mirror_status(&r).await.unwrap(), MirrorStatus::NotLinked);
    }
}
