//! Recipe domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_shelf_core::{RecipeId, ShopDomain, ShopifyProductId};

/// A recipe with its list fields decoded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub shop: ShopDomain,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Total cook time in minutes.
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Vec<String>,
    /// Steps, in order.
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    /// Linked catalog product, if any.
    pub product_id: Option<ShopifyProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// File name for the printable export: the title with every
    /// non-alphanumeric character replaced by `_`, lowercased.
    #[must_use]
    pub fn file_slug(&self) -> String {
        self.title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

/// Input for creating a recipe. Omitted lists default to empty.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub shop: ShopDomain,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub product_id: Option<ShopifyProductId>,
}

impl NewRecipe {
    /// A recipe with only a title set.
    #[must_use]
    pub fn new(shop: ShopDomain, title: impl Into<String>) -> Self {
        Self {
            shop,
            title: title.into(),
            description: None,
            image_url: None,
            cook_time: None,
            servings: None,
            ingredients: None,
            instructions: None,
            tags: None,
            product_id: None,
        }
    }
}

/// Partial update. `None` leaves a field unchanged; for nullable fields
/// `Some(None)` clears the stored value. Lists replace wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub cook_time: Option<Option<u32>>,
    pub servings: Option<Option<u32>>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub product_id: Option<Option<ShopifyProductId>>,
}
