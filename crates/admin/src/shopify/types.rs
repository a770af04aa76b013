//! Domain types returned by the Admin API client.

use serde::Serialize;

use recipe_shelf_core::ShopifyProductId;

/// A product search hit.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductSummary {
    /// Bare numeric product ID.
    pub id: ShopifyProductId,
    pub title: String,
    /// Featured image URL.
    #[serde(rename = "image")]
    pub image_url: Option<String>,
}

/// The recipe metafield as stored on a product after a write.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMirror {
    pub product_id: ShopifyProductId,
    /// Metafield global ID.
    pub metafield_id: String,
    /// Parsed metafield value.
    pub value: serde_json::Value,
    /// ISO 8601 timestamp of the write.
    pub updated_at: String,
}
