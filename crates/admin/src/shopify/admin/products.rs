//! Product search and the recipe metafield.

use tracing::instrument;

use recipe_shelf_core::ShopifyProductId;

use super::{
    AdminClient, AdminShopifyError,
    queries::{
        DeleteProductMetafield, GetProductMetafield, SearchProducts, SetProductMetafield,
        delete_product_metafield, get_product_metafield, search_products, set_product_metafield,
    },
};
use crate::shopify::types::{ProductMirror, ProductSummary};

/// Metafield namespace holding the recipe mirror.
pub const RECIPE_METAFIELD_NAMESPACE: &str = "custom";
/// Metafield key holding the recipe mirror.
pub const RECIPE_METAFIELD_KEY: &str = "recipe_data";

const SEARCH_PAGE_SIZE: i64 = 10;

fn first_user_error<'a>(mut messages: impl Iterator<Item = &'a str>) -> Option<AdminShopifyError> {
    messages
        .next()
        .map(|message| AdminShopifyError::UserError(message.to_string()))
}

impl AdminClient {
    /// Search the catalog by free text, returning at most 10 products.
    ///
    /// An empty query lists the first products of the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(shop = %self.shop()))]
    pub async fn search_products(
        &self,
        query: &str,
    ) -> Result<Vec<ProductSummary>, AdminShopifyError> {
        let query = query.trim();
        let variables = search_products::Variables {
            first: SEARCH_PAGE_SIZE,
            query: (!query.is_empty()).then(|| query.to_string()),
        };

        let response = self.execute::<SearchProducts>(variables).await?;

        Ok(response
            .products
            .edges
            .into_iter()
            .filter_map(|edge| {
                let node = edge.node;
                let id = ShopifyProductId::parse(&node.id)
                    .inspect_err(|e| tracing::warn!(error = %e, "Skipping product with unexpected id"))
                    .ok()?;
                Some(ProductSummary {
                    id,
                    title: node.title,
                    image_url: node.featured_image.map(|image| image.url),
                })
            })
            .collect())
    }

    /// Write the recipe metafield on a product, creating or replacing it.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::UserError` with the first field error if
    /// Shopify rejects the write, or a transport/GraphQL error.
    #[instrument(skip(self, payload), fields(shop = %self.shop(), product_id = %product_id))]
    pub async fn set_product_metafield(
        &self,
        product_id: &ShopifyProductId,
        payload: &serde_json::Value,
    ) -> Result<ProductMirror, AdminShopifyError> {
        let variables = set_product_metafield::Variables {
            metafields: vec![set_product_metafield::MetafieldsSetInput {
                owner_id: product_id.to_gid(),
                namespace: Some(RECIPE_METAFIELD_NAMESPACE.to_string()),
                key: RECIPE_METAFIELD_KEY.to_string(),
                type_: Some("json".to_string()),
                value: serde_json::to_string(payload)?,
            }],
        };

        let response = self.execute::<SetProductMetafield>(variables).await?;

        let payload = response
            .metafields_set
            .ok_or_else(|| AdminShopifyError::NotFound(product_id.to_gid()))?;

        if let Some(err) = first_user_error(payload.user_errors.iter().map(|e| e.message.as_str())) {
            return Err(err);
        }

        let metafield = payload
            .metafields
            .and_then(|m| m.into_iter().next())
            .ok_or_else(|| AdminShopifyError::NotFound(product_id.to_gid()))?;

        Ok(ProductMirror {
            product_id: product_id.clone(),
            metafield_id: metafield.id,
            value: serde_json::from_str(&metafield.value)?,
            updated_at: metafield.updated_at,
        })
    }

    /// Read the recipe metafield of a product.
    ///
    /// Returns `None` when the product or the metafield does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Parse` if the stored value is not JSON,
    /// or a transport/GraphQL error.
    #[instrument(skip(self), fields(shop = %self.shop(), product_id = %product_id))]
    pub async fn get_product_metafield(
        &self,
        product_id: &ShopifyProductId,
    ) -> Result<Option<serde_json::Value>, AdminShopifyError> {
        let variables = get_product_metafield::Variables {
            id: product_id.to_gid(),
            namespace: RECIPE_METAFIELD_NAMESPACE.to_string(),
            key: RECIPE_METAFIELD_KEY.to_string(),
        };

        let response = self.execute::<GetProductMetafield>(variables).await?;

        let Some(metafield) = response.product.and_then(|p| p.metafield) else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&metafield.value)?))
    }

    /// Remove the recipe metafield from a product.
    ///
    /// Succeeds when there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::UserError` with the first field error if
    /// Shopify rejects the delete, or a transport/GraphQL error.
    #[instrument(skip(self), fields(shop = %self.shop(), product_id = %product_id))]
    pub async fn clear_product_metafield(
        &self,
        product_id: &ShopifyProductId,
    ) -> Result<(), AdminShopifyError> {
        let variables = delete_product_metafield::Variables {
            metafields: vec![delete_product_metafield::MetafieldIdentifierInput {
                owner_id: product_id.to_gid(),
                namespace: RECIPE_METAFIELD_NAMESPACE.to_string(),
                key: RECIPE_METAFIELD_KEY.to_string(),
            }],
        };

        let response = self.execute::<DeleteProductMetafield>(variables).await?;

        if let Some(payload) = response.metafields_delete
            && let Some(err) =
                first_user_error(payload.user_errors.iter().map(|e| e.message.as_str()))
        {
            return Err(err);
        }

        Ok(())
    }
}
