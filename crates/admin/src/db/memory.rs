//! In-memory [`RecipeStore`] and [`ShopTokenStore`] for tests and local demos.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use recipe_shelf_core::{RecipeId, ShopDomain, ShopifyProductId};
use secrecy::SecretString;
use tokio::sync::RwLock;

use super::RepositoryError;
use super::recipe_store::{NewRecipeRecord, RecipeChanges, RecipeRecord, RecipeStore};
use super::shopify::{ShopTokenStore, ShopifyToken};

#[derive(Debug, Default)]
struct Inner {
    // (insertion sequence, record); the sequence breaks created_at ties
    rows: Vec<(u64, RecipeRecord)>,
    next_seq: u64,
}

/// Recipe store holding rows in process memory.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    inner: RwLock<Inner>,
}

impl MemoryRecipeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(record: &RecipeRecord, id: RecipeId, shop: &ShopDomain) -> bool {
    record.id == id.as_uuid() && record.shop == shop.as_str()
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn insert(&self, record: NewRecipeRecord) -> Result<RecipeRecord, RepositoryError> {
        if record.cook_time.is_some_and(|t| t < 0) {
            return Err(RepositoryError::Conflict("recipe_cook_time_check".to_owned()));
        }
        if record.servings.is_some_and(|s| s < 1) {
            return Err(RepositoryError::Conflict("recipe_servings_check".to_owned()));
        }

        let mut inner = self.inner.write().await;
        if inner.rows.iter().any(|(_, r)| r.id == record.id.as_uuid()) {
            return Err(RepositoryError::Conflict("recipe_pkey".to_owned()));
        }

        let now = Utc::now();
        let row = RecipeRecord {
            id: record.id.as_uuid(),
            shop: record.shop.into_inner(),
            title: record.title,
            description: record.description,
            image_url: record.image_url,
            cook_time: record.cook_time,
            servings: record.servings,
            ingredients: record.ingredients,
            instructions: record.instructions,
            tags: record.tags,
            product_id: record.product_id,
            created_at: now,
            updated_at: now,
        };
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rows.push((seq, row.clone()));
        Ok(row)
    }

    async fn find(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
    ) -> Result<Option<RecipeRecord>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .find(|(_, r)| matches(r, id, shop))
            .map(|(_, r)| r.clone()))
    }

    async fn find_all(
        &self,
        shop: &ShopDomain,
        product_id: Option<&ShopifyProductId>,
    ) -> Result<Vec<RecipeRecord>, RepositoryError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<&(u64, RecipeRecord)> = inner
            .rows
            .iter()
            .filter(|(_, r)| r.shop == shop.as_str())
            .filter(|(_, r)| {
                product_id.is_none_or(|p| r.product_id.as_deref() == Some(p.as_str()))
            })
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });
        Ok(rows.into_iter().map(|(_, r)| r.clone()).collect())
    }

    async fn update(
        &self,
        id: RecipeId,
        shop: &ShopDomain,
        changes: RecipeChanges,
    ) -> Result<Option<RecipeRecord>, RepositoryError> {
        if changes.cook_time.flatten().is_some_and(|t| t < 0) {
            return Err(RepositoryError::Conflict("recipe_cook_time_check".to_owned()));
        }
        if changes.servings.flatten().is_some_and(|s| s < 1) {
            return Err(RepositoryError::Conflict("recipe_servings_check".to_owned()));
        }

        let mut inner = self.inner.write().await;
        let Some((_, row)) = inner.rows.iter_mut().find(|(_, r)| matches(r, id, shop)) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(image_url) = changes.image_url {
            row.image_url = image_url;
        }
        if let Some(cook_time) = changes.cook_time {
            row.cook_time = cook_time;
        }
        if let Some(servings) = changes.servings {
            row.servings = servings;
        }
        if let Some(ingredients) = changes.ingredients {
            row.ingredients = ingredients;
        }
        if let Some(instructions) = changes.instructions {
            row.instructions = instructions;
        }
        if let Some(tags) = changes.tags {
            row.tags = tags;
        }
        if let Some(product_id) = changes.product_id {
            row.product_id = product_id;
        }
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: RecipeId, shop: &ShopDomain) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner.rows.retain(|(_, r)| !matches(r, id, shop));
        Ok(inner.rows.len() < before)
    }

    async fn delete_all(&self, shop: &ShopDomain) -> Result<u64, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner.rows.retain(|(_, r)| r.shop != shop.as_str());
        Ok((before - inner.rows.len()) as u64)
    }

    async fn count(&self, shop: &ShopDomain) -> Result<i64, RepositoryError> {
        let inner = self.inner.read().await;
        let count = inner.rows.iter().filter(|(_, r)| r.shop == shop.as_str()).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

/// Shop token store holding tokens in process memory.
#[derive(Debug, Default)]
pub struct MemoryShopTokenStore {
    tokens: RwLock<HashMap<ShopDomain, ShopifyToken>>,
}

impl MemoryShopTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShopTokenStore for MemoryShopTokenStore {
    async fn get_by_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Option<ShopifyToken>, RepositoryError> {
        Ok(self.tokens.read().await.get(shop).cloned())
    }

    async fn save(
        &self,
        shop: &ShopDomain,
        access_token: &SecretString,
        scopes: &[String],
    ) -> Result<(), RepositoryError> {
        let token = ShopifyToken {
            shop: shop.clone(),
            access_token: access_token.clone(),
            scopes: scopes.to_vec(),
            obtained_at: Utc::now(),
        };
        self.tokens.write().await.insert(shop.clone(), token);
        Ok(())
    }

    async fn delete(&self, shop: &ShopDomain) -> Result<bool, RepositoryError> {
        Ok(self.tokens.write().await.remove(shop).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn shop(domain: &str) -> ShopDomain {
        ShopDomain::parse(domain).unwrap()
    }

    #[tokio::test]
    async fn test_token_save_replaces_and_delete_reports_removal() {
        let store = MemoryShopTokenStore::new();
        let a = shop("a.myshopify.com");

        store.save(&a, &SecretString::from("shpat_1"), &[]).await.unwrap();
        store
            .save(&a, &SecretString::from("shpat_2"), &["read_products".to_string()])
            .await
            .unwrap();

        let token = store.get_by_shop(&a).await.unwrap().unwrap();
        assert_eq!(token.access_token.expose_secret(), "shpat_2");
        assert_eq!(token.scopes, vec!["read_products"]);
        assert!(store.get_by_shop(&shop("b.myshopify.com")).await.unwrap().is_none());

        assert!(store.delete(&a).await.unwrap());
        assert!(!store.delete(&a).await.unwrap());
    }
}
