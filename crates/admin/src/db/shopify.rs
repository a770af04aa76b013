//! Shopify OAuth token storage.
//!
//! One row per installed shop, written by the OAuth callback and removed by
//! the `app/uninstalled` and `shop/redact` webhooks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use recipe_shelf_core::ShopDomain;

use super::RepositoryError;

// =============================================================================
// Types
// =============================================================================

/// A shop's Admin API access token.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyToken {
    /// Shop domain (e.g., test-store.myshopify.com).
    pub shop: ShopDomain,
    /// OAuth access token (redacted in debug output).
    pub access_token: SecretString,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// When the token was obtained.
    pub obtained_at: DateTime<Utc>,
}

impl std::fmt::Debug for ShopifyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyToken")
            .field("shop", &self.shop)
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShopTokenRow {
    shop: String,
    access_token: String,
    scope: String,
    obtained_at: DateTime<Utc>,
}

impl TryFrom<ShopTokenRow> for ShopifyToken {
    type Error = RepositoryError;

    fn try_from(row: ShopTokenRow) -> Result<Self, Self::Error> {
        let shop = ShopDomain::parse(&row.shop)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid shop: {e}")))?;
        let scopes = row
            .scope
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            shop,
            access_token: SecretString::from(row.access_token),
            scopes,
            obtained_at: row.obtained_at,
        })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Storage for shop access tokens.
#[async_trait]
pub trait ShopTokenStore: Send + Sync {
    /// Get the token for a shop.
    async fn get_by_shop(&self, shop: &ShopDomain)
    -> Result<Option<ShopifyToken>, RepositoryError>;

    /// Save or replace the token for a shop.
    async fn save(
        &self,
        shop: &ShopDomain,
        access_token: &SecretString,
        scopes: &[String],
    ) -> Result<(), RepositoryError>;

    /// Delete the token for a shop. Returns whether a token was removed.
    async fn delete(&self, shop: &ShopDomain) -> Result<bool, RepositoryError>;
}

/// Token store over `shelf.shop_token`.
#[derive(Debug, Clone)]
pub struct PgShopTokenStore {
    pool: PgPool,
}

impl PgShopTokenStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopTokenStore for PgShopTokenStore {
    async fn get_by_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Option<ShopifyToken>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopTokenRow>(
            r"
            SELECT shop, access_token, scope, obtained_at
            FROM shelf.shop_token
            WHERE shop = $1
            ",
        )
        .bind(shop.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShopifyToken::try_from).transpose()
    }

    async fn save(
        &self,
        shop: &ShopDomain,
        access_token: &SecretString,
        scopes: &[String],
    ) -> Result<(), RepositoryError> {
        let scope = scopes.join(",");

        sqlx::query(
            r"
            INSERT INTO shelf.shop_token (shop, access_token, scope)
            VALUES ($1, $2, $3)
            ON CONFLICT (shop) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                scope = EXCLUDED.scope,
                obtained_at = NOW(),
                updated_at = NOW()
            ",
        )
        .bind(shop.as_str())
        .bind(access_token.expose_secret())
        .bind(scope)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, shop: &ShopDomain) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shelf.shop_token WHERE shop = $1")
            .bind(shop.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
