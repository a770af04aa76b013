//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use recipe_shelf_core::ShopDomain;

use crate::config::AdminConfig;
use crate::db::{PgRecipeStore, PgShopTokenStore, RecipeRepository, RecipeStore, ShopTokenStore};
use crate::error::AppError;
use crate::shopify::{AdminClient, ShopifyOAuth};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    recipes: RecipeRepository,
    tokens: Arc<dyn ShopTokenStore>,
    oauth: ShopifyOAuth,
    http: reqwest::Client,
}

impl AppState {
    /// Build state backed by `PostgreSQL` for both recipes and tokens.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let recipes = Arc::new(PgRecipeStore::new(pool.clone()));
        let tokens = Arc::new(PgShopTokenStore::new(pool.clone()));
        Self::with_stores(config, pool, recipes, tokens)
    }

    /// Build state with explicit recipe and token stores.
    #[must_use]
    pub fn with_stores(
        config: AdminConfig,
        pool: PgPool,
        recipes: Arc<dyn RecipeStore>,
        tokens: Arc<dyn ShopTokenStore>,
    ) -> Self {
        let http = reqwest::Client::new();
        let oauth = ShopifyOAuth::new(
            http.clone(),
            config.shopify.client_id.clone(),
            config.shopify.client_secret.clone(),
            config.shopify.scopes.clone(),
            config.oauth_redirect_uri(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                recipes: RecipeRepository::new(recipes),
                tokens,
                oauth,
                http,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn recipes(&self) -> &RecipeRepository {
        &self.inner.recipes
    }

    #[must_use]
    pub fn tokens(&self) -> &dyn ShopTokenStore {
        self.inner.tokens.as_ref()
    }

    #[must_use]
    pub fn oauth(&self) -> &ShopifyOAuth {
        &self.inner.oauth
    }

    /// Admin API client for a shop, using its stored access token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if the shop has no token (app not
    /// installed or uninstalled since), `AppError::Database` on lookup failure.
    pub async fn catalog(&self, shop: &ShopDomain) -> Result<AdminClient, AppError> {
        let token = self
            .tokens()
            .get_by_shop(shop)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("no access token for {shop}")))?;

        Ok(AdminClient::new(
            self.inner.http.clone(),
            shop,
            &self.inner.config.shopify.api_version,
            token.access_token,
        ))
    }
}
