//! Recipe JSON API.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use recipe_shelf_core::{RecipeId, ShopDomain, ShopifyProductId};

use crate::{
    error::{ApiError, AppError},
    models::{Recipe, RecipeJsonLd},
    state::AppState,
};

/// Build the recipes API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(list))
        .route("/api/recipes/{id}", get(show))
        .route("/api/recipes/{id}/structured-data", get(structured_data))
}

/// Query parameters shared by the recipe endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeApiQuery {
    pub shop: Option<String>,
    pub product_id: Option<String>,
}

impl RecipeApiQuery {
    fn shop(&self) -> Result<ShopDomain, AppError> {
        let raw = self
            .shop
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Shop parameter required".to_string()))?;
        ShopDomain::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
    }

    fn product_id(&self) -> Result<Option<ShopifyProductId>, AppError> {
        self.product_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| ShopifyProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string())))
            .transpose()
    }
}

/// `{"recipes": [...]}`
#[derive(Debug, Serialize)]
pub struct RecipesResponse {
    pub recipes: Vec<Recipe>,
}

/// `{"recipe": {...}}`
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe: Recipe,
}

fn parse_id(raw: &str) -> Result<RecipeId, AppError> {
    RecipeId::parse(raw).map_err(|_| AppError::NotFound("recipe".to_string()))
}

async fn load(state: &AppState, id: &str, shop: &ShopDomain) -> Result<Recipe, AppError> {
    state
        .recipes()
        .get(parse_id(id)?, shop)
        .await?
        .ok_or_else(|| AppError::NotFound("recipe".to_string()))
}

/// GET /api/recipes - recipes of a shop, optionally for one product.
///
/// # Errors
///
/// 400 without `shop`, 500 on database failure.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RecipeApiQuery>,
) -> Result<Json<RecipesResponse>, ApiError> {
    let shop = query.shop()?;

    let recipes = match query.product_id()? {
        Some(product_id) => state.recipes().list_by_product(&shop, &product_id).await?,
        None => state.recipes().list(&shop).await?,
    };

    Ok(Json(RecipesResponse { recipes }))
}

/// GET /api/recipes/{id} - one recipe.
///
/// # Errors
///
/// 400 without `shop`, 404 if the recipe does not exist in the shop.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RecipeApiQuery>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let shop = query.shop()?;
    let recipe = load(&state, &id, &shop).await?;
    Ok(Json(RecipeResponse { recipe }))
}

/// GET /api/recipes/{id}/structured-data - schema.org JSON-LD.
///
/// # Errors
///
/// 400 without `shop`, 404 if the recipe does not exist in the shop.
#[instrument(skip(state))]
pub async fn structured_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RecipeApiQuery>,
) -> Result<Json<RecipeJsonLd>, ApiError> {
    let shop = query.shop()?;
    let recipe = load(&state, &id, &shop).await?;
    Ok(Json(RecipeJsonLd::from(&recipe)))
}
