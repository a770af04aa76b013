//! Product search API used by the recipe form's product picker.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, middleware::RequireShop, shopify::ProductSummary, state::AppState};

/// Build the products API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/products/search", get(search))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// `{"products": [{"id", "title", "image"}]}`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<ProductSummary>,
}

/// GET /api/products/search - first 10 matching catalog products.
///
/// # Errors
///
/// 401 without a session, 502 if the Admin API call fails.
#[instrument(skip_all, fields(shop = %shop))]
pub async fn search(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let catalog = state.catalog(&shop).await?;
    let products = catalog
        .search_products(params.query.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(SearchResponse { products }))
}
