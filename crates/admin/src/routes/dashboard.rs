//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::{error::AppError, filters, middleware::RequireShop, state::AppState};

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub shop: String,
    pub current_path: String,
    pub recipe_count: i64,
}

/// Dashboard page handler.
#[instrument(skip_all, fields(shop = %shop))]
pub async fn index(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let recipe_count = state.recipes().count(&shop).await?;

    let template = DashboardTemplate {
        shop: shop.to_string(),
        current_path: "/".to_string(),
        recipe_count,
    };

    Ok(super::render(&template))
}
