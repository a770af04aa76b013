//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database)
//!
//! # Auth (Shopify OAuth install flow)
//! GET  /auth/login                      - Shop domain form
//! GET  /auth?shop=                      - Start OAuth
//! GET  /auth/callback                   - OAuth callback
//! POST /auth/logout                     - Logout
//!
//! # Recipes (HTML, session auth)
//! GET  /                                - Dashboard
//! GET  /recipes[?productId=]            - Recipe list
//! GET  /recipes/new                     - Create form
//! POST /recipes                         - Create
//! GET  /recipes/{id}                    - Detail (JSON-LD, mirror status)
//! GET  /recipes/{id}/edit               - Edit form
//! POST /recipes/{id}/edit               - Partial update
//! POST /recipes/{id}/delete             - Delete
//! GET  /recipes/{id}/print              - Printable page
//! POST /recipes/{id}/sync               - Push to product metafield
//! POST /recipes/{id}/unlink             - Remove metafield and unlink
//!
//! # JSON API
//! GET  /api/recipes?shop=&productId=    - List recipes
//! GET  /api/recipes/{id}?shop=          - One recipe
//! GET  /api/recipes/{id}/structured-data?shop= - JSON-LD
//! GET  /api/products/search?query=      - Product search (session auth)
//!
//! # Webhooks
//! POST /webhooks                        - Shopify webhooks (HMAC verified)
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod recipe_form;
pub mod recipes;
pub mod webhooks;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the application router (without session or tracing layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Auth
        .route("/auth", get(auth::start))
        .route("/auth/login", get(auth::login_page))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
        // Dashboard
        .route("/", get(dashboard::index))
        // Recipes
        .route("/recipes", get(recipes::index).post(recipes::create))
        .route("/recipes/new", get(recipes::new_recipe))
        .route("/recipes/{id}", get(recipes::show))
        .route("/recipes/{id}/edit", get(recipes::edit).post(recipes::update))
        .route("/recipes/{id}/delete", post(recipes::delete))
        .route("/recipes/{id}/print", get(recipes::print))
        .route("/recipes/{id}/sync", post(recipes::sync))
        .route("/recipes/{id}/unlink", post(recipes::unlink))
        // API
        .merge(api::router())
        // Webhooks
        .route("/webhooks", post(webhooks::receive))
}

/// Render a template, logging and degrading on failure.
pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
