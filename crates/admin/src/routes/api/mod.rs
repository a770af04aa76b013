//! JSON API route handlers.
//!
//! Recipe reads are addressed by an explicit `shop` query parameter so theme
//! app extensions can call them; product search uses the session.

pub mod products;
pub mod recipes;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(recipes::router())
        .merge(products::router())
}
