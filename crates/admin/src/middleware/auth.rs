//! Authentication extractors.
//!
//! A request is authenticated when its session holds the shop recorded by
//! the OAuth callback. The shop is the tenant for every recipe query.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use recipe_shelf_core::ShopDomain;

use crate::models::CurrentShop;
use crate::models::session::keys;

/// Extractor that requires an authenticated shop.
///
/// If no shop is in the session, HTML requests are redirected to the login
/// page and `/api/` requests get 401 Unauthorized.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireShop(shop): RequireShop) -> impl IntoResponse {
///     format!("Hello, {shop}!")
/// }
/// ```
pub struct RequireShop(pub ShopDomain);

/// Error returned when authentication is required but missing.
#[derive(Debug)]
pub enum ShopAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for ShopAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({ "error": "Unauthorized" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireShop
where
    S: Send + Sync,
{
    type Rejection = ShopAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_api = parts.uri.path().starts_with("/api/");
        let rejection = || {
            if is_api {
                ShopAuthRejection::Unauthorized
            } else {
                ShopAuthRejection::RedirectToLogin
            }
        };

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or_else(rejection)?;

        let current: CurrentShop = session
            .get(keys::CURRENT_SHOP)
            .await
            .ok()
            .flatten()
            .ok_or_else(rejection)?;

        crate::error::set_sentry_shop(current.shop.as_str());
        Ok(Self(current.shop))
    }
}

/// Record the authenticated shop in the session.
///
/// The session ID is cycled first so a pre-login session cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_shop(
    session: &Session,
    shop: &ShopDomain,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(keys::CURRENT_SHOP, CurrentShop { shop: shop.clone() })
        .await
}

/// Clear all authentication state (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_shop(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
