//! Shopify OAuth install flow.
//!
//! `/auth?shop=` starts the flow, `/auth/callback` finishes it and records
//! the shop in the session.

use askama::Template;
use axum::{
    extract::{Query, RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use recipe_shelf_core::ShopDomain;

use crate::filters;
use crate::middleware::{clear_current_shop, set_current_shop};
use crate::models::session::keys;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Shop-domain login form.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub shop: String,
    pub error_message: Option<String>,
}

// =============================================================================
// Query Parameters
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub shop: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    pub shop: Option<String>,
}

fn error_message(code: &str) -> String {
    match code {
        "invalid_shop" => "Enter a valid *.myshopify.com domain.".to_string(),
        "oauth_denied" => "Authorization was denied.".to_string(),
        "oauth_invalid_hmac" => "Invalid security signature. Please try again.".to_string(),
        "oauth_invalid_state" => "Invalid state parameter. Please try again.".to_string(),
        "oauth_failed" => "Authorization failed. Please try again.".to_string(),
        "oauth_exchange_failed" => "Failed to exchange authorization code.".to_string(),
        "oauth_save_failed" => "Failed to save credentials.".to_string(),
        _ => format!("Error: {code}"),
    }
}

fn login_error(code: &str) -> Response {
    Redirect::to(&format!("/auth/login?error={code}")).into_response()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /auth/login - shop-domain form.
pub async fn login_page(Query(params): Query<LoginQuery>) -> Html<String> {
    let template = LoginPageTemplate {
        shop: params.shop.unwrap_or_default(),
        error_message: params.error.as_deref().map(error_message),
    };
    super::render(&template)
}

/// GET /auth?shop= - start the OAuth flow.
#[instrument(skip(state, session))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<StartQuery>,
) -> Response {
    let Some(shop) = params
        .shop
        .as_deref()
        .and_then(|s| ShopDomain::parse(s).ok())
        .filter(ShopDomain::is_myshopify)
    else {
        return login_error("invalid_shop");
    };

    // CSRF nonce checked by the callback
    let oauth_state = uuid::Uuid::new_v4().to_string();
    if let Err(e) = session.insert(keys::OAUTH_STATE, &oauth_state).await {
        tracing::error!("Failed to store OAuth state: {}", e);
        return login_error("oauth_failed");
    }

    let auth_url = state.oauth().authorization_url(&shop, &oauth_state);
    tracing::info!(shop = %shop, "Redirecting to Shopify OAuth");
    Redirect::to(&auth_url).into_response()
}

/// GET /auth/callback - verify, exchange the code, and log the shop in.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    RawQuery(query): RawQuery,
) -> Response {
    let params: Vec<(String, String)> =
        url::form_urlencoded::parse(query.as_deref().unwrap_or_default().as_bytes())
            .into_owned()
            .collect();
    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    if let Some(error) = param("error") {
        tracing::error!("Shopify OAuth error: {}", error);
        return login_error("oauth_denied");
    }

    if !state.oauth().verify_callback(&params) {
        tracing::error!("Invalid HMAC signature in OAuth callback");
        return login_error("oauth_invalid_hmac");
    }

    let (Some(code), Some(callback_state), Some(raw_shop)) =
        (param("code"), param("state"), param("shop"))
    else {
        tracing::error!("Missing parameters in OAuth callback");
        return login_error("oauth_failed");
    };

    // The code exchange posts the client secret to this host
    let Some(shop) = ShopDomain::parse(raw_shop)
        .ok()
        .filter(ShopDomain::is_myshopify)
    else {
        tracing::error!(shop = raw_shop, "OAuth callback for a non-Shopify host");
        return login_error("invalid_shop");
    };

    let stored_state: Option<String> = session.get(keys::OAUTH_STATE).await.ok().flatten();
    if stored_state.as_deref() != Some(callback_state) {
        tracing::error!("OAuth state mismatch");
        return login_error("oauth_invalid_state");
    }
    let _ = session.remove::<String>(keys::OAUTH_STATE).await;

    let token = match state.oauth().exchange_code(&shop, code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange OAuth code: {}", e);
            return login_error("oauth_exchange_failed");
        }
    };

    if let Err(e) = state.tokens().save(&shop, &token.access_token, &token.scopes).await {
        tracing::error!("Failed to save shop token: {}", e);
        return login_error("oauth_save_failed");
    }

    if let Err(e) = set_current_shop(&session, &shop).await {
        tracing::error!("Failed to record shop in session: {}", e);
        return login_error("oauth_failed");
    }

    tracing::info!(shop = %shop, "Shop authenticated");
    Redirect::to("/").into_response()
}

/// POST /auth/logout - clear the session.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_shop(&session).await {
        tracing::warn!("Failed to clear session: {}", e);
    }
    Redirect::to("/auth/login")
}
