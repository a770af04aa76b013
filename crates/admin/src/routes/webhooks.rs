//! Shopify webhook receiver.
//!
//! Deliveries are authenticated by the base64 HMAC in
//! `X-Shopify-Hmac-Sha256`. Unknown topics are acknowledged with 200 so
//! Shopify does not retry them.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;

use recipe_shelf_core::ShopDomain;

use crate::error::AppError;
use crate::state::AppState;

const HMAC_HEADER: &str = "x-shopify-hmac-sha256";
const TOPIC_HEADER: &str = "x-shopify-topic";
const SHOP_HEADER: &str = "x-shopify-shop-domain";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /webhooks
///
/// # Errors
///
/// 401 if the signature is missing or wrong, 400 without a shop domain,
/// 500 if cleanup fails (Shopify retries the delivery).
#[instrument(skip_all, fields(topic = tracing::field::Empty, shop = tracing::field::Empty))]
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let signature = header(&headers, HMAC_HEADER).unwrap_or_default();
    if !state.oauth().verify_webhook(&body, signature) {
        tracing::warn!("Rejected webhook with invalid signature");
        return Err(AppError::Unauthorized("invalid webhook signature".to_string()));
    }

    let topic = header(&headers, TOPIC_HEADER).unwrap_or_default();
    let shop = header(&headers, SHOP_HEADER)
        .and_then(|s| ShopDomain::parse(s).ok())
        .ok_or_else(|| AppError::BadRequest("missing shop domain".to_string()))?;

    let span = tracing::Span::current();
    span.record("topic", topic);
    span.record("shop", shop.as_str());

    match topic {
        "app/uninstalled" => {
            let removed = state.tokens().delete(&shop).await?;
            tracing::info!(removed, "App uninstalled, token deleted");
        }
        "shop/redact" => {
            let purged = state.recipes().purge(&shop).await?;
            state.tokens().delete(&shop).await?;
            tracing::info!(purged, "Shop data redacted");
        }
        _ => tracing::debug!("Webhook topic ignored"),
    }

    Ok(StatusCode::OK)
}
