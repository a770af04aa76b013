//! Shopify OAuth install flow and request signatures.
//!
//! - Install: redirect to `https://{shop}/admin/oauth/authorize`, then
//!   exchange the returned code at `/admin/oauth/access_token`.
//! - Callback query strings carry a hex HMAC-SHA256 over the remaining
//!   parameters, sorted by key and joined as `k=v&k=v`.
//! - Webhooks carry a base64 HMAC-SHA256 of the raw body in
//!   `X-Shopify-Hmac-Sha256`.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use tracing::instrument;

use recipe_shelf_core::ShopDomain;

use super::AdminShopifyError;

type HmacSha256 = Hmac<Sha256>;

/// Access token returned by a successful code exchange.
#[derive(Clone)]
pub struct AccessToken {
    pub access_token: SecretString,
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// OAuth token response from Shopify.
#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    scope: String,
}

/// App-level Shopify credentials.
#[derive(Clone)]
pub struct ShopifyOAuth {
    inner: Arc<ShopifyOAuthInner>,
}

struct ShopifyOAuthInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    scopes: Vec<String>,
    redirect_uri: String,
}

impl std::fmt::Debug for ShopifyOAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyOAuth")
            .field("client_id", &self.inner.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.inner.scopes)
            .field("redirect_uri", &self.inner.redirect_uri)
            .finish()
    }
}

impl ShopifyOAuth {
    /// Create the OAuth helper.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        client_id: impl Into<String>,
        client_secret: SecretString,
        scopes: Vec<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(ShopifyOAuthInner {
                client,
                client_id: client_id.into(),
                client_secret,
                scopes,
                redirect_uri: redirect_uri.into(),
            }),
        }
    }

    /// Generate the authorization URL the merchant is redirected to.
    #[must_use]
    pub fn authorization_url(&self, shop: &ShopDomain, state: &str) -> String {
        let scope = self.inner.scopes.join(",");
        format!(
            "https://{}/admin/oauth/authorize?client_id={}&scope={}&redirect_uri={}&state={}",
            shop,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(&scope),
            urlencoding::encode(&self.inner.redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Verify the `hmac` parameter of an OAuth callback query.
    ///
    /// `params` is the full decoded query; `hmac` and `signature` are
    /// excluded from the signed message.
    #[must_use]
    pub fn verify_callback(&self, params: &[(String, String)]) -> bool {
        let Some(provided) = params.iter().find(|(k, _)| k == "hmac").map(|(_, v)| v) else {
            return false;
        };
        let Ok(provided) = hex::decode(provided) else {
            return false;
        };

        let mut pairs: Vec<&(String, String)> = params
            .iter()
            .filter(|(k, _)| k != "hmac" && k != "signature")
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let message = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let Ok(mut mac) = HmacSha256::new_from_slice(self.inner.client_secret.expose_secret().as_bytes())
        else {
            return false;
        };
        mac.update(message.as_bytes());
        mac.verify_slice(&provided).is_ok()
    }

    /// Verify the `X-Shopify-Hmac-Sha256` header of a webhook delivery.
    #[must_use]
    pub fn verify_webhook(&self, body: &[u8], header: &str) -> bool {
        let Ok(provided) = BASE64.decode(header.trim()) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(self.inner.client_secret.expose_secret().as_bytes())
        else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&provided).is_ok()
    }

    /// Exchange an authorization code for an offline access token.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::OAuth` if Shopify rejects the exchange,
    /// `AdminShopifyError::Http` if the request fails.
    #[instrument(skip(self, code), fields(shop = %shop))]
    pub async fn exchange_code(
        &self,
        shop: &ShopDomain,
        code: &str,
    ) -> Result<AccessToken, AdminShopifyError> {
        let url = format!("https://{shop}/admin/oauth/access_token");

        let params = [
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
        ];

        let response = self.inner.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AdminShopifyError::OAuth(format!(
                "Token exchange failed: {text}"
            )));
        }

        let token_response: OAuthTokenResponse = response.json().await?;

        Ok(AccessToken {
            access_token: SecretString::from(token_response.access_token),
            scopes: token_response
                .scope
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}
