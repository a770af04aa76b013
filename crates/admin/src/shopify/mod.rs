//! Shopify Admin API client and OAuth helpers.
//!
//! # Architecture
//!
//! - [`AdminClient`] is bound to one shop and its access token; it executes
//!   typed GraphQL operations (see `admin::queries`) against
//!   `https://{shop}/admin/api/{version}/graphql.json`.
//! - [`ShopifyOAuth`] holds the app credentials: it builds install URLs,
//!   verifies callback and webhook signatures, and exchanges codes for tokens.
//! - No retries and no caching: every failure is returned to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use recipe_shelf_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(http, &shop, "2025-01", token);
//! let products = client.search_products("chicken").await?;
//! ```

mod admin;
mod oauth;
pub mod types;

pub use admin::AdminClient;
pub use admin::products::{RECIPE_METAFIELD_KEY, RECIPE_METAFIELD_NAMESPACE};
pub use oauth::{AccessToken, ShopifyOAuth};
pub use types::{ProductMirror, ProductSummary};

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status other than 401/429.
    #[error("HTTP status {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body (may be truncated by the server).
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// OAuth code exchange failed.
    #[error("OAuth error: {0}")]
    OAuth(String),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
