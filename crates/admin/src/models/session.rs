//! Session-related types for shop authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use recipe_shelf_core::ShopDomain;

/// Session-stored shop identity.
///
/// Written by the OAuth callback once the shop's access token is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentShop {
    /// The authenticated shop (tenant).
    pub shop: ShopDomain,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current authenticated shop.
    pub const CURRENT_SHOP: &str = "current_shop";

    /// Key for the OAuth `state` nonce between `/auth` and `/auth/callback`.
    pub const OAUTH_STATE: &str = "shopify_oauth_state";
}
