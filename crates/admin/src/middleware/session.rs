//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shelf_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with the `PostgreSQL` store (`shelf.session`).
///
/// # Errors
///
/// Returns `sqlx::Error` if the schema or table name is rejected.
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<SessionManagerLayer<PostgresStore>, sqlx::Error> {
    // The session table is created by migration in the shelf schema.
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("shelf")
        .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?
        .with_table_name("session")
        .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?;

    Ok(configure_session_layer(store, config.is_secure()))
}

/// Apply the cookie settings to a session layer over any store.
///
/// `SameSite=Lax` is required: the OAuth callback arrives as a top-level
/// cross-site navigation from Shopify and must carry the session cookie.
#[must_use]
pub fn configure_session_layer<S: SessionStore + Clone>(
    store: S,
    secure: bool,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
