//! HTTP middleware for the admin app.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing with status and latency)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. `RequireShop` extractor on protected handlers

pub mod auth;
pub mod session;

pub use auth::{RequireShop, ShopAuthRejection, clear_current_shop, set_current_shop};
pub use session::{SESSION_COOKIE_NAME, configure_session_layer, create_session_layer};
