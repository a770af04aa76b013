//! Recipe Shelf admin library.
//!
//! Merchant-facing recipe manager for Shopify stores. Recipes live in
//! `PostgreSQL`, scoped by shop, and can be mirrored into a product
//! metafield through the Shopify Admin API.
//!
//! The binary in `main.rs` wires these modules into an axum server; the
//! integration tests build the same router over in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
