//! Recipe Shelf Core - Shared types library.
//!
//! This crate provides the value types used across all Recipe Shelf components:
//! - `admin` - Merchant-facing recipe manager (library + binary)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for recipe IDs, shop domains and product references

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
