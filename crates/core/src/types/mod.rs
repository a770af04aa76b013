//! Core types for Recipe Shelf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod product;
pub mod shop;

pub use id::{RecipeId, RecipeIdError};
pub use product::{ProductIdError, ShopifyProductId};
pub use shop::{ShopDomain, ShopDomainError};
