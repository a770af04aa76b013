//! Business logic services.
//!
//! # Services
//!
//! - `recipe_sync` - Mirrors recipes into a product metafield

pub mod recipe_sync;

pub use recipe_sync::{MirrorStatus, RecipeMetafield, RecipeSync, SyncError};
