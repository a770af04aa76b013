//! Domain models for the recipe shelf.

pub mod recipe;
pub mod session;
pub mod structured_data;

pub use recipe::{NewRecipe, Recipe, RecipeUpdate};
pub use session::CurrentShop;
pub use structured_data::RecipeJsonLd;
