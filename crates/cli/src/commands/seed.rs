//! Seed a shop with sample recipes.
//!
//! Reads recipes from a YAML file and inserts them through the recipe
//! repository, so list defaults and validation match the admin app.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info};

use recipe_shelf_admin::db::{self, PgRecipeStore, RecipeRepository};
use recipe_shelf_admin::models::NewRecipe;
use recipe_shelf_core::{ShopDomain, ShopifyProductId};

/// One recipe entry in the seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecipe {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub product_id: Option<String>,
}

impl SeedRecipe {
    fn into_new_recipe(self, shop: ShopDomain) -> Result<NewRecipe, Box<dyn std::error::Error>> {
        let product_id = self
            .product_id
            .as_deref()
            .map(ShopifyProductId::parse)
            .transpose()?;

        Ok(NewRecipe {
            shop,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            cook_time: self.cook_time,
            servings: self.servings,
            ingredients: Some(self.ingredients),
            instructions: Some(self.instructions),
            tags: Some(self.tags),
            product_id,
        })
    }
}

/// Parse a seed file.
///
/// # Errors
///
/// Returns an error if the YAML does not describe a list of recipes.
pub fn parse(content: &str) -> Result<Vec<SeedRecipe>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Insert every recipe in `file_path` into `shop`.
///
/// # Errors
///
/// Returns an error if the shop domain is invalid, the file cannot be read
/// or parsed, or the database is unreachable. Individual insert failures
/// are logged and counted.
pub async fn recipes(shop: &str, file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let shop = ShopDomain::parse(shop)?;
    let database_url = super::database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading sample recipes from file");
    let content = tokio::fs::read_to_string(path).await?;
    let seeds = parse(&content)?;
    info!(recipes = seeds.len(), "Parsed seed file");

    let pool = db::create_pool(&database_url).await?;
    let repo = RecipeRepository::new(Arc::new(PgRecipeStore::new(pool)));

    let mut inserted = 0_usize;
    let mut failed = 0_usize;
    for seed in seeds {
        let title = seed.title.clone();
        let result = match seed.into_new_recipe(shop.clone()) {
            Ok(new) => repo.create(new).await.map_err(Into::into),
            Err(e) => Err(e),
        };
        match result {
            Ok(recipe) => {
                info!(recipe_id = %recipe.id, "Created recipe: {title}");
                inserted += 1;
            }
            Err(e) => {
                error!("Failed to create recipe {title}: {e}");
                failed += 1;
            }
        }
    }

    info!("Seeding complete!");
    info!("  Inserted: {inserted}");
    if failed > 0 {
        error!("  Failed: {failed}");
    }

    Ok(())
}
