//! schema.org `Recipe` JSON-LD.
//!
//! See <https://schema.org/Recipe>. Optional properties are omitted rather
//! than emitted as `null`, which search engines treat as invalid.

use serde::Serialize;

use super::recipe::Recipe;

/// A `Recipe` structured-data object.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeJsonLd {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// ISO 8601 duration, `PT<minutes>M`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<u32>,
    pub recipe_ingredient: Vec<String>,
    pub recipe_instructions: Vec<HowToStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// One instruction step.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HowToStep {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    /// 1-based.
    pub position: usize,
    pub text: String,
}

impl From<&Recipe> for RecipeJsonLd {
    fn from(recipe: &Recipe) -> Self {
        let keywords = (!recipe.tags.is_empty()).then(|| recipe.tags.join(", "));

        Self {
            context: "https://schema.org/",
            kind: "Recipe",
            name: recipe.title.clone(),
            description: recipe.description.clone(),
            image: recipe.image_url.clone(),
            cook_time: recipe.cook_time.map(|minutes| format!("PT{minutes}M")),
            recipe_yield: recipe.servings,
            recipe_ingredient: recipe.ingredients.clone(),
            recipe_instructions: recipe
                .instructions
                .iter()
                .enumerate()
                .map(|(i, text)| HowToStep {
                    kind: "HowToStep",
                    position: i + 1,
                    text: text.clone(),
                })
                .collect(),
            keywords,
        }
    }
}

impl RecipeJsonLd {
    /// Serialize for embedding inside a `<script type="application/ld+json">`
    /// element. `<` is escaped so recipe text cannot close the script tag.
    #[must_use]
    pub fn to_script_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| "{}".to_string())
            .replace('<', "\\u003c")
    }
}
