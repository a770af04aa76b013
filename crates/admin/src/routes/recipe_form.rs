//! Recipe form parsing.
//!
//! Rules shared by create and edit:
//! - `cookTime` is a whole number of minutes (0 or more), `servings` at
//!   least 1; blank means none.
//! - `productId` is a bare number or a `gid://shopify/Product/<n>` ID.
//! - `imageUrl` must be an absolute `http(s)` URL.
//! - List fields take JSON array text or plain text: ingredients and
//!   instructions one per line, tags separated by commas. Entries are
//!   trimmed and blanks dropped.
//!
//! On edit, a field missing from the submission is left unchanged while a
//! present but blank optional field clears the stored value.

use serde::Deserialize;
use thiserror::Error;

use recipe_shelf_core::{ShopDomain, ShopifyProductId};

use crate::db::recipes::decode_list;
use crate::models::{NewRecipe, Recipe, RecipeUpdate};

/// A field value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title is required")]
    MissingTitle,
    #[error("{field} must be a whole number")]
    InvalidNumber { field: &'static str },
    #[error("{field} must be {min} or more")]
    TooSmall { field: &'static str, min: u32 },
    #[error("Product ID must be a number or a Shopify product ID")]
    InvalidProductId,
    #[error("Image URL must be an absolute http(s) URL")]
    InvalidImageUrl,
}

/// Which separator plain-text list input uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// One entry per line.
    Lines,
    /// Comma-separated (newlines also accepted).
    Commas,
}

/// Raw create/edit form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFormInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<String>,
    pub product_id: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub tags: Option<String>,
}

/// Parse list input as JSON array text or plain text.
#[must_use]
pub fn parse_list(raw: &str, kind: ListKind) -> Vec<String> {
    let trimmed = raw.trim();

    let items: Vec<String> = if trimmed.starts_with('[')
        && let Ok(value @ serde_json::Value::Array(_)) =
            serde_json::from_str::<serde_json::Value>(trimmed)
    {
        decode_list(&value)
    } else {
        match kind {
            ListKind::Lines => trimmed.lines().map(str::to_string).collect(),
            ListKind::Commas => trimmed
                .split([',', '\n'])
                .map(str::to_string)
                .collect(),
        }
    };

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn blank_to_none(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_count(raw: &str, field: &'static str, min: u32) -> Result<Option<u32>, FormError> {
    let Some(value) = blank_to_none(raw) else {
        return Ok(None);
    };
    let number: i64 = value
        .parse()
        .map_err(|_| FormError::InvalidNumber { field })?;
    if number < i64::from(min) {
        return Err(FormError::TooSmall { field, min });
    }
    u32::try_from(number)
        .map(Some)
        .map_err(|_| FormError::InvalidNumber { field })
}

fn parse_product_id(raw: &str) -> Result<Option<ShopifyProductId>, FormError> {
    blank_to_none(raw)
        .map(|value| ShopifyProductId::parse(value).map_err(|_| FormError::InvalidProductId))
        .transpose()
}

fn parse_image_url(raw: &str) -> Result<Option<String>, FormError> {
    let Some(value) = blank_to_none(raw) else {
        return Ok(None);
    };
    let url = url::Url::parse(value).map_err(|_| FormError::InvalidImageUrl)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FormError::InvalidImageUrl);
    }
    Ok(Some(value.to_string()))
}

fn parse_text(raw: &str) -> Option<String> {
    blank_to_none(raw).map(str::to_string)
}

fn parse_title(raw: Option<&str>) -> Result<String, FormError> {
    raw.and_then(blank_to_none)
        .map(str::to_string)
        .ok_or(FormError::MissingTitle)
}

impl RecipeFormInput {
    /// Validate a create submission.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn into_new_recipe(self, shop: ShopDomain) -> Result<NewRecipe, FormError> {
        Ok(NewRecipe {
            shop,
            title: parse_title(self.title.as_deref())?,
            description: self.description.as_deref().and_then(parse_text),
            image_url: self
                .image_url
                .as_deref()
                .map(parse_image_url)
                .transpose()?
                .flatten(),
            cook_time: self
                .cook_time
                .as_deref()
                .map(|v| parse_count(v, "Cook time", 0))
                .transpose()?
                .flatten(),
            servings: self
                .servings
                .as_deref()
                .map(|v| parse_count(v, "Servings", 1))
                .transpose()?
                .flatten(),
            ingredients: self.ingredients.map(|v| parse_list(&v, ListKind::Lines)),
            instructions: self.instructions.map(|v| parse_list(&v, ListKind::Lines)),
            tags: self.tags.map(|v| parse_list(&v, ListKind::Commas)),
            product_id: self
                .product_id
                .as_deref()
                .map(parse_product_id)
                .transpose()?
                .flatten(),
        })
    }

    /// Validate an edit submission into a partial update.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn into_update(self) -> Result<RecipeUpdate, FormError> {
        Ok(RecipeUpdate {
            title: self
                .title
                .as_deref()
                .map(|v| parse_title(Some(v)))
                .transpose()?,
            description: self.description.as_deref().map(parse_text),
            image_url: self.image_url.as_deref().map(parse_image_url).transpose()?,
            cook_time: self
                .cook_time
                .as_deref()
                .map(|v| parse_count(v, "Cook time", 0))
                .transpose()?,
            servings: self
                .servings
                .as_deref()
                .map(|v| parse_count(v, "Servings", 1))
                .transpose()?,
            ingredients: self.ingredients.map(|v| parse_list(&v, ListKind::Lines)),
            instructions: self.instructions.map(|v| parse_list(&v, ListKind::Lines)),
            tags: self.tags.map(|v| parse_list(&v, ListKind::Commas)),
            product_id: self.product_id.as_deref().map(parse_product_id).transpose()?,
        })
    }
}

/// Form field values for rendering the create/edit page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFormValues {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub cook_time: String,
    pub servings: String,
    pub product_id: String,
    pub ingredients: String,
    pub instructions: String,
    pub tags: String,
}

impl From<&Recipe> for RecipeFormValues {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone().unwrap_or_default(),
            image_url: recipe.image_url.clone().unwrap_or_default(),
            cook_time: recipe.cook_time.map(|v| v.to_string()).unwrap_or_default(),
            servings: recipe.servings.map(|v| v.to_string()).unwrap_or_default(),
            product_id: recipe
                .product_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            ingredients: recipe.ingredients.join("\n"),
            instructions: recipe.instructions.join("\n"),
            tags: recipe.tags.join(", "),
        }
    }
}

impl From<&RecipeFormInput> for RecipeFormValues {
    fn from(input: &RecipeFormInput) -> Self {
        let value = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            title: value(&input.title),
            description: value(&input.description),
            image_url: value(&input.image_url),
            cook_time: value(&input.cook_time),
            servings: value(&input.servings),
            product_id: value(&input.product_id),
            ingredients: value(&input.ingredients),
            instructions: value(&input.instructions),
            tags: value(&input.tags),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shop() -> ShopDomain {
        ShopDomain::parse("test-store.myshopify.com").unwrap()
    }

    fn input(pairs: &[(&str, &str)]) -> RecipeFormInput {
        let fields: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String((*v).to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(fields)).unwrap()
    }

    #[test]
    fn test_parse_list_plain_lines() {
        assert_eq!(
            parse_list("  2 lbs chicken \n\n1 tbsp salt\r\n  ", ListKind::Lines),
            vec!["2 lbs chicken", "1 tbsp salt"]
        );
    }

    #[test]
    fn test_parse_list_json_array() {
        assert_eq!(
            parse_list(r#"["Season", " ", "Grill "]"#, ListKind::Lines),
            vec!["Season", "Grill"]
        );
    }

    #[test]
    fn test_parse_list_tags() {
        assert_eq!(
            parse_list("bbq, texas,,  smoked ", ListKind::Commas),
            vec!["bbq", "texas", "smoked"]
        );
    }

    #[test]
    fn test_parse_list_malformed_json_is_text() {
        assert_eq!(parse_list("[not json", ListKind::Lines), vec!["[not json"]);
    }

    #[test]
    fn test_new_recipe_full() {
        let new = input(&[
            ("title", " Cajun Shrimp Skewers "),
            ("cookTime", "15"),
            ("servings", "4"),
            ("productId", "gid://shopify/Product/8123"),
            ("imageUrl", "https://cdn.example.com/shrimp.jpg"),
            ("ingredients", "1 lb shrimp\n2 tbsp seasoning"),
            ("tags", "seafood, cajun"),
            ("description", "  "),
        ])
        .into_new_recipe(shop())
        .unwrap();

        assert_eq!(new.title, "Cajun Shrimp Skewers");
        assert_eq!(new.cook_time, Some(15));
        assert_eq!(new.servings, Some(4));
        assert_eq!(new.product_id.unwrap().as_str(), "8123");
        assert_eq!(new.description, None);
        assert_eq!(new.ingredients.unwrap().len(), 2);
        assert_eq!(new.instructions, None);
        assert_eq!(new.tags.unwrap(), vec!["seafood", "cajun"]);
    }

    #[test]
    fn test_new_recipe_requires_title() {
        let err = input(&[("title", "   ")]).into_new_recipe(shop()).unwrap_err();
        assert_eq!(err, FormError::MissingTitle);
        let err = input(&[]).into_new_recipe(shop()).unwrap_err();
        assert_eq!(err, FormError::MissingTitle);
    }

    #[test]
    fn test_numeric_validation() {
        let err = input(&[("title", "x"), ("servings", "0")])
            .into_new_recipe(shop())
            .unwrap_err();
        assert_eq!(err, FormError::TooSmall { field: "Servings", min: 1 });

        let err = input(&[("title", "x"), ("cookTime", "-5")])
            .into_new_recipe(shop())
            .unwrap_err();
        assert_eq!(err, FormError::TooSmall { field: "Cook time", min: 0 });

        let err = input(&[("title", "x"), ("cookTime", "soon")])
            .into_new_recipe(shop())
            .unwrap_err();
        assert_eq!(err, FormError::InvalidNumber { field: "Cook time" });

        let new = input(&[("title", "x"), ("cookTime", "0")])
            .into_new_recipe(shop())
            .unwrap();
        assert_eq!(new.cook_time, Some(0));
    }

    #[test]
    fn test_image_url_validation() {
        let err = input(&[("title", "x"), ("imageUrl", "javascript:alert(1)")])
            .into_new_recipe(shop())
            .unwrap_err();
        assert_eq!(err, FormError::InvalidImageUrl);

        let err = input(&[("title", "x"), ("imageUrl", "/relative.png")])
            .into_new_recipe(shop())
            .unwrap_err();
        assert_eq!(err, FormError::InvalidImageUrl);
    }

    #[test]
    fn test_product_id_validation() {
        let err = input(&[("title", "x"), ("productId", "shirt")])
            .into_new_recipe(shop())
            .unwrap_err();
        assert_eq!(err, FormError::InvalidProductId);
    }

    #[test]
    fn test_update_absent_vs_blank() {
        let update = input(&[("servings", "6"), ("description", ""), ("productId", " ")])
            .into_update()
            .unwrap();

        assert_eq!(update.title, None);
        assert_eq!(update.servings, Some(Some(6)));
        assert_eq!(update.description, Some(None));
        assert_eq!(update.product_id, Some(None));
        assert_eq!(update.cook_time, None);
        assert_eq!(update.ingredients, None);
    }

    #[test]
    fn test_update_blank_title_rejected() {
        let err = input(&[("title", "")]).into_update().unwrap_err();
        assert_eq!(err, FormError::MissingTitle);
    }

    #[test]
    fn test_update_blank_list_clears() {
        let update = input(&[("tags", "")]).into_update().unwrap();
        assert_eq!(update.tags, Some(vec![]));
    }
}
