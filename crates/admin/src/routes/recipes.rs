//! Recipe management route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use recipe_shelf_core::{RecipeId, ShopDomain, ShopifyProductId};

use crate::{
    error::AppError,
    filters,
    middleware::RequireShop,
    models::{Recipe, RecipeJsonLd, RecipeUpdate},
    services::{MirrorStatus, RecipeSync},
    state::AppState,
};

use super::recipe_form::{RecipeFormInput, RecipeFormValues};

// =============================================================================
// Templates
// =============================================================================

/// Recipe list page template.
#[derive(Template)]
#[template(path = "recipes/index.html")]
pub struct RecipesIndexTemplate {
    pub shop: String,
    pub current_path: String,
    pub recipes: Vec<Recipe>,
    pub product_filter: Option<String>,
}

/// Create/edit form template.
#[derive(Template)]
#[template(path = "recipes/form.html")]
pub struct RecipeFormTemplate {
    pub shop: String,
    pub current_path: String,
    pub heading: String,
    pub action: String,
    pub cancel_href: String,
    pub values: RecipeFormValues,
    pub error: Option<String>,
}

/// Recipe detail template.
#[derive(Template)]
#[template(path = "recipes/show.html")]
pub struct RecipeShowTemplate {
    pub shop: String,
    pub current_path: String,
    pub recipe: Recipe,
    pub json_ld: String,
    pub mirror_status: String,
    pub notice: Option<String>,
}

/// Printable recipe template.
#[derive(Template)]
#[template(path = "recipes/print.html")]
pub struct RecipePrintTemplate {
    pub recipe: Recipe,
    pub json_ld: String,
    pub slug: String,
}

// =============================================================================
// Query Parameters
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub product_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

fn notice_message(code: &str) -> Option<String> {
    let message = match code {
        "created" => "Recipe created.",
        "updated" => "Recipe saved.",
        "synced" => "Recipe synced to the linked product.",
        "unlinked" => "Recipe unlinked from the product.",
        _ => return None,
    };
    Some(message.to_string())
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_id(raw: &str) -> Result<RecipeId, AppError> {
    RecipeId::parse(raw).map_err(|_| AppError::NotFound("recipe".to_string()))
}

async fn load(state: &AppState, id: &str, shop: &ShopDomain) -> Result<Recipe, AppError> {
    state
        .recipes()
        .get(parse_id(id)?, shop)
        .await?
        .ok_or_else(|| AppError::NotFound("recipe".to_string()))
}

fn form_page(
    shop: &ShopDomain,
    recipe_id: Option<RecipeId>,
    values: RecipeFormValues,
    error: Option<String>,
) -> RecipeFormTemplate {
    let (heading, action, cancel_href) = match recipe_id {
        Some(id) => (
            "Edit recipe".to_string(),
            format!("/recipes/{id}/edit"),
            format!("/recipes/{id}"),
        ),
        None => (
            "New recipe".to_string(),
            "/recipes".to_string(),
            "/recipes".to_string(),
        ),
    };

    RecipeFormTemplate {
        shop: shop.to_string(),
        current_path: "/recipes".to_string(),
        heading,
        action,
        cancel_href,
        values,
        error,
    }
}

fn invalid_form(template: &RecipeFormTemplate) -> Response {
    (StatusCode::BAD_REQUEST, super::render(template)).into_response()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /recipes - recipe list, optionally filtered by product.
#[instrument(skip_all, fields(shop = %shop))]
pub async fn index(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, AppError> {
    let product_filter = query
        .product_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|raw| ShopifyProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string())))
        .transpose()?;

    let recipes = match &product_filter {
        Some(product_id) => state.recipes().list_by_product(&shop, product_id).await?,
        None => state.recipes().list(&shop).await?,
    };

    let template = RecipesIndexTemplate {
        shop: shop.to_string(),
        current_path: "/recipes".to_string(),
        recipes,
        product_filter: product_filter.map(|p| p.to_string()),
    };

    Ok(super::render(&template))
}

/// GET /recipes/new - empty create form.
#[instrument(skip_all, fields(shop = %shop))]
pub async fn new_recipe(RequireShop(shop): RequireShop) -> Html<String> {
    super::render(&form_page(&shop, None, RecipeFormValues::default(), None))
}

/// POST /recipes - create a recipe.
#[instrument(skip_all, fields(shop = %shop))]
pub async fn create(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Form(input): Form<RecipeFormInput>,
) -> Result<Response, AppError> {
    let values = RecipeFormValues::from(&input);
    let new = match input.into_new_recipe(shop.clone()) {
        Ok(new) => new,
        Err(e) => {
            return Ok(invalid_form(&form_page(&shop, None, values, Some(e.to_string()))));
        }
    };

    let recipe = state.recipes().create(new).await?;
    tracing::info!(recipe_id = %recipe.id, title = %recipe.title, "Recipe created");

    Ok(Redirect::to(&format!("/recipes/{}?notice=created", recipe.id)).into_response())
}

/// GET /recipes/{id} - recipe detail with structured data and mirror status.
#[instrument(skip_all, fields(shop = %shop, recipe_id = %id))]
pub async fn show(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let recipe = load(&state, &id, &shop).await?;

    let mirror_status = if recipe.product_id.is_some() {
        let status = match state.catalog(&shop).await {
            Ok(catalog) => RecipeSync::new(&catalog)
                .mirror_status(&recipe)
                .await
                .map_err(AppError::from),
            Err(e) => Err(e),
        };
        status.map_or_else(
            |e| {
                tracing::warn!(error = %e, "Could not read product mirror");
                "Unknown".to_string()
            },
            |s| s.label().to_string(),
        )
    } else {
        MirrorStatus::NotLinked.label().to_string()
    };

    let template = RecipeShowTemplate {
        shop: shop.to_string(),
        current_path: "/recipes".to_string(),
        json_ld: RecipeJsonLd::from(&recipe).to_script_json(),
        recipe,
        mirror_status,
        notice: query.notice.as_deref().and_then(notice_message),
    };

    Ok(super::render(&template))
}

/// GET /recipes/{id}/edit - edit form.
#[instrument(skip_all, fields(shop = %shop, recipe_id = %id))]
pub async fn edit(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let recipe = load(&state, &id, &shop).await?;
    let values = RecipeFormValues::from(&recipe);
    Ok(super::render(&form_page(&shop, Some(recipe.id), values, None)))
}

/// POST /recipes/{id}/edit - partial update.
#[instrument(skip_all, fields(shop = %shop, recipe_id = %id))]
pub async fn update(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<RecipeFormInput>,
) -> Result<Response, AppError> {
    let recipe_id = parse_id(&id)?;
    let values = RecipeFormValues::from(&input);
    let update = match input.into_update() {
        Ok(update) => update,
        Err(e) => {
            return Ok(invalid_form(&form_page(
                &shop,
                Some(recipe_id),
                values,
                Some(e.to_string()),
            )));
        }
    };

    let recipe = state.recipes().update(recipe_id, &shop, update).await?;
    tracing::info!(recipe_id = %recipe.id, "Recipe updated");

    Ok(Redirect::to(&format!("/recipes/{}?notice=updated", recipe.id)).into_response())
}

/// POST /recipes/{id}/delete - delete and return to the list.
#[instrument(skip_all, fields(shop = %shop, recipe_id = %id))]
pub async fn delete(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let recipe_id = parse_id(&id)?;
    state.recipes().delete(recipe_id, &shop).await?;
    tracing::info!("Recipe deleted");
    Ok(Redirect::to("/recipes"))
}

/// GET /recipes/{id}/print - printable page for browser print / save as PDF.
#[instrument(skip_all, fields(shop = %shop, recipe_id = %id))]
pub async fn print(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let recipe = load(&state, &id, &shop).await?;
    let slug = recipe.file_slug();

    let template = RecipePrintTemplate {
        json_ld: RecipeJsonLd::from(&recipe).to_script_json(),
        slug: slug.clone(),
        recipe,
    };

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{slug}.html\""),
        )],
        super::render(&template),
    )
        .into_response())
}

/// POST /recipes/{id}/sync - push the recipe into its product's metafield.
#[instrument(skip_all, fields(shop = %shop, recipe_id = %id))]
pub async fn sync(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let recipe = load(&state, &id, &shop).await?;
    if recipe.product_id.is_none() {
        return Err(crate::services::SyncError::NotLinked.into());
    }

    let catalog = state.catalog(&shop).await?;
    RecipeSync::new(&catalog).push(&recipe).await?;

    Ok(Redirect::to(&format!("/recipes/{}?notice=synced", recipe.id)))
}

/// POST /recipes/{id}/unlink - remove the product mirror and clear the link.
#[instrument(skip_all, fields(shop = %shop, recipe_id = %id))]
pub async fn unlink(
    RequireShop(shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let recipe = load(&state, &id, &shop).await?;
    let Some(product_id) = recipe.product_id.as_ref() else {
        return Err(crate::services::SyncError::NotLinked.into());
    };

    let catalog = state.catalog(&shop).await?;
    RecipeSync::new(&catalog).unlink(product_id).await?;

    state
        .recipes()
        .update(recipe.id, &shop, RecipeUpdate {
            product_id: Some(None),
            ..RecipeUpdate::default()
        })
        .await?;

    Ok(Redirect::to(&format!("/recipes/{}?notice=unlinked", recipe.id)))
}
