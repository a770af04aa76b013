//! Recipe pages and JSON API, driven through the full router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::{StatusCode, header};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use recipe_shelf_admin::models::NewRecipe;
use recipe_shelf_core::ShopifyProductId;
use recipe_shelf_integration_tests::{
    TEST_CLIENT_SECRET, TEST_SHOP, TestApp, body_json, body_text, location, shop,
};

/// Query string signed the way Shopify signs OAuth callbacks.
fn signed_callback_query(params: &[(&str, &str)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable();
    let message = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_CLIENT_SECRET.as_bytes()).unwrap();
    mac.update(message.as_bytes());
    let hmac = hex::encode(mac.finalize().into_bytes());

    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .append_pair("hmac", &hmac)
        .finish()
}

fn burger() -> NewRecipe {
    NewRecipe {
        description: Some("Juicy and flavorful".to_string()),
        cook_time: Some(20),
        servings: Some(4),
        ingredients: Some(vec!["1.5 lbs ground beef".to_string(), "4 buns".to_string()]),
        instructions: Some(vec!["Form patties".to_string(), "Grill".to_string()]),
        tags: Some(vec!["dinner".to_string(), "grilled".to_string()]),
        ..NewRecipe::new(shop(TEST_SHOP), "Texas Trail Dust Burger")
    }
}

// =============================================================================
// Health and authentication
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_pages_redirect_to_login_without_session() {
    let app = TestApp::new();

    for uri in ["/", "/recipes", "/recipes/new"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response).as_deref(), Some("/auth/login"));
    }
}

#[tokio::test]
async fn test_product_search_requires_session() {
    let app = TestApp::new();
    let response = app.get("/api/products/search?query=rub", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_login_page_renders() {
    let app = TestApp::new();
    let response = app.get("/auth/login?error=invalid_shop", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("name=\"shop\""));
    assert!(body.contains("myshopify.com domain"));
}

#[tokio::test]
async fn test_auth_start_rejects_non_myshopify_domain() {
    let app = TestApp::new();
    let response = app.get("/auth?shop=example.com", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/auth/login?error=invalid_shop")
    );
}

#[tokio::test]
async fn test_auth_start_redirects_to_shopify() {
    let app = TestApp::new();
    let response = app.get(&format!("/auth?shop={TEST_SHOP}"), None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).unwrap();
    assert!(target.starts_with(&format!("https://{TEST_SHOP}/admin/oauth/authorize?")));
    assert!(target.contains("client_id=test-client-id"));
    assert!(target.contains("state="));
}

#[tokio::test]
async fn test_callback_with_bad_signature_is_rejected() {
    let app = TestApp::new();
    let response = app
        .get(
            &format!("/auth/callback?code=abc&shop={TEST_SHOP}&state=xyz&hmac=deadbeef"),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/auth/login?error=oauth_invalid_hmac")
    );
}

#[tokio::test]
async fn test_callback_rejects_signed_non_myshopify_host() {
    let app = TestApp::new();
    let query = signed_callback_query(&[
        ("code", "abc"),
        ("shop", "collector.example.com"),
        ("state", "xyz"),
        ("timestamp", "1767225600"),
    ]);
    let response = app.get(&format!("/auth/callback?{query}"), None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/auth/login?error=invalid_shop")
    );
}

// =============================================================================
// HTML pages
// =============================================================================

#[tokio::test]
async fn test_dashboard_shows_recipe_count() {
    let app = TestApp::new();
    app.state.recipes().create(burger()).await.unwrap();
    let cookie = app.login(TEST_SHOP).await;

    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(TEST_SHOP));
    assert!(body.contains(r#"<span class="stat-value">1</span>"#));
}

#[tokio::test]
async fn test_create_then_show() {
    let app = TestApp::new();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .post_form(
            "/recipes",
            Some(&cookie),
            &[
                ("title", "Cajun Shrimp Skewers"),
                ("cookTime", "15"),
                ("servings", "4"),
                ("ingredients", "1 lb shrimp\n\n2 tbsp butter\n"),
                ("instructions", "Thread shrimp\nGrill"),
                ("tags", "seafood, quick"),
                ("productId", ""),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).unwrap();
    assert!(target.starts_with("/recipes/"));
    assert!(target.ends_with("?notice=created"));

    let recipes = app.state.recipes().list(&shop(TEST_SHOP)).await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].ingredients, vec!["1 lb shrimp", "2 tbsp butter"]);
    assert_eq!(recipes[0].tags, vec!["seafood", "quick"]);
    assert!(recipes[0].product_id.is_none());

    let response = app.get(&target, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Cajun Shrimp Skewers"));
    assert!(body.contains("Recipe created."));
    assert!(body.contains("application/ld+json"));
    assert!(body.contains("15 min"));
    assert!(body.contains("Not linked"));
}

#[tokio::test]
async fn test_create_without_title_rerenders_form() {
    let app = TestApp::new();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .post_form(
            "/recipes",
            Some(&cookie),
            &[("title", "  "), ("servings", "4")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Title is required"));
    assert!(body.contains(r#"value="4""#));
    assert_eq!(app.state.recipes().count(&shop(TEST_SHOP)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_zero_servings() {
    let app = TestApp::new();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .post_form(
            "/recipes",
            Some(&cookie),
            &[("title", "Toast"), ("servings", "0")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.state.recipes().count(&shop(TEST_SHOP)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_edit_form_is_prefilled() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .get(&format!("/recipes/{}/edit", recipe.id), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#"value="Texas Trail Dust Burger""#));
    assert!(body.contains("dinner, grilled"));
    assert!(body.contains(&format!(r#"action="/recipes/{}/edit""#, recipe.id)));
}

#[tokio::test]
async fn test_partial_update_keeps_absent_fields() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .post_form(
            &format!("/recipes/{}/edit", recipe.id),
            Some(&cookie),
            &[("servings", "6"), ("description", "")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some(format!("/recipes/{}?notice=updated", recipe.id))
    );

    let updated = app
        .state
        .recipes()
        .get(recipe.id, &shop(TEST_SHOP))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Texas Trail Dust Burger");
    assert_eq!(updated.servings, Some(6));
    assert_eq!(updated.cook_time, Some(20));
    assert_eq!(updated.description, None);
    assert_eq!(updated.ingredients, recipe.ingredients);
}

#[tokio::test]
async fn test_delete_redirects_and_removes() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .post_form(&format!("/recipes/{}/delete", recipe.id), Some(&cookie), &[])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/recipes"));

    let response = app
        .get(&format!("/recipes/{}", recipe.id), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_form(&format!("/recipes/{}/delete", recipe.id), Some(&cookie), &[])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_shops_recipes_are_not_found() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();
    let cookie = app.login("other-store.myshopify.com").await;

    let response = app
        .get(&format!("/recipes/{}", recipe.id), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/recipes", Some(&cookie)).await;
    let body = body_text(response).await;
    assert!(!body.contains("Texas Trail Dust Burger"));
    assert!(body.contains("No recipes yet."));
}

#[tokio::test]
async fn test_invalid_id_is_not_found() {
    let app = TestApp::new();
    let cookie = app.login(TEST_SHOP).await;

    let response = app.get("/recipes/not-a-uuid", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_filters_by_product() {
    let app = TestApp::new();
    let linked = NewRecipe {
        product_id: Some(ShopifyProductId::parse("42").unwrap()),
        ..NewRecipe::new(shop(TEST_SHOP), "Linked Ribs")
    };
    app.state.recipes().create(linked).await.unwrap();
    app.state
        .recipes()
        .create(NewRecipe::new(shop(TEST_SHOP), "Loose Vegetables"))
        .await
        .unwrap();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .get("/recipes?productId=gid://shopify/Product/42", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Linked Ribs"));
    assert!(!body.contains("Loose Vegetables"));
}

#[tokio::test]
async fn test_print_sets_file_name() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .get(&format!("/recipes/{}/print", recipe.id), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        r#"inline; filename="texas_trail_dust_burger.html""#
    );

    let body = body_text(response).await;
    assert!(body.contains(r#""@type":"Recipe""#));
    assert!(body.contains("<li>Form patties</li>"));
}

#[tokio::test]
async fn test_sync_and_unlink_require_linked_product() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();
    let cookie = app.login(TEST_SHOP).await;

    for action in ["sync", "unlink"] {
        let response = app
            .post_form(&format!("/recipes/{}/{action}", recipe.id), Some(&cookie), &[])
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{action}");
    }
}

#[tokio::test]
async fn test_show_degrades_when_catalog_is_unavailable() {
    let app = TestApp::new();
    let linked = NewRecipe {
        product_id: Some(ShopifyProductId::parse("42").unwrap()),
        ..burger()
    };
    let recipe = app.state.recipes().create(linked).await.unwrap();
    let cookie = app.login(TEST_SHOP).await;

    let response = app
        .get(&format!("/recipes/{}", recipe.id), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<strong>Unknown</strong>"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn test_api_requires_shop() {
    let app = TestApp::new();
    let response = app.get("/api/recipes", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Shop parameter required"));
}

#[tokio::test]
async fn test_api_list_and_get() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();

    let response = app.get(&format!("/api/recipes?shop={TEST_SHOP}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(json["recipes"][0]["title"], "Texas Trail Dust Burger");
    assert_eq!(json["recipes"][0]["cookTime"], 20);

    let response = app
        .get(&format!("/api/recipes/{}?shop={TEST_SHOP}", recipe.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["recipe"]["id"], recipe.id.to_string());
    assert_eq!(json["recipe"]["ingredients"][1], "4 buns");
}

#[tokio::test]
async fn test_api_unknown_recipe_is_404() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();

    let response = app
        .get(
            &format!("/api/recipes/{}?shop=other-store.myshopify.com", recipe.id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_api_structured_data() {
    let app = TestApp::new();
    let recipe = app.state.recipes().create(burger()).await.unwrap();

    let response = app
        .get(
            &format!("/api/recipes/{}/structured-data?shop={TEST_SHOP}", recipe.id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["@context"], "https://schema.org/");
    assert_eq!(json["@type"], "Recipe");
    assert_eq!(json["cookTime"], "PT20M");
    assert_eq!(json["recipeYield"], 4);
    assert_eq!(json["recipeInstructions"][1]["position"], 2);
    assert_eq!(json["keywords"], "dinner, grilled");
}
