//! Admin API client and recipe sync against a mock Shopify GraphQL endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use recipe_shelf_admin::db::{MemoryRecipeStore, RecipeRepository};
use recipe_shelf_admin::models::{NewRecipe, Recipe, RecipeUpdate};
use recipe_shelf_admin::services::{MirrorStatus, RecipeMetafield, RecipeSync, SyncError};
use recipe_shelf_admin::shopify::{AdminClient, AdminShopifyError};
use recipe_shelf_core::ShopifyProductId;
use recipe_shelf_integration_tests::{TEST_SHOP, shop};

const GRAPHQL_PATH: &str = "/admin/api/2025-01/graphql.json";
const ACCESS_TOKEN: &str = "shpat_test_token";

fn client(server: &MockServer) -> AdminClient {
    AdminClient::with_endpoint(
        reqwest::Client::new(),
        &shop(TEST_SHOP),
        format!("{}{GRAPHQL_PATH}", server.uri()),
        SecretString::from(ACCESS_TOKEN),
    )
}

fn recipes() -> RecipeRepository {
    RecipeRepository::new(Arc::new(MemoryRecipeStore::new()))
}

async fn linked_recipe(repo: &RecipeRepository) -> Recipe {
    repo.create(NewRecipe {
        cook_time: Some(180),
        servings: Some(6),
        ingredients: Some(vec!["2 racks of ribs".to_string()]),
        instructions: Some(vec!["Rub".to_string(), "Bake".to_string()]),
        tags: Some(vec!["bbq".to_string()]),
        product_id: Some(ShopifyProductId::parse("42").unwrap()),
        ..NewRecipe::new(shop(TEST_SHOP), "Texas-Style BBQ Ribs")
    })
    .await
    .unwrap()
}

/// A product with one recipe metafield slot, kept across requests.
#[derive(Clone, Default)]
struct FakeProduct {
    metafield: Arc<Mutex<Option<String>>>,
}

impl Respond for FakeProduct {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let mut slot = self.metafield.lock().unwrap();

        let data = match body["operationName"].as_str().unwrap() {
            "SetProductMetafield" => {
                let input = &body["variables"]["metafields"][0];
                assert_eq!(input["ownerId"], "gid://shopify/Product/42");
                assert_eq!(input["namespace"], "custom");
                assert_eq!(input["key"], "recipe_data");
                assert_eq!(input["type"], "json");
                let value = input["value"].as_str().unwrap().to_string();
                *slot = Some(value.clone());
                json!({
                    "metafieldsSet": {
                        "metafields": [{
                            "id": "gid://shopify/Metafield/9",
                            "namespace": "custom",
                            "key": "recipe_data",
                            "value": value,
                            "updatedAt": "2026-06-01T12:00:00Z"
                        }],
                        "userErrors": []
                    }
                })
            }
            "GetProductMetafield" => json!({
                "product": {
                    "id": "gid://shopify/Product/42",
                    "metafield": slot.as_ref().map(|value| json!({
                        "id": "gid://shopify/Metafield/9",
                        "value": value
                    }))
                }
            }),
            "DeleteProductMetafield" => {
                *slot = None;
                json!({
                    "metafieldsDelete": {
                        "deletedMetafields": [{
                            "ownerId": "gid://shopify/Product/42",
                            "namespace": "custom",
                            "key": "recipe_data"
                        }],
                        "userErrors": []
                    }
                })
            }
            other => panic!("unexpected operation {other}"),
        };

        ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
    }
}

#[tokio::test]
async fn test_push_pull_unlink_round_trip() {
    let server = MockServer::start().await;
    let product = FakeProduct::default();
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", ACCESS_TOKEN))
        .respond_with(product.clone())
        .mount(&server)
        .await;

    let repo = recipes();
    let recipe = linked_recipe(&repo).await;
    let catalog = client(&server);
    let sync = RecipeSync::new(&catalog);
    let product_id = recipe.product_id.clone().unwrap();

    assert_eq!(sync.mirror_status(&recipe).await.unwrap(), MirrorStatus::Missing);

    let mirror = sync.push(&recipe).await.unwrap();
    assert_eq!(mirror.product_id, product_id);
    assert_eq!(mirror.metafield_id, "gid://shopify/Metafield/9");
    assert_eq!(mirror.value["recipeId"], recipe.id.to_string());
    assert_eq!(mirror.value["cookTime"], 180);

    let pulled = sync.pull(&product_id).await.unwrap().unwrap();
    assert_eq!(pulled, RecipeMetafield::from(&recipe));
    assert_eq!(sync.mirror_status(&recipe).await.unwrap(), MirrorStatus::InSync);

    let edited = repo
        .update(
            recipe.id,
            &recipe.shop,
            RecipeUpdate {
                servings: Some(Some(8)),
                ..RecipeUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(sync.mirror_status(&edited).await.unwrap(), MirrorStatus::Stale);

    sync.unlink(&product_id).await.unwrap();
    assert!(product.metafield.lock().unwrap().is_none());
    assert!(sync.pull(&product_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unreadable_mirror_counts_as_stale() {
    let server = MockServer::start().await;
    let product = FakeProduct::default();
    *product.metafield.lock().unwrap() = Some(r#"{"legacy":true}"#.to_string());
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(product)
        .mount(&server)
        .await;

    let repo = recipes();
    let recipe = linked_recipe(&repo).await;
    let catalog = client(&server);

    assert_eq!(
        RecipeSync::new(&catalog).mirror_status(&recipe).await.unwrap(),
        MirrorStatus::Stale
    );
}

#[tokio::test]
async fn test_search_strips_global_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "operationName": "SearchProducts",
            "variables": { "first": 10, "query": "dust" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "products": {
                    "edges": [
                        { "node": {
                            "id": "gid://shopify/Product/123",
                            "title": "Texas Trail Dust",
                            "featuredImage": { "url": "https://cdn.example.com/dust.jpg" }
                        } },
                        { "node": {
                            "id": "gid://shopify/Product/456",
                            "title": "Gift Card",
                            "featuredImage": null
                        } }
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = client(&server).search_products("  dust ").await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.as_str(), "123");
    assert_eq!(products[0].title, "Texas Trail Dust");
    assert_eq!(
        products[0].image_url.as_deref(),
        Some("https://cdn.example.com/dust.jpg")
    );
    assert_eq!(products[1].image_url, None);

    let json = serde_json::to_value(&products[0]).unwrap();
    assert_eq!(json["id"], "123");
    assert_eq!(json["image"], "https://cdn.example.com/dust.jpg");
}

#[tokio::test]
async fn test_user_errors_fail_the_push() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "metafieldsSet": {
                    "metafields": [],
                    "userErrors": [
                        { "field": ["metafields", "0", "ownerId"], "message": "Owner does not exist" }
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    let repo = recipes();
    let recipe = linked_recipe(&repo).await;
    let catalog = client(&server);

    let err = RecipeSync::new(&catalog).push(&recipe).await.unwrap_err();
    match err {
        SyncError::Shopify(AdminShopifyError::UserError(message)) => {
            assert_eq!(message, "Owner does not exist");
        }
        other => panic!("expected user error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
        .mount(&server)
        .await;

    let err = client(&server).search_products("ribs").await.unwrap_err();
    assert!(matches!(err, AdminShopifyError::RateLimited(5)));
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).search_products("ribs").await.unwrap_err();
    assert!(matches!(err, AdminShopifyError::Unauthorized(_)));
}

#[tokio::test]
async fn test_graphql_errors_are_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "locations": [], "path": [] }]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_product_metafield(&ShopifyProductId::parse("42").unwrap())
        .await
        .unwrap_err();
    match err {
        AdminShopifyError::GraphQL(errors) => assert_eq!(errors[0].message, "Throttled"),
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server).search_products("ribs").await.unwrap_err();
    assert!(matches!(err, AdminShopifyError::Status { status: 503, .. }));
}
