//! GraphQL query definitions for the Shopify Admin API.
//!
//! Uses `graphql_client` to generate typed variables and responses from the
//! documents in `graphql/admin/recipes/`, checked against the schema subset
//! in `graphql/admin/schema.graphql`.

use graphql_client::GraphQLQuery;

// =============================================================================
// Custom scalar type aliases (used by graphql_client)
// =============================================================================

/// ISO 8601 date-time string.
type DateTime = String;

/// URL string.
#[allow(clippy::upper_case_acronyms)]
type URL = String;

// =============================================================================
// Product search
// =============================================================================

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/recipes/search_products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct SearchProducts;

// =============================================================================
// Recipe metafield
// =============================================================================

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/recipes/get_product_metafield.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProductMetafield;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/recipes/set_product_metafield.graphql",
    response_derives = "Debug, Clone"
)]
pub struct SetProductMetafield;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/recipes/delete_product_metafield.graphql",
    response_derives = "Debug, Clone"
)]
pub struct DeleteProductMetafield;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_names_operation() {
        let body = GetProductMetafield::build_query(get_product_metafield::Variables {
            id: "gid://shopify/Product/1".to_string(),
            namespace: "custom".to_string(),
            key: "recipe_data".to_string(),
        });
        assert_eq!(body.operation_name, "GetProductMetafield");
        assert!(body.query.contains("query GetProductMetafield"));

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "GetProductMetafield");
        assert_eq!(json["variables"]["id"], "gid://shopify/Product/1");
    }

    #[test]
    fn test_set_input_serializes_graphql_names() {
        let input = set_product_metafield::MetafieldsSetInput {
            owner_id: "gid://shopify/Product/1".to_string(),
            namespace: Some("custom".to_string()),
            key: "recipe_data".to_string(),
            type_: Some("json".to_string()),
            value: "{}".to_string(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["ownerId"], "gid://shopify/Product/1");
        assert_eq!(json["type"], "json");
    }

    #[test]
    fn test_search_response_decodes_missing_image() {
        let data: search_products::ResponseData = serde_json::from_value(serde_json::json!({
            "products": { "edges": [
                { "node": { "id": "gid://shopify/Product/7", "title": "Rub", "featuredImage": null } }
            ] }
        }))
        .unwrap();
        let node = &data.products.edges[0].node;
        assert_eq!(node.title, "Rub");
        assert!(node.featured_image.is_none());
    }
}
