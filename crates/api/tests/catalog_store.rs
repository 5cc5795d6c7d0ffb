//! Catalog container behavior against a mocked store API.

use std::time::Duration;

use coloring_bliss_api::store::{CatalogStore, Outcome};
use coloring_bliss_api::{ApiClient, ApiConfig, ApiError, ProductQuery};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    let config = ApiConfig::parse(&format!("{}/api", server.uri()), 5).expect("valid config");
    ApiClient::new(&config).expect("client builds")
}

fn product(id: &str, slug: &str) -> Value {
    json!({ "_id": id, "name": slug.replace('-', " "), "slug": slug, "price": 250, "stock": 8 })
}

fn page_json(slugs: &[&str], page: u32) -> Value {
    let products: Vec<Value> = slugs
        .iter()
        .enumerate()
        .map(|(i, slug)| product(&format!("prod-{i}"), slug))
        .collect();
    json!({
        "success": true,
        "data": {
            "products": products,
            "pagination": { "page": page, "limit": 12, "total": 30, "pages": 3 }
        }
    })
}

fn categories_json() -> Value {
    json!({
        "success": true,
        "data": { "categories": [{ "_id": "cat-1", "name": "Notebooks", "slug": "notebooks" }] }
    })
}

fn detail_json(slug: &str) -> Value {
    json!({
        "success": true,
        "data": {
            "product": product("prod-9", slug),
            "relatedProducts": [product("prod-10", "grid-notepad")]
        }
    })
}

fn server_error() -> ResponseTemplate {
    ResponseTemplate::new(500).set_body_json(json!({ "success": false, "message": "boom" }))
}

fn page(n: u32) -> ProductQuery {
    ProductQuery {
        page: n,
        ..ProductQuery::default()
    }
}

// ============================================================================
// Failures keep prior state
// ============================================================================

#[tokio::test]
async fn test_failed_listing_keeps_previous_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["kraft-notebook", "linen-journal"], 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("page", "2"))
        .respond_with(server_error())
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CatalogStore::new();
    store.load_products(&api, &page(1)).await.expect("first page loads");
    let before = store.snapshot();

    let err = store
        .load_products(&api, &page(2))
        .await
        .expect_err("second page fails");
    assert!(matches!(err, ApiError::Server { status: 500, .. }));

    let after = store.snapshot();
    assert_eq!(after.products, before.products);
    assert_eq!(after.pagination, before.pagination);
    assert_eq!(after.pagination.page, 1);
    assert_eq!(after.error.as_deref(), Some("Failed to fetch products"));
    assert!(!after.loading);
}

#[tokio::test]
async fn test_sibling_success_keeps_failed_slice_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(server_error())
        .mount(&server)
        .await;
    // Finishes well after the listing has failed
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(categories_json())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CatalogStore::new();
    let query = ProductQuery::default();
    let (products, categories) =
        tokio::join!(store.load_products(&api, &query), store.load_categories(&api));

    assert!(products.is_err());
    assert_eq!(categories.expect("categories load"), Outcome::Applied);

    let state = store.snapshot();
    assert_eq!(state.categories.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch products"));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_failures_of_several_slices_are_all_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(server_error())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(server_error())
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CatalogStore::new();
    let query = ProductQuery::default();
    let _ = tokio::join!(store.load_products(&api, &query), store.load_categories(&api));

    let error = store.snapshot().error.expect("error recorded");
    assert!(error.contains("Failed to fetch products"));
    assert!(error.contains("Failed to fetch categories"));

    store.clear_error();
    assert!(store.snapshot().error.is_none());
}

#[tokio::test]
async fn test_slice_message_clears_when_that_slice_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(server_error())
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CatalogStore::new();
    store.load_categories(&api).await.expect_err("first call fails");
    assert_eq!(store.snapshot().error.as_deref(), Some("Failed to fetch categories"));

    store.load_categories(&api).await.expect("second call loads");
    let state = store.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.categories.len(), 1);
}

// ============================================================================
// Product detail
// ============================================================================

#[tokio::test]
async fn test_clear_current_product() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/linen-journal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("linen-journal")))
        .expect(1)
        .mount(&server)
        .await;

    let store = CatalogStore::new();
    store
        .load_product(&client(&server), "linen-journal")
        .await
        .expect("detail loads");
    let state = store.snapshot();
    assert_eq!(state.current_product.map(|p| p.slug).as_deref(), Some("linen-journal"));
    assert_eq!(state.related_products.len(), 1);

    store.clear_current_product();
    let state = store.snapshot();
    assert!(state.current_product.is_none());
    assert!(state.related_products.is_empty());
}

#[tokio::test]
async fn test_stale_product_response_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/kraft-notebook"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(detail_json("kraft-notebook"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/linen-journal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json("linen-journal")))
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CatalogStore::new();
    // The second read starts after the first, so the first is superseded
    let (older, newer) = tokio::join!(
        store.load_product(&api, "kraft-notebook"),
        store.load_product(&api, "linen-journal"),
    );

    assert_eq!(older.expect("no error"), Outcome::Superseded);
    assert_eq!(newer.expect("no error"), Outcome::Applied);
    let state = store.snapshot();
    assert_eq!(state.current_product.map(|p| p.slug).as_deref(), Some("linen-journal"));
    assert!(!state.loading);
}
