//! Cart container behavior against a mocked store API.

use std::time::Duration;

use coloring_bliss_api::store::{CartStore, Outcome};
use coloring_bliss_api::types::{Cart, SelectedColor};
use coloring_bliss_api::{ApiClient, ApiConfig, ApiError};
use coloring_bliss_core::{CartItemId, ProductId};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    let config = ApiConfig::parse(&format!("{}/api", server.uri()), 5).expect("valid config");
    ApiClient::new(&config)
        .expect("client builds")
        .with_token(SecretString::from("test-token"))
}

fn cart_json(quantity: u32, discount: u32, coupon: Option<&str>) -> Value {
    let subtotal = 100 * quantity;
    json!({
        "success": true,
        "data": {
            "cart": {
                "items": [{
                    "_id": "item-1",
                    "product": { "_id": "prod-1", "name": "Kraft Notebook", "slug": "kraft-notebook", "stock": 10 },
                    "quantity": quantity,
                    "price": 100.0
                }],
                "subtotal": subtotal,
                "discount": discount,
                "total": subtotal - discount,
                "couponCode": coupon
            }
        }
    })
}

fn expected_cart(body: &Value) -> Cart {
    serde_json::from_value(body["data"]["cart"].clone()).expect("fixture decodes")
}

// ============================================================================
// Successful transitions
// ============================================================================

#[tokio::test]
async fn test_add_item_replaces_state_with_server_cart() {
    let server = MockServer::start().await;
    let body = cart_json(2, 0, None);
    Mock::given(method("POST"))
        .and(path("/api/cart"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "productId": "prod-1",
            "quantity": 2,
            "selectedColor": { "name": "Sage", "hex": "#9caf88" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let store = CartStore::new();
    let color = SelectedColor::Option(coloring_bliss_api::types::ColorOption {
        name: "Sage".to_string(),
        hex: "#9caf88".to_string(),
    });
    let outcome = store
        .add_item(&client(&server), &ProductId::new("prod-1"), 2, Some(&color))
        .await
        .expect("add succeeds");

    assert_eq!(outcome, Outcome::Applied);
    let state = store.snapshot();
    assert_eq!(state.cart(), expected_cart(&body));
    assert_eq!(state.item_count, 2);
    assert_eq!(state.subtotal, Decimal::from(200));
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_apply_coupon_uses_server_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/coupon"))
        .and(body_json(json!({ "couponCode": "SAVE10" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 20, Some("SAVE10"))))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CartStore::new();
    store.load(&api).await.expect("load succeeds");
    store.apply_coupon(&api, "  SAVE10 ").await.expect("coupon applies");

    let state = store.snapshot();
    assert_eq!(state.discount, Decimal::from(20));
    assert_eq!(state.total, Decimal::from(180));
    assert_eq!(state.coupon_code.as_deref(), Some("SAVE10"));
}

#[tokio::test]
async fn test_clear_resets_to_initial_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(3, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Cart cleared"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CartStore::new();
    store.load(&api).await.expect("load succeeds");
    assert_eq!(store.item_count(), 3);

    store.clear(&api).await.expect("clear succeeds");
    assert_eq!(store.snapshot(), coloring_bliss_api::store::CartState::default());
}

// ============================================================================
// Failures keep prior state
// ============================================================================

#[tokio::test]
async fn test_failed_update_keeps_state_and_records_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/cart/item-1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Only 2 items left in stock"
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CartStore::new();
    store.load(&api).await.expect("load succeeds");
    let before = store.snapshot();

    let err = store
        .update_item(&api, &CartItemId::new("item-1"), 5)
        .await
        .expect_err("update rejected");
    assert!(matches!(err, ApiError::Validation(_)));

    let after = store.snapshot();
    assert_eq!(after.cart(), before.cart());
    assert_eq!(after.error.as_deref(), Some("Only 2 items left in stock"));
}

#[tokio::test]
async fn test_network_failure_keeps_state_with_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1, 0, None)))
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CartStore::new();
    store.load(&api).await.expect("load succeeds");
    let before = store.snapshot();

    // Point a client at a port nothing listens on.
    let dead = ApiClient::new(&ApiConfig::parse("http://127.0.0.1:9/api", 1).expect("valid"))
        .expect("client builds");
    let err = store
        .remove_item(&dead, &CartItemId::new("item-1"))
        .await
        .expect_err("network failure");
    assert!(matches!(err, ApiError::Network(_)));

    let after = store.snapshot();
    assert_eq!(after.cart(), before.cart());
    assert_eq!(after.error.as_deref(), Some("Failed to remove item"));
}

#[tokio::test]
async fn test_server_error_hides_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "MongoNetworkError: connection reset"
        })))
        .mount(&server)
        .await;

    let store = CartStore::new();
    let err = store.load(&client(&server)).await.expect_err("server error");
    assert!(matches!(err, ApiError::Server { status: 500, .. }));
    assert_eq!(store.take_error().as_deref(), Some("Failed to get cart"));
    assert!(store.take_error().is_none());
}

#[tokio::test]
async fn test_malformed_cart_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "cart": { "items": [{ "_id": "item-1" }] } }
        })))
        .mount(&server)
        .await;

    let store = CartStore::new();
    let err = store.load(&client(&server)).await.expect_err("malformed");
    assert!(matches!(err, ApiError::Decode(_)));
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_local_validation_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1, 0, None)))
        .expect(0)
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CartStore::new();
    let err = store
        .add_item(&api, &ProductId::new("prod-1"), 0, None)
        .await
        .expect_err("zero quantity rejected");
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(store.snapshot().error.as_deref(), Some("Quantity must be at least 1"));

    store.apply_coupon(&api, "   ").await.expect_err("blank coupon rejected");
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let server = MockServer::start().await;
    // The first call is slow; the second returns immediately.
    Mock::given(method("PUT"))
        .and(path("/api/cart/item-1"))
        .and(body_json(json!({ "quantity": 5 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_json(5, 0, None))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/cart/item-1"))
        .and(body_json(json!({ "quantity": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(3, 0, None)))
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CartStore::new();
    let item = CartItemId::new("item-1");

    let slow = store.update_item(&api, &item, 5);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.update_item(&api, &item, 3).await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow.expect("superseded, not failed"), Outcome::Superseded);
    assert_eq!(fast.expect("applied"), Outcome::Applied);
    assert_eq!(store.item_count(), 3);
}

#[tokio::test]
async fn test_reset_is_local() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 0, None)))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let store = CartStore::new();
    store.load(&api).await.expect("load succeeds");
    store.reset();
    assert!(store.snapshot().is_empty());
    assert_eq!(store.item_count(), 0);
}
