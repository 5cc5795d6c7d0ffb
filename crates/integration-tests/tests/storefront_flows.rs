//! Shopper journeys through the storefront against a mocked store API.

use axum::http::StatusCode;
use coloring_bliss_integration_tests::{
    Browser, cart_json, checkout_fields, login_json, order_json, storefront,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn signed_in(server: &MockServer) -> (Browser, TempDir) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("user")))
        .expect(1)
        .mount(server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut browser = Browser::new(storefront(server, dir.path()));
    browser
        .post(
            "/login",
            &[
                ("email", "ana@example.com"),
                ("password", "secret123"),
                ("redirect", "/cart"),
            ],
        )
        .await
        .assert_redirect("/cart");
    (browser, dir)
}

#[tokio::test]
async fn test_login_then_coupon_shows_server_total() {
    let server = MockServer::start().await;
    // Loaded once after sign in and once by the cart page
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 0, None)))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    let (mut browser, _dir) = signed_in(&server).await;

    let page = browser.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome back!"));
    assert!(page.body.contains("Kraft Notebook"));
    assert!(page.body.contains("₱200.00"));

    Mock::given(method("POST"))
        .and(path("/api/cart/coupon"))
        .and(body_partial_json(json!({ "couponCode": "SAVE10" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 20, Some("SAVE10"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 20, Some("SAVE10"))))
        .mount(&server)
        .await;

    browser
        .post("/cart/coupon", &[("code", "SAVE10")])
        .await
        .assert_redirect("/cart");

    let page = browser.get("/cart").await;
    assert!(page.body.contains("Coupon applied successfully!"));
    assert!(page.body.contains("SAVE10"));
    assert!(page.body.contains("-₱20.00"));
    assert!(page.body.contains("₱180.00"));
}

#[tokio::test]
async fn test_rejected_coupon_keeps_cart_and_shows_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/coupon"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Coupon has expired"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (mut browser, _dir) = signed_in(&server).await;

    browser
        .post("/cart/coupon", &[("code", "OLD5")])
        .await
        .assert_redirect("/cart");

    let page = browser.get("/cart").await;
    assert!(page.body.contains("Coupon has expired"));
    assert!(page.body.contains("₱100.00"));
}

#[tokio::test]
async fn test_unreadable_quantity_is_flashed_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 0, None)))
        .expect(0)
        .mount(&server)
        .await;
    let (mut browser, _dir) = signed_in(&server).await;

    browser
        .post(
            "/cart/add",
            &[("product_id", "prod-1"), ("quantity", "abc"), ("back", "/cart")],
        )
        .await
        .assert_redirect("/cart");

    let page = browser.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Quantity must be at least 1"));
    assert!(page.body.contains("₱100.00"));
}

#[tokio::test]
async fn test_cash_on_delivery_places_order_without_hosted_checkout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/cod"))
        .and(body_partial_json(json!({
            "shippingAddress": { "city": "Quezon City", "zipCode": "1100" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": { "order": order_json("order-1", "pending") }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/create-checkout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (mut browser, _dir) = signed_in(&server).await;

    let fields = checkout_fields("cod");
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    browser
        .post("/checkout", &fields)
        .await
        .assert_redirect("/account/orders/order-1");
}

#[tokio::test]
async fn test_gcash_goes_to_hosted_checkout_without_creating_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/cod"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/create-checkout"))
        .and(body_partial_json(json!({ "paymentMethod": "gcash" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "checkoutUrl": "https://checkout.paymongo.com/cs_123", "orderId": "order-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (mut browser, _dir) = signed_in(&server).await;

    let fields = checkout_fields("gcash");
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    browser
        .post("/checkout", &fields)
        .await
        .assert_redirect("https://checkout.paymongo.com/cs_123");
}

#[tokio::test]
async fn test_incomplete_address_never_reaches_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1, 0, None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/cod"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let (mut browser, _dir) = signed_in(&server).await;

    let page = browser
        .post(
            "/checkout",
            &[("first_name", "Ana"), ("payment_method", "cod")],
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("value=\"Ana\""));
}

#[tokio::test]
async fn test_expired_token_signs_out_and_returns_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1, 0, None)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Token expired"
        })))
        .mount(&server)
        .await;
    let (mut browser, _dir) = signed_in(&server).await;

    browser
        .get("/cart")
        .await
        .assert_redirect("/login?redirect=%2Fcart");

    // The session no longer carries an identity
    browser
        .get("/account")
        .await
        .assert_redirect("/login?redirect=%2Faccount");
}
