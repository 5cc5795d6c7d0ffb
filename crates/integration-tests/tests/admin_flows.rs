//! Admin journeys through the console against a mocked store API.

use axum::http::StatusCode;
use coloring_bliss_integration_tests::{Browser, admin, login_json, order_json};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn signed_in(server: &MockServer, redirect: &str) -> Browser {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("admin")))
        .expect(1)
        .mount(server)
        .await;

    let mut browser = Browser::new(admin(server));
    browser
        .post(
            "/login",
            &[
                ("email", "ana@example.com"),
                ("password", "secret123"),
                ("redirect", redirect),
            ],
        )
        .await
        .assert_redirect(redirect);
    browser
}

fn categories_json() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "categories": [
                { "_id": "cat-1", "name": "Notebooks", "slug": "notebooks" },
                { "_id": "cat-2", "name": "Planners", "slug": "planners" }
            ]
        }
    })
}

#[tokio::test]
async fn test_admin_lands_on_dashboard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/admin/stats"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "totalOrders": 42,
                "todayOrders": 3,
                "thisMonthRevenue": 12500,
                "lastMonthRevenue": 9800,
                "statusCounts": { "pending": 5, "shipped": 2 },
                "recentOrders": [order_json("order-1", "pending")]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut browser = signed_in(&server, "/").await;

    let page = browser.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome back, Ana!"));
    assert!(page.body.contains("CB-2001"));
    assert!(page.body.contains("42"));
}

#[tokio::test]
async fn test_shopper_is_turned_away_and_stays_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("user")))
        .expect(1)
        .mount(&server)
        .await;

    let mut browser = Browser::new(admin(&server));
    let page = browser
        .post(
            "/login",
            &[("email", "ana@example.com"), ("password", "secret123")],
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Access denied. Admin privileges required."));

    browser
        .get("/products")
        .await
        .assert_redirect("/login?redirect=%2Fproducts");
}

#[tokio::test]
async fn test_create_product_posts_catalog_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(header("authorization", "Bearer jwt-token"))
        .and(body_partial_json(json!({
            "name": "Kraft Notebook",
            "sku": "KN-A5-01",
            "price": 250.0,
            "category": "cat-1",
            "stock": 12,
            "isActive": true,
            "images": []
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": { "product": { "_id": "prod-9" } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut browser = signed_in(&server, "/products/new").await;

    browser
        .post(
            "/products/new",
            &[
                ("name", "Kraft Notebook"),
                ("sku", "KN-A5-01"),
                ("price", "250"),
                ("category", "cat-1"),
                ("stock", "12"),
                ("product_type", "notebook"),
                ("width", "5.5"),
                ("height", "8.5"),
                ("paper_type", "lined"),
                ("paper_weight", "80"),
                ("page_count", "100"),
                ("cover_type", "hardcover"),
                ("binding", "perfect"),
                ("is_active", "on"),
            ],
        )
        .await
        .assert_redirect("/products");
}

#[tokio::test]
async fn test_invalid_product_form_is_shown_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let mut browser = signed_in(&server, "/products/new").await;

    let page = browser
        .post(
            "/products/new",
            &[("name", "Kraft Notebook"), ("price", "250"), ("category", "cat-2")],
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("SKU is required"));
    assert!(page.body.contains("value=\"Kraft Notebook\""));
    assert!(page.body.contains("Planners"));
}

#[tokio::test]
async fn test_order_status_update_reaches_api() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/order-1/status"))
        .and(header("authorization", "Bearer jwt-token"))
        .and(body_partial_json(json!({
            "status": "shipped",
            "trackingNumber": "LBC-778812",
            "shippingCarrier": "LBC"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders/order-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "order": order_json("order-1", "shipped") }
        })))
        .mount(&server)
        .await;
    let mut browser = signed_in(&server, "/orders/order-1").await;

    browser
        .post(
            "/orders/order-1/status",
            &[
                ("status", "shipped"),
                ("tracking_number", "LBC-778812"),
                ("shipping_carrier", "LBC"),
                ("note", ""),
            ],
        )
        .await
        .assert_redirect("/orders/order-1");

    let page = browser.get("/orders/order-1").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Order updated successfully"));
    assert!(page.body.contains("CB-2001"));
}

#[tokio::test]
async fn test_expired_token_sends_admin_back_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Token expired"
        })))
        .mount(&server)
        .await;
    let mut browser = signed_in(&server, "/categories").await;

    browser
        .get("/categories")
        .await
        .assert_redirect("/login?redirect=%2Fcategories");
}
