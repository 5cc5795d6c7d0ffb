//! End-to-end tests for TheColoringBliss.
//!
//! Each test starts a [`wiremock::MockServer`] standing in for the store
//! REST API, builds the real storefront or admin router against it, and
//! drives it with a [`Browser`] that keeps the session cookie between
//! requests the way a real browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coloring-bliss-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flows` - sign in, cart, coupon, and checkout
//! - `admin_flows` - admin sign in, role check, and catalog management

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::path::Path;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use coloring_bliss_api::ApiConfig;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::MockServer;

/// Session signing secret shared by every test router.
pub const SESSION_SECRET: &str = "k7#Qp2!vX9@mL4$wR8^tB1&zN6*cF3%h";

/// API settings pointing at the mock server.
#[must_use]
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig::parse(&format!("{}/api", server.uri()), 5).expect("valid api config")
}

/// Storefront router backed by `server`, with markdown pages from
/// `content_dir`.
#[must_use]
pub fn storefront(server: &MockServer, content_dir: &Path) -> Router {
    use coloring_bliss_storefront::config::StorefrontConfig;
    use coloring_bliss_storefront::content::ContentStore;
    use coloring_bliss_storefront::state::AppState;

    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from(SESSION_SECRET),
        api: api_config(server),
        content_dir: content_dir.to_path_buf(),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let content = ContentStore::load(content_dir).expect("content loads");
    let state = AppState::new(config, content).expect("state builds");
    coloring_bliss_storefront::app(state, Path::new("static"))
}

/// Admin console router backed by `server`.
#[must_use]
pub fn admin(server: &MockServer) -> Router {
    use coloring_bliss_admin::config::AdminConfig;
    use coloring_bliss_admin::state::AppState;

    let config = AdminConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        session_secret: SecretString::from(SESSION_SECRET),
        api: api_config(server),
        storefront_url: "http://localhost:3000".to_string(),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let state = AppState::new(config).expect("state builds");
    coloring_bliss_admin::app(state, Path::new("static"))
}

/// A response as a test sees it.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    /// Assert a 303 to `target` and return self.
    #[track_caller]
    pub fn assert_redirect(&self, target: &str) -> &Self {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(target));
        self
    }
}

/// Drives a router while carrying its session cookie.
pub struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// `GET uri`
    pub async fn get(&mut self, uri: &str) -> Page {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request.expect("request builds")).await
    }

    /// `POST uri` with a urlencoded form body.
    pub async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> Page {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request.expect("request builds")).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Page {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router responds");

        // The session id rotates on sign in, so always keep the newest one
        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        Page {
            status,
            location,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// An account as `/auth/*` returns it.
#[must_use]
pub fn user_json(role: &str) -> Value {
    json!({
        "_id": "user-1",
        "firstName": "Ana",
        "lastName": "Reyes",
        "email": "ana@example.com",
        "phone": "09171234567",
        "role": role,
        "addresses": [],
        "wishlist": []
    })
}

/// `POST /auth/login` success body.
#[must_use]
pub fn login_json(role: &str) -> Value {
    json!({
        "success": true,
        "data": { "user": user_json(role), "token": "jwt-token" }
    })
}

/// A one-line cart of the 100-peso notebook.
#[must_use]
pub fn cart_json(quantity: u32, discount: u32, coupon: Option<&str>) -> Value {
    let subtotal = 100 * quantity;
    json!({
        "success": true,
        "data": {
            "cart": {
                "items": [{
                    "_id": "item-1",
                    "product": {
                        "_id": "prod-1",
                        "name": "Kraft Notebook",
                        "slug": "kraft-notebook",
                        "stock": 10
                    },
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

/// An order as `/orders/*` and `/payments/cod` return it.
#[must_use]
pub fn order_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "orderNumber": "CB-2001",
        "user": { "_id": "user-1", "firstName": "Ana", "lastName": "Reyes", "email": "ana@example.com" },
        "items": [{ "name": "Kraft Notebook", "price": 100, "quantity": 2 }],
        "shippingAddress": {
            "firstName": "Ana", "lastName": "Reyes", "street": "12 Mabini St",
            "city": "Quezon City", "state": "Metro Manila", "zipCode": "1100",
            "phone": "09171234567"
        },
        "paymentMethod": "cod",
        "subtotal": 200,
        "shippingCost": 99,
        "total": 299,
        "status": status,
        "statusHistory": [{ "status": "pending", "timestamp": "2025-01-05T08:00:00Z" }],
        "createdAt": "2025-01-05T08:00:00Z"
    })
}

/// The checkout form fields for a typed-in address.
#[must_use]
pub fn checkout_fields(payment_method: &str) -> Vec<(&'static str, String)> {
    vec![
        ("first_name", "Ana".to_string()),
        ("last_name", "Reyes".to_string()),
        ("email", "ana@example.com".to_string()),
        ("street", "12 Mabini St".to_string()),
        ("city", "Quezon City".to_string()),
        ("state", "Metro Manila".to_string()),
        ("zip_code", "1100".to_string()),
        ("country", "Philippines".to_string()),
        ("phone", "09171234567".to_string()),
        ("payment_method", payment_method.to_string()),
    ]
}
