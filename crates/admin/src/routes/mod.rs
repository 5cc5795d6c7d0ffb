//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Dashboard (order stats)
//! GET  /health                     - Health check
//!
//! # Auth
//! GET  /login, POST /login         - Login (admin role required)
//! POST /logout                     - Logout
//!
//! # Products
//! GET  /products                   - Product list (search, pages)
//! GET  /products/new, POST         - Create product
//! GET  /products/{id}/edit, POST   - Edit product
//! POST /products/{id}/delete       - Delete product
//! POST /products/images            - Upload images to the open form
//! POST /products/images/delete     - Remove an image from the open form
//! POST /products/images/primary    - Make an image primary
//!
//! # Categories
//! GET  /categories                 - Category list
//! GET  /categories/new, POST       - Create category
//! GET  /categories/{id}/edit, POST - Edit category
//! POST /categories/{id}/delete     - Delete category
//!
//! # Orders
//! GET  /orders                     - Order list (status, search, pages)
//! GET  /orders/{id}                - Order detail
//! POST /orders/{id}/status         - Update status and tracking
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Largest image upload request: five files of up to 5 MB plus form overhead.
const UPLOAD_BODY_LIMIT: usize = 26 * 1024 * 1024;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/new", get(products::new_page).post(products::create))
        .route("/{id}/edit", get(products::edit_page).post(products::update))
        .route("/{id}/delete", post(products::delete))
        .route(
            "/images",
            post(products::upload_images).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/images/delete", post(products::remove_image))
        .route("/images/primary", post(products::make_primary))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/new", get(categories::new_page).post(categories::create))
        .route("/{id}/edit", get(categories::edit_page).post(categories::update))
        .route("/{id}/delete", post(categories::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        // Catalog
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        // Orders
        .nest("/orders", order_routes())
}
