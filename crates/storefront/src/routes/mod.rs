//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Health check
//!
//! # Catalog
//! GET  /shop                      - Product listing (facets, sort, search, pages)
//! GET  /product/{slug}            - Product detail
//!
//! # Cart (signed in)
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add to cart
//! POST /cart/update               - Change quantity
//! POST /cart/remove               - Remove line
//! POST /cart/clear                - Empty cart
//! POST /cart/coupon               - Apply coupon
//!
//! # Checkout (signed in)
//! GET  /checkout                  - Address and payment form
//! POST /checkout                  - Place order (COD) or start hosted checkout
//! GET  /checkout/success          - Verify payment
//!
//! # Auth
//! GET  /login, POST /login        - Login
//! GET  /register, POST /register  - Registration
//! POST /logout                    - Logout
//!
//! # Account (signed in)
//! GET  /account                   - Profile
//! POST /account/profile           - Update profile
//! POST /account/password          - Change password
//! GET  /account/orders            - Order history
//! GET  /account/orders/{id}       - Order detail
//! GET  /account/addresses         - Address book
//! POST /account/addresses         - Add address
//! POST /account/addresses/{id}    - Update address
//! POST /account/addresses/{id}/delete
//! POST /account/addresses/{id}/default
//! GET  /account/wishlist          - Wishlist
//! POST /account/wishlist/add-all  - Move wishlist to cart
//! POST /wishlist/add, /wishlist/remove
//!
//! # Content
//! GET  /about, /faq, /shipping, /returns, /contact
//! ```

pub mod account;
pub mod addresses;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod pages;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/coupon", post(cart::coupon))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile))
        .route("/profile", post(account::update_profile))
        .route("/password", post(account::change_password))
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
        .route(
            "/addresses",
            get(addresses::index).post(addresses::create),
        )
        .route("/addresses/{id}", post(addresses::update))
        .route("/addresses/{id}/delete", post(addresses::delete))
        .route("/addresses/{id}/default", post(addresses::make_default))
        .route("/wishlist", get(wishlist::show))
        .route("/wishlist/add-all", post(wishlist::add_all_to_cart))
}

/// Create the content page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/about", get(pages::about))
        .route("/faq", get(pages::faq))
        .route("/shipping", get(pages::shipping))
        .route("/returns", get(pages::returns))
        .route("/contact", get(pages::contact))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/shop", get(products::index))
        .route("/product/{slug}", get(products::show))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::place))
        .route("/checkout/success", get(checkout::success))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        // Account
        .nest("/account", account_routes())
        .route("/wishlist/add", post(wishlist::add))
        .route("/wishlist/remove", post(wishlist::remove))
        // Content pages
        .merge(page_routes())
}
