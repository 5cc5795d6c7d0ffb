//! Wishlist handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::gate;
use coloring_bliss_api::store::Outcome;
use coloring_bliss_core::ProductId;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::filters;
use crate::middleware::{RequireSession, Shopper};
use crate::models::Flash;
use crate::state::AppState;
use crate::views::{Layout, ProductCard};

const WISHLIST: &str = "/account/wishlist";

/// Wishlist toggle form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: String,
    pub back: Option<String>,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/wishlist.html")]
pub struct WishlistTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub any_in_stock: bool,
}

/// Display the wishlist.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(shopper, _user): RequireSession,
) -> Response {
    let (products, error) = match shopper.client().wishlist().await {
        Ok(products) => (products, None),
        Err(e) if e.is_auth() => return shopper.expire(&state, WISHLIST).await,
        Err(e) => {
            warn!(error = %e, "Failed to fetch wishlist");
            (Vec::new(), Some(e.user_message("Failed to load wishlist")))
        }
    };

    let products = ProductCard::list(&products, state.api().base_url());
    WishlistTemplate {
        layout: Layout::for_shopper(&shopper).await.or_error(error),
        any_in_stock: products.iter().any(|p| p.in_stock),
        products,
    }
    .into_response()
}

/// Re-read the account so `has_in_wishlist` reflects the change.
async fn refresh_account(shopper: &Shopper) {
    let auth = &shopper.stores().auth;
    if let Err(e) = auth.refresh(shopper.client()).await {
        warn!(error = %e, "Failed to refresh account after wishlist change");
    }
    auth.take_error();
}

/// Save a product to the wishlist.
#[instrument(skip(state, shopper), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<WishlistForm>,
) -> Response {
    let back = gate::safe_redirect(form.back.as_deref()).to_string();
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to save items to your wishlist", &back)
            .await;
    }

    let result = shopper
        .client()
        .add_to_wishlist(&ProductId::new(form.product_id))
        .await
        .map(|()| Outcome::Applied);
    if result.is_ok() {
        refresh_account(&shopper).await;
    }
    shopper
        .settle(
            &state,
            result,
            "Failed to add to wishlist",
            Some("Added to wishlist! 💜".to_string()),
            &back,
        )
        .await
}

/// Remove a product from the wishlist.
#[instrument(skip(state, shopper), fields(product_id = %form.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<WishlistForm>,
) -> Response {
    let back = gate::safe_redirect(form.back.as_deref().or(Some(WISHLIST))).to_string();
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to manage your wishlist", &back)
            .await;
    }

    let result = shopper
        .client()
        .remove_from_wishlist(&ProductId::new(form.product_id))
        .await
        .map(|()| Outcome::Applied);
    if result.is_ok() {
        refresh_account(&shopper).await;
    }
    shopper
        .settle(
            &state,
            result,
            "Failed to remove item",
            Some("Removed from wishlist".to_string()),
            &back,
        )
        .await
}

/// Add every in-stock wishlist product to the cart, one unit each.
///
/// Items that fail are logged and skipped.
#[instrument(skip_all)]
pub async fn add_all_to_cart(State(state): State<AppState>, shopper: Shopper) -> Response {
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to view your wishlist", WISHLIST)
            .await;
    }

    let products = match shopper.client().wishlist().await {
        Ok(products) => products,
        Err(e) => return shopper.fail(&state, &e, "Failed to load wishlist", WISHLIST).await,
    };

    let cart = &shopper.stores().cart;
    for product in products.iter().filter(|p| p.in_stock()) {
        if let Err(e) = cart.add_item(shopper.client(), &product.id, 1, None).await {
            if e.is_auth() {
                return shopper.expire(&state, WISHLIST).await;
            }
            warn!(error = %e, product = %product.name, "Failed to add wishlist item to cart");
        }
    }
    cart.take_error();

    shopper
        .flash(Flash::success("All items added to cart! 🎉"))
        .await;
    Redirect::to(WISHLIST).into_response()
}
