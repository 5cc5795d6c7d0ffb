//! Cart route handlers.
//!
//! Every cart operation needs a signed-in shopper. Mutations are form posts
//! that run one cart container transition and redirect back; the cart page
//! renders whatever the server last returned.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use coloring_bliss_api::gate;
use coloring_bliss_api::types::SelectedColor;
use coloring_bliss_core::{CartItemId, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::Shopper;
use crate::state::AppState;
use crate::views::{CartView, Layout};

const LOGIN_TO_ADD: &str = "Please login to add items to cart";
const LOGIN_FOR_CART: &str = "Please login to view your cart";

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Raw quantity field; absent means one.
    pub quantity: Option<String>,
    /// Selected color name.
    pub color: Option<String>,
    /// Product name for the confirmation notice.
    pub name: Option<String>,
    /// Page to return to.
    pub back: Option<String>,
}

/// Read a quantity field. Anything that is not a whole number becomes zero,
/// which the cart rejects with its own message.
fn parse_quantity(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub signed_in: bool,
    pub cart: CartView,
}

/// Display the cart page.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, shopper: Shopper) -> Response {
    let cart = &shopper.stores().cart;
    let mut error = None;

    if shopper.is_signed_in() {
        let result = cart.load(shopper.client()).await;
        cart.take_error();
        if let Err(e) = result {
            if e.is_auth() {
                return shopper.expire(&state, "/cart").await;
            }
            error = Some(e.user_message("Failed to get cart"));
        }
    }

    CartShowTemplate {
        layout: Layout::for_shopper(&shopper).await.or_error(error),
        signed_in: shopper.is_signed_in(),
        cart: CartView::new(&cart.snapshot(), state.api().base_url()),
    }
    .into_response()
}

/// The color to record on the new line.
///
/// Resolves the name against the product the shopper is viewing so the
/// swatch hex travels with it; otherwise only the name is sent.
fn selected_color(shopper: &Shopper, product_id: &ProductId, name: &str) -> SelectedColor {
    shopper
        .stores()
        .catalog
        .snapshot()
        .current_product
        .filter(|p| &p.id == product_id)
        .and_then(|p| p.colors.into_iter().find(|c| c.name == name))
        .map_or_else(
            || SelectedColor::Name(name.to_string()),
            SelectedColor::Option,
        )
}

/// Add a product to the cart.
#[instrument(skip(state, shopper), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let back = gate::safe_redirect(form.back.as_deref()).to_string();
    if !shopper.is_signed_in() {
        return shopper.login_first(LOGIN_TO_ADD, &back).await;
    }

    let quantity = form.quantity.as_deref().map_or(1, parse_quantity);
    let product_id = ProductId::new(form.product_id);
    let color = form
        .color
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|name| selected_color(&shopper, &product_id, name));

    let result = shopper
        .stores()
        .cart
        .add_item(shopper.client(), &product_id, quantity, color.as_ref())
        .await;
    shopper.stores().cart.take_error();

    let name = form.name.unwrap_or_else(|| "Item".to_string());
    shopper
        .settle(
            &state,
            result,
            "Failed to add to cart",
            Some(format!("{name} added to cart!")),
            &back,
        )
        .await
}

/// Change a line's quantity.
#[instrument(skip(state, shopper), fields(item_id = %form.item_id))]
pub async fn update(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper.login_first(LOGIN_FOR_CART, "/cart").await;
    }
    let result = shopper
        .stores()
        .cart
        .update_item(
            shopper.client(),
            &CartItemId::new(form.item_id),
            parse_quantity(&form.quantity),
        )
        .await;
    shopper.stores().cart.take_error();
    shopper
        .settle(&state, result, "Failed to update cart", None, "/cart")
        .await
}

/// Remove a line.
#[instrument(skip(state, shopper), fields(item_id = %form.item_id))]
pub async fn remove(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper.login_first(LOGIN_FOR_CART, "/cart").await;
    }
    let result = shopper
        .stores()
        .cart
        .remove_item(shopper.client(), &CartItemId::new(form.item_id))
        .await;
    shopper.stores().cart.take_error();
    shopper
        .settle(
            &state,
            result,
            "Failed to remove item",
            Some("Item removed from cart".to_string()),
            "/cart",
        )
        .await
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(State(state): State<AppState>, shopper: Shopper) -> Response {
    if !shopper.is_signed_in() {
        return shopper.login_first(LOGIN_FOR_CART, "/cart").await;
    }
    let result = shopper.stores().cart.clear(shopper.client()).await;
    shopper.stores().cart.take_error();
    shopper
        .settle(
            &state,
            result,
            "Failed to clear cart",
            Some("Cart cleared".to_string()),
            "/cart",
        )
        .await
}

/// Apply a coupon code.
#[instrument(skip(state, shopper, form))]
pub async fn coupon(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<CouponForm>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper.login_first(LOGIN_FOR_CART, "/cart").await;
    }
    let result = shopper
        .stores()
        .cart
        .apply_coupon(shopper.client(), &form.code)
        .await;
    shopper.stores().cart.take_error();
    shopper
        .settle(
            &state,
            result,
            "Invalid coupon code",
            Some("Coupon applied successfully!".to_string()),
            "/cart",
        )
        .await
}
