//! Checkout route handlers.
//!
//! Cash on delivery creates the order immediately. Card, GCash and Maya
//! payments continue on the hosted checkout page, which sends the browser
//! back to `/checkout/success?order_id=` once paid.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::checkout::{
    self, CheckoutForm, CheckoutOutcome, PAYMENT_OPTIONS, PLACE_ORDER_FAILED,
};
use coloring_bliss_api::types::{ShippingAddress, User};
use coloring_bliss_core::{OrderId, PaymentMethod};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::filters;
use crate::middleware::{RequireSession, Shopper};
use crate::models::Flash;
use crate::state::AppState;
use crate::views::{AddressView, CartView, Layout, SavedAddressView};

const COUNTRY: &str = "Philippines";

/// Payment method radio.
#[derive(Clone)]
pub struct PaymentChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub selected: bool,
}

fn payment_choices(selected: &PaymentMethod) -> Vec<PaymentChoice> {
    PAYMENT_OPTIONS
        .iter()
        .map(|(method, hint)| PaymentChoice {
            value: method.as_str(),
            label: method.label(),
            hint: *hint,
            selected: method == selected,
        })
        .collect()
}

/// Checkout form data.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutFormData {
    /// ID of a saved address to ship to; blank when typed in.
    #[serde(default)]
    pub saved_address: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub payment_method: String,
    /// Checkbox: present when ticked.
    pub save_address: Option<String>,
}

impl CheckoutFormData {
    /// Resolve the submission against the account's saved addresses.
    #[must_use]
    pub fn into_checkout(self, user: Option<&User>) -> CheckoutForm {
        let saved = user.and_then(|u| {
            u.addresses.iter().find(|a| {
                !self.saved_address.is_empty()
                    && a.id.as_ref().is_some_and(|id| id.as_str() == self.saved_address)
            })
        });

        let shipping_address = saved.map_or_else(
            || ShippingAddress {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                email: Some(self.email.trim().to_string()).filter(|e| !e.is_empty()),
                street: self.street.trim().to_string(),
                city: self.city.trim().to_string(),
                state: self.state.trim().to_string(),
                zip_code: self.zip_code.trim().to_string(),
                country: Some(self.country.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| COUNTRY.to_string()),
                phone: self.phone.trim().to_string(),
            },
            |address| {
                let mut shipping = ShippingAddress::from(address);
                if let Some(user) = user {
                    if shipping.first_name.is_empty() {
                        shipping.first_name.clone_from(&user.first_name);
                    }
                    if shipping.last_name.is_empty() {
                        shipping.last_name.clone_from(&user.last_name);
                    }
                    if shipping.phone.is_empty() {
                        shipping.phone = user.phone.clone().unwrap_or_default();
                    }
                }
                shipping
            },
        );

        CheckoutForm {
            shipping_address,
            payment_method: PaymentMethod::from(self.payment_method.trim()),
            save_address: self.save_address.is_some(),
            used_saved_address: saved.is_some(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub saved_addresses: Vec<SavedAddressView>,
    pub selected_address: String,
    pub address: ShippingAddress,
    pub payments: Vec<PaymentChoice>,
    pub save_address: bool,
}

/// Payment confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub layout: Layout,
    pub order_id: String,
    pub order_number: Option<String>,
    pub email: Option<String>,
    pub shipping: Option<AddressView>,
    pub error: Option<String>,
}

/// The account, fetched again if the session was rebuilt from its token.
async fn account(shopper: &Shopper) -> Result<Option<User>, coloring_bliss_api::ApiError> {
    let auth = &shopper.stores().auth;
    if auth.user().is_none() {
        let result = auth.refresh(shopper.client()).await;
        auth.take_error();
        result?;
    }
    Ok(auth.user())
}

fn render(
    state: &AppState,
    shopper: &Shopper,
    layout: Layout,
    user: Option<&User>,
    form: CheckoutForm,
    selected_address: String,
) -> CheckoutTemplate {
    CheckoutTemplate {
        layout,
        cart: CartView::new(&shopper.stores().cart.snapshot(), state.api().base_url()),
        saved_addresses: user
            .map(|u| u.addresses.iter().map(SavedAddressView::from).collect())
            .unwrap_or_default(),
        selected_address,
        address: form.shipping_address,
        payments: payment_choices(&form.payment_method),
        save_address: form.save_address,
    }
}

/// Display the checkout page.
///
/// The shipping form is prefilled from the default saved address, or the
/// account name and phone.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(shopper, _): RequireSession,
) -> Response {
    let cart = &shopper.stores().cart;
    let loaded = cart.load(shopper.client()).await;
    cart.take_error();
    if let Err(e) = loaded {
        return shopper.fail(&state, &e, "Failed to get cart", "/cart").await;
    }
    if cart.snapshot().is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let user = match account(&shopper).await {
        Ok(user) => user,
        Err(e) if e.is_auth() => return shopper.expire(&state, "/checkout").await,
        Err(_) => None,
    };

    let default = user.as_ref().and_then(User::default_address);
    let prefill = CheckoutFormData {
        saved_address: default
            .and_then(|a| a.id.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default(),
        first_name: user.as_ref().map(|u| u.first_name.clone()).unwrap_or_default(),
        last_name: user.as_ref().map(|u| u.last_name.clone()).unwrap_or_default(),
        email: user.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
        phone: user
            .as_ref()
            .and_then(|u| u.phone.clone())
            .unwrap_or_default(),
        payment_method: PaymentMethod::Card.as_str().to_string(),
        save_address: Some("on".to_string()),
        ..CheckoutFormData::default()
    };
    let selected = prefill.saved_address.clone();
    let form = prefill.into_checkout(user.as_ref());

    let layout = Layout::for_shopper(&shopper).await;
    render(&state, &shopper, layout, user.as_ref(), form, selected).into_response()
}

/// Place the order.
///
/// Validation and API failures re-render the form with what was entered.
#[instrument(skip_all, fields(payment_method = %data.payment_method))]
pub async fn place(
    State(state): State<AppState>,
    RequireSession(shopper, _): RequireSession,
    Form(data): Form<CheckoutFormData>,
) -> Response {
    let user = account(&shopper).await.ok().flatten();
    let selected = data.saved_address.clone();
    let form = data.into_checkout(user.as_ref());

    match checkout::place_order(shopper.client(), shopper.stores(), &form).await {
        Ok(CheckoutOutcome::OrderPlaced(order)) => {
            info!(order_id = %order.id, "Order placed");
            shopper
                .flash(Flash::success("Order placed successfully! 🎉"))
                .await;
            Redirect::to(&format!("/account/orders/{}", order.id)).into_response()
        }
        Ok(CheckoutOutcome::Redirect(url)) => Redirect::to(&url).into_response(),
        Err(e) if e.is_auth() => shopper.expire(&state, "/checkout").await,
        Err(e) => {
            let layout = Layout {
                flash: Some(Flash::error(e.user_message(PLACE_ORDER_FAILED))),
                ..Layout::for_shopper(&shopper).await
            };
            render(&state, &shopper, layout, user.as_ref(), form, selected).into_response()
        }
    }
}

/// Query of the hosted checkout return URL.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub order_id: Option<String>,
}

/// Confirm a hosted-checkout payment.
#[instrument(skip(state, shopper))]
pub async fn success(
    State(state): State<AppState>,
    RequireSession(shopper, _): RequireSession,
    Query(query): Query<SuccessQuery>,
) -> Response {
    let Some(order_id) = query.order_id.filter(|id| !id.trim().is_empty()) else {
        return Redirect::to("/").into_response();
    };

    let result =
        checkout::confirm_payment(shopper.client(), shopper.stores(), &OrderId::new(order_id.as_str()))
            .await;

    let page = match result {
        Ok(order) => CheckoutSuccessTemplate {
            layout: Layout::for_shopper(&shopper).await,
            order_id,
            order_number: Some(order.order_number.clone()),
            email: order.shipping_address.email.clone(),
            shipping: Some(AddressView::from(&order.shipping_address)),
            error: None,
        },
        Err(e) if e.is_auth() => {
            let back = format!("/checkout/success?order_id={}", urlencoding::encode(&order_id));
            return shopper.expire(&state, &back).await;
        }
        Err(_) => CheckoutSuccessTemplate {
            layout: Layout::for_shopper(&shopper).await,
            order_id,
            order_number: None,
            email: None,
            shipping: None,
            error: Some("Failed to verify payment. Please contact support.".to_string()),
        },
    };
    page.into_response()
}

#[cfg(test)]
mod tests {
    use coloring_bliss_api::types::Address;
    use coloring_bliss_core::AddressId;

    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            email: "ana@example.ph".to_string(),
            phone: Some("09171234567".to_string()),
            role: coloring_bliss_core::UserRole::User,
            addresses: vec![Address {
                id: Some(AddressId::new("a1")),
                label: Some("Home".to_string()),
                first_name: String::new(),
                last_name: String::new(),
                street: "12 Mabini St".to_string(),
                city: "Quezon City".to_string(),
                state: "Metro Manila".to_string(),
                zip_code: "1100".to_string(),
                country: "Philippines".to_string(),
                phone: String::new(),
                is_default: true,
            }],
            wishlist: Vec::new(),
        }
    }

    #[test]
    fn test_saved_address_fills_from_account() {
        let data = CheckoutFormData {
            saved_address: "a1".to_string(),
            payment_method: "cod".to_string(),
            ..CheckoutFormData::default()
        };
        let form = data.into_checkout(Some(&user()));

        assert!(form.used_saved_address);
        assert_eq!(form.shipping_address.first_name, "Ana");
        assert_eq!(form.shipping_address.phone, "09171234567");
        assert_eq!(form.shipping_address.street, "12 Mabini St");
        assert!(form.payment_method.is_cash_on_delivery());
    }

    #[test]
    fn test_typed_address_is_trimmed() {
        let data = CheckoutFormData {
            first_name: " Ben ".to_string(),
            street: "3 Rizal Ave ".to_string(),
            payment_method: "gcash".to_string(),
            save_address: Some("on".to_string()),
            ..CheckoutFormData::default()
        };
        let form = data.into_checkout(Some(&user()));

        assert!(!form.used_saved_address);
        assert!(form.save_address);
        assert_eq!(form.shipping_address.first_name, "Ben");
        assert_eq!(form.shipping_address.street, "3 Rizal Ave");
        assert_eq!(form.shipping_address.country, "Philippines");
        assert_eq!(form.payment_method, PaymentMethod::Gcash);
    }

    #[test]
    fn test_payment_choices_mark_selection() {
        let choices = payment_choices(&PaymentMethod::Maya);
        assert_eq!(choices.len(), 4);
        assert!(choices.iter().any(|c| c.value == "maya" && c.selected));
        assert_eq!(choices.iter().filter(|c| c.selected).count(), 1);
    }
}
