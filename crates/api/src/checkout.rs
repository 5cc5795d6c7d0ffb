//! Checkout: shipping validation and the payment branch.
//!
//! Cash on delivery creates the order directly with one
//! `POST /payments/cod`. Every other method opens a hosted checkout session
//! with one `POST /payments/create-checkout` and the browser is sent to the
//! returned URL; the order is confirmed later by [`confirm_payment`].

use tracing::{info, instrument, warn};

use coloring_bliss_core::{OrderId, PaymentMethod};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::store::SessionStores;
use crate::types::{AddressInput, Order, ShippingAddress};

/// Generic failure message for the checkout page.
pub const PLACE_ORDER_FAILED: &str = "Failed to place order";

/// Payment methods offered at checkout, in display order, with the hint
/// shown under each.
pub const PAYMENT_OPTIONS: &[(PaymentMethod, &str)] = &[
    (PaymentMethod::Card, "Visa, Mastercard, AMEX"),
    (PaymentMethod::Gcash, "Pay with your GCash wallet"),
    (PaymentMethod::Maya, "Pay with Maya"),
    (PaymentMethod::CashOnDelivery, "Pay when you receive (Metro Manila only)"),
];

/// A submitted checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Save the typed address to the account.
    pub save_address: bool,
    /// The address came from the account's saved addresses.
    pub used_saved_address: bool,
}

/// Where the browser goes after a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Cash on delivery: the order exists now.
    OrderPlaced(Order),
    /// Online payment: continue on the hosted checkout page.
    Redirect(String),
}

/// Required shipping fields with the name used in the error message.
fn required_fields(address: &ShippingAddress) -> [(&str, &'static str); 7] {
    [
        (address.first_name.as_str(), "first name"),
        (address.last_name.as_str(), "last name"),
        (address.street.as_str(), "street"),
        (address.city.as_str(), "city"),
        (address.state.as_str(), "state"),
        (address.zip_code.as_str(), "zip code"),
        (address.phone.as_str(), "phone"),
    ]
}

/// Check that every required shipping field is filled in.
///
/// # Errors
///
/// Returns `ApiError::Validation` naming the first missing field.
pub fn validate_shipping(address: &ShippingAddress) -> Result<(), ApiError> {
    match required_fields(address)
        .into_iter()
        .find(|(value, _)| value.trim().is_empty())
    {
        Some((_, name)) => Err(ApiError::invalid(format!("Please enter your {name}"))),
        None => Ok(()),
    }
}

/// Submit the checkout form.
///
/// # Errors
///
/// Returns a validation error for a missing shipping field, or the API
/// error of the order or checkout-session call.
#[instrument(skip(client, stores, form), fields(payment_method = %form.payment_method.as_str()))]
pub async fn place_order(
    client: &ApiClient,
    stores: &SessionStores,
    form: &CheckoutForm,
) -> Result<CheckoutOutcome, ApiError> {
    validate_shipping(&form.shipping_address)?;

    if form.save_address && !form.used_saved_address {
        save_address(client, stores, &form.shipping_address).await;
    }

    if form.payment_method.is_cash_on_delivery() {
        let order = client.place_cod_order(&form.shipping_address).await?;
        stores.cart.reset();
        info!(order_number = %order.order_number, "Cash on delivery order placed");
        return Ok(CheckoutOutcome::OrderPlaced(order));
    }

    let session = client
        .create_checkout(&form.shipping_address, &form.payment_method)
        .await?;
    match session.checkout_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => Ok(CheckoutOutcome::Redirect(url)),
        None => Err(ApiError::Decode(
            "Failed to create checkout session".to_string(),
        )),
    }
}

/// Best-effort copy of the shipping address into the account.
async fn save_address(client: &ApiClient, stores: &SessionStores, address: &ShippingAddress) {
    let first = stores
        .auth
        .user()
        .is_none_or(|user| user.addresses.is_empty());
    match client
        .add_address(&AddressInput::from_shipping(address, first))
        .await
    {
        Ok(user) => stores.auth.set_user(user),
        Err(e) => warn!(error = %e, "Address save failed, continuing with order"),
    }
}

/// Confirm a hosted-checkout payment after the browser returns.
///
/// # Errors
///
/// Returns the API error of `POST /payments/verify`.
#[instrument(skip(client, stores), fields(order_id = %order_id))]
pub async fn confirm_payment(
    client: &ApiClient,
    stores: &SessionStores,
    order_id: &OrderId,
) -> Result<Order, ApiError> {
    let order = client.verify_payment(order_id).await?;
    stores.cart.reset();
    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> ShippingAddress {
        ShippingAddress {
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            email: None,
            street: "12 Mabini St".to_string(),
            city: "Quezon City".to_string(),
            state: "Metro Manila".to_string(),
            zip_code: "1100".to_string(),
            country: "Philippines".to_string(),
            phone: "09171234567".to_string(),
        }
    }

    #[test]
    fn test_complete_address_passes() {
        assert!(validate_shipping(&complete()).is_ok());
    }

    #[test]
    fn test_names_first_missing_field() {
        let mut address = complete();
        address.zip_code = "  ".to_string();
        address.phone = String::new();
        let err = validate_shipping(&address).unwrap_err();
        assert_eq!(err.user_message(PLACE_ORDER_FAILED), "Please enter your zip code");
    }
}
