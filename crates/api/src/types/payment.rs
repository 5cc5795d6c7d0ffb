//! Checkout and payment wire types.

use coloring_bliss_core::{OrderId, PaymentMethod};
use serde::{Deserialize, Serialize};

use super::order::{Order, ShippingAddress};

/// `POST /payments/cod` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails<'a> {
    pub shipping_address: &'a ShippingAddress,
}

/// `POST /payments/create-checkout` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest<'a> {
    pub shipping_address: &'a ShippingAddress,
    pub payment_method: &'a PaymentMethod,
}

/// `POST /payments/verify` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest<'a> {
    pub order_id: &'a OrderId,
}

/// `data` of a cash-on-delivery order creation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacedOrder {
    pub order: Order,
}

/// `data` of a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// `data` of a payment verification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentVerification {
    pub order: Order,
}
