//! `/payments` endpoints.

use tracing::instrument;

use coloring_bliss_core::{OrderId, PaymentMethod};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::payment::{CheckoutRequest, VerifyRequest};
use crate::types::{
    CheckoutSession, Order, PaymentVerification, PlacedOrder, ShippingAddress, ShippingDetails,
};

impl ApiClient {
    /// `POST /payments/cod`: create a cash-on-delivery order from the cart.
    #[instrument(skip(self, shipping_address))]
    pub async fn place_cod_order(
        &self,
        shipping_address: &ShippingAddress,
    ) -> Result<Order, ApiError> {
        let placed: PlacedOrder = self
            .post(
                self.endpoint(&["payments", "cod"]),
                &ShippingDetails { shipping_address },
            )
            .await?;
        Ok(placed.order)
    }

    /// `POST /payments/create-checkout`: open a hosted checkout session.
    #[instrument(skip(self, shipping_address), fields(payment_method = %payment_method.as_str()))]
    pub async fn create_checkout(
        &self,
        shipping_address: &ShippingAddress,
        payment_method: &PaymentMethod,
    ) -> Result<CheckoutSession, ApiError> {
        self.post(
            self.endpoint(&["payments", "create-checkout"]),
            &CheckoutRequest {
                shipping_address,
                payment_method,
            },
        )
        .await
    }

    /// `POST /payments/verify`
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn verify_payment(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        let verification: PaymentVerification = self
            .post(
                self.endpoint(&["payments", "verify"]),
                &VerifyRequest { order_id },
            )
            .await?;
        Ok(verification.order)
    }
}
