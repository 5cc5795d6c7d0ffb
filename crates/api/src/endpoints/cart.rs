//! `/cart` endpoints. Each call returns the full recomputed cart.

use tracing::instrument;

use coloring_bliss_core::{CartItemId, ProductId};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::Cart;
use crate::types::cart::{AddToCart, ApplyCoupon, CartEnvelope, UpdateQuantity};
use crate::types::SelectedColor;

impl ApiClient {
    /// `GET /cart`
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart, ApiError> {
        let envelope: CartEnvelope = self.get(self.endpoint(&["cart"])).await?;
        Ok(envelope.cart)
    }

    /// `POST /cart`
    #[instrument(skip(self, color), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
        color: Option<&SelectedColor>,
    ) -> Result<Cart, ApiError> {
        let body = AddToCart {
            product_id,
            quantity,
            selected_color: color,
        };
        let envelope: CartEnvelope = self.post(self.endpoint(&["cart"]), &body).await?;
        Ok(envelope.cart)
    }

    /// `PUT /cart/{itemId}`
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let envelope: CartEnvelope = self
            .put(
                self.endpoint(&["cart", item_id.as_str()]),
                &UpdateQuantity { quantity },
            )
            .await?;
        Ok(envelope.cart)
    }

    /// `DELETE /cart/{itemId}`
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, item_id: &CartItemId) -> Result<Cart, ApiError> {
        let envelope: CartEnvelope = self
            .delete(self.endpoint(&["cart", item_id.as_str()]))
            .await?;
        Ok(envelope.cart)
    }

    /// `DELETE /cart`
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.send_unit(reqwest::Method::DELETE, self.endpoint(&["cart"]))
            .await
    }

    /// `POST /cart/coupon`
    #[instrument(skip(self))]
    pub async fn apply_coupon(&self, code: &str) -> Result<Cart, ApiError> {
        let envelope: CartEnvelope = self
            .post(
                self.endpoint(&["cart", "coupon"]),
                &ApplyCoupon { coupon_code: code },
            )
            .await?;
        Ok(envelope.cart)
    }
}
