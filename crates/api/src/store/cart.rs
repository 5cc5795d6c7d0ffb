//! Cart container.

use parking_lot::RwLock;
use rust_decimal::Decimal;

use coloring_bliss_core::{CartItemId, ProductId};

use super::{Outcome, RequestSequence, Tracked, reject, transition};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Cart, CartItem, SelectedColor};

/// Cached cart for one session.
///
/// `item_count` is the only derived field; every total comes from the
/// server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub item_count: u32,
    pub loading: bool,
    pub error: Option<String>,
}

impl CartState {
    fn replace(&mut self, cart: Cart) {
        self.item_count = cart.items.iter().map(|item| item.quantity).sum();
        self.items = cart.items;
        self.subtotal = cart.subtotal;
        self.discount = cart.discount;
        self.total = cart.total;
        self.coupon_code = cart.coupon_code;
    }

    fn clear_contents(&mut self) {
        self.replace(Cart::default());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The cached cart in wire shape.
    #[must_use]
    pub fn cart(&self) -> Cart {
        Cart {
            items: self.items.clone(),
            subtotal: self.subtotal,
            discount: self.discount,
            total: self.total,
            coupon_code: self.coupon_code.clone(),
        }
    }
}

impl Tracked for CartState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Cart container: the session's read-through copy of `/cart`.
#[derive(Debug, Default)]
pub struct CartStore {
    state: RwLock<CartState>,
    sequence: RequestSequence,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.read().item_count
    }

    /// Take the pending error message, clearing it.
    pub fn take_error(&self) -> Option<String> {
        self.state.write().error.take()
    }

    /// `GET /cart`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn load(&self, client: &ApiClient) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.sequence,
            "cart",
            "Failed to get cart",
            client.get_cart(),
            CartState::replace,
        )
        .await
    }

    /// `POST /cart`
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity without a request; otherwise returns the API
    /// error after recording its message.
    pub async fn add_item(
        &self,
        client: &ApiClient,
        product_id: &ProductId,
        quantity: u32,
        color: Option<&SelectedColor>,
    ) -> Result<Outcome, ApiError> {
        if quantity == 0 {
            return Err(reject(&self.state, "Quantity must be at least 1"));
        }
        transition(
            &self.state,
            &self.sequence,
            "cart",
            "Failed to add to cart",
            client.add_to_cart(product_id, quantity, color),
            CartState::replace,
        )
        .await
    }

    /// `PUT /cart/{itemId}`
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity without a request; otherwise returns the API
    /// error after recording its message.
    pub async fn update_item(
        &self,
        client: &ApiClient,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<Outcome, ApiError> {
        if quantity == 0 {
            return Err(reject(&self.state, "Quantity must be at least 1"));
        }
        transition(
            &self.state,
            &self.sequence,
            "cart",
            "Failed to update cart",
            client.update_cart_item(item_id, quantity),
            CartState::replace,
        )
        .await
    }

    /// `DELETE /cart/{itemId}`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn remove_item(
        &self,
        client: &ApiClient,
        item_id: &CartItemId,
    ) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.sequence,
            "cart",
            "Failed to remove item",
            client.remove_cart_item(item_id),
            CartState::replace,
        )
        .await
    }

    /// `DELETE /cart`; on success the state returns to its initial shape.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn clear(&self, client: &ApiClient) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.sequence,
            "cart",
            "Failed to clear cart",
            client.clear_cart(),
            |state, ()| state.clear_contents(),
        )
        .await
    }

    /// `POST /cart/coupon`
    ///
    /// # Errors
    ///
    /// Rejects a blank code without a request; otherwise returns the API
    /// error after recording its message.
    pub async fn apply_coupon(&self, client: &ApiClient, code: &str) -> Result<Outcome, ApiError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(reject(&self.state, "Please enter a coupon code"));
        }
        transition(
            &self.state,
            &self.sequence,
            "cart",
            "Invalid coupon code",
            client.apply_coupon(code),
            CartState::replace,
        )
        .await
    }

    /// Drop the cached cart without a request (logout, order placed).
    pub fn reset(&self) {
        self.sequence.cancel_pending();
        *self.state.write() = CartState::default();
    }

    /// Drop interest in the in-flight transition.
    pub fn cancel_pending(&self) {
        self.sequence.cancel_pending();
        self.state.write().loading = false;
    }
}
