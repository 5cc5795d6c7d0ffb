//! Order wire types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use coloring_bliss_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Pagination, product::SelectedColor};

/// A placed order. Line items are snapshots taken at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub order_number: String,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default = "pending_payment")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipping_carrier: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// The customer, if the API populated the user reference.
    #[must_use]
    pub const fn customer(&self) -> Option<&OrderCustomer> {
        match &self.user {
            Some(UserRef::Populated(customer)) => Some(customer),
            _ => None,
        }
    }
}

/// An order's owner: populated customer or bare ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated(OrderCustomer),
    Id(UserId),
}

/// Customer fields populated on admin order views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl OrderCustomer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Snapshot of a purchased product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub selected_color: Option<SelectedColor>,
}

/// Shipping address captured on the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

const fn pending_payment() -> PaymentStatus {
    PaymentStatus::Pending
}

pub(crate) fn default_country() -> String {
    "Philippines".to_string()
}

impl ShippingAddress {
    /// Recipient name on one line.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// "City, State Zip" line.
    #[must_use]
    pub fn locality(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.zip_code)
    }
}

/// One entry in an order's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// `GET /orders/{id}` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderEnvelope {
    pub order: Order,
}

/// `GET /orders` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// `GET /orders/admin` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// `GET /orders/admin/stats` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub today_orders: u64,
    #[serde(default)]
    pub this_month_revenue: Decimal,
    #[serde(default)]
    pub last_month_revenue: Decimal,
    #[serde(default)]
    pub status_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub recent_orders: Vec<Order>,
}

impl OrderStats {
    /// Orders currently in `status`.
    #[must_use]
    pub fn count(&self, status: OrderStatus) -> u64 {
        self.status_counts.get(status.as_str()).copied().unwrap_or(0)
    }

    /// Month-over-month revenue growth in percent, one decimal place.
    ///
    /// With no revenue last month any growth reads as 100%.
    #[must_use]
    pub fn revenue_growth(&self) -> Decimal {
        if self.last_month_revenue.is_zero() {
            return Decimal::ONE_HUNDRED;
        }
        ((self.this_month_revenue - self.last_month_revenue) / self.last_month_revenue
            * Decimal::ONE_HUNDRED)
            .round_dp(1)
    }
}

/// `PUT /orders/{id}/status` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_carrier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
