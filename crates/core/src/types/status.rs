//! Status enums for orders, payments, and accounts.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// The store API only ever moves orders between these six states, so an
/// unexpected value is treated as a malformed response rather than passed
/// through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in the order an admin would pick them.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Progress steps shown on the order tracker.
    pub const STEPS: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Label for the tracker step this status represents.
    #[must_use]
    pub const fn step_label(self) -> &'static str {
        match self {
            Self::Pending => "Order Placed",
            other => other.label(),
        }
    }

    /// Badge tone used by the order lists.
    #[must_use]
    pub const fn tone(self) -> &'static str {
        match self {
            Self::Pending => "warning",
            Self::Confirmed | Self::Shipped => "info",
            Self::Processing => "primary",
            Self::Delivered => "success",
            Self::Cancelled => "error",
        }
    }

    /// Index into [`Self::STEPS`]; `None` for cancelled orders.
    #[must_use]
    pub const fn step(self) -> Option<usize> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Processing => Some(2),
            Self::Shipped => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

label_enum! {
    /// Payment method chosen at checkout.
    ///
    /// Everything except cash on delivery is collected on the hosted
    /// checkout page.
    PaymentMethod {
        Card => ("card", "Credit/Debit Card"),
        Gcash => ("gcash", "GCash"),
        Maya => ("maya", "Maya"),
        CashOnDelivery => ("cod", "Cash on Delivery"),
    }
}

impl PaymentMethod {
    /// Whether the order is created directly instead of through a hosted
    /// checkout session.
    #[must_use]
    pub fn is_cash_on_delivery(&self) -> bool {
        matches!(self, Self::CashOnDelivery)
    }
}

label_enum! {
    /// Payment collection status.
    PaymentStatus {
        Pending => ("pending", "Pending"),
        Paid => ("paid", "Paid"),
        Failed => ("failed", "Failed"),
        Refunded => ("refunded", "Refunded"),
    }
}

/// Account role on the store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Shopper account.
    #[default]
    #[serde(alias = "customer")]
    User,
    /// Back-office access to products, categories, and orders.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}
