//! Display data for admin templates.
//!
//! Store API records are flattened into pre-formatted rows here so templates
//! only print strings. Amounts always come from the server.

use coloring_bliss_api::types::{Category, Order, OrderStats, Pagination, Product};
use coloring_bliss_core::format::{format_date, format_price, image_url, truncate_text};
use coloring_bliss_core::OrderStatus;
use rust_decimal::Decimal;

use crate::middleware::Console;
use crate::models::{CurrentAdmin, Flash, ImageDraft};

/// Stock at or below this shows as low in the product list.
const LOW_STOCK: i64 = 5;

fn price(amount: Decimal) -> String {
    format_price(Some(amount))
}

// =============================================================================
// Layout
// =============================================================================

/// Sidebar section highlighted in the navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Dashboard,
    Products,
    Orders,
    Categories,
}

impl Section {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Categories => "categories",
        }
    }
}

/// Sidebar and notice data shared by every console page.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub admin_name: String,
    pub initials: String,
    pub store_url: String,
    pub section: Section,
    pub flash: Option<Flash>,
}

impl Layout {
    /// Build the layout for a signed-in page, consuming the pending notice.
    pub async fn new(console: &Console, admin: &CurrentAdmin, section: Section) -> Self {
        Self {
            admin_name: admin.name.clone(),
            initials: initials(&admin.name),
            store_url: console.store_url().to_string(),
            section,
            flash: console.take_flash().await,
        }
    }

    /// Layout for the signed-out login page.
    pub async fn signed_out(console: &Console) -> Self {
        Self {
            flash: console.take_flash().await,
            ..Self::default()
        }
    }

    /// Whether the sidebar link for `section` is the current one.
    #[must_use]
    pub fn is_current(&self, section: &str) -> bool {
        self.section.as_str() == section
    }

    /// Replace the notice with `flash`.
    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// An option in a `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    /// Options for `values`, with `current` selected. A current value
    /// outside the list is appended so editing never silently changes it.
    pub fn list<'a>(
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
        current: &str,
    ) -> Vec<Self> {
        let mut options: Vec<Self> = values
            .into_iter()
            .map(|(value, label)| Self {
                value: value.to_string(),
                label: label.to_string(),
                selected: value == current,
            })
            .collect();
        if !current.is_empty() && !options.iter().any(|o| o.selected) {
            options.push(Self {
                value: current.to_string(),
                label: current.to_string(),
                selected: true,
            });
        }
        options
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Numbered link in a pager.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Pager under a listing.
#[derive(Debug, Clone, Default)]
pub struct Pager {
    pub total: u64,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub pages: Vec<PageLink>,
}

impl Pager {
    /// Build page links with `href(page)`; a single page yields no links.
    pub fn new(pagination: &Pagination, href: impl Fn(u32) -> String) -> Self {
        let pages = if pagination.pages > 1 {
            (1..=pagination.pages)
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    current: number == pagination.page,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            total: pagination.total,
            previous: pagination
                .has_previous()
                .then(|| href(pagination.page.saturating_sub(1))),
            next: pagination.has_next().then(|| href(pagination.page + 1)),
            pages,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

// =============================================================================
// Products and categories
// =============================================================================

/// Row of the product table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub product_type: String,
    pub image: Option<String>,
    pub sku: String,
    pub category: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub stock: i64,
    pub low_stock: bool,
    pub is_active: bool,
}

impl ProductRow {
    #[must_use]
    pub fn new(product: &Product, api_base: &str) -> Self {
        Self {
            id: product.id.to_string(),
            slug: product.slug.clone(),
            name: product.name.clone(),
            product_type: product.product_type.clone().unwrap_or_default(),
            image: image_url(product.images.first().map(|i| i.url.as_str()), api_base),
            sku: product.sku.clone().unwrap_or_default(),
            category: product.category_name().unwrap_or("-").to_string(),
            price: price(product.price),
            compare_at_price: product.compare_at_price.map(price),
            stock: product.stock,
            low_stock: product.stock <= LOW_STOCK,
            is_active: product.is_active,
        }
    }
}

/// Image tile on the product form.
#[derive(Debug, Clone)]
pub struct ImageTile {
    /// URL as stored on the product, posted back to remove it.
    pub url: String,
    /// URL the browser loads.
    pub src: String,
    pub is_primary: bool,
}

impl ImageTile {
    #[must_use]
    pub fn list(draft: &ImageDraft, api_base: &str) -> Vec<Self> {
        draft
            .images
            .iter()
            .enumerate()
            .map(|(index, image)| Self {
                url: image.url.clone(),
                src: image_url(Some(&image.url), api_base).unwrap_or_else(|| image.url.clone()),
                is_primary: index == 0,
            })
            .collect()
    }
}

/// Row of the category table.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map_or_else(|| "-".to_string(), |d| truncate_text(d, 80)),
            display_order: category.display_order,
            is_active: category.is_active,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Row of the order tables (list and dashboard).
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub order_number: String,
    pub date: String,
    pub customer_name: String,
    pub customer_email: String,
    pub item_count: usize,
    pub total: String,
    pub is_paid: bool,
    pub status: &'static str,
    pub status_label: &'static str,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        let customer = order.customer();
        Self {
            id: order.id.to_string(),
            order_number: order.order_number.clone(),
            date: format_date(&order.created_at),
            customer_name: customer.map_or_else(
                || order.shipping_address.full_name(),
                |c| c.full_name(),
            ),
            customer_email: customer
                .and_then(|c| c.email.clone())
                .or_else(|| order.shipping_address.email.clone())
                .unwrap_or_default(),
            item_count: order.items.len(),
            total: price(order.total),
            is_paid: order.is_paid,
            status: order.status.as_str(),
            status_label: order.status.label(),
        }
    }
}

/// Line of the order detail table.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub name: String,
    pub image: Option<String>,
    pub color: Option<String>,
    pub sku: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Entry of the status timeline.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub status: &'static str,
    pub label: &'static str,
    pub date: String,
    pub note: Option<String>,
}

/// Everything the order detail page prints.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub row: OrderRow,
    pub lines: Vec<OrderLine>,
    pub subtotal: String,
    /// `None` when shipping was free.
    pub shipping_cost: Option<String>,
    pub tax: String,
    pub discount: Option<String>,
    pub coupon_code: Option<String>,
    pub total: String,
    pub address_name: String,
    pub street: String,
    pub locality: String,
    pub country: String,
    pub phone: String,
    pub payment_method: String,
    pub paid_at: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub tracking_number: String,
    pub shipping_carrier: String,
}

impl OrderDetail {
    #[must_use]
    pub fn new(order: &Order, api_base: &str) -> Self {
        let address = &order.shipping_address;
        Self {
            row: OrderRow::from(order),
            lines: order
                .items
                .iter()
                .map(|item| OrderLine {
                    name: item.name.clone(),
                    image: image_url(item.image.as_deref(), api_base),
                    color: item.selected_color.as_ref().map(|c| c.name().to_string()),
                    sku: item.sku.clone().unwrap_or_default(),
                    price: price(item.price),
                    quantity: item.quantity,
                    line_total: price(item.price * Decimal::from(item.quantity)),
                })
                .collect(),
            subtotal: price(order.subtotal),
            shipping_cost: (!order.shipping_cost.is_zero()).then(|| price(order.shipping_cost)),
            tax: price(order.tax),
            discount: (order.discount > Decimal::ZERO).then(|| price(order.discount)),
            coupon_code: order.coupon_code.clone(),
            total: price(order.total),
            address_name: address.full_name(),
            street: address.street.clone(),
            locality: address.locality(),
            country: address.country.clone(),
            phone: address.phone.clone(),
            payment_method: order.payment_method.label().to_string(),
            paid_at: order
                .paid_at
                .as_ref()
                .filter(|_| order.is_paid)
                .map(format_date),
            history: order
                .status_history
                .iter()
                .map(|change| HistoryEntry {
                    status: change.status.as_str(),
                    label: change.status.label(),
                    date: format_date(&change.timestamp),
                    note: change.note.clone().filter(|n| !n.trim().is_empty()),
                })
                .collect(),
            tracking_number: order.tracking_number.clone().unwrap_or_default(),
            shipping_carrier: order.shipping_carrier.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Bar in the order status overview.
#[derive(Debug, Clone)]
pub struct StatusBar {
    pub status: &'static str,
    pub label: &'static str,
    pub count: u64,
    /// Share of all orders, 0 to 100.
    pub percent: u64,
}

/// Dashboard cards, status overview, and recent orders.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub month_revenue: String,
    pub revenue_growth: String,
    pub growth_positive: bool,
    pub total_orders: u64,
    pub today_orders: u64,
    pub pending: u64,
    pub processing: u64,
    pub delivered: u64,
    pub shipped: u64,
    pub bars: Vec<StatusBar>,
    pub recent_orders: Vec<OrderRow>,
}

impl From<&OrderStats> for DashboardView {
    fn from(stats: &OrderStats) -> Self {
        let growth = stats.revenue_growth();
        let denominator = stats.total_orders.max(1);
        Self {
            month_revenue: price(stats.this_month_revenue),
            revenue_growth: format!("{:.1}", growth.abs()),
            growth_positive: growth >= Decimal::ZERO,
            total_orders: stats.total_orders,
            today_orders: stats.today_orders,
            pending: stats.count(OrderStatus::Pending),
            processing: stats.count(OrderStatus::Processing),
            delivered: stats.count(OrderStatus::Delivered),
            shipped: stats.count(OrderStatus::Shipped),
            bars: OrderStatus::ALL
                .into_iter()
                .map(|status| {
                    let count = stats.count(status);
                    StatusBar {
                        status: status.as_str(),
                        label: status.label(),
                        count,
                        percent: (count * 100 / denominator).min(100),
                    }
                })
                .collect(),
            recent_orders: stats.recent_orders.iter().map(OrderRow::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order() -> Order {
        serde_json::from_value(json!({
            "_id": "o1",
            "orderNumber": "CB-1001",
            "user": { "_id": "u1", "firstName": "Ana", "lastName": "Reyes", "email": "ana@example.com" },
            "items": [{ "name": "Kraft Notebook", "price": 150, "quantity": 2, "sku": "KN-01" }],
            "shippingAddress": {
                "firstName": "Ana", "lastName": "Reyes", "street": "12 Mabini St",
                "city": "Quezon City", "state": "Metro Manila", "zipCode": "1100", "phone": "0917"
            },
            "paymentMethod": "cod",
            "subtotal": 300,
            "shippingCost": 0,
            "tax": 0,
            "total": 300,
            "status": "shipped",
            "statusHistory": [
                { "status": "pending", "timestamp": "2025-01-05T08:00:00Z" },
                { "status": "shipped", "note": " ", "timestamp": "2025-01-06T08:00:00Z" }
            ],
            "createdAt": "2025-01-05T08:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ana maria reyes"), "AM");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_select_keeps_unknown_current_value() {
        let options = SelectOption::list([("small", "Small"), ("medium", "Medium")], "jumbo");
        assert_eq!(options.len(), 3);
        assert!(options[2].selected);
        assert_eq!(options[2].label, "jumbo");

        let options = SelectOption::list([("small", "Small"), ("medium", "Medium")], "medium");
        assert_eq!(options.len(), 2);
        assert!(options[1].selected);
    }

    #[test]
    fn test_order_detail_formats_server_amounts() {
        let detail = OrderDetail::new(&order(), "http://localhost:5000/api");
        assert_eq!(detail.row.customer_name, "Ana Reyes");
        assert_eq!(detail.row.item_count, 1);
        assert_eq!(detail.lines[0].line_total, "₱300.00");
        assert_eq!(detail.shipping_cost, None);
        assert_eq!(detail.discount, None);
        assert_eq!(detail.payment_method, "Cash on Delivery");
        assert_eq!(detail.history.len(), 2);
        assert_eq!(detail.history[1].note, None);
    }

    #[test]
    fn test_dashboard_bars() {
        let stats: OrderStats = serde_json::from_value(json!({
            "totalOrders": 4,
            "todayOrders": 1,
            "thisMonthRevenue": 1500,
            "lastMonthRevenue": 1000,
            "statusCounts": { "pending": 1, "delivered": 3 },
            "recentOrders": []
        }))
        .unwrap();

        let view = DashboardView::from(&stats);
        assert_eq!(view.month_revenue, "₱1,500.00");
        assert!(view.growth_positive);
        assert_eq!(view.revenue_growth, "50.0");
        assert_eq!(view.pending, 1);
        let delivered = view.bars.iter().find(|b| b.status == "delivered").unwrap();
        assert_eq!(delivered.percent, 75);
    }
}
