//! Display data for templates.
//!
//! Handlers convert store API records into these flat, pre-formatted
//! structs so templates only print strings. Amounts are formatted, never
//! recomputed: every subtotal, discount, and total comes from the server.

use coloring_bliss_api::store::CartState;
use coloring_bliss_api::types::{
    Address, CartItem, Order, OrderItem, Pagination, Product, ShippingAddress,
};
use coloring_bliss_core::format::{
    discount_percentage, format_date, format_price, image_url, star_rating, truncate_text,
};
use coloring_bliss_core::OrderStatus;
use rust_decimal::Decimal;

use crate::middleware::Shopper;
use crate::models::Flash;

// =============================================================================
// Layout
// =============================================================================

/// Header and notice data shared by every page.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user_name: Option<String>,
    pub cart_count: u32,
    pub flash: Option<Flash>,
}

impl Layout {
    /// Build the layout for the current request, consuming the pending notice.
    pub async fn for_shopper(shopper: &Shopper) -> Self {
        Self {
            user_name: shopper.user().map(|u| u.first_name.clone()),
            cart_count: shopper.stores().cart.item_count(),
            flash: shopper.take_flash().await,
        }
    }

    /// The notice, falling back to a container error not yet shown.
    #[must_use]
    pub fn or_error(mut self, error: Option<String>) -> Self {
        if self.flash.is_none() {
            self.flash = error.map(Flash::error);
        }
        self
    }
}

fn price(amount: Decimal) -> String {
    format_price(Some(amount))
}

// =============================================================================
// Products
// =============================================================================

/// Product tile used on home, shop, related products, and the wishlist.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub category: Option<String>,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub discount_percent: u32,
    pub image: Option<String>,
    pub image_alt: String,
    pub in_stock: bool,
    pub is_new: bool,
    pub size: Option<String>,
    pub stars: Vec<&'static str>,
    pub review_count: u32,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, api_base: &str) -> Self {
        let image = product.primary_image();
        let compare_at = product.compare_at_price.filter(|c| *c > product.price);

        Self {
            id: product.id.to_string(),
            slug: product.slug.clone(),
            name: product.name.clone(),
            category: product.category_name().map(String::from),
            price: price(product.price),
            compare_at_price: compare_at.map(price),
            discount_percent: compare_at.map_or(0, |c| discount_percentage(c, product.price)),
            image: image_url(image.map(|i| i.url.as_str()), api_base),
            image_alt: image
                .and_then(|i| i.alt.clone())
                .unwrap_or_else(|| product.name.clone()),
            in_stock: product.in_stock(),
            is_new: product.is_new_arrival,
            size: product
                .size
                .as_ref()
                .and_then(|s| s.label())
                .map(String::from),
            stars: product
                .average_rating
                .map(|r| star_rating(r).iter().map(|s| s.class()).collect())
                .unwrap_or_default(),
            review_count: product.review_count,
        }
    }

    #[must_use]
    pub fn list(products: &[Product], api_base: &str) -> Vec<Self> {
        products.iter().map(|p| Self::new(p, api_base)).collect()
    }
}

/// Image on the product gallery.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// One row of the specifications table.
#[derive(Debug, Clone)]
pub struct SpecRow {
    pub label: &'static str,
    pub value: String,
}

/// A review as displayed.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub byline: String,
    pub stars: Vec<&'static str>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub date: Option<String>,
}

/// Color swatch.
#[derive(Debug, Clone)]
pub struct SwatchView {
    pub name: String,
    pub hex: String,
}

/// Everything the product page shows.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub card: ProductCard,
    pub description: String,
    pub short_description: Option<String>,
    pub sku: Option<String>,
    pub images: Vec<ImageView>,
    pub colors: Vec<SwatchView>,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub specs: Vec<SpecRow>,
    pub stock: i64,
    pub low_stock: bool,
    pub reviews: Vec<ReviewView>,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, api_base: &str) -> Self {
        let images = product
            .images
            .iter()
            .filter_map(|img| {
                image_url(Some(img.url.as_str()), api_base).map(|url| ImageView {
                    url,
                    alt: img.alt.clone().unwrap_or_else(|| product.name.clone()),
                })
            })
            .collect();

        Self {
            card: ProductCard::new(product, api_base),
            description: product.description.clone().unwrap_or_default(),
            short_description: product.short_description.clone(),
            sku: product.sku.clone(),
            images,
            colors: product
                .colors
                .iter()
                .map(|c| SwatchView {
                    name: c.name.clone(),
                    hex: c.hex.clone(),
                })
                .collect(),
            features: product.features.clone(),
            tags: product.tags.clone(),
            specs: spec_rows(product),
            stock: product.stock,
            low_stock: product.low_stock(),
            reviews: product
                .reviews
                .iter()
                .map(|r| ReviewView {
                    byline: r
                        .user
                        .as_ref()
                        .map(|u| u.byline())
                        .filter(|b| !b.is_empty())
                        .unwrap_or_else(|| "Verified buyer".to_string()),
                    stars: star_rating(Decimal::from(r.rating))
                        .iter()
                        .map(|s| s.class())
                        .collect(),
                    title: r.title.clone(),
                    comment: r.comment.clone(),
                    date: r.created_at.as_ref().map(format_date),
                })
                .collect(),
        }
    }
}

fn spec_rows(product: &Product) -> Vec<SpecRow> {
    let mut rows = Vec::new();
    let mut push = |label: &'static str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            rows.push(SpecRow { label, value });
        }
    };

    if let Some(size) = &product.size {
        push("Size", size.label().map(String::from));
        push(
            "Dimensions",
            size.dimensions.as_ref().and_then(|d| match (d.width, d.height) {
                (Some(w), Some(h)) => Some(format!("{w} x {h} in")),
                _ => None,
            }),
        );
    }
    if let Some(paper) = &product.paper {
        push("Paper", paper.kind.as_ref().map(|k| k.label().to_string()));
        push("Paper weight", paper.weight.map(|w| format!("{w} GSM")));
        push("Paper color", paper.color.clone());
        push("Pages", paper.page_count.map(|p| p.to_string()));
    }
    if let Some(cover) = &product.cover {
        push("Cover", cover.kind.as_ref().map(|k| k.label().to_string()));
        push("Cover material", cover.material.clone());
        push("Finish", cover.finish.clone());
    }
    push("Binding", product.binding.as_ref().map(|b| b.label().to_string()));
    rows
}

// =============================================================================
// Cart
// =============================================================================

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub slug: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub can_increment: bool,
    pub can_decrement: bool,
}

impl CartLineView {
    fn new(item: &CartItem, api_base: &str) -> Self {
        let product = item.product.as_ref();
        Self {
            id: item.id.to_string(),
            slug: product.and_then(|p| p.slug.clone()),
            name: product.map_or_else(|| "Unavailable product".to_string(), |p| p.name.clone()),
            image: image_url(
                product
                    .and_then(|p| p.primary_image())
                    .map(|i| i.url.as_str()),
                api_base,
            ),
            color: item.selected_color.as_ref().map(|c| c.name().to_string()),
            size: product
                .and_then(|p| p.size.as_ref())
                .and_then(|s| s.label())
                .map(String::from),
            quantity: item.quantity,
            unit_price: price(item.price),
            line_price: price(item.price * Decimal::from(item.quantity)),
            can_increment: item.can_increment(),
            can_decrement: item.quantity > 1,
        }
    }
}

/// Cart page and checkout summary.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub discount: Option<String>,
    pub total: String,
    pub coupon_code: Option<String>,
}

impl CartView {
    #[must_use]
    pub fn new(state: &CartState, api_base: &str) -> Self {
        Self {
            lines: state
                .items
                .iter()
                .map(|item| CartLineView::new(item, api_base))
                .collect(),
            item_count: state.item_count,
            subtotal: price(state.subtotal),
            discount: (state.discount > Decimal::ZERO).then(|| price(state.discount)),
            total: price(state.total),
            coupon_code: state.coupon_code.clone(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order row on the history page.
#[derive(Debug, Clone)]
pub struct OrderSummaryView {
    pub id: String,
    pub order_number: String,
    pub date: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    pub total: String,
    pub units: u32,
    pub first_item: Option<String>,
}

impl OrderSummaryView {
    #[must_use]
    pub fn new(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            order_number: order.order_number.clone(),
            date: format_date(&order.created_at),
            status: order.status.as_str(),
            status_label: order.status.label(),
            status_tone: order.status.tone(),
            total: price(order.total),
            units: order.unit_count(),
            first_item: order.items.first().map(|i| truncate_text(&i.name, 40)),
        }
    }
}

/// Purchased line on the order page.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub image: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

impl OrderLineView {
    fn new(item: &OrderItem, api_base: &str) -> Self {
        Self {
            name: item.name.clone(),
            image: image_url(item.image.as_deref(), api_base),
            color: item.selected_color.as_ref().map(|c| c.name().to_string()),
            quantity: item.quantity,
            unit_price: price(item.price),
            line_price: price(item.price * Decimal::from(item.quantity)),
        }
    }
}

/// Tracker step.
#[derive(Debug, Clone)]
pub struct StepView {
    pub label: &'static str,
    pub done: bool,
    pub current: bool,
}

/// Status history entry.
#[derive(Debug, Clone)]
pub struct HistoryView {
    pub label: &'static str,
    pub note: Option<String>,
    pub date: String,
}

/// Shipping address lines.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub name: String,
    pub street: String,
    pub locality: String,
    pub country: String,
    pub phone: String,
    pub email: Option<String>,
}

impl From<&ShippingAddress> for AddressView {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            name: address.full_name(),
            street: address.street.clone(),
            locality: address.locality(),
            country: address.country.clone(),
            phone: address.phone.clone(),
            email: address.email.clone(),
        }
    }
}

/// Everything the order page shows.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub summary: OrderSummaryView,
    pub lines: Vec<OrderLineView>,
    pub address: AddressView,
    pub payment_method: String,
    pub payment_status: String,
    pub is_paid: bool,
    pub paid_at: Option<String>,
    pub subtotal: String,
    pub shipping_cost: String,
    pub tax: Option<String>,
    pub discount: Option<String>,
    pub coupon_code: Option<String>,
    pub total: String,
    pub cancelled: bool,
    pub steps: Vec<StepView>,
    pub history: Vec<HistoryView>,
    pub tracking_number: Option<String>,
    pub shipping_carrier: Option<String>,
}

impl OrderDetailView {
    #[must_use]
    pub fn new(order: &Order, api_base: &str) -> Self {
        let current = order.status.step();
        let steps = OrderStatus::STEPS
            .iter()
            .enumerate()
            .map(|(i, status)| StepView {
                label: status.step_label(),
                done: current.is_some_and(|c| i <= c),
                current: current == Some(i),
            })
            .collect();

        Self {
            summary: OrderSummaryView::new(order),
            lines: order
                .items
                .iter()
                .map(|item| OrderLineView::new(item, api_base))
                .collect(),
            address: AddressView::from(&order.shipping_address),
            payment_method: order.payment_method.label().to_string(),
            payment_status: order.payment_status.label().to_string(),
            is_paid: order.is_paid,
            paid_at: order.paid_at.as_ref().map(format_date),
            subtotal: price(order.subtotal),
            shipping_cost: if order.shipping_cost.is_zero() {
                "Free".to_string()
            } else {
                price(order.shipping_cost)
            },
            tax: (order.tax > Decimal::ZERO).then(|| price(order.tax)),
            discount: (order.discount > Decimal::ZERO).then(|| price(order.discount)),
            coupon_code: order.coupon_code.clone(),
            total: price(order.total),
            cancelled: order.status == OrderStatus::Cancelled,
            steps,
            history: order
                .status_history
                .iter()
                .rev()
                .map(|h| HistoryView {
                    label: h.status.label(),
                    note: h.note.clone(),
                    date: format_date(&h.timestamp),
                })
                .collect(),
            tracking_number: order.tracking_number.clone(),
            shipping_carrier: order.shipping_carrier.clone(),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// Saved address card.
#[derive(Debug, Clone)]
pub struct SavedAddressView {
    pub id: String,
    pub label: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
    pub is_default: bool,
}

impl From<&Address> for SavedAddressView {
    fn from(address: &Address) -> Self {
        Self {
            id: address
                .id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            label: address.label.clone().unwrap_or_else(|| "Address".to_string()),
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
            phone: address.phone.clone(),
            is_default: address.is_default,
        }
    }
}

impl SavedAddressView {
    /// Whether the address carries the label choice `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Numbered page link.
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coloring_bliss_api::types::Cart;
    use serde_json::json;

    use super::*;

    fn product() -> Product {
        serde_json::from_value(json!({
            "_id": "p1",
            "name": "Dotted A5 Notebook",
            "slug": "dotted-a5",
            "price": 450,
            "compareAtPrice": 500,
            "stock": 3,
            "images": [
                {"url": "/uploads/products/back.jpg"},
                {"url": "/uploads/products/front.jpg", "alt": "Front", "isPrimary": true}
            ],
            "size": {"name": "medium", "dimensions": {"width": 5.5, "height": 8.5}},
            "paper": {"type": "dotted", "weight": 100, "pageCount": 160},
            "cover": {"type": "hardcover", "finish": "matte"},
            "binding": "sewn",
            "averageRating": 4.5,
            "reviewCount": 2,
            "isNewArrival": true
        }))
        .unwrap()
    }

    #[test]
    fn test_product_card_formats_server_values() {
        let card = ProductCard::new(&product(), "https://api.example.ph/api");
        assert_eq!(card.price, "₱450.00");
        assert_eq!(card.compare_at_price.as_deref(), Some("₱500.00"));
        assert_eq!(card.discount_percent, 10);
        assert_eq!(
            card.image.as_deref(),
            Some("https://api.example.ph/uploads/products/front.jpg")
        );
        assert_eq!(card.image_alt, "Front");
        assert_eq!(card.size.as_deref(), Some("Medium"));
        assert_eq!(card.stars, vec!["full", "full", "full", "full", "half"]);
        assert!(card.is_new);
    }

    #[test]
    fn test_spec_rows_use_labels() {
        let rows = spec_rows(&product());
        let find = |label: &str| {
            rows.iter()
                .find(|r| r.label == label)
                .map(|r| r.value.clone())
        };
        assert_eq!(find("Paper").as_deref(), Some("Dot Grid"));
        assert_eq!(find("Binding").as_deref(), Some("Sewn"));
        assert_eq!(find("Pages").as_deref(), Some("160"));
        assert_eq!(find("Dimensions").as_deref(), Some("5.5 x 8.5 in"));
        assert!(find("Cover material").is_none());
    }

    #[test]
    fn test_cart_view_shows_server_totals() {
        let cart: Cart = serde_json::from_value(json!({
            "items": [{
                "_id": "i1",
                "product": {"_id": "p1", "name": "Dotted A5 Notebook", "stock": 2},
                "quantity": 2,
                "price": 100
            }],
            "subtotal": 200,
            "discount": 20,
            "total": 180,
            "couponCode": "SAVE10"
        }))
        .unwrap();
        let state = CartState {
            item_count: cart.items.iter().map(|i| i.quantity).sum(),
            items: cart.items,
            subtotal: cart.subtotal,
            discount: cart.discount,
            total: cart.total,
            coupon_code: cart.coupon_code,
            ..CartState::default()
        };

        let view = CartView::new(&state, "https://api.example.ph/api");
        assert_eq!(view.subtotal, "₱200.00");
        assert_eq!(view.discount.as_deref(), Some("₱20.00"));
        assert_eq!(view.total, "₱180.00");
        assert_eq!(view.item_count, 2);
        assert!(!view.lines[0].can_increment);
        assert!(view.lines[0].can_decrement);
    }

    #[test]
    fn test_pager_links() {
        let pagination = Pagination {
            page: 2,
            limit: 12,
            total: 30,
            pages: 3,
        };
        let pager = Pager::new(&pagination, |p| format!("/shop?page={p}"));
        assert_eq!(pager.previous.as_deref(), Some("/shop?page=1"));
        assert_eq!(pager.next.as_deref(), Some("/shop?page=3"));
        assert_eq!(pager.pages.len(), 3);
        assert!(pager.pages[1].current);

        let single = Pager::new(&Pagination::default(), |p| p.to_string());
        assert!(single.is_empty());
    }
}
