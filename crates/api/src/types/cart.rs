//! Cart wire types.

use coloring_bliss_core::{CartItemId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{ProductImage, SelectedColor, SizeSpec};

/// The server-computed cart. Every mutating cart call returns the whole
/// recomputed cart under `data.cart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// `data` wrapper of every cart response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartEnvelope {
    pub cart: Cart,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: CartItemId,
    /// Populated product; `None` when the product was deleted since it was
    /// added.
    #[serde(default)]
    pub product: Option<CartProduct>,
    pub quantity: u32,
    /// Unit price captured by the server.
    pub price: Decimal,
    #[serde(default)]
    pub selected_color: Option<SelectedColor>,
    #[serde(default)]
    pub sku: Option<String>,
}

impl CartItem {
    /// Whether the increment control should be offered.
    ///
    /// Stock is a heuristic here; the server rejects oversells.
    #[must_use]
    pub fn can_increment(&self) -> bool {
        self.product
            .as_ref()
            .is_none_or(|p| i64::from(self.quantity) < p.stock)
    }
}

/// The subset of product fields the API populates on cart lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub size: Option<SizeSpec>,
}

impl CartProduct {
    /// The image flagged primary, or the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }
}

/// `POST /cart` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart<'a> {
    pub product_id: &'a ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<&'a SelectedColor>,
}

/// `PUT /cart/{itemId}` body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateQuantity {
    pub quantity: u32,
}

/// `POST /cart/coupon` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCoupon<'a> {
    pub coupon_code: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decodes_cart_with_populated_lines() {
        let cart: Cart = serde_json::from_value(json!({
            "items": [{
                "_id": "i1",
                "product": { "_id": "p1", "name": "Kraft Notebook", "stock": 2 },
                "quantity": 2,
                "price": "100.00",
                "selectedColor": { "name": "Sage", "hex": "#9caf88" }
            }],
            "subtotal": 200,
            "discount": 0,
            "total": 200
        }))
        .unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal, Decimal::from(200));
        assert_eq!(cart.coupon_code, None);
        let line = &cart.items[0];
        assert_eq!(line.selected_color.as_ref().map(SelectedColor::name), Some("Sage"));
        assert!(!line.can_increment());
    }

    #[test]
    fn test_line_without_quantity_is_malformed() {
        let result = serde_json::from_value::<CartItem>(json!({
            "_id": "i1",
            "price": 100
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_add_body_omits_missing_color() {
        let product_id = ProductId::new("p1");
        let body = AddToCart {
            product_id: &product_id,
            quantity: 1,
            selected_color: None,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "productId": "p1", "quantity": 1 })
        );
    }
}
