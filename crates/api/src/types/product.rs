//! Catalog wire types: products, reviews, facets.

use chrono::{DateTime, Utc};
use coloring_bliss_core::{
    Binding, CategoryId, CoverType, PaperType, ProductId, ProductSize,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Pagination;

const fn default_low_stock_threshold() -> i64 {
    5
}

const fn default_true() -> bool {
    true
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub size: Option<SizeSpec>,
    #[serde(default)]
    pub paper: Option<PaperSpec>,
    #[serde(default)]
    pub cover: Option<CoverSpec>,
    #[serde(default)]
    pub binding: Option<Binding>,
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub average_rating: Option<Decimal>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Product {
    /// The image flagged primary, or the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }

    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether stock is positive but at or under the low-stock threshold.
    #[must_use]
    pub const fn low_stock(&self) -> bool {
        self.stock > 0 && self.stock <= self.low_stock_threshold
    }

    /// Category name when the API populated the reference.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(CategoryRef::name)
    }
}

/// A product's category: populated with a name, or a bare ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(CategorySummary),
    Id(CategoryId),
}

impl CategoryRef {
    /// The referenced category ID.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Populated(summary) => &summary.id,
            Self::Id(id) => id,
        }
    }

    /// Category name, if populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated(summary) => Some(summary.name.as_str()),
            Self::Id(_) => None,
        }
    }
}

/// Minimal populated category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A product reference inside a user record: bare ID or populated product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Populated(Box<Product>),
}

impl ProductRef {
    /// The referenced product ID.
    #[must_use]
    pub fn id(&self) -> &ProductId {
        match self {
            Self::Id(id) => id,
            Self::Populated(product) => &product.id,
        }
    }
}

/// Notebook size block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSpec {
    #[serde(default)]
    pub name: Option<ProductSize>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

impl SizeSpec {
    /// The server's display name, else the size label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.name.as_ref().map(ProductSize::label))
    }
}

/// Page dimensions in inches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: Option<Decimal>,
    #[serde(default)]
    pub height: Option<Decimal>,
}

/// Paper block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSpec {
    #[serde(rename = "type", default)]
    pub kind: Option<PaperType>,
    /// Paper weight in GSM.
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
}

/// Cover block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverSpec {
    #[serde(rename = "type", default)]
    pub kind: Option<CoverType>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub finish: Option<String>,
}

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// A color variant a shopper can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub hex: String,
}

/// The color recorded on a cart line or order line.
///
/// Older orders stored only the color name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedColor {
    Option(ColorOption),
    Name(String),
}

impl SelectedColor {
    /// Color name for display.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Option(color) => &color.name,
            Self::Name(name) => name,
        }
    }
}

/// A shopper review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: u8,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Review author as populated by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl ReviewAuthor {
    /// "Maria S." style byline.
    #[must_use]
    pub fn byline(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let initial = self
            .last_name
            .as_deref()
            .and_then(|last| last.chars().next())
            .map(|c| format!(" {c}."))
            .unwrap_or_default();
        format!("{first}{initial}").trim().to_string()
    }
}

/// `GET /products` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// `GET /products/featured` and `/products/new-arrivals` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// `GET /products/{slug}` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Product,
    #[serde(default)]
    pub related_products: Vec<Product>,
}

/// `GET /products/id/{id}` and admin create/update payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductEnvelope {
    pub product: Product,
}

/// Facet values available for the shop sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    #[serde(default)]
    pub product_types: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub paper_types: Vec<String>,
    #[serde(default)]
    pub cover_types: Vec<String>,
    #[serde(default)]
    pub bindings: Vec<String>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
}

/// Lowest and highest active price.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_price: Decimal,
    pub max_price: Decimal,
}

/// Body for `POST /products` and `PUT /products/{id}`.
///
/// Numbers are sent as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub sku: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_at_price: Option<Decimal>,
    pub product_type: String,
    pub category: CategoryId,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub size: SizeInput,
    pub paper: PaperInput,
    pub cover: CoverInput,
    pub binding: String,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<Decimal>,
    pub is_featured: bool,
    pub is_new_arrival: bool,
    pub is_active: bool,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub images: Vec<ProductImage>,
}

/// Size block of [`ProductInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeInput {
    pub name: String,
    pub display_name: String,
    pub dimensions: DimensionsInput,
}

/// Dimensions block of [`SizeInput`], in inches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionsInput {
    #[serde(with = "rust_decimal::serde::float")]
    pub width: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub height: Decimal,
}

/// Paper block of [`ProductInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub weight: u32,
    pub color: String,
    pub page_count: u32,
}

/// Cover block of [`ProductInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub material: String,
    pub color: String,
    pub finish: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> serde_json::Value {
        json!({
            "_id": "p1",
            "name": "Dotted A5 Journal",
            "slug": "dotted-a5-journal",
            "price": 450,
            "compareAtPrice": 550.0,
            "category": { "_id": "c1", "name": "Journals", "slug": "journals" },
            "stock": 3,
            "size": { "name": "medium" },
            "paper": { "type": "dotted", "weight": 100, "pageCount": 192 },
            "cover": { "type": "hardcover" },
            "binding": "lay-flat",
            "images": [
                { "url": "/uploads/a.jpg" },
                { "url": "/uploads/b.jpg", "isPrimary": true }
            ],
            "createdAt": "2025-01-05T00:00:00.000Z"
        })
    }

    #[test]
    fn test_decodes_product_with_defaults() {
        let product: Product = serde_json::from_value(sample()).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.price, Decimal::from(450));
        assert_eq!(product.low_stock_threshold, 5);
        assert!(product.is_active);
        assert!(product.low_stock());
        assert_eq!(product.category_name(), Some("Journals"));
        assert_eq!(product.primary_image().map(|i| i.url.as_str()), Some("/uploads/b.jpg"));
        assert_eq!(product.size.as_ref().and_then(SizeSpec::label), Some("Medium"));
        assert_eq!(product.binding, Some(Binding::Other("lay-flat".to_string())));
    }

    #[test]
    fn test_category_may_be_bare_id() {
        let mut value = sample();
        value["category"] = json!("c9");
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.category.as_ref().map(|c| c.id().as_str()), Some("c9"));
        assert_eq!(product.category_name(), None);
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("price");
        assert!(serde_json::from_value::<Product>(value).is_err());
    }

    #[test]
    fn test_product_input_sends_numbers() {
        let input = ProductInput {
            name: "Grid Notebook".to_string(),
            description: String::new(),
            short_description: String::new(),
            sku: "CB-GRID-A5".to_string(),
            price: Decimal::new(34950, 2),
            compare_at_price: None,
            product_type: "notebook".to_string(),
            category: CategoryId::new("c1"),
            stock: 10,
            low_stock_threshold: 5,
            size: SizeInput {
                name: "medium".to_string(),
                display_name: "A5".to_string(),
                dimensions: DimensionsInput {
                    width: Decimal::new(55, 1),
                    height: Decimal::new(85, 1),
                },
            },
            paper: PaperInput {
                kind: "grid".to_string(),
                weight: 80,
                color: "white".to_string(),
                page_count: 100,
            },
            cover: CoverInput {
                kind: "softcover".to_string(),
                material: String::new(),
                color: String::new(),
                finish: "matte".to_string(),
            },
            binding: "perfect".to_string(),
            weight: None,
            is_featured: false,
            is_new_arrival: true,
            is_active: true,
            features: vec![],
            tags: vec![],
            images: vec![],
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["price"], json!(349.5));
        assert_eq!(value["size"]["dimensions"]["width"], json!(5.5));
        assert_eq!(value["paper"]["type"], "grid");
        assert!(value.get("compareAtPrice").is_none());
        assert_eq!(value["category"], "c1");
    }

    #[test]
    fn test_review_byline() {
        let author = ReviewAuthor {
            first_name: Some("Maria".to_string()),
            last_name: Some("Santos".to_string()),
        };
        assert_eq!(author.byline(), "Maria S.");
    }
}
