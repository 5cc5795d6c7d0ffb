//! Console form bodies and their conversion into store API requests.
//!
//! Every field arrives as text so a rejected form can be shown again exactly
//! as typed. Checkboxes are present only when ticked.

use coloring_bliss_api::types::{
    Category, CategoryForm, CoverInput, DimensionsInput, PaperInput, Product, ProductImage,
    ProductInput, SizeInput, StatusUpdate,
};
use coloring_bliss_core::{CategoryId, OrderStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Product types offered on the form.
pub const PRODUCT_TYPES: &[(&str, &str)] = &[
    ("notebook", "Notebook"),
    ("notepad", "Notepad"),
    ("journal", "Journal"),
    ("sketchbook", "Sketchbook"),
    ("planner", "Planner"),
];

/// Cover finishes offered on the form.
pub const COVER_FINISHES: &[(&str, &str)] =
    &[("matte", "Matte"), ("glossy", "Glossy"), ("textured", "Textured")];

/// Couriers offered when updating an order.
pub const SHIPPING_CARRIERS: &[(&str, &str)] = &[
    ("J&T Express", "J&T Express"),
    ("Flash Express", "Flash Express"),
    ("LBC", "LBC"),
    ("JRS Express", "JRS Express"),
];

/// Most images a product may carry.
pub const MAX_PRODUCT_IMAGES: usize = 5;

const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

fn checked(value: Option<&String>) -> bool {
    value.is_some()
}

fn tick(on: bool) -> Option<String> {
    on.then(|| "on".to_string())
}

fn blank_to_none(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(blank_to_none).collect()
}

fn parse_amount(raw: &str, message: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|d| *d >= Decimal::ZERO)
        .ok_or_else(|| message.to_string())
}

fn parse_optional_amount(raw: &str, message: &str) -> Result<Option<Decimal>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_amount(raw, message).map(Some)
}

fn parse_count<T: std::str::FromStr>(raw: &str, message: &str) -> Result<T, String> {
    raw.trim().parse::<T>().map_err(|_| message.to_string())
}

// =============================================================================
// Product
// =============================================================================

/// Body of the product create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub compare_at_price: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub low_stock_threshold: String,
    #[serde(default)]
    pub size_name: String,
    #[serde(default)]
    pub size_display_name: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub paper_type: String,
    #[serde(default)]
    pub paper_weight: String,
    #[serde(default)]
    pub paper_color: String,
    #[serde(default)]
    pub page_count: String,
    #[serde(default)]
    pub cover_type: String,
    #[serde(default)]
    pub cover_material: String,
    #[serde(default)]
    pub cover_color: String,
    #[serde(default)]
    pub cover_finish: String,
    #[serde(default)]
    pub binding: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub is_featured: Option<String>,
    #[serde(default)]
    pub is_new_arrival: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
    /// Comma-separated.
    #[serde(default)]
    pub features: String,
    /// Comma-separated.
    #[serde(default)]
    pub tags: String,
}

impl Default for ProductFormData {
    /// A new A5 lined hardcover notebook.
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            short_description: String::new(),
            sku: String::new(),
            price: String::new(),
            compare_at_price: String::new(),
            product_type: "notebook".to_string(),
            category: String::new(),
            stock: String::new(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD.to_string(),
            size_name: "medium".to_string(),
            size_display_name: "A5".to_string(),
            width: "5.5".to_string(),
            height: "8.5".to_string(),
            paper_type: "lined".to_string(),
            paper_weight: "80".to_string(),
            paper_color: "white".to_string(),
            page_count: "100".to_string(),
            cover_type: "hardcover".to_string(),
            cover_material: String::new(),
            cover_color: String::new(),
            cover_finish: "matte".to_string(),
            binding: "perfect".to_string(),
            weight: String::new(),
            is_featured: None,
            is_new_arrival: None,
            is_active: tick(true),
            features: String::new(),
            tags: String::new(),
        }
    }
}

impl From<&Product> for ProductFormData {
    /// Prefill the edit form; attributes the product lacks keep the new-form
    /// defaults.
    fn from(product: &Product) -> Self {
        let defaults = Self::default();
        let size = product.size.as_ref();
        let dimensions = size.and_then(|s| s.dimensions.as_ref());
        let paper = product.paper.as_ref();
        let cover = product.cover.as_ref();

        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            short_description: product.short_description.clone().unwrap_or_default(),
            sku: product.sku.clone().unwrap_or_default(),
            price: product.price.to_string(),
            compare_at_price: product
                .compare_at_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
            product_type: product
                .product_type
                .clone()
                .unwrap_or(defaults.product_type),
            category: product
                .category
                .as_ref()
                .map(|c| c.id().to_string())
                .unwrap_or_default(),
            stock: product.stock.to_string(),
            low_stock_threshold: product.low_stock_threshold.to_string(),
            size_name: size
                .and_then(|s| s.name.as_ref())
                .map_or(defaults.size_name, |n| n.as_str().to_string()),
            size_display_name: size
                .and_then(|s| s.display_name.clone())
                .unwrap_or(defaults.size_display_name),
            width: dimensions
                .and_then(|d| d.width)
                .map_or(defaults.width, |w| w.to_string()),
            height: dimensions
                .and_then(|d| d.height)
                .map_or(defaults.height, |h| h.to_string()),
            paper_type: paper
                .and_then(|p| p.kind.as_ref())
                .map_or(defaults.paper_type, |k| k.as_str().to_string()),
            paper_weight: paper
                .and_then(|p| p.weight)
                .map_or(defaults.paper_weight, |w| w.to_string()),
            paper_color: paper
                .and_then(|p| p.color.clone())
                .unwrap_or(defaults.paper_color),
            page_count: paper
                .and_then(|p| p.page_count)
                .map_or(defaults.page_count, |c| c.to_string()),
            cover_type: cover
                .and_then(|c| c.kind.as_ref())
                .map_or(defaults.cover_type, |k| k.as_str().to_string()),
            cover_material: cover.and_then(|c| c.material.clone()).unwrap_or_default(),
            cover_color: cover.and_then(|c| c.color.clone()).unwrap_or_default(),
            cover_finish: cover
                .and_then(|c| c.finish.clone())
                .unwrap_or(defaults.cover_finish),
            binding: product
                .binding
                .as_ref()
                .map_or(defaults.binding, |b| b.as_str().to_string()),
            weight: product.weight.map(|w| w.to_string()).unwrap_or_default(),
            is_featured: tick(product.is_featured),
            is_new_arrival: tick(product.is_new_arrival),
            is_active: tick(product.is_active),
            features: product.features.join(", "),
            tags: product.tags.join(", "),
        }
    }
}

impl ProductFormData {
    #[must_use]
    pub fn featured(&self) -> bool {
        checked(self.is_featured.as_ref())
    }

    #[must_use]
    pub fn new_arrival(&self) -> bool {
        checked(self.is_new_arrival.as_ref())
    }

    #[must_use]
    pub fn active(&self) -> bool {
        checked(self.is_active.as_ref())
    }

    /// Validate the form and build the request body carrying `images`.
    ///
    /// # Errors
    ///
    /// Returns the message to show when a required field is blank or a
    /// number does not parse.
    pub fn into_input(&self, images: Vec<ProductImage>) -> Result<ProductInput, String> {
        let name = blank_to_none(&self.name).ok_or("Product name is required")?;
        let sku = blank_to_none(&self.sku).ok_or("SKU is required")?;
        let price = parse_amount(&self.price, "Enter a valid price")?;
        let compare_at_price =
            parse_optional_amount(&self.compare_at_price, "Enter a valid compare-at price")?;
        let category = blank_to_none(&self.category).ok_or("Select a category")?;
        let stock: i64 = parse_count(&self.stock, "Enter a valid stock quantity")?;
        if stock < 0 {
            return Err("Enter a valid stock quantity".to_string());
        }
        let low_stock_threshold = if self.low_stock_threshold.trim().is_empty() {
            DEFAULT_LOW_STOCK_THRESHOLD
        } else {
            parse_count(&self.low_stock_threshold, "Enter a valid low stock threshold")?
        };

        Ok(ProductInput {
            name,
            description: self.description.trim().to_string(),
            short_description: self.short_description.trim().to_string(),
            sku,
            price,
            compare_at_price,
            product_type: self.product_type.trim().to_string(),
            category: CategoryId::new(category),
            stock,
            low_stock_threshold,
            size: SizeInput {
                name: self.size_name.trim().to_string(),
                display_name: self.size_display_name.trim().to_string(),
                dimensions: DimensionsInput {
                    width: parse_amount(&self.width, "Enter a valid width")?,
                    height: parse_amount(&self.height, "Enter a valid height")?,
                },
            },
            paper: PaperInput {
                kind: self.paper_type.trim().to_string(),
                weight: parse_count(&self.paper_weight, "Enter a valid paper weight")?,
                color: self.paper_color.trim().to_string(),
                page_count: parse_count(&self.page_count, "Enter a valid page count")?,
            },
            cover: CoverInput {
                kind: self.cover_type.trim().to_string(),
                material: self.cover_material.trim().to_string(),
                color: self.cover_color.trim().to_string(),
                finish: self.cover_finish.trim().to_string(),
            },
            binding: self.binding.trim().to_string(),
            weight: parse_optional_amount(&self.weight, "Enter a valid weight")?,
            is_featured: self.featured(),
            is_new_arrival: self.new_arrival(),
            is_active: self.active(),
            features: split_list(&self.features),
            tags: split_list(&self.tags),
            images,
        })
    }
}

// =============================================================================
// Category
// =============================================================================

/// Body of the category create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub display_order: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl Default for CategoryFormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            image: String::new(),
            display_order: "0".to_string(),
            is_active: tick(true),
        }
    }
}

impl From<&Category> for CategoryFormData {
    fn from(category: &Category) -> Self {
        let form = CategoryForm::from(category);
        Self {
            name: form.name,
            description: form.description,
            image: form.image,
            display_order: form.display_order.to_string(),
            is_active: tick(form.is_active),
        }
    }
}

impl CategoryFormData {
    #[must_use]
    pub fn active(&self) -> bool {
        checked(self.is_active.as_ref())
    }

    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns the message to show for a blank name or a non-numeric order.
    pub fn to_form(&self) -> Result<CategoryForm, String> {
        let name = blank_to_none(&self.name).ok_or("Category name is required")?;
        let display_order = if self.display_order.trim().is_empty() {
            0
        } else {
            parse_count(&self.display_order, "Display order must be a number")?
        };

        Ok(CategoryForm {
            name,
            description: self.description.trim().to_string(),
            image: self.image.trim().to_string(),
            is_active: self.active(),
            display_order,
        })
    }
}

// =============================================================================
// Order status
// =============================================================================

/// Body of the order status form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub shipping_carrier: String,
    #[serde(default)]
    pub note: String,
}

impl StatusForm {
    /// Build the status update; blank optional fields are left out.
    ///
    /// # Errors
    ///
    /// Returns a message when the status is not one of the six order states.
    pub fn to_update(&self) -> Result<StatusUpdate, String> {
        let status: OrderStatus = self
            .status
            .trim()
            .parse()
            .map_err(|_| "Select a valid status".to_string())?;

        Ok(StatusUpdate {
            status,
            tracking_number: blank_to_none(&self.tracking_number),
            shipping_carrier: blank_to_none(&self.shipping_carrier),
            note: blank_to_none(&self.note),
        })
    }
}
