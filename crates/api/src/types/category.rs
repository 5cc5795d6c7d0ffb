//! Category wire types.

use coloring_bliss_core::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub product_count: Option<u32>,
}

const fn default_active() -> bool {
    true
}

/// `GET /categories` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Single-category payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryEnvelope {
    pub category: Category,
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
    pub image: String,
    pub is_active: bool,
    pub display_order: i32,
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            image: category.image.clone().unwrap_or_default(),
            is_active: category.is_active,
            display_order: category.display_order,
        }
    }
}
