//! Wire types for the store API.
//!
//! Every response is decoded into an explicit struct. Optional fields carry
//! `#[serde(default)]`; required fields that are missing fail the decode and
//! surface as [`crate::ApiError::Decode`].

pub mod cart;
pub mod category;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

use serde::{Deserialize, Serialize};

pub use cart::{Cart, CartEnvelope, CartItem, CartProduct};
pub use category::{Category, CategoryEnvelope, CategoryForm, CategoryList};
pub use order::{
    Order, OrderCustomer, OrderEnvelope, OrderItem, OrderList, OrderPage, OrderStats,
    ShippingAddress, StatusChange, StatusUpdate, UserRef,
};
pub use payment::{CheckoutSession, PaymentVerification, PlacedOrder, ShippingDetails};
pub use product::{
    CategoryRef, CategorySummary, ColorOption, CoverSpec, Dimensions, PaperSpec, PriceRange,
    CoverInput, DimensionsInput, PaperInput, Product, ProductDetail, ProductEnvelope,
    ProductFilters, ProductImage, ProductInput, ProductList, ProductPage, ProductRef, Review,
    ReviewAuthor, SelectedColor, SizeInput, SizeSpec,
};
pub use user::{
    Address, AddressInput, AuthSession, Credentials, PasswordChange, ProfileUpdate,
    Registration, User, UserEnvelope, Wishlist,
};

/// Paging block returned alongside list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            total: 0,
            pages: 0,
        }
    }
}

impl Pagination {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// Upload response: public URLs of the stored files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadedImages {
    #[serde(default)]
    pub urls: Vec<String>,
}
