//! Endpoint methods on [`crate::ApiClient`], one module per resource.

mod auth;
mod cart;
mod categories;
mod orders;
mod payments;
mod products;
mod uploads;

pub use orders::OrderListQuery;
pub use products::{ProductQuery, SORT_OPTIONS};
pub use uploads::{ImageFile, upload_file_name};
