//! Coloring Bliss store API client.
//!
//! Every product, category, cart, order, and account record lives behind the
//! remote REST API. This crate is the only place that talks to it.
//!
//! # Architecture
//!
//! - [`ApiClient`] - one pooled `reqwest` client per process; a cheap
//!   token-bearing handle per browser session
//! - [`types`] - exhaustive wire types for every endpoint response
//! - [`store`] - per-session state containers (cart, catalog, auth) that
//!   cache the last server response and replace it wholesale on success
//! - [`gate`] - the session/role check in front of account and admin views
//! - [`checkout`] - shipping validation and the cash-on-delivery vs hosted
//!   checkout branch
//!
//! # Example
//!
//! ```rust,ignore
//! use coloring_bliss_api::{ApiClient, ApiConfig, store::CartStore};
//!
//! let client = ApiClient::new(&ApiConfig::parse("http://localhost:5000/api", 30)?)?;
//! let cart = CartStore::new();
//! cart.add_item(&client.with_token(token), &product_id, 2, None).await?;
//! println!("{} items", cart.snapshot().item_count);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
mod client;
pub mod config;
mod endpoints;
pub mod error;
pub mod gate;
pub mod store;
pub mod types;

pub use client::ApiClient;
pub use config::{ApiConfig, ApiConfigError};
pub use endpoints::{ImageFile, OrderListQuery, ProductQuery, SORT_OPTIONS, upload_file_name};
pub use error::ApiError;
