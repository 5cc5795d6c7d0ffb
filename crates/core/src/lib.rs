//! Coloring Bliss Core - Shared types library.
//!
//! This crate provides common types used across all TheColoringBliss components:
//! - `api` - Remote store API client and per-session state containers
//! - `storefront` - Public-facing notebook and stationery shop
//! - `admin` - Back-office console for products, categories, and orders
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, statuses, and product attributes
//! - [`format`] - Display helpers for prices, dates, and product cards

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod types;

pub use types::*;
