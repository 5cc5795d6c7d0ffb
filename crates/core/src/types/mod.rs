//! Core types for TheColoringBliss.
//!
//! This module provides type-safe wrappers for common domain concepts.

#[macro_use]
mod label;

pub mod attributes;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use attributes::{Binding, CoverType, PaperType, ProductSize};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
