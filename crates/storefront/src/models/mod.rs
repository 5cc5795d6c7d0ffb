//! Types kept in the cookie session.

pub mod session;

pub use session::{CurrentUser, Flash, FlashKind, keys};
