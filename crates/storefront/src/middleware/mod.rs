//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Security headers (CSP, frame and sniffing protection)
//! 4. Session layer (tower-sessions, in-memory store, signed cookie)
//!
//! Per-request session state is exposed to handlers through the
//! [`Shopper`] and [`RequireSession`] extractors.

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{RequireSession, Shopper};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_key};
