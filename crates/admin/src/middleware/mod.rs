//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Security headers
//! 4. Session layer (in-memory store, signed cookie, `SameSite=Strict`)
//!
//! Handlers reach the session through [`Console`] and [`RequireAdmin`].

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{ACCESS_DENIED, Console, RequireAdmin};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_key};
