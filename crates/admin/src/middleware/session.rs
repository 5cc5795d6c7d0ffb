//! Session middleware configuration for admin.
//!
//! Sessions live in a bounded moka cache with expiring records. Cookies are
//! signed, with stricter settings than the
//! storefront (SameSite=Strict, 24hr expiry).

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "cb_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Most admin sessions held at once.
pub const MAX_SESSIONS: u64 = 1_000;

/// Create the session layer.
///
/// Apply the signing key from [`session_key`] with `.with_signed(..)`.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(MokaStore::new(Some(MAX_SESSIONS)))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

/// Cookie signing key derived from `ADMIN_SESSION_SECRET`.
#[must_use]
pub fn session_key(config: &AdminConfig) -> Key {
    let digest = Sha512::digest(config.session_secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}
