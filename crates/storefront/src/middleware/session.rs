//! Session middleware configuration.
//!
//! Sessions live in a bounded moka cache that drops each record once its
//! expiry passes; cookies are signed.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cb_session";

/// Session inactivity expiry (7 days).
const SESSION_EXPIRY_DAYS: i64 = 7;

/// Most sessions held at once; the least recently used go first.
pub const MAX_SESSIONS: u64 = 50_000;

/// Session store for the storefront.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer.
///
/// Apply the signing key from [`session_key`] with `.with_signed(..)`.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(SESSION_EXPIRY_DAYS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Cookie signing key derived from `STOREFRONT_SESSION_SECRET`.
#[must_use]
pub fn session_key(config: &StorefrontConfig) -> Key {
    let digest = Sha512::digest(config.session_secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use coloring_bliss_api::ApiConfig;
    use secrecy::SecretString;
    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn config(secret: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(secret),
            api: ApiConfig::parse("http://localhost:5000/api", 30).unwrap(),
            content_dir: PathBuf::from("content"),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_session_key_is_stable_per_secret() {
        let a = session_key(&config("k7#Qp2!vX9@mL4$wR8^tB1&zN6*cF3%h"));
        let b = session_key(&config("k7#Qp2!vX9@mL4$wR8^tB1&zN6*cF3%h"));
        let c = session_key(&config("Z1!yU8@oP3#iT6$rE2%wQ9^aS4&dF7*g"));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_store_keeps_live_sessions() {
        let store = session_store();
        let mut live = record(Duration::hours(1));
        store.create(&mut live).await.unwrap();

        let loaded = store.load(&live.id).await.unwrap();
        assert_eq!(loaded.map(|r| r.id), Some(live.id));
    }

    #[tokio::test]
    async fn test_store_drops_expired_sessions() {
        let store = session_store();
        let mut stale = record(Duration::hours(-1));
        store.create(&mut stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
    }
}
