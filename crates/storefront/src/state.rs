//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use coloring_bliss_api::store::SessionStores;
use coloring_bliss_api::{ApiClient, ApiError};
use moka::future::Cache;

use crate::config::StorefrontConfig;
use crate::content::ContentStore;

/// Idle time after which a browser session's containers are dropped.
/// Matches the session cookie's inactivity expiry.
const SESSION_STORES_IDLE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Upper bound on concurrently cached browser sessions.
const SESSION_STORES_CAPACITY: u64 = 50_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// store API client, the loaded content pages, and each browser session's
/// state containers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    content: ContentStore,
    sessions: Cache<String, Arc<SessionStores>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, content: ContentStore) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let sessions = Cache::builder()
            .max_capacity(SESSION_STORES_CAPACITY)
            .time_to_idle(SESSION_STORES_IDLE)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                content,
                sessions,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The anonymous store API client. Use
    /// [`SessionStores::auth`]`.client()` for calls on behalf of a shopper.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the loaded content pages.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// The containers for `key`, created empty on first use.
    pub async fn session_stores(&self, key: &str) -> Arc<SessionStores> {
        self.inner
            .sessions
            .get_with(key.to_string(), async { Arc::new(SessionStores::new()) })
            .await
    }

    /// Drop the containers for `key` (logout).
    pub async fn forget_session(&self, key: &str) {
        self.inner.sessions.invalidate(key).await;
    }
}
