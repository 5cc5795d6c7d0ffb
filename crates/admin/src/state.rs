//! Application state shared across handlers.

use std::sync::Arc;

use coloring_bliss_api::{ApiClient, ApiError};

use crate::config::AdminConfig;

/// Shared admin state.
///
/// The console keeps no catalog or order data of its own: every page reads
/// the store API through the signed-in admin's token.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The anonymous store API client; tokens are attached per request.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
