//! Store API connection settings.
//!
//! The binaries read `API_BASE_URL` and `API_TIMEOUT_SECS` from their own
//! environment-backed configs and hand the raw values to [`ApiConfig::parse`].

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API location for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors validating the API connection settings.
#[derive(Debug, Error)]
pub enum ApiConfigError {
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("API base URL must use http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("API timeout must be at least one second")]
    ZeroTimeout,
}

/// Connection settings for the store API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, e.g. `https://api.example.ph/api`
    pub base_url: Url,
    /// Request timeout applied to every call
    pub timeout: Duration,
}

impl ApiConfig {
    /// Validate raw settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse, is not http(s), or the
    /// timeout is zero.
    pub fn parse(base_url: &str, timeout_secs: u64) -> Result<Self, ApiConfigError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiConfigError::UnsupportedScheme(
                base_url.scheme().to_string(),
            ));
        }
        if timeout_secs == 0 {
            return Err(ApiConfigError::ZeroTimeout);
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// The base URL as a string, without a trailing slash.
    #[must_use]
    pub fn base_url_str(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}
