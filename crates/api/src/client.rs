//! HTTP transport for the store API.
//!
//! Uses `reqwest` 0.13 with one connection pool per process. Every response
//! is wrapped in the `{ success, message?, data? }` envelope; [`ApiClient`]
//! unwraps it and maps failures onto [`ApiError`].

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Longest response excerpt written to logs.
const LOG_BODY_CHARS: usize = 500;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the store API.
///
/// Cloning is cheap: clones share the connection pool. A clone carrying a
/// session token is made per request with [`ApiClient::with_token`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<Arc<SecretString>>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

const fn default_success() -> bool {
    true
}

/// Error body of non-success responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("coloring-bliss/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
            token: None,
        })
    }

    /// A handle that sends `Authorization: Bearer <token>` on every request.
    #[must_use]
    pub fn with_token(&self, token: SecretString) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: Some(Arc::new(token)),
        }
    }

    /// A handle without credentials, sharing the connection pool.
    #[must_use]
    pub fn anonymous(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: None,
        }
    }

    /// Whether this handle carries a session token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The configured base URL (ends in `/api`), without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str().trim_end_matches('/')
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Same as [`Self::endpoint`] with a query string.
    pub(crate) fn endpoint_with_query(&self, segments: &[&str], pairs: &[(String, String)]) -> Url {
        let mut url = self.endpoint(segments);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, url)).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, url).json(body)).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::PUT, url).json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, url)).await
    }

    /// Bodiless call whose `data` is irrelevant.
    pub(crate) async fn send_unit(&self, method: Method, url: Url) -> Result<(), ApiError> {
        self.finish_unit(self.request(method, url)).await
    }

    /// JSON call whose `data` is irrelevant.
    pub(crate) async fn send_unit_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<(), ApiError> {
        self.finish_unit(self.request(method, url).json(body)).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, url).multipart(form))
            .await
    }

    // =========================================================================
    // Response handling
    // =========================================================================

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let text = self.execute(request).await?;
        let envelope: Envelope<T> = decode(&text)?;
        check_success(envelope.success, envelope.message)?;
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
    }

    async fn finish_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let text = self.execute(request).await?;
        if text.trim().is_empty() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> = decode(&text)?;
        check_success(envelope.success, envelope.message)
    }

    /// Send the request and return the body of a successful response.
    #[instrument(
        skip(self, request),
        fields(method = tracing::field::Empty, path = tracing::field::Empty)
    )]
    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let (client, request) = request.build_split();
        let request = request?;
        let span = tracing::Span::current();
        span.record("method", request.method().as_str());
        span.record("path", request.url().path());

        let response = client.execute(request).await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let text = response.text().await?;

        if status.is_success() {
            debug!(status = %status, "API call succeeded");
            return Ok(text);
        }

        let message = serde_json::from_str::<ErrorBody>(&text)
            .unwrap_or_default()
            .message;
        log_failure(status, &text);
        Err(ApiError::from_status(status, message))
    }
}

fn log_failure(status: StatusCode, body: &str) {
    let excerpt = body.chars().take(LOG_BODY_CHARS).collect::<String>();
    if status.is_server_error() {
        tracing::error!(status = %status, body = %excerpt, "Store API returned server error");
    } else {
        tracing::warn!(status = %status, body = %excerpt, "Store API rejected request");
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<Envelope<T>, ApiError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(LOG_BODY_CHARS).collect::<String>(),
            "Failed to parse store API response"
        );
        ApiError::Decode(e.to_string())
    })
}

fn check_success(success: bool, message: Option<String>) -> Result<(), ApiError> {
    if success {
        Ok(())
    } else {
        Err(ApiError::Validation(message))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig::parse("https://api.example.ph/api", 5).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let url = client().endpoint(&["products", "dotted-a5"]);
        assert_eq!(url.as_str(), "https://api.example.ph/api/products/dotted-a5");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = client().endpoint(&["products", "a b/c"]);
        assert_eq!(url.as_str(), "https://api.example.ph/api/products/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_with_query() {
        let url = client().endpoint_with_query(
            &["orders"],
            &[("status".to_string(), "shipped".to_string())],
        );
        assert_eq!(url.as_str(), "https://api.example.ph/api/orders?status=shipped");

        let bare = client().endpoint_with_query(&["orders"], &[]);
        assert_eq!(bare.as_str(), "https://api.example.ph/api/orders");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = client().with_token(SecretString::from("tok_live_123"));
        let debug = format!("{client:?}");
        assert!(!debug.contains("tok_live_123"));
        assert!(debug.contains("[REDACTED]"));
        assert!(client.is_authenticated());
        assert!(!client.anonymous().is_authenticated());
    }

    #[test]
    fn test_success_false_is_validation() {
        let envelope: Envelope<serde_json::Value> =
            decode(r#"{"success":false,"message":"Coupon expired"}"#).unwrap();
        let err = check_success(envelope.success, envelope.message).unwrap_err();
        assert_eq!(err.user_message("Invalid coupon code"), "Coupon expired");
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        assert!(matches!(
            decode::<serde_json::Value>("<html>Bad Gateway</html>"),
            Err(ApiError::Decode(_))
        ));
    }
}
