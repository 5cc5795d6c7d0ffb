//! Store API error taxonomy.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the store API.
///
/// Server-supplied messages are kept where the server is the right voice for
/// the problem (bad input, missing record, expired session). Network, server,
/// and decode failures are opaque to shoppers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not complete (connection refused, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP 401: the session token is missing, invalid, or expired.
    #[error("not authenticated{}", suffix(.0.as_deref()))]
    Auth(Option<String>),

    /// HTTP 400/422 or another 4xx rejection, or input rejected locally
    /// before any request was sent.
    #[error("rejected{}", suffix(.0.as_deref()))]
    Validation(Option<String>),

    /// HTTP 404: the product, order, or other record does not exist.
    #[error("not found{}", suffix(.0.as_deref()))]
    NotFound(Option<String>),

    /// HTTP 5xx or any other unexpected status.
    #[error("server error (HTTP {status})")]
    Server {
        /// Status code returned by the API.
        status: u16,
        /// Message from the error body, kept for logs only.
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

fn suffix(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!(": {m}"))
}

impl ApiError {
    /// Map a non-success HTTP status and the optional `message` from the
    /// error body to an error kind.
    #[must_use]
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Auth(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            s if s.is_client_error() => Self::Validation(message),
            s => Self::Server {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Input rejected before a request was made.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(Some(message.into()))
    }

    /// Whether the caller should treat the session as logged out.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Whether the requested record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status returned by the API, if one was received.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Auth(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Server { status, .. } => Some(*status),
            Self::Validation(_) | Self::Decode(_) => None,
        }
    }

    /// Message suitable for showing to a shopper or admin.
    ///
    /// Uses the server's wording when it has one for this kind of failure,
    /// otherwise `fallback` (e.g. "Failed to add to cart").
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Auth(Some(m)) | Self::Validation(Some(m)) | Self::NotFound(Some(m))
                if !m.trim().is_empty() =>
            {
                m.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_taxonomy() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, None),
            ApiError::Auth(None)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, None),
            ApiError::Validation(None)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, None),
            ApiError::Validation(None)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, None),
            ApiError::NotFound(None)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, None),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_user_message_surfaces_validation_verbatim() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            Some("Only 3 items left in stock".to_string()),
        );
        assert_eq!(
            err.user_message("Failed to add to cart"),
            "Only 3 items left in stock"
        );
    }

    #[test]
    fn test_user_message_hides_server_details() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("MongoServerError: E11000".to_string()),
        );
        assert_eq!(err.user_message("Failed to get cart"), "Failed to get cart");
        assert_eq!(
            ApiError::Decode("missing field".to_string()).user_message("Failed to get cart"),
            "Failed to get cart"
        );
    }

    #[test]
    fn test_blank_server_message_uses_fallback() {
        let err = ApiError::Validation(Some("  ".to_string()));
        assert_eq!(err.user_message("Invalid coupon code"), "Invalid coupon code");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::invalid("Quantity must be at least 1").to_string(),
            "rejected: Quantity must be at least 1"
        );
        assert_eq!(ApiError::Auth(None).to_string(), "not authenticated");
    }
}
