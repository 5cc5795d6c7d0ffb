//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Handlers that cannot recover in-page return
//! `Result<T, AppError>`; most store API failures are turned into flash
//! notices by the handlers themselves and never reach this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::ApiError;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store API call failed.
    #[error("Store API error: {0}")]
    Api(#[from] ApiError),

    /// Cookie session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Api(err) => matches!(
                err,
                ApiError::Network(_) | ApiError::Server { .. } | ApiError::Decode(_)
            ),
            Self::Session(_) | Self::Internal(_) => true,
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, message) = match &self {
            Self::Api(ApiError::Auth(_)) => return Redirect::to("/login").into_response(),
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Page not found".to_string())
            }
            Self::Api(ApiError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                msg.clone().unwrap_or_else(|| "Bad request".to_string()),
            ),
            Self::Api(_) => (
                StatusCode::BAD_GATEWAY,
                "The store is unavailable right now. Please try again.".to_string(),
            ),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            // Don't expose internal error details to clients
            Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after sign-in.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a shopper action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "66f1c0ffee")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("dotted-a5".to_string());
        assert_eq!(err.to_string(), "Not found: dotted-a5");

        let err = AppError::BadRequest("missing order id".to_string());
        assert_eq!(err.to_string(), "Bad request: missing order id");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status(AppError::NotFound("x".to_string())), StatusCode::NOT_FOUND);
        assert_eq!(status(AppError::BadRequest("x".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(AppError::Api(ApiError::NotFound(None))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(AppError::Api(ApiError::Server {
                status: 500,
                message: None
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(AppError::Api(ApiError::Decode("bad".to_string()))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_api_auth_error_redirects_to_login() {
        let response = AppError::Api(ApiError::Auth(None)).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }
}
