//! Unified error handling for admin.
//!
//! Most store API failures are shown as flash notices by the handlers. What
//! reaches [`AppError`] is a page that cannot render at all.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::ApiError;
use thiserror::Error;

/// Application-level error type for the admin console.
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

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Api(ApiError::Network(_) | ApiError::Server { .. } | ApiError::Decode(_))
                | Self::Session(_)
                | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let (status, message) = match &self {
            Self::Api(ApiError::Auth(_)) => return Redirect::to("/login").into_response(),
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            Self::Api(ApiError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                msg.clone().unwrap_or_else(|| "Bad request".to_string()),
            ),
            Self::Api(_) => (
                StatusCode::BAD_GATEWAY,
                "Store API unavailable".to_string(),
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

/// Tag Sentry events with the signed-in admin.
pub fn set_sentry_user(admin_id: &impl ToString, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: Some(email.to_string()),
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

/// Record a catalog or order change as a Sentry breadcrumb.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_app_error_status_codes() {
        let status = |err: AppError| err.into_response().status();

        assert_eq!(status(AppError::NotFound("order".to_string())), StatusCode::NOT_FOUND);
        assert_eq!(status(AppError::BadRequest("id".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AppError::Api(ApiError::Validation(Some("SKU taken".to_string())))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AppError::Api(ApiError::Server {
                status: 503,
                message: None
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejected_token_redirects_to_login() {
        let response = AppError::Api(ApiError::Auth(None)).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }
}
