//! Session-related types for admin authentication.
//!
//! The session keeps the store API token, who it belongs to, and the image
//! list of an open product form. Catalog and order data is always fetched
//! fresh.

use coloring_bliss_api::types::User;
use coloring_bliss_core::{UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Account ID on the store API.
    pub id: UserId,
    /// Display name.
    pub name: String,
    pub email: String,
    /// Role at sign-in; re-checked by the gate on every request.
    pub role: UserRole,
}

impl From<&User> for CurrentAdmin {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.full_name(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Tone of a one-shot notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier for the notice.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Notice shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Bearer token issued by the store API.
    pub const API_TOKEN: &str = "api_token";

    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Pending [`super::Flash`].
    pub const FLASH: &str = "flash";

    /// [`crate::models::ImageDraft`] of the open product form.
    pub const IMAGE_DRAFT: &str = "image_draft";
}
