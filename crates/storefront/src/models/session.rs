//! Session-related types.
//!
//! The session holds only what is needed to rebuild a shopper's state
//! containers after a restart: the API token and a minimal identity. Cart,
//! catalog, and profile data always come from the store API.

use coloring_bliss_api::types::User;
use coloring_bliss_core::{UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub first_name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
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
    Info,
}

impl FlashKind {
    /// CSS modifier for the notice.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
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

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Bearer token issued by the store API.
    pub const API_TOKEN: &str = "api_token";

    /// [`super::CurrentUser`] of the signed-in shopper.
    pub const CURRENT_USER: &str = "current_user";

    /// Key of this browser session's state containers in the app cache.
    pub const STORE_KEY: &str = "store_key";

    /// Pending [`super::Flash`].
    pub const FLASH: &str = "flash";
}
