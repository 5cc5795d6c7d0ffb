//! Authentication middleware and extractors for admin.
//!
//! [`Console`] exposes the cookie session and a store API client carrying
//! the admin's token. [`RequireAdmin`] runs the route gate on every request
//! and sends anyone without the admin role to `/login`.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::gate::{self, Access, Requirement};
use coloring_bliss_api::types::AuthSession;
use coloring_bliss_api::{ApiClient, ApiError};
use secrecy::SecretString;
use tower_sessions::Session;
use tracing::warn;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{CurrentAdmin, Flash, ImageDraft, keys};
use crate::state::AppState;

/// Shown when a signed-in account lacks the admin role.
pub const ACCESS_DENIED: &str = "Access denied. Admin privileges required.";

/// The cookie session behind a console request.
pub struct Console {
    session: Session,
    admin: Option<CurrentAdmin>,
    client: ApiClient,
    store_url: String,
}

impl FromRequestParts<AppState> for Console {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let admin = session.get::<CurrentAdmin>(keys::CURRENT_ADMIN).await?;
        let token = session.get::<String>(keys::API_TOKEN).await?;
        let client = match (&admin, token) {
            (Some(_), Some(token)) => state.api().with_token(SecretString::from(token)),
            _ => state.api().anonymous(),
        };

        Ok(Self {
            session,
            admin,
            client,
            store_url: state.config().storefront_url.clone(),
        })
    }
}

impl Console {
    /// Client carrying the admin's token (anonymous when signed out).
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn admin(&self) -> Option<&CurrentAdmin> {
        self.admin.as_ref()
    }

    /// Storefront linked from the sidebar.
    #[must_use]
    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    /// Queue a notice for the next rendered page.
    pub async fn flash(&self, flash: Flash) {
        if let Err(e) = self.session.insert(keys::FLASH, flash).await {
            warn!(error = %e, "Failed to store flash message");
        }
    }

    /// Take the pending notice, if any.
    pub async fn take_flash(&self) -> Option<Flash> {
        self.session
            .remove::<Flash>(keys::FLASH)
            .await
            .ok()
            .flatten()
    }

    /// Image list of the open product form, if one was started.
    pub async fn image_draft(&self) -> Option<ImageDraft> {
        self.session
            .get::<ImageDraft>(keys::IMAGE_DRAFT)
            .await
            .ok()
            .flatten()
    }

    /// Replace the open product form's image list.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn save_image_draft(&self, draft: &ImageDraft) -> Result<(), AppError> {
        self.session.insert(keys::IMAGE_DRAFT, draft).await?;
        Ok(())
    }

    pub async fn clear_image_draft(&self) {
        if let Err(e) = self.session.remove_value(keys::IMAGE_DRAFT).await {
            warn!(error = %e, "Failed to clear image draft");
        }
    }

    /// Store the token and identity from a successful login.
    ///
    /// Rotates the session id so a pre-login cookie cannot be replayed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn sign_in(&self, auth: &AuthSession) -> Result<CurrentAdmin, AppError> {
        let admin = CurrentAdmin::from(&auth.user);

        self.session.cycle_id().await?;
        self.session.insert(keys::API_TOKEN, &auth.token).await?;
        self.session.insert(keys::CURRENT_ADMIN, &admin).await?;
        set_sentry_user(&admin.id, &admin.email);
        Ok(admin)
    }

    /// Drop the token and identity.
    pub async fn sign_out(&self) {
        for key in [keys::API_TOKEN, keys::CURRENT_ADMIN, keys::IMAGE_DRAFT] {
            if let Err(e) = self.session.remove_value(key).await {
                warn!(error = %e, key, "Failed to clear session key");
            }
        }
        if let Err(e) = self.session.cycle_id().await {
            warn!(error = %e, "Failed to rotate session id");
        }
        clear_sentry_user();
    }

    /// Respond to a failed store API call from a form post.
    ///
    /// A 401 signs the admin out. Anything else becomes an error notice on
    /// `back`.
    pub async fn fail(&self, err: &ApiError, fallback: &str, back: &str) -> Response {
        if err.is_auth() {
            return self.expire(back).await;
        }
        warn!(error = %err, "{fallback}");
        self.flash(Flash::error(err.user_message(fallback))).await;
        Redirect::to(back).into_response()
    }

    /// Handle a rejected token: sign out and redirect to login.
    pub async fn expire(&self, back: &str) -> Response {
        warn!("Store API rejected admin token, signing out");
        self.sign_out().await;
        self.flash(Flash::error("Your session has expired. Please log in again."))
            .await;
        Redirect::to(&gate::login_url(back)).into_response()
    }
}

/// Extractor that requires a signed-in admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireAdmin(console, admin): RequireAdmin) -> impl IntoResponse {
///     format!("Orders for {}", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub Console, pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let console = Console::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let path = parts.uri.path_and_query().map_or("/", |p| p.as_str());

        match gate::check(console.admin().map(|a| a.role), Requirement::Admin, path) {
            Access::Granted => match console.admin.clone() {
                Some(admin) => Ok(Self(console, admin)),
                None => Err(Redirect::to(&gate::login_url(path)).into_response()),
            },
            Access::RedirectToLogin { redirect } => {
                Err(Redirect::to(&gate::login_url(&redirect)).into_response())
            }
            Access::RedirectHome => {
                console.sign_out().await;
                console.flash(Flash::error(ACCESS_DENIED)).await;
                Err(Redirect::to("/login").into_response())
            }
        }
    }
}
