//! Authentication middleware and extractors.
//!
//! [`Shopper`] binds a request to its browser session's state containers.
//! [`RequireSession`] additionally runs the route gate and sends signed-out
//! visitors to `/login?redirect=<path>`.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::gate::{self, Access, Requirement};
use coloring_bliss_api::store::{Outcome, SessionStores};
use coloring_bliss_api::{ApiClient, ApiError};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;
use tracing::warn;
use uuid::Uuid;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{CurrentUser, Flash, keys};
use crate::state::AppState;

/// The browser session behind a request.
///
/// Extracting it never fails for a visitor without a session: a fresh
/// store key is issued and empty containers are created. If the process was
/// restarted, containers are rebuilt from the token kept in the cookie
/// session.
pub struct Shopper {
    session: Session,
    stores: Arc<SessionStores>,
    store_key: String,
    user: Option<CurrentUser>,
    client: ApiClient,
}

impl FromRequestParts<AppState> for Shopper {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let store_key = match session.get::<String>(keys::STORE_KEY).await? {
            Some(key) => key,
            None => {
                let key = Uuid::new_v4().to_string();
                session.insert(keys::STORE_KEY, &key).await?;
                key
            }
        };
        let stores = state.session_stores(&store_key).await;

        let user = session.get::<CurrentUser>(keys::CURRENT_USER).await?;
        if user.is_some() && !stores.auth.is_authenticated() {
            if let Some(token) = session.get::<String>(keys::API_TOKEN).await? {
                stores.auth.restore(SecretString::from(token), None);
            }
        }
        let client = stores.auth.client(state.api());

        Ok(Self {
            session,
            stores,
            store_key,
            user,
            client,
        })
    }
}

impl Shopper {
    /// Client carrying this shopper's token (anonymous when signed out).
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn stores(&self) -> &SessionStores {
        &self.stores
    }

    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
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

    /// Persist the token and identity the auth container now holds.
    ///
    /// Rotates the session id so a pre-login cookie cannot be replayed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn sign_in(&self) -> Result<(), AppError> {
        let (Some(token), Some(user)) = (self.stores.auth.token(), self.stores.auth.user()) else {
            return Err(AppError::Internal("sign-in without token".to_string()));
        };
        let current = CurrentUser::from(&user);

        self.session.cycle_id().await?;
        self.session
            .insert(keys::API_TOKEN, token.expose_secret())
            .await?;
        self.session.insert(keys::CURRENT_USER, &current).await?;
        set_sentry_user(&current.id, Some(&current.email));
        Ok(())
    }

    /// Re-save the identity after the profile changed.
    pub async fn refresh_identity(&self) {
        if let Some(user) = self.stores.auth.user() {
            if let Err(e) = self
                .session
                .insert(keys::CURRENT_USER, CurrentUser::from(&user))
                .await
            {
                warn!(error = %e, "Failed to update session identity");
            }
        }
    }

    /// Drop the token, identity, and every cached container.
    pub async fn sign_out(&self, state: &AppState) {
        self.stores.reset();
        state.forget_session(&self.store_key).await;
        for key in [keys::API_TOKEN, keys::CURRENT_USER, keys::STORE_KEY] {
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
    /// A 401 signs the shopper out and sends them to login, coming back to
    /// `back` afterwards. Anything else becomes an error notice shown on
    /// `back`.
    pub async fn fail(
        &self,
        state: &AppState,
        err: &ApiError,
        fallback: &str,
        back: &str,
    ) -> Response {
        if err.is_auth() {
            return self.expire(state, back).await;
        }
        self.flash(Flash::error(err.user_message(fallback))).await;
        Redirect::to(back).into_response()
    }

    /// Redirect the result of a container transition back to `back`.
    ///
    /// An applied transition flashes `success`. A superseded one was
    /// overtaken by a newer request from the same browser and says nothing.
    pub async fn settle(
        &self,
        state: &AppState,
        result: Result<Outcome, ApiError>,
        fallback: &str,
        success: Option<String>,
        back: &str,
    ) -> Response {
        match result {
            Ok(Outcome::Applied) => {
                if let Some(message) = success {
                    self.flash(Flash::success(message)).await;
                }
                Redirect::to(back).into_response()
            }
            Ok(Outcome::Superseded) => Redirect::to(back).into_response(),
            Err(err) => self.fail(state, &err, fallback, back).await,
        }
    }

    /// Send a signed-out visitor to login, returning to `back` afterwards.
    pub async fn login_first(&self, message: &str, back: &str) -> Response {
        self.flash(Flash::error(message)).await;
        Redirect::to(&gate::login_url(back)).into_response()
    }

    /// Handle a rejected token: sign out and redirect to login.
    pub async fn expire(&self, state: &AppState, back: &str) -> Response {
        warn!("Store API rejected session token, signing out");
        self.sign_out(state).await;
        self.flash(Flash::info("Your session has expired. Please log in again."))
            .await;
        Redirect::to(&gate::login_url(back)).into_response()
    }
}

/// Extractor that requires a signed-in shopper.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireSession(shopper, user): RequireSession) -> impl IntoResponse {
///     format!("Orders for {}", user.email)
/// }
/// ```
pub struct RequireSession(pub Shopper, pub CurrentUser);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let shopper = Shopper::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let path = parts.uri.path_and_query().map_or("/", |p| p.as_str());

        match gate::check(shopper.user().map(|u| u.role), Requirement::Session, path) {
            Access::Granted => match shopper.user.clone() {
                Some(user) => Ok(Self(shopper, user)),
                None => Err(Redirect::to(&gate::login_url(path)).into_response()),
            },
            Access::RedirectToLogin { redirect } => {
                Err(Redirect::to(&gate::login_url(&redirect)).into_response())
            }
            Access::RedirectHome => Err(Redirect::to("/").into_response()),
        }
    }
}
