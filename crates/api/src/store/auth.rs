//! Auth container: session token and signed-in account.

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

use coloring_bliss_core::Email;

use super::{Outcome, RequestSequence, Tracked, reject, transition};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{AuthSession, Credentials, PasswordChange, ProfileUpdate, Registration, User};

/// Shortest password the store accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Cached authentication state for one session.
#[derive(Debug, Default)]
pub struct AuthState {
    pub token: Option<SecretString>,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    fn sign_in(&mut self, session: AuthSession) {
        self.token = Some(SecretString::from(session.token));
        self.user = Some(session.user);
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl Tracked for AuthState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Auth container.
#[derive(Debug, Default)]
pub struct AuthStore {
    state: RwLock<AuthState>,
    sequence: RequestSequence,
}

fn check_new_password(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if password != confirmation {
        return Err("Passwords do not match");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

impl AuthStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a session from a persisted token and identity.
    pub fn restore(&self, token: SecretString, user: Option<User>) {
        let mut state = self.state.write();
        state.token = Some(token);
        if user.is_some() {
            state.user = user;
        }
    }

    /// A client handle carrying this session's token, or an anonymous one.
    #[must_use]
    pub fn client(&self, base: &ApiClient) -> ApiClient {
        match &self.state.read().token {
            Some(token) => base.with_token(SecretString::from(token.expose_secret().to_owned())),
            None => base.anonymous(),
        }
    }

    /// The session token, for persisting into the cookie session.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.state
            .read()
            .token
            .as_ref()
            .map(|token| SecretString::from(token.expose_secret().to_owned()))
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn take_error(&self) -> Option<String> {
        self.state.write().error.take()
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// Rejects a malformed email or blank password without a request;
    /// otherwise returns the API error after recording its message.
    pub async fn login(
        &self,
        client: &ApiClient,
        credentials: &Credentials,
    ) -> Result<Outcome, ApiError> {
        if let Err(e) = Email::parse(&credentials.email) {
            return Err(reject(&self.state, &e.to_string()));
        }
        if credentials.password.is_empty() {
            return Err(reject(&self.state, "Password is required"));
        }
        transition(
            &self.state,
            &self.sequence,
            "auth",
            "Login failed",
            client.anonymous().login(credentials),
            AuthState::sign_in,
        )
        .await
    }

    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// Rejects mismatched or short passwords without a request; otherwise
    /// returns the API error after recording its message.
    pub async fn register(
        &self,
        client: &ApiClient,
        registration: &Registration,
    ) -> Result<Outcome, ApiError> {
        if let Err(e) = Email::parse(&registration.email) {
            return Err(reject(&self.state, &e.to_string()));
        }
        if let Err(message) =
            check_new_password(&registration.password, &registration.confirm_password)
        {
            return Err(reject(&self.state, message));
        }
        transition(
            &self.state,
            &self.sequence,
            "auth",
            "Registration failed",
            client.anonymous().register(registration),
            AuthState::sign_in,
        )
        .await
    }

    /// `GET /auth/me`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn refresh(&self, client: &ApiClient) -> Result<Outcome, ApiError> {
        let client = self.client(client);
        transition(
            &self.state,
            &self.sequence,
            "auth",
            "Failed to get user",
            client.me(),
            |state, user| state.user = Some(user),
        )
        .await
    }

    /// `PUT /auth/me`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn update_profile(
        &self,
        client: &ApiClient,
        profile: &ProfileUpdate,
    ) -> Result<Outcome, ApiError> {
        let client = self.client(client);
        transition(
            &self.state,
            &self.sequence,
            "auth",
            "Failed to update profile",
            client.update_profile(profile),
            |state, user| state.user = Some(user),
        )
        .await
    }

    /// `PUT /auth/password`
    ///
    /// # Errors
    ///
    /// Rejects mismatched or short passwords without a request; otherwise
    /// returns the API error after recording its message.
    pub async fn change_password(
        &self,
        client: &ApiClient,
        change: &PasswordChange,
    ) -> Result<Outcome, ApiError> {
        if let Err(message) = check_new_password(&change.new_password, &change.confirm_password) {
            return Err(reject(&self.state, message));
        }
        let client = self.client(client);
        transition(
            &self.state,
            &self.sequence,
            "auth",
            "Failed to change password",
            client.change_password(change),
            |_, ()| {},
        )
        .await
    }

    /// Replace the cached account with one returned by another call (address
    /// or wishlist changes).
    pub fn set_user(&self, user: User) {
        self.state.write().user = Some(user);
    }

    /// Forget the token and account locally.
    pub fn logout(&self) {
        self.sequence.cancel_pending();
        *self.state.write() = AuthState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert_eq!(check_new_password("secret", "secret"), Ok(()));
        assert_eq!(
            check_new_password("secret", "secreT"),
            Err("Passwords do not match")
        );
        assert_eq!(
            check_new_password("abc", "abc"),
            Err("Password must be at least 6 characters")
        );
    }
}
