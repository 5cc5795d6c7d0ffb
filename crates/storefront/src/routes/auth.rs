//! Authentication route handlers.
//!
//! Login and registration go through the session's auth container; the
//! token it receives is kept in the cookie session so the containers can be
//! rebuilt after a restart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::gate;
use coloring_bliss_api::store::Outcome;
use coloring_bliss_api::types::{Credentials, Registration};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::Shopper;
use crate::models::Flash;
use crate::state::AppState;
use crate::views::Layout;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub redirect: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// `?redirect=` on the login page.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub redirect: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(shopper: Shopper, Query(query): Query<RedirectQuery>) -> Response {
    let redirect = gate::safe_redirect(query.redirect.as_deref()).to_string();
    if shopper.is_signed_in() {
        return Redirect::to(&redirect).into_response();
    }

    LoginTemplate {
        layout: Layout::for_shopper(&shopper).await,
        email: String::new(),
        redirect,
    }
    .into_response()
}

/// Finish a successful login or registration: persist the session and
/// load the cart for the header count.
async fn establish(shopper: &Shopper, welcome: &str, redirect: &str) -> Response {
    if let Err(e) = shopper.sign_in().await {
        return e.into_response();
    }

    let client = shopper.stores().auth.client(shopper.client());
    if let Err(e) = shopper.stores().cart.load(&client).await {
        warn!(error = %e, "Failed to load cart after sign in");
    }
    shopper.stores().cart.take_error();

    shopper.flash(Flash::success(welcome)).await;
    Redirect::to(redirect).into_response()
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(shopper: Shopper, Form(form): Form<LoginForm>) -> Response {
    let redirect = gate::safe_redirect(Some(&form.redirect)).to_string();
    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let auth = &shopper.stores().auth;
    let result = auth.login(shopper.client(), &credentials).await;
    auth.take_error();

    match result {
        Ok(Outcome::Applied) => {
            info!("Shopper signed in");
            add_breadcrumb("auth", "Login successful", None);
            establish(&shopper, "Welcome back! 👋", &redirect).await
        }
        Ok(Outcome::Superseded) => Redirect::to(&gate::login_url(&redirect)).into_response(),
        Err(e) => {
            add_breadcrumb("auth", "Login failed", None);
            let layout = Layout {
                flash: Some(Flash::error(e.user_message("Login failed"))),
                ..Layout::for_shopper(&shopper).await
            };
            LoginTemplate {
                layout,
                email: credentials.email,
                redirect,
            }
            .into_response()
        }
    }
}

/// Display the register page.
#[instrument(skip_all)]
pub async fn register_page(shopper: Shopper) -> Response {
    if shopper.is_signed_in() {
        return Redirect::to("/").into_response();
    }

    RegisterTemplate {
        layout: Layout::for_shopper(&shopper).await,
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
    }
    .into_response()
}

/// Handle registration form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(shopper: Shopper, Form(form): Form<RegisterForm>) -> Response {
    let registration = Registration {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
        confirm_password: form.confirm_password,
    };

    let auth = &shopper.stores().auth;
    let result = auth.register(shopper.client(), &registration).await;
    auth.take_error();

    match result {
        Ok(Outcome::Applied) => {
            info!("Shopper registered");
            establish(&shopper, "Welcome to TheColoringBliss 🎉", "/").await
        }
        Ok(Outcome::Superseded) => Redirect::to("/register").into_response(),
        Err(e) => {
            let layout = Layout {
                flash: Some(Flash::error(e.user_message("Registration failed"))),
                ..Layout::for_shopper(&shopper).await
            };
            RegisterTemplate {
                layout,
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
            }
            .into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, shopper: Shopper) -> Response {
    shopper.sign_out(&state).await;
    shopper.flash(Flash::info("You have been logged out")).await;
    Redirect::to("/").into_response()
}
