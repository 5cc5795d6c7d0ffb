//! Authentication route handlers.
//!
//! Admins sign in with their store account. The token is only kept when the
//! account carries the admin role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::gate;
use coloring_bliss_api::types::Credentials;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::{ACCESS_DENIED, Console};
use crate::models::Flash;
use crate::state::AppState;
use crate::views::Layout;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub redirect: String,
}

/// `?redirect=` on the login page.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub redirect: String,
}

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(console: Console, Query(query): Query<RedirectQuery>) -> Response {
    let redirect = gate::safe_redirect(query.redirect.as_deref()).to_string();
    if console.admin().is_some() {
        return Redirect::to(&redirect).into_response();
    }

    LoginTemplate {
        layout: Layout::signed_out(&console).await,
        email: String::new(),
        redirect,
    }
    .into_response()
}

async fn login_failed(console: &Console, message: String, email: String, redirect: String) -> Response {
    LoginTemplate {
        layout: Layout::signed_out(console).await.with_flash(Flash::error(message)),
        email,
        redirect,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    console: Console,
    Form(form): Form<LoginForm>,
) -> Response {
    let redirect = gate::safe_redirect(Some(&form.redirect)).to_string();
    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let auth = match state.api().anonymous().login(&credentials).await {
        Ok(auth) => auth,
        Err(e) => {
            add_breadcrumb("auth", "Login failed", None);
            warn!(error = %e, "Admin login failed");
            return login_failed(&console, e.user_message("Login failed"), credentials.email, redirect)
                .await;
        }
    };

    if !auth.user.is_admin() {
        add_breadcrumb("auth", "Login refused for non-admin account", None);
        warn!(user_id = %auth.user.id, "Non-admin account tried to sign in");
        return login_failed(&console, ACCESS_DENIED.to_string(), credentials.email, redirect).await;
    }

    match console.sign_in(&auth).await {
        Ok(admin) => {
            info!(user_id = %admin.id, "Admin signed in");
            add_breadcrumb("auth", "Login successful", None);
            console
                .flash(Flash::success(format!("Welcome back, {}!", auth.user.first_name)))
                .await;
            Redirect::to(&redirect).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(console: Console) -> Response {
    console.sign_out().await;
    console.flash(Flash::success("You have been logged out")).await;
    Redirect::to("/login").into_response()
}
