//! Saved address handlers.
//!
//! Every address call returns the refreshed account, which replaces the
//! auth container's copy.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::ApiError;
use coloring_bliss_api::types::{AddressInput, User};
use coloring_bliss_core::AddressId;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::filters;
use crate::middleware::{RequireSession, Shopper};
use crate::models::Flash;
use crate::state::AppState;
use crate::views::{Layout, SavedAddressView};

const ADDRESSES: &str = "/account/addresses";

/// Label choices offered on the address form.
pub const ADDRESS_LABELS: [&str; 3] = ["Home", "Work", "Other"];

/// Address form data.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    /// Checkbox; present when ticked.
    pub is_default: Option<String>,
}

impl AddressForm {
    fn into_input(self) -> AddressInput {
        let label = self.label.trim();
        let country = self.country.trim();
        AddressInput {
            label: (!label.is_empty()).then(|| label.to_string()),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: if country.is_empty() {
                "Philippines".to_string()
            } else {
                country.to_string()
            },
            phone: self.phone.trim().to_string(),
            is_default: self.is_default.is_some(),
        }
    }
}

/// Address book template.
#[derive(Template, WebTemplate)]
#[template(path = "account/addresses.html")]
pub struct AddressesTemplate {
    pub layout: Layout,
    pub addresses: Vec<SavedAddressView>,
    pub labels: &'static [&'static str],
}

/// Display the saved addresses with the add form.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireSession(shopper, _user): RequireSession,
) -> Response {
    let auth = &shopper.stores().auth;
    let mut error = None;
    if auth.user().is_none() {
        let result = auth.refresh(shopper.client()).await;
        auth.take_error();
        if let Err(e) = result {
            if e.is_auth() {
                return shopper.expire(&state, ADDRESSES).await;
            }
            error = Some(e.user_message("Failed to load addresses"));
        }
    }

    let addresses = auth
        .user()
        .map(|u| u.addresses.iter().map(SavedAddressView::from).collect())
        .unwrap_or_default();

    AddressesTemplate {
        layout: Layout::for_shopper(&shopper).await.or_error(error),
        addresses,
        labels: &ADDRESS_LABELS,
    }
    .into_response()
}

/// Store the account an address call returned and redirect to the book.
async fn apply(
    shopper: &Shopper,
    state: &AppState,
    result: Result<User, ApiError>,
    success: &str,
    fallback: &str,
) -> Response {
    match result {
        Ok(user) => {
            shopper.stores().auth.set_user(user);
            shopper.flash(Flash::success(success)).await;
            Redirect::to(ADDRESSES).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Address change failed");
            shopper.fail(state, &e, fallback, ADDRESSES).await
        }
    }
}

async fn require_complete(shopper: &Shopper, input: &AddressInput) -> Option<Response> {
    if input.is_complete() {
        return None;
    }
    shopper
        .flash(Flash::error("Please fill in all required fields"))
        .await;
    Some(Redirect::to(ADDRESSES).into_response())
}

/// Add a saved address.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<AddressForm>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to manage addresses", ADDRESSES)
            .await;
    }
    let input = form.into_input();
    if let Some(response) = require_complete(&shopper, &input).await {
        return response;
    }

    let result = shopper.client().add_address(&input).await;
    if result.is_ok() {
        info!("Address added");
    }
    apply(&shopper, &state, result, "Address added! 📍", "Failed to save address").await
}

/// Replace a saved address.
#[instrument(skip(state, shopper, form))]
pub async fn update(
    State(state): State<AppState>,
    shopper: Shopper,
    Path(id): Path<String>,
    Form(form): Form<AddressForm>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to manage addresses", ADDRESSES)
            .await;
    }
    let input = form.into_input();
    if let Some(response) = require_complete(&shopper, &input).await {
        return response;
    }

    let result = shopper
        .client()
        .update_address(&AddressId::new(id), &input)
        .await;
    apply(&shopper, &state, result, "Address updated! 📍", "Failed to save address").await
}

/// Delete a saved address.
#[instrument(skip(state, shopper))]
pub async fn delete(
    State(state): State<AppState>,
    shopper: Shopper,
    Path(id): Path<String>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to manage addresses", ADDRESSES)
            .await;
    }
    let result = shopper.client().delete_address(&AddressId::new(id)).await;
    apply(&shopper, &state, result, "Address deleted", "Failed to delete address").await
}

/// Make an address the default.
#[instrument(skip(state, shopper))]
pub async fn make_default(
    State(state): State<AppState>,
    shopper: Shopper,
    Path(id): Path<String>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to manage addresses", ADDRESSES)
            .await;
    }
    let result = shopper
        .client()
        .set_default_address(&AddressId::new(id))
        .await;
    apply(
        &shopper,
        &state,
        result,
        "Default address updated! ⭐",
        "Failed to update default address",
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AddressForm {
        AddressForm {
            label: " Work ".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            street: " 1 Rizal Ave ".to_string(),
            city: "Manila".to_string(),
            state: "Metro Manila".to_string(),
            zip_code: "1000".to_string(),
            country: String::new(),
            phone: "09171234567".to_string(),
            is_default: Some("on".to_string()),
        }
    }

    #[test]
    fn test_form_trims_and_defaults_country() {
        let input = form().into_input();
        assert_eq!(input.label.as_deref(), Some("Work"));
        assert_eq!(input.street, "1 Rizal Ave");
        assert_eq!(input.country, "Philippines");
        assert!(input.is_default);
        assert!(input.is_complete());
    }

    #[test]
    fn test_blank_label_and_missing_city() {
        let input = AddressForm {
            label: "  ".to_string(),
            city: String::new(),
            is_default: None,
            ..form()
        }
        .into_input();
        assert_eq!(input.label, None);
        assert!(!input.is_default);
        assert!(!input.is_complete());
    }
}
