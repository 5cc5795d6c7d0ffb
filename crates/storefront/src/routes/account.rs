//! Account route handlers: profile, password, and order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use coloring_bliss_api::types::{PasswordChange, ProfileUpdate};
use coloring_bliss_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::filters;
use crate::middleware::{RequireSession, Shopper};
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::{Layout, OrderDetailView, OrderSummaryView};

/// Order history filter tabs.
const ORDER_TABS: [(&str, &str); 5] = [
    ("all", "All Orders"),
    ("pending", "Pending"),
    ("processing", "Processing"),
    ("shipped", "Shipped"),
    ("delivered", "Delivered"),
];

// =============================================================================
// Profile
// =============================================================================

/// Profile form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

/// Password form data.
#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Display the profile and password forms.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireSession(shopper, user): RequireSession,
) -> Response {
    let auth = &shopper.stores().auth;
    if auth.user().is_none() {
        let result = auth.refresh(shopper.client()).await;
        auth.take_error();
        if let Err(e) = result {
            if e.is_auth() {
                return shopper.expire(&state, "/account").await;
            }
            warn!(error = %e, "Failed to refresh account");
        }
    }

    let (first_name, last_name, email, phone) = auth.user().map_or_else(
        || fallback_identity(&user),
        |u| {
            (
                u.first_name,
                u.last_name,
                u.email,
                u.phone.unwrap_or_default(),
            )
        },
    );

    ProfileTemplate {
        layout: Layout::for_shopper(&shopper).await,
        first_name,
        last_name,
        email,
        phone,
    }
    .into_response()
}

fn fallback_identity(user: &CurrentUser) -> (String, String, String, String) {
    (
        user.first_name.clone(),
        String::new(),
        user.email.clone(),
        String::new(),
    )
}

/// Save the profile form.
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<ProfileForm>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to update your profile", "/account")
            .await;
    }

    let profile = ProfileUpdate {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone: form.phone.trim().to_string(),
    };
    let auth = &shopper.stores().auth;
    let result = auth.update_profile(shopper.client(), &profile).await;
    auth.take_error();

    if result.is_ok() {
        shopper.refresh_identity().await;
    }
    shopper
        .settle(
            &state,
            result,
            "Failed to update profile",
            Some("Profile updated! ✨".to_string()),
            "/account",
        )
        .await
}

/// Change the account password.
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<PasswordForm>,
) -> Response {
    if !shopper.is_signed_in() {
        return shopper
            .login_first("Please login to change your password", "/account")
            .await;
    }

    let change = PasswordChange {
        current_password: form.current_password,
        new_password: form.new_password,
        confirm_password: form.confirm_password,
    };
    let auth = &shopper.stores().auth;
    let result = auth.change_password(shopper.client(), &change).await;
    auth.take_error();

    shopper
        .settle(
            &state,
            result,
            "Failed to change password",
            Some("Password changed successfully! 🔐".to_string()),
            "/account",
        )
        .await
}

// =============================================================================
// Orders
// =============================================================================

/// `?status=` on the order history page.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

/// Order history filter tab.
#[derive(Debug, Clone)]
pub struct StatusTab {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

fn status_tabs(selected: Option<OrderStatus>) -> Vec<StatusTab> {
    ORDER_TABS
        .iter()
        .map(|&(value, label)| StatusTab {
            label,
            href: if value == "all" {
                "/account/orders".to_string()
            } else {
                format!("/account/orders?status={value}")
            },
            active: selected.map_or("all", OrderStatus::as_str) == value,
        })
        .collect()
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub tabs: Vec<StatusTab>,
    pub orders: Vec<OrderSummaryView>,
}

/// Display the shopper's orders, optionally filtered by status.
#[instrument(skip_all, fields(status = query.status.as_deref().unwrap_or("all")))]
pub async fn orders(
    State(state): State<AppState>,
    RequireSession(shopper, _user): RequireSession,
    Query(query): Query<OrdersQuery>,
) -> Response {
    // "all" and unknown values both mean no filter
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<OrderStatus>().ok());

    let (orders, error) = match shopper.client().my_orders(status).await {
        Ok(orders) => (orders, None),
        Err(e) if e.is_auth() => return shopper.expire(&state, "/account/orders").await,
        Err(e) => {
            warn!(error = %e, "Failed to fetch orders");
            (Vec::new(), Some(e.user_message("Failed to load orders")))
        }
    };

    OrdersTemplate {
        layout: Layout::for_shopper(&shopper).await.or_error(error),
        tabs: status_tabs(status),
        orders: orders.iter().map(OrderSummaryView::new).collect(),
    }
    .into_response()
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "account/order.html")]
pub struct OrderTemplate {
    pub layout: Layout,
    pub order: Option<OrderDetailView>,
}

/// Display one order with its tracker and history.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn order(
    State(state): State<AppState>,
    RequireSession(shopper, _user): RequireSession,
    Path(id): Path<String>,
) -> Response {
    let back = format!("/account/orders/{id}");
    let (order, error) = match shopper.client().order(&OrderId::new(id)).await {
        Ok(order) => (
            Some(OrderDetailView::new(&order, state.api().base_url())),
            None,
        ),
        Err(e) if e.is_auth() => return shopper.expire(&state, &back).await,
        Err(e) => {
            warn!(error = %e, "Failed to fetch order");
            (None, Some(e.user_message("Failed to load order details")))
        }
    };

    OrderTemplate {
        layout: Layout::for_shopper(&shopper).await.or_error(error),
        order,
    }
    .into_response()
}
