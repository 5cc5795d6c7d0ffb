//! Order route handlers: list, detail, and status updates.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::OrderListQuery;
use coloring_bliss_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::filters;
use crate::forms::{SHIPPING_CARRIERS, StatusForm};
use crate::middleware::RequireAdmin;
use crate::models::Flash;
use crate::state::AppState;
use crate::views::{Layout, OrderDetail, OrderRow, Pager, Section, SelectOption};

/// `?page=&status=&search=` on the order list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Status filter; blank or unknown values mean all orders.
    fn status(&self) -> Option<OrderStatus> {
        self.status.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

fn status_values() -> impl Iterator<Item = (&'static str, &'static str)> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| (status.as_str(), status.label()))
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub rows: Vec<OrderRow>,
    pub search: String,
    pub statuses: Vec<SelectOption>,
    pub pager: Pager,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderTemplate {
    pub layout: Layout,
    pub order: OrderDetail,
    pub statuses: Vec<SelectOption>,
    pub carriers: Vec<SelectOption>,
}

/// Display the order list.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(RequireAdmin(console, admin): RequireAdmin, Query(params): Query<ListQuery>) -> Response {
    let status = params.status();
    let search = params.search.clone().unwrap_or_default().trim().to_string();
    let query = OrderListQuery {
        page: params.page.unwrap_or(1).max(1),
        status,
        search: (!search.is_empty()).then(|| search.clone()),
        ..OrderListQuery::default()
    };

    let mut layout = Layout::new(&console, &admin, Section::Orders).await;
    let statuses = SelectOption::list(status_values(), status.map_or("", OrderStatus::as_str));

    let page = match console.client().admin_orders(&query).await {
        Ok(page) => page,
        Err(e) if e.is_auth() => return console.expire("/orders").await,
        Err(e) => {
            warn!(error = %e, "Failed to load orders");
            layout = layout.with_flash(Flash::error("Failed to load orders"));
            return OrdersTemplate {
                layout,
                rows: Vec::new(),
                search,
                statuses,
                pager: Pager::default(),
            }
            .into_response();
        }
    };

    let mut suffix = String::new();
    if let Some(status) = status {
        suffix = format!("&status={}", status.as_str());
    }
    if !search.is_empty() {
        suffix = format!("{suffix}&search={}", urlencoding::encode(&search));
    }
    let pager = Pager::new(&page.pagination, |n| format!("/orders?page={n}{suffix}"));

    OrdersTemplate {
        layout,
        rows: page.orders.iter().map(OrderRow::from).collect(),
        search,
        statuses,
        pager,
    }
    .into_response()
}

/// Display one order with its status form.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(console, admin): RequireAdmin,
    Path(id): Path<String>,
) -> Response {
    let id = OrderId::new(id);
    let order = match console.client().order(&id).await {
        Ok(order) => order,
        Err(e) => return console.fail(&e, "Failed to load order", "/orders").await,
    };

    let detail = OrderDetail::new(&order, state.api().base_url());
    OrderTemplate {
        layout: Layout::new(&console, &admin, Section::Orders).await,
        statuses: SelectOption::list(status_values(), order.status.as_str()),
        carriers: SelectOption::list(SHIPPING_CARRIERS.iter().copied(), &detail.shipping_carrier),
        order: detail,
    }
    .into_response()
}

/// Apply the status form.
#[instrument(skip_all, fields(order_id = %id, status = %form.status))]
pub async fn update_status(
    RequireAdmin(console, _admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let id = OrderId::new(id);
    let back = format!("/orders/{id}");

    let update = match form.to_update() {
        Ok(update) => update,
        Err(message) => {
            console.flash(Flash::error(message)).await;
            return Redirect::to(&back).into_response();
        }
    };

    match console.client().update_order_status(&id, &update).await {
        Ok(()) => {
            info!("Order status updated");
            console.flash(Flash::success("Order updated successfully")).await;
            Redirect::to(&back).into_response()
        }
        Err(e) => console.fail(&e, "Failed to update order", &back).await,
    }
}
