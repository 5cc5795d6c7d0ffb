//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};
use coloring_bliss_api::types::OrderStats;
use tracing::{instrument, warn};

use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::Flash;
use crate::views::{DashboardView, Layout, Section};

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub stats: DashboardView,
}

/// Display the dashboard.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn dashboard(RequireAdmin(console, admin): RequireAdmin) -> Response {
    let mut layout = Layout::new(&console, &admin, Section::Dashboard).await;

    let stats = match console.client().order_stats().await {
        Ok(stats) => stats,
        Err(e) if e.is_auth() => return console.expire("/").await,
        Err(e) => {
            warn!(error = %e, "Failed to load order stats");
            layout = layout.with_flash(Flash::error("Failed to load dashboard"));
            OrderStats::default()
        }
    };

    DashboardTemplate {
        layout,
        stats: DashboardView::from(&stats),
    }
    .into_response()
}
