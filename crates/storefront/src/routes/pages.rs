//! Static content page route handlers.
//!
//! Serves the markdown pages: about, FAQ, shipping, returns, and contact.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::Shopper;
use crate::state::AppState;
use crate::views::Layout;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub title: String,
    pub description: String,
    pub updated_at: Option<String>,
    pub content_html: String,
}

/// Serve a content page by slug.
async fn serve_content_page(
    state: &AppState,
    shopper: &Shopper,
    slug: &str,
) -> Result<ContentPageTemplate, AppError> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        layout: Layout::for_shopper(shopper).await,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page
            .meta
            .updated_at
            .map(|d| d.format("%B %-d, %Y").to_string()),
        content_html: page.content_html.clone(),
    })
}

/// Display the About page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip_all)]
pub async fn about(
    State(state): State<AppState>,
    shopper: Shopper,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, &shopper, "about").await
}

/// Display the FAQ page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip_all)]
pub async fn faq(
    State(state): State<AppState>,
    shopper: Shopper,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, &shopper, "faq").await
}

/// Display the Shipping page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip_all)]
pub async fn shipping(
    State(state): State<AppState>,
    shopper: Shopper,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, &shopper, "shipping").await
}

/// Display the Returns page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip_all)]
pub async fn returns(
    State(state): State<AppState>,
    shopper: Shopper,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, &shopper, "returns").await
}

/// Display the Contact page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip_all)]
pub async fn contact(
    State(state): State<AppState>,
    shopper: Shopper,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, &shopper, "contact").await
}
