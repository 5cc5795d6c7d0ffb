//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Path,
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_core::CategoryId;
use tracing::{info, instrument, warn};

use crate::filters;
use crate::forms::CategoryFormData;
use crate::middleware::{Console, RequireAdmin};
use crate::models::{CurrentAdmin, Flash};
use crate::views::{CategoryRow, Layout, Section};

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub layout: Layout,
    pub rows: Vec<CategoryRow>,
}

/// Category create/edit template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub layout: Layout,
    pub editing: bool,
    pub action: String,
    pub form: CategoryFormData,
}

/// Display the category list.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(RequireAdmin(console, admin): RequireAdmin) -> Response {
    let mut layout = Layout::new(&console, &admin, Section::Categories).await;
    let rows = match console.client().list_categories().await {
        Ok(categories) => categories.iter().map(CategoryRow::from).collect(),
        Err(e) if e.is_auth() => return console.expire("/categories").await,
        Err(e) => {
            warn!(error = %e, "Failed to load categories");
            layout = layout.with_flash(Flash::error("Failed to load categories"));
            Vec::new()
        }
    };

    CategoriesTemplate { layout, rows }.into_response()
}

async fn render_form(
    console: &Console,
    admin: &CurrentAdmin,
    target: Option<&CategoryId>,
    form: CategoryFormData,
    error: Option<String>,
) -> Response {
    let mut layout = Layout::new(console, admin, Section::Categories).await;
    if let Some(message) = error {
        layout = layout.with_flash(Flash::error(message));
    }

    CategoryFormTemplate {
        layout,
        editing: target.is_some(),
        action: target.map_or_else(
            || "/categories/new".to_string(),
            |id| format!("/categories/{id}/edit"),
        ),
        form,
    }
    .into_response()
}

/// Display the new category form.
#[instrument(skip_all)]
pub async fn new_page(RequireAdmin(console, admin): RequireAdmin) -> Response {
    render_form(&console, &admin, None, CategoryFormData::default(), None).await
}

/// Create a category.
#[instrument(skip_all, fields(name = %form.name))]
pub async fn create(
    RequireAdmin(console, admin): RequireAdmin,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let body = match form.to_form() {
        Ok(body) => body,
        Err(message) => return render_form(&console, &admin, None, form, Some(message)).await,
    };

    match console.client().create_category(&body).await {
        Ok(()) => {
            info!("Category created");
            console
                .flash(Flash::success("Category created successfully"))
                .await;
            Redirect::to("/categories").into_response()
        }
        Err(e) if e.is_auth() => console.expire("/categories/new").await,
        Err(e) => {
            warn!(error = %e, "Failed to create category");
            let message = e.user_message("Failed to save category");
            render_form(&console, &admin, None, form, Some(message)).await
        }
    }
}

/// Display the edit form for a category.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn edit_page(RequireAdmin(console, admin): RequireAdmin, Path(id): Path<String>) -> Response {
    let id = CategoryId::new(id);
    match console.client().category_by_id(&id).await {
        Ok(category) => {
            let form = CategoryFormData::from(&category);
            render_form(&console, &admin, Some(&id), form, None).await
        }
        Err(e) => console.fail(&e, "Failed to load category", "/categories").await,
    }
}

/// Save the edit form.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn update(
    RequireAdmin(console, admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let id = CategoryId::new(id);
    let body = match form.to_form() {
        Ok(body) => body,
        Err(message) => return render_form(&console, &admin, Some(&id), form, Some(message)).await,
    };

    match console.client().update_category(&id, &body).await {
        Ok(()) => {
            info!("Category updated");
            console
                .flash(Flash::success("Category updated successfully"))
                .await;
            Redirect::to("/categories").into_response()
        }
        Err(e) if e.is_auth() => console.expire(&format!("/categories/{id}/edit")).await,
        Err(e) => {
            warn!(error = %e, "Failed to update category");
            let message = e.user_message("Failed to save category");
            render_form(&console, &admin, Some(&id), form, Some(message)).await
        }
    }
}

/// Delete a category.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn delete(RequireAdmin(console, _admin): RequireAdmin, Path(id): Path<String>) -> Response {
    let id = CategoryId::new(id);
    match console.client().delete_category(&id).await {
        Ok(()) => {
            info!("Category deleted");
            console
                .flash(Flash::success("Category deleted successfully"))
                .await;
            Redirect::to("/categories").into_response()
        }
        Err(e) => console.fail(&e, "Failed to delete category", "/categories").await,
    }
}
