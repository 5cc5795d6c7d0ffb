//! Product route handlers: list, create, edit, delete, and form images.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use coloring_bliss_api::types::Category;
use coloring_bliss_api::{ApiError, ImageFile, ProductQuery, upload_file_name};
use coloring_bliss_core::{Binding, CoverType, PaperType, ProductId, ProductSize};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::filters;
use crate::forms::{COVER_FINISHES, MAX_PRODUCT_IMAGES, PRODUCT_TYPES, ProductFormData};
use crate::middleware::{Console, RequireAdmin};
use crate::models::{CurrentAdmin, Flash, ImageDraft};
use crate::state::AppState;
use crate::views::{ImageTile, Layout, Pager, ProductRow, Section, SelectOption};

const PAGE_SIZE: u32 = 10;

/// Largest accepted image file.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

// =============================================================================
// List
// =============================================================================

/// `?page=&search=` on the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub layout: Layout,
    pub rows: Vec<ProductRow>,
    pub search: String,
    pub pager: Pager,
}

/// Display the product list.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(console, admin): RequireAdmin,
    Query(params): Query<ListQuery>,
) -> Response {
    // Leaving the form for the list discards its unsaved image list
    console.clear_image_draft().await;

    let search = params.search.unwrap_or_default().trim().to_string();
    let query = ProductQuery {
        page: params.page.unwrap_or(1).max(1),
        limit: PAGE_SIZE,
        search: (!search.is_empty()).then(|| search.clone()),
        ..ProductQuery::default()
    };

    let mut layout = Layout::new(&console, &admin, Section::Products).await;
    let page = match console.client().list_products(&query).await {
        Ok(page) => page,
        Err(e) if e.is_auth() => return console.expire("/products").await,
        Err(e) => {
            warn!(error = %e, "Failed to load products");
            layout = layout.with_flash(Flash::error("Failed to load products"));
            return ProductsTemplate {
                layout,
                rows: Vec::new(),
                search,
                pager: Pager::default(),
            }
            .into_response();
        }
    };

    let api_base = state.api().base_url();
    let encoded = urlencoding::encode(&search).into_owned();
    let pager = Pager::new(&page.pagination, |n| {
        if encoded.is_empty() {
            format!("/products?page={n}")
        } else {
            format!("/products?page={n}&search={encoded}")
        }
    });

    ProductsTemplate {
        layout,
        rows: page
            .products
            .iter()
            .map(|product| ProductRow::new(product, api_base))
            .collect(),
        search,
        pager,
    }
    .into_response()
}

// =============================================================================
// Form
// =============================================================================

/// Product create/edit template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: Layout,
    pub editing: bool,
    pub action: String,
    pub product_id: String,
    pub form: ProductFormData,
    pub categories: Vec<SelectOption>,
    pub product_types: Vec<SelectOption>,
    pub sizes: Vec<SelectOption>,
    pub paper_types: Vec<SelectOption>,
    pub cover_types: Vec<SelectOption>,
    pub finishes: Vec<SelectOption>,
    pub bindings: Vec<SelectOption>,
    pub images: Vec<ImageTile>,
    pub max_images: usize,
    pub can_upload: bool,
}

fn labelled(values: &'static [&'static str], label: fn(&str) -> &str) -> Vec<(&'static str, &'static str)> {
    values.iter().map(|value| (*value, label(value))).collect()
}

async fn render_form(
    state: &AppState,
    console: &Console,
    admin: &CurrentAdmin,
    target: Option<&ProductId>,
    form: ProductFormData,
    draft: &ImageDraft,
    error: Option<String>,
) -> Response {
    let categories: Vec<Category> = match console.client().list_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            warn!(error = %e, "Failed to load categories for product form");
            Vec::new()
        }
    };

    let mut layout = Layout::new(console, admin, Section::Products).await;
    if let Some(message) = error {
        layout = layout.with_flash(Flash::error(message));
    }

    ProductFormTemplate {
        layout,
        editing: target.is_some(),
        action: draft.form_path(),
        product_id: target.map(ToString::to_string).unwrap_or_default(),
        categories: SelectOption::list(
            categories.iter().map(|c| (c.id.as_str(), c.name.as_str())),
            &form.category,
        ),
        product_types: SelectOption::list(PRODUCT_TYPES.iter().copied(), &form.product_type),
        sizes: SelectOption::list(
            labelled(ProductSize::VALUES, ProductSize::label_for),
            &form.size_name,
        ),
        paper_types: SelectOption::list(
            labelled(PaperType::VALUES, PaperType::label_for),
            &form.paper_type,
        ),
        cover_types: SelectOption::list(
            labelled(CoverType::VALUES, CoverType::label_for),
            &form.cover_type,
        ),
        finishes: SelectOption::list(COVER_FINISHES.iter().copied(), &form.cover_finish),
        bindings: SelectOption::list(labelled(Binding::VALUES, Binding::label_for), &form.binding),
        images: ImageTile::list(draft, state.api().base_url()),
        max_images: MAX_PRODUCT_IMAGES,
        can_upload: draft.remaining() > 0,
        form,
    }
    .into_response()
}

/// The open form's image list for `target`, or a fresh one.
async fn current_draft(console: &Console, target: Option<&ProductId>) -> Result<ImageDraft, ApiError> {
    if let Some(draft) = console.image_draft().await.filter(|d| d.is_for(target)) {
        return Ok(draft);
    }
    match target {
        None => Ok(ImageDraft::for_new()),
        Some(id) => console
            .client()
            .product_by_id(id)
            .await
            .map(|product| ImageDraft::for_product(&product)),
    }
}

/// Display the new product form.
#[instrument(skip_all)]
pub async fn new_page(
    State(state): State<AppState>,
    RequireAdmin(console, admin): RequireAdmin,
) -> Response {
    let draft = console
        .image_draft()
        .await
        .filter(|d| d.is_for(None))
        .unwrap_or_else(ImageDraft::for_new);
    if let Err(e) = console.save_image_draft(&draft).await {
        return e.into_response();
    }

    render_form(&state, &console, &admin, None, ProductFormData::default(), &draft, None).await
}

/// Create a product from the form and the uploaded images.
#[instrument(skip_all, fields(sku = %form.sku))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(console, admin): RequireAdmin,
    Form(form): Form<ProductFormData>,
) -> Response {
    let draft = console
        .image_draft()
        .await
        .filter(|d| d.is_for(None))
        .unwrap_or_else(ImageDraft::for_new);

    let input = match form.into_input(draft.to_images(form.name.trim())) {
        Ok(input) => input,
        Err(message) => {
            return render_form(&state, &console, &admin, None, form, &draft, Some(message)).await;
        }
    };

    match console.client().create_product(&input).await {
        Ok(()) => {
            info!("Product created");
            console.clear_image_draft().await;
            console
                .flash(Flash::success("Product created successfully! 🎉"))
                .await;
            Redirect::to("/products").into_response()
        }
        Err(e) if e.is_auth() => console.expire("/products/new").await,
        Err(e) => {
            warn!(error = %e, "Failed to create product");
            let message = e.user_message("Failed to save product");
            render_form(&state, &console, &admin, None, form, &draft, Some(message)).await
        }
    }
}

/// Display the edit form for a product.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAdmin(console, admin): RequireAdmin,
    Path(id): Path<String>,
) -> Response {
    let id = ProductId::new(id);
    let product = match console.client().product_by_id(&id).await {
        Ok(product) => product,
        Err(e) => return console.fail(&e, "Failed to load product", "/products").await,
    };

    let draft = console
        .image_draft()
        .await
        .filter(|d| d.is_for(Some(&id)))
        .unwrap_or_else(|| ImageDraft::for_product(&product));
    if let Err(e) = console.save_image_draft(&draft).await {
        return e.into_response();
    }

    let form = ProductFormData::from(&product);
    render_form(&state, &console, &admin, Some(&id), form, &draft, None).await
}

/// Save the edit form.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(console, admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<ProductFormData>,
) -> Response {
    let id = ProductId::new(id);
    let back = format!("/products/{id}/edit");
    let draft = match current_draft(&console, Some(&id)).await {
        Ok(draft) => draft,
        Err(e) => return console.fail(&e, "Failed to load product", "/products").await,
    };

    let input = match form.into_input(draft.to_images(form.name.trim())) {
        Ok(input) => input,
        Err(message) => {
            return render_form(&state, &console, &admin, Some(&id), form, &draft, Some(message))
                .await;
        }
    };

    match console.client().update_product(&id, &input).await {
        Ok(()) => {
            info!("Product updated");
            console.clear_image_draft().await;
            console
                .flash(Flash::success("Product updated successfully! ✨"))
                .await;
            Redirect::to("/products").into_response()
        }
        Err(e) if e.is_auth() => console.expire(&back).await,
        Err(e) => {
            warn!(error = %e, "Failed to update product");
            let message = e.user_message("Failed to save product");
            render_form(&state, &console, &admin, Some(&id), form, &draft, Some(message)).await
        }
    }
}

/// Delete a product.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(RequireAdmin(console, _admin): RequireAdmin, Path(id): Path<String>) -> Response {
    let id = ProductId::new(id);
    match console.client().delete_product(&id).await {
        Ok(()) => {
            info!("Product deleted");
            console.flash(Flash::success("Product deleted successfully")).await;
            Redirect::to("/products").into_response()
        }
        Err(e) => console.fail(&e, "Failed to delete product", "/products").await,
    }
}

// =============================================================================
// Images
// =============================================================================

/// Parsed image upload request.
#[derive(Debug, Default)]
struct Upload {
    product_id: Option<ProductId>,
    files: Vec<ImageFile>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name().unwrap_or("") {
            "product_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let text = text.trim();
                upload.product_id = (!text.is_empty()).then(|| ProductId::new(text));
            }
            "images" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // An empty file input still posts one nameless part
                if file_name.is_empty() || bytes.is_empty() {
                    continue;
                }
                upload.files.push(ImageFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// Check an upload against the draft before anything is sent.
fn check_upload(files: &[ImageFile], draft: &ImageDraft) -> Result<(), &'static str> {
    if files.is_empty() {
        return Err("Choose at least one image");
    }
    if files.len() > draft.remaining() {
        return Err("Maximum 5 images allowed");
    }
    if files.iter().any(|f| !f.content_type.starts_with("image/")) {
        return Err("Only image files are allowed");
    }
    if files.iter().any(|f| f.bytes.len() > MAX_IMAGE_BYTES) {
        return Err("Images must be 5MB or smaller");
    }
    Ok(())
}

/// Upload images to the store API and add them to the open form.
#[instrument(skip_all)]
pub async fn upload_images(RequireAdmin(console, _admin): RequireAdmin, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => return e.into_response(),
    };
    let mut draft = match current_draft(&console, upload.product_id.as_ref()).await {
        Ok(draft) => draft,
        Err(e) => return console.fail(&e, "Failed to load product", "/products").await,
    };
    let back = draft.form_path();

    if let Err(message) = check_upload(&upload.files, &draft) {
        console.flash(Flash::error(message)).await;
        return Redirect::to(&back).into_response();
    }

    match console.client().upload_product_images(upload.files).await {
        Ok(urls) => {
            info!(count = urls.len(), "Product images uploaded");
            draft.add(urls);
            if let Err(e) = console.save_image_draft(&draft).await {
                return e.into_response();
            }
            console
                .flash(Flash::success("Images uploaded successfully! 📸"))
                .await;
            Redirect::to(&back).into_response()
        }
        Err(e) => console.fail(&e, "Failed to upload images", &back).await,
    }
}

/// Body of the image remove and primary buttons.
#[derive(Debug, Deserialize)]
pub struct ImageForm {
    #[serde(default)]
    pub product_id: String,
    pub url: String,
}

impl ImageForm {
    fn target(&self) -> Option<ProductId> {
        let id = self.product_id.trim();
        (!id.is_empty()).then(|| ProductId::new(id))
    }
}

/// Take an image off the open form. Images uploaded since the form was
/// opened are deleted from the store right away.
#[instrument(skip_all, fields(url = %form.url))]
pub async fn remove_image(
    RequireAdmin(console, _admin): RequireAdmin,
    Form(form): Form<ImageForm>,
) -> Response {
    let mut draft = match current_draft(&console, form.target().as_ref()).await {
        Ok(draft) => draft,
        Err(e) => return console.fail(&e, "Failed to load product", "/products").await,
    };

    if let Some(removed) = draft.remove(&form.url) {
        if !removed.saved {
            if let Some(file_name) = upload_file_name(&removed.url) {
                if let Err(e) = console.client().delete_product_image(file_name).await {
                    warn!(error = %e, file_name, "Failed to delete uploaded image");
                }
            }
        }
        if let Err(e) = console.save_image_draft(&draft).await {
            return e.into_response();
        }
    }

    Redirect::to(&draft.form_path()).into_response()
}

/// Move an image to the front of the open form.
#[instrument(skip_all, fields(url = %form.url))]
pub async fn make_primary(
    RequireAdmin(console, _admin): RequireAdmin,
    Form(form): Form<ImageForm>,
) -> Response {
    let mut draft = match current_draft(&console, form.target().as_ref()).await {
        Ok(draft) => draft,
        Err(e) => return console.fail(&e, "Failed to load product", "/products").await,
    };

    if draft.make_primary(&form.url) {
        if let Err(e) = console.save_image_draft(&draft).await {
            return e.into_response();
        }
        console.flash(Flash::success("Primary image set! ⭐")).await;
    }

    Redirect::to(&draft.form_path()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str, size: usize) -> ImageFile {
        ImageFile {
            file_name: "cover.jpg".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn test_check_upload_limits() {
        let mut draft = ImageDraft::for_new();
        assert_eq!(check_upload(&[], &draft), Err("Choose at least one image"));
        assert_eq!(check_upload(&[file("image/jpeg", 10)], &draft), Ok(()));
        assert_eq!(
            check_upload(&[file("application/pdf", 10)], &draft),
            Err("Only image files are allowed")
        );
        assert_eq!(
            check_upload(&[file("image/png", MAX_IMAGE_BYTES + 1)], &draft),
            Err("Images must be 5MB or smaller")
        );

        draft.add((0..4).map(|i| format!("/u/{i}.jpg")).collect());
        let two = [file("image/jpeg", 10), file("image/jpeg", 10)];
        assert_eq!(check_upload(&two, &draft), Err("Maximum 5 images allowed"));
    }

    #[test]
    fn test_image_form_target() {
        let form = ImageForm {
            product_id: " ".to_string(),
            url: "/u/1.jpg".to_string(),
        };
        assert_eq!(form.target(), None);
    }
}
