//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use coloring_bliss_api::types::{Category, Product};
use tracing::instrument;

use crate::filters;
use crate::middleware::Shopper;
use crate::state::AppState;
use crate::views::{Layout, ProductCard};

/// Products shown per home page section.
const SECTION_SIZE: usize = 4;

/// Category tile on the home page.
#[derive(Clone)]
pub struct CategoryTile {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_count: Option<u32>,
}

impl From<&Category> for CategoryTile {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            description: category.description.clone(),
            product_count: category.product_count,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<ProductCard>,
    pub new_arrivals: Vec<ProductCard>,
    pub categories: Vec<CategoryTile>,
}

/// Display the home page.
///
/// Featured products, new arrivals, and categories load concurrently; a
/// failed section renders empty and the failure is shown as a notice.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>, shopper: Shopper) -> impl IntoResponse {
    let catalog = &shopper.stores().catalog;
    let client = shopper.client();
    let _ = tokio::join!(
        catalog.load_featured(client),
        catalog.load_new_arrivals(client),
        catalog.load_categories(client),
    );

    let snapshot = catalog.snapshot();
    catalog.clear_error();
    let api_base = state.api().base_url();

    let take = |products: &[Product]| {
        ProductCard::list(products.get(..SECTION_SIZE).unwrap_or(products), api_base)
    };

    HomeTemplate {
        layout: Layout::for_shopper(&shopper).await.or_error(snapshot.error),
        featured: take(&snapshot.featured),
        new_arrivals: take(&snapshot.new_arrivals),
        categories: snapshot
            .categories
            .iter()
            .filter(|c| c.is_active)
            .map(CategoryTile::from)
            .collect(),
    }
}
