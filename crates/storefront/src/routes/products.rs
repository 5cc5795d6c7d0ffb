//! Catalog route handlers: the shop listing and product detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Response},
};
use coloring_bliss_api::types::ProductFilters;
use coloring_bliss_api::{ProductQuery, SORT_OPTIONS};
use coloring_bliss_core::{Binding, CoverType, PaperType, ProductSize};
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::Shopper;
use crate::state::AppState;
use crate::views::{Layout, Pager, ProductCard, ProductDetailView};

// =============================================================================
// Shop
// =============================================================================

/// Checkbox in a facet group.
#[derive(Clone)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// Facet group in the filter sidebar.
#[derive(Clone)]
pub struct FacetGroup {
    pub key: &'static str,
    pub title: &'static str,
    pub options: Vec<FacetOption>,
}

/// Sort menu entry.
#[derive(Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Category radio in the filter sidebar.
#[derive(Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ShopTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub pager: Pager,
    pub search: String,
    pub min_price: String,
    pub max_price: String,
    pub price_hint: Option<String>,
    pub featured: bool,
    pub new_arrivals: bool,
    pub sorts: Vec<SortOption>,
    pub categories: Vec<CategoryOption>,
    pub facets: Vec<FacetGroup>,
    pub active_filters: usize,
}

fn facet(
    key: &'static str,
    title: &'static str,
    available: &[String],
    selected: &[String],
    label: impl Fn(&str) -> String,
) -> FacetGroup {
    FacetGroup {
        key,
        title,
        options: available
            .iter()
            .map(|value| FacetOption {
                value: value.clone(),
                label: label(value),
                checked: selected.contains(value),
            })
            .collect(),
    }
}

fn facet_groups(filters: &ProductFilters, query: &ProductQuery) -> Vec<FacetGroup> {
    vec![
        facet(
            "productType",
            "Product Type",
            &filters.product_types,
            &query.product_types,
            capitalize,
        ),
        facet("size", "Size", &filters.sizes, &query.sizes, |v| {
            ProductSize::label_for(v).to_string()
        }),
        facet(
            "paperType",
            "Paper Type",
            &filters.paper_types,
            &query.paper_types,
            |v| PaperType::label_for(v).to_string(),
        ),
        facet(
            "coverType",
            "Cover Type",
            &filters.cover_types,
            &query.cover_types,
            |v| CoverType::label_for(v).to_string(),
        ),
        facet("binding", "Binding", &filters.bindings, &query.bindings, |v| {
            Binding::label_for(v).to_string()
        }),
    ]
    .into_iter()
    .filter(|group| !group.options.is_empty())
    .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Parse the shop query string. Facets may repeat.
#[must_use]
pub fn parse_query(raw: Option<&str>) -> ProductQuery {
    ProductQuery::from_pairs(url::form_urlencoded::parse(
        raw.unwrap_or_default().as_bytes(),
    ))
}

/// `/shop` link for `query` at `page`.
#[must_use]
pub fn shop_href(query: &ProductQuery, page: u32) -> String {
    let qs = query.to_query_string(page);
    if qs.is_empty() {
        "/shop".to_string()
    } else {
        format!("/shop?{qs}")
    }
}

/// Display the catalog with filters, sort, search, and paging.
#[instrument(skip_all, fields(query = raw.as_deref().unwrap_or("")))]
pub async fn index(
    State(state): State<AppState>,
    shopper: Shopper,
    RawQuery(raw): RawQuery,
) -> impl IntoResponse {
    let query = parse_query(raw.as_deref());
    let catalog = &shopper.stores().catalog;
    let client = shopper.client();
    let _ = tokio::join!(
        catalog.load_products(client, &query),
        catalog.load_filters(client),
        catalog.load_categories(client),
    );

    let snapshot = catalog.snapshot();
    catalog.clear_error();

    let price_hint = snapshot.filters.price_range.as_ref().map(|range| {
        format!(
            "{} - {}",
            coloring_bliss_core::format::format_price(Some(range.min_price)),
            coloring_bliss_core::format::format_price(Some(range.max_price))
        )
    });

    ShopTemplate {
        layout: Layout::for_shopper(&shopper).await.or_error(snapshot.error),
        products: ProductCard::list(&snapshot.products, state.api().base_url()),
        pager: Pager::new(&snapshot.pagination, |page| shop_href(&query, page)),
        search: query.search.clone().unwrap_or_default(),
        min_price: query.min_price.map(|p| p.to_string()).unwrap_or_default(),
        max_price: query.max_price.map(|p| p.to_string()).unwrap_or_default(),
        price_hint,
        featured: query.featured,
        new_arrivals: query.new_arrivals,
        sorts: SORT_OPTIONS
            .iter()
            .map(|&(value, label)| SortOption {
                value,
                label,
                selected: query.sort == value,
            })
            .collect(),
        categories: snapshot
            .categories
            .iter()
            .filter(|c| c.is_active)
            .map(|c| CategoryOption {
                id: c.id.to_string(),
                name: c.name.clone(),
                selected: query.category.as_deref() == Some(c.id.as_str()),
            })
            .collect(),
        facets: facet_groups(&snapshot.filters, &query),
        active_filters: query.active_filter_count(),
    }
}

// =============================================================================
// Product Detail
// =============================================================================

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetailView,
    pub related: Vec<ProductCard>,
    pub signed_in: bool,
    pub in_wishlist: bool,
    pub back: String,
}

/// Display a product with its related products.
///
/// # Errors
///
/// Returns 404 if the slug does not exist, or the API error for other
/// failures.
#[instrument(skip(state, shopper))]
pub async fn show(
    State(state): State<AppState>,
    shopper: Shopper,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let catalog = &shopper.stores().catalog;
    if let Err(e) = catalog.load_product(shopper.client(), &slug).await {
        catalog.clear_error();
        if e.is_not_found() {
            return Err(AppError::NotFound(format!("product {slug}")));
        }
        if e.is_auth() {
            return Ok(shopper.expire(&state, &format!("/product/{slug}")).await.into_response());
        }
        return Err(e.into());
    }

    let snapshot = catalog.snapshot();
    let product = snapshot
        .current_product
        .filter(|p| p.slug == slug)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let api_base = state.api().base_url();
    let in_wishlist = shopper
        .stores()
        .auth
        .user()
        .is_some_and(|u| u.has_in_wishlist(product.id.as_str()));

    Ok(ProductShowTemplate {
        layout: Layout::for_shopper(&shopper).await,
        product: ProductDetailView::new(&product, api_base),
        related: ProductCard::list(&snapshot.related_products, api_base),
        signed_in: shopper.is_signed_in(),
        in_wishlist,
        back: format!("/product/{slug}"),
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_facets_parse() {
        let query = parse_query(Some("size=small&size=medium&search=dot%20grid&page=2"));
        assert_eq!(query.sizes, vec!["small", "medium"]);
        assert_eq!(query.search.as_deref(), Some("dot grid"));
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_shop_href_drops_defaults() {
        assert_eq!(shop_href(&ProductQuery::default(), 1), "/shop");
        let query = parse_query(Some("binding=sewn&sort=price"));
        assert_eq!(shop_href(&query, 3), "/shop?binding=sewn&sort=price&page=3");
    }

    #[test]
    fn test_facets_label_and_check() {
        let filters = ProductFilters {
            sizes: vec!["pocket".to_string(), "extra-large".to_string()],
            paper_types: vec!["dotted".to_string()],
            ..ProductFilters::default()
        };
        let query = parse_query(Some("size=extra-large"));
        let groups = facet_groups(&filters, &query);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "size");
        assert_eq!(groups[0].options[1].label, "Extra Large");
        assert!(groups[0].options[1].checked);
        assert!(!groups[0].options[0].checked);
        assert_eq!(groups[1].options[0].label, "Dot Grid");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("journal"), "Journal");
        assert_eq!(capitalize(""), "");
    }
}
