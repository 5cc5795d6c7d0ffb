//! Catalog container: product listings, detail, facets and categories.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{Outcome, RequestSequence, Tracked, transition};
use crate::client::ApiClient;
use crate::endpoints::ProductQuery;
use crate::error::ApiError;
use crate::types::{Category, Pagination, Product, ProductFilters};

const LISTING: &str = "listing";
const FEATURED: &str = "featured";
const NEW_ARRIVALS: &str = "new_arrivals";
const DETAIL: &str = "detail";
const FILTERS: &str = "filters";
const CATEGORIES: &str = "categories";

/// Slice name for messages recorded outside a transition.
const LOCAL: &str = "local";

/// Cached catalog reads for one session.
///
/// `loading` is true while any slice has a read in flight. `error` joins the
/// messages of every slice whose latest read failed; a slice's message is
/// dropped only when that slice next loads successfully.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    pub featured: Vec<Product>,
    pub new_arrivals: Vec<Product>,
    pub current_product: Option<Product>,
    pub related_products: Vec<Product>,
    pub filters: ProductFilters,
    pub categories: Vec<Category>,
    pub loading: bool,
    pub error: Option<String>,
    in_flight: BTreeMap<&'static str, u32>,
    failures: BTreeMap<&'static str, String>,
}

impl CatalogState {
    fn publish(&mut self) {
        self.loading = !self.in_flight.is_empty();

        let mut messages: Vec<&str> = Vec::new();
        for message in self.failures.values() {
            if !messages.contains(&message.as_str()) {
                messages.push(message);
            }
        }
        self.error = (!messages.is_empty()).then(|| messages.join(". "));
    }
}

impl Tracked for CatalogState {
    fn set_loading(&mut self, loading: bool) {
        if !loading {
            self.in_flight.clear();
        }
        self.publish();
    }

    fn set_error(&mut self, error: Option<String>) {
        match error {
            Some(message) => {
                self.failures.insert(LOCAL, message);
            }
            None => self.failures.clear(),
        }
        self.publish();
    }

    fn begin(&mut self, slice: &'static str) {
        *self.in_flight.entry(slice).or_default() += 1;
        self.publish();
    }

    fn end(&mut self, slice: &'static str) {
        if let Some(count) = self.in_flight.get_mut(slice) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(slice);
            }
        }
        self.publish();
    }

    fn settle(&mut self, slice: &'static str, error: Option<String>) {
        match error {
            Some(message) => {
                self.failures.insert(slice, message);
            }
            None => {
                self.failures.remove(slice);
            }
        }
        self.publish();
    }
}

/// Catalog container.
///
/// Listing, featured, new-arrival, detail, facet and category reads are
/// independent, so each slice has its own sequence guard.
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: RwLock<CatalogState>,
    listing: RequestSequence,
    featured: RequestSequence,
    new_arrivals: RequestSequence,
    detail: RequestSequence,
    filters: RequestSequence,
    categories: RequestSequence,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.state.read().clone()
    }

    /// `GET /products?…`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn load_products(
        &self,
        client: &ApiClient,
        query: &ProductQuery,
    ) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.listing,
            LISTING,
            "Failed to fetch products",
            client.list_products(query),
            |state, page| {
                state.products = page.products;
                state.pagination = page.pagination;
            },
        )
        .await
    }

    /// `GET /products/featured`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn load_featured(&self, client: &ApiClient) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.featured,
            FEATURED,
            "Failed to fetch featured products",
            client.featured_products(),
            |state, list| state.featured = list.products,
        )
        .await
    }

    /// `GET /products/new-arrivals`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn load_new_arrivals(&self, client: &ApiClient) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.new_arrivals,
            NEW_ARRIVALS,
            "Failed to fetch new arrivals",
            client.new_arrivals(),
            |state, list| state.new_arrivals = list.products,
        )
        .await
    }

    /// `GET /products/{slug}`: sets the current product and its related
    /// products.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn load_product(&self, client: &ApiClient, slug: &str) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.detail,
            DETAIL,
            "Product not found",
            client.product_by_slug(slug),
            |state, detail| {
                state.current_product = Some(detail.product);
                state.related_products = detail.related_products;
            },
        )
        .await
    }

    /// `GET /products/filters`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn load_filters(&self, client: &ApiClient) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.filters,
            FILTERS,
            "Failed to fetch filters",
            client.product_filters(),
            |state, filters| state.filters = filters,
        )
        .await
    }

    /// `GET /categories`
    ///
    /// # Errors
    ///
    /// Returns the API error after recording its message.
    pub async fn load_categories(&self, client: &ApiClient) -> Result<Outcome, ApiError> {
        transition(
            &self.state,
            &self.categories,
            CATEGORIES,
            "Failed to fetch categories",
            client.list_categories(),
            |state, categories| state.categories = categories,
        )
        .await
    }

    pub fn clear_current_product(&self) {
        self.detail.cancel_pending();
        let mut state = self.state.write();
        state.current_product = None;
        state.related_products.clear();
    }

    /// Forget every recorded failure, e.g. once a view has shown it.
    pub fn clear_error(&self) {
        self.state.write().set_error(None);
    }

    /// Drop interest in every in-flight read. Each cancelled read ends its
    /// slice as soon as it observes the cancellation.
    pub fn cancel_pending(&self) {
        for sequence in [
            &self.listing,
            &self.featured,
            &self.new_arrivals,
            &self.detail,
            &self.filters,
            &self.categories,
        ] {
            sequence.cancel_pending();
        }
    }
}
