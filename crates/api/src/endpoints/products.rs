//! `/products` endpoints and the catalog query.

use reqwest::Method;
use rust_decimal::Decimal;
use tracing::instrument;

use coloring_bliss_core::ProductId;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    Product, ProductDetail, ProductEnvelope, ProductFilters, ProductInput, ProductList, ProductPage,
};

/// Sort keys the catalog accepts, with labels, in menu order.
pub const SORT_OPTIONS: &[(&str, &str)] = &[
    ("-createdAt", "Newest"),
    ("createdAt", "Oldest"),
    ("price", "Price: Low to High"),
    ("-price", "Price: High to Low"),
    ("-averageRating", "Top Rated"),
    ("name", "Name: A-Z"),
];

const DEFAULT_SORT: &str = "-createdAt";
const DEFAULT_LIMIT: u32 = 12;

/// Filters, sort and paging for `GET /products`.
///
/// The same parameter names are used in storefront URLs, where facets
/// repeat (`?size=small&size=medium`), and towards the API, where facets are
/// comma-joined (`?size=small,medium`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    pub product_types: Vec<String>,
    pub sizes: Vec<String>,
    pub paper_types: Vec<String>,
    pub cover_types: Vec<String>,
    pub bindings: Vec<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort: String,
    pub featured: bool,
    pub new_arrivals: bool,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            category: None,
            product_types: Vec::new(),
            sizes: Vec::new(),
            paper_types: Vec::new(),
            cover_types: Vec::new(),
            bindings: Vec::new(),
            min_price: None,
            max_price: None,
            search: None,
            sort: DEFAULT_SORT.to_string(),
            featured: false,
            new_arrivals: false,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn push_facet(values: &mut Vec<String>, raw: &str) {
    for value in raw.split(',').filter_map(non_blank) {
        if !values.contains(&value) {
            values.push(value);
        }
    }
}

impl ProductQuery {
    /// Parse decoded query-string pairs. Unknown keys and unparseable numbers
    /// are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "page" => {
                    if let Ok(page) = value.trim().parse::<u32>() {
                        query.page = page.max(1);
                    }
                }
                "limit" => {
                    if let Ok(limit) = value.trim().parse::<u32>() {
                        query.limit = limit.clamp(1, 100);
                    }
                }
                "category" => query.category = non_blank(value),
                "productType" => push_facet(&mut query.product_types, value),
                "size" => push_facet(&mut query.sizes, value),
                "paperType" => push_facet(&mut query.paper_types, value),
                "coverType" => push_facet(&mut query.cover_types, value),
                "binding" => push_facet(&mut query.bindings, value),
                "minPrice" => query.min_price = value.trim().parse().ok(),
                "maxPrice" => query.max_price = value.trim().parse().ok(),
                "search" => query.search = non_blank(value),
                "sort" => {
                    if let Some(sort) = non_blank(value) {
                        query.sort = sort;
                    }
                }
                "featured" => query.featured = value == "true",
                "newArrivals" => query.new_arrivals = value == "true",
                _ => {}
            }
        }
        query
    }

    fn filter_pairs(&self, join_facets: bool) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        let facets = [
            ("productType", &self.product_types),
            ("size", &self.sizes),
            ("paperType", &self.paper_types),
            ("coverType", &self.cover_types),
            ("binding", &self.bindings),
        ];
        for (key, values) in facets {
            if values.is_empty() {
                continue;
            }
            if join_facets {
                pairs.push((key.to_string(), values.join(",")));
            } else {
                pairs.extend(values.iter().map(|v| (key.to_string(), v.clone())));
            }
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice".to_string(), min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice".to_string(), max.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if self.featured {
            pairs.push(("featured".to_string(), "true".to_string()));
        }
        if self.new_arrivals {
            pairs.push(("newArrivals".to_string(), "true".to_string()));
        }
        pairs
    }

    /// Query pairs sent to the API: comma-joined facets plus paging.
    #[must_use]
    pub fn api_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filter_pairs(true);
        pairs.push(("sort".to_string(), self.sort.clone()));
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }

    /// Storefront URL query string for this query at `page`: repeated facet
    /// keys, default sort and first page omitted.
    #[must_use]
    pub fn to_query_string(&self, page: u32) -> String {
        let mut pairs = self.filter_pairs(false);
        if self.sort != DEFAULT_SORT {
            pairs.push(("sort".to_string(), self.sort.clone()));
        }
        if page > 1 {
            pairs.push(("page".to_string(), page.to_string()));
        }
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }

    /// Number of active filters, for the "Filters (n)" badge. Sort and paging
    /// do not count.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        [
            &self.product_types,
            &self.sizes,
            &self.paper_types,
            &self.cover_types,
            &self.bindings,
        ]
        .iter()
        .map(|values| values.len())
        .sum::<usize>()
            + usize::from(self.category.is_some())
            + usize::from(self.min_price.is_some())
            + usize::from(self.max_price.is_some())
            + usize::from(self.search.is_some())
            + usize::from(self.featured)
            + usize::from(self.new_arrivals)
    }
}

impl ApiClient {
    /// `GET /products`
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        self.get(self.endpoint_with_query(&["products"], &query.api_pairs()))
            .await
    }

    /// `GET /products/featured`
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<ProductList, ApiError> {
        self.get(self.endpoint(&["products", "featured"])).await
    }

    /// `GET /products/new-arrivals`
    #[instrument(skip(self))]
    pub async fn new_arrivals(&self) -> Result<ProductList, ApiError> {
        self.get(self.endpoint(&["products", "new-arrivals"])).await
    }

    /// `GET /products/filters`: facet values for the shop sidebar.
    #[instrument(skip(self))]
    pub async fn product_filters(&self) -> Result<ProductFilters, ApiError> {
        self.get(self.endpoint(&["products", "filters"])).await
    }

    /// `GET /products/{slug}`: product with related products.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<ProductDetail, ApiError> {
        self.get(self.endpoint(&["products", slug])).await
    }

    /// `GET /products/id/{id}`
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product_by_id(&self, id: &ProductId) -> Result<Product, ApiError> {
        let envelope: ProductEnvelope = self
            .get(self.endpoint(&["products", "id", id.as_str()]))
            .await?;
        Ok(envelope.product)
    }

    /// `POST /products` (admin)
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<(), ApiError> {
        self.send_unit_json(Method::POST, self.endpoint(&["products"]), input)
            .await
    }

    /// `PUT /products/{id}` (admin)
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        self.send_unit_json(Method::PUT, self.endpoint(&["products", id.as_str()]), input)
            .await
    }

    /// `DELETE /products/{id}` (admin)
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.send_unit(Method::DELETE, self.endpoint(&["products", id.as_str()]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = ProductQuery::default();
        assert_eq!(
            query.api_pairs(),
            vec![
                ("sort".to_string(), "-createdAt".to_string()),
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "12".to_string()),
            ]
        );
        assert_eq!(query.to_query_string(1), "");
        assert_eq!(query.active_filter_count(), 0);
    }

    #[test]
    fn test_repeated_and_comma_separated_facets_merge() {
        let query = ProductQuery::from_pairs([
            ("size", "small"),
            ("size", "medium,large"),
            ("size", "small"),
            ("paperType", "dotted"),
        ]);
        assert_eq!(query.sizes, vec!["small", "medium", "large"]);

        let pairs = query.api_pairs();
        assert!(pairs.contains(&("size".to_string(), "small,medium,large".to_string())));
        assert!(pairs.contains(&("paperType".to_string(), "dotted".to_string())));
        assert_eq!(query.active_filter_count(), 4);
    }

    #[test]
    fn test_storefront_query_string_repeats_facets() {
        let query = ProductQuery::from_pairs([
            ("binding", "wire-o"),
            ("binding", "sewn"),
            ("search", "kraft journal"),
            ("sort", "price"),
        ]);
        assert_eq!(
            query.to_query_string(2),
            "binding=wire-o&binding=sewn&search=kraft+journal&sort=price&page=2"
        );
    }

    #[test]
    fn test_ignores_garbage() {
        let query = ProductQuery::from_pairs([
            ("page", "zero"),
            ("page", "0"),
            ("minPrice", "cheap"),
            ("search", "   "),
            ("unknown", "x"),
        ]);
        assert_eq!(query.page, 1);
        assert_eq!(query.min_price, None);
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_price_bounds() {
        let query = ProductQuery::from_pairs([("minPrice", "100"), ("maxPrice", "499.50")]);
        let pairs = query.api_pairs();
        assert!(pairs.contains(&("minPrice".to_string(), "100".to_string())));
        assert!(pairs.contains(&("maxPrice".to_string(), "499.50".to_string())));
    }
}
