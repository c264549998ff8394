//! Product list state controller.
//!
//! Reads filters from a [`QueryParamStore`], fetches the capped dataset through
//! the [`CachedClient`] keyed only by the search term, and projects it into the
//! rows to show. The page is re-clamped against the filtered count and the
//! store is corrected when the requested page no longer exists.

use catalog_api::types::Product;
use catalog_api::{ProductQuery, Query};

use crate::client::CachedClient;
use crate::error::CatalogError;
use crate::filters::{FilterState, FilterUpdate, QueryParamStore};
use crate::projection::{project, ProductListView, PRODUCTS_DATASET_LIMIT, PRODUCT_PAGE_SIZE};

pub struct ProductListController<'a> {
    client: &'a CachedClient,
    store: QueryParamStore,
    page_size: usize,
    dataset_limit: usize,
    /// Last dataset that loaded successfully, shown while a new one loads.
    placeholder: Option<Vec<Product>>,
    last_view: Option<ProductListView>,
}

impl<'a> ProductListController<'a> {
    pub fn new(client: &'a CachedClient, store: QueryParamStore) -> Self {
        Self {
            client,
            store,
            page_size: PRODUCT_PAGE_SIZE,
            dataset_limit: PRODUCTS_DATASET_LIMIT,
            placeholder: None,
            last_view: None,
        }
    }

    /// Starts from a query string such as `?brand=Apple&page=2`.
    pub fn from_query(client: &'a CachedClient, query: &str) -> Self {
        Self::new(client, QueryParamStore::from_query(query))
    }

    pub fn filters(&self) -> FilterState {
        self.store.filters()
    }

    pub fn store(&self) -> &QueryParamStore {
        &self.store
    }

    pub fn query_string(&self) -> String {
        self.store.query_string()
    }

    pub fn last_view(&self) -> Option<&ProductListView> {
        self.last_view.as_ref()
    }

    /// The remote request backing the current filters. Only the search term
    /// reaches the API; brand, category, sort and page are applied locally.
    pub fn dataset_query(&self) -> ProductQuery {
        ProductQuery::default()
            .with_page(1)
            .with_page_size(self.dataset_limit as i64)
            .with_search(&self.filters().search)
    }

    /// Whether `load` would be answered from cache.
    pub fn is_fresh(&self) -> bool {
        self.client.is_fresh(&self.dataset_query())
    }

    /// Fetches (or reuses) the dataset and projects the current page.
    pub async fn load(&mut self) -> Result<ProductListView, CatalogError> {
        let query = self.dataset_query();
        let dataset = self.client.get_products(&query).await?;

        let filters = self.filters();
        let view = project(&dataset.products, &filters, self.page_size);
        if view.page != filters.page {
            tracing::debug!(
                "page {} out of range, clamping to {}",
                filters.page,
                view.page
            );
            self.store.update(FilterUpdate::page(i64::from(view.page)));
        }

        self.placeholder = Some(dataset.products);
        self.last_view = Some(view.clone());
        Ok(view)
    }

    /// Refetches the dataset for the current filters. Locally created
    /// products in the cached dataset stay at its head.
    pub async fn refresh(&mut self) -> Result<ProductListView, CatalogError> {
        self.client.invalidate_products(&self.dataset_query());
        self.load().await
    }

    /// The previous dataset projected with the current filters, if any.
    pub fn placeholder_view(&self) -> Option<ProductListView> {
        self.placeholder
            .as_ref()
            .map(|products| project(products, &self.filters(), self.page_size))
    }

    pub fn update(&mut self, update: FilterUpdate) {
        self.store.update(update);
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Moves one page forward, bounded by the last loaded view. Returns
    /// whether the page changed.
    pub fn next_page(&mut self) -> bool {
        let total_pages = self
            .last_view
            .as_ref()
            .map(|v| v.total_pages)
            .unwrap_or(u32::MAX);
        let page = self.filters().page;
        let next = page.saturating_add(1).min(total_pages);
        self.set_page(page, next)
    }

    /// Moves one page back, never below 1. Returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        let page = self.filters().page;
        let prev = page.saturating_sub(1).max(1);
        self.set_page(page, prev)
    }

    fn set_page(&mut self, current: u32, next: u32) -> bool {
        if next == current {
            return false;
        }
        self.store.update(FilterUpdate::page(i64::from(next)));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::client::list_cache_key;
    use crate::filters::SortOrder;
    use std::time::Duration;

    const PRODUCTS: &str = include_str!("../../catalog_api/tests/fixtures/products.json");

    // Unreachable base URL: every test must be served from the seeded cache.
    fn seeded_client() -> CachedClient {
        let client = CachedClient::with_base_url(
            "http://127.0.0.1:9",
            MemoryCache::new(Duration::from_secs(30), Duration::from_secs(300)),
        )
        .with_retry_policy(0, Duration::ZERO);
        let query = ProductQuery::default()
            .with_page(1)
            .with_page_size(PRODUCTS_DATASET_LIMIT as i64);
        client
            .cache()
            .set(list_cache_key(&query), PRODUCTS.to_string());
        client
    }

    fn ids(view: &ProductListView) -> Vec<i64> {
        view.products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn dataset_query_ignores_local_filters() {
        let client = seeded_client();
        let a = ProductListController::from_query(&client, "brand=Apple&page=3&sort=oldest");
        let b = ProductListController::from_query(&client, "");
        assert_eq!(a.dataset_query(), b.dataset_query());
        assert!(a.is_fresh());

        let c = ProductListController::from_query(&client, "search=phone");
        assert_ne!(a.dataset_query(), c.dataset_query());
        assert!(!c.is_fresh());
    }

    #[tokio::test]
    async fn load_filters_by_brand_newest_first() {
        let client = seeded_client();
        let mut controller = ProductListController::from_query(&client, "?brand=Apple");
        let view = controller.load().await.unwrap();
        assert_eq!(ids(&view), vec![122, 121, 78]);
        assert_eq!(view.total_items, 3);
        assert_eq!(view.facets.brands, vec!["Apple", "Samsung"]);
        assert_eq!(controller.query_string(), "brand=Apple");
    }

    #[tokio::test]
    async fn out_of_range_page_is_clamped_and_dropped_from_query() {
        let client = seeded_client();
        let mut controller = ProductListController::from_query(&client, "brand=Nope&page=3");
        let view = controller.load().await.unwrap();
        assert!(view.products.is_empty());
        assert_eq!(view.page, 1);
        assert_eq!(controller.filters().page, 1);
        assert_eq!(controller.query_string(), "brand=Nope");
    }

    #[tokio::test]
    async fn paging_is_bounded_by_last_view() {
        let client = seeded_client();
        let mut controller = ProductListController::from_query(&client, "");
        let view = controller.load().await.unwrap();
        assert_eq!(view.total_pages, 1);
        assert!(!controller.next_page());
        assert!(!controller.prev_page());
        assert_eq!(controller.query_string(), "");
    }

    #[test]
    fn paging_before_first_load_only_guards_the_lower_bound() {
        let client = seeded_client();
        let mut controller = ProductListController::from_query(&client, "");
        assert!(controller.next_page());
        assert_eq!(controller.query_string(), "page=2");
        assert!(controller.prev_page());
        assert_eq!(controller.query_string(), "");
    }

    #[tokio::test]
    async fn placeholder_reprojects_previous_dataset() {
        let client = seeded_client();
        let mut controller = ProductListController::from_query(&client, "");
        assert!(controller.placeholder_view().is_none());
        controller.load().await.unwrap();

        controller.update(FilterUpdate::search("galaxy").with_sort(SortOrder::Oldest));
        assert!(!controller.is_fresh());
        let placeholder = controller.placeholder_view().unwrap();
        assert_eq!(placeholder.sort, SortOrder::Oldest);
        assert_eq!(ids(&placeholder), vec![131, 130]);
    }

    #[tokio::test]
    async fn reset_keeps_unrelated_keys() {
        let client = seeded_client();
        let mut controller =
            ProductListController::from_query(&client, "ref=home&brand=Apple&sort=oldest");
        controller.reset();
        assert_eq!(controller.query_string(), "ref=home");
        assert!(controller.filters().is_default());
    }
}
