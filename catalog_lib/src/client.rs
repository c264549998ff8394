//! Caching and retrying wrapper around the API client.
//!
//! Also the home of locally created products: they are written straight into
//! the cache and never sent to the remote catalog.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use catalog_api::types::{Product, ProductID, ProductMeta, ProductPage};
use catalog_api::{Client, ProductQuery};
use chrono::{SecondsFormat, Utc};
use dashmap::DashSet;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::MemoryCache;
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::validation::NewProduct;

pub const LIST_KEY_PREFIX: &str = "products:list:";
pub const DETAIL_KEY_PREFIX: &str = "products:detail:";

/// Ids handed out to locally created products are always above this value,
/// well clear of the remote catalog's ids.
pub const LOCAL_ID_FLOOR: ProductID = 1_000_000_000_000;

/// API client wrapper that adds an in-memory query cache, a retry policy and
/// locally created products.
///
/// Fresh cache hits bypass the network entirely. Stale hits and misses are
/// fetched, retried `max_retries` times on remote failures, and stored under
/// their request key.
pub struct CachedClient {
    inner: Client,
    cache: MemoryCache,
    retry: RetryConfig,
    /// Ids of products created in this process.
    local_ids: DashSet<ProductID>,
    last_local_id: AtomicI64,
}

struct RetryConfig {
    max_retries: usize,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryConfig {
    fn from_config(config: &CatalogConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_delay.as_millis() as u64,
            max_delay_ms: 30_000,
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

/// Canonical request key for a list query: page, page size and search.
pub fn list_cache_key(query: &ProductQuery) -> String {
    format!(
        "{}p{}:s{}:q{:?}",
        LIST_KEY_PREFIX, query.common.page, query.common.page_size, query.search
    )
}

pub fn detail_cache_key(product_id: ProductID) -> String {
    format!("{}{}", DETAIL_KEY_PREFIX, product_id)
}

impl CachedClient {
    /// Creates a client for `config.api_url` with a cache sized by the config.
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            inner: Client::with_base_url(&config.api_url),
            cache: MemoryCache::new(config.stale_time, config.gc_time),
            retry: RetryConfig::from_config(config),
            local_ids: DashSet::new(),
            last_local_id: AtomicI64::new(LOCAL_ID_FLOOR),
        }
    }

    /// Creates a new cached client with a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str, cache: MemoryCache) -> Self {
        Self {
            inner: Client::with_base_url(base_url),
            cache,
            retry: RetryConfig::default(),
            local_ids: DashSet::new(),
            last_local_id: AtomicI64::new(LOCAL_ID_FLOOR),
        }
    }

    /// Overrides the retry policy.
    pub fn with_retry_policy(mut self, max_retries: usize, base_delay: Duration) -> Self {
        self.retry.max_retries = max_retries;
        self.retry.base_delay_ms = base_delay.as_millis() as u64;
        self
    }

    async fn retrying<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, CatalogError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CatalogError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !err.is_retryable() {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64(),
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<(T, bool)>, CatalogError> {
        match self.cache.get(key) {
            Some(hit) => {
                let value = serde_json::from_str(&hit.value).map_err(|e| {
                    CatalogError::Cache(format!("corrupt cache entry {}: {}", key, e))
                })?;
                Ok(Some((value, hit.is_stale)))
            }
            None => Ok(None),
        }
    }

    fn write_cached<T: Serialize>(&self, key: String, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.cache.set(key, json),
            Err(e) => tracing::warn!("Not caching {}: {}", key, e),
        }
    }

    /// Whether `query` has a fresh cached result, i.e. `get_products` would
    /// answer without a network round-trip.
    pub fn is_fresh(&self, query: &ProductQuery) -> bool {
        matches!(self.cache.get(&list_cache_key(query)), Some(hit) if !hit.is_stale)
    }

    /// Fetches a page of products, returning cached results when fresh.
    ///
    /// When a stale entry is refetched, locally created products it carried
    /// are kept at the head of the new result.
    pub async fn get_products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        let cache_key = list_cache_key(query);

        let stale = match self.read_cached::<ProductPage>(&cache_key)? {
            Some((page, false)) => {
                tracing::debug!("cache hit {}", cache_key);
                return Ok(page);
            }
            Some((page, true)) => Some(page),
            None => None,
        };
        tracing::debug!("cache miss {}", cache_key);

        let mut resp = self
            .retrying("products", || async { Ok(self.inner.get_products(query).await?) })
            .await?;

        if let Some(stale) = stale {
            let mut carried: Vec<Product> = stale
                .products
                .into_iter()
                .filter(|p| self.is_local(p.id) && !resp.products.iter().any(|r| r.id == p.id))
                .collect();
            if !carried.is_empty() {
                resp.total += carried.len() as u64;
                carried.append(&mut resp.products);
                resp.products = carried;
            }
        }

        self.write_cached(cache_key, &resp);
        Ok(resp)
    }

    /// Fetches a single product by ID.
    ///
    /// Locally created products (see [`CachedClient::is_local`]) are served
    /// from the detail cache or from any cached list that still holds them.
    /// If neither has it,
    /// [`CatalogError::LocalProductNotFound`] is returned without a network call.
    pub async fn get_product(&self, product_id: ProductID) -> Result<Product, CatalogError> {
        let cache_key = detail_cache_key(product_id);
        let is_local = self.is_local(product_id);

        if let Some((product, is_stale)) = self.read_cached::<Product>(&cache_key)? {
            if !is_stale || is_local {
                tracing::debug!("cache hit {}", cache_key);
                return Ok(product);
            }
        }

        if is_local {
            return match self.find_in_lists(product_id) {
                Some(product) => {
                    self.write_cached(cache_key, &product);
                    Ok(product)
                }
                None => Err(CatalogError::LocalProductNotFound(product_id)),
            };
        }

        let product = self
            .retrying("product", || async {
                Ok(self.inner.get_product(product_id).await?)
            })
            .await?;
        self.write_cached(cache_key, &product);
        Ok(product)
    }

    fn find_in_lists(&self, product_id: ProductID) -> Option<Product> {
        self.cache
            .values_matching(LIST_KEY_PREFIX)
            .iter()
            .filter_map(|json| serde_json::from_str::<ProductPage>(json).ok())
            .find_map(|page| page.products.into_iter().find(|p| p.id == product_id))
    }

    /// Creates a product locally.
    ///
    /// The product gets a fresh id above [`LOCAL_ID_FLOOR`], is put at the
    /// head of every cached list (bumping `total`), and seeds the detail
    /// cache. Nothing is sent to the remote catalog.
    pub fn create_product(&self, input: NewProduct) -> Result<Product, CatalogError> {
        let id = self.next_local_id();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let product = Product {
            id,
            title: input.title,
            description: input.description,
            price: input.price,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: input.stock,
            brand: input.brand,
            category: input.category,
            thumbnail: String::new(),
            images: Vec::new(),
            tags: None,
            availability_status: None,
            shipping_information: None,
            warranty_information: None,
            dimensions: None,
            weight: None,
            meta: Some(ProductMeta {
                created_at: Some(now.clone()),
                updated_at: Some(now),
                ..Default::default()
            }),
        };
        let product_json = serde_json::to_string(&product)?;
        self.local_ids.insert(id);

        let updated = self.cache.update_matching(LIST_KEY_PREFIX, |key, value| {
            match serde_json::from_str::<ProductPage>(value) {
                Ok(mut page) => {
                    page.products.insert(0, product.clone());
                    page.total += 1;
                    serde_json::to_string(&page).ok()
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable cache entry {}: {}", key, e);
                    None
                }
            }
        });
        self.cache.set(detail_cache_key(id), product_json);

        tracing::info!(
            "Created product {} locally ({} cached lists updated)",
            id,
            updated
        );
        Ok(product)
    }

    fn next_local_id(&self) -> ProductID {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last_local_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }

    /// Whether the id belongs to a locally created product: one registered
    /// in this process, or any id above [`LOCAL_ID_FLOOR`] (ids handed out by
    /// an earlier process).
    pub fn is_local(&self, product_id: ProductID) -> bool {
        self.local_ids.contains(&product_id) || product_id > LOCAL_ID_FLOOR
    }

    /// Marks the cached result for one list query stale. The next
    /// `get_products` refetches it and keeps the local products it held.
    pub fn invalidate_products(&self, query: &ProductQuery) {
        self.cache.mark_stale(&list_cache_key(query));
    }

    /// Removes all entries from the cache. Locally created ids stay known.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &MemoryCache {
        &self.cache
    }
}
