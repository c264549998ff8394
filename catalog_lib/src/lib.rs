//! Library layer for the product catalog: cached API client, URL-backed filter
//! state, client-side projection, and the list controller that ties them together.
//!
//! Wraps the `catalog_api` crate with an in-memory cache that also carries
//! locally created products, plus the mock session store and the create-form
//! validation used by the CLI.

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod projection;
pub mod validation;

pub use catalog_api;
pub use catalog_api::types;
pub use catalog_api::{ProductQuery, Query};

pub use client::CachedClient;
pub use config::CatalogConfig;
pub use controller::ProductListController;
pub use error::CatalogError;
pub use filters::{FilterState, FilterUpdate, QueryParamStore, SortOrder};
pub use projection::{ProductListView, PRODUCTS_DATASET_LIMIT, PRODUCT_PAGE_SIZE};
pub use validation::{FormErrors, NewProduct, ProductForm};
