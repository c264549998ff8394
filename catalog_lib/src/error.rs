//! Error types for the library layer.

use std::fmt;

use catalog_api::types::ProductID;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding cache, serialization, session and local-lookup failures.
#[derive(Debug)]
pub enum CatalogError {
    /// An error from the underlying API client.
    Api(catalog_api::Error),
    /// A cache operation failed (e.g. deserialization of cached data).
    Cache(String),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// A product created in this session is no longer in any cache and
    /// cannot be fetched from the remote catalog.
    LocalProductNotFound(ProductID),
    /// The mock session store could not be read or written, or the
    /// credentials were rejected.
    Auth(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl CatalogError {
    /// Whether retrying the same operation can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{}", e),
            Self::Cache(msg) => write!(f, "Cache error: {}", msg),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::LocalProductNotFound(id) => write!(
                f,
                "Product {} was created locally and is not available locally anymore",
                id
            ),
            Self::Auth(msg) => write!(f, "Authentication error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<catalog_api::Error> for CatalogError {
    fn from(e: catalog_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
