use serde::{Deserialize, Serialize};

use super::Product;

/// One page of products as returned by the list and search endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}
