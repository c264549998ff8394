use url::Url;

use super::{common::QueryCommon, Query};

/// Fields requested through `select=`. Anything not listed is left out of the
/// response by the API.
pub const PRODUCT_FIELDS: &[&str] = &[
    "id",
    "title",
    "description",
    "price",
    "rating",
    "stock",
    "brand",
    "category",
    "thumbnail",
    "images",
    "availabilityStatus",
    "shippingInformation",
    "warrantyInformation",
    "dimensions",
    "weight",
    "meta",
];

/// Query for the product list and product search endpoints.
///
/// An empty search routes to `/products`; a non-empty one routes to
/// `/products/search` with `q=` set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
}

impl Query for ProductQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(search) = &self.search {
            url.query_pairs_mut().append_pair("q", search.as_str());
        };
        url.query_pairs_mut()
            .append_pair("select", PRODUCT_FIELDS.join(",").as_str());
        url
    }
}

impl ProductQuery {
    /// Sets the free-text search. An empty string clears it.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = if search.is_empty() {
            None
        } else {
            Some(search.to_string())
        };
        self
    }

    /// Path of the endpoint this query targets.
    pub fn path(&self) -> &'static str {
        match self.search {
            Some(_) => "/products/search",
            None => "/products",
        }
    }
}
