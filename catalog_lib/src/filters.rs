//! URL query string as the single source of truth for list filters.
//!
//! [`QueryParamStore`] holds the raw query pairs (unknown keys included) and
//! exposes them as a typed [`FilterState`]. Writes go through
//! [`QueryParamStore::update`], which drops keys that equal their default so a
//! default view always serializes to an empty query string.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

pub const PAGE_KEY: &str = "page";
pub const SEARCH_KEY: &str = "search";
pub const BRAND_KEY: &str = "brand";
pub const CATEGORY_KEY: &str = "category";
pub const SORT_KEY: &str = "sort";

const FILTER_KEYS: &[&str] = &[PAGE_KEY, SEARCH_KEY, BRAND_KEY, CATEGORY_KEY, SORT_KEY];

/// Ordering applied to the projected list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent first. This is the default.
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    /// Human label used in list summaries.
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest first",
            SortOrder::Oldest => "oldest first",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortOrder::Newest => "newest",
                SortOrder::Oldest => "oldest",
            }
        )
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            _ => Err(()),
        }
    }
}

/// Typed view of the list filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    /// 1-indexed page of the projected list. Always at least 1.
    pub page: u32,
    pub search: String,
    /// Exact brand, or empty for all brands.
    pub brand: String,
    /// Exact category, or empty for all categories.
    pub category: String,
    pub sort: SortOrder,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            brand: String::new(),
            category: String::new(),
            sort: SortOrder::Newest,
        }
    }
}

impl FilterState {
    /// Parses filters out of a query string (with or without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        QueryParamStore::from_query(query).filters()
    }

    /// Serializes the non-default filters as a query string.
    pub fn to_query_string(&self) -> String {
        let mut store = QueryParamStore::default();
        store.update(FilterUpdate::from(self.clone()));
        store.query_string()
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A partial change to [`FilterState`]. `None` leaves a field untouched.
///
/// The `search`/`brand`/`category`/`sort` constructors also send the list back
/// to page 1, the way a filter bar does when one of its inputs changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    /// Requested page. Non-positive values are coerced to 1.
    pub page: Option<i64>,
    pub search: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub sort: Option<SortOrder>,
}

impl FilterUpdate {
    pub fn page(page: i64) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    /// Search change; the term is trimmed, as on submit.
    pub fn search(search: &str) -> Self {
        Self {
            search: Some(search.trim().to_string()),
            page: Some(1),
            ..Default::default()
        }
    }

    pub fn brand(brand: &str) -> Self {
        Self {
            brand: Some(brand.to_string()),
            page: Some(1),
            ..Default::default()
        }
    }

    pub fn category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            page: Some(1),
            ..Default::default()
        }
    }

    pub fn sort(sort: SortOrder) -> Self {
        Self {
            sort: Some(sort),
            page: Some(1),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<FilterState> for FilterUpdate {
    fn from(state: FilterState) -> Self {
        Self {
            page: Some(i64::from(state.page)),
            search: Some(state.search),
            brand: Some(state.brand),
            category: Some(state.category),
            sort: Some(state.sort),
        }
    }
}

/// Ordered query pairs with typed read/write access to the filter keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParamStore {
    params: Vec<(String, String)>,
}

impl QueryParamStore {
    /// Parses a query string. A leading `?` is ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { params }
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or(""))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: String) {
        // Keep the first occurrence in place, drop duplicates.
        let mut seen = false;
        self.params.retain_mut(|(k, v)| {
            if k.as_str() != key {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *v = value.clone();
            true
        });
        if !seen {
            self.params.push((key.to_string(), value));
        }
    }

    fn delete(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    /// Reads the typed filter state, applying defaults for missing or
    /// unreadable values.
    pub fn filters(&self) -> FilterState {
        let page = self
            .get(PAGE_KEY)
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(1);
        let sort = self
            .get(SORT_KEY)
            .and_then(|s| s.parse::<SortOrder>().ok())
            .unwrap_or_default();

        FilterState {
            page,
            search: self.get(SEARCH_KEY).unwrap_or_default().to_string(),
            brand: self.get(BRAND_KEY).unwrap_or_default().to_string(),
            category: self.get(CATEGORY_KEY).unwrap_or_default().to_string(),
            sort,
        }
    }

    /// Merges a partial update. Values equal to their default remove the key.
    pub fn update(&mut self, update: FilterUpdate) {
        if let Some(page) = update.page {
            let page = page.max(1);
            if page == 1 {
                self.delete(PAGE_KEY);
            } else {
                self.set(PAGE_KEY, page.to_string());
            }
        }
        for (key, value) in [
            (SEARCH_KEY, update.search),
            (BRAND_KEY, update.brand),
            (CATEGORY_KEY, update.category),
        ] {
            match value {
                Some(v) if v.is_empty() => self.delete(key),
                Some(v) => self.set(key, v),
                None => {}
            }
        }
        if let Some(sort) = update.sort {
            if sort == SortOrder::default() {
                self.delete(SORT_KEY);
            } else {
                self.set(SORT_KEY, sort.to_string());
            }
        }
    }

    /// Drops every filter key. Unrelated keys stay.
    pub fn reset(&mut self) {
        self.params.retain(|(k, _)| !FILTER_KEYS.contains(&k.as_str()));
    }

    /// Serialized query string without the leading `?`.
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// Returns `url` with its query replaced by this store's contents.
    pub fn apply_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let query = self.query_string();
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query));
        }
        url
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
