//! Client-side facets, filtering, sorting and pagination over a fetched dataset.
//!
//! The remote fetch pulls up to [`PRODUCTS_DATASET_LIMIT`] records in one
//! request; everything the list shows is then derived here and re-sliced into
//! pages of [`PRODUCT_PAGE_SIZE`]. Nothing in this module can fail.

use std::collections::BTreeSet;

use catalog_api::types::Product;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::filters::{FilterState, SortOrder};

/// Rows per displayed page.
pub const PRODUCT_PAGE_SIZE: usize = 10;
/// Records fetched from the API for one list request.
pub const PRODUCTS_DATASET_LIMIT: usize = 100;

/// Distinct brand and category values seen in a dataset, sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

/// The page of rows to render plus the numbers around it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductListView {
    pub products: Vec<Product>,
    /// Page actually shown, already clamped into `[1, total_pages]`.
    pub page: u32,
    pub total_pages: u32,
    /// Number of products left after filtering.
    pub total_items: usize,
    pub page_size: usize,
    pub sort: SortOrder,
    pub facets: Facets,
}

impl ProductListView {
    /// 1-indexed position of the first row on this page, 0 when empty.
    pub fn first_row(&self) -> usize {
        if self.total_items == 0 {
            0
        } else {
            (self.page as usize - 1) * self.page_size + 1
        }
    }

    /// 1-indexed position of the last row on this page.
    pub fn last_row(&self) -> usize {
        (self.page as usize * self.page_size).min(self.total_items)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// One-line summary, e.g. `3 results · sorted by newest first · page 1 of 1`.
    pub fn summary(&self) -> String {
        format!(
            "{} result{} · sorted by {} · page {} of {}",
            self.total_items,
            if self.total_items == 1 { "" } else { "s" },
            self.sort.label(),
            self.page,
            self.total_pages
        )
    }
}

/// Runs the whole pipeline: facets, filter, sort, paginate.
pub fn project(products: &[Product], filters: &FilterState, page_size: usize) -> ProductListView {
    let facets = extract_facets(products);
    let mut rows = filter_products(products, filters);
    sort_products(&mut rows, filters.sort);
    let total_items = rows.len();
    let total_pages = total_pages(total_items, page_size);
    let page = clamp_page(filters.page, total_pages);
    let products = paginate(&rows, page, page_size)
        .iter()
        .map(|p| (*p).clone())
        .collect();

    ProductListView {
        products,
        page,
        total_pages,
        total_items,
        page_size,
        sort: filters.sort,
        facets,
    }
}

/// Empty values are skipped; an empty filter already means "all".
pub fn extract_facets(products: &[Product]) -> Facets {
    let brands: BTreeSet<&str> = products
        .iter()
        .map(|p| p.brand.as_str())
        .filter(|b| !b.is_empty())
        .collect();
    let categories: BTreeSet<&str> = products
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    Facets {
        brands: brands.into_iter().map(str::to_string).collect(),
        categories: categories.into_iter().map(str::to_string).collect(),
    }
}

/// Keeps products matching brand, category and search. Empty filters match all.
///
/// The search is trimmed and matched case-insensitively against
/// `"{title} {brand}"`.
pub fn filter_products<'a>(products: &'a [Product], filters: &FilterState) -> Vec<&'a Product> {
    let needle = filters.search.trim().to_lowercase();
    products
        .iter()
        .filter(|p| filters.brand.is_empty() || p.brand == filters.brand)
        .filter(|p| filters.category.is_empty() || p.category == filters.category)
        .filter(|p| {
            needle.is_empty()
                || format!("{} {}", p.title, p.brand)
                    .to_lowercase()
                    .contains(&needle)
        })
        .collect()
}

/// Sort key: creation time, else update time, else the id itself. A timestamp
/// that fails to parse also falls back to the id.
///
/// Accepts RFC 3339 and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn comparable_timestamp(product: &Product) -> i64 {
    product
        .timestamp_text()
        .and_then(parse_timestamp_millis)
        .unwrap_or(product.id)
}

fn parse_timestamp_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc().timestamp_millis())
}

/// Stable sort by [`comparable_timestamp`].
pub fn sort_products(products: &mut [&Product], order: SortOrder) {
    match order {
        SortOrder::Newest => {
            products.sort_by(|a, b| comparable_timestamp(b).cmp(&comparable_timestamp(a)))
        }
        SortOrder::Oldest => products.sort_by_key(|p| comparable_timestamp(p)),
    }
}

/// `max(1, ceil(count / page_size))`.
pub fn total_pages(count: usize, page_size: usize) -> u32 {
    let page_size = page_size.max(1);
    let pages = count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Slice for a 1-indexed page. Out-of-range pages yield an empty slice.
pub fn paginate<T>(items: &[T], page: u32, page_size: usize) -> &[T] {
    let start = (page.max(1) as usize - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_api::types::ProductMeta;

    fn product(id: i64, title: &str, brand: &str, category: &str, created: Option<&str>) -> Product {
        Product {
            id,
            title: title.to_string(),
            description: String::new(),
            price: 10.0,
            discount_percentage: 0.0,
            rating: 4.0,
            stock: 1,
            brand: brand.to_string(),
            category: category.to_string(),
            thumbnail: String::new(),
            images: vec![],
            tags: None,
            availability_status: None,
            shipping_information: None,
            warranty_information: None,
            dimensions: None,
            weight: None,
            meta: created.map(|c| ProductMeta {
                created_at: Some(c.to_string()),
                ..Default::default()
            }),
        }
    }

    fn mixed_set() -> Vec<Product> {
        vec![
            product(1, "iPhone 9", "Apple", "smartphones", Some("2024-01-01T00:00:00Z")),
            product(2, "Galaxy S8", "Samsung", "smartphones", Some("2024-05-01T00:00:00Z")),
            product(3, "MacBook Pro", "Apple", "laptops", Some("2024-03-01T00:00:00Z")),
            product(4, "Galaxy Book", "Samsung", "laptops", Some("2024-02-01T00:00:00Z")),
            product(5, "iPad Mini", "Apple", "tablets", Some("2024-06-01T00:00:00Z")),
        ]
    }

    fn ids(view: &ProductListView) -> Vec<i64> {
        view.products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn brand_filter_returns_newest_first() {
        let filters = FilterState {
            brand: "Apple".into(),
            ..Default::default()
        };
        let view = project(&mixed_set(), &filters, PRODUCT_PAGE_SIZE);
        assert_eq!(ids(&view), vec![5, 3, 1]);
        assert_eq!(view.total_items, 3);
        assert_eq!(view.total_pages, 1);
    }

    #[test]
    fn oldest_sort_ascends() {
        let filters = FilterState {
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        let view = project(&mixed_set(), &filters, PRODUCT_PAGE_SIZE);
        assert_eq!(ids(&view), vec![1, 4, 3, 2, 5]);
    }

    #[test]
    fn facets_are_sorted_and_unique() {
        let facets = extract_facets(&mixed_set());
        assert_eq!(facets.brands, vec!["Apple", "Samsung"]);
        assert_eq!(facets.categories, vec!["laptops", "smartphones", "tablets"]);
    }

    #[test]
    fn facets_come_from_full_set_not_filtered_rows() {
        let filters = FilterState {
            brand: "Samsung".into(),
            ..Default::default()
        };
        let view = project(&mixed_set(), &filters, PRODUCT_PAGE_SIZE);
        assert_eq!(view.facets.brands, vec!["Apple", "Samsung"]);
    }

    #[test]
    fn search_matches_title_and_brand_case_insensitively() {
        let set = mixed_set();
        let by_brand = FilterState {
            search: "  SAMSUNG ".into(),
            ..Default::default()
        };
        let rows = filter_products(&set, &by_brand);
        assert_eq!(rows.len(), 2);

        let by_title = FilterState {
            search: "macbook".into(),
            ..Default::default()
        };
        let rows = filter_products(&set, &by_title);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);

        // The haystack is "title brand", so a span across the join matches.
        let across = FilterState {
            search: "mini apple".into(),
            ..Default::default()
        };
        assert_eq!(filter_products(&set, &across).len(), 1);
    }

    #[test]
    fn predicates_combine() {
        let filters = FilterState {
            brand: "Samsung".into(),
            category: "laptops".into(),
            search: "galaxy".into(),
            ..Default::default()
        };
        let view = project(&mixed_set(), &filters, PRODUCT_PAGE_SIZE);
        assert_eq!(ids(&view), vec![4]);
    }

    #[test]
    fn brand_match_is_exact() {
        let filters = FilterState {
            brand: "apple".into(),
            ..Default::default()
        };
        assert!(filter_products(&mixed_set(), &filters).is_empty());
    }

    #[test]
    fn timestamp_fallbacks() {
        let mut p = product(42, "x", "b", "c", None);
        assert_eq!(comparable_timestamp(&p), 42);

        p.meta = Some(ProductMeta {
            updated_at: Some("1970-01-01T00:00:01Z".into()),
            ..Default::default()
        });
        assert_eq!(comparable_timestamp(&p), 1000);

        p.meta = Some(ProductMeta {
            created_at: Some("not a date".into()),
            updated_at: Some("1970-01-01T00:00:01Z".into()),
            ..Default::default()
        });
        assert_eq!(comparable_timestamp(&p), 42);
    }

    #[test]
    fn date_only_timestamps_sort_by_date() {
        let mut p = product(42, "x", "b", "c", Some("1970-01-02"));
        assert_eq!(comparable_timestamp(&p), 86_400_000);

        p.meta = Some(ProductMeta {
            created_at: Some("2024-13-40".into()),
            ..Default::default()
        });
        assert_eq!(comparable_timestamp(&p), 42);

        let mut set = vec![
            product(900, "late", "b", "c", Some("2024-06-01T00:00:00Z")),
            product(901, "bare", "b", "c", Some("2024-05-23")),
            product(902, "early", "b", "c", Some("2024-05-01T00:00:00Z")),
        ];
        set.reverse();
        let mut rows: Vec<&Product> = set.iter().collect();
        sort_products(&mut rows, SortOrder::Newest);
        let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![900, 901, 902]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let same = Some("2024-01-01T00:00:00Z");
        let set = vec![
            product(10, "a", "b", "c", same),
            product(11, "b", "b", "c", same),
            product(12, "c", "b", "c", same),
        ];
        for order in [SortOrder::Newest, SortOrder::Oldest] {
            let filters = FilterState {
                sort: order,
                ..Default::default()
            };
            let view = project(&set, &filters, PRODUCT_PAGE_SIZE);
            assert_eq!(ids(&view), vec![10, 11, 12]);
        }
    }

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(100, 10), 10);
    }

    #[test]
    fn page_is_clamped_for_every_count() {
        for count in 0..45usize {
            let set: Vec<Product> = (0..count as i64)
                .map(|i| product(i, "t", "b", "c", None))
                .collect();
            for requested in [1u32, 2, 3, 5, 99] {
                let filters = FilterState {
                    page: requested,
                    ..Default::default()
                };
                let view = project(&set, &filters, PRODUCT_PAGE_SIZE);
                let expected_pages = std::cmp::max(1, count.div_ceil(PRODUCT_PAGE_SIZE)) as u32;
                assert_eq!(view.total_pages, expected_pages);
                assert!(view.page >= 1 && view.page <= view.total_pages);
                assert!(view.products.len() <= PRODUCT_PAGE_SIZE);
            }
        }
    }

    #[test]
    fn pagination_slices_pages_of_ten() {
        let set: Vec<Product> = (1..=25)
            .map(|i| product(i, "t", "b", "c", None))
            .collect();
        let filters = FilterState {
            page: 3,
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        let view = project(&set, &filters, PRODUCT_PAGE_SIZE);
        assert_eq!(ids(&view), vec![21, 22, 23, 24, 25]);
        assert_eq!(view.first_row(), 21);
        assert_eq!(view.last_row(), 25);
        assert!(view.has_prev());
        assert!(!view.has_next());
    }

    #[test]
    fn empty_result_on_late_page_clamps_to_one() {
        let filters = FilterState {
            page: 3,
            brand: "Nokia".into(),
            ..Default::default()
        };
        let view = project(&mixed_set(), &filters, PRODUCT_PAGE_SIZE);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_items, 0);
        assert_eq!(view.first_row(), 0);
        assert_eq!(view.last_row(), 0);
        assert!(view.products.is_empty());
    }

    #[test]
    fn paginate_out_of_range_is_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 5, 2).is_empty());
        assert_eq!(paginate(&items, 2, 2), &[3]);
    }

    #[test]
    fn summary_text() {
        let filters = FilterState {
            brand: "Samsung".into(),
            category: "laptops".into(),
            ..Default::default()
        };
        let view = project(&mixed_set(), &filters, PRODUCT_PAGE_SIZE);
        assert_eq!(view.summary(), "1 result · sorted by newest first · page 1 of 1");
    }
}
