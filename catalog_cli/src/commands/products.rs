use anyhow::{anyhow, Result};
use catalog_lib::{CachedClient, FilterUpdate, ProductListController, SortOrder};
use clap::Args;

use crate::output::{print_facets, print_products, OutputFormat};

#[derive(Args)]
pub struct ProductsArgs {
    /// Start from a saved query string, e.g. "brand=Apple&page=2"
    #[arg(long, default_value = "")]
    pub query: String,

    /// Page of the filtered list (10 rows per page)
    #[arg(long)]
    pub page: Option<i64>,

    /// Search title and brand
    #[arg(long)]
    pub search: Option<String>,

    /// Exact brand; empty for all
    #[arg(long)]
    pub brand: Option<String>,

    /// Exact category; empty for all
    #[arg(long)]
    pub category: Option<String>,

    /// Sort order: newest, oldest
    #[arg(long)]
    pub sort: Option<String>,

    /// Also print the brand and category options
    #[arg(long)]
    pub facets: bool,
}

/// Turns the filter flags into one update. Changing any filter sends the list
/// back to page 1 unless `--page` is given too.
pub fn build_update(args: &ProductsArgs) -> Result<FilterUpdate> {
    let mut update = FilterUpdate::default();
    if let Some(search) = &args.search {
        update = update.with_search(search.trim());
    }
    if let Some(brand) = &args.brand {
        update = update.with_brand(brand);
    }
    if let Some(category) = &args.category {
        update = update.with_category(category);
    }
    if let Some(sort) = &args.sort {
        let sort: SortOrder = sort
            .parse()
            .map_err(|_| anyhow!("unknown sort '{}': expected newest or oldest", sort))?;
        update = update.with_sort(sort);
    }
    if !update.is_empty() {
        update = update.with_page(1);
    }
    if let Some(page) = args.page {
        update = update.with_page(page);
    }
    Ok(update)
}

pub async fn run(args: &ProductsArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let mut controller = ProductListController::from_query(client, &args.query);
    let update = build_update(args)?;
    if !update.is_empty() {
        controller.update(update);
    }

    let view = controller.load().await?;

    eprintln!("{}", view.summary());
    print_products(&view.products, format)?;
    if args.facets {
        print_facets(&view.facets, format)?;
    }
    eprintln!("?{}", controller.query_string());

    Ok(())
}
