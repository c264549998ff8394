//! Interactive session over one shared cache.
//!
//! Filter commands rewrite the query string and re-render the list. While a
//! list that is not cached loads, the previous dataset is shown re-projected
//! with the new filters.

use std::time::Duration;

use anyhow::Result;
use catalog_lib::auth::SessionStore;
use catalog_lib::types::ProductID;
use catalog_lib::{
    CachedClient, CatalogError, FilterUpdate, ProductForm, ProductListController,
    ProductListView, SortOrder,
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{print_facets, print_product_detail, print_products, OutputFormat};
use crate::prompt::Prompt;

#[derive(Args)]
pub struct ShellArgs {
    /// Start from a saved query string, e.g. "brand=Apple&page=2"
    #[arg(long, default_value = "")]
    pub query: String,
}

const HELP: &str = "\
Commands:
  show | list          render the current page
  search <text>        search title and brand (empty clears)
  brand <name>         filter by brand (empty clears)
  category <name>      filter by category (empty clears)
  sort newest|oldest   change the sort order
  page <n> | next | prev
  reset                clear all filters
  refresh              drop the cached list and fetch again
  retry                repeat the last failed request
  open <id>            show one product
  create               add a product (kept for this session)
  facets               list brand and category options
  url                  print the current query string
  whoami | logout
  help | quit";

/// What `retry` repeats.
#[derive(Clone, Copy)]
enum Action {
    List,
    Open(ProductID),
}

pub async fn run(
    args: &ShellArgs,
    client: &CachedClient,
    session: &SessionStore,
    format: &OutputFormat,
) -> Result<()> {
    let mut controller = ProductListController::from_query(client, &args.query);
    let mut prompt = Prompt::new();
    let mut last = Action::List;

    eprintln!("Type `help` for commands.");
    show_list(&mut controller, format).await;

    while let Some(line) = prompt.ask("catalog> ").await? {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => continue,
            "help" | "?" => println!("{}", HELP),
            "quit" | "exit" => break,
            "show" | "list" => {
                last = Action::List;
                show_list(&mut controller, format).await;
            }
            "retry" => match last {
                Action::List => show_list(&mut controller, format).await,
                Action::Open(id) => open(client, id, format).await,
            },
            "search" => {
                controller.update(FilterUpdate::search(rest));
                show_list(&mut controller, format).await;
            }
            "brand" => {
                controller.update(FilterUpdate::brand(rest));
                show_list(&mut controller, format).await;
            }
            "category" => {
                controller.update(FilterUpdate::category(rest));
                show_list(&mut controller, format).await;
            }
            "sort" => match rest.parse::<SortOrder>() {
                Ok(sort) => {
                    controller.update(FilterUpdate::sort(sort));
                    show_list(&mut controller, format).await;
                }
                Err(()) => eprintln!("Unknown sort '{}': expected newest or oldest", rest),
            },
            "page" => match rest.parse::<i64>() {
                Ok(page) => {
                    controller.update(FilterUpdate::page(page));
                    show_list(&mut controller, format).await;
                }
                Err(_) => eprintln!("Usage: page <n>"),
            },
            "next" => {
                if controller.next_page() {
                    show_list(&mut controller, format).await;
                } else {
                    eprintln!("Already on the last page");
                }
            }
            "prev" => {
                if controller.prev_page() {
                    show_list(&mut controller, format).await;
                } else {
                    eprintln!("Already on the first page");
                }
            }
            "reset" => {
                controller.reset();
                show_list(&mut controller, format).await;
            }
            "refresh" => {
                last = Action::List;
                let pb = spinner("refreshing products...");
                let result = controller.refresh().await;
                pb.finish_and_clear();
                match result {
                    Ok(view) => render(&view, &controller.query_string(), format),
                    Err(e) => report(&e),
                }
            }
            "open" => match rest.parse::<ProductID>() {
                Ok(id) => {
                    last = Action::Open(id);
                    open(client, id, format).await;
                }
                Err(_) => eprintln!("Usage: open <id>"),
            },
            "create" => {
                let Some(input) = prompt.complete_form(ProductForm::default()).await? else {
                    eprintln!("Cancelled");
                    continue;
                };
                match client.create_product(input) {
                    Ok(product) => {
                        eprintln!("Created product {}", product.id);
                        last = Action::List;
                        controller.reset();
                        show_list(&mut controller, format).await;
                    }
                    Err(e) => report(&e),
                }
            }
            "facets" => match controller.last_view() {
                Some(view) => print_or_report(print_facets(&view.facets, format)),
                None => eprintln!("Nothing loaded yet; type `show` first"),
            },
            "url" => println!("?{}", controller.query_string()),
            "whoami" => match session.current_user() {
                Some(user) => println!("{}", user.username),
                None => eprintln!("Not signed in"),
            },
            "logout" => {
                session.logout()?;
                eprintln!("Signed out");
                break;
            }
            other => eprintln!("Unknown command '{}'. Type `help`.", other),
        }
    }

    Ok(())
}

async fn show_list(controller: &mut ProductListController<'_>, format: &OutputFormat) {
    let pb = if controller.is_fresh() {
        None
    } else {
        if let Some(previous) = controller.placeholder_view() {
            eprintln!("(previous results while loading)");
            render(&previous, &controller.query_string(), format);
        }
        Some(spinner("loading products..."))
    };

    let result = controller.load().await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match result {
        Ok(view) => render(&view, &controller.query_string(), format),
        Err(e) => report(&e),
    }
}

async fn open(client: &CachedClient, id: ProductID, format: &OutputFormat) {
    let pb = spinner("loading product...");
    let result = client.get_product(id).await;
    pb.finish_and_clear();
    match result {
        Ok(product) => print_or_report(print_product_detail(&product, format)),
        Err(e) => report(&e),
    }
}

fn render(view: &ProductListView, query: &str, format: &OutputFormat) {
    eprintln!("{}", view.summary());
    if view.products.is_empty() {
        eprintln!("No products match these filters. Type `reset` to clear them.");
    } else {
        print_or_report(print_products(&view.products, format));
        eprintln!(
            "Showing {}-{} of {}",
            view.first_row(),
            view.last_row(),
            view.total_items
        );
    }
    eprintln!("?{}", query);
}

fn report(err: &CatalogError) {
    match err {
        CatalogError::LocalProductNotFound(_) => {
            eprintln!("{}", err);
            eprintln!("Type `show` to go back to the list.");
        }
        _ if err.is_retryable() => {
            eprintln!("Error: {}", err);
            eprintln!("Type `retry` to try again.");
        }
        _ => eprintln!("Error: {}", err),
    }
}

fn print_or_report(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
