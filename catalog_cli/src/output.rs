use anyhow::Result;
use catalog_lib::projection::Facets;
use catalog_lib::types::Product;
use chrono::DateTime;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct ProductRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Brand")]
    #[serde(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Rating")]
    #[serde(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Stock")]
    #[serde(rename = "Stock")]
    stock: u32,
    #[tabled(rename = "Created")]
    #[serde(rename = "Created")]
    created: String,
}

#[derive(Tabled, Serialize)]
struct DetailRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct FacetRow {
    #[tabled(rename = "Facet")]
    #[serde(rename = "Facet")]
    facet: &'static str,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

// -- Row builders --

fn build_product_rows(products: &[Product]) -> Vec<ProductRow> {
    products
        .iter()
        .map(|p| ProductRow {
            id: p.id,
            title: p.title.clone(),
            brand: p.brand.clone(),
            category: p.category.clone(),
            price: format_price(p.price),
            rating: format_rating(p.rating),
            stock: p.stock,
            created: format_date(p.meta.as_ref().and_then(|m| m.created_at.as_deref())),
        })
        .collect()
}

fn build_detail_rows(product: &Product) -> Vec<DetailRow> {
    let meta = product.meta.as_ref();
    let or_dash = |v: Option<&String>| v.cloned().unwrap_or_else(|| "—".to_string());
    vec![
        DetailRow { field: "ID", value: product.id.to_string() },
        DetailRow { field: "Title", value: product.title.clone() },
        DetailRow { field: "Description", value: product.description.clone() },
        DetailRow { field: "Price", value: format!("${:.2}", product.price) },
        DetailRow {
            field: "Status",
            value: product
                .availability_status
                .clone()
                .unwrap_or_else(|| "Status TBD".to_string()),
        },
        DetailRow { field: "Rating", value: format!("{}/5", product.rating) },
        DetailRow { field: "Stock", value: product.stock.to_string() },
        DetailRow { field: "Brand", value: product.brand.clone() },
        DetailRow { field: "Category", value: product.category.clone() },
        DetailRow {
            field: "Weight",
            value: product
                .weight
                .filter(|w| *w > 0.0)
                .map(|w| format!("{} kg", w))
                .unwrap_or_else(|| "—".to_string()),
        },
        DetailRow {
            field: "Dimensions",
            value: product
                .dimensions
                .map(|d| format!("{} × {} × {}", d.width, d.height, d.depth))
                .unwrap_or_else(|| "—".to_string()),
        },
        DetailRow {
            field: "Shipping",
            value: or_dash(product.shipping_information.as_ref()),
        },
        DetailRow {
            field: "Warranty",
            value: or_dash(product.warranty_information.as_ref()),
        },
        DetailRow {
            field: "Created",
            value: product
                .created_at()
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        },
        DetailRow {
            field: "Barcode",
            value: or_dash(meta.and_then(|m| m.barcode.as_ref())),
        },
    ]
}

fn build_facet_rows(facets: &Facets) -> Vec<FacetRow> {
    facets
        .brands
        .iter()
        .map(|b| FacetRow { facet: "brand", value: b.clone() })
        .chain(
            facets
                .categories
                .iter()
                .map(|c| FacetRow { facet: "category", value: c.clone() }),
        )
        .collect()
}

// -- Table output --

fn render<T: Tabled>(rows: Vec<T>, format: &OutputFormat) -> String {
    let mut table = Table::new(rows);
    if *format == OutputFormat::Markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

fn write_csv<T: Serialize>(rows: Vec<T>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_products(products: &[Product], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("{}", render(build_product_rows(products), format))
        }
        OutputFormat::Json => print_json(&products),
        OutputFormat::Csv => write_csv(build_product_rows(products))?,
    }
    Ok(())
}

pub fn print_product_detail(product: &Product, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("{}", render(build_detail_rows(product), format))
        }
        OutputFormat::Json => print_json(product),
        OutputFormat::Csv => write_csv(build_detail_rows(product))?,
    }
    Ok(())
}

pub fn print_facets(facets: &Facets, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("{}", render(build_facet_rows(facets), format))
        }
        OutputFormat::Json => print_json(facets),
        OutputFormat::Csv => write_csv(build_facet_rows(facets))?,
    }
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// US dollar amount with thousands separators, e.g. `$1,999.99`.
fn format_price(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

fn format_rating(rating: f64) -> String {
    format!("{:.1} / 5", rating)
}

/// `May 23, 2024`, or `—` when missing or unparseable.
fn format_date(value: Option<&str>) -> String {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|t| t.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}
