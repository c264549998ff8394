use anyhow::{bail, Result};
use catalog_lib::{CachedClient, ProductForm};
use clap::Args;

use crate::output::{print_product_detail, OutputFormat};
use crate::prompt::Prompt;

/// Missing fields are prompted for on stdin.
#[derive(Args)]
pub struct CreateArgs {
    /// At least 3 characters
    #[arg(long)]
    pub title: Option<String>,

    /// At least 10 characters
    #[arg(long)]
    pub description: Option<String>,

    /// Positive number
    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Non-negative whole number
    #[arg(long)]
    pub stock: Option<String>,
}

impl CreateArgs {
    pub fn to_form(&self) -> ProductForm {
        ProductForm {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            price: self.price.clone().unwrap_or_default(),
            brand: self.brand.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            stock: self.stock.clone().unwrap_or_default(),
        }
    }
}

pub async fn run(args: &CreateArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let mut prompt = Prompt::new();
    let Some(input) = prompt.complete_form(args.to_form()).await? else {
        bail!("product not created");
    };

    let product = client.create_product(input)?;
    eprintln!(
        "Created product {} (kept in this process only; use `catalog shell` to browse it)",
        product.id
    );
    print_product_detail(&product, format)
}
