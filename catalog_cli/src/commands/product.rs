use anyhow::Result;
use catalog_lib::types::ProductID;
use catalog_lib::CachedClient;
use clap::Args;

use crate::output::{print_product_detail, OutputFormat};

#[derive(Args)]
pub struct ProductArgs {
    /// Product ID
    pub id: ProductID,
}

pub async fn run(args: &ProductArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let product = client.get_product(args.id).await?;
    print_product_detail(&product, format)
}
