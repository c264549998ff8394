mod commands;
mod output;
mod prompt;
mod shell;

use anyhow::Result;
use catalog_lib::auth::SessionStore;
use catalog_lib::{CachedClient, CatalogConfig};
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Browse, filter and add products in the DummyJSON catalog")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a mock session
    Login(commands::auth::LoginArgs),
    /// End the current session
    Logout,
    /// Print the signed-in user
    Whoami,
    /// List products with filters, sort and pagination
    Products(commands::products::ProductsArgs),
    /// Show one product
    Product(commands::product::ProductArgs),
    /// Create a product locally
    Create(commands::create::CreateArgs),
    /// Interactive session sharing one cache
    Shell(shell::ShellArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = CatalogConfig::from_env();
    let session = SessionStore::new(&config.auth_file);

    match &cli.command {
        Commands::Login(args) => return commands::auth::login(args, &session).await,
        Commands::Logout => return commands::auth::logout(&session),
        Commands::Whoami => return commands::auth::whoami(&session, &format),
        _ => {}
    }

    // Everything below is behind the session.
    session.require_user()?;
    let client = CachedClient::from_config(&config);

    match &cli.command {
        Commands::Products(args) => commands::products::run(args, &client, &format).await?,
        Commands::Product(args) => commands::product::run(args, &client, &format).await?,
        Commands::Create(args) => commands::create::run(args, &client, &format).await?,
        Commands::Shell(args) => shell::run(args, &client, &session, &format).await?,
        Commands::Login(_) | Commands::Logout | Commands::Whoami => {}
    }

    Ok(())
}
