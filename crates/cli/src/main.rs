//! Recipe Shelf CLI - database migrations and sample data.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! shelf-cli migrate
//!
//! # Seed a shop with the bundled sample recipes
//! shelf-cli seed --shop test-store.myshopify.com
//!
//! # Seed from another file
//! shelf-cli seed --shop test-store.myshopify.com --file recipes.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shelf-cli")]
#[command(author, version, about = "Recipe Shelf CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert sample recipes into a shop
    Seed {
        /// Shop domain (e.g. `store.myshopify.com`)
        #[arg(short, long)]
        shop: String,

        /// YAML file with recipes
        #[arg(short, long, default_value = "crates/cli/data/sample_recipes.yaml")]
        file: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { shop, file } => commands::seed::recipes(&shop, &file).await?,
    }
    Ok(())
}
