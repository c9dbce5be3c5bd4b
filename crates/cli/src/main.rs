//! Mercadito CLI - Terminal front-end for the store.
//!
//! # Usage
//!
//! ```bash
//! # Browse anonymously
//! mercadito products
//! mercadito product alpaca-sweater
//! mercadito cart add alpaca-sweater --qty 2 --size M
//!
//! # Log in and check out
//! mercadito auth login -e ana@example.com -p secret
//! mercadito order create --full-name "Ana Torres" --email ana@example.com \
//!     --mobile 5551234 --address "Av. Siempre Viva 742" --city Lima \
//!     --state Lima --country PE
//!
//! # Vendor back-office
//! mercadito vendor stats
//! mercadito vendor coupons create -c VERANO20 -d 20
//! ```
//!
//! # Environment Variables
//!
//! - `MERCADITO_API_URL` - Base URL of the store API
//! - `MERCADITO_STATE_FILE` - Path of the persisted session state file
//! - `RUST_LOG` - Tracing filter (default: `mercadito=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal front-end: stdout is the UI.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use mercadito_client::session::FileStore;
use mercadito_client::{ApiClient, ClientConfig, Session};

mod commands;

use commands::{account, auth, cart, catalog, orders, vendor};

#[derive(Parser)]
#[command(name = "mercadito")]
#[command(author, version, about = "Mercadito storefront terminal client")]
struct Cli {
    /// Override the store API base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, register, and manage the session
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// List catalog products
    Products {
        /// Full-text search instead of listing everything
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product by slug
    Product {
        /// Product slug
        slug: String,
    },
    /// List product categories
    Categories,
    /// Show the reviews of a product
    Reviews {
        /// Product slug
        slug: String,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
    },
    /// Create and inspect orders
    Order {
        #[command(subcommand)]
        action: orders::OrderAction,
    },
    /// List the logged-in user's orders
    Orders,
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<account::WishlistAction>,
    },
    /// Show notifications
    Notifications {
        /// Mark this notification as seen
        #[arg(long)]
        seen: Option<i32>,
    },
    /// Vendor back-office
    Vendor {
        #[command(subcommand)]
        action: vendor::VendorAction,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info level for our
    // crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mercadito=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        if matches!(e, mercadito_client::ApiError::Unauthorized) {
            tracing::error!("Session expired - run `mercadito auth login` to continue");
        }
        std::process::exit(1);
    }
}

fn build_client(api_url: Option<&str>) -> Result<ApiClient, mercadito_client::ApiError> {
    let config = match api_url {
        Some(url) => {
            let state_file = ClientConfig::from_env()
                .map(|c| c.state_file)
                .map_err(config_error)?;
            ClientConfig::for_api_url(url, state_file).map_err(config_error)?
        }
        None => ClientConfig::from_env().map_err(config_error)?,
    };

    let store = FileStore::new(config.state_file.clone());
    let session = Session::new(&config, Box::new(store));
    Ok(ApiClient::new(&config, session))
}

fn config_error(e: mercadito_client::config::ConfigError) -> mercadito_client::ApiError {
    mercadito_client::ApiError::Validation(e.to_string())
}

async fn run(cli: Cli) -> Result<(), mercadito_client::ApiError> {
    let client = build_client(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Auth { action } => auth::run(&client, action).await,
        Commands::Products { search } => catalog::products(&client, search.as_deref()).await,
        Commands::Product { slug } => catalog::product(&client, &slug).await,
        Commands::Categories => catalog::categories(&client).await,
        Commands::Reviews { slug } => catalog::reviews(&client, &slug).await,
        Commands::Cart { action } => cart::run(&client, action).await,
        Commands::Order { action } => orders::run(&client, action).await,
        Commands::Orders => account::my_orders(&client).await,
        Commands::Wishlist { action } => account::wishlist(&client, action).await,
        Commands::Notifications { seen } => account::notifications(&client, seen).await,
        Commands::Vendor { action } => vendor::run(&client, action).await,
    }
}
