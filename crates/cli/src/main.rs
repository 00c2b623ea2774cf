//! Backstock CLI - Database migrations, customer accounts, and catalog lookups.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! backstock migrate
//!
//! # Register a customer (password read from stdin)
//! echo 'secret123' | backstock customer register -e alice@example.com -f Alice -l Liddell
//!
//! # Sign in / sign out
//! echo 'secret123' | backstock customer sign-in -e alice@example.com
//! backstock customer sign-out --id 1
//!
//! # Catalog
//! backstock catalog products --promotions
//! backstock catalog orders --customer-id 1
//! ```
//!
//! Results are written to stdout as JSON; logs go to stderr.
//!
//! # Logging
//!
//! - `RUST_LOG` - Filter directives (default: `backstock_store=info,backstock_cli=info`)
//! - `BACKSTOCK_LOG_FORMAT` - `json` for structured logs, anything else for text

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "backstock")]
#[command(author, version, about = "Backstock storefront data tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage customer accounts and sessions
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Look up products and orders
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Register a new customer (reads the password from stdin)
    Register {
        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Given name
        #[arg(short, long)]
        first_name: String,

        /// Family name
        #[arg(short, long)]
        last_name: String,
    },
    /// Sign a customer in (reads the password from stdin)
    SignIn {
        /// Customer email address
        #[arg(short, long)]
        email: String,
    },
    /// Sign a customer out
    SignOut {
        /// Customer ID
        #[arg(long)]
        id: i32,
    },
    /// Show a customer by ID
    Show {
        /// Customer ID
        #[arg(long)]
        id: i32,
    },
    /// Find customers by name
    Find {
        /// Given name
        #[arg(short, long)]
        first_name: String,

        /// Family name
        #[arg(short, long)]
        last_name: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    Products {
        /// Only list products on promotion
        #[arg(long)]
        promotions: bool,
    },
    /// Show a product by ID
    Product {
        /// Product ID
        #[arg(long)]
        id: i32,
    },
    /// List a customer's orders
    Orders {
        /// Customer ID
        #[arg(long)]
        customer_id: i32,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "backstock_store=info,backstock_cli=info".into());

    let json = std::env::var("BACKSTOCK_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Customer { action } => match action {
            CustomerAction::Register {
                email,
                first_name,
                last_name,
            } => commands::customer::register(email, first_name, last_name).await?,
            CustomerAction::SignIn { email } => commands::customer::sign_in(&email).await?,
            CustomerAction::SignOut { id } => commands::customer::sign_out(id).await?,
            CustomerAction::Show { id } => commands::customer::show(id).await?,
            CustomerAction::Find {
                first_name,
                last_name,
            } => commands::catalog::customers_by_name(&first_name, &last_name).await?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Products { promotions } => {
                commands::catalog::products(promotions).await?;
            }
            CatalogAction::Product { id } => commands::catalog::product(id).await?,
            CatalogAction::Orders { customer_id } => {
                commands::catalog::orders(customer_id).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sign_out() {
        let cli = Cli::try_parse_from(["backstock", "customer", "sign-out", "--id", "7"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Customer {
                action: CustomerAction::SignOut { id: 7 }
            })
        ));
    }

    #[test]
    fn test_parse_promotions_flag() {
        let cli = Cli::try_parse_from(["backstock", "catalog", "products", "--promotions"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Catalog {
                action: CatalogAction::Products { promotions: true }
            })
        ));
    }
}
