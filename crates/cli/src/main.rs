//! Creator Market CLI - drive the storefront stores from a terminal.
//!
//! Each invocation rehydrates the stores from the data directory, runs one
//! command, and exits. State written by one command is visible to the next.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! cm-cli products --trending
//! cm-cli product p2
//!
//! # Fill the cart
//! cm-cli cart add p1
//! cm-cli cart set p1 3
//! cm-cli wishlist add p2
//! cm-cli wishlist move p2
//!
//! # Sign in and check out
//! cm-cli login -e user@test.com -p test123456
//! cm-cli checkout --first-name Ada --last-name Lovelace ... --payment paypal
//! ```
//!
//! # Commands
//!
//! - `products`, `product`, `creators`, `creator`, `categories` - Catalog lookups
//! - `cart` - Show or change the cart
//! - `wishlist` - Show or change the wishlist
//! - `login`, `signup`, `logout`, `whoami` - Session
//! - `checkout` - Place an order for the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use creator_market_core::{ProductId, UserRole};
use creator_market_storefront::{AppError, AppState, StorefrontConfig};

#[allow(clippy::print_stdout)]
mod commands;

#[derive(Parser)]
#[command(name = "cm-cli")]
#[command(author, version, about = "Creator Market storefront shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only products in this category
        #[arg(long)]
        category: Option<String>,

        /// Only products sold by this creator handle
        #[arg(long)]
        creator: Option<String>,

        /// Only trending products
        #[arg(long)]
        trending: bool,
    },
    /// Show one product
    Product {
        /// Product id
        id: String,
    },
    /// List creator shops
    Creators,
    /// Show one creator shop and its products
    Creator {
        /// Creator handle
        handle: String,
    },
    /// List categories
    Categories,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Show or change the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
    /// Sign in with a test account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Account role (`user`, `creator`)
        #[arg(short, long, default_value = "user")]
        role: UserRole,
    },
    /// Create an account
    Signup(commands::account::SignupArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Place an order for the cart
    Checkout(commands::checkout::CheckoutArgs),
}

#[derive(Subcommand)]
enum CartAction {
    /// List items and total
    Show,
    /// Add one unit of a product
    Add { id: String },
    /// Remove a product
    Remove { id: String },
    /// Set a product's quantity (below 1 removes it)
    Set {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List saved products
    Show,
    /// Save a product
    Add { id: String },
    /// Forget a product
    Remove { id: String },
    /// Move a product into the cart
    Move { id: String },
    /// Empty the wishlist
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "creator_market_storefront=info,cm_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = match AppState::open(config) {
        Ok(state) => state,
        Err(e) => {
            AppError::from(e).report();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, &state).await {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, state: &AppState) -> Result<(), AppError> {
    match cli.command {
        Commands::Products {
            category,
            creator,
            trending,
        } => commands::catalog::products(state, category.as_deref(), creator.as_deref(), trending),
        Commands::Product { id } => commands::catalog::product(state, &ProductId::new(id)),
        Commands::Creators => {
            commands::catalog::creators(state);
            Ok(())
        }
        Commands::Creator { handle } => commands::catalog::creator(state, &handle),
        Commands::Categories => {
            commands::catalog::categories(state);
            Ok(())
        }
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => {
                commands::cart::show(state).await;
                Ok(())
            }
            CartAction::Add { id } => commands::cart::add(state, &ProductId::new(id)).await,
            CartAction::Remove { id } => commands::cart::remove(state, &ProductId::new(id)).await,
            CartAction::Set { id, quantity } => {
                commands::cart::set(state, &ProductId::new(id), quantity).await
            }
            CartAction::Clear => commands::cart::clear(state).await,
        },
        Commands::Wishlist { action } => match action.unwrap_or(WishlistAction::Show) {
            WishlistAction::Show => {
                commands::wishlist::show(state).await;
                Ok(())
            }
            WishlistAction::Add { id } => {
                commands::wishlist::add(state, &ProductId::new(id)).await
            }
            WishlistAction::Remove { id } => {
                commands::wishlist::remove(state, &ProductId::new(id)).await
            }
            WishlistAction::Move { id } => {
                commands::wishlist::move_to_cart(state, &ProductId::new(id)).await
            }
            WishlistAction::Clear => commands::wishlist::clear(state).await,
        },
        Commands::Login {
            email,
            password,
            role,
        } => commands::account::login(state, &email, password, role).await,
        Commands::Signup(args) => commands::account::signup(state, args).await,
        Commands::Logout => commands::account::logout(state).await,
        Commands::Whoami => {
            commands::account::whoami(state).await;
            Ok(())
        }
        Commands::Checkout(args) => commands::checkout::place_order(state, args).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use creator_market_storefront::services::checkout::PaymentMethod;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_quantity_parses() {
        let cli = Cli::try_parse_from(["cm-cli", "cart", "set", "p1", "-1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: Some(CartAction::Set { quantity: -1, .. })
            })
        ));
    }

    #[test]
    fn test_payment_method_parses() {
        let cli = Cli::try_parse_from([
            "cm-cli",
            "checkout",
            "--first-name",
            "Ada",
            "--payment",
            "paypal",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Checkout(args)) if args.payment == PaymentMethod::PayPal
        ));
    }
}
