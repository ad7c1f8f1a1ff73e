//! Command-line front end for the Shopfront API.
//!
//! # Usage
//!
//! ```bash
//! # Browse the storefront as a signed-in user
//! cargo run -p shopfront-client -- --email jane@example.com --password hunter22 products --page 2
//!
//! # Create a category as an admin
//! cargo run -p shopfront-client -- --email admin@example.com --password secret add-category Phones
//! ```
//!
//! The API root comes from `--base-url`, then `SHOPFRONT_API_URL`, then
//! `http://localhost:3000/api`. Results are printed as pretty JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use shopfront_client::types::ProductFilter;
use shopfront_client::{ApiClient, Scope};
use shopfront_domain::id::{CategoryId, ProductId, SubCategoryId};

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Parser)]
#[command(about = "Talk to a Shopfront API from the terminal")]
struct Args {
    /// API root including the `/api` prefix
    #[arg(long)]
    base_url: Option<String>,

    /// Sign in with this email before running the command
    #[arg(long, requires = "password")]
    email: Option<String>,

    #[arg(long)]
    password: Option<String>,

    /// Read the catalog through the admin routes
    #[arg(long)]
    admin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account; prints the new user
    Signup {
        name: String,
        email: String,
        password: String,
    },
    Categories,
    Subcategories,
    Products {
        #[arg(long)]
        page: Option<u64>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        subcategory: Option<SubCategoryId>,
    },
    Product {
        id: ProductId,
    },
    AddCategory {
        name: String,
    },
    AddSubcategory {
        category_id: CategoryId,
        name: String,
    },
    Wishlist,
    Wish {
        product_id: ProductId,
    },
    Unwish {
        product_id: ProductId,
    },
    ClearWishlist,
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let base_url = args
        .base_url
        .or_else(|| std::env::var("SHOPFRONT_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
    let client = ApiClient::new(&base_url)?;

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        let user = client
            .signin(email, password)
            .await
            .context("sign in failed")?;
        tracing::info!(user = %user.email, role = user.role.as_str(), "signed in");
    }

    let scope = if args.admin { Scope::Admin } else { Scope::User };
    match args.command {
        Command::Signup {
            name,
            email,
            password,
        } => print(&client.signup(&name, &email, &password).await?),
        Command::Categories => print(&client.categories(scope).await?),
        Command::Subcategories => print(&client.subcategories(scope).await?),
        Command::Products {
            page,
            limit,
            search,
            subcategory,
        } => {
            let filter = ProductFilter {
                page,
                limit,
                search,
                subcategory,
            };
            print(&client.products(scope, &filter).await?)
        }
        Command::Product { id } => print(&client.product(scope, id).await?),
        Command::AddCategory { name } => print(&client.add_category(&name).await?),
        Command::AddSubcategory { category_id, name } => {
            print(&client.add_subcategory(category_id, &name).await?)
        }
        Command::Wishlist => print(&client.wishlist().await?),
        Command::Wish { product_id } => print(&client.add_to_wishlist(product_id).await?),
        Command::Unwish { product_id } => print(&client.remove_from_wishlist(product_id).await?),
        Command::ClearWishlist => print(&client.clear_wishlist().await?),
    }
}
