//! # Seed Data Generator
//!
//! Populates the database with categories and demo carts for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./storefront.db (or $STOREFRONT_DB_PATH)
//! cargo run -p storefront-db --bin seed
//!
//! # Specify database path and number of demo carts
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db --carts 10
//! ```
//!
//! ## Logging
//! `RUST_LOG` overrides the default `info,storefront=debug,sqlx=warn`.

use std::env;
use std::sync::Arc;

use storefront_core::{CartItem, ModelRegistry, NewCart, NewCategory, ObjectId};
use storefront_db::{Database, DbConfig, DbError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (name, slug, image)
const CATEGORIES: &[(&str, &str, Option<&str>)] = &[
    ("Beverages", "beverages", Some("/images/categories/beverages.png")),
    ("Snacks", "snacks", Some("/images/categories/snacks.png")),
    ("Dairy", "dairy", None),
    ("Frozen", "frozen", None),
    ("Grocery", "grocery", Some("/images/categories/grocery.png")),
    ("Produce", "produce", None),
];

/// Demo carts created when `--carts` is absent or unparsable.
const DEFAULT_CARTS: usize = 5;

/// Weighed and counted quantities for demo cart lines.
const QUANTITIES: &[f64] = &[1.0, 2.0, 0.5, 0.25, 3.0, 1.75];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env();
    let mut carts: usize = DEFAULT_CARTS;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--db" => {
                if i + 1 < args.len() {
                    config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "-c" | "--carts" => {
                if i + 1 < args.len() {
                    carts = parse_carts(&args[i + 1]);
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $STOREFRONT_DB_PATH or ./storefront.db)");
                println!("  -c, --carts <N>    Number of demo carts to create (default: 5)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let registry = Arc::new(ModelRegistry::new());
    let db = Database::new(config, registry).await?;
    info!("Connected to database, migrations applied");

    let mut created = 0;
    for (name, slug, image) in CATEGORIES {
        let mut input = NewCategory::new(*name, *slug);
        if let Some(image) = image {
            input = input.with_image(*image);
        }

        match db.categories().create(&input).await {
            Ok(_) => created += 1,
            Err(DbError::UniqueViolation { field, value }) => {
                warn!(%field, %value, "Category already present, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }
    let total = db.categories().count().await?;
    info!(created, total, "Categories seeded");

    for seed in 0..carts {
        let items = (0..=seed % 3)
            .map(|line| CartItem::new(ObjectId::new(), QUANTITIES[(seed + line) % QUANTITIES.len()]))
            .collect();

        db.carts().create(&NewCart::new(ObjectId::new(), items)).await?;
    }
    let total = db.carts().count().await?;
    info!(created = carts, total, "Demo carts seeded");

    db.close().await;
    println!("✓ Seed complete!");

    Ok(())
}

/// Parses the `--carts` value, falling back to the default with a warning.
fn parse_carts(value: &str) -> usize {
    match value.parse() {
        Ok(carts) => carts,
        Err(e) => {
            warn!(%value, error = %e, default = DEFAULT_CARTS, "Invalid --carts value, using default");
            DEFAULT_CARTS
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_carts() {
        assert_eq!(parse_carts("12"), 12);
        assert_eq!(parse_carts("0"), 0);
        assert_eq!(parse_carts("ten"), DEFAULT_CARTS);
        assert_eq!(parse_carts("-3"), DEFAULT_CARTS);
    }
}
