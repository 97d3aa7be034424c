//! # Seed Data Generator
//!
//! Populates the catalog with products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 40 products (default)
//! cargo run -p cartcheck-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p cartcheck-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p cartcheck-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Products
//! Each product has:
//! - Random UUID id
//! - Name: `{base} {size}`, with a `#N` batch suffix once all 42 pairs are used
//! - Price: $0.99 - $19.99
//! - Stock: 0 - 12 (every seventh product is out of stock)

use cartcheck_core::{Money, ProductLineItem};
use cartcheck_db::{generate_product_id, Database, DbConfig};
use std::env;

/// Base product names.
const NAMES: &[&str] = &[
    "Apples",
    "Bananas",
    "Bread",
    "Butter",
    "Cheddar Cheese",
    "Coffee",
    "Eggs",
    "Greek Yogurt",
    "Milk",
    "Orange Juice",
    "Pasta",
    "Rice",
    "Tea",
    "Tomatoes",
];

/// Size variants with a price add-on in cents.
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Medium", 150), ("Large", 300)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./cartcheck_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cartcheck Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./cartcheck_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Cartcheck Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let catalog = db.catalog();

    let existing = catalog.count().await?;
    if existing > 0 {
        println!("Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0;
    for seed in 0..count {
        let item = generate_item(seed);

        if let Err(e) = catalog.insert(&item).await {
            eprintln!("Failed to insert {}: {}", item.name, e);
            continue;
        }
        generated += 1;
    }

    println!("Generated {} products", generated);
    db.close().await;

    Ok(())
}

/// Number of distinct `{name} {size}` combinations.
const COMBINATIONS: usize = NAMES.len() * SIZES.len();

/// Display name for the `seed`-th product.
///
/// Names and sizes are walked in order; once every combination is used,
/// the walk starts over with a batch suffix (`Apples Small #2`).
fn product_name(seed: usize) -> (String, i64) {
    let slot = seed % COMBINATIONS;
    let batch = seed / COMBINATIONS;
    let name = NAMES[slot / SIZES.len()];
    let (size, addon) = SIZES[slot % SIZES.len()];

    let label = if batch == 0 {
        format!("{} {}", name, size)
    } else {
        format!("{} {} #{}", name, size, batch + 1)
    };
    (label, addon)
}

/// Generates a single catalog item with deterministic pseudo-random data.
fn generate_item(seed: usize) -> ProductLineItem {
    let (name, price_addon) = product_name(seed);
    let seed = seed as i64;

    let price_cents = 99 + (seed * 37) % 1600 + price_addon;
    let quantity = if seed % 7 == 0 { 0 } else { 1 + (seed * 5) % 12 };

    ProductLineItem::new(
        generate_product_id(),
        name,
        Money::from_cents(price_cents),
        quantity,
    )
}
