//! # Seed Data Generator
//!
//! Populates the database with sample foods and sales for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p bistro-db --bin seed
//!
//! # Specify database path
//! cargo run -p bistro-db --bin seed -- --db ./data/bistro.db
//! ```

use std::env;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bistro_core::{validation, Food, Sale};
use bistro_db::{Database, DbConfig, DbResult};

/// Sample foods: (title, price, waittime, recipe)
const FOODS: &[(&str, i64, i64, &[&str])] = &[
    ("Pasta Carbonara", 12, 20, &["spaghetti", "egg", "guanciale", "pecorino"]),
    ("Margherita Pizza", 10, 15, &["dough", "tomato", "mozzarella", "basil"]),
    ("Caesar Salad", 8, 10, &["romaine", "parmesan", "crouton", "anchovy"]),
    ("Beef Burger", 11, 18, &["bun", "beef", "cheddar", "onion"]),
    ("Tomato Soup", 6, 12, &["tomato", "cream", "basil"]),
    ("Tiramisu", 7, 5, &["mascarpone", "espresso", "ladyfinger", "cocoa"]),
];

/// Sample sales: (title, description, duration, foodsale)
const SALES: &[(&str, &str, i64, &[&str])] = &[
    ("Lunch Deal", "pizza and salad together", 120, &["2", "3"]),
    ("Pasta Night", "all pasta dishes", 180, &["1"]),
    ("Sweet Hour", "dessert and soup combo", 60, &["5", "6"]),
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db_path = parse_db_path().unwrap_or_else(|| "./bistro.db".to_string());

    if let Err(err) = seed(&db_path).await {
        error!(%err, "seeding failed");
        process::exit(1);
    }
}

fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|arg| arg == "--db")
        .and_then(|i| args.get(i + 1).cloned())
}

async fn seed(db_path: &str) -> DbResult<()> {
    info!(db_path, "seeding database");

    let db = Database::new(DbConfig::new(db_path)).await?;

    for &(title, price, waittime, recipe) in FOODS {
        let food = Food {
            title: title.to_string(),
            price,
            waittime,
            recipe: recipe.iter().map(|s| (*s).to_string()).collect(),
            ..Food::default()
        };

        if let Err(err) = validation::validate_food(&food) {
            error!(title, %err, "skipping invalid sample food");
            continue;
        }

        let food = db.foods().insert(food).await?;
        info!(id = food.id, title, "seeded food");
    }

    for &(title, description, duration, foodsale) in SALES {
        let sale = Sale {
            title: title.to_string(),
            description: description.to_string(),
            duration,
            foodsale: foodsale.iter().map(|s| (*s).to_string()).collect(),
            ..Sale::default()
        };

        if let Err(err) = validation::validate_sale(&sale) {
            error!(title, %err, "skipping invalid sample sale");
            continue;
        }

        let sale = db.sales().insert(sale).await?;
        info!(id = sale.id, title, "seeded sale");
    }

    db.close().await;
    info!("seeding complete");
    Ok(())
}
