//! # Seed Data Generator
//!
//! Populates the database with development data through the command
//! handlers, so every record passes the same rules as real traffic.
//!
//! ## Usage
//! ```bash
//! # Seed ./ledgerbook.db (or LEDGERBOOK_DATABASE_PATH)
//! cargo run -p ledgerbook-service --bin seed
//!
//! # Custom movement count per period
//! cargo run -p ledgerbook-service --bin seed -- --movements 10
//!
//! # Specify database path
//! cargo run -p ledgerbook-service --bin seed -- --db ./data/ledgerbook.db
//! ```
//!
//! ## Generated Data
//! - Products: one per entry in [`PRODUCTS`]
//! - Product cosifs: two COSIF accounts per product
//! - Customers: one per entry in [`CUSTOMERS`]
//! - Manual movements: `--movements` per month of Q1 2024, spread over the
//!   classifications

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use ledgerbook_db::Database;
use ledgerbook_service::dto::customer::{AddCustomerRequest, AddressInput};
use ledgerbook_service::dto::manual_movement::AddManualMovementRequest;
use ledgerbook_service::dto::product::{AddProductRequest, ProductQuery};
use ledgerbook_service::dto::product_cosif::AddProductCosifRequest;
use ledgerbook_service::{telemetry, CommandHandler, Ledgerbook, Repositories, ServiceConfig};

/// `(product_code, description)`
const PRODUCTS: &[(&str, &str)] = &[
    ("CASH", "Cash and equivalents"),
    ("LOAN", "Consumer loans"),
    ("CARD", "Credit cards"),
    ("FUND", "Investment funds"),
    ("SAVE", "Savings accounts"),
    ("INSR", "Insurance premiums"),
];

/// COSIF accounts attached to every product.
const COSIF_ACCOUNTS: &[(&str, &str)] = &[("11110000001", "ATV"), ("41110000002", "PSV")];

/// `(name, email, document_number)`
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Ana Souza", "ana.souza@example.com", "12345678901"),
    ("Bruno Lima", "bruno.lima@example.com", "23456789012"),
    ("Carla Mendes", "carla.mendes@example.com", "34567890123"),
    ("Daniel Rocha", "daniel.rocha@example.com", "45678901234"),
    ("Comercial Norte Ltda", "contato@norte.example.com", "12345678000199"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let mut config = ServiceConfig::load()?;
    let mut movements_per_period: u32 = 5;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--movements" | "-m" => {
                if i + 1 < args.len() {
                    movements_per_period = args[i + 1].parse().unwrap_or(5);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("ledgerbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -m, --movements <N>  Movements per period (default: 5)");
                println!("  -d, --db <PATH>      Database file path (default: LEDGERBOOK_DATABASE_PATH)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("ledgerbook Seed Data Generator");
    println!("==============================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let ledger = Ledgerbook::new(Repositories::from_database(&db), config);

    let existing = ledger.products.find(ProductQuery::default()).await?;
    if existing.data.total_count > 0 {
        println!("⚠ Database already has {} products", existing.data.total_count);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = Instant::now();

    for (code, description) in PRODUCTS {
        ledger
            .products
            .handle(AddProductRequest {
                product_code: code.to_string(),
                description: description.to_string(),
            })
            .await?;

        for (cosif_code, classification) in COSIF_ACCOUNTS {
            ledger
                .product_cosifs
                .handle(AddProductCosifRequest {
                    product_code: code.to_string(),
                    cosif_code: cosif_code.to_string(),
                    classification_code: classification.to_string(),
                })
                .await?;
        }
    }
    println!("✓ {} products, {} product cosifs", PRODUCTS.len(), PRODUCTS.len() * COSIF_ACCOUNTS.len());

    for (index, (name, email, document)) in CUSTOMERS.iter().enumerate() {
        ledger
            .customers
            .handle(AddCustomerRequest {
                name: name.to_string(),
                email: email.to_string(),
                document_number: document.to_string(),
                phone: Some(format!("8199999{:04}", index)),
                address: AddressInput {
                    street: "Rua da Aurora".to_string(),
                    number: (100 + index).to_string(),
                    complement: None,
                    neighborhood: "Boa Vista".to_string(),
                    city: "Recife".to_string(),
                    state: "PE".to_string(),
                    zip_code: "50050000".to_string(),
                },
            })
            .await?;
    }
    println!("✓ {} customers", CUSTOMERS.len());

    let year = 2024;
    let mut generated = 0u32;
    for month in 1..=3 {
        for n in 0..movements_per_period {
            let (code, _) = PRODUCTS[n as usize % PRODUCTS.len()];
            let (cosif_code, _) = COSIF_ACCOUNTS[n as usize % COSIF_ACCOUNTS.len()];

            let created = ledger
                .manual_movements
                .handle(AddManualMovementRequest {
                    month,
                    year,
                    product_code: code.to_string(),
                    cosif_code: cosif_code.to_string(),
                    description: format!("Manual adjustment {:02}/{} #{}", month, year, n + 1),
                    value_cents: 1_000 + i64::from(n) * 250,
                })
                .await?;

            generated += 1;
            if generated % 10 == 0 {
                println!(
                    "  Generated {} movements (last launch number {})...",
                    generated, created.data.launch_number
                );
            }
        }
    }

    let elapsed = start.elapsed();
    println!("✓ {} manual movements", generated);
    println!();
    println!("✓ Seed complete in {:?}", elapsed);

    db.close().await;
    Ok(())
}
