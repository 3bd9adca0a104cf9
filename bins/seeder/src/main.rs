//! Database seeder for Stockwise development and testing.
//!
//! Seeds a small catalog, a few receipts per product spread over the
//! last quarter, and a pending warehouse fee for the previous month.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use stockwise_core::fee::{CreateFeeInput, FeeError, YearMonth};
use stockwise_core::lot::{CreateLotInput, LandedCost, StorageLocation};
use stockwise_db::{
    CreateProductInput, LotRepository, ProductRepository, WarehouseFeeRepository,
};
use stockwise_shared::types::ProductId;

/// (code, name, unit, category)
const PRODUCTS: &[(&str, &str, &str, &str)] = &[
    ("SEED-COFFEE", "Green coffee beans", "kg", "food"),
    ("SEED-RESIN", "PET resin", "kg", "chemical"),
    ("SEED-PUMP", "Centrifugal pump", "ea", "machinery"),
];

/// (days ago, quantity, goods, duty, freight, location)
const RECEIPTS: &[(i64, Decimal, Decimal, Decimal, Decimal, StorageLocation)] = &[
    (80, dec!(200), dec!(2000000), dec!(160000), dec!(40000), StorageLocation::Warehouse),
    (45, dec!(150), dec!(1650000), dec!(132000), dec!(30000), StorageLocation::Warehouse),
    (10, dec!(50), dec!(600000), dec!(48000), dec!(15000), StorageLocation::Office),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = stockwise_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding products...");
    let products = seed_products(&db).await?;

    println!("Seeding lots...");
    seed_lots(&db, &products).await?;

    println!("Seeding warehouse fee...");
    seed_pending_fee(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Creates the catalog, returning the IDs of products that were new.
async fn seed_products(db: &DatabaseConnection) -> anyhow::Result<Vec<ProductId>> {
    let repo = ProductRepository::new(db.clone());
    let mut created = Vec::new();

    for (code, name, unit, category) in PRODUCTS {
        if repo.find_by_code(code).await?.is_some() {
            println!("  Product {code} already exists, skipping...");
            continue;
        }

        let product = repo
            .create_product(CreateProductInput {
                code: (*code).to_string(),
                name: (*name).to_string(),
                unit: (*unit).to_string(),
                category: Some((*category).to_string()),
            })
            .await?;
        created.push(ProductId::from_uuid(product.id));
    }

    println!("  Inserted {} products", created.len());
    Ok(created)
}

async fn seed_lots(db: &DatabaseConnection, products: &[ProductId]) -> anyhow::Result<()> {
    let repo = LotRepository::new(db.clone());
    let today = Utc::now().date_naive();
    let mut inserted = 0;

    for product_id in products {
        for (n, (days_ago, quantity, goods, duty, freight, location)) in
            RECEIPTS.iter().enumerate()
        {
            let input = CreateLotInput {
                product_id: *product_id,
                lot_code: Some(format!("BL-{}-{:02}", today.year(), n + 1)),
                source_transaction_id: None,
                received_date: today - Duration::days(*days_ago),
                quantity_received: *quantity,
                costs: LandedCost {
                    goods_amount: *goods,
                    duty_amount: *duty,
                    domestic_freight: *freight,
                    other_cost: Decimal::ZERO,
                },
                storage_location: *location,
                memo: None,
            };

            match repo.create_lot(input).await {
                Ok(_) => inserted += 1,
                Err(e) => eprintln!("Failed to insert lot for {product_id}: {e}"),
            }
        }
    }

    println!("  Inserted {inserted} lots");
    Ok(())
}

async fn seed_pending_fee(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = WarehouseFeeRepository::new(db.clone());
    let today = Utc::now().date_naive();
    let first_of_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .context("invalid current month")?;
    let year_month = YearMonth::from_date(first_of_month - Duration::days(1));

    let input = CreateFeeInput {
        year_month,
        total_fee: dec!(500000),
        memo: Some("Seeded storage invoice".to_string()),
    };

    match repo.create_fee(input).await {
        Ok(fee) => println!("  Created pending fee for {}", fee.year_month),
        Err(FeeError::DuplicateYearMonth(ym)) => {
            println!("  Fee for {ym} already exists, skipping...");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
