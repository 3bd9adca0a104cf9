//! Database migration runner for Stockwise.
//!
//! Usage:
//!   migrator up      - Apply the costing schema
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-apply

use sea_orm_migration::prelude::*;
use stockwise_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // run_cli installs its own tracing subscriber
    cli::run_cli(Migrator).await;
}
