//! Schema migration runner for the folio ledger.
//!
//! Usage:
//!   migrator up      - Create the client, movement and period tables
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop every ledger table and re-run migrations
//!
//! Reads `DATABASE_URL` from the environment or a `.env` file.

use folio_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // run_cli installs its own tracing subscriber
    cli::run_cli(Migrator).await;
}
