//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - The folio ledger repositories: period store, aggregate ledger, period
//!   lifecycle, balance authority and movement ledger
//!
//! Every mutating operation runs as one database transaction spanning the
//! client row, the movement row and both period rows.

pub mod context;
pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use context::LedgerContext;
pub use error::StoreError;
pub use repositories::{
    AjusteRepository, ClientRepository, EntradaRepository, IssuanceResult, PeriodLifecycle,
    RolloverOutcome, SalidaRepository, SummaryRepository, SyncOutcome,
};

use std::time::Duration;

use folio_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
