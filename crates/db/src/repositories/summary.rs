//! Read-only period summaries.
//!
//! Summaries never create periods: a missing row is reported as not found.

use folio_core::{LedgerError, PeriodKey};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::period::{find_annual, find_monthly};
use crate::entities::{annual_periods, clients, monthly_periods};
use crate::error::StoreError;

/// Period summary repository.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    db: DatabaseConnection,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn client_id(&self, tax_id: &str) -> Result<uuid::Uuid, StoreError> {
        let client = clients::Entity::find()
            .filter(clients::Column::TaxId.eq(tax_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::ClientNotFound(tax_id.to_string()))?;
        Ok(client.id)
    }

    /// Monthly summary for the client with `tax_id`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth`, `ClientNotFound`, `PeriodNotFound` or a
    /// database error.
    pub async fn monthly_by_tax_id(
        &self,
        tax_id: &str,
        year: i32,
        month: u32,
    ) -> Result<monthly_periods::Model, StoreError> {
        let key = PeriodKey::new(year, month)?;
        let client_id = self.client_id(tax_id).await?;
        find_monthly(&self.db, client_id, key)
            .await?
            .ok_or_else(|| LedgerError::MonthlyPeriodNotFound { year, month }.into())
    }

    /// Annual summary for the client with `tax_id`.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound`, `PeriodNotFound` or a database error.
    pub async fn annual_by_tax_id(&self, tax_id: &str, year: i32) -> Result<annual_periods::Model, StoreError> {
        let client_id = self.client_id(tax_id).await?;
        find_annual(&self.db, client_id, year)
            .await?
            .ok_or_else(|| LedgerError::AnnualPeriodNotFound(year).into())
    }
}
