//! Store error type.

use folio_core::LedgerError;
use folio_shared::AppError;
use sea_orm::DbErr;

/// Errors returned by the ledger repositories.
///
/// Returning any of these from inside a unit of work drops the open
/// transaction, which rolls it back.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Ledger(err) => err.http_status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns the business error, if this is one.
    #[must_use]
    pub const fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Database(_) => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Ledger(err) => err.into(),
            StoreError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                Self::Internal("Database error".to_string())
            }
        }
    }
}
