//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during folio ledger
//! operations: input validation, authorization, missing records, period
//! state violations and conflicts. Issuance rejections are NOT errors; they
//! are returned as decisions (see [`crate::issuance`]).

use chrono::NaiveDate;
use folio_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::document::CounterKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Movement quantity must be strictly positive.
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(i32),

    /// Adjustment quantity cannot be zero.
    #[error("Adjustment quantity cannot be zero")]
    ZeroAdjustment,

    /// Movement quantity beyond the accepted magnitude.
    #[error("Quantity {quantity} exceeds the maximum of {max} folios per movement")]
    QuantityOutOfRange {
        /// Rejected quantity.
        quantity: i32,
        /// Largest accepted magnitude.
        max: i32,
    },

    /// Movement date lies in the future.
    #[error("Date {0} cannot be in the future")]
    FutureDate(NaiveDate),

    /// A text or numeric field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Document type tag outside the closed enumeration.
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    // ========== Authorization Errors ==========
    /// The authorization gate refused the actor.
    #[error("Access denied: only administrators can perform this action")]
    Forbidden,

    // ========== Not Found Errors ==========
    /// No client matches the supplied identifier.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// No monthly period row for the key.
    #[error("No monthly period found for {year}-{month:02}")]
    MonthlyPeriodNotFound {
        /// Calendar year.
        year: i32,
        /// Calendar month.
        month: u32,
    },

    /// No annual period row for the year.
    #[error("No annual period found for {0}")]
    AnnualPeriodNotFound(i32),

    /// Entrada not found.
    #[error("Entrada not found: {0}")]
    EntradaNotFound(Uuid),

    /// Ajuste not found.
    #[error("Ajuste not found: {0}")]
    AjusteNotFound(Uuid),

    // ========== Period Errors ==========
    /// The period is closed and frozen.
    #[error("Period {year}-{month:02} is closed, no movements allowed")]
    PeriodClosed {
        /// Calendar year.
        year: i32,
        /// Calendar month.
        month: u32,
    },

    /// Movements are only accepted in the current calendar month.
    #[error("Only movements in the current month are allowed: {date} is outside {today}'s month")]
    WrongPeriod {
        /// Date of the rejected movement.
        date: NaiveDate,
        /// The clock's current date.
        today: NaiveDate,
    },

    // ========== Conflict Errors ==========
    /// Another client already uses this tax ID.
    #[error("A client with tax ID {0} already exists")]
    DuplicateTaxId(String),

    /// Inactive clients must stay blocked.
    #[error("Client {0} is inactive and cannot be unblocked")]
    InactiveClientMustStayBlocked(Uuid),

    /// The live balance cannot absorb the movement.
    #[error("Balance {balance} cannot move by {delta}")]
    BalanceOverflow {
        /// Balance before the movement.
        balance: i32,
        /// Signed change that did not fit.
        delta: i32,
    },

    /// A period counter cannot absorb the movement.
    #[error("Counter {0:?} is out of range")]
    CounterOverflow(CounterKind),

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected by the store.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Internal Errors ==========
    /// Invalid runtime configuration.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::ZeroAdjustment => "ZERO_ADJUSTMENT",
            Self::QuantityOutOfRange { .. } => "QUANTITY_OUT_OF_RANGE",
            Self::FutureDate(_) => "FUTURE_DATE",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::UnknownDocumentType(_) => "UNKNOWN_DOCUMENT_TYPE",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::Forbidden => "FORBIDDEN",
            Self::ClientNotFound(_) => "CLIENT_NOT_FOUND",
            Self::MonthlyPeriodNotFound { .. } | Self::AnnualPeriodNotFound(_) => {
                "PERIOD_NOT_FOUND"
            }
            Self::EntradaNotFound(_) => "ENTRADA_NOT_FOUND",
            Self::AjusteNotFound(_) => "AJUSTE_NOT_FOUND",
            Self::PeriodClosed { .. } => "PERIOD_CLOSED",
            Self::WrongPeriod { .. } => "WRONG_PERIOD",
            Self::DuplicateTaxId(_) => "DUPLICATE_TAX_ID",
            Self::InactiveClientMustStayBlocked(_) => "INACTIVE_CLIENT_MUST_STAY_BLOCKED",
            Self::BalanceOverflow { .. } => "BALANCE_OVERFLOW",
            Self::CounterOverflow(_) => "COUNTER_OVERFLOW",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NonPositiveQuantity(_)
            | Self::ZeroAdjustment
            | Self::QuantityOutOfRange { .. }
            | Self::FutureDate(_)
            | Self::InvalidField { .. }
            | Self::UnknownDocumentType(_)
            | Self::InvalidMonth(_) => 400,

            // 403 Forbidden
            Self::Forbidden => 403,

            // 404 Not Found
            Self::ClientNotFound(_)
            | Self::MonthlyPeriodNotFound { .. }
            | Self::AnnualPeriodNotFound(_)
            | Self::EntradaNotFound(_)
            | Self::AjusteNotFound(_) => 404,

            // 409 Conflict - period state and uniqueness
            Self::PeriodClosed { .. }
            | Self::WrongPeriod { .. }
            | Self::DuplicateTaxId(_)
            | Self::InactiveClientMustStayBlocked(_)
            | Self::BalanceOverflow { .. }
            | Self::CounterOverflow(_)
            | Self::ConcurrentModification => 409,

            // 500 Internal Server Error
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if resubmitting the same request may succeed.
    ///
    /// The core never retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::NonPositiveQuantity(_)
            | LedgerError::ZeroAdjustment
            | LedgerError::QuantityOutOfRange { .. }
            | LedgerError::FutureDate(_)
            | LedgerError::InvalidField { .. }
            | LedgerError::UnknownDocumentType(_)
            | LedgerError::InvalidMonth(_) => Self::Validation(message),
            LedgerError::Forbidden => Self::Forbidden(message),
            LedgerError::ClientNotFound(_)
            | LedgerError::MonthlyPeriodNotFound { .. }
            | LedgerError::AnnualPeriodNotFound(_)
            | LedgerError::EntradaNotFound(_)
            | LedgerError::AjusteNotFound(_) => Self::NotFound(message),
            LedgerError::PeriodClosed { .. } | LedgerError::WrongPeriod { .. } => {
                Self::PeriodClosed(message)
            }
            LedgerError::DuplicateTaxId(_)
            | LedgerError::InactiveClientMustStayBlocked(_)
            | LedgerError::BalanceOverflow { .. }
            | LedgerError::CounterOverflow(_)
            | LedgerError::ConcurrentModification => Self::Conflict(message),
            LedgerError::Configuration(_) | LedgerError::Internal(_) => Self::Internal(message),
        }
    }
}
