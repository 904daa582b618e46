//! Entrada (folio credit) inputs.

use chrono::NaiveDate;
use folio_shared::types::ClientId;
use serde::{Deserialize, Serialize};

use super::MAX_MOVEMENT_QUANTITY;
use crate::error::LedgerError;
use crate::validation::validate_text;

const INVOICE_NUMBER_MAX: usize = 100;

/// The ledger-relevant fields of an entrada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntradaValues {
    /// Date the folios were credited.
    pub date: NaiveDate,
    /// Folios credited.
    pub quantity: i32,
    /// Purchase invoice backing the credit.
    pub invoice_number: String,
}

impl EntradaValues {
    /// Validates the values against today's date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), LedgerError> {
        if self.quantity <= 0 {
            return Err(LedgerError::NonPositiveQuantity(self.quantity));
        }
        if self.quantity > MAX_MOVEMENT_QUANTITY {
            return Err(LedgerError::QuantityOutOfRange {
                quantity: self.quantity,
                max: MAX_MOVEMENT_QUANTITY,
            });
        }
        if self.date > today {
            return Err(LedgerError::FutureDate(self.date));
        }
        validate_text("invoice_number", &self.invoice_number, INVOICE_NUMBER_MAX)
    }
}

/// Input for crediting folios to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntrada {
    /// Client receiving the folios.
    pub client_id: ClientId,
    /// The entrada itself.
    #[serde(flatten)]
    pub values: EntradaValues,
}

impl NewEntrada {
    /// Validates the input against today's date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), LedgerError> {
        self.values.validate(today)
    }
}

/// Partial update of an entrada.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntradaPatch {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New quantity.
    pub quantity: Option<i32>,
    /// New invoice number.
    pub invoice_number: Option<String>,
}

impl EntradaPatch {
    /// Applies the supplied fields over `current`.
    #[must_use]
    pub fn merge(&self, current: &EntradaValues) -> EntradaValues {
        EntradaValues {
            date: self.date.unwrap_or(current.date),
            quantity: self.quantity.unwrap_or(current.quantity),
            invoice_number: self
                .invoice_number
                .clone()
                .unwrap_or_else(|| current.invoice_number.clone()),
        }
    }

    /// Returns true if going from `current` to `merged` changes balances or
    /// counters. An invoice-number-only edit does not.
    #[must_use]
    pub fn affects_ledger(current: &EntradaValues, merged: &EntradaValues) -> bool {
        current.quantity != merged.quantity || current.date != merged.date
    }
}
