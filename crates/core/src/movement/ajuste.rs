//! Ajuste (manual correction) inputs.

use chrono::NaiveDate;
use folio_shared::types::ClientId;
use serde::{Deserialize, Serialize};

use super::MAX_MOVEMENT_QUANTITY;
use crate::error::LedgerError;
use crate::validation::validate_text;

const DESCRIPTION_MAX: usize = 255;

/// The ledger-relevant fields of an ajuste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AjusteValues {
    /// Date of the correction.
    pub date: NaiveDate,
    /// Signed correction; never zero.
    pub quantity: i32,
    /// Why the correction was made.
    pub description: String,
}

impl AjusteValues {
    /// Validates the values.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.quantity == 0 {
            return Err(LedgerError::ZeroAdjustment);
        }
        if !(-MAX_MOVEMENT_QUANTITY..=MAX_MOVEMENT_QUANTITY).contains(&self.quantity) {
            return Err(LedgerError::QuantityOutOfRange {
                quantity: self.quantity,
                max: MAX_MOVEMENT_QUANTITY,
            });
        }
        validate_text("description", &self.description, DESCRIPTION_MAX)
    }
}

/// Input for a manual balance correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAjuste {
    /// Client being corrected.
    pub client_id: ClientId,
    /// The ajuste itself.
    #[serde(flatten)]
    pub values: AjusteValues,
}

impl NewAjuste {
    /// Validates the input.
    pub fn validate(&self) -> Result<(), LedgerError> {
        self.values.validate()
    }
}

/// Partial update of an ajuste.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AjustePatch {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New signed quantity.
    pub quantity: Option<i32>,
    /// New description.
    pub description: Option<String>,
}

impl AjustePatch {
    /// Applies the supplied fields over `current`.
    #[must_use]
    pub fn merge(&self, current: &AjusteValues) -> AjusteValues {
        AjusteValues {
            date: self.date.unwrap_or(current.date),
            quantity: self.quantity.unwrap_or(current.quantity),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
        }
    }

    /// Returns true if going from `current` to `merged` changes balances or
    /// counters.
    #[must_use]
    pub fn affects_ledger(current: &AjusteValues, merged: &AjusteValues) -> bool {
        current.quantity != merged.quantity || current.date != merged.date
    }
}
