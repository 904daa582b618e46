//! Client inputs and partial updates.
//!
//! The live balance is not part of a client's editable profile. It is set
//! once at creation and afterwards moves only through entradas, salidas and
//! ajustes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::validation::validate_text;

const NAME_MAX: usize = 255;
const TAX_ID_MAX: usize = 50;

/// The editable part of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Display name.
    pub name: String,
    /// Unique tax identifier (NIT).
    pub tax_id: String,
    /// Blocked clients cannot issue documents once out of folios.
    pub blocked: bool,
    /// Inactive clients cannot issue documents at all.
    pub inactive: bool,
    /// Balances at or below this trigger a low-balance warning.
    pub alert_threshold: i32,
}

impl ClientProfile {
    /// Validates text fields.
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_text("name", &self.name, NAME_MAX)?;
        validate_text("tax_id", &self.tax_id, TAX_ID_MAX)
    }
}

/// Input for registering a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    /// Profile fields.
    #[serde(flatten)]
    pub profile: ClientProfile,
    /// Folios available at registration.
    #[serde(default)]
    pub initial_balance: i32,
}

impl NewClient {
    /// Validates the input and enforces `inactive ⇒ blocked`.
    pub fn normalized(mut self) -> Result<Self, LedgerError> {
        self.profile.validate()?;
        if self.profile.inactive {
            self.profile.blocked = true;
        }
        Ok(self)
    }
}

/// Partial update of a client profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPatch {
    /// New display name.
    pub name: Option<String>,
    /// New tax ID.
    pub tax_id: Option<String>,
    /// New blocked flag.
    pub blocked: Option<bool>,
    /// New inactive flag.
    pub inactive: Option<bool>,
    /// New alert threshold.
    pub alert_threshold: Option<i32>,
}

impl ClientPatch {
    /// Applies the supplied fields over `current`.
    ///
    /// An inactive result is always blocked; explicitly unblocking a client
    /// that ends up inactive is a conflict.
    pub fn merge(&self, client_id: Uuid, current: &ClientProfile) -> Result<ClientProfile, LedgerError> {
        let mut merged = ClientProfile {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            tax_id: self.tax_id.clone().unwrap_or_else(|| current.tax_id.clone()),
            blocked: self.blocked.unwrap_or(current.blocked),
            inactive: self.inactive.unwrap_or(current.inactive),
            alert_threshold: self.alert_threshold.unwrap_or(current.alert_threshold),
        };
        merged.validate()?;

        if merged.inactive {
            if self.blocked == Some(false) {
                return Err(LedgerError::InactiveClientMustStayBlocked(client_id));
            }
            merged.blocked = true;
        }
        Ok(merged)
    }

    /// Returns true if the patch changes the tax ID.
    #[must_use]
    pub fn changes_tax_id(&self, current: &ClientProfile) -> bool {
        self.tax_id
            .as_deref()
            .is_some_and(|tax_id| tax_id != current.tax_id)
    }
}
