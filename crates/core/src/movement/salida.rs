//! Salida (document issuance) requests.

use serde::{Deserialize, Serialize};

use crate::document::DocumentType;
use crate::error::LedgerError;
use crate::validation::validate_text;

const DOCUMENT_NUMBER_MAX: usize = 150;

/// A request to issue one fiscal document for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Tax ID of the issuing client.
    pub tax_id: String,
    /// Kind of document.
    pub document_type: DocumentType,
    /// Document number; together with the type it identifies duplicates.
    pub document_number: String,
}

impl IssueRequest {
    /// Builds a request from a raw document type tag.
    pub fn parse(tax_id: impl Into<String>, document_type: &str, document_number: impl Into<String>) -> Result<Self, LedgerError> {
        let request = Self {
            tax_id: tax_id.into(),
            document_type: document_type.parse()?,
            document_number: document_number.into(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Validates the request.
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_text("tax_id", &self.tax_id, 50)?;
        validate_text("document_number", &self.document_number, DOCUMENT_NUMBER_MAX)
    }
}
