//! Fiscal document types and the counters they feed.
//!
//! [`DocumentType::counter`] is the only place that maps a document type to
//! a period counter. Adding a document type means adding a variant here and
//! one match arm; the compiler finds the rest.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The closed set of fiscal documents a salida can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Invoice.
    Factura,
    /// Credit note.
    NotaCredito,
    /// Debit note.
    NotaDebito,
    /// Support document for purchases from non-invoicing suppliers.
    DocumentoSoporte,
    /// Adjustment to a support document.
    AjusteDocumentoSoporte,
    /// Electronic payroll.
    NominaElectronica,
    /// Payroll adjustment.
    AjusteNomina,
    /// Adjustment note.
    NotaAjuste,
}

/// Named counters carried by every monthly and annual period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    /// Folios credited by entradas.
    Entradas,
    /// Invoices issued.
    Facturas,
    /// Credit notes issued.
    NotasCredito,
    /// Debit notes issued.
    NotasDebito,
    /// Support documents issued.
    DocumentosSoporte,
    /// Support document adjustments issued.
    AjusteDocumentosSoporte,
    /// Payroll documents issued.
    NominaElectronica,
    /// Payroll adjustments issued.
    AjusteNomina,
    /// Adjustment notes issued.
    NotaAjuste,
    /// Signed sum of manual adjustments.
    Ajustes,
}

impl DocumentType {
    /// Every document type, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Factura,
        Self::NotaCredito,
        Self::NotaDebito,
        Self::DocumentoSoporte,
        Self::AjusteDocumentoSoporte,
        Self::NominaElectronica,
        Self::AjusteNomina,
        Self::NotaAjuste,
    ];

    /// The wire and storage tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Factura => "FACTURA",
            Self::NotaCredito => "NOTA_CREDITO",
            Self::NotaDebito => "NOTA_DEBITO",
            Self::DocumentoSoporte => "DOCUMENTO_SOPORTE",
            Self::AjusteDocumentoSoporte => "AJUSTE_DOCUMENTO_SOPORTE",
            Self::NominaElectronica => "NOMINA_ELECTRONICA",
            Self::AjusteNomina => "AJUSTE_NOMINA",
            Self::NotaAjuste => "NOTA_AJUSTE",
        }
    }

    /// The period counter incremented when this document is issued.
    #[must_use]
    pub const fn counter(&self) -> CounterKind {
        match self {
            Self::Factura => CounterKind::Facturas,
            Self::NotaCredito => CounterKind::NotasCredito,
            Self::NotaDebito => CounterKind::NotasDebito,
            Self::DocumentoSoporte => CounterKind::DocumentosSoporte,
            Self::AjusteDocumentoSoporte => CounterKind::AjusteDocumentosSoporte,
            Self::NominaElectronica => CounterKind::NominaElectronica,
            Self::AjusteNomina => CounterKind::AjusteNomina,
            Self::NotaAjuste => CounterKind::NotaAjuste,
        }
    }
}

impl FromStr for DocumentType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|doc| doc.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownDocumentType(s.to_string()))
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
