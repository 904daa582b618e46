//! Aggregate counters carried by monthly and annual periods.

use serde::{Deserialize, Serialize};

use crate::document::{CounterKind, DocumentType};
use crate::error::LedgerError;

/// Per-period aggregate counters.
///
/// All counters are non-negative except `ajustes`, which is the signed sum
/// of manual adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCounters {
    /// Folios credited by entradas.
    pub entradas: i32,
    /// Invoices issued.
    pub facturas: i32,
    /// Credit notes issued.
    pub notas_credito: i32,
    /// Debit notes issued.
    pub notas_debito: i32,
    /// Support documents issued.
    pub documentos_soporte: i32,
    /// Support document adjustments issued.
    pub ajuste_documentos_soporte: i32,
    /// Payroll documents issued.
    pub nomina_electronica: i32,
    /// Payroll adjustments issued.
    pub ajuste_nomina: i32,
    /// Adjustment notes issued.
    pub nota_ajuste: i32,
    /// Signed sum of manual adjustments.
    pub ajustes: i32,
}

impl PeriodCounters {
    /// Credits an entrada.
    pub fn add_entrada(&mut self, quantity: i32) -> Result<(), LedgerError> {
        self.bump(CounterKind::Entradas, quantity)
    }

    /// Reverses an entrada, saturating at zero.
    ///
    /// The floor can leave the counter above the true sum of live entradas
    /// when reversals interleave unusually. The movement records stay the
    /// source of truth for reconciliation.
    pub fn reverse_entrada(&mut self, quantity: i32) {
        self.entradas = self.entradas.saturating_sub(quantity).max(0);
    }

    /// Counts one issued document.
    pub fn record_document(&mut self, document_type: DocumentType) -> Result<(), LedgerError> {
        self.bump(document_type.counter(), 1)
    }

    /// Adds a signed adjustment.
    pub fn add_adjustment(&mut self, quantity: i32) -> Result<(), LedgerError> {
        self.bump(CounterKind::Ajustes, quantity)
    }

    fn bump(&mut self, kind: CounterKind, delta: i32) -> Result<(), LedgerError> {
        let slot = self.slot(kind);
        *slot = slot
            .checked_add(delta)
            .ok_or(LedgerError::CounterOverflow(kind))?;
        Ok(())
    }

    /// Reads one counter.
    #[must_use]
    pub const fn get(&self, kind: CounterKind) -> i32 {
        match kind {
            CounterKind::Entradas => self.entradas,
            CounterKind::Facturas => self.facturas,
            CounterKind::NotasCredito => self.notas_credito,
            CounterKind::NotasDebito => self.notas_debito,
            CounterKind::DocumentosSoporte => self.documentos_soporte,
            CounterKind::AjusteDocumentosSoporte => self.ajuste_documentos_soporte,
            CounterKind::NominaElectronica => self.nomina_electronica,
            CounterKind::AjusteNomina => self.ajuste_nomina,
            CounterKind::NotaAjuste => self.nota_ajuste,
            CounterKind::Ajustes => self.ajustes,
        }
    }

    /// Total documents issued across all document types.
    #[must_use]
    pub fn documents_issued(&self) -> i32 {
        DocumentType::ALL
            .iter()
            .map(|doc| self.get(doc.counter()))
            .sum()
    }

    fn slot(&mut self, kind: CounterKind) -> &mut i32 {
        match kind {
            CounterKind::Entradas => &mut self.entradas,
            CounterKind::Facturas => &mut self.facturas,
            CounterKind::NotasCredito => &mut self.notas_credito,
            CounterKind::NotasDebito => &mut self.notas_debito,
            CounterKind::DocumentosSoporte => &mut self.documentos_soporte,
            CounterKind::AjusteDocumentosSoporte => &mut self.ajuste_documentos_soporte,
            CounterKind::NominaElectronica => &mut self.nomina_electronica,
            CounterKind::AjusteNomina => &mut self.ajuste_nomina,
            CounterKind::NotaAjuste => &mut self.nota_ajuste,
            CounterKind::Ajustes => &mut self.ajustes,
        }
    }
}
