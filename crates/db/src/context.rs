//! Collaborators shared by every repository.

use std::sync::Arc;

use folio_core::{Actor, AuthorizationGate, Clock, LedgerError, require_admin};
use folio_shared::{AlertSink, LowBalanceAlert};
use sea_orm::DatabaseConnection;

/// Database pool plus the injected clock, authorization gate and alert sink.
#[derive(Clone)]
pub struct LedgerContext {
    /// Connection pool.
    pub db: DatabaseConnection,
    /// Source of "today".
    pub clock: Arc<dyn Clock>,
    /// Decides who may mutate the ledger.
    pub gate: Arc<dyn AuthorizationGate>,
    /// Receives low-balance alerts after commit.
    pub alerts: Arc<dyn AlertSink>,
}

impl LedgerContext {
    /// Bundles the collaborators.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        clock: Arc<dyn Clock>,
        gate: Arc<dyn AuthorizationGate>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            db,
            clock,
            gate,
            alerts,
        }
    }

    /// Fails with `Forbidden` unless the gate admits `actor`.
    pub(crate) fn authorize(&self, actor: &Actor) -> Result<(), LedgerError> {
        require_admin(self.gate.as_ref(), actor)
    }

    /// Delivers an alert, logging instead of failing.
    pub(crate) async fn notify(&self, alert: LowBalanceAlert) {
        if let Err(err) = self.alerts.notify_low_balance(&alert).await {
            tracing::warn!(
                error = %err,
                tax_id = %alert.client_tax_id,
                "Failed to deliver low-balance alert"
            );
        }
    }
}

impl std::fmt::Debug for LedgerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerContext")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
