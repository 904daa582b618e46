//! Salida repository: the balance authority for document issuance.
//!
//! Salidas are append-only. A rejected or duplicate request writes nothing;
//! an approved one debits one folio, records the salida dated today and
//! counts the document on the current month and year.

use folio_core::issuance::ISSUANCE_QUANTITY;
use folio_core::{Actor, IssuanceDecision, IssueRequest, LedgerError, PeriodKey, decide_issuance};
use folio_shared::LowBalanceAlert;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::client::{adjust_balance, lock_client_by_tax_id};
use super::lifecycle::{ensure_current_open, require_open};
use super::period::{apply_document_issuance, now, recalc_closing_balance};
use crate::context::LedgerContext;
use crate::entities::{clients, salidas};
use crate::error::StoreError;

/// Decision on an issuance request plus the salida it produced, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuanceResult {
    /// The decision returned to the caller.
    pub decision: IssuanceDecision,
    /// The recorded salida; `None` for rejected and duplicate requests.
    pub salida: Option<salidas::Model>,
}

/// Salida repository.
#[derive(Debug, Clone)]
pub struct SalidaRepository {
    ctx: LedgerContext,
}

impl SalidaRepository {
    /// Creates a new salida repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Decides and, when approved, records the issuance of one document.
    ///
    /// Rejections are returned as decisions, not errors. Low-balance alerts
    /// are delivered after commit and never fail the request.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, a validation error, `ClientNotFound`,
    /// `PeriodNotFound`, `PeriodClosed` or a database error.
    pub async fn issue(&self, actor: &Actor, request: IssueRequest) -> Result<IssuanceResult, StoreError> {
        self.ctx.authorize(actor)?;
        request.validate()?;
        let today = self.ctx.clock.today();
        let document_type = request.document_type.as_str();

        let txn = self.ctx.db.begin().await?;
        let client = lock_client_by_tax_id(&txn, &request.tax_id).await?;

        let duplicate = salidas::Entity::find()
            .filter(salidas::Column::ClientId.eq(client.id))
            .filter(salidas::Column::DocumentType.eq(document_type))
            .filter(salidas::Column::DocumentNumber.eq(request.document_number.as_str()))
            .count(&txn)
            .await?
            > 0;

        let decision = decide_issuance(&client.standing(), duplicate)?;
        tracing::info!(
            client_id = %client.id,
            document_type,
            document_number = %request.document_number,
            outcome = ?decision.outcome,
            balance_after = decision.balance_after,
            "Issuance decided"
        );

        let (client, salida) = if decision.consumes_folio() {
            let client_id = client.id;
            ensure_current_open(&txn, &client, today).await?;
            require_open(&txn, client_id, today).await?;

            let client = adjust_balance(&txn, client, -ISSUANCE_QUANTITY).await?;
            let salida = salidas::ActiveModel {
                id: Set(Uuid::now_v7()),
                client_id: Set(client_id),
                document_type: Set(document_type.to_string()),
                document_number: Set(request.document_number.clone()),
                date: Set(today),
                quantity: Set(ISSUANCE_QUANTITY),
                created_by: Set(Some(actor.user_id.into_inner())),
                created_at: Set(now()),
            }
            .insert(&txn)
            .await?;
            apply_document_issuance(&txn, client_id, request.document_type, today).await?;
            recalc_closing_balance(&txn, client_id, PeriodKey::of(today)).await?;
            (client, Some(salida))
        } else {
            (client, None)
        };

        txn.commit().await?;

        if decision.should_alert() {
            self.ctx.notify(low_balance_alert(&client, &decision)).await;
        }

        Ok(IssuanceResult { decision, salida })
    }

    /// Lists the salidas of the client with `tax_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` or a database error.
    pub async fn list_by_tax_id(&self, tax_id: &str) -> Result<Vec<salidas::Model>, StoreError> {
        let client = clients::Entity::find()
            .filter(clients::Column::TaxId.eq(tax_id))
            .one(&self.ctx.db)
            .await?
            .ok_or_else(|| LedgerError::ClientNotFound(tax_id.to_string()))?;

        Ok(salidas::Entity::find()
            .filter(salidas::Column::ClientId.eq(client.id))
            .order_by_desc(salidas::Column::Date)
            .order_by_desc(salidas::Column::CreatedAt)
            .all(&self.ctx.db)
            .await?)
    }
}

fn low_balance_alert(client: &clients::Model, decision: &IssuanceDecision) -> LowBalanceAlert {
    LowBalanceAlert {
        client_name: client.name.clone(),
        client_tax_id: client.tax_id.clone(),
        message: decision.message.clone(),
        balance: decision.balance_after,
    }
}
