//! Entrada repository: folio credits.
//!
//! Creating, editing and deleting an entrada each run as one transaction
//! that moves the client balance, the entrada counters of the month and
//! year, and the closing balances together.

use folio_core::period::validate_current_month;
use folio_core::{Actor, EntradaPatch, LedgerError, NewEntrada, PeriodKey};
use folio_shared::types::EntradaId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::client::{adjust_balance, change_between, lock_client, reversal_of};
use super::lifecycle::{ensure_current_open, require_open};
use super::period::{apply_entrada, now, recalc_closing_balance, reverse_entrada};
use crate::context::LedgerContext;
use crate::entities::entradas;
use crate::error::StoreError;

async fn lock_entrada(txn: &DatabaseTransaction, id: EntradaId) -> Result<entradas::Model, StoreError> {
    entradas::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::EntradaNotFound(id.into_inner()).into())
}

/// Entrada repository.
#[derive(Debug, Clone)]
pub struct EntradaRepository {
    ctx: LedgerContext,
}

impl EntradaRepository {
    /// Creates a new entrada repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Credits folios to a client.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, a validation error, `WrongPeriod`,
    /// `ClientNotFound`, `PeriodNotFound`, `PeriodClosed` or a database
    /// error. Nothing is written on error.
    pub async fn create(&self, actor: &Actor, input: NewEntrada) -> Result<entradas::Model, StoreError> {
        self.ctx.authorize(actor)?;
        let today = self.ctx.clock.today();
        input.validate(today)?;
        let values = input.values;
        validate_current_month(values.date, today)?;

        let txn = self.ctx.db.begin().await?;
        let client = lock_client(&txn, input.client_id.into_inner()).await?;
        let client_id = client.id;

        ensure_current_open(&txn, &client, today).await?;
        require_open(&txn, client_id, values.date).await?;

        let client = adjust_balance(&txn, client, values.quantity).await?;
        apply_entrada(&txn, client_id, values.quantity, values.date).await?;
        recalc_closing_balance(&txn, client_id, PeriodKey::of(values.date)).await?;

        let now = now();
        let entrada = entradas::ActiveModel {
            id: Set(Uuid::now_v7()),
            client_id: Set(client_id),
            date: Set(values.date),
            quantity: Set(values.quantity),
            invoice_number: Set(values.invoice_number),
            created_by: Set(Some(actor.user_id.into_inner())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            entrada_id = %entrada.id,
            %client_id,
            quantity = entrada.quantity,
            balance = client.balance,
            "Entrada applied"
        );
        Ok(entrada)
    }

    /// Lists every entrada, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<entradas::Model>, StoreError> {
        Ok(entradas::Entity::find()
            .order_by_desc(entradas::Column::Date)
            .order_by_desc(entradas::Column::CreatedAt)
            .all(&self.ctx.db)
            .await?)
    }

    /// Lists a client's entradas, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<entradas::Model>, StoreError> {
        Ok(entradas::Entity::find()
            .filter(entradas::Column::ClientId.eq(client_id))
            .order_by_desc(entradas::Column::Date)
            .order_by_desc(entradas::Column::CreatedAt)
            .all(&self.ctx.db)
            .await?)
    }

    /// Finds an entrada by ID.
    ///
    /// # Errors
    ///
    /// Returns `EntradaNotFound` or a database error.
    pub async fn get(&self, id: EntradaId) -> Result<entradas::Model, StoreError> {
        entradas::Entity::find_by_id(id.into_inner())
            .one(&self.ctx.db)
            .await?
            .ok_or_else(|| LedgerError::EntradaNotFound(id.into_inner()).into())
    }

    /// Applies a partial update.
    ///
    /// When quantity and date are unchanged only the invoice number is
    /// written. Otherwise the old entrada is reversed and the new one
    /// applied, so both its old and new month must be today's open month.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::create`] plus `EntradaNotFound`.
    pub async fn update(
        &self,
        actor: &Actor,
        id: EntradaId,
        patch: EntradaPatch,
    ) -> Result<entradas::Model, StoreError> {
        self.ctx.authorize(actor)?;
        let today = self.ctx.clock.today();

        let txn = self.ctx.db.begin().await?;
        let entrada = lock_entrada(&txn, id).await?;
        let current = entrada.values();
        let merged = patch.merge(&current);
        merged.validate(today)?;

        if !EntradaPatch::affects_ledger(&current, &merged) {
            let mut active: entradas::ActiveModel = entrada.into();
            active.invoice_number = Set(merged.invoice_number);
            active.updated_at = Set(now());
            let updated = active.update(&txn).await?;
            txn.commit().await?;
            tracing::debug!(entrada_id = %id, "Entrada invoice number updated");
            return Ok(updated);
        }

        validate_current_month(current.date, today)?;
        validate_current_month(merged.date, today)?;

        let client = lock_client(&txn, entrada.client_id).await?;
        let client_id = client.id;
        ensure_current_open(&txn, &client, today).await?;
        require_open(&txn, client_id, current.date).await?;
        require_open(&txn, client_id, merged.date).await?;

        let delta = change_between(current.quantity, merged.quantity)?;
        let client = adjust_balance(&txn, client, delta).await?;
        reverse_entrada(&txn, client_id, current.quantity, current.date).await?;
        apply_entrada(&txn, client_id, merged.quantity, merged.date).await?;
        recalc_closing_balance(&txn, client_id, PeriodKey::of(current.date)).await?;
        if PeriodKey::of(merged.date) != PeriodKey::of(current.date) {
            recalc_closing_balance(&txn, client_id, PeriodKey::of(merged.date)).await?;
        }

        let mut active: entradas::ActiveModel = entrada.into();
        active.date = Set(merged.date);
        active.quantity = Set(merged.quantity);
        active.invoice_number = Set(merged.invoice_number);
        active.updated_at = Set(now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            entrada_id = %id,
            %client_id,
            from = current.quantity,
            to = updated.quantity,
            balance = client.balance,
            "Entrada updated"
        );
        Ok(updated)
    }

    /// Deletes an entrada and reverses its credit.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `EntradaNotFound`, `WrongPeriod`,
    /// `PeriodClosed` or a database error.
    pub async fn delete(&self, actor: &Actor, id: EntradaId) -> Result<(), StoreError> {
        self.ctx.authorize(actor)?;
        let today = self.ctx.clock.today();

        let txn = self.ctx.db.begin().await?;
        let entrada = lock_entrada(&txn, id).await?;
        validate_current_month(entrada.date, today)?;

        let client = lock_client(&txn, entrada.client_id).await?;
        let client_id = client.id;
        ensure_current_open(&txn, &client, today).await?;
        require_open(&txn, client_id, entrada.date).await?;

        let client = adjust_balance(&txn, client, reversal_of(entrada.quantity)?).await?;
        reverse_entrada(&txn, client_id, entrada.quantity, entrada.date).await?;
        recalc_closing_balance(&txn, client_id, PeriodKey::of(entrada.date)).await?;

        let quantity = entrada.quantity;
        entrada.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(entrada_id = %id, %client_id, quantity, balance = client.balance, "Entrada reversed");
        Ok(())
    }
}
