//! Ajuste repository: signed manual corrections.

use folio_core::period::validate_current_month;
use folio_core::{Actor, AjustePatch, LedgerError, NewAjuste, PeriodKey};
use folio_shared::types::AjusteId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::client::{adjust_balance, change_between, lock_client, reversal_of};
use super::lifecycle::{ensure_current_open, require_open};
use super::period::{apply_adjustment, now, recalc_closing_balance};
use crate::context::LedgerContext;
use crate::entities::ajustes;
use crate::error::StoreError;

async fn lock_ajuste(txn: &DatabaseTransaction, id: AjusteId) -> Result<ajustes::Model, StoreError> {
    ajustes::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::AjusteNotFound(id.into_inner()).into())
}

/// Ajuste repository.
#[derive(Debug, Clone)]
pub struct AjusteRepository {
    ctx: LedgerContext,
}

impl AjusteRepository {
    /// Creates a new ajuste repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Applies a signed correction to a client's balance.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `ZeroAdjustment`, a validation error,
    /// `WrongPeriod`, `ClientNotFound`, `PeriodNotFound`, `PeriodClosed` or
    /// a database error.
    pub async fn create(&self, actor: &Actor, input: NewAjuste) -> Result<ajustes::Model, StoreError> {
        self.ctx.authorize(actor)?;
        input.validate()?;
        let today = self.ctx.clock.today();
        let values = input.values;
        validate_current_month(values.date, today)?;

        let txn = self.ctx.db.begin().await?;
        let client = lock_client(&txn, input.client_id.into_inner()).await?;
        let client_id = client.id;

        ensure_current_open(&txn, &client, today).await?;
        require_open(&txn, client_id, values.date).await?;

        let client = adjust_balance(&txn, client, values.quantity).await?;
        apply_adjustment(&txn, client_id, values.quantity, values.date).await?;
        recalc_closing_balance(&txn, client_id, PeriodKey::of(values.date)).await?;

        let now = now();
        let ajuste = ajustes::ActiveModel {
            id: Set(Uuid::now_v7()),
            client_id: Set(client_id),
            date: Set(values.date),
            quantity: Set(values.quantity),
            description: Set(values.description),
            created_by: Set(Some(actor.user_id.into_inner())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            ajuste_id = %ajuste.id,
            %client_id,
            quantity = ajuste.quantity,
            balance = client.balance,
            "Ajuste applied"
        );
        Ok(ajuste)
    }

    /// Lists a client's ajustes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<ajustes::Model>, StoreError> {
        Ok(ajustes::Entity::find()
            .filter(ajustes::Column::ClientId.eq(client_id))
            .order_by_desc(ajustes::Column::Date)
            .order_by_desc(ajustes::Column::CreatedAt)
            .all(&self.ctx.db)
            .await?)
    }

    /// Finds an ajuste by ID.
    ///
    /// # Errors
    ///
    /// Returns `AjusteNotFound` or a database error.
    pub async fn get(&self, id: AjusteId) -> Result<ajustes::Model, StoreError> {
        ajustes::Entity::find_by_id(id.into_inner())
            .one(&self.ctx.db)
            .await?
            .ok_or_else(|| LedgerError::AjusteNotFound(id.into_inner()).into())
    }

    /// Applies a partial update, reversing the old correction and applying
    /// the new one. A description-only edit leaves the ledger alone.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::create`] plus `AjusteNotFound`.
    pub async fn update(
        &self,
        actor: &Actor,
        id: AjusteId,
        patch: AjustePatch,
    ) -> Result<ajustes::Model, StoreError> {
        self.ctx.authorize(actor)?;
        let today = self.ctx.clock.today();

        let txn = self.ctx.db.begin().await?;
        let ajuste = lock_ajuste(&txn, id).await?;
        let current = ajuste.values();
        let merged = patch.merge(&current);
        merged.validate()?;

        if !AjustePatch::affects_ledger(&current, &merged) {
            let mut active: ajustes::ActiveModel = ajuste.into();
            active.description = Set(merged.description);
            active.updated_at = Set(now());
            let updated = active.update(&txn).await?;
            txn.commit().await?;
            return Ok(updated);
        }

        validate_current_month(current.date, today)?;
        validate_current_month(merged.date, today)?;

        let client = lock_client(&txn, ajuste.client_id).await?;
        let client_id = client.id;
        ensure_current_open(&txn, &client, today).await?;
        require_open(&txn, client_id, current.date).await?;
        require_open(&txn, client_id, merged.date).await?;

        let delta = change_between(current.quantity, merged.quantity)?;
        let client = adjust_balance(&txn, client, delta).await?;
        apply_adjustment(&txn, client_id, reversal_of(current.quantity)?, current.date).await?;
        apply_adjustment(&txn, client_id, merged.quantity, merged.date).await?;
        recalc_closing_balance(&txn, client_id, PeriodKey::of(current.date)).await?;
        if PeriodKey::of(merged.date) != PeriodKey::of(current.date) {
            recalc_closing_balance(&txn, client_id, PeriodKey::of(merged.date)).await?;
        }

        let mut active: ajustes::ActiveModel = ajuste.into();
        active.date = Set(merged.date);
        active.quantity = Set(merged.quantity);
        active.description = Set(merged.description);
        active.updated_at = Set(now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            ajuste_id = %id,
            %client_id,
            from = current.quantity,
            to = updated.quantity,
            balance = client.balance,
            "Ajuste updated"
        );
        Ok(updated)
    }

    /// Deletes an ajuste and reverses its correction.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `AjusteNotFound`, `WrongPeriod`, `PeriodClosed`
    /// or a database error.
    pub async fn delete(&self, actor: &Actor, id: AjusteId) -> Result<(), StoreError> {
        self.ctx.authorize(actor)?;
        let today = self.ctx.clock.today();

        let txn = self.ctx.db.begin().await?;
        let ajuste = lock_ajuste(&txn, id).await?;
        validate_current_month(ajuste.date, today)?;

        let client = lock_client(&txn, ajuste.client_id).await?;
        let client_id = client.id;
        ensure_current_open(&txn, &client, today).await?;
        require_open(&txn, client_id, ajuste.date).await?;

        let reversal = reversal_of(ajuste.quantity)?;
        let client = adjust_balance(&txn, client, reversal).await?;
        apply_adjustment(&txn, client_id, reversal, ajuste.date).await?;
        recalc_closing_balance(&txn, client_id, PeriodKey::of(ajuste.date)).await?;

        let quantity = ajuste.quantity;
        ajuste.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(ajuste_id = %id, %client_id, quantity, balance = client.balance, "Ajuste reversed");
        Ok(())
    }
}
