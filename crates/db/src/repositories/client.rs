//! Client repository.

use chrono::Datelike;
use folio_core::period::year_layout;
use folio_core::{Actor, ClientPatch, LedgerError, MAX_MOVEMENT_QUANTITY, NewClient, PeriodStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::period::{get_or_create_annual, get_or_create_monthly, now};
use crate::context::LedgerContext;
use crate::entities::{ajustes, annual_periods, clients, entradas, monthly_periods, salidas};
use crate::error::StoreError;

/// Loads and locks a client row by ID.
pub(crate) async fn lock_client(
    txn: &DatabaseTransaction,
    client_id: Uuid,
) -> Result<clients::Model, StoreError> {
    clients::Entity::find_by_id(client_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::ClientNotFound(client_id.to_string()).into())
}

/// Loads and locks a client row by tax ID.
pub(crate) async fn lock_client_by_tax_id(
    txn: &DatabaseTransaction,
    tax_id: &str,
) -> Result<clients::Model, StoreError> {
    clients::Entity::find()
        .filter(clients::Column::TaxId.eq(tax_id))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::ClientNotFound(tax_id.to_string()).into())
}

/// Moves the live balance by a signed delta.
pub(crate) async fn adjust_balance(
    txn: &DatabaseTransaction,
    client: clients::Model,
    delta: i32,
) -> Result<clients::Model, StoreError> {
    let balance = client
        .balance
        .checked_add(delta)
        .ok_or(LedgerError::BalanceOverflow {
            balance: client.balance,
            delta,
        })?;
    let mut active: clients::ActiveModel = client.into();
    active.balance = Set(balance);
    active.updated_at = Set(now());
    Ok(active.update(txn).await?)
}

/// The signed change that undoes a movement of `quantity`.
pub(crate) fn reversal_of(quantity: i32) -> Result<i32, LedgerError> {
    quantity.checked_neg().ok_or(LedgerError::QuantityOutOfRange {
        quantity,
        max: MAX_MOVEMENT_QUANTITY,
    })
}

/// The signed change that turns a movement of `from` into one of `to`.
pub(crate) fn change_between(from: i32, to: i32) -> Result<i32, LedgerError> {
    to.checked_sub(from).ok_or(LedgerError::QuantityOutOfRange {
        quantity: to,
        max: MAX_MOVEMENT_QUANTITY,
    })
}

async fn tax_id_taken(
    txn: &DatabaseTransaction,
    tax_id: &str,
    except: Option<Uuid>,
) -> Result<bool, StoreError> {
    let mut query = clients::Entity::find().filter(clients::Column::TaxId.eq(tax_id));
    if let Some(id) = except {
        query = query.filter(clients::Column::Id.ne(id));
    }
    Ok(query.count(txn).await? > 0)
}

/// Client registration and profile management.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    ctx: LedgerContext,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Registers a client and materialises its periods for the current year.
    ///
    /// The annual period opens with the initial balance; of the twelve
    /// months only the current one is open.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, a validation error, `DuplicateTaxId` or a
    /// database error.
    pub async fn create(&self, actor: &Actor, input: NewClient) -> Result<clients::Model, StoreError> {
        self.ctx.authorize(actor)?;
        let input = input.normalized()?;
        let today = self.ctx.clock.today();

        let txn = self.ctx.db.begin().await?;

        if tax_id_taken(&txn, &input.profile.tax_id, None).await? {
            return Err(LedgerError::DuplicateTaxId(input.profile.tax_id).into());
        }

        let now = now();
        let client = clients::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.profile.name),
            tax_id: Set(input.profile.tax_id),
            balance: Set(input.initial_balance),
            blocked: Set(input.profile.blocked),
            inactive: Set(input.profile.inactive),
            alert_threshold: Set(input.profile.alert_threshold),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        get_or_create_annual(
            &txn,
            client.id,
            today.year(),
            PeriodStatus::Open,
            client.balance,
        )
        .await?;
        for seed in year_layout(today.year(), today.month(), client.balance) {
            get_or_create_monthly(&txn, client.id, &seed).await?;
        }

        txn.commit().await?;

        tracing::info!(
            client_id = %client.id,
            tax_id = %client.tax_id,
            balance = client.balance,
            "Client created"
        );
        Ok(client)
    }

    /// Lists all clients by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<clients::Model>, StoreError> {
        Ok(clients::Entity::find()
            .order_by_asc(clients::Column::Name)
            .all(&self.ctx.db)
            .await?)
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` or a database error.
    pub async fn get(&self, client_id: Uuid) -> Result<clients::Model, StoreError> {
        clients::Entity::find_by_id(client_id)
            .one(&self.ctx.db)
            .await?
            .ok_or_else(|| LedgerError::ClientNotFound(client_id.to_string()).into())
    }

    /// Finds a client by tax ID.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` or a database error.
    pub async fn get_by_tax_id(&self, tax_id: &str) -> Result<clients::Model, StoreError> {
        clients::Entity::find()
            .filter(clients::Column::TaxId.eq(tax_id))
            .one(&self.ctx.db)
            .await?
            .ok_or_else(|| LedgerError::ClientNotFound(tax_id.to_string()).into())
    }

    /// Applies a partial profile update. The balance is not patchable.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `ClientNotFound`, a validation error,
    /// `DuplicateTaxId`, `InactiveClientMustStayBlocked` or a database error.
    pub async fn update(
        &self,
        actor: &Actor,
        client_id: Uuid,
        patch: ClientPatch,
    ) -> Result<clients::Model, StoreError> {
        self.ctx.authorize(actor)?;

        let txn = self.ctx.db.begin().await?;
        let client = lock_client(&txn, client_id).await?;
        let current = client.profile();
        let merged = patch.merge(client_id, &current)?;

        if patch.changes_tax_id(&current) && tax_id_taken(&txn, &merged.tax_id, Some(client_id)).await? {
            return Err(LedgerError::DuplicateTaxId(merged.tax_id).into());
        }

        let mut active: clients::ActiveModel = client.into();
        active.name = Set(merged.name);
        active.tax_id = Set(merged.tax_id);
        active.blocked = Set(merged.blocked);
        active.inactive = Set(merged.inactive);
        active.alert_threshold = Set(merged.alert_threshold);
        active.updated_at = Set(now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(%client_id, "Client updated");
        Ok(updated)
    }

    /// Deletes a client with its movements and periods.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `ClientNotFound` or a database error.
    pub async fn delete(&self, actor: &Actor, client_id: Uuid) -> Result<(), StoreError> {
        self.ctx.authorize(actor)?;

        let txn = self.ctx.db.begin().await?;
        let client = lock_client(&txn, client_id).await?;

        // Children are removed explicitly; SQLite only honours the foreign
        // key cascade when the pragma is enabled.
        entradas::Entity::delete_many()
            .filter(entradas::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;
        salidas::Entity::delete_many()
            .filter(salidas::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;
        ajustes::Entity::delete_many()
            .filter(ajustes::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;
        monthly_periods::Entity::delete_many()
            .filter(monthly_periods::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;
        annual_periods::Entity::delete_many()
            .filter(annual_periods::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;
        client.delete(&txn).await?;

        txn.commit().await?;
        tracing::info!(%client_id, "Client deleted");
        Ok(())
    }

    /// Blocks or unblocks a client.
    ///
    /// # Errors
    ///
    /// Returns `InactiveClientMustStayBlocked` when unblocking an inactive
    /// client, plus the errors of [`Self::update`].
    pub async fn set_blocked(
        &self,
        actor: &Actor,
        client_id: Uuid,
        blocked: bool,
    ) -> Result<clients::Model, StoreError> {
        let patch = ClientPatch {
            blocked: Some(blocked),
            ..Default::default()
        };
        self.update(actor, client_id, patch).await
    }

    /// Activates or inactivates a client. Inactivating also blocks.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::update`].
    pub async fn set_inactive(
        &self,
        actor: &Actor,
        client_id: Uuid,
        inactive: bool,
    ) -> Result<clients::Model, StoreError> {
        let patch = ClientPatch {
            inactive: Some(inactive),
            ..Default::default()
        };
        self.update(actor, client_id, patch).await
    }
}
