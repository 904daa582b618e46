//! Period store and aggregate ledger.
//!
//! The period store looks up and get-or-creates monthly and annual period
//! rows. The aggregate ledger applies counter deltas to the monthly row and
//! its annual parent together, and mirrors the client's live balance into
//! their closing balances.
//!
//! Everything here runs inside the caller's transaction.

use chrono::{NaiveDate, Utc};
use folio_core::period::{MonthSeed, ensure_posting_allowed};
use folio_core::{DocumentType, LedgerError, PeriodCounters, PeriodKey, PeriodStatus};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{annual_periods, clients, monthly_periods, sea_orm_active_enums::PeriodState};
use crate::error::StoreError;

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Looks up a monthly period without creating it.
pub async fn find_monthly<C: ConnectionTrait>(
    conn: &C,
    client_id: Uuid,
    key: PeriodKey,
) -> Result<Option<monthly_periods::Model>, DbErr> {
    monthly_periods::Entity::find()
        .filter(monthly_periods::Column::ClientId.eq(client_id))
        .filter(monthly_periods::Column::Year.eq(key.year))
        .filter(monthly_periods::Column::Month.eq(key.month.cast_signed()))
        .one(conn)
        .await
}

/// Looks up an annual period without creating it.
pub async fn find_annual<C: ConnectionTrait>(
    conn: &C,
    client_id: Uuid,
    year: i32,
) -> Result<Option<annual_periods::Model>, DbErr> {
    annual_periods::Entity::find()
        .filter(annual_periods::Column::ClientId.eq(client_id))
        .filter(annual_periods::Column::Year.eq(year))
        .one(conn)
        .await
}

/// Returns the monthly period for `seed.key`, creating it from `seed` with
/// zero counters when absent.
///
/// A concurrent insert of the same key surfaces as a unique violation; the
/// insert runs in a savepoint so the lookup can be retried.
pub async fn get_or_create_monthly(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    seed: &MonthSeed,
) -> Result<monthly_periods::Model, DbErr> {
    if let Some(existing) = find_monthly(txn, client_id, seed.key).await? {
        return Ok(existing);
    }

    let now = now();
    let mut row = monthly_periods::ActiveModel {
        id: Set(Uuid::now_v7()),
        client_id: Set(client_id),
        year: Set(seed.key.year),
        month: Set(seed.key.month.cast_signed()),
        state: Set(seed.status.into()),
        opening_balance: Set(seed.opening_balance),
        closing_balance: Set(seed.closing_balance),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    row.set_counters(&PeriodCounters::default());

    let savepoint = txn.begin().await?;
    match row.insert(&savepoint).await {
        Ok(model) => {
            savepoint.commit().await?;
            tracing::debug!(%client_id, period = %seed.key, status = %seed.status, "Monthly period created");
            Ok(model)
        }
        Err(err) if is_unique_violation(&err) => {
            savepoint.rollback().await?;
            find_monthly(txn, client_id, seed.key).await?.ok_or(err)
        }
        Err(err) => Err(err),
    }
}

/// Returns the annual period for `year`, creating it with zero counters and
/// the given status and balances when absent.
pub async fn get_or_create_annual(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    year: i32,
    status: PeriodStatus,
    balance: i32,
) -> Result<annual_periods::Model, DbErr> {
    if let Some(existing) = find_annual(txn, client_id, year).await? {
        return Ok(existing);
    }

    let now = now();
    let mut row = annual_periods::ActiveModel {
        id: Set(Uuid::now_v7()),
        client_id: Set(client_id),
        year: Set(year),
        state: Set(status.into()),
        opening_balance: Set(balance),
        closing_balance: Set(balance),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    row.set_counters(&PeriodCounters::default());

    let savepoint = txn.begin().await?;
    match row.insert(&savepoint).await {
        Ok(model) => {
            savepoint.commit().await?;
            tracing::debug!(%client_id, year, %status, "Annual period created");
            Ok(model)
        }
        Err(err) if is_unique_violation(&err) => {
            savepoint.rollback().await?;
            find_annual(txn, client_id, year).await?.ok_or(err)
        }
        Err(err) => Err(err),
    }
}

/// Loads and locks the open monthly and annual rows covering `date`.
async fn lock_open_pair(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    date: NaiveDate,
) -> Result<(monthly_periods::Model, annual_periods::Model), StoreError> {
    let key = PeriodKey::of(date);

    let monthly = monthly_periods::Entity::find()
        .filter(monthly_periods::Column::ClientId.eq(client_id))
        .filter(monthly_periods::Column::Year.eq(key.year))
        .filter(monthly_periods::Column::Month.eq(key.month.cast_signed()))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(LedgerError::MonthlyPeriodNotFound {
            year: key.year,
            month: key.month,
        })?;

    let annual = annual_periods::Entity::find()
        .filter(annual_periods::Column::ClientId.eq(client_id))
        .filter(annual_periods::Column::Year.eq(key.year))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(LedgerError::AnnualPeriodNotFound(key.year))?;

    ensure_posting_allowed(key, monthly.state.into())?;
    ensure_posting_allowed(key, annual.state.into())?;

    Ok((monthly, annual))
}

/// Applies `change` to the counters of both periods covering `date`.
async fn update_counters<F>(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    date: NaiveDate,
    change: F,
) -> Result<(), StoreError>
where
    F: Fn(&mut PeriodCounters) -> Result<(), LedgerError>,
{
    let (monthly, annual) = lock_open_pair(txn, client_id, date).await?;
    let now = now();

    let mut counters = monthly.counters();
    change(&mut counters)?;
    let mut monthly: monthly_periods::ActiveModel = monthly.into();
    monthly.set_counters(&counters);
    monthly.updated_at = Set(now);
    monthly.update(txn).await?;

    let mut counters = annual.counters();
    change(&mut counters)?;
    let mut annual: annual_periods::ActiveModel = annual.into();
    annual.set_counters(&counters);
    annual.updated_at = Set(now);
    annual.update(txn).await?;

    Ok(())
}

/// Adds an entrada to both periods covering `date`.
pub async fn apply_entrada(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    quantity: i32,
    date: NaiveDate,
) -> Result<(), StoreError> {
    update_counters(txn, client_id, date, |counters| counters.add_entrada(quantity)).await
}

/// Removes an entrada from both periods covering `date`, flooring at zero.
pub async fn reverse_entrada(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    quantity: i32,
    date: NaiveDate,
) -> Result<(), StoreError> {
    update_counters(txn, client_id, date, |counters| {
        counters.reverse_entrada(quantity);
        Ok(())
    })
    .await
}

/// Counts one issued document on both periods covering `date`.
pub async fn apply_document_issuance(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    document_type: DocumentType,
    date: NaiveDate,
) -> Result<(), StoreError> {
    update_counters(txn, client_id, date, |counters| counters.record_document(document_type)).await
}

/// Adds a signed adjustment to both periods covering `date`.
pub async fn apply_adjustment(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    quantity: i32,
    date: NaiveDate,
) -> Result<(), StoreError> {
    update_counters(txn, client_id, date, |counters| counters.add_adjustment(quantity)).await
}

/// Mirrors the client's live balance into the closing balance of the
/// monthly period `key` and its annual parent.
///
/// Closed rows are frozen and left untouched.
pub async fn recalc_closing_balance(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    key: PeriodKey,
) -> Result<(), StoreError> {
    let balance = clients::Entity::find_by_id(client_id)
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::ClientNotFound(client_id.to_string()))?
        .balance;
    let now = now();

    if let Some(monthly) = find_monthly(txn, client_id, key).await?
        && monthly.state == PeriodState::Open
    {
        let mut monthly: monthly_periods::ActiveModel = monthly.into();
        monthly.closing_balance = Set(balance);
        monthly.updated_at = Set(now);
        monthly.update(txn).await?;
    }

    if let Some(annual) = find_annual(txn, client_id, key.year).await?
        && annual.state == PeriodState::Open
    {
        let mut annual: annual_periods::ActiveModel = annual.into();
        annual.closing_balance = Set(balance);
        annual.updated_at = Set(now);
        annual.update(txn).await?;
    }

    Ok(())
}
