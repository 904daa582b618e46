//! Period lifecycle manager.
//!
//! Periods are closed and opened lazily: every mutating movement first runs
//! [`ensure_current_open`] for today, which rolls over stale years, closes
//! the client's past months and opens the current month. The global
//! [`PeriodLifecycle::rollover_year`] and [`PeriodLifecycle::sync_current_month`]
//! entry points cover clients that have not moved recently.

use chrono::NaiveDate;
use folio_core::period::{MonthSeed, ensure_posting_allowed, needs_first_touch, year_layout};
use folio_core::{Actor, LedgerError, PeriodKey, PeriodStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::client::lock_client;
use super::period::{
    find_annual, find_monthly, get_or_create_annual, get_or_create_monthly, now,
};
use crate::context::LedgerContext;
use crate::entities::{annual_periods, clients, monthly_periods, sea_orm_active_enums::PeriodState};
use crate::error::StoreError;

/// Result of a year-end rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RolloverOutcome {
    /// The year was closed and the next one opened.
    Completed {
        /// The year that was closed.
        year: i32,
        /// Number of clients rolled over.
        clients: usize,
    },
    /// No annual period of that year was still open.
    AlreadyClosed {
        /// The requested year.
        year: i32,
    },
}

/// Result of a global current-month sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Some period of the current month was already open.
    AlreadyCurrent,
    /// Past months were closed and the current one opened.
    Synced {
        /// Monthly rows closed.
        closed: u64,
        /// Monthly rows opened.
        opened: u64,
    },
}

/// Brings the client's periods up to `today`.
///
/// Rolls over every still-open year before today's (oldest first), closes
/// the client's open months that precede today's, then get-or-creates and
/// opens today's month and year. A period still at a zero opening balance
/// takes the client's live balance.
pub async fn ensure_current_open(
    txn: &DatabaseTransaction,
    client: &clients::Model,
    today: NaiveDate,
) -> Result<monthly_periods::Model, StoreError> {
    let key = PeriodKey::of(today);

    while let Some(stale) = annual_periods::Entity::find()
        .filter(annual_periods::Column::ClientId.eq(client.id))
        .filter(annual_periods::Column::State.eq(PeriodState::Open))
        .filter(annual_periods::Column::Year.lt(key.year))
        .order_by_asc(annual_periods::Column::Year)
        .one(txn)
        .await?
    {
        tracing::info!(client_id = %client.id, year = stale.year, "Stale year found, rolling over");
        rollover_year_in(txn, stale.year).await?;
    }

    let last_past = key.previous();
    let closed = monthly_periods::Entity::update_many()
        .set(closed_state())
        .filter(monthly_periods::Column::ClientId.eq(client.id))
        .filter(monthly_periods::Column::State.eq(PeriodState::Open))
        .filter(
            Condition::any()
                .add(monthly_periods::Column::Year.lt(last_past.year))
                .add(
                    Condition::all()
                        .add(monthly_periods::Column::Year.eq(last_past.year))
                        .add(monthly_periods::Column::Month.lte(last_past.month.cast_signed())),
                ),
        )
        .exec(txn)
        .await?
        .rows_affected;
    if closed > 0 {
        tracing::info!(client_id = %client.id, closed, through = %last_past, "Closed past monthly periods");
    }

    // Live balance is re-read: a rollover above may have run in this transaction.
    let balance = lock_client(txn, client.id).await?.balance;

    let seed = MonthSeed {
        key,
        status: PeriodStatus::Open,
        opening_balance: balance,
        closing_balance: balance,
    };
    let monthly = get_or_create_monthly(txn, client.id, &seed).await?;
    let monthly = if monthly.is_open() && !needs_first_touch(monthly.opening_balance) {
        monthly
    } else {
        let first_touch = needs_first_touch(monthly.opening_balance);
        let mut active: monthly_periods::ActiveModel = monthly.into();
        active.state = Set(PeriodState::Open);
        if first_touch {
            active.opening_balance = Set(balance);
            active.closing_balance = Set(balance);
        }
        active.updated_at = Set(now());
        let opened = active.update(txn).await?;
        tracing::info!(client_id = %client.id, period = %key, first_touch, "Monthly period opened");
        opened
    };

    let annual = get_or_create_annual(txn, client.id, key.year, PeriodStatus::Open, balance).await?;
    let first_touch = needs_first_touch(annual.opening_balance);
    if annual.state != PeriodState::Open || first_touch {
        let mut active: annual_periods::ActiveModel = annual.into();
        active.state = Set(PeriodState::Open);
        if first_touch {
            active.opening_balance = Set(balance);
            active.closing_balance = Set(balance);
        }
        active.updated_at = Set(now());
        active.update(txn).await?;
        tracing::info!(client_id = %client.id, year = key.year, first_touch, "Annual period opened");
    }

    Ok(monthly)
}

/// Fails unless both periods covering `date` exist and are open.
pub async fn require_open<C: ConnectionTrait>(
    conn: &C,
    client_id: Uuid,
    date: NaiveDate,
) -> Result<(), StoreError> {
    let key = PeriodKey::of(date);

    let monthly = find_monthly(conn, client_id, key)
        .await?
        .ok_or(LedgerError::MonthlyPeriodNotFound {
            year: key.year,
            month: key.month,
        })?;
    let annual = find_annual(conn, client_id, key.year)
        .await?
        .ok_or(LedgerError::AnnualPeriodNotFound(key.year))?;

    ensure_posting_allowed(key, monthly.state.into())?;
    ensure_posting_allowed(key, annual.state.into())?;
    Ok(())
}

fn closed_state() -> monthly_periods::ActiveModel {
    monthly_periods::ActiveModel {
        state: Set(PeriodState::Closed),
        updated_at: Set(now()),
        ..Default::default()
    }
}

fn open_state() -> monthly_periods::ActiveModel {
    monthly_periods::ActiveModel {
        state: Set(PeriodState::Open),
        updated_at: Set(now()),
        ..Default::default()
    }
}

/// Closes `year` for every client and opens `year + 1`.
///
/// Safe to repeat: once no annual period of `year` is open this is a no-op,
/// and rows of `year + 1` that already exist are left as they are.
pub async fn rollover_year_in(
    txn: &DatabaseTransaction,
    year: i32,
) -> Result<RolloverOutcome, StoreError> {
    // Monthly rows are locked before annual rows, the order movements use.
    let open_months = monthly_periods::Entity::find()
        .filter(monthly_periods::Column::Year.eq(year))
        .filter(monthly_periods::Column::State.eq(PeriodState::Open))
        .order_by_asc(monthly_periods::Column::ClientId)
        .order_by_asc(monthly_periods::Column::Month)
        .lock_exclusive()
        .all(txn)
        .await?;

    let open_years = annual_periods::Entity::find()
        .filter(annual_periods::Column::Year.eq(year))
        .filter(annual_periods::Column::State.eq(PeriodState::Open))
        .order_by_asc(annual_periods::Column::ClientId)
        .lock_exclusive()
        .all(txn)
        .await?;

    if open_years.is_empty() {
        tracing::debug!(year, "Year already closed, nothing to roll over");
        return Ok(RolloverOutcome::AlreadyClosed { year });
    }

    tracing::info!(
        year,
        clients = open_years.len(),
        open_months = open_months.len(),
        "Year-end rollover started"
    );

    monthly_periods::Entity::update_many()
        .set(closed_state())
        .filter(monthly_periods::Column::Year.eq(year))
        .filter(monthly_periods::Column::State.eq(PeriodState::Open))
        .exec(txn)
        .await?;

    let clients = open_years.len();
    for annual in open_years {
        let client_id = annual.client_id;
        let balance = clients::Entity::find_by_id(client_id)
            .one(txn)
            .await?
            .ok_or_else(|| LedgerError::ClientNotFound(client_id.to_string()))?
            .balance;

        let mut closing: annual_periods::ActiveModel = annual.into();
        closing.state = Set(PeriodState::Closed);
        closing.closing_balance = Set(balance);
        closing.updated_at = Set(now());
        closing.update(txn).await?;

        get_or_create_annual(txn, client_id, year + 1, PeriodStatus::Open, balance).await?;
        for seed in year_layout(year + 1, 1, balance) {
            get_or_create_monthly(txn, client_id, &seed).await?;
        }

        tracing::debug!(%client_id, year, balance, "Client rolled over");
    }

    tracing::info!(year, clients, "Year-end rollover finished");
    Ok(RolloverOutcome::Completed { year, clients })
}

/// Entry points of the lifecycle manager.
#[derive(Debug, Clone)]
pub struct PeriodLifecycle {
    ctx: LedgerContext,
}

impl PeriodLifecycle {
    /// Creates a new lifecycle manager.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Brings one client's periods up to today and returns its current month.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `ClientNotFound` or a database error.
    pub async fn ensure_current_open(
        &self,
        actor: &Actor,
        client_id: Uuid,
    ) -> Result<monthly_periods::Model, StoreError> {
        self.ctx.authorize(actor)?;
        let today = self.ctx.clock.today();

        let txn = self.ctx.db.begin().await?;
        let client = lock_client(&txn, client_id).await?;
        let monthly = ensure_current_open(&txn, &client, today).await?;
        txn.commit().await?;
        Ok(monthly)
    }

    /// Fails unless the periods covering `date` exist and are open.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` or `PeriodClosed`.
    pub async fn require_open(&self, client_id: Uuid, date: NaiveDate) -> Result<(), StoreError> {
        require_open(&self.ctx.db, client_id, date).await
    }

    /// Closes `year` for all clients and opens the next one.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or a database error.
    pub async fn rollover_year(&self, actor: &Actor, year: i32) -> Result<RolloverOutcome, StoreError> {
        self.ctx.authorize(actor)?;

        let txn = self.ctx.db.begin().await?;
        let outcome = rollover_year_in(&txn, year).await?;
        txn.commit().await?;
        Ok(outcome)
    }

    /// Realigns every client with today's month.
    ///
    /// If no monthly period of today's month is open anywhere, closes every
    /// open month earlier in the current year and opens every existing row
    /// of today's month.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or a database error.
    pub async fn sync_current_month(&self, actor: &Actor) -> Result<SyncOutcome, StoreError> {
        self.ctx.authorize(actor)?;
        let key = PeriodKey::of(self.ctx.clock.today());

        let txn = self.ctx.db.begin().await?;

        let open_now = monthly_periods::Entity::find()
            .filter(monthly_periods::Column::Year.eq(key.year))
            .filter(monthly_periods::Column::Month.eq(key.month.cast_signed()))
            .filter(monthly_periods::Column::State.eq(PeriodState::Open))
            .count(&txn)
            .await?;
        if open_now > 0 {
            tracing::debug!(period = %key, "Current month already open");
            return Ok(SyncOutcome::AlreadyCurrent);
        }

        let closed = monthly_periods::Entity::update_many()
            .set(closed_state())
            .filter(monthly_periods::Column::Year.eq(key.year))
            .filter(monthly_periods::Column::Month.lt(key.month.cast_signed()))
            .filter(monthly_periods::Column::State.eq(PeriodState::Open))
            .exec(&txn)
            .await?
            .rows_affected;

        let opened = monthly_periods::Entity::update_many()
            .set(open_state())
            .filter(monthly_periods::Column::Year.eq(key.year))
            .filter(monthly_periods::Column::Month.eq(key.month.cast_signed()))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;
        tracing::info!(period = %key, closed, opened, "Current month synced");
        Ok(SyncOutcome::Synced { closed, opened })
    }

    /// Snapshots a month's closing balance and closes it.
    ///
    /// Closing an already-closed month returns the stored row unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `InvalidMonth`, `ClientNotFound`,
    /// `PeriodNotFound` or a database error.
    pub async fn close_month(
        &self,
        actor: &Actor,
        client_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<monthly_periods::Model, StoreError> {
        self.ctx.authorize(actor)?;
        let key = PeriodKey::new(year, month)?;

        let txn = self.ctx.db.begin().await?;
        let client = lock_client(&txn, client_id).await?;

        let monthly = monthly_periods::Entity::find()
            .filter(monthly_periods::Column::ClientId.eq(client_id))
            .filter(monthly_periods::Column::Year.eq(key.year))
            .filter(monthly_periods::Column::Month.eq(key.month.cast_signed()))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::MonthlyPeriodNotFound { year, month })?;

        if !monthly.is_open() {
            return Ok(monthly);
        }

        let mut active: monthly_periods::ActiveModel = monthly.into();
        active.state = Set(PeriodState::Closed);
        active.closing_balance = Set(client.balance);
        active.updated_at = Set(now());
        let closed = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(%client_id, period = %key, closing_balance = client.balance, "Monthly period closed");
        Ok(closed)
    }
}
