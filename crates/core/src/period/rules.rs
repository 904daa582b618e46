//! Posting rules shared by movements, client creation and rollover.

use chrono::NaiveDate;

use super::{PeriodKey, PeriodStatus};
use crate::error::LedgerError;

/// Rejects a movement dated outside today's calendar month.
///
/// This is stricter than the period status check: even an open period of
/// another month does not accept movements.
pub fn validate_current_month(date: NaiveDate, today: NaiveDate) -> Result<(), LedgerError> {
    if PeriodKey::of(today).contains(date) {
        Ok(())
    } else {
        Err(LedgerError::WrongPeriod { date, today })
    }
}

/// Fails with [`LedgerError::PeriodClosed`] unless `status` accepts movements.
pub fn ensure_posting_allowed(key: PeriodKey, status: PeriodStatus) -> Result<(), LedgerError> {
    if status.allows_posting() {
        Ok(())
    } else {
        Err(LedgerError::PeriodClosed {
            year: key.year,
            month: key.month,
        })
    }
}

/// A period still at its zero opening balance has never been touched and
/// takes the live balance when it is opened.
#[must_use]
pub const fn needs_first_touch(opening_balance: i32) -> bool {
    opening_balance == 0
}

/// Initial shape of one monthly period row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSeed {
    /// Which month.
    pub key: PeriodKey,
    /// Initial status.
    pub status: PeriodStatus,
    /// Opening balance.
    pub opening_balance: i32,
    /// Closing balance.
    pub closing_balance: i32,
}

/// Lays out the twelve months of a freshly materialised year.
///
/// `open_month` starts open with both balances at `live_balance`; every
/// other month starts closed at zero and is opened later by the lifecycle
/// manager when the calendar reaches it.
#[must_use]
pub fn year_layout(year: i32, open_month: u32, live_balance: i32) -> Vec<MonthSeed> {
    PeriodKey::months_of_year(year)
        .map(|key| {
            if key.month == open_month {
                MonthSeed {
                    key,
                    status: PeriodStatus::Open,
                    opening_balance: live_balance,
                    closing_balance: live_balance,
                }
            } else {
                MonthSeed {
                    key,
                    status: PeriodStatus::Closed,
                    opening_balance: 0,
                    closing_balance: 0,
                }
            }
        })
        .collect()
}
