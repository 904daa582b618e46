//! Calendar periods and their posting rules.
//!
//! A client owns one monthly period per `(year, month)` and one annual
//! period per year. At most one monthly period is open at a time: the
//! current calendar month.

mod calendar;
mod rules;
mod status;

pub use calendar::PeriodKey;
pub use rules::{MonthSeed, ensure_posting_allowed, needs_first_touch, validate_current_month, year_layout};
pub use status::PeriodStatus;
