//! The injectable "today".
//!
//! All period decisions are taken against the civil date of one configured
//! timezone. Tests and the `testing_date` setting pin the date instead.

use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use folio_shared::ClockConfig;

use crate::error::LedgerError;

/// Source of the current civil date.
pub trait Clock: Send + Sync + Debug {
    /// Returns today's date in the ledger's timezone.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a wall clock for `tz`.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Parses an IANA timezone name such as `America/Bogota`.
    pub fn from_name(name: &str) -> Result<Self, LedgerError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| LedgerError::Configuration(format!("unknown timezone '{name}'")))?;
        Ok(Self::new(tz))
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Clock pinned to a settable date.
#[derive(Debug)]
pub struct FixedClock {
    today: RwLock<NaiveDate>,
}

impl FixedClock {
    /// Creates a clock that always answers `today`.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            today: RwLock::new(today),
        }
    }

    /// Moves the clock to `today`.
    pub fn set(&self, today: NaiveDate) {
        match self.today.write() {
            Ok(mut guard) => *guard = today,
            Err(poisoned) => *poisoned.into_inner() = today,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Builds the clock described by configuration.
///
/// A `testing_date` wins over the timezone, but the timezone is still
/// validated so a typo does not surface only in production.
pub fn clock_from_config(config: &ClockConfig) -> Result<Arc<dyn Clock>, LedgerError> {
    let system = SystemClock::from_name(&config.timezone)?;
    match config.testing_date {
        Some(date) => {
            tracing::warn!(%date, "Clock pinned by testing_date");
            Ok(Arc::new(FixedClock::new(date)))
        }
        None => Ok(Arc::new(system)),
    }
}
