//! `SeaORM` active enums.

use folio_core::PeriodStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored state of a monthly or annual period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum PeriodState {
    /// Accepts movements.
    #[sea_orm(string_value = "open")]
    Open,
    /// Frozen.
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl From<PeriodStatus> for PeriodState {
    fn from(status: PeriodStatus) -> Self {
        match status {
            PeriodStatus::Open => Self::Open,
            PeriodStatus::Closed => Self::Closed,
        }
    }
}

impl From<PeriodState> for PeriodStatus {
    fn from(state: PeriodState) -> Self {
        match state {
            PeriodState::Open => Self::Open,
            PeriodState::Closed => Self::Closed,
        }
    }
}
