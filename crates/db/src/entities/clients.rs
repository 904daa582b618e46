//! `SeaORM` Entity for clients table.

use folio_core::{ClientProfile, issuance::ClientStanding};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub tax_id: String,
    pub balance: i32,
    pub blocked: bool,
    pub inactive: bool,
    pub alert_threshold: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monthly_periods::Entity")]
    MonthlyPeriods,
    #[sea_orm(has_many = "super::annual_periods::Entity")]
    AnnualPeriods,
    #[sea_orm(has_many = "super::entradas::Entity")]
    Entradas,
    #[sea_orm(has_many = "super::salidas::Entity")]
    Salidas,
    #[sea_orm(has_many = "super::ajustes::Entity")]
    Ajustes,
}

impl Related<super::monthly_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyPeriods.def()
    }
}

impl Related<super::annual_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnnualPeriods.def()
    }
}

impl Related<super::entradas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entradas.def()
    }
}

impl Related<super::salidas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salidas.def()
    }
}

impl Related<super::ajustes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ajustes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The editable profile of this client.
    #[must_use]
    pub fn profile(&self) -> ClientProfile {
        ClientProfile {
            name: self.name.clone(),
            tax_id: self.tax_id.clone(),
            blocked: self.blocked,
            inactive: self.inactive,
            alert_threshold: self.alert_threshold,
        }
    }

    /// The facts the issuance decision depends on.
    #[must_use]
    pub const fn standing(&self) -> ClientStanding {
        ClientStanding {
            balance: self.balance,
            blocked: self.blocked,
            inactive: self.inactive,
            alert_threshold: self.alert_threshold,
        }
    }
}
