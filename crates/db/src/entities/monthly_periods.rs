//! `SeaORM` Entity for monthly_periods table.

use folio_core::PeriodCounters;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PeriodState;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub state: PeriodState,
    pub opening_balance: i32,
    pub closing_balance: i32,
    pub total_entradas: i32,
    pub total_facturas: i32,
    pub total_notas_credito: i32,
    pub total_notas_debito: i32,
    pub total_documentos_soporte: i32,
    pub total_ajuste_documentos_soporte: i32,
    pub total_nomina_electronica: i32,
    pub total_ajuste_nomina: i32,
    pub total_nota_ajuste: i32,
    pub total_ajustes: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_delete = "Cascade"
    )]
    Clients,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The aggregate counters of this row.
    #[must_use]
    pub const fn counters(&self) -> PeriodCounters {
        PeriodCounters {
            entradas: self.total_entradas,
            facturas: self.total_facturas,
            notas_credito: self.total_notas_credito,
            notas_debito: self.total_notas_debito,
            documentos_soporte: self.total_documentos_soporte,
            ajuste_documentos_soporte: self.total_ajuste_documentos_soporte,
            nomina_electronica: self.total_nomina_electronica,
            ajuste_nomina: self.total_ajuste_nomina,
            nota_ajuste: self.total_nota_ajuste,
            ajustes: self.total_ajustes,
        }
    }

    /// Returns true if the row accepts movements.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == PeriodState::Open
    }
}

impl ActiveModel {
    /// Writes every counter column.
    pub fn set_counters(&mut self, counters: &PeriodCounters) {
        self.total_entradas = Set(counters.entradas);
        self.total_facturas = Set(counters.facturas);
        self.total_notas_credito = Set(counters.notas_credito);
        self.total_notas_debito = Set(counters.notas_debito);
        self.total_documentos_soporte = Set(counters.documentos_soporte);
        self.total_ajuste_documentos_soporte = Set(counters.ajuste_documentos_soporte);
        self.total_nomina_electronica = Set(counters.nomina_electronica);
        self.total_ajuste_nomina = Set(counters.ajuste_nomina);
        self.total_nota_ajuste = Set(counters.nota_ajuste);
        self.total_ajustes = Set(counters.ajustes);
    }
}
