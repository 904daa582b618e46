//! `SeaORM` entity definitions.

pub mod ajustes;
pub mod annual_periods;
pub mod clients;
pub mod entradas;
pub mod monthly_periods;
pub mod salidas;
pub mod sea_orm_active_enums;
