//! Initial database migration.
//!
//! Creates clients, the monthly and annual period tables and the three
//! movement tables. Composite unique indexes back the period get-or-create
//! contract and salida duplicate detection.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: CLIENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clients::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Clients::TaxId).string_len(50).not_null())
                    .col(ColumnDef::new(Clients::Balance).integer().not_null().default(0))
                    .col(ColumnDef::new(Clients::Blocked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Clients::Inactive).boolean().not_null().default(false))
                    .col(ColumnDef::new(Clients::AlertThreshold).integer().not_null().default(0))
                    .col(timestamp(Clients::CreatedAt))
                    .col(timestamp(Clients::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_clients_tax_id")
                    .table(Clients::Table)
                    .col(Clients::TaxId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: PERIODS
        // ============================================================
        let mut monthly = Table::create();
        monthly
            .table(MonthlyPeriods::Table)
            .if_not_exists()
            .col(ColumnDef::new(MonthlyPeriods::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(MonthlyPeriods::ClientId).uuid().not_null())
            .col(ColumnDef::new(MonthlyPeriods::Year).integer().not_null())
            .col(ColumnDef::new(MonthlyPeriods::Month).integer().not_null())
            .col(ColumnDef::new(MonthlyPeriods::State).string_len(10).not_null().default("open"))
            .foreign_key(&mut client_fk("fk_monthly_periods_client", MonthlyPeriods::Table, MonthlyPeriods::ClientId));
        add_balance_and_counter_columns(&mut monthly);
        monthly
            .col(timestamp(MonthlyPeriods::CreatedAt))
            .col(timestamp(MonthlyPeriods::UpdatedAt));
        manager.create_table(monthly).await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_monthly_periods_client_year_month")
                    .table(MonthlyPeriods::Table)
                    .col(MonthlyPeriods::ClientId)
                    .col(MonthlyPeriods::Year)
                    .col(MonthlyPeriods::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lifecycle sweeps filter on (year, month, state) across all clients
        manager
            .create_index(
                Index::create()
                    .name("idx_monthly_periods_year_month_state")
                    .table(MonthlyPeriods::Table)
                    .col(MonthlyPeriods::Year)
                    .col(MonthlyPeriods::Month)
                    .col(MonthlyPeriods::State)
                    .to_owned(),
            )
            .await?;

        let mut annual = Table::create();
        annual
            .table(AnnualPeriods::Table)
            .if_not_exists()
            .col(ColumnDef::new(AnnualPeriods::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(AnnualPeriods::ClientId).uuid().not_null())
            .col(ColumnDef::new(AnnualPeriods::Year).integer().not_null())
            .col(ColumnDef::new(AnnualPeriods::State).string_len(10).not_null().default("open"))
            .foreign_key(&mut client_fk("fk_annual_periods_client", AnnualPeriods::Table, AnnualPeriods::ClientId));
        add_balance_and_counter_columns(&mut annual);
        annual
            .col(timestamp(AnnualPeriods::CreatedAt))
            .col(timestamp(AnnualPeriods::UpdatedAt));
        manager.create_table(annual).await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_annual_periods_client_year")
                    .table(AnnualPeriods::Table)
                    .col(AnnualPeriods::ClientId)
                    .col(AnnualPeriods::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_annual_periods_year_state")
                    .table(AnnualPeriods::Table)
                    .col(AnnualPeriods::Year)
                    .col(AnnualPeriods::State)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: MOVEMENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Entradas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Entradas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Entradas::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Entradas::Date).date().not_null())
                    .col(ColumnDef::new(Entradas::Quantity).integer().not_null())
                    .col(ColumnDef::new(Entradas::InvoiceNumber).string_len(100).not_null())
                    .col(ColumnDef::new(Entradas::CreatedBy).uuid().null())
                    .col(timestamp(Entradas::CreatedAt))
                    .col(timestamp(Entradas::UpdatedAt))
                    .foreign_key(&mut client_fk("fk_entradas_client", Entradas::Table, Entradas::ClientId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entradas_client")
                    .table(Entradas::Table)
                    .col(Entradas::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Salidas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Salidas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Salidas::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Salidas::DocumentType).string_len(40).not_null())
                    .col(ColumnDef::new(Salidas::DocumentNumber).string_len(150).not_null())
                    .col(ColumnDef::new(Salidas::Date).date().not_null())
                    .col(ColumnDef::new(Salidas::Quantity).integer().not_null().default(1))
                    .col(ColumnDef::new(Salidas::CreatedBy).uuid().null())
                    .col(timestamp(Salidas::CreatedAt))
                    .foreign_key(&mut client_fk("fk_salidas_client", Salidas::Table, Salidas::ClientId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_salidas_client_document")
                    .table(Salidas::Table)
                    .col(Salidas::ClientId)
                    .col(Salidas::DocumentType)
                    .col(Salidas::DocumentNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ajustes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ajustes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ajustes::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Ajustes::Date).date().not_null())
                    .col(ColumnDef::new(Ajustes::Quantity).integer().not_null())
                    .col(ColumnDef::new(Ajustes::Description).string_len(255).not_null())
                    .col(ColumnDef::new(Ajustes::CreatedBy).uuid().null())
                    .col(timestamp(Ajustes::CreatedAt))
                    .col(timestamp(Ajustes::UpdatedAt))
                    .foreign_key(&mut client_fk("fk_ajustes_client", Ajustes::Table, Ajustes::ClientId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ajustes_client")
                    .table(Ajustes::Table)
                    .col(Ajustes::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ajustes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Salidas::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Entradas::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnnualPeriods::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyPeriods::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn client_fk<T: IntoTableRef, C: IntoIden>(name: &str, table: T, column: C) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Clients::Table, Clients::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

/// Opening/closing balance and the ten aggregate counters shared by the
/// monthly and annual tables.
fn add_balance_and_counter_columns(table: &mut TableCreateStatement) {
    for column in [
        PeriodColumns::OpeningBalance,
        PeriodColumns::ClosingBalance,
        PeriodColumns::TotalEntradas,
        PeriodColumns::TotalFacturas,
        PeriodColumns::TotalNotasCredito,
        PeriodColumns::TotalNotasDebito,
        PeriodColumns::TotalDocumentosSoporte,
        PeriodColumns::TotalAjusteDocumentosSoporte,
        PeriodColumns::TotalNominaElectronica,
        PeriodColumns::TotalAjusteNomina,
        PeriodColumns::TotalNotaAjuste,
        PeriodColumns::TotalAjustes,
    ] {
        table.col(ColumnDef::new(column).integer().not_null().default(0));
    }
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Name,
    TaxId,
    Balance,
    Blocked,
    Inactive,
    AlertThreshold,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MonthlyPeriods {
    Table,
    Id,
    ClientId,
    Year,
    Month,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AnnualPeriods {
    Table,
    Id,
    ClientId,
    Year,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum PeriodColumns {
    OpeningBalance,
    ClosingBalance,
    TotalEntradas,
    TotalFacturas,
    TotalNotasCredito,
    TotalNotasDebito,
    TotalDocumentosSoporte,
    TotalAjusteDocumentosSoporte,
    TotalNominaElectronica,
    TotalAjusteNomina,
    TotalNotaAjuste,
    TotalAjustes,
}

#[derive(DeriveIden)]
enum Entradas {
    Table,
    Id,
    ClientId,
    Date,
    Quantity,
    InvoiceNumber,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Salidas {
    Table,
    Id,
    ClientId,
    DocumentType,
    DocumentNumber,
    Date,
    Quantity,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Ajustes {
    Table,
    Id,
    ClientId,
    Date,
    Quantity,
    Description,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
