//! Shared fixtures for the repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the
//! production migrator, a settable clock and an alert sink that records
//! what it receives.

#![allow(dead_code)]
#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use folio_core::{Actor, ClientProfile, FixedClock, NewClient, RoleGate, UserRole};
use folio_db::entities::{annual_periods, clients, monthly_periods};
use folio_db::migration::Migrator;
use folio_db::repositories::period::{find_annual, find_monthly};
use folio_db::{
    AjusteRepository, ClientRepository, EntradaRepository, LedgerContext, PeriodLifecycle,
    SalidaRepository, SummaryRepository,
};
use folio_shared::types::UserId;
use folio_shared::{AlertError, AlertSink, LowBalanceAlert};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn admin() -> Actor {
    Actor::new(UserId::new(), UserRole::Admin)
}

pub fn operator() -> Actor {
    Actor::new(UserId::new(), UserRole::Operator)
}

/// Alert sink that keeps every alert in memory.
#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    alerts: Mutex<Vec<LowBalanceAlert>>,
    fail: bool,
}

impl RecordingAlertSink {
    /// A sink whose deliveries always fail.
    pub fn failing() -> Self {
        Self {
            alerts: Mutex::default(),
            fail: true,
        }
    }

    pub fn received(&self) -> Vec<LowBalanceAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingAlertSink {
    async fn notify_low_balance(&self, alert: &LowBalanceAlert) -> Result<(), AlertError> {
        self.alerts.lock().unwrap().push(alert.clone());
        if self.fail {
            return Err(AlertError::SendError("smtp unreachable".to_string()));
        }
        Ok(())
    }
}

/// A migrated database plus the collaborators every repository needs.
pub struct TestLedger {
    pub db: DatabaseConnection,
    pub clock: Arc<FixedClock>,
    pub alerts: Arc<RecordingAlertSink>,
    pub ctx: LedgerContext,
}

impl TestLedger {
    pub async fn new(today: NaiveDate) -> Self {
        Self::with_sink(today, RecordingAlertSink::default()).await
    }

    pub async fn with_sink(today: NaiveDate, sink: RecordingAlertSink) -> Self {
        // One connection: every pooled connection would otherwise open its
        // own empty in-memory database.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let clock = Arc::new(FixedClock::new(today));
        let alerts = Arc::new(sink);
        let ctx = LedgerContext::new(db.clone(), clock.clone(), Arc::new(RoleGate), alerts.clone());

        Self {
            db,
            clock,
            alerts,
            ctx,
        }
    }

    pub fn clients(&self) -> ClientRepository {
        ClientRepository::new(self.ctx.clone())
    }

    pub fn entradas(&self) -> EntradaRepository {
        EntradaRepository::new(self.ctx.clone())
    }

    pub fn ajustes(&self) -> AjusteRepository {
        AjusteRepository::new(self.ctx.clone())
    }

    pub fn salidas(&self) -> SalidaRepository {
        SalidaRepository::new(self.ctx.clone())
    }

    pub fn lifecycle(&self) -> PeriodLifecycle {
        PeriodLifecycle::new(self.ctx.clone())
    }

    pub fn summaries(&self) -> SummaryRepository {
        SummaryRepository::new(self.db.clone())
    }

    /// Registers a client through the repository.
    pub async fn create_client(
        &self,
        tax_id: &str,
        initial_balance: i32,
        alert_threshold: i32,
        blocked: bool,
    ) -> clients::Model {
        let input = NewClient {
            profile: ClientProfile {
                name: format!("Client {tax_id}"),
                tax_id: tax_id.to_string(),
                blocked,
                inactive: false,
                alert_threshold,
            },
            initial_balance,
        };
        self.clients().create(&admin(), input).await.unwrap()
    }

    pub async fn balance(&self, client_id: Uuid) -> i32 {
        clients::Entity::find_by_id(client_id)
            .one(&self.db)
            .await
            .unwrap()
            .unwrap()
            .balance
    }

    pub async fn monthly(&self, client_id: Uuid, year: i32, month: u32) -> Option<monthly_periods::Model> {
        let key = folio_core::PeriodKey::new(year, month).unwrap();
        find_monthly(&self.db, client_id, key).await.unwrap()
    }

    pub async fn annual(&self, client_id: Uuid, year: i32) -> Option<annual_periods::Model> {
        find_annual(&self.db, client_id, year).await.unwrap()
    }

    pub async fn monthly_count(&self) -> usize {
        monthly_periods::Entity::find().all(&self.db).await.unwrap().len()
    }

    pub async fn annual_count(&self) -> usize {
        annual_periods::Entity::find().all(&self.db).await.unwrap().len()
    }
}
