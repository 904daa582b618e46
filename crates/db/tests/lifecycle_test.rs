//! Period lifecycle integration tests: lazy close, year-end rollover, sync
//! and manual close.

mod common;

use common::{TestLedger, admin, date, operator};
use folio_core::{AjusteValues, EntradaValues, IssueRequest, LedgerError, NewAjuste, NewEntrada};
use folio_db::entities::sea_orm_active_enums::PeriodState;
use folio_db::{RolloverOutcome, SyncOutcome};
use folio_shared::types::ClientId;
use uuid::Uuid;

fn entrada(client_id: Uuid, on: chrono::NaiveDate, quantity: i32) -> NewEntrada {
    NewEntrada {
        client_id: ClientId::from_uuid(client_id),
        values: EntradaValues {
            date: on,
            quantity,
            invoice_number: "FV-100".to_string(),
        },
    }
}

#[tokio::test]
async fn test_movement_after_new_year_rolls_over() {
    let ledger = TestLedger::new(date(2025, 12, 10)).await;
    let client = ledger.create_client("900100", 20, 0, false).await;
    ledger
        .entradas()
        .create(&admin(), entrada(client.id, date(2025, 12, 5), 5))
        .await
        .unwrap();

    ledger.clock.set(date(2026, 1, 15));
    ledger
        .entradas()
        .create(&admin(), entrada(client.id, date(2026, 1, 10), 3))
        .await
        .unwrap();

    let closed_year = ledger.annual(client.id, 2025).await.unwrap();
    assert_eq!(closed_year.state, PeriodState::Closed);
    assert_eq!(closed_year.closing_balance, 25);
    assert_eq!(closed_year.total_entradas, 5);

    let december = ledger.monthly(client.id, 2025, 12).await.unwrap();
    assert_eq!(december.state, PeriodState::Closed);
    assert_eq!(december.closing_balance, 25);

    let new_year = ledger.annual(client.id, 2026).await.unwrap();
    assert_eq!(new_year.state, PeriodState::Open);
    assert_eq!(new_year.opening_balance, 25);
    assert_eq!(new_year.closing_balance, 28);
    assert_eq!(new_year.total_entradas, 3);

    let january = ledger.monthly(client.id, 2026, 1).await.unwrap();
    assert_eq!(january.state, PeriodState::Open);
    assert_eq!(january.opening_balance, 25);
    assert_eq!(january.closing_balance, 28);
    assert_eq!(january.total_entradas, 3);

    let february = ledger.monthly(client.id, 2026, 2).await.unwrap();
    assert_eq!(february.state, PeriodState::Closed);
    assert_eq!(february.opening_balance, 0);

    assert_eq!(ledger.monthly_count().await, 24);
    assert_eq!(ledger.annual_count().await, 2);
}

#[tokio::test]
async fn test_late_first_movement_of_the_year_opens_its_month() {
    let ledger = TestLedger::new(date(2025, 12, 10)).await;
    let client = ledger.create_client("900100", 20, 0, false).await;

    ledger.clock.set(date(2026, 3, 4));
    let input = NewAjuste {
        client_id: ClientId::from_uuid(client.id),
        values: AjusteValues {
            date: date(2026, 3, 4),
            quantity: -2,
            description: "Correction".to_string(),
        },
    };
    ledger.ajustes().create(&admin(), input).await.unwrap();

    let january = ledger.monthly(client.id, 2026, 1).await.unwrap();
    assert_eq!(january.state, PeriodState::Closed);

    let march = ledger.monthly(client.id, 2026, 3).await.unwrap();
    assert_eq!(march.state, PeriodState::Open);
    assert_eq!(march.opening_balance, 20);
    assert_eq!(march.closing_balance, 18);
    assert_eq!(march.total_ajustes, -2);

    assert_eq!(ledger.annual(client.id, 2025).await.unwrap().state, PeriodState::Closed);
}

#[tokio::test]
async fn test_rollover_twice_is_a_no_op() {
    let ledger = TestLedger::new(date(2026, 11, 3)).await;
    let first = ledger.create_client("900100", 7, 0, false).await;
    ledger.create_client("900200", 3, 0, false).await;

    let outcome = ledger.lifecycle().rollover_year(&admin(), 2026).await.unwrap();
    assert_eq!(outcome, RolloverOutcome::Completed { year: 2026, clients: 2 });
    assert_eq!(ledger.monthly_count().await, 48);
    assert_eq!(ledger.annual_count().await, 4);

    let next = ledger.annual(first.id, 2027).await.unwrap();
    assert_eq!(next.state, PeriodState::Open);
    assert_eq!(next.opening_balance, 7);
    let january = ledger.monthly(first.id, 2027, 1).await.unwrap();
    assert_eq!(january.state, PeriodState::Open);
    assert_eq!(january.opening_balance, 7);
    let november = ledger.monthly(first.id, 2026, 11).await.unwrap();
    assert_eq!(november.state, PeriodState::Closed);

    let again = ledger.lifecycle().rollover_year(&admin(), 2026).await.unwrap();
    assert_eq!(again, RolloverOutcome::AlreadyClosed { year: 2026 });
    assert_eq!(ledger.monthly_count().await, 48);
    assert_eq!(ledger.annual_count().await, 4);
    assert_eq!(ledger.annual(first.id, 2027).await.unwrap(), next);

    let never = ledger.lifecycle().rollover_year(&admin(), 1999).await.unwrap();
    assert_eq!(never, RolloverOutcome::AlreadyClosed { year: 1999 });
}

#[tokio::test]
async fn test_rollover_requires_admin() {
    let ledger = TestLedger::new(date(2026, 11, 3)).await;
    ledger.create_client("900100", 7, 0, false).await;

    let err = ledger.lifecycle().rollover_year(&operator(), 2026).await.unwrap_err();
    assert!(matches!(err.as_ledger(), Some(LedgerError::Forbidden)));
    assert_eq!(ledger.annual_count().await, 1);
}

#[tokio::test]
async fn test_closed_month_is_frozen() {
    let ledger = TestLedger::new(date(2026, 3, 10)).await;
    let client = ledger.create_client("900100", 10, 0, false).await;
    ledger
        .entradas()
        .create(&admin(), entrada(client.id, date(2026, 3, 5), 5))
        .await
        .unwrap();
    let march_before = ledger.monthly(client.id, 2026, 3).await.unwrap();

    ledger.clock.set(date(2026, 4, 2));
    let request = IssueRequest::parse("900100", "FACTURA", "FE-1").unwrap();
    ledger.salidas().issue(&admin(), request).await.unwrap();

    let march = ledger.monthly(client.id, 2026, 3).await.unwrap();
    assert_eq!(march.state, PeriodState::Closed);
    assert_eq!(march.closing_balance, 15);
    assert_eq!(march.counters(), march_before.counters());

    let april = ledger.monthly(client.id, 2026, 4).await.unwrap();
    assert_eq!(april.state, PeriodState::Open);
    assert_eq!(april.opening_balance, 15);
    assert_eq!(april.closing_balance, 14);
    assert_eq!(april.total_facturas, 1);

    let err = ledger
        .entradas()
        .create(&admin(), entrada(client.id, date(2026, 3, 31), 1))
        .await
        .unwrap_err();
    assert!(matches!(err.as_ledger(), Some(LedgerError::WrongPeriod { .. })));

    let err = ledger
        .lifecycle()
        .require_open(client.id, date(2026, 3, 31))
        .await
        .unwrap_err();
    assert!(matches!(err.as_ledger(), Some(LedgerError::PeriodClosed { year: 2026, month: 3 })));

    let err = ledger
        .lifecycle()
        .require_open(client.id, date(2030, 1, 1))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PERIOD_NOT_FOUND");
}

#[tokio::test]
async fn test_ensure_current_open_for_idle_client() {
    let ledger = TestLedger::new(date(2026, 3, 10)).await;
    let client = ledger.create_client("900100", 10, 0, false).await;

    ledger.clock.set(date(2026, 6, 1));
    let june = ledger
        .lifecycle()
        .ensure_current_open(&admin(), client.id)
        .await
        .unwrap();
    assert_eq!(june.state, PeriodState::Open);
    assert_eq!(june.opening_balance, 10);
    assert_eq!(
        ledger.monthly(client.id, 2026, 3).await.unwrap().state,
        PeriodState::Closed
    );

    let err = ledger
        .lifecycle()
        .ensure_current_open(&operator(), client.id)
        .await
        .unwrap_err();
    assert_eq!(err.http_status_code(), 403);
}

#[tokio::test]
async fn test_sync_realigns_every_client() {
    let ledger = TestLedger::new(date(2026, 3, 10)).await;
    let first = ledger.create_client("900100", 10, 0, false).await;
    let second = ledger.create_client("900200", 4, 0, false).await;

    ledger.clock.set(date(2026, 5, 1));
    let outcome = ledger.lifecycle().sync_current_month(&admin()).await.unwrap();
    assert_eq!(outcome, SyncOutcome::Synced { closed: 2, opened: 2 });

    for client_id in [first.id, second.id] {
        assert_eq!(
            ledger.monthly(client_id, 2026, 3).await.unwrap().state,
            PeriodState::Closed
        );
        assert_eq!(
            ledger.monthly(client_id, 2026, 5).await.unwrap().state,
            PeriodState::Open
        );
    }

    let again = ledger.lifecycle().sync_current_month(&admin()).await.unwrap();
    assert_eq!(again, SyncOutcome::AlreadyCurrent);
}

#[tokio::test]
async fn test_close_month_snapshots_balance() {
    let ledger = TestLedger::new(date(2026, 3, 10)).await;
    let client = ledger.create_client("900100", 10, 0, false).await;

    let closed = ledger
        .lifecycle()
        .close_month(&admin(), client.id, 2026, 3)
        .await
        .unwrap();
    assert_eq!(closed.state, PeriodState::Closed);
    assert_eq!(closed.closing_balance, 10);

    let again = ledger
        .lifecycle()
        .close_month(&admin(), client.id, 2026, 3)
        .await
        .unwrap();
    assert_eq!(again, closed);

    let err = ledger
        .lifecycle()
        .close_month(&admin(), client.id, 2026, 13)
        .await
        .unwrap_err();
    assert!(matches!(err.as_ledger(), Some(LedgerError::InvalidMonth(13))));

    let err = ledger
        .lifecycle()
        .close_month(&admin(), client.id, 2031, 1)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PERIOD_NOT_FOUND");
}

#[tokio::test]
async fn test_summaries_never_create_periods() {
    let ledger = TestLedger::new(date(2026, 3, 10)).await;
    let client = ledger.create_client("900100", 10, 0, false).await;
    ledger
        .entradas()
        .create(&admin(), entrada(client.id, date(2026, 3, 1), 2))
        .await
        .unwrap();

    let monthly = ledger.summaries().monthly_by_tax_id("900100", 2026, 3).await.unwrap();
    assert_eq!(monthly.total_entradas, 2);
    assert_eq!(monthly.closing_balance, 12);

    let annual = ledger.summaries().annual_by_tax_id("900100", 2026).await.unwrap();
    assert_eq!(annual.total_entradas, 2);

    let err = ledger.summaries().annual_by_tax_id("900100", 2024).await.unwrap_err();
    assert_eq!(err.error_code(), "PERIOD_NOT_FOUND");
    let err = ledger.summaries().monthly_by_tax_id("missing", 2026, 3).await.unwrap_err();
    assert_eq!(err.error_code(), "CLIENT_NOT_FOUND");
    assert_eq!(ledger.annual_count().await, 1);
}
