//! Client management integration tests.

mod common;

use common::{TestLedger, admin, date, operator};
use folio_core::{ClientPatch, ClientProfile, LedgerError, NewClient};
use folio_db::StoreError;
use folio_db::entities::sea_orm_active_enums::PeriodState;

fn new_client(tax_id: &str, initial_balance: i32) -> NewClient {
    NewClient {
        profile: ClientProfile {
            name: "Dream Corp".to_string(),
            tax_id: tax_id.to_string(),
            blocked: false,
            inactive: false,
            alert_threshold: 10,
        },
        initial_balance,
    }
}

#[tokio::test]
async fn test_create_materialises_current_year() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;
    let client = ledger.clients().create(&admin(), new_client("900100", 50)).await.unwrap();

    assert_eq!(client.balance, 50);
    assert_eq!(ledger.monthly_count().await, 12);
    assert_eq!(ledger.annual_count().await, 1);

    let annual = ledger.annual(client.id, 2026).await.unwrap();
    assert_eq!(annual.state, PeriodState::Open);
    assert_eq!(annual.opening_balance, 50);
    assert_eq!(annual.closing_balance, 50);

    let april = ledger.monthly(client.id, 2026, 4).await.unwrap();
    assert_eq!(april.state, PeriodState::Open);
    assert_eq!(april.opening_balance, 50);

    for month in [1, 3, 5, 12] {
        let other = ledger.monthly(client.id, 2026, month).await.unwrap();
        assert_eq!(other.state, PeriodState::Closed);
        assert_eq!(other.opening_balance, 0);
        assert_eq!(other.closing_balance, 0);
    }
}

#[tokio::test]
async fn test_duplicate_tax_id_conflicts() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;
    ledger.clients().create(&admin(), new_client("900100", 0)).await.unwrap();

    let err = ledger
        .clients()
        .create(&admin(), new_client("900100", 5))
        .await
        .unwrap_err();
    assert!(matches!(err.as_ledger(), Some(LedgerError::DuplicateTaxId(_))));
    assert_eq!(err.http_status_code(), 409);
    assert_eq!(ledger.clients().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_operator_cannot_mutate() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;

    let err = ledger
        .clients()
        .create(&operator(), new_client("900100", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Ledger(LedgerError::Forbidden)));
    assert!(ledger.clients().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_by_id_and_tax_id() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;
    let client = ledger.create_client("900100", 5, 1, false).await;

    assert_eq!(ledger.clients().get(client.id).await.unwrap().tax_id, "900100");
    assert_eq!(ledger.clients().get_by_tax_id("900100").await.unwrap().id, client.id);

    let err = ledger.clients().get_by_tax_id("missing").await.unwrap_err();
    assert_eq!(err.error_code(), "CLIENT_NOT_FOUND");
    assert_eq!(err.http_status_code(), 404);
}

#[tokio::test]
async fn test_patch_updates_only_supplied_fields() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;
    let client = ledger.create_client("900100", 5, 1, false).await;

    let patch = ClientPatch {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let updated = ledger.clients().update(&admin(), client.id, patch).await.unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.tax_id, "900100");
    assert_eq!(updated.alert_threshold, 1);
    assert_eq!(updated.balance, 5);
}

#[tokio::test]
async fn test_patch_to_taken_tax_id_conflicts() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;
    ledger.create_client("900100", 0, 0, false).await;
    let second = ledger.create_client("900200", 0, 0, false).await;

    let patch = ClientPatch {
        tax_id: Some("900100".to_string()),
        ..Default::default()
    };
    let err = ledger.clients().update(&admin(), second.id, patch).await.unwrap_err();
    assert!(matches!(err.as_ledger(), Some(LedgerError::DuplicateTaxId(_))));
}

#[tokio::test]
async fn test_inactivating_blocks_and_stays_blocked() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;
    let client = ledger.create_client("900100", 5, 1, false).await;

    let inactive = ledger.clients().set_inactive(&admin(), client.id, true).await.unwrap();
    assert!(inactive.inactive);
    assert!(inactive.blocked);

    let err = ledger
        .clients()
        .set_blocked(&admin(), client.id, false)
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ledger(),
        Some(LedgerError::InactiveClientMustStayBlocked(_))
    ));
    assert_eq!(err.http_status_code(), 409);

    let reactivated = ledger.clients().set_inactive(&admin(), client.id, false).await.unwrap();
    assert!(!reactivated.inactive);
    assert!(reactivated.blocked);
    let unblocked = ledger.clients().set_blocked(&admin(), client.id, false).await.unwrap();
    assert!(!unblocked.blocked);
}

#[tokio::test]
async fn test_delete_removes_periods_and_movements() {
    let ledger = TestLedger::new(date(2026, 4, 15)).await;
    let client = ledger.create_client("900100", 5, 1, false).await;
    let keep = ledger.create_client("900200", 5, 1, false).await;

    ledger
        .entradas()
        .create(
            &admin(),
            folio_core::NewEntrada {
                client_id: folio_shared::types::ClientId::from_uuid(client.id),
                values: folio_core::EntradaValues {
                    date: date(2026, 4, 10),
                    quantity: 3,
                    invoice_number: "FV-1".to_string(),
                },
            },
        )
        .await
        .unwrap();

    ledger.clients().delete(&admin(), client.id).await.unwrap();

    assert!(ledger.clients().get(client.id).await.is_err());
    assert!(ledger.entradas().list().await.unwrap().is_empty());
    assert_eq!(ledger.monthly_count().await, 12);
    assert_eq!(ledger.annual_count().await, 1);
    assert!(ledger.annual(keep.id, 2026).await.is_some());
}
