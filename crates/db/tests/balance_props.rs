//! Property: after any sequence of movements the live balance equals the
//! initial balance plus entradas, minus distinct salidas, plus ajustes, and
//! the open month mirrors it.

mod common;

use std::collections::HashSet;

use common::{TestLedger, admin, date};
use folio_core::{AjusteValues, EntradaValues, IssueRequest, NewAjuste, NewEntrada};
use folio_shared::types::ClientId;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Movement {
    Entrada(i32),
    Salida(u8),
    Ajuste(i32),
}

fn movement() -> impl Strategy<Value = Movement> {
    prop_oneof![
        (1i32..20).prop_map(Movement::Entrada),
        // A narrow range of document numbers makes duplicates common.
        (0u8..5).prop_map(Movement::Salida),
        (-10i32..10)
            .prop_filter("ajustes are never zero", |q| *q != 0)
            .prop_map(Movement::Ajuste),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_balance_equals_movement_sum(
        initial in -5i32..30,
        movements in prop::collection::vec(movement(), 1..12),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async move {
            let today = date(2026, 9, 14);
            let ledger = TestLedger::new(today).await;
            let client = ledger.create_client("900100", initial, 3, false).await;

            let mut entradas = 0;
            let mut ajustes = 0;
            let mut documents = HashSet::new();

            for movement in &movements {
                match *movement {
                    Movement::Entrada(quantity) => {
                        let input = NewEntrada {
                            client_id: ClientId::from_uuid(client.id),
                            values: EntradaValues {
                                date: today,
                                quantity,
                                invoice_number: "FV-PROP".to_string(),
                            },
                        };
                        ledger.entradas().create(&admin(), input).await.unwrap();
                        entradas += quantity;
                    }
                    Movement::Salida(number) => {
                        let request =
                            IssueRequest::parse("900100", "FACTURA", format!("FE-{number}")).unwrap();
                        ledger.salidas().issue(&admin(), request).await.unwrap();
                        documents.insert(number);
                    }
                    Movement::Ajuste(quantity) => {
                        let input = NewAjuste {
                            client_id: ClientId::from_uuid(client.id),
                            values: AjusteValues {
                                date: today,
                                quantity,
                                description: "Property".to_string(),
                            },
                        };
                        ledger.ajustes().create(&admin(), input).await.unwrap();
                        ajustes += quantity;
                    }
                }
            }

            let salidas = i32::try_from(documents.len()).unwrap();
            let expected = initial + entradas - salidas + ajustes;
            prop_assert_eq!(ledger.balance(client.id).await, expected);

            let month = ledger.monthly(client.id, 2026, 9).await.unwrap();
            prop_assert_eq!(month.closing_balance, expected);
            prop_assert_eq!(month.total_entradas, entradas);
            prop_assert_eq!(month.total_ajustes, ajustes);
            prop_assert_eq!(month.total_facturas, salidas);

            let year = ledger.annual(client.id, 2026).await.unwrap();
            prop_assert_eq!(year.closing_balance, expected);
            prop_assert_eq!(year.counters(), month.counters());
            Ok(())
        })?;
    }
}
