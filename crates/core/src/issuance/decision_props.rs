//! Property-based tests for the issuance decision table.

use proptest::prelude::*;

use super::{ClientStanding, IssuanceOutcome, IssuanceStatus, ISSUANCE_QUANTITY, decide_issuance};

fn standing_strategy() -> impl Strategy<Value = ClientStanding> {
    (-1_000i32..1_000, any::<bool>(), any::<bool>(), -50i32..50).prop_map(
        |(balance, blocked, inactive, alert_threshold)| ClientStanding {
            balance,
            // inactive implies blocked
            blocked: blocked || inactive,
            inactive,
            alert_threshold,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Approved non-duplicate decisions debit exactly one folio; everything
    /// else leaves the balance untouched.
    #[test]
    fn prop_balance_moves_by_one_or_not_at_all(
        client in standing_strategy(),
        duplicate in any::<bool>(),
    ) {
        let decision = decide_issuance(&client, duplicate).unwrap();
        if decision.consumes_folio() {
            prop_assert_eq!(decision.balance_after, client.balance - ISSUANCE_QUANTITY);
        } else {
            prop_assert_eq!(decision.balance_after, client.balance);
        }
    }

    /// Only inactive clients and blocked clients without folios are refused.
    #[test]
    fn prop_rejection_rules(
        client in standing_strategy(),
        duplicate in any::<bool>(),
    ) {
        let decision = decide_issuance(&client, duplicate).unwrap();
        let must_reject = client.inactive || (!duplicate && client.blocked && client.balance <= 0);
        prop_assert_eq!(decision.status == IssuanceStatus::Rejected, must_reject);
    }

    /// An unblocked active client is never refused, whatever its balance.
    #[test]
    fn prop_unblocked_never_rejected(
        balance in -10_000i32..10_000,
        alert_threshold in -50i32..50,
    ) {
        let client = ClientStanding { balance, blocked: false, inactive: false, alert_threshold };
        let decision = decide_issuance(&client, false).unwrap();
        prop_assert_eq!(decision.status, IssuanceStatus::Approved);
        if decision.balance_after < 0 {
            prop_assert_eq!(decision.outcome, IssuanceOutcome::Negative);
        }
    }

    /// Duplicates of an active client are approved and free.
    #[test]
    fn prop_duplicate_is_free(
        balance in -1_000i32..1_000,
        blocked in any::<bool>(),
        alert_threshold in -50i32..50,
    ) {
        let client = ClientStanding { balance, blocked, inactive: false, alert_threshold };
        let decision = decide_issuance(&client, true).unwrap();
        prop_assert_eq!(decision.outcome, IssuanceOutcome::Duplicate);
        prop_assert!(!decision.consumes_folio());
    }
}
