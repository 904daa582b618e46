//! The folio issuance decision table.
//!
//! Issuing a fiscal document consumes exactly one folio. Whether that is
//! allowed depends on the client's live balance, its `blocked` and
//! `inactive` flags and its alert threshold. Rejections are ordinary
//! decisions, never errors.
//!
//! The asymmetry is deliberate: a blocked client is refused only once its
//! balance is at or below zero, while an unblocked client may go
//! arbitrarily negative.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[cfg(test)]
mod decision_props;

/// Folios consumed by one issued document.
pub const ISSUANCE_QUANTITY: i32 = 1;

/// Whether the document may be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuanceStatus {
    /// The document may be issued.
    Approved,
    /// The document must not be issued.
    Rejected,
}

/// Which row of the decision table was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuanceOutcome {
    /// Approved with plenty of balance left.
    Approved,
    /// Approved, remaining balance at or below the alert threshold.
    LowBalance,
    /// Approved, balance now exactly zero.
    Depleted,
    /// Approved, balance now negative.
    Negative,
    /// Same document already issued; nothing consumed.
    Duplicate,
    /// Rejected: client is inactive.
    Inactive,
    /// Rejected: client is blocked and has no folios.
    NoFolios,
}

/// The client facts the decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientStanding {
    /// Live balance before the issuance.
    pub balance: i32,
    /// Blocked clients are refused at zero balance.
    pub blocked: bool,
    /// Inactive clients are always refused.
    pub inactive: bool,
    /// Balances at or below this trigger a warning.
    pub alert_threshold: i32,
}

/// The result of evaluating one issuance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceDecision {
    /// Approved or rejected.
    pub status: IssuanceStatus,
    /// Which rule fired.
    pub outcome: IssuanceOutcome,
    /// Human-readable message for the caller.
    pub message: String,
    /// Live balance once the decision is applied.
    pub balance_after: i32,
}

impl IssuanceDecision {
    fn new(status: IssuanceStatus, outcome: IssuanceOutcome, message: String, balance_after: i32) -> Self {
        Self {
            status,
            outcome,
            message,
            balance_after,
        }
    }

    /// Returns true if the decision records a salida and debits the balance.
    #[must_use]
    pub const fn consumes_folio(&self) -> bool {
        matches!(self.status, IssuanceStatus::Approved)
            && !matches!(self.outcome, IssuanceOutcome::Duplicate)
    }

    /// Returns true if operators should be told about the client's balance.
    #[must_use]
    pub const fn should_alert(&self) -> bool {
        matches!(
            self.outcome,
            IssuanceOutcome::LowBalance
                | IssuanceOutcome::Depleted
                | IssuanceOutcome::Negative
                | IssuanceOutcome::NoFolios
        )
    }
}

const MSG_APPROVED: &str = "Operation approved.";
const MSG_DEPLETED: &str = "No folios available. Contact your provider.";
const MSG_NO_FOLIOS: &str = "Client has no folios available. Contact your provider to purchase more folios.";
const MSG_INACTIVE: &str = "Client is inactive and cannot issue documents.";
const MSG_DUPLICATE: &str = "Duplicate document. No folio was consumed.";

fn low_balance_message(after: i32) -> String {
    format!("Remaining folios: {after}. Purchasing more folios is recommended.")
}

fn negative_message(after: i32) -> String {
    format!("Insufficient balance. Your balance is negative ({after}). Contact your provider.")
}

/// Decides whether a client may issue one document.
///
/// `duplicate` is true when a salida with the same document type and number
/// already exists for the client.
///
/// # Errors
///
/// Returns `BalanceOverflow` when the balance cannot absorb one more debit.
pub fn decide_issuance(client: &ClientStanding, duplicate: bool) -> Result<IssuanceDecision, LedgerError> {
    use IssuanceOutcome as O;
    use IssuanceStatus as S;

    let balance = client.balance;

    if client.inactive {
        return Ok(IssuanceDecision::new(S::Rejected, O::Inactive, MSG_INACTIVE.to_string(), balance));
    }

    if duplicate {
        return Ok(IssuanceDecision::new(S::Approved, O::Duplicate, MSG_DUPLICATE.to_string(), balance));
    }

    if client.blocked && balance <= 0 {
        return Ok(IssuanceDecision::new(S::Rejected, O::NoFolios, MSG_NO_FOLIOS.to_string(), balance));
    }

    let after = balance
        .checked_sub(ISSUANCE_QUANTITY)
        .ok_or(LedgerError::BalanceOverflow {
            balance,
            delta: -ISSUANCE_QUANTITY,
        })?;

    if client.blocked {
        if after <= client.alert_threshold {
            return Ok(IssuanceDecision::new(S::Approved, O::LowBalance, low_balance_message(after), after));
        }
        return Ok(IssuanceDecision::new(S::Approved, O::Approved, MSG_APPROVED.to_string(), after));
    }

    let decision = match balance.cmp(&ISSUANCE_QUANTITY) {
        std::cmp::Ordering::Greater => {
            if after == 0 {
                IssuanceDecision::new(S::Approved, O::Depleted, MSG_DEPLETED.to_string(), after)
            } else if after <= client.alert_threshold {
                IssuanceDecision::new(S::Approved, O::LowBalance, low_balance_message(after), after)
            } else {
                IssuanceDecision::new(S::Approved, O::Approved, MSG_APPROVED.to_string(), after)
            }
        }
        std::cmp::Ordering::Equal => {
            IssuanceDecision::new(S::Approved, O::Depleted, MSG_DEPLETED.to_string(), 0)
        }
        std::cmp::Ordering::Less => {
            IssuanceDecision::new(S::Approved, O::Negative, negative_message(after), after)
        }
    };
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn standing(balance: i32, blocked: bool, alert_threshold: i32) -> ClientStanding {
        ClientStanding {
            balance,
            blocked,
            inactive: false,
            alert_threshold,
        }
    }

    #[rstest]
    // unblocked
    #[case(standing(10, false, 5), IssuanceOutcome::Approved, 9)]
    #[case(standing(6, false, 5), IssuanceOutcome::LowBalance, 5)]
    #[case(standing(2, false, 5), IssuanceOutcome::LowBalance, 1)]
    #[case(standing(1, false, 5), IssuanceOutcome::Depleted, 0)]
    #[case(standing(0, false, 5), IssuanceOutcome::Negative, -1)]
    #[case(standing(-4, false, 5), IssuanceOutcome::Negative, -5)]
    #[case(standing(2, false, -1), IssuanceOutcome::Approved, 1)]
    // blocked
    #[case(standing(10, true, 5), IssuanceOutcome::Approved, 9)]
    #[case(standing(3, true, 5), IssuanceOutcome::LowBalance, 2)]
    #[case(standing(1, true, 0), IssuanceOutcome::LowBalance, 0)]
    fn test_approved_rows(
        #[case] client: ClientStanding,
        #[case] outcome: IssuanceOutcome,
        #[case] after: i32,
    ) {
        let decision = decide_issuance(&client, false).unwrap();
        assert_eq!(decision.status, IssuanceStatus::Approved);
        assert_eq!(decision.outcome, outcome);
        assert_eq!(decision.balance_after, after);
        assert!(decision.consumes_folio());
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn test_blocked_without_folios_is_rejected(#[case] balance: i32) {
        let decision = decide_issuance(&standing(balance, true, 5), false).unwrap();
        assert_eq!(decision.status, IssuanceStatus::Rejected);
        assert_eq!(decision.outcome, IssuanceOutcome::NoFolios);
        assert_eq!(decision.balance_after, balance);
        assert!(!decision.consumes_folio());
        assert!(decision.should_alert());
    }

    #[test]
    fn test_inactive_wins_over_duplicate() {
        let client = ClientStanding {
            balance: 50,
            blocked: true,
            inactive: true,
            alert_threshold: 0,
        };
        let decision = decide_issuance(&client, true).unwrap();
        assert_eq!(decision.outcome, IssuanceOutcome::Inactive);
        assert_eq!(decision.status, IssuanceStatus::Rejected);
        assert_eq!(decision.message, "Client is inactive and cannot issue documents.");
    }

    #[test]
    fn test_duplicate_is_approved_without_debit() {
        let decision = decide_issuance(&standing(0, true, 5), true).unwrap();
        assert_eq!(decision.status, IssuanceStatus::Approved);
        assert_eq!(decision.outcome, IssuanceOutcome::Duplicate);
        assert_eq!(decision.balance_after, 0);
        assert!(!decision.consumes_folio());
        assert!(!decision.should_alert());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            decide_issuance(&standing(10, false, 5), false).unwrap().message,
            "Operation approved."
        );
        assert_eq!(
            decide_issuance(&standing(6, false, 5), false).unwrap().message,
            "Remaining folios: 5. Purchasing more folios is recommended."
        );
        assert_eq!(
            decide_issuance(&standing(1, false, 5), false).unwrap().message,
            "No folios available. Contact your provider."
        );
        assert_eq!(
            decide_issuance(&standing(0, false, 5), false).unwrap().message,
            "Insufficient balance. Your balance is negative (-1). Contact your provider."
        );
    }

    #[test]
    fn test_most_negative_balance_cannot_be_debited() {
        let err = decide_issuance(&standing(i32::MIN, false, 5), false).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::BalanceOverflow { balance: i32::MIN, delta: -1 }
        ));

        // Outcomes that debit nothing are still decided.
        let blocked = decide_issuance(&standing(i32::MIN, true, 5), false).unwrap();
        assert_eq!(blocked.outcome, IssuanceOutcome::NoFolios);
        let duplicate = decide_issuance(&standing(i32::MIN, false, 5), true).unwrap();
        assert_eq!(duplicate.outcome, IssuanceOutcome::Duplicate);
    }

    #[test]
    fn test_alerting_outcomes() {
        assert!(!decide_issuance(&standing(10, false, 5), false).unwrap().should_alert());
        assert!(decide_issuance(&standing(6, false, 5), false).unwrap().should_alert());
        assert!(decide_issuance(&standing(1, false, 5), false).unwrap().should_alert());
        assert!(decide_issuance(&standing(0, false, 5), false).unwrap().should_alert());
    }
}
