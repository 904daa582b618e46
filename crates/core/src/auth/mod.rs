//! Operator roles and the authorization gate.
//!
//! Every mutating ledger operation asks an [`AuthorizationGate`] whether the
//! acting principal may proceed. Identity and session handling live outside
//! this crate; the gate only sees an [`Actor`].

use serde::{Deserialize, Serialize};
use folio_shared::types::UserId;

use crate::error::LedgerError;

/// User roles within the folio back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Can mutate clients, movements and periods.
    Admin,
    /// Read-only access.
    Operator,
}

impl UserRole {
    /// Returns true if this role can mutate ledger state.
    #[must_use]
    pub const fn can_mutate_ledger(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Operator => write!(f, "operator"),
        }
    }
}

/// The principal performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Who is acting.
    pub user_id: UserId,
    /// What they are allowed to do.
    pub role: UserRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// The actor used by scheduled jobs (rollover, month sync).
    #[must_use]
    pub fn system() -> Self {
        Self {
            user_id: UserId::from_uuid(uuid::Uuid::nil()),
            role: UserRole::Admin,
        }
    }
}

/// Decides whether an actor may mutate ledger state.
pub trait AuthorizationGate: Send + Sync {
    /// Returns true if the actor holds administrative rights.
    fn is_admin(&self, actor: &Actor) -> bool;
}

/// Gate that trusts the role carried by the actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGate;

impl AuthorizationGate for RoleGate {
    fn is_admin(&self, actor: &Actor) -> bool {
        actor.role.can_mutate_ledger()
    }
}

/// Fails with [`LedgerError::Forbidden`] unless the gate admits the actor.
pub fn require_admin(gate: &dyn AuthorizationGate, actor: &Actor) -> Result<(), LedgerError> {
    if gate.is_admin(actor) {
        Ok(())
    } else {
        Err(LedgerError::Forbidden)
    }
}
