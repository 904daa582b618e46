//! Core business logic for Folio.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `period` - Calendar period keys, open/closed status and posting rules
//! - `document` - Document types and the counter each one feeds
//! - `counters` - Per-period aggregate counters
//! - `issuance` - The folio issuance decision table
//! - `movement` - Entrada, salida and ajuste inputs and partial updates
//! - `client` - Client inputs and partial updates
//! - `clock` - The injectable "today"
//! - `auth` - Operator roles and the authorization gate

pub mod auth;
pub mod client;
pub mod clock;
pub mod counters;
pub mod document;
pub mod error;
pub mod issuance;
pub mod movement;
pub mod period;
mod validation;

pub use auth::{Actor, AuthorizationGate, RoleGate, UserRole, require_admin};
pub use client::{ClientPatch, ClientProfile, NewClient};
pub use clock::{Clock, FixedClock, SystemClock, clock_from_config};
pub use counters::PeriodCounters;
pub use document::{CounterKind, DocumentType};
pub use error::LedgerError;
pub use issuance::{ClientStanding, IssuanceDecision, IssuanceOutcome, IssuanceStatus, decide_issuance};
pub use movement::{
    AjustePatch, AjusteValues, EntradaPatch, EntradaValues, IssueRequest, MAX_MOVEMENT_QUANTITY, NewAjuste,
    NewEntrada,
};
pub use period::{PeriodKey, PeriodStatus};
