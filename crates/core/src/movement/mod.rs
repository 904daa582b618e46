//! Movement inputs and partial updates.
//!
//! - Entradas credit folios and can be edited or deleted.
//! - Ajustes apply a signed correction and can be edited or deleted.
//! - Salidas debit one folio per issued document and are append-only.
//!
//! Patch types hold `Option` fields: only supplied fields are merged over
//! the stored values.

mod ajuste;
mod entrada;
mod salida;

/// Largest folio magnitude a single entrada or ajuste may carry.
pub const MAX_MOVEMENT_QUANTITY: i32 = 1_000_000;

pub use ajuste::{AjustePatch, AjusteValues, NewAjuste};
pub use entrada::{EntradaPatch, EntradaValues, NewEntrada};
pub use salida::IssueRequest;
