//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//!
//! The free functions in [`period`] and [`lifecycle`] take the caller's
//! transaction so that a movement, its balance change and both period rows
//! commit or roll back together.

mod ajuste;
mod client;
mod entrada;
pub mod lifecycle;
pub mod period;
mod salida;
mod summary;

pub use ajuste::AjusteRepository;
pub use client::ClientRepository;
pub use entrada::EntradaRepository;
pub use lifecycle::{PeriodLifecycle, RolloverOutcome, SyncOutcome};
pub use salida::{IssuanceResult, SalidaRepository};
pub use summary::SummaryRepository;
