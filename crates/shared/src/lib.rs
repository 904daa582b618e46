//! Shared types, errors, and configuration for Folio.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - Low-balance alert delivery (log or SMTP)

pub mod alert;
pub mod config;
pub mod email;
pub mod error;
pub mod types;

pub use alert::{AlertError, AlertSink, LogAlertSink, LowBalanceAlert};
pub use config::{AlertConfig, AppConfig, ClockConfig, DatabaseConfig};
pub use email::EmailService;
pub use error::{AppError, AppResult};
