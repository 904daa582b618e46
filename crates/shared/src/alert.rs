//! Low-balance alert delivery.
//!
//! Alerts are best-effort: callers deliver them after the movement has been
//! committed and only log a failed delivery.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Alert delivery errors.
#[derive(Debug, Error)]
pub enum AlertError {
    /// Failed to build the alert message.
    #[error("Failed to build alert: {0}")]
    BuildError(String),
    /// Failed to deliver the alert.
    #[error("Failed to deliver alert: {0}")]
    SendError(String),
    /// Invalid recipient or sender address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A client's folio balance crossed into warning territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowBalanceAlert {
    /// Client display name.
    pub client_name: String,
    /// Client tax ID.
    pub client_tax_id: String,
    /// Human-readable status message from the issuance decision.
    pub message: String,
    /// Balance after the movement.
    pub balance: i32,
}

impl LowBalanceAlert {
    /// Subject line used by mail-based sinks.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("FOLIO ALERT: client {}", self.client_name)
    }

    /// Plain-text body used by mail-based sinks.
    #[must_use]
    pub fn body(&self) -> String {
        format!(
            r"AUTOMATIC FOLIO ALERT

Client: {}
Tax ID: {}

Status:
{}

Current balance: {}
",
            self.client_name, self.client_tax_id, self.message, self.balance
        )
    }
}

/// Destination for low-balance alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Delivers one alert.
    async fn notify_low_balance(&self, alert: &LowBalanceAlert) -> Result<(), AlertError>;
}

/// Sink that only writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn notify_low_balance(&self, alert: &LowBalanceAlert) -> Result<(), AlertError> {
        tracing::warn!(
            client = %alert.client_name,
            tax_id = %alert.client_tax_id,
            balance = alert.balance,
            message = %alert.message,
            "Low folio balance"
        );
        Ok(())
    }
}
