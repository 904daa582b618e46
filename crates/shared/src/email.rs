//! Email delivery for low-balance alerts.
//!
//! Uses `lettre` for SMTP transport.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::alert::{AlertError, AlertSink, LowBalanceAlert};
use crate::config::AlertConfig;

/// Email service that mails every alert to the configured recipients.
#[derive(Clone)]
pub struct EmailService {
    config: AlertConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, AlertError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| AlertError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build()
            .pipe(Ok)
    }

    /// Builds the alert message for every recipient.
    fn build_message(&self, alert: &LowBalanceAlert) -> Result<Message, AlertError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let mut builder = Message::builder().from(
            from.parse()
                .map_err(|e| AlertError::InvalidAddress(format!("{e}")))?,
        );
        for recipient in &self.config.recipients {
            builder = builder.to(recipient
                .parse()
                .map_err(|e| AlertError::InvalidAddress(format!("{e}")))?);
        }

        builder
            .subject(alert.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body())
            .map_err(|e| AlertError::BuildError(e.to_string()))
    }
}

#[async_trait]
impl AlertSink for EmailService {
    async fn notify_low_balance(&self, alert: &LowBalanceAlert) -> Result<(), AlertError> {
        if self.config.recipients.is_empty() {
            tracing::warn!(client = %alert.client_name, "No alert recipients configured");
            return Ok(());
        }

        let email = self.build_message(alert)?;
        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| AlertError::SendError(e.to_string()))?;

        tracing::info!(client = %alert.client_name, "Low-balance alert mailed");
        Ok(())
    }
}

/// Pipe trait for fluent API.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
