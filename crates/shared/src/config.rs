//! Application configuration management.

use chrono::NaiveDate;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Civil calendar used to decide "today".
    #[serde(default)]
    pub clock: ClockConfig,
    /// Low-balance alert delivery.
    #[serde(default)]
    pub alerts: AlertConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Clock configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// IANA timezone whose calendar defines the current day.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Pins "today" to a fixed date (YYYY-MM-DD) for testing.
    #[serde(default)]
    pub testing_date: Option<NaiveDate>,
}

fn default_timezone() -> String {
    "America/Bogota".to_string()
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            testing_date: None,
        }
    }
}

/// SMTP settings for low-balance alerts.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Send alerts by email. When false they are only logged.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Addresses that receive every alert.
    #[serde(default)]
    pub recipients: Vec<String>,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "alerts@folio.local".to_string()
}

fn default_from_name() -> String {
    "Folio Alerts".to_string()
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            recipients: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("alerts.recipients")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
