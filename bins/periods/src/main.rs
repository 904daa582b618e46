//! Folio period maintenance.
//!
//! Meant to run from a scheduler: `sync` on the first day of every month,
//! `rollover <year>` once the year has ended. Both are idempotent, so a
//! missed or repeated run is harmless.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use folio_core::{Actor, RoleGate, clock_from_config};
use folio_db::{LedgerContext, PeriodLifecycle, connect};
use folio_shared::{AlertSink, AppConfig, EmailService, LogAlertSink};

/// Folio period maintenance jobs
#[derive(Parser)]
#[command(name = "folio-periods", version, about, long_about = None)]
struct Cli {
    /// Print the outcome as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Close stale months and open the current one for every client
    Sync,

    /// Close a year and open the next one for every client
    Rollover {
        /// Year to close
        year: i32,
    },

    /// Close one month of one client
    CloseMonth {
        /// Client ID
        #[arg(long)]
        client: Uuid,
        /// Year of the month
        year: i32,
        /// Month number (1-12)
        month: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    let clock = clock_from_config(&config.clock)?;
    let alerts: Arc<dyn AlertSink> = if config.alerts.enabled && !config.alerts.recipients.is_empty() {
        Arc::new(EmailService::new(config.alerts.clone()))
    } else {
        Arc::new(LogAlertSink)
    };
    let ctx = LedgerContext::new(db, clock, Arc::new(RoleGate), alerts);
    let lifecycle = PeriodLifecycle::new(ctx);
    let actor = Actor::system();

    let outcome = match cli.command {
        Commands::Sync => serde_json::to_value(lifecycle.sync_current_month(&actor).await?)?,
        Commands::Rollover { year } => {
            serde_json::to_value(lifecycle.rollover_year(&actor, year).await?)?
        }
        Commands::CloseMonth {
            client,
            year,
            month,
        } => serde_json::to_value(lifecycle.close_month(&actor, client, year, month).await?)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        info!(%outcome, "Period maintenance finished");
    }
    Ok(())
}
