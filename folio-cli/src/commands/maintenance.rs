//! Toggle or inspect maintenance mode from the shell
//!
//! Running servers pick the change up once their cached flag expires.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use folio_server::db::PgDocumentStore;
use folio_server::maintenance::MaintenanceGate;
use folio_server::AppConfig;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceAction {
    /// Serve the placeholder page to visitors
    On,
    /// Serve the site normally
    Off,
    /// Print the current flag
    Status,
}

#[derive(Parser, Debug)]
pub struct MaintenanceArgs {
    #[arg(value_enum)]
    pub action: MaintenanceAction,

    /// Database URL (overrides environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_maintenance(args: MaintenanceArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = super::connect(args.database_url, &config).await?;
    let gate = MaintenanceGate::new(Arc::new(PgDocumentStore::new(pool)), Duration::ZERO);

    let enabled = match args.action {
        MaintenanceAction::Status => gate.is_enabled().await,
        MaintenanceAction::On | MaintenanceAction::Off => {
            let enabled = args.action == MaintenanceAction::On;
            gate.set(enabled)
                .await
                .context("Failed to update maintenance flag")?
                .maintenance_mode
        }
    };

    println!("maintenance mode: {}", if enabled { "on" } else { "off" });
    if args.action != MaintenanceAction::Status {
        println!(
            "running servers follow within {}s",
            config.maintenance_ttl.as_secs()
        );
    }
    Ok(())
}
