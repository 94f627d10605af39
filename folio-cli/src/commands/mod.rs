//! Subcommand implementations

pub mod maintenance;
pub mod migrate;
pub mod serve;

pub use maintenance::{run_maintenance, MaintenanceArgs};
pub use migrate::{run_migrate, MigrateArgs};
pub use serve::{run_serve, ServeArgs};

use anyhow::{Context, Result};
use folio_server::db::{create_pool_with_options, migrations, PgPool};
use folio_server::AppConfig;

/// Resolve the database URL from flag or environment and open a migrated pool.
pub(crate) async fn connect(database_url: Option<String>, config: &AppConfig) -> Result<PgPool> {
    let database_url = database_url
        .or_else(|| config.database_url.clone())
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.folio/.env")?;

    let pool = create_pool_with_options(&database_url, config.database_max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}
