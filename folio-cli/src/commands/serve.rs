//! HTTP server command
//!
//! Builds application state from the environment and runs the API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use folio_server::{run_server, AppConfig, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Static site directory served for non-API paths
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Keep content in memory instead of Postgres (lost on exit)
    #[arg(long, conflicts_with = "database_url")]
    pub memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut app_config = AppConfig::from_env();
    if let Some(dir) = args.static_dir {
        app_config.static_dir = Some(dir);
    }

    let store: Arc<dyn DocumentStore> = if args.memory {
        tracing::warn!("Using in-memory document store - content is lost on exit");
        Arc::new(MemoryDocumentStore::new())
    } else {
        let pool = super::connect(args.database_url, &app_config).await?;
        Arc::new(PgDocumentStore::new(pool))
    };

    let state = AppState::from_config(&app_config, store)
        .context("Failed to initialise server state")?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        cors_origins: app_config.cors_origins.clone(),
        static_dir: app_config.static_dir.clone(),
    };

    tracing::info!("Starting folio server on {}", args.bind);

    // Blocks until shutdown
    run_server(Arc::new(state), config)
        .await
        .context("Server error")?;

    Ok(())
}
