//! folio-server: content API for a personal portfolio site
//!
//! Public read endpoints and admin CRUD for site sections, blog posts and
//! showcase items, plus contact and newsletter intake, media signing and a
//! maintenance-mode gate. Content lives as JSON documents in Postgres.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod mail;
pub mod maintenance;
pub mod media;
pub mod models;
pub mod rate_limit;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use http::{build_router, run_server, ServerConfig};
pub use state::AppState;
