//! HTTP server layer
//!
//! Axum server with:
//! - JSON error responses
//! - Admin, optional-admin and client-IP extractors
//! - Maintenance gate middleware
//! - Graceful shutdown

pub mod server;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig};
