//! Database layer - document store, connection pool and typed repositories
//!
//! - One logical collection per content type, stored as JSON documents
//! - Connection pool (max 5 connections by default)
//! - Single-document operations only, no cross-document transactions

pub mod pool;
pub mod migrations;
pub mod store;
pub mod postgres;
pub mod memory;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use sqlx::PgPool;
pub use store::{DbError, Document, DocumentStore};
pub use postgres::PgDocumentStore;
pub use memory::MemoryDocumentStore;
pub use repos::{ContentRepo, SINGLETON_ID};
