//! Typed repositories over the document store

pub mod content;

pub use content::{ContentRepo, SINGLETON_ID};
