//! Core types and shared functionality for keydash.
//!
//! This crate provides:
//! - Persistent favicon cache with SQLite backend
//! - Retention policy for success/failure entries
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, ExpiryPolicy, IconRecord, StoredIcon};
pub use config::AppConfig;
pub use error::Error;
