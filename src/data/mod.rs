//! Data layer module
//!
//! Handles all data persistence and caching:
//! - SQLite database operations
//! - Rendered page cache (volatile)

mod cache;
mod database;
mod models;

pub use cache::{CachedPage, PageCache};
pub use database::Database;
pub use models::*;
