//! Structured store for status rows.
//!
//! A store is one file holding a single `status_rows` table with one column
//! per row attribute. Stores are written once by the stage that creates them
//! and only read afterwards.

mod sqlite;

pub use sqlite::SqliteRowStore;

use std::path::PathBuf;

use thiserror::Error;

use crate::status::StatusRow;

/// Name of the table holding the rows.
pub const ROW_TABLE: &str = "status_rows";

/// Errors for structured store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file does not exist.
    #[error("Store not found: {path}")]
    NotFound { path: PathBuf },

    /// The store exists but has no row table.
    #[error("Table '{table}' not found in {path}")]
    MissingTable { path: PathBuf, table: String },

    /// A stale file could not be removed before recreating the store.
    #[error("Failed to replace existing store {path}")]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Trait for status row storage.
pub trait RowStore: Send + Sync {
    /// Append rows, preserving their order. Returns the number of rows written.
    fn append(&self, rows: &[StatusRow]) -> Result<usize, StoreError>;

    /// All rows, in insertion order.
    fn rows(&self) -> Result<Vec<StatusRow>, StoreError>;

    /// Number of rows in the store.
    fn count(&self) -> Result<usize, StoreError>;
}
