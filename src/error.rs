//! Error types for the migration toolkit.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Query or constraint failure reported by diesel.
    #[error("{0}")]
    Database(#[from] diesel::result::Error),

    /// Store unreachable or pool exhausted.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid URL, batch size, or other configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The origin store could not be snapshotted.
    #[error("Backup of {path} failed: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External dump tool missing or exited unsuccessfully.
    #[error("Database dump failed: {0}")]
    Dump(String),

    /// A strict run finished with failed records or unread tables.
    #[error("Migration incomplete: {failed} record(s) failed, {unread} table(s) could not be read")]
    Incomplete { failed: usize, unread: usize },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MigrateError {
    /// Create a Connection error from any displayable cause.
    pub fn connection(e: impl std::fmt::Display) -> Self {
        MigrateError::Connection(e.to_string())
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
