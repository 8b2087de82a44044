//! SQLite origin store.

use std::path::Path;

use diesel_async::RunQueryDsl;
use tracing::debug;

use super::pool::{SqliteConn, SqlitePool};
use crate::error::{MigrateError, Result};

/// Read-only view of the Prisma SQLite database.
///
/// A missing origin file yields empty tables rather than errors, so a run
/// against a fresh checkout completes with zero records.
pub struct SqliteSource {
    pool: SqlitePool,
    present: bool,
}

impl SqliteSource {
    /// Open the origin store and check that it is readable.
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::read_only(database_url);
        let present = tokio::fs::try_exists(pool.path()).await?;
        let source = Self { pool, present };
        if present {
            let mut conn = source.pool.get().await?;
            diesel::sql_query("SELECT 1")
                .execute(&mut conn)
                .await
                .map_err(|e| {
                    MigrateError::Connection(format!(
                        "origin store {} is not a readable SQLite database: {}",
                        source.pool.path().display(),
                        e
                    ))
                })?;
        }
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        self.pool.path()
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Connection for one table read, or `None` when the origin is absent.
    pub(crate) async fn connect(&self) -> Result<Option<SqliteConn>> {
        if !self.present {
            debug!(path = %self.pool.path().display(), "Origin store absent, reading nothing");
            return Ok(None);
        }
        self.pool.get().await.map(Some)
    }
}
