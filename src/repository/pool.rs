//! Connection management for the SQLite origin and both kinds of target.
//!
//! SQLite connections are lightweight and file-based, so they are opened on
//! demand through diesel-async's `SyncConnectionWrapper`. PostgreSQL goes
//! through a small deadpool pool.

use std::path::{Path, PathBuf};

use diesel::sqlite::SqliteConnection;
use diesel_async::pooled_connection::deadpool::Pool as DeadPool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, AsyncPgConnection, SimpleAsyncConnection};

use super::util::sqlite_path_from_url;
use crate::error::{MigrateError, Result};

/// Async SQLite connection type.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

/// Async PostgreSQL connection type.
pub type PgConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// SQLite connection factory.
#[derive(Clone, Debug)]
pub struct SqlitePool {
    path: PathBuf,
    read_only: bool,
}

impl SqlitePool {
    /// Read-write pool; the file is created on first connect.
    pub fn new(database_url: &str) -> Self {
        Self {
            path: sqlite_path_from_url(database_url),
            read_only: false,
        }
    }

    /// Read-only pool for the origin store.
    pub fn read_only(database_url: &str) -> Self {
        Self {
            path: sqlite_path_from_url(database_url),
            read_only: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection.
    pub async fn get(&self) -> Result<SqliteConn> {
        let url = if self.read_only {
            format!("file:{}?mode=ro", self.path.display())
        } else {
            self.path.display().to_string()
        };
        let mut conn = SqliteConn::establish(&url)
            .await
            .map_err(MigrateError::connection)?;
        if !self.read_only {
            conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")
                .await?;
        }
        Ok(conn)
    }
}

/// PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgPool {
    pool: DeadPool<AsyncPgConnection>,
}

impl PgPool {
    /// Build the pool. No connection is made until [`PgPool::get`].
    pub fn new(database_url: &str, max_size: usize) -> Result<Self> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = DeadPool::builder(config)
            .max_size(max_size)
            .build()
            .map_err(MigrateError::connection)?;
        Ok(Self { pool })
    }

    /// Get a connection.
    pub async fn get(&self) -> Result<PgConn> {
        self.pool.get().await.map_err(MigrateError::connection)
    }
}
