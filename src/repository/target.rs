//! Target stores. Each batch runs inside an explicit `BEGIN`/`COMMIT`.

use async_trait::async_trait;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};
use tracing::debug;

use super::ddl;
use super::pool::{PgConn, PgPool, SqliteConn, SqlitePool};
use super::util::redact_url_password;
use crate::error::{MigrateError, Result};
use crate::migration::TargetStore;

/// PostgreSQL target, the production store.
pub struct PgTarget {
    pool: PgPool,
}

/// An open PostgreSQL transaction.
pub struct PgTx {
    pub(crate) conn: PgConn,
}

impl PgTarget {
    /// Build the pool and verify the server answers.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::new(database_url, 2)?;
        let mut conn = pool.get().await.map_err(|e| {
            MigrateError::Connection(format!(
                "cannot reach target {}: {}",
                redact_url_password(database_url),
                e
            ))
        })?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        debug!(target = %redact_url_password(database_url), "Connected to PostgreSQL target");
        Ok(Self { pool })
    }

    /// Create the migrated tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(ddl::POSTGRES_SCHEMA).await?;
        Ok(())
    }
}

#[async_trait]
impl TargetStore for PgTarget {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute("BEGIN").await?;
        Ok(PgTx { conn })
    }

    async fn commit(&self, mut tx: PgTx) -> Result<()> {
        tx.conn.batch_execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&self, mut tx: PgTx) -> Result<()> {
        tx.conn.batch_execute("ROLLBACK").await?;
        Ok(())
    }
}

/// SQLite target, for rehearsing a migration locally.
pub struct SqliteTarget {
    pool: SqlitePool,
}

/// An open SQLite transaction.
pub struct SqliteTx {
    pub(crate) conn: SqliteConn,
}

impl SqliteTarget {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::new(database_url);
        pool.get().await?;
        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<()> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(ddl::SQLITE_SCHEMA).await?;
        Ok(())
    }

    /// Fresh connection outside any batch transaction.
    pub async fn connection(&self) -> Result<SqliteConn> {
        self.pool.get().await
    }
}

#[async_trait]
impl TargetStore for SqliteTarget {
    type Tx = SqliteTx;

    async fn begin(&self) -> Result<SqliteTx> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute("BEGIN IMMEDIATE").await?;
        Ok(SqliteTx { conn })
    }

    async fn commit(&self, mut tx: SqliteTx) -> Result<()> {
        tx.conn.batch_execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&self, mut tx: SqliteTx) -> Result<()> {
        tx.conn.batch_execute("ROLLBACK").await?;
        Ok(())
    }
}
