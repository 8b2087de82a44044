//! Seams between the orchestrator and the stores it moves data between.
//!
//! A [`MigrationUnit`] pairs one table's read side with its write side. The
//! orchestrator never touches connections directly: it asks the
//! [`TargetStore`] for a transaction handle, hands that handle to the unit's
//! `write`, and commits or rolls back depending on the outcome.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::orchestrator::BatchOrchestrator;
use super::stats::MigrationStats;
use crate::error::Result;

/// A row of a migrated table with a declared schema.
pub trait TableRecord: Send + Sync + 'static {
    /// Table name in both stores.
    const TABLE: &'static str;

    /// Primary key, used in rejection messages.
    fn key(&self) -> &str;

    /// Check the row before it is allowed into a batch.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Read side: enumerates every record of one table, in a stable order.
#[async_trait]
pub trait SourceReader<R: TableRecord>: Send + Sync {
    async fn read_all(&self) -> Result<Vec<R>>;
}

/// Write side: inserts a batch of records through an open transaction.
///
/// Implemented by the transaction handle of a [`TargetStore`]. Writes must be
/// upserts so that re-running a migration is idempotent.
#[async_trait]
pub trait BatchWriter<R: TableRecord>: Send {
    async fn write_batch(&mut self, batch: &[R]) -> Result<()>;
}

/// A destination store with a transaction boundary per batch.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Handle for one open transaction.
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx>;
    async fn commit(&self, tx: Self::Tx) -> Result<()>;
    async fn rollback(&self, tx: Self::Tx) -> Result<()>;
}

/// The pairing of a table's fetch and write operations.
#[async_trait]
pub trait MigrationUnit<T: TargetStore>: Send + Sync {
    type Record: TableRecord;

    fn table_name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<Self::Record>>;

    async fn write(&self, batch: &[Self::Record], tx: &mut T::Tx) -> Result<()>;
}

/// Object-safe view of a [`MigrationUnit`], so tables with different record
/// types can share one ordered plan.
#[async_trait]
pub trait TableMigration<T: TargetStore>: Send + Sync {
    fn name(&self) -> &str;

    async fn migrate(&self, orchestrator: &BatchOrchestrator<'_, T>) -> MigrationStats;
}

#[async_trait]
impl<T, U> TableMigration<T> for U
where
    T: TargetStore,
    U: MigrationUnit<T>,
{
    fn name(&self) -> &str {
        MigrationUnit::<T>::table_name(self)
    }

    async fn migrate(&self, orchestrator: &BatchOrchestrator<'_, T>) -> MigrationStats {
        orchestrator.migrate_table(self).await
    }
}

/// Tables in dependency order, as run by [`BatchOrchestrator::run`].
pub type MigrationPlan<'a, T> = Vec<Box<dyn TableMigration<T> + 'a>>;

/// Standard unit: reads `R` from a [`SourceReader`] and writes it through the
/// target's transaction handle.
pub struct TableUnit<'a, S, R> {
    source: &'a S,
    _record: PhantomData<fn() -> R>,
}

impl<'a, S, R> TableUnit<'a, S, R> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<'a, S, R, T> MigrationUnit<T> for TableUnit<'a, S, R>
where
    S: SourceReader<R>,
    R: TableRecord,
    T: TargetStore,
    T::Tx: BatchWriter<R>,
{
    type Record = R;

    fn table_name(&self) -> &str {
        R::TABLE
    }

    async fn fetch(&self) -> Result<Vec<R>> {
        self.source.read_all().await
    }

    async fn write(&self, batch: &[R], tx: &mut T::Tx) -> Result<()> {
        tx.write_batch(batch).await
    }
}

/// A source backed by records already in memory (seed data, fixtures).
pub struct StaticSource<R> {
    records: Vec<R>,
}

impl<R> StaticSource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl<R> SourceReader<R> for StaticSource<R>
where
    R: TableRecord + Clone,
{
    async fn read_all(&self) -> Result<Vec<R>> {
        Ok(self.records.clone())
    }
}
