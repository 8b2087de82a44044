//! Batch orchestrator.
//!
//! Drives one table at a time: fetch everything, screen the rows, cut them
//! into contiguous batches and write each batch inside its own transaction.
//! Batches and tables run strictly one after another; a failure is recorded
//! in the table's [`MigrationStats`] and never aborts the run.

use tracing::{debug, info, warn};

use super::report::MigrationReport;
use super::stats::MigrationStats;
use super::unit::{MigrationUnit, TableMigration, TableRecord, TargetStore};
use crate::error::Result;

/// Default number of records written per transaction.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Receives progress notifications while tables are migrated.
pub trait MigrationObserver: Send + Sync {
    fn table_started(&self, _table: &str, _total: usize) {}
    fn batch_finished(&self, _table: &str, _processed: usize) {}
    fn table_finished(&self, _stats: &MigrationStats) {}
}

/// Migrates tables into a single target store.
pub struct BatchOrchestrator<'a, T> {
    target: &'a T,
    batch_size: usize,
    observer: Option<&'a dyn MigrationObserver>,
}

impl<'a, T: TargetStore> BatchOrchestrator<'a, T> {
    pub fn new(target: &'a T) -> Self {
        Self {
            target,
            batch_size: DEFAULT_BATCH_SIZE,
            observer: None,
        }
    }

    /// Set the maximum batch size (clamped to at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn MigrationObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run every table of `plan` in order and fold the results into a report.
    pub async fn run(&self, plan: &[Box<dyn TableMigration<T> + '_>]) -> MigrationReport {
        let mut tables = Vec::with_capacity(plan.len());
        for unit in plan {
            debug!(table = unit.name(), "Starting table");
            tables.push(unit.migrate(self).await);
        }
        MigrationReport::from_stats(tables)
    }

    /// Migrate one table's full record set.
    pub async fn migrate_table<U>(&self, unit: &U) -> MigrationStats
    where
        U: MigrationUnit<T> + ?Sized,
    {
        let table = unit.table_name().to_string();
        let mut stats = MigrationStats::new(&table);

        let records = match unit.fetch().await {
            Ok(records) => records,
            Err(e) => {
                warn!(table = %table, error = %e, "Failed to fetch source records");
                stats.record_fetch_error(&e);
                self.notify_finished(&stats);
                return stats;
            }
        };

        stats.total_records = records.len();
        if let Some(observer) = self.observer {
            observer.table_started(&table, stats.total_records);
        }

        if records.is_empty() {
            debug!(table = %table, "No records to migrate");
            self.notify_finished(&stats);
            return stats;
        }

        let mut valid = Vec::with_capacity(records.len());
        for record in records {
            match record.validate() {
                Ok(()) => valid.push(record),
                Err(reason) => {
                    warn!(table = %table, key = record.key(), reason = %reason, "Rejected record");
                    stats.record_rejected(record.key(), &reason);
                }
            }
        }

        for (index, batch) in valid.chunks(self.batch_size).enumerate() {
            let batch_number = index + 1;
            match self.write_batch(unit, batch).await {
                Ok(()) => {
                    debug!(table = %table, batch = batch_number, size = batch.len(), "Batch committed");
                    stats.record_batch_success(batch.len());
                }
                Err(e) => {
                    warn!(table = %table, batch = batch_number, error = %e, "Batch failed");
                    stats.record_batch_failure(batch_number, batch.len(), &e);
                }
            }
            if let Some(observer) = self.observer {
                observer.batch_finished(&table, stats.processed());
            }
        }

        info!(
            table = %table,
            total = stats.total_records,
            migrated = stats.migrated_records,
            failed = stats.failed_records,
            "Table migrated"
        );
        self.notify_finished(&stats);
        stats
    }

    /// Write one batch atomically: commit on success, roll back on failure.
    async fn write_batch<U>(&self, unit: &U, batch: &[U::Record]) -> Result<()>
    where
        U: MigrationUnit<T> + ?Sized,
    {
        let mut tx = self.target.begin().await?;
        match unit.write(batch, &mut tx).await {
            Ok(()) => self.target.commit(tx).await,
            Err(e) => {
                if let Err(rollback_err) = self.target.rollback(tx).await {
                    warn!(
                        table = <U::Record as TableRecord>::TABLE,
                        error = %rollback_err,
                        "Rollback failed"
                    );
                }
                Err(e)
            }
        }
    }

    fn notify_finished(&self, stats: &MigrationStats) {
        if let Some(observer) = self.observer {
            observer.table_finished(stats);
        }
    }
}
