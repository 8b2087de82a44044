//! Batched record migration.
//!
//! The pieces, leaf to root:
//! - [`SourceReader`] / [`BatchWriter`] / [`TargetStore`]: store adapters.
//! - [`MigrationUnit`]: one table's fetch and write, paired.
//! - [`BatchOrchestrator`]: per-table batching with resilient accounting.
//! - [`BackupGuard`]: snapshot of the origin store before any write.
//! - [`MigrationReport`]: fold of every table's [`MigrationStats`].

pub mod backup;
pub mod orchestrator;
pub mod report;
pub mod stats;
pub mod unit;

pub use backup::{backup_file_name, BackupGuard, BackupOutcome};
pub use orchestrator::{BatchOrchestrator, MigrationObserver, DEFAULT_BATCH_SIZE};
pub use report::{MigrationReport, TableStatus, Totals};
pub use stats::MigrationStats;
pub use unit::{
    BatchWriter, MigrationPlan, MigrationUnit, SourceReader, StaticSource, TableMigration,
    TableRecord, TableUnit, TargetStore,
};
