//! End-to-end runs: backup, connect, migrate or seed, report.

use std::path::Path;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::migration::{
    BackupGuard, BackupOutcome, BatchOrchestrator, MigrationObserver, MigrationPlan,
    MigrationReport, TargetStore,
};
use crate::repository::{
    migration_plan, redact_url_password, validate_database_url, PgTarget, SqliteSource, SqliteTarget,
};
use crate::seed::SeedData;

/// Outcome of a full migration run.
#[derive(Debug)]
pub struct MigrationRun {
    pub backup: BackupOutcome,
    pub report: MigrationReport,
}

/// Back up the origin, then copy every selected table into the target.
///
/// Only setup problems (bad settings, backup failure, unreachable stores) are
/// returned as errors. Per-table and per-batch failures end up in the report.
pub async fn run_migration(
    settings: &Settings,
    observer: Option<&dyn MigrationObserver>,
) -> Result<MigrationRun> {
    settings.validate()?;
    let backup = backup_origin(settings).await?;
    let report = migrate(settings, observer).await?;
    Ok(MigrationRun { backup, report })
}

/// Snapshot the origin store into the backup directory.
pub async fn backup_origin(settings: &Settings) -> Result<BackupOutcome> {
    BackupGuard::new(settings.backup_dir())
        .snapshot(&settings.source_path())
        .await
}

/// Copy every selected table into the target.
///
/// Does not take a backup; callers run [`backup_origin`] first.
pub async fn migrate(
    settings: &Settings,
    observer: Option<&dyn MigrationObserver>,
) -> Result<MigrationReport> {
    settings.validate()?;
    let target_url = settings.target_url()?;

    let source = SqliteSource::open(&settings.source_url).await?;
    info!(
        source = %source.path().display(),
        target = %redact_url_password(target_url),
        "Starting migration"
    );

    let report = if settings.target_is_postgres() {
        let target = PgTarget::connect(target_url).await?;
        if settings.init_schema {
            target.init_schema().await?;
        }
        let plan = migration_plan(&source, settings.tables.as_ref());
        execute(&target, &plan, settings, observer).await
    } else {
        let target = SqliteTarget::connect(target_url).await?;
        if settings.init_schema {
            target.init_schema().await?;
        }
        let plan = migration_plan(&source, settings.tables.as_ref());
        execute(&target, &plan, settings, observer).await
    };

    if report.success {
        info!(migrated = report.totals.migrated_records, "Migration complete");
    } else {
        warn!(
            failed = report.totals.failed_records,
            unread_tables = report.totals.fetch_failures,
            "Migration finished with failures"
        );
    }
    Ok(report)
}

/// Write the educational content and FAQ seed records into the target.
pub async fn run_seed(
    settings: &Settings,
    observer: Option<&dyn MigrationObserver>,
) -> Result<MigrationReport> {
    let target_url = settings.target_url()?;
    validate_database_url(target_url)?;
    let seed = SeedData::new();

    let report = if settings.target_is_postgres() {
        let target = PgTarget::connect(target_url).await?;
        if settings.init_schema {
            target.init_schema().await?;
        }
        execute(&target, &seed.plan(), settings, observer).await
    } else {
        let target = SqliteTarget::connect(target_url).await?;
        if settings.init_schema {
            target.init_schema().await?;
        }
        execute(&target, &seed.plan(), settings, observer).await
    };
    Ok(report)
}

async fn execute<T>(
    target: &T,
    plan: &MigrationPlan<'_, T>,
    settings: &Settings,
    observer: Option<&dyn MigrationObserver>,
) -> MigrationReport
where
    T: TargetStore,
{
    let mut orchestrator = BatchOrchestrator::new(target).with_batch_size(settings.batch_size);
    if let Some(observer) = observer {
        orchestrator = orchestrator.with_observer(observer);
    }
    orchestrator.run(plan).await
}

/// Save the report as pretty-printed JSON.
pub async fn write_report_json(report: &MigrationReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::from)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    Ok(())
}
