//! `pg_dump` wrapper for snapshotting the PostgreSQL target.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::util::{postgres_database_name, redact_url_password, split_url_password};
use crate::error::{MigrateError, Result};
use crate::migration::backup::BACKUP_TIMESTAMP_FORMAT;

/// `<database>-backup-<timestamp>.sql`
pub fn dump_file_name(database_url: &str, timestamp: DateTime<Utc>) -> String {
    let name = postgres_database_name(database_url).unwrap_or_else(|| "postgres".to_string());
    format!(
        "{}-backup-{}.sql",
        name,
        timestamp.format(BACKUP_TIMESTAMP_FORMAT)
    )
}

/// Locate `pg_dump` on the PATH.
pub fn find_pg_dump() -> Option<PathBuf> {
    which::which("pg_dump").ok()
}

/// Build the `pg_dump` invocation; the password goes in `PGPASSWORD`.
fn pg_dump_command(pg_dump: &Path, database_url: &str, path: &Path) -> Result<Command> {
    let (dbname, password) = split_url_password(database_url)?;
    let mut command = Command::new(pg_dump);
    command
        .arg("--no-owner")
        .arg("--no-privileges")
        .arg("--file")
        .arg(path)
        .arg("--dbname")
        .arg(dbname)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(password) = password {
        command.env("PGPASSWORD", password);
    }
    Ok(command)
}

/// Dump the target database as plain SQL into `backup_dir`.
pub async fn dump_postgres(database_url: &str, backup_dir: &Path) -> Result<PathBuf> {
    let pg_dump = find_pg_dump()
        .ok_or_else(|| MigrateError::Dump("pg_dump not found on PATH".to_string()))?;

    tokio::fs::create_dir_all(backup_dir)
        .await
        .map_err(|source| MigrateError::Backup {
            path: backup_dir.to_path_buf(),
            source,
        })?;

    let path = backup_dir.join(dump_file_name(database_url, Utc::now()));
    debug!(
        target = %redact_url_password(database_url),
        path = %path.display(),
        "Running pg_dump"
    );

    let output = pg_dump_command(&pg_dump, database_url, &path)?
        .output()
        .await
        .map_err(|e| MigrateError::Dump(format!("failed to execute pg_dump: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("pg_dump stderr: {}", stderr.trim());
        return Err(MigrateError::Dump(format!(
            "pg_dump exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    info!(path = %path.display(), "Target dump written");
    Ok(path)
}
