//! Backup guard: point-in-time copy of the origin store.
//!
//! The main file is copied along with any `-wal` or `-journal` sidecar next to
//! it, each renamed to sit beside the backup so SQLite pairs them on open.
//! The `-shm` index is not copied; SQLite rebuilds it from the WAL.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{MigrateError, Result};

/// Sidecar files that can hold committed pages not yet in the main file.
const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-journal"];

/// Timestamp format used in backup file names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// What the guard did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The origin was copied to `path`.
    Created { path: PathBuf, bytes: u64 },
    /// The origin does not exist; nothing to protect.
    Skipped { origin: PathBuf },
}

/// Build `<stem>-backup-<timestamp>.<ext>` for a store named by `origin`.
pub fn backup_file_name(origin: &Path, timestamp: DateTime<Utc>) -> String {
    let stem = origin
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "database".to_string());
    let stamp = timestamp.format(BACKUP_TIMESTAMP_FORMAT);
    match origin.extension() {
        Some(ext) => format!("{}-backup-{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}-backup-{}", stem, stamp),
    }
}

/// Copies the origin store into a backup directory before anything is written.
#[derive(Debug, Clone)]
pub struct BackupGuard {
    backup_dir: PathBuf,
}

impl BackupGuard {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Snapshot `origin` using the current time.
    pub async fn snapshot(&self, origin: &Path) -> Result<BackupOutcome> {
        self.snapshot_at(origin, Utc::now()).await
    }

    /// Snapshot `origin`, naming the artifact after `timestamp`.
    ///
    /// A missing origin is not an error. Any filesystem failure is.
    pub async fn snapshot_at(
        &self,
        origin: &Path,
        timestamp: DateTime<Utc>,
    ) -> Result<BackupOutcome> {
        let exists = tokio::fs::try_exists(origin)
            .await
            .map_err(|source| MigrateError::Backup {
                path: origin.to_path_buf(),
                source,
            })?;
        if !exists {
            info!(origin = %origin.display(), "Origin store not found, skipping backup");
            return Ok(BackupOutcome::Skipped {
                origin: origin.to_path_buf(),
            });
        }

        tokio::fs::create_dir_all(&self.backup_dir)
            .await
            .map_err(|source| MigrateError::Backup {
                path: self.backup_dir.clone(),
                source,
            })?;

        let path = self.unused_path(origin, timestamp).await;
        let bytes = tokio::fs::copy(origin, &path)
            .await
            .map_err(|source| MigrateError::Backup {
                path: path.clone(),
                source,
            })?;

        let sidecars = copy_sidecars(origin, &path).await?;

        info!(
            origin = %origin.display(),
            backup = %path.display(),
            bytes,
            sidecars,
            "Origin store backed up"
        );
        Ok(BackupOutcome::Created { path, bytes })
    }

    /// Two runs within the same second get `-1`, `-2`, ... suffixes.
    async fn unused_path(&self, origin: &Path, timestamp: DateTime<Utc>) -> PathBuf {
        let name = backup_file_name(origin, timestamp);
        let mut candidate = self.backup_dir.join(&name);
        let mut n = 1;
        while tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            let (base, ext) = match name.rsplit_once('.') {
                Some((base, ext)) => (base.to_string(), format!(".{}", ext)),
                None => (name.clone(), String::new()),
            };
            candidate = self.backup_dir.join(format!("{}-{}{}", base, n, ext));
            n += 1;
        }
        candidate
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Copy whichever sidecars exist; returns how many were copied.
async fn copy_sidecars(origin: &Path, backup: &Path) -> Result<usize> {
    let mut copied = 0;
    for suffix in SIDECAR_SUFFIXES {
        let sidecar = with_suffix(origin, suffix);
        let exists = tokio::fs::try_exists(&sidecar)
            .await
            .map_err(|source| MigrateError::Backup {
                path: sidecar.clone(),
                source,
            })?;
        if !exists {
            continue;
        }
        let dest = with_suffix(backup, suffix);
        tokio::fs::copy(&sidecar, &dest)
            .await
            .map_err(|source| MigrateError::Backup { path: dest, source })?;
        copied += 1;
    }
    Ok(copied)
}
