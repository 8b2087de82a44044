//! Resolved settings for a migration run.
//!
//! Values arrive from CLI flags, environment variables and `.env`; clap does
//! the merging, this module applies defaults and checks the result.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, Result};
use crate::migration::DEFAULT_BATCH_SIZE;
use crate::repository::tables::parse_table_filter;
use crate::repository::util::{is_postgres_url, sqlite_path_from_url, validate_database_url};

/// Default origin store, as configured by the Prisma project.
pub const DEFAULT_SOURCE_URL: &str = "file:./prisma/dev.db";

/// Default directory for origin snapshots and target dumps.
pub const DEFAULT_BACKUP_DIR: &str = "./backups";

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite origin store URL.
    pub source_url: String,
    /// Target store URL. PostgreSQL, or a SQLite path for rehearsals.
    pub target_url: Option<String>,
    /// Where origin snapshots are written.
    pub backup_dir: PathBuf,
    /// Records per transaction.
    pub batch_size: usize,
    /// Exit non-zero when any record or table fails.
    pub strict: bool,
    /// Create missing target tables before writing.
    pub init_schema: bool,
    /// Restrict the run to these tables.
    pub tables: Option<HashSet<String>>,
    /// Write the final report here as JSON.
    pub report_json: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            target_url: None,
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            batch_size: DEFAULT_BATCH_SIZE,
            strict: false,
            init_schema: false,
            tables: None,
            report_json: None,
        }
    }
}

impl Settings {
    /// Apply a raw `--tables` value.
    pub fn with_tables(mut self, value: Option<&str>) -> Result<Self> {
        self.tables = value.map(parse_table_filter).transpose()?;
        Ok(self)
    }

    /// Check every value; called before anything touches a store.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(MigrateError::Config(
                "batch size must be at least 1".to_string(),
            ));
        }

        validate_database_url(&self.source_url)?;
        if is_postgres_url(&self.source_url) {
            return Err(MigrateError::Config(
                "the origin store must be SQLite; set SQLITE_DATABASE_URL to the Prisma dev database"
                    .to_string(),
            ));
        }

        validate_database_url(self.target_url()?)?;
        if !self.target_is_postgres() && self.target_path() == Some(self.source_path()) {
            return Err(MigrateError::Config(
                "origin and target are the same SQLite file".to_string(),
            ));
        }
        Ok(())
    }

    /// The target URL, which has no default.
    pub fn target_url(&self) -> Result<&str> {
        self.target_url.as_deref().ok_or_else(|| {
            MigrateError::Config("DATABASE_URL is not set; pass --target or export it".to_string())
        })
    }

    pub fn target_is_postgres(&self) -> bool {
        self.target_url.as_deref().is_some_and(is_postgres_url)
    }

    /// Filesystem path of the origin store.
    pub fn source_path(&self) -> PathBuf {
        sqlite_path_from_url(&self.source_url)
    }

    fn target_path(&self) -> Option<PathBuf> {
        self.target_url.as_deref().map(sqlite_path_from_url)
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}
