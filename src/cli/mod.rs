//! CLI parser and command dispatch.

mod backup;
mod migrate;
mod progress;
mod seed;
mod tables;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use otc_migrate::config::{Settings, DEFAULT_BACKUP_DIR, DEFAULT_SOURCE_URL};
use otc_migrate::migration::DEFAULT_BATCH_SIZE;

#[derive(Parser)]
#[command(name = "otc-migrate")]
#[command(about = "Move OTC advisor data from the SQLite dev store into PostgreSQL")]
#[command(version)]
pub struct Cli {
    /// Origin SQLite store (Prisma `file:` URL or path)
    #[arg(long, short = 's', global = true, env = "SQLITE_DATABASE_URL", default_value = DEFAULT_SOURCE_URL)]
    source: String,

    /// Target store: postgres:// URL, or a SQLite path for a local rehearsal
    #[arg(long, short = 't', global = true, env = "DATABASE_URL")]
    target: Option<String>,

    /// Directory for origin backups and target dumps
    #[arg(long, global = true, env = "BACKUP_DIR", default_value = DEFAULT_BACKUP_DIR)]
    backup_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    run: RunArgs,

    /// Defaults to running the migration
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command that writes to the target.
#[derive(Args)]
struct RunArgs {
    /// Records written per transaction
    #[arg(short, long, global = true, env = "MIGRATION_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Exit non-zero if any record or table fails
    #[arg(long, global = true, env = "MIGRATION_STRICT")]
    strict: bool,

    /// Create missing tables on the target first
    #[arg(long, global = true)]
    init_schema: bool,

    /// Only these tables (comma-separated), still in dependency order
    #[arg(long, global = true)]
    tables: Option<String>,

    /// Show a progress bar per table
    #[arg(short = 'P', long, global = true)]
    progress: bool,

    /// Also write the final report as JSON to this path
    #[arg(long, global = true)]
    report_json: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every table from the origin into the target (default)
    Migrate,

    /// Snapshot the origin store without migrating
    Backup {
        /// Also dump the PostgreSQL target with pg_dump
        #[arg(long)]
        dump_target: bool,
    },

    /// Load educational content and FAQ records into the target
    Seed,

    /// List migrated tables in dependency order
    Tables,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let settings = Settings {
            source_url: self.source.clone(),
            target_url: self.target.clone(),
            backup_dir: self.backup_dir.clone(),
            batch_size: self.run.batch_size,
            strict: self.run.strict,
            init_schema: self.run.init_schema,
            tables: None,
            report_json: self.run.report_json.clone(),
        }
        .with_tables(self.run.tables.as_deref())?;
        Ok(settings)
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        None | Some(Commands::Migrate) => {
            migrate::cmd_migrate(&cli.settings()?, cli.run.progress).await
        }
        Some(Commands::Backup { dump_target }) => {
            backup::cmd_backup(&cli.settings()?, *dump_target).await
        }
        Some(Commands::Seed) => seed::cmd_seed(&cli.settings()?, cli.run.progress).await,
        Some(Commands::Tables) => {
            tables::cmd_tables();
            Ok(())
        }
    }
}
