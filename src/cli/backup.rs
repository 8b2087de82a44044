//! Standalone backups of the origin and, optionally, the target.

use console::style;

use otc_migrate::config::Settings;
use otc_migrate::repository::dump::dump_postgres;
use otc_migrate::repository::{redact_url_password, validate_database_url};
use otc_migrate::runner::backup_origin;

use super::migrate::print_backup;

pub async fn cmd_backup(settings: &Settings, dump_target: bool) -> anyhow::Result<()> {
    validate_database_url(&settings.source_url)?;

    println!(
        "{} Backing up to {}",
        style("→").cyan(),
        settings.backup_dir().display()
    );
    print_backup(&backup_origin(settings).await?);

    if dump_target {
        let target_url = settings.target_url()?;
        if !settings.target_is_postgres() {
            anyhow::bail!(
                "--dump-target requires a PostgreSQL target, got {}",
                redact_url_password(target_url)
            );
        }
        let path = dump_postgres(target_url, settings.backup_dir()).await?;
        println!("{} Target dumped to {}", style("✓").green(), path.display());
    }
    Ok(())
}
