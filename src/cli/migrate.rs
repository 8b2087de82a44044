//! The default command: back up, migrate, report.

use console::style;

use otc_migrate::config::Settings;
use otc_migrate::migration::{BackupOutcome, MigrationReport};
use otc_migrate::repository::redact_url_password;
use otc_migrate::runner::{backup_origin, migrate, write_report_json};

use super::progress::ConsoleObserver;

pub async fn cmd_migrate(settings: &Settings, show_progress: bool) -> anyhow::Result<()> {
    settings.validate()?;

    println!("{} Migrating OTC advisor data:", style("→").cyan());
    println!("  From: {}", settings.source_url);
    println!("  To:   {}", redact_url_password(settings.target_url()?));
    println!("  Batch size: {}", settings.batch_size);
    if let Some(tables) = &settings.tables {
        let mut names: Vec<_> = tables.iter().map(String::as_str).collect();
        names.sort_unstable();
        println!("  Tables: {}", names.join(", "));
    }

    let backup = backup_origin(settings).await?;
    print_backup(&backup);

    let observer = ConsoleObserver::new(show_progress);
    let report = migrate(settings, Some(&observer)).await?;
    finish(settings, &report).await
}

pub(super) fn print_backup(outcome: &BackupOutcome) {
    match outcome {
        BackupOutcome::Created { path, bytes } => println!(
            "{} Origin backed up to {} ({} bytes)",
            style("✓").green(),
            path.display(),
            bytes
        ),
        BackupOutcome::Skipped { origin } => println!(
            "{} No origin store at {}, backup skipped",
            style("!").yellow(),
            origin.display()
        ),
    }
}

/// Print the report, save it if asked, and apply strict mode.
pub(super) async fn finish(settings: &Settings, report: &MigrationReport) -> anyhow::Result<()> {
    println!();
    print!("{}", report.render());

    if let Some(path) = &settings.report_json {
        write_report_json(report, path).await?;
        println!("{} Report written to {}", style("✓").green(), path.display());
    }

    report.check(settings.strict)?;
    if report.success {
        println!("\n{} Done", style("✓").green());
    } else {
        println!(
            "\n{} Finished with failures; re-run after fixing the errors above",
            style("!").yellow()
        );
    }
    Ok(())
}
