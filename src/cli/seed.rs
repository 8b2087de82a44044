//! Load the bundled reference content.

use console::style;

use otc_migrate::config::Settings;
use otc_migrate::repository::redact_url_password;
use otc_migrate::runner::run_seed;

use super::migrate::finish;
use super::progress::ConsoleObserver;

pub async fn cmd_seed(settings: &Settings, show_progress: bool) -> anyhow::Result<()> {
    println!(
        "{} Seeding educational content and FAQs into {}",
        style("→").cyan(),
        redact_url_password(settings.target_url()?)
    );

    let observer = ConsoleObserver::new(show_progress);
    let report = run_seed(settings, Some(&observer)).await?;
    finish(settings, &report).await
}
