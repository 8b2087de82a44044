//! Console feedback while tables are migrated.

use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use otc_migrate::migration::{MigrationObserver, MigrationStats, TableStatus};

/// Prints one line per table, with an optional progress bar while it runs.
pub struct ConsoleObserver {
    show_progress: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            bar: Mutex::new(None),
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut bar| bar.take())
    }
}

/// Create a progress bar for a table import.
fn create_progress_bar(total: u64, table_name: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let bar_style = ProgressStyle::default_bar()
        .template("  {prefix:>20} [{bar:40.cyan/dim}] {pos}/{len} ({per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(bar_style);
    pb.set_prefix(table_name.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

impl MigrationObserver for ConsoleObserver {
    fn table_started(&self, table: &str, total: usize) {
        if self.show_progress && total > 0 {
            if let Ok(mut bar) = self.bar.lock() {
                *bar = Some(create_progress_bar(total as u64, table));
            }
        } else {
            println!("  {} ...", table);
        }
    }

    fn batch_finished(&self, _table: &str, processed: usize) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.set_position(processed as u64);
            }
        }
    }

    fn table_finished(&self, stats: &MigrationStats) {
        if let Some(pb) = self.take_bar() {
            pb.finish_and_clear();
        }

        let marker = match TableStatus::of(stats) {
            TableStatus::Ok => style("✓").green(),
            TableStatus::Empty => style("✓").dim(),
            TableStatus::Partial => style("!").yellow(),
            TableStatus::FetchFailed => style("✗").red(),
        };
        println!(
            "  {} {}: {}/{} migrated",
            marker, stats.table_name, stats.migrated_records, stats.total_records
        );
    }
}
