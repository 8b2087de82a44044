//! Report aggregation: a read-only fold over the per-table stats.

use std::fmt;

use serde::Serialize;

use super::stats::MigrationStats;
use crate::error::{MigrateError, Result};

/// Per-table status marker shown in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableStatus {
    Ok,
    Empty,
    Partial,
    FetchFailed,
}

impl TableStatus {
    pub fn of(stats: &MigrationStats) -> Self {
        if stats.fetch_failed {
            TableStatus::FetchFailed
        } else if stats.failed_records > 0 {
            TableStatus::Partial
        } else if stats.total_records == 0 {
            TableStatus::Empty
        } else {
            TableStatus::Ok
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableStatus::Ok => "OK",
            TableStatus::Empty => "EMPTY",
            TableStatus::Partial => "PARTIAL",
            TableStatus::FetchFailed => "FETCH-FAILED",
        };
        f.write_str(s)
    }
}

/// Grand totals across all tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_records: usize,
    pub migrated_records: usize,
    pub failed_records: usize,
    pub fetch_failures: usize,
}

/// Summary of a whole migration run, in table order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub tables: Vec<MigrationStats>,
    pub totals: Totals,
    pub success: bool,
}

impl MigrationReport {
    pub fn from_stats(tables: Vec<MigrationStats>) -> Self {
        let totals = tables.iter().fold(Totals::default(), |acc, t| Totals {
            total_records: acc.total_records + t.total_records,
            migrated_records: acc.migrated_records + t.migrated_records,
            failed_records: acc.failed_records + t.failed_records,
            fetch_failures: acc.fetch_failures + usize::from(t.fetch_failed),
        });
        let success = totals.failed_records == 0 && totals.fetch_failures == 0;
        Self {
            tables,
            totals,
            success,
        }
    }

    /// Apply the exit policy.
    ///
    /// Best-effort runs always pass. Strict runs fail unless the report is a
    /// success.
    pub fn check(&self, strict: bool) -> Result<()> {
        if strict && !self.success {
            return Err(MigrateError::Incomplete {
                failed: self.totals.failed_records,
                unread: self.totals.fetch_failures,
            });
        }
        Ok(())
    }

    /// Look up one table's stats by name.
    pub fn table(&self, name: &str) -> Option<&MigrationStats> {
        self.tables.iter().find(|t| t.table_name == name)
    }

    /// Render the console report: one line per table, then the summary block.
    pub fn render(&self) -> String {
        let width = self
            .tables
            .iter()
            .map(|t| t.table_name.len())
            .max()
            .unwrap_or(0)
            .max(5);

        let mut out = String::from("Migration report\n");
        for t in &self.tables {
            out.push_str(&format!(
                "  {:<width$}  total {:>8}  migrated {:>8}  failed {:>8}  [{}]\n",
                t.table_name,
                t.total_records,
                t.migrated_records,
                t.failed_records,
                TableStatus::of(t),
                width = width,
            ));
            for error in &t.errors {
                out.push_str(&format!("      - {}\n", error));
            }
        }

        out.push_str("\nSummary\n");
        out.push_str(&format!("  Tables:   {}\n", self.tables.len()));
        out.push_str(&format!("  Total:    {}\n", self.totals.total_records));
        out.push_str(&format!("  Migrated: {}\n", self.totals.migrated_records));
        out.push_str(&format!("  Failed:   {}\n", self.totals.failed_records));
        if self.totals.fetch_failures > 0 {
            out.push_str(&format!(
                "  Unread:   {} table(s)\n",
                self.totals.fetch_failures
            ));
        }
        out.push_str(&format!(
            "  Status:   {}\n",
            if self.success {
                "SUCCESS"
            } else {
                "PARTIAL FAILURE"
            }
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, total: usize, migrated: usize, failed: usize) -> MigrationStats {
        let mut s = MigrationStats::new(name);
        s.total_records = total;
        s.migrated_records = migrated;
        s.failed_records = failed;
        s
    }

    #[test]
    fn test_totals_and_success() {
        let report = MigrationReport::from_stats(vec![
            stats("users", 1200, 1200, 0),
            stats("drugs", 50, 50, 0),
            stats("faqs", 0, 0, 0),
        ]);

        assert!(report.success);
        assert_eq!(
            report.totals,
            Totals {
                total_records: 1250,
                migrated_records: 1250,
                failed_records: 0,
                fetch_failures: 0,
            }
        );
        assert_eq!(TableStatus::of(report.table("faqs").unwrap()), TableStatus::Empty);
    }

    #[test]
    fn test_any_failure_is_partial() {
        let mut drugs = stats("drugs", 50, 40, 10);
        drugs
            .errors
            .push("Batch 2 failed: UNIQUE constraint failed: drugs.id".to_string());
        let report = MigrationReport::from_stats(vec![stats("users", 3, 3, 0), drugs]);

        assert!(!report.success);
        assert_eq!(report.totals.failed_records, 10);

        let text = report.render();
        assert!(text.contains("[PARTIAL]"));
        assert!(text.contains("- Batch 2 failed: UNIQUE constraint failed: drugs.id"));
        assert!(text.contains("Failed:   10"));
        assert!(text.ends_with("Status:   PARTIAL FAILURE\n"));
    }

    #[test]
    fn test_fetch_failure_fails_the_run() {
        let mut reminders = MigrationStats::new("reminders");
        reminders.fetch_failed = true;
        reminders
            .errors
            .push("Failed to fetch data: connection refused".to_string());
        let report = MigrationReport::from_stats(vec![reminders]);

        assert_eq!(report.totals.failed_records, 0);
        assert!(!report.success);
        assert!(report.render().contains("[FETCH-FAILED]"));
    }

    #[test]
    fn test_render_lines_are_stable() {
        let report = MigrationReport::from_stats(vec![stats("users", 1200, 1200, 0)]);
        let text = report.render();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "  users  total     1200  migrated     1200  failed        0  [OK]"
        );
    }

    #[test]
    fn test_serializes_to_json() {
        let report = MigrationReport::from_stats(vec![stats("users", 2, 2, 0)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totals"]["migrated_records"], 2);
        assert_eq!(json["tables"][0]["table_name"], "users");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_strict_mode_rejects_partial_runs() {
        let report = MigrationReport::from_stats(vec![
            stats("users", 3, 3, 0),
            stats("drugs", 50, 40, 10),
        ]);

        let err = report.check(true).unwrap_err();
        assert!(matches!(
            err,
            MigrateError::Incomplete {
                failed: 10,
                unread: 0
            }
        ));
        assert!(report.check(false).is_ok());
    }

    #[test]
    fn test_strict_mode_rejects_unread_tables() {
        let mut reminders = MigrationStats::new("reminders");
        reminders.fetch_failed = true;
        let report = MigrationReport::from_stats(vec![stats("users", 3, 3, 0), reminders]);

        assert!(matches!(
            report.check(true),
            Err(MigrateError::Incomplete {
                failed: 0,
                unread: 1
            })
        ));
        assert!(report.check(false).is_ok());
    }

    #[test]
    fn test_strict_mode_accepts_clean_runs() {
        let report = MigrationReport::from_stats(vec![stats("users", 3, 3, 0)]);
        assert!(report.check(true).is_ok());
        assert!(report.check(false).is_ok());
    }
}
