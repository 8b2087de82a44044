//! Per-table accounting.

use serde::Serialize;

/// Outcome of migrating one table.
///
/// Every fetched record ends up counted as either migrated or failed, so once
/// a table's run completes `migrated_records + failed_records ==
/// total_records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStats {
    pub table_name: String,
    pub total_records: usize,
    pub migrated_records: usize,
    pub failed_records: usize,
    pub errors: Vec<String>,
    /// The source could not be read; counts are all zero.
    pub fetch_failed: bool,
}

impl MigrationStats {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            total_records: 0,
            migrated_records: 0,
            failed_records: 0,
            errors: Vec::new(),
            fetch_failed: false,
        }
    }

    /// Records migrated or failed so far.
    pub fn processed(&self) -> usize {
        self.migrated_records + self.failed_records
    }

    /// True when every record has been accounted for.
    pub fn is_complete(&self) -> bool {
        self.processed() == self.total_records
    }

    pub(crate) fn record_fetch_error(&mut self, error: impl std::fmt::Display) {
        self.fetch_failed = true;
        self.errors.push(format!("Failed to fetch data: {}", error));
    }

    pub(crate) fn record_rejected(&mut self, key: &str, reason: &str) {
        self.failed_records += 1;
        self.errors
            .push(format!("Record {} rejected: {}", key, reason));
    }

    pub(crate) fn record_batch_success(&mut self, size: usize) {
        self.migrated_records += size;
    }

    /// `batch_number` is 1-based.
    pub(crate) fn record_batch_failure(
        &mut self,
        batch_number: usize,
        size: usize,
        error: impl std::fmt::Display,
    ) {
        self.failed_records += size;
        self.errors
            .push(format!("Batch {} failed: {}", batch_number, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounting() {
        let mut stats = MigrationStats::new("drugs");
        stats.total_records = 30;

        stats.record_batch_success(10);
        stats.record_batch_failure(2, 10, "UNIQUE constraint failed: drugs.id");
        assert!(!stats.is_complete());
        stats.record_batch_success(10);

        assert!(stats.is_complete());
        assert_eq!(stats.migrated_records, 20);
        assert_eq!(stats.failed_records, 10);
        assert_eq!(
            stats.errors,
            vec!["Batch 2 failed: UNIQUE constraint failed: drugs.id".to_string()]
        );
    }

    #[test]
    fn test_fetch_error_leaves_counts_at_zero() {
        let mut stats = MigrationStats::new("reminders");
        stats.record_fetch_error("connection refused");

        assert!(stats.fetch_failed);
        assert_eq!(stats.processed(), 0);
        assert_eq!(stats.errors, vec!["Failed to fetch data: connection refused"]);
    }
}
