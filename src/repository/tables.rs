//! The fixed table order and plan construction.

use std::collections::HashSet;

use super::models::*;
use crate::error::{MigrateError, Result};
use crate::migration::{
    BatchWriter, MigrationPlan, SourceReader, TableMigration, TableRecord, TableUnit, TargetStore,
};

/// Every migrated table, parents before children.
pub const ALL_TABLES: &[&str] = &[
    UserRecord::TABLE,
    UserProfileRecord::TABLE,
    DrugRecord::TABLE,
    SymptomHistoryRecord::TABLE,
    DoseCalculationRecord::TABLE,
    ReminderRecord::TABLE,
    EducationalContentRecord::TABLE,
    FaqRecord::TABLE,
];

/// Parent tables of each table.
pub fn dependencies(table: &str) -> &'static [&'static str] {
    match table {
        "user_profiles" | "symptom_histories" => &["users"],
        "dose_calculations" | "reminders" => &["users", "drugs"],
        _ => &[],
    }
}

/// Parse a comma-separated `--tables` value.
///
/// Unknown names are a configuration error listing the available tables.
pub fn parse_table_filter(value: &str) -> Result<HashSet<String>> {
    let set: HashSet<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if set.is_empty() {
        return Err(MigrateError::Config(format!(
            "--tables requires one or more table names. Available tables: {}",
            ALL_TABLES.join(", ")
        )));
    }

    let mut unknown: Vec<&str> = set
        .iter()
        .map(String::as_str)
        .filter(|t| !ALL_TABLES.contains(t))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(MigrateError::Config(format!(
            "unknown table(s): {}. Available tables: {}",
            unknown.join(", "),
            ALL_TABLES.join(", ")
        )));
    }

    Ok(set)
}

/// A source that can read every migrated table.
pub trait ReadsAllTables:
    SourceReader<UserRecord>
    + SourceReader<UserProfileRecord>
    + SourceReader<DrugRecord>
    + SourceReader<SymptomHistoryRecord>
    + SourceReader<DoseCalculationRecord>
    + SourceReader<ReminderRecord>
    + SourceReader<EducationalContentRecord>
    + SourceReader<FaqRecord>
{
}

impl<S> ReadsAllTables for S where
    S: SourceReader<UserRecord>
        + SourceReader<UserProfileRecord>
        + SourceReader<DrugRecord>
        + SourceReader<SymptomHistoryRecord>
        + SourceReader<DoseCalculationRecord>
        + SourceReader<ReminderRecord>
        + SourceReader<EducationalContentRecord>
        + SourceReader<FaqRecord>
{
}

/// A transaction handle that can write every migrated table.
pub trait WritesAllTables:
    BatchWriter<UserRecord>
    + BatchWriter<UserProfileRecord>
    + BatchWriter<DrugRecord>
    + BatchWriter<SymptomHistoryRecord>
    + BatchWriter<DoseCalculationRecord>
    + BatchWriter<ReminderRecord>
    + BatchWriter<EducationalContentRecord>
    + BatchWriter<FaqRecord>
{
}

impl<W> WritesAllTables for W where
    W: BatchWriter<UserRecord>
        + BatchWriter<UserProfileRecord>
        + BatchWriter<DrugRecord>
        + BatchWriter<SymptomHistoryRecord>
        + BatchWriter<DoseCalculationRecord>
        + BatchWriter<ReminderRecord>
        + BatchWriter<EducationalContentRecord>
        + BatchWriter<FaqRecord>
{
}

/// All tables in dependency order, optionally restricted to `only`.
///
/// Filtering never reorders the plan.
pub fn migration_plan<'a, S, T>(source: &'a S, only: Option<&HashSet<String>>) -> MigrationPlan<'a, T>
where
    S: ReadsAllTables,
    T: TargetStore + 'a,
    T::Tx: WritesAllTables,
{
    let plan: MigrationPlan<'a, T> = vec![
        Box::new(TableUnit::<S, UserRecord>::new(source)),
        Box::new(TableUnit::<S, UserProfileRecord>::new(source)),
        Box::new(TableUnit::<S, DrugRecord>::new(source)),
        Box::new(TableUnit::<S, SymptomHistoryRecord>::new(source)),
        Box::new(TableUnit::<S, DoseCalculationRecord>::new(source)),
        Box::new(TableUnit::<S, ReminderRecord>::new(source)),
        Box::new(TableUnit::<S, EducationalContentRecord>::new(source)),
        Box::new(TableUnit::<S, FaqRecord>::new(source)),
    ];

    match only {
        None => plan,
        Some(set) => plan
            .into_iter()
            .filter(|unit: &Box<dyn TableMigration<T> + 'a>| set.contains(unit.name()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_respects_dependencies() {
        for (i, table) in ALL_TABLES.iter().enumerate() {
            for parent in dependencies(table) {
                let p = ALL_TABLES.iter().position(|t| t == parent).unwrap();
                assert!(p < i, "{} must come after {}", table, parent);
            }
        }
    }

    #[test]
    fn test_parse_table_filter() {
        let set = parse_table_filter("users, drugs,,").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("users") && set.contains("drugs"));

        let err = parse_table_filter("users,prescriptions").unwrap_err().to_string();
        assert!(err.contains("prescriptions"));
        assert!(err.contains("Available tables: users, user_profiles"));

        assert!(parse_table_filter(" , ").is_err());
    }
}
