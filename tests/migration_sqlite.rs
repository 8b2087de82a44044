//! End-to-end migration tests against scratch SQLite stores.
//!
//! The origin is built with the same DDL the target gets from
//! `--init-schema`, then filled with raw SQL so fixtures can contain rows the
//! target will reject. The bundled SQLite enforces foreign keys by default,
//! so the fixture connection switches them off before inserting.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tempfile::TempDir;

use otc_migrate::config::Settings;
use otc_migrate::migration::{BackupOutcome, TableStatus};
use otc_migrate::repository::{SqliteTarget, ALL_TABLES};
use otc_migrate::runner::{run_migration, run_seed, write_report_json};
use otc_migrate::schema;

const FIXTURE: &str = r#"
INSERT INTO users VALUES
    ('u1', 'ana@example.com', 'Ana', 'USER', '2024-03-01T10:00:00Z', '2024-03-01T10:00:00Z'),
    ('u2', 'ben@example.com', NULL, 'USER', '2024-03-02T10:00:00Z', '2024-03-02T10:00:00Z'),
    ('u3', 'cy@example.org', 'Cy', 'ADMIN', '2024-03-03T10:00:00Z', '2024-03-03T10:00:00Z');

INSERT INTO user_profiles VALUES
    ('p1', 'u1', '1990-05-04', 61.5, 0, 'penicillin', NULL, '2024-03-01T10:00:00Z'),
    ('p2', 'u2', NULL, NULL, 1, NULL, 'asthma', '2024-03-02T10:00:00Z');

INSERT INTO drugs VALUES
    ('d1', 'Tylenol', 'acetaminophen', 'analgesic', 'tablet', 500, 3000, 12, 'Liver damage warning', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z'),
    ('d2', 'Advil', 'ibuprofen', 'nsaid', 'tablet', 200, 1200, 12, NULL, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z');

INSERT INTO symptom_histories VALUES
    ('s1', 'u1', '["headache","fever"]', 'mild', 'acetaminophen', '2024-03-05T08:00:00Z'),
    ('s2', 'u2', '["cough"]', 'moderate', NULL, '2024-03-06T08:00:00Z');

INSERT INTO dose_calculations VALUES
    ('c1', 'u1', 'd1', 33, 61.5, 500, 'every 6 hours', '2024-03-05T08:05:00Z'),
    ('c2', 'u2', 'd2', 41, NULL, 200, 'every 8 hours', '2024-03-06T08:05:00Z');

INSERT INTO reminders VALUES
    ('r1', 'u1', 'd1', '500 mg', '0 */6 * * *', 1, '2024-03-05T14:00:00Z', '2024-03-05T08:06:00Z'),
    ('r2', 'u2', 'd2', '200 mg', '0 */8 * * *', 1, NULL, '2024-03-06T08:06:00Z'),
    ('r3', 'u3', 'd1', '500 mg', '0 9 * * *', 0, NULL, '2024-03-07T08:06:00Z');

INSERT INTO educational_contents VALUES
    ('e1', 'reading-labels', 'Reading labels', 'basics', 'Check the active ingredient.', 1, '2024-01-01T00:00:00Z');

INSERT INTO faqs VALUES
    ('f1', 'Is this medical advice?', 'No.', 'general', 1, '2024-01-01T00:00:00Z');
"#;

const FIXTURE_COUNTS: &[(&str, i64)] = &[
    ("users", 3),
    ("user_profiles", 2),
    ("drugs", 2),
    ("symptom_histories", 2),
    ("dose_calculations", 2),
    ("reminders", 3),
    ("educational_contents", 1),
    ("faqs", 1),
];

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Create an origin store with the schema and the given rows.
async fn create_origin(path: &Path, rows: &str) {
    let url = path.display().to_string();
    let store = SqliteTarget::connect(&url).await.unwrap();
    store.init_schema().await.unwrap();
    drop(store);

    let mut conn = SqliteConnection::establish(&url).unwrap();
    conn.batch_execute("PRAGMA foreign_keys = OFF;").unwrap();
    conn.batch_execute(rows).unwrap();
}

fn settings(dir: &TempDir, origin: &Path, target: &Path) -> Settings {
    Settings {
        source_url: format!("file:{}", origin.display()),
        target_url: Some(target.display().to_string()),
        backup_dir: dir.path().join("backups"),
        batch_size: 2,
        init_schema: true,
        ..Default::default()
    }
}

fn count_rows(path: &Path, table: &str) -> i64 {
    let mut conn = SqliteConnection::establish(&path.display().to_string()).unwrap();
    macro_rules! count {
        ($t:ident) => {
            schema::$t::table.count().get_result::<i64>(&mut conn).unwrap()
        };
    }
    match table {
        "users" => count!(users),
        "user_profiles" => count!(user_profiles),
        "drugs" => count!(drugs),
        "symptom_histories" => count!(symptom_histories),
        "dose_calculations" => count!(dose_calculations),
        "reminders" => count!(reminders),
        "educational_contents" => count!(educational_contents),
        "faqs" => count!(faqs),
        other => panic!("unknown table {}", other),
    }
}

fn table_names(path: &Path) -> BTreeSet<String> {
    let mut conn = SqliteConnection::establish(&path.display().to_string()).unwrap();
    diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )
    .load::<TableName>(&mut conn)
    .unwrap()
    .into_iter()
    .map(|t| t.name)
    .collect()
}

#[tokio::test]
async fn test_full_migration_into_sqlite() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("dev.db");
    let target = dir.path().join("rehearsal.db");
    create_origin(&origin, FIXTURE).await;
    let origin_bytes = std::fs::read(&origin).unwrap();

    let run = run_migration(&settings(&dir, &origin, &target), None)
        .await
        .unwrap();

    let report = &run.report;
    assert!(report.success, "{}", report.render());
    assert_eq!(report.totals.total_records, 16);
    assert_eq!(report.totals.migrated_records, 16);
    assert_eq!(report.totals.failed_records, 0);

    let order: Vec<_> = report.tables.iter().map(|t| t.table_name.as_str()).collect();
    assert_eq!(order, ALL_TABLES);

    for (table, expected) in FIXTURE_COUNTS {
        assert_eq!(count_rows(&target, table), *expected, "{}", table);
    }

    let expected_tables: BTreeSet<String> = ALL_TABLES.iter().map(|t| t.to_string()).collect();
    assert_eq!(table_names(&target), expected_tables);

    // The snapshot is a byte copy of the origin as it was before the run.
    match &run.backup {
        BackupOutcome::Created { path, bytes } => {
            assert!(path.starts_with(dir.path().join("backups")));
            assert_eq!(*bytes, origin_bytes.len() as u64);
            assert_eq!(std::fs::read(path).unwrap(), origin_bytes);
        }
        other => panic!("expected a backup, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("dev.db");
    let target = dir.path().join("rehearsal.db");
    create_origin(&origin, FIXTURE).await;
    let settings = settings(&dir, &origin, &target);

    let first = run_migration(&settings, None).await.unwrap();
    let second = run_migration(&settings, None).await.unwrap();

    assert!(first.report.success);
    assert!(second.report.success, "{}", second.report.render());
    for stats in &second.report.tables {
        assert_eq!(stats.migrated_records, stats.total_records);
        assert_eq!(stats.failed_records, 0);
    }
    for (table, expected) in FIXTURE_COUNTS {
        assert_eq!(count_rows(&target, table), *expected, "{}", table);
    }

    let backups = std::fs::read_dir(dir.path().join("backups")).unwrap().count();
    assert_eq!(backups, 2);
}

#[tokio::test]
async fn test_absent_origin_skips_backup_and_migrates_nothing() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("missing.db");
    let target = dir.path().join("rehearsal.db");

    let run = run_migration(&settings(&dir, &origin, &target), None)
        .await
        .unwrap();

    assert_eq!(
        run.backup,
        BackupOutcome::Skipped {
            origin: origin.clone()
        }
    );
    assert!(!origin.exists());
    assert!(run.report.success);
    assert_eq!(run.report.tables.len(), ALL_TABLES.len());
    for stats in &run.report.tables {
        assert_eq!(TableStatus::of(stats), TableStatus::Empty);
    }
}

#[tokio::test]
async fn test_orphaned_rows_fail_only_their_batch() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("dev.db");
    let target = dir.path().join("rehearsal.db");

    // r3 points at a drug that does not exist; with batches of two it lands
    // in batch 2 together with r4.
    let rows = format!(
        "{}\n{}",
        FIXTURE.replace("('r3', 'u3', 'd1'", "('r3', 'u3', 'd-gone'"),
        r#"INSERT INTO reminders VALUES
            ('r4', 'u3', 'd2', '200 mg', '0 21 * * *', 1, NULL, '2024-03-08T08:06:00Z'),
            ('r5', 'u1', 'd2', '200 mg', '0 12 * * *', 1, NULL, '2024-03-09T08:06:00Z'),
            ('r6', 'u2', 'd1', '500 mg', '0 18 * * *', 1, NULL, '2024-03-10T08:06:00Z');"#
    );
    create_origin(&origin, &rows).await;

    let report = run_migration(&settings(&dir, &origin, &target), None)
        .await
        .unwrap()
        .report;

    assert!(!report.success);
    let reminders = report.table("reminders").unwrap();
    assert_eq!(reminders.total_records, 6);
    assert_eq!(reminders.migrated_records, 4);
    assert_eq!(reminders.failed_records, 2);
    assert_eq!(reminders.errors.len(), 1);
    assert!(reminders.errors[0].starts_with("Batch 2 failed: "));
    assert!(reminders.errors[0].contains("FOREIGN KEY"));
    assert_eq!(TableStatus::of(reminders), TableStatus::Partial);

    // Tables after the failing one still ran.
    assert_eq!(report.table("faqs").unwrap().migrated_records, 1);
    assert_eq!(count_rows(&target, "reminders"), 4);
}

#[tokio::test]
async fn test_invalid_rows_are_rejected_before_writing() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("dev.db");
    let target = dir.path().join("rehearsal.db");
    let rows = FIXTURE.replace("'ben@example.com'", "'not-an-email'");
    create_origin(&origin, &rows).await;

    let mut settings = settings(&dir, &origin, &target);
    settings.tables = Some(HashSet::from(["users".to_string()]));
    let report = run_migration(&settings, None).await.unwrap().report;

    let users = report.table("users").unwrap();
    assert_eq!(users.total_records, 3);
    assert_eq!(users.migrated_records, 2);
    assert_eq!(users.failed_records, 1);
    assert!(users.errors[0].starts_with("Record u2 rejected: "));
    assert_eq!(count_rows(&target, "users"), 2);
}

#[tokio::test]
async fn test_table_filter_keeps_dependency_order() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("dev.db");
    let target = dir.path().join("rehearsal.db");
    create_origin(&origin, FIXTURE).await;

    let settings = settings(&dir, &origin, &target)
        .with_tables(Some("faqs,drugs"))
        .unwrap();
    let report = run_migration(&settings, None).await.unwrap().report;

    let order: Vec<_> = report.tables.iter().map(|t| t.table_name.as_str()).collect();
    assert_eq!(order, ["drugs", "faqs"]);
    assert_eq!(count_rows(&target, "drugs"), 2);
    assert_eq!(count_rows(&target, "users"), 0);
}

#[tokio::test]
async fn test_unwritable_backup_dir_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("dev.db");
    let target = dir.path().join("rehearsal.db");
    create_origin(&origin, FIXTURE).await;

    // A regular file where the backup directory should be.
    let blocked: PathBuf = dir.path().join("backups");
    std::fs::write(&blocked, b"not a directory").unwrap();

    let result = run_migration(&settings(&dir, &origin, &target), None).await;
    assert!(result.is_err());
    assert!(!target.exists());
}

#[tokio::test]
async fn test_seed_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("seeded.db");
    let origin = dir.path().join("unused.db");
    let settings = settings(&dir, &origin, &target);

    let first = run_seed(&settings, None).await.unwrap();
    let second = run_seed(&settings, None).await.unwrap();

    assert!(first.success && second.success);
    assert_eq!(first.totals.migrated_records, second.totals.migrated_records);
    let articles = count_rows(&target, "educational_contents");
    let faqs = count_rows(&target, "faqs");
    assert!(articles > 0 && faqs > 0);
    assert_eq!(first.totals.migrated_records as i64, articles + faqs);
}

#[tokio::test]
async fn test_report_json() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("dev.db");
    let target = dir.path().join("rehearsal.db");
    create_origin(&origin, FIXTURE).await;

    let report = run_migration(&settings(&dir, &origin, &target), None)
        .await
        .unwrap()
        .report;
    let path = dir.path().join("reports").join("run.json");
    write_report_json(&report, &path).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["totals"]["migrated_records"], 16);
    assert_eq!(json["tables"][0]["table_name"], "users");
}
