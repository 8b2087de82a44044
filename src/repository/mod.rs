//! Repository layer: the SQLite origin, the target stores and the typed rows
//! moved between them.
//!
//! All database access uses Diesel with diesel-async. The origin is always
//! SQLite; the target is PostgreSQL in production or SQLite for rehearsals.

mod ddl;
pub mod dump;
pub mod models;
pub mod pool;
pub mod source;
mod table_io;
pub mod tables;
pub mod target;
pub mod util;

pub use models::{
    DoseCalculationRecord, DrugRecord, EducationalContentRecord, FaqRecord, ReminderRecord,
    SymptomHistoryRecord, UserProfileRecord, UserRecord,
};
pub use source::SqliteSource;
pub use tables::{migration_plan, parse_table_filter, ReadsAllTables, WritesAllTables, ALL_TABLES};
pub use target::{PgTarget, PgTx, SqliteTarget, SqliteTx};
pub use util::{is_postgres_url, redact_url_password, sqlite_path_from_url, validate_database_url};
