//! Read and write implementations for every migrated table.
//!
//! Reads come from the SQLite origin ordered by primary key. Writes are
//! per-row upserts (`INSERT ... ON CONFLICT (id) DO UPDATE`) issued inside the
//! batch transaction, so replaying a batch leaves the target unchanged.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::*;
use super::source::SqliteSource;
use super::target::{PgTx, SqliteTx};
use crate::error::Result;
use crate::migration::{BatchWriter, SourceReader};
use crate::schema;

macro_rules! table_io {
    ($record:ty, $table:ident) => {
        #[async_trait]
        impl SourceReader<$record> for SqliteSource {
            async fn read_all(&self) -> Result<Vec<$record>> {
                let Some(mut conn) = self.connect().await? else {
                    return Ok(Vec::new());
                };
                let rows = schema::$table::table
                    .order(schema::$table::id.asc())
                    .load::<$record>(&mut conn)
                    .await?;
                Ok(rows)
            }
        }

        #[async_trait]
        impl BatchWriter<$record> for SqliteTx {
            async fn write_batch(&mut self, batch: &[$record]) -> Result<()> {
                for row in batch {
                    diesel::insert_into(schema::$table::table)
                        .values(row)
                        .on_conflict(schema::$table::id)
                        .do_update()
                        .set(row)
                        .execute(&mut self.conn)
                        .await?;
                }
                Ok(())
            }
        }

        #[async_trait]
        impl BatchWriter<$record> for PgTx {
            async fn write_batch(&mut self, batch: &[$record]) -> Result<()> {
                for row in batch {
                    diesel::insert_into(schema::$table::table)
                        .values(row)
                        .on_conflict(schema::$table::id)
                        .do_update()
                        .set(row)
                        .execute(&mut self.conn)
                        .await?;
                }
                Ok(())
            }
        }
    };
}

table_io!(UserRecord, users);
table_io!(UserProfileRecord, user_profiles);
table_io!(DrugRecord, drugs);
table_io!(SymptomHistoryRecord, symptom_histories);
table_io!(DoseCalculationRecord, dose_calculations);
table_io!(ReminderRecord, reminders);
table_io!(EducationalContentRecord, educational_contents);
table_io!(FaqRecord, faqs);
