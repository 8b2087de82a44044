//! otc-migrate - data migration toolkit for the OTC drug advisor.
//!
//! Copies the advisor's Prisma tables from the SQLite development store into
//! PostgreSQL in batches, with a backup of the origin taken first and a
//! per-table report at the end.

pub mod config;
pub mod error;
pub mod migration;
pub mod repository;
pub mod runner;
pub mod schema;
pub mod seed;

pub use error::{MigrateError, Result};
