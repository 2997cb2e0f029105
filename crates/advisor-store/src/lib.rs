//! Advisor store crate - SQLite access to the ERP mirror database.
//!
//! The advisor treats business data as a read-only store: the analytics
//! layer only ever issues SELECTs. Writes happen in tests and in whatever
//! external process keeps the mirror in sync with the ERP system.

pub mod db;
pub mod migrations;

pub use db::Database;
