//! SQLite-backed table store holding one table per imported dataset.

mod schema;
mod store;

pub use schema::{quote_identifier, validate_table_name};
pub use store::{ImportLogEntry, ImportReport, SqliteTableStore};
