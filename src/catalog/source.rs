//! Raw row sources feeding the catalog loader.

use super::load::LoadError;
use super::models::{null_if_empty, RawTable};
use crate::table_store::SqliteTableStore;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Anything that can produce the raw title rows.
pub trait RawRowSource {
    /// Human readable description used in logs.
    fn describe(&self) -> String;

    fn read_rows(&self) -> Result<RawTable, LoadError>;
}

/// Reads a headed CSV stream into a `RawTable`. Empty cells become null;
/// rows with a different number of fields than the header are tolerated.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let mut table = RawTable::new(columns);

    for record in csv_reader.records() {
        let record = record?;
        table.rows.push(record.iter().map(null_if_empty).collect());
    }
    Ok(table)
}

/// A CSV file on disk.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RawRowSource for CsvSource {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }

    fn read_rows(&self) -> Result<RawTable, LoadError> {
        let file = std::fs::File::open(&self.path)?;
        read_csv(std::io::BufReader::new(file))
    }
}

/// A table previously imported into the SQLite table store.
pub struct StoreTableSource {
    db_path: PathBuf,
    table: String,
}

impl StoreTableSource {
    pub fn new<P: AsRef<Path>>(db_path: P, table: &str) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            table: table.to_string(),
        }
    }
}

impl RawRowSource for StoreTableSource {
    fn describe(&self) -> String {
        format!("table '{}' in {}", self.table, self.db_path.display())
    }

    fn read_rows(&self) -> Result<RawTable, LoadError> {
        let store = SqliteTableStore::open_read_only(&self.db_path)?;
        store.read_table(&self.table)
    }
}
